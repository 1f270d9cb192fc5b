use chrono::{Duration, Utc};
use tubely_core::VideoRecord;
use uuid::Uuid;

/// ffprobe JSON output for a single selected video stream.
pub fn probe_json(width: u32, height: u32) -> String {
    format!(
        r#"{{"programs":[],"streams":[{{"width":{},"height":{}}}]}}"#,
        width, height
    )
}

pub fn video_record(owner_id: Uuid) -> VideoRecord {
    let created = Utc::now() - Duration::days(1);
    VideoRecord {
        id: Uuid::new_v4(),
        owner_id,
        title: "Boots on the ground".to_string(),
        description: "Field test".to_string(),
        thumbnail_url: Some("https://cdn.example.com/thumbnails/boots.png".to_string()),
        video_url: None,
        created_at: created,
        updated_at: created,
    }
}
