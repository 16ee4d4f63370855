use serde::{Deserialize, Serialize};

use crate::entity::ListEntity;
use crate::ids::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementPriority {
    Low,
    Normal,
    High,
    Urgent,
}

/// Company-wide announcement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub priority: Option<AnnouncementPriority>,
    #[serde(default)]
    pub status: Option<String>,
    /// ISO-8601 timestamp as sent by the backend
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnouncementStats {
    pub total: u64,
    pub published: u64,
    pub draft: u64,
    pub expired: u64,
}

impl ListEntity for Announcement {
    const RESOURCE: &'static str = "announcements";
    type Stats = AnnouncementStats;

    fn record_id(&self) -> RecordId {
        self.id.clone()
    }
}
