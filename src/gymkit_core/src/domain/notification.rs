use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A broadcast notification shown to trainers, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub read: bool,
    pub date: String,
}

impl Notification {
    /// `date` is an RFC 3339 timestamp supplied by the caller so the domain
    /// type stays clock-free.
    pub fn new(message: String, kind: String, date: String) -> Self {
        Self {
            id: format!("notif-{}", Uuid::new_v4()),
            message,
            kind,
            read: false,
            date,
        }
    }
}
