//! Modelo de Notification

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationSeverity {
    #[default]
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationCategory {
    Trip,
    Order,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub severity: NotificationSeverity,
    pub category: NotificationCategory,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
}
