//! Per-user preference record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preference {
    pub id: Uuid,
    pub user_id: Uuid,
    /// IANA zone name or fixed offset such as `UTC-5`. `None` means UTC.
    pub timezone: Option<String>,
    pub language: String,
    pub email_notifications: bool,
}
