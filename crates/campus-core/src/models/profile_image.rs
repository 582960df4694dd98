//! Profile image domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileImage {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_url: String,
    pub is_active: bool,
}
