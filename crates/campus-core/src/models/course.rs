//! Course domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub department_id: Uuid,
    /// Cleared when the teaching user is deleted.
    pub teacher_id: Option<Uuid>,
}
