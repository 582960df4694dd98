//! Payment domain model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Failed,
    Refunded,
}

/// How often the subscription is billed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    Monthly,
    Annual,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Payment {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub payment_method_id: Option<Uuid>,
    pub final_price: Decimal,
    pub next_payment_date: DateTime<Utc>,
    pub payment_status: PaymentStatus,
    pub is_annual: bool,
    pub created_at: DateTime<Utc>,
}
