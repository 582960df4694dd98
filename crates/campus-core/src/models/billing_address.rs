//! Billing address domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BillingAddress {
    pub id: Uuid,
    pub subscriber_id: Uuid,
    pub primary_address: String,
    pub secondary_address: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

/// Raw input of the billing address form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingAddressForm {
    pub primary_address: String,
    pub secondary_address: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}
