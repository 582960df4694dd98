//! Payment method domain model.
//!
//! Only the last four digits of a card are kept once validated; the
//! CVV is checked and then discarded.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Card network, derived from the leading digit of the card number.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Visa,
    Mastercard,
    Amex,
}

impl CardType {
    pub fn cvv_length(&self) -> usize {
        match self {
            CardType::Amex => 4,
            CardType::Visa | CardType::Mastercard => 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentMethod {
    pub id: Uuid,
    pub cardholder_name: String,
    pub card_last_four: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
    pub card_type: CardType,
    pub is_default: bool,
}

/// Raw input of the add/edit card form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentMethodForm {
    pub cardholder_name: String,
    pub card_number: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
    pub cvv: String,
    /// Make this card the default even if others exist.
    pub make_default: bool,
}
