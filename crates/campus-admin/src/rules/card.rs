//! Card validity rule.

use campus_core::models::payment_method::{CardType, PaymentMethodForm};
use chrono::{Datelike, NaiveDate};

use crate::error::RuleViolation;

pub const MIN_CARD_LENGTH: usize = 13;
pub const MAX_CARD_LENGTH: usize = 19;

/// What survives of a card once it has been validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDetails {
    pub card_type: CardType,
    pub last_four: String,
}

/// Strip the separators people type into card fields. Returns `None` if
/// anything other than digits, spaces and dashes remains.
pub fn normalize_card_number(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| *c != ' ' && *c != '-').collect();
    digits.chars().all(|c| c.is_ascii_digit()).then_some(digits)
}

/// Luhn (mod 10) checksum over a string of ASCII digits.
pub fn luhn_valid(digits: &str) -> bool {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let sum: u32 = digits
        .bytes()
        .rev()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

/// Card network from the leading digit.
pub fn card_type_for(digits: &str) -> Option<CardType> {
    match digits.chars().next()? {
        '4' => Some(CardType::Visa),
        '5' => Some(CardType::Mastercard),
        '3' => Some(CardType::Amex),
        _ => None,
    }
}

/// Check number, network, expiry and security code. All violations are
/// collected rather than stopping at the first.
pub fn check_card(
    form: &PaymentMethodForm,
    today: NaiveDate,
) -> Result<CardDetails, Vec<RuleViolation>> {
    let mut violations = Vec::new();

    let digits = normalize_card_number(&form.card_number)
        .filter(|d| (MIN_CARD_LENGTH..=MAX_CARD_LENGTH).contains(&d.len()) && luhn_valid(d));
    let card_type = match &digits {
        None => {
            violations.push(RuleViolation::InvalidCardNumber);
            None
        }
        Some(d) => {
            let t = card_type_for(d);
            if t.is_none() {
                violations.push(RuleViolation::UnsupportedCardType);
            }
            t
        }
    };

    if !(1..=12).contains(&form.expiry_month) {
        violations.push(RuleViolation::InvalidExpiryMonth);
    } else if (form.expiry_year, form.expiry_month) < (today.year(), today.month()) {
        violations.push(RuleViolation::CardExpired);
    }

    let cvv = form.cvv.trim();
    let cvv_ok = cvv.chars().all(|c| c.is_ascii_digit())
        && match card_type {
            Some(t) => cvv.len() == t.cvv_length(),
            None => cvv.len() == 3 || cvv.len() == 4,
        };
    if !cvv_ok {
        violations.push(RuleViolation::InvalidCvv {
            expected: card_type.map_or(3, |t| t.cvv_length()),
        });
    }

    match (digits, card_type) {
        (Some(d), Some(card_type)) if violations.is_empty() => Ok(CardDetails {
            card_type,
            last_four: d[d.len() - 4..].to_string(),
        }),
        _ => Err(violations),
    }
}
