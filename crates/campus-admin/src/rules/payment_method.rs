//! Default-payment-method rule.
//!
//! Whenever the collection is non-empty exactly one method is the
//! default. Every function here returns a complete replacement
//! collection that satisfies that.

use campus_core::models::payment_method::PaymentMethod;
use uuid::Uuid;

/// Keep the first default, demote the rest, and promote the first
/// method if none is marked.
fn normalize(mut methods: Vec<PaymentMethod>) -> Vec<PaymentMethod> {
    let mut seen_default = false;
    for m in &mut methods {
        if m.is_default {
            if seen_default {
                m.is_default = false;
            }
            seen_default = true;
        }
    }
    if !seen_default {
        if let Some(first) = methods.first_mut() {
            first.is_default = true;
        }
    }
    methods
}

/// Insert or replace `method` (matched by id).
///
/// A brand-new method becomes default only if the collection was empty,
/// unless `make_default` asks for it. An edited method keeps its
/// default status.
pub fn upsert_method(
    methods: &[PaymentMethod],
    mut method: PaymentMethod,
    make_default: bool,
) -> Vec<PaymentMethod> {
    let existing = methods.iter().position(|m| m.id == method.id);
    method.is_default = make_default
        || match existing {
            Some(i) => methods[i].is_default,
            None => methods.is_empty(),
        };

    let mut out: Vec<PaymentMethod> = methods.to_vec();
    if method.is_default {
        for m in &mut out {
            m.is_default = false;
        }
    }
    match existing {
        Some(i) => out[i] = method,
        None => out.push(method),
    }
    normalize(out)
}

/// Remove `id`; if it was the default the first remaining method takes
/// over. `None` if no such method exists.
pub fn remove_method(methods: &[PaymentMethod], id: Uuid) -> Option<Vec<PaymentMethod>> {
    methods.iter().any(|m| m.id == id).then(|| {
        normalize(methods.iter().filter(|m| m.id != id).cloned().collect())
    })
}

/// Make `id` the default and demote every other method. `None` if no
/// such method exists.
pub fn set_default(methods: &[PaymentMethod], id: Uuid) -> Option<Vec<PaymentMethod>> {
    methods.iter().any(|m| m.id == id).then(|| {
        methods
            .iter()
            .cloned()
            .map(|mut m| {
                m.is_default = m.id == id;
                m
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use campus_core::models::payment_method::CardType;

    use super::*;

    fn method(n: u128, is_default: bool) -> PaymentMethod {
        PaymentMethod {
            id: Uuid::from_u128(n),
            cardholder_name: "Holder".into(),
            card_last_four: format!("{n:04}"),
            expiry_month: 1,
            expiry_year: 2030,
            card_type: CardType::Visa,
            is_default,
        }
    }

    fn defaults(methods: &[PaymentMethod]) -> Vec<Uuid> {
        methods.iter().filter(|m| m.is_default).map(|m| m.id).collect()
    }

    #[test]
    fn first_method_becomes_default() {
        let out = upsert_method(&[], method(1, false), false);
        assert_eq!(defaults(&out), vec![Uuid::from_u128(1)]);
    }

    #[test]
    fn later_method_is_not_default_unless_asked() {
        let existing = vec![method(1, true)];
        let out = upsert_method(&existing, method(2, false), false);
        assert_eq!(defaults(&out), vec![Uuid::from_u128(1)]);

        let out = upsert_method(&existing, method(2, false), true);
        assert_eq!(defaults(&out), vec![Uuid::from_u128(2)]);
    }

    #[test]
    fn editing_default_keeps_it_default() {
        let existing = vec![method(1, true), method(2, false)];
        let mut edited = method(1, false);
        edited.expiry_year = 2031;
        let out = upsert_method(&existing, edited, false);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].expiry_year, 2031);
        assert_eq!(defaults(&out), vec![Uuid::from_u128(1)]);
    }

    #[test]
    fn removing_default_promotes_first_remaining() {
        let existing = vec![method(1, false), method(2, true), method(3, false)];
        let out = remove_method(&existing, Uuid::from_u128(2)).unwrap();
        assert_eq!(defaults(&out), vec![Uuid::from_u128(1)]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn removing_last_method_leaves_empty() {
        let out = remove_method(&[method(1, true)], Uuid::from_u128(1)).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn unknown_ids_are_reported() {
        let existing = vec![method(1, true)];
        assert!(remove_method(&existing, Uuid::from_u128(9)).is_none());
        assert!(set_default(&existing, Uuid::from_u128(9)).is_none());
    }

    #[test]
    fn set_default_demotes_others() {
        let existing = vec![method(1, true), method(2, false)];
        let out = set_default(&existing, Uuid::from_u128(2)).unwrap();
        assert_eq!(defaults(&out), vec![Uuid::from_u128(2)]);
    }
}
