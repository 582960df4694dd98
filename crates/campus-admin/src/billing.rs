//! Billing service: plan changes, cancellation, payment methods and the
//! billing address.

use campus_core::error::{CampusError, CampusResult, FieldErrors};
use campus_core::models::billing_address::{BillingAddress, BillingAddressForm};
use campus_core::models::payment::{Payment, PaymentStatus, Recurrence};
use campus_core::models::payment_method::{PaymentMethod, PaymentMethodForm};
use campus_core::models::plan::Plan;
use campus_core::models::subscriber::{Subscriber, UpdateSubscriber};
use campus_core::store::TenantStore;
use chrono::{Duration, Months, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ServiceConfig;
use crate::error::to_field_errors;
use crate::outcome::Outcome;
use crate::rules;
use crate::validate;

/// Why a subscriber is cancelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    TooExpensive,
    MissingFeatures,
    SwitchingProvider,
    NoLongerNeeded,
    Other,
}

/// Price of one billing period of `plan`.
///
/// Annual billing is twelve months at the monthly rate less `annual_discount`.
pub fn plan_price(plan: &Plan, recurrence: Recurrence, annual_discount: Decimal) -> Decimal {
    match recurrence {
        Recurrence::Monthly => plan.price_per_month,
        Recurrence::Annual => {
            (plan.price_per_month * Decimal::from(12) * (Decimal::ONE - annual_discount)).round_dp(2)
        }
    }
}

pub struct BillingService<S: TenantStore> {
    store: S,
    config: ServiceConfig,
}

impl<S: TenantStore> BillingService<S> {
    pub fn new(store: S, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn snapshot(&self) -> CampusResult<Subscriber> {
        self.store.get().ok_or(CampusError::NoTenantLoaded)
    }

    async fn round_trip(&self) {
        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }
    }

    /// Record a payment for `plan_id`, which makes it the current plan.
    ///
    /// Current usage is not checked against the new plan: downgrading can
    /// leave the tenant over its limits, which [`rules::usage_report`]
    /// surfaces at read time.
    pub async fn change_plan(&self, plan_id: Uuid, recurrence: Recurrence) -> CampusResult<Payment> {
        self.round_trip().await;
        let aggregate = self.snapshot()?;

        let Some(plan) = aggregate.plans.iter().find(|p| p.id == plan_id) else {
            let mut errors = FieldErrors::new();
            errors.push("plan_id", "UNKNOWN_PLAN", "plan does not exist");
            return Err(CampusError::Validation(errors));
        };

        // Keep history strictly ordered so the new payment is the latest.
        let now = Utc::now();
        let created_at = match aggregate.current_payment() {
            Some(latest) if latest.created_at >= now => latest.created_at + Duration::seconds(1),
            _ => now,
        };
        let months = match recurrence {
            Recurrence::Monthly => Months::new(1),
            Recurrence::Annual => Months::new(12),
        };
        let next_payment_date = created_at
            .checked_add_months(months)
            .unwrap_or(created_at + Duration::days(30));

        let payment = Payment {
            id: Uuid::new_v4(),
            plan_id,
            payment_method_id: aggregate.default_payment_method().map(|m| m.id),
            final_price: plan_price(plan, recurrence, self.config.annual_discount),
            next_payment_date,
            payment_status: PaymentStatus::Paid,
            is_annual: recurrence == Recurrence::Annual,
            created_at,
        };

        let mut payments = Vec::with_capacity(aggregate.payments.len() + 1);
        payments.push(payment.clone());
        payments.extend(aggregate.payments.iter().cloned());

        self.store.merge(UpdateSubscriber {
            payments: Some(payments),
            recurrence: Some(recurrence),
            ..Default::default()
        });
        info!(
            plan_id = %plan_id,
            plan = %plan.name,
            price = %payment.final_price,
            annual = payment.is_annual,
            "Plan changed"
        );

        Ok(payment)
    }

    /// Switch the subscription off. No data is removed.
    pub async fn cancel_subscription(
        &self,
        reasons: &[CancelReason],
        other_text: Option<&str>,
    ) -> CampusResult<()> {
        let mut errors = FieldErrors::new();
        if reasons.is_empty() {
            errors.push("reasons", "REQUIRED", "select at least one reason");
        }
        if reasons.contains(&CancelReason::Other) && other_text.is_none_or(|t| t.trim().is_empty())
        {
            errors.push("other_text", "REQUIRED", "describe the other reason");
        }
        errors.into_result()?;

        self.round_trip().await;
        self.snapshot()?;

        self.store.merge(UpdateSubscriber {
            is_active: Some(false),
            is_auto_renew: Some(false),
            ..Default::default()
        });
        info!(reasons = ?reasons, "Subscription cancelled");
        Ok(())
    }

    pub async fn reactivate_subscription(&self) -> CampusResult<()> {
        self.round_trip().await;
        self.snapshot()?;

        self.store.merge(UpdateSubscriber {
            is_active: Some(true),
            is_auto_renew: Some(true),
            ..Default::default()
        });
        info!("Subscription reactivated");
        Ok(())
    }

    /// Validate a card and insert it, or replace `existing_id` in place.
    pub async fn save_payment_method(
        &self,
        form: PaymentMethodForm,
        existing_id: Option<Uuid>,
    ) -> CampusResult<PaymentMethod> {
        let today = Utc::now().date_naive();
        let mut errors = FieldErrors::new();
        validate::require(&mut errors, "cardholder_name", &form.cardholder_name);
        let card = rules::check_card(&form, today);
        if let Err(violations) = &card {
            errors.extend(to_field_errors(violations));
        }
        errors.into_result().inspect_err(|e| {
            warn!(code = e.code(), "Payment method rejected: {e}");
        })?;
        let card = card.map_err(|v| CampusError::Validation(to_field_errors(&v)))?;

        self.round_trip().await;
        let aggregate = self.snapshot()?;

        let method = PaymentMethod {
            id: existing_id.unwrap_or_else(Uuid::new_v4),
            cardholder_name: form.cardholder_name.trim().to_string(),
            card_last_four: card.last_four,
            expiry_month: form.expiry_month,
            expiry_year: form.expiry_year,
            card_type: card.card_type,
            is_default: false,
        };
        let methods =
            rules::upsert_method(&aggregate.payment_methods, method.clone(), form.make_default);
        let saved = methods
            .iter()
            .find(|m| m.id == method.id)
            .cloned()
            .unwrap_or(method);

        self.store.merge(UpdateSubscriber {
            payment_methods: Some(methods),
            ..Default::default()
        });
        info!(
            method_id = %saved.id,
            card_type = ?saved.card_type,
            is_default = saved.is_default,
            "Payment method saved"
        );
        Ok(saved)
    }

    /// Remove a payment method. If it was the default, the first remaining
    /// method becomes the default.
    pub async fn delete_payment_method(&self, method_id: Uuid) -> CampusResult<Outcome> {
        self.round_trip().await;
        let aggregate = self.snapshot()?;

        let Some(methods) = rules::remove_method(&aggregate.payment_methods, method_id) else {
            return Ok(Outcome::NoOp);
        };
        self.store.merge(UpdateSubscriber {
            payment_methods: Some(methods),
            ..Default::default()
        });
        info!(method_id = %method_id, "Payment method deleted");
        Ok(Outcome::Applied)
    }

    pub async fn set_default_payment_method(&self, method_id: Uuid) -> CampusResult<Outcome> {
        self.round_trip().await;
        let aggregate = self.snapshot()?;

        let Some(methods) = rules::set_default(&aggregate.payment_methods, method_id) else {
            return Ok(Outcome::NoOp);
        };
        self.store.merge(UpdateSubscriber {
            payment_methods: Some(methods),
            ..Default::default()
        });
        info!(method_id = %method_id, "Default payment method changed");
        Ok(Outcome::Applied)
    }

    /// Create or replace the tenant's single billing address.
    pub async fn save_billing_address(
        &self,
        form: BillingAddressForm,
    ) -> CampusResult<BillingAddress> {
        validate::validate_billing_address(&form).into_result()?;

        self.round_trip().await;
        let aggregate = self.snapshot()?;

        let address = BillingAddress {
            id: aggregate
                .billing_address
                .as_ref()
                .map_or_else(Uuid::new_v4, |a| a.id),
            subscriber_id: aggregate.id,
            primary_address: form.primary_address.trim().to_string(),
            secondary_address: form
                .secondary_address
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            city: form.city.trim().to_string(),
            state: form.state.trim().to_string(),
            zip: form.zip.trim().to_string(),
            country: form.country.trim().to_string(),
        };

        self.store.merge(UpdateSubscriber {
            billing_address: Some(address.clone()),
            ..Default::default()
        });
        info!(address_id = %address.id, "Billing address saved");
        Ok(address)
    }
}
