//! Administrator roster service: add, delete and transfer admins, and
//! query the roster.

use campus_core::error::{CampusError, CampusResult, FieldErrors};
use campus_core::models::preference::Preference;
use campus_core::models::profile_image::ProfileImage;
use campus_core::models::subscriber::{Subscriber, UpdateSubscriber};
use campus_core::models::user::{CreateAdmin, Role, User};
use campus_core::pagination::PaginatedResult;
use campus_core::store::TenantStore;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ServiceConfig;
use crate::outcome::Outcome;
use crate::query::{self, AdminRow, FilterOptions, RosterQuery};
use crate::rules::{self, HeadConflict};
use crate::timezone::ViewerZone;
use crate::validate;

/// Result of a successful `add_admin`.
#[derive(Debug, Clone)]
pub struct AddedAdmin {
    pub user: User,
    /// Head displaced by the requested department assignment.
    pub conflict: Option<HeadConflict>,
}

#[derive(Debug, Clone)]
pub struct TransferOutcome {
    pub outcome: Outcome,
    pub conflict: Option<HeadConflict>,
}

/// Roster service.
///
/// Generic over the store so tests and the real dashboard share the same
/// rules. Every mutation commits at most one merge.
pub struct RosterService<S: TenantStore> {
    store: S,
    config: ServiceConfig,
}

impl<S: TenantStore> RosterService<S> {
    pub fn new(store: S, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn snapshot(&self) -> CampusResult<Subscriber> {
        self.store.get().ok_or(CampusError::NoTenantLoaded)
    }

    fn check_admin_capacity(aggregate: &Subscriber) -> CampusResult<()> {
        rules::check_capacity(aggregate, Role::Admin).map_err(|v| {
            warn!(code = v.code(), "Add admin rejected: {v}");
            CampusError::from(v)
        })
    }

    async fn round_trip(&self) {
        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }
    }

    /// Create an admin, with its profile image and preference record, and
    /// optionally make it head of a department.
    ///
    /// The plan's admin cap is checked first: a full roster is reported
    /// as `CapacityExceeded` whatever the form contains. Rejections are
    /// returned before the round trip; the cap is checked again after it
    /// against the fresh snapshot.
    pub async fn add_admin(&self, input: CreateAdmin) -> CampusResult<AddedAdmin> {
        let aggregate = self.snapshot()?;
        Self::check_admin_capacity(&aggregate)?;

        let mut errors: FieldErrors = validate::validate_admin(&input);
        if let Some(status) = input.user_status_id {
            if aggregate.status_name(status).is_none() {
                errors.push("user_status_id", "UNKNOWN_STATUS", "status does not exist");
            }
        }
        if let Some(dept) = input.department_id {
            if aggregate.department(dept).is_none() {
                errors.push("department_id", "UNKNOWN_DEPARTMENT", "department does not exist");
            }
        }
        errors.into_result()?;

        self.round_trip().await;
        let aggregate = self.snapshot()?;
        Self::check_admin_capacity(&aggregate)?;

        let user_status_id = input
            .user_status_id
            .or_else(|| aggregate.status_id_by_name("Active"))
            .or_else(|| aggregate.user_statuses.first().map(|s| s.id))
            .unwrap_or_else(Uuid::nil);

        let id = Uuid::new_v4();
        let image = ProfileImage {
            id: Uuid::new_v4(),
            user_id: id,
            file_url: format!("avatars/{id}.png"),
            is_active: true,
        };
        let user = User {
            id,
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            email: input.email.trim().to_string(),
            phone: input.phone.filter(|p| !p.trim().is_empty()),
            role: Role::Admin,
            user_status_id,
            is_online: false,
            is_verified: false,
            last_login: None,
            created_at: Utc::now(),
            profile_image_id: Some(image.id),
        };
        let preference = Preference {
            id: Uuid::new_v4(),
            user_id: id,
            timezone: input.timezone.filter(|tz| ViewerZone::parse(tz).is_some()),
            language: "en".into(),
            email_notifications: true,
        };

        let mut update = UpdateSubscriber::default();
        let mut conflict = None;
        if let Some(dept) = input.department_id {
            // The new user heads nothing yet, so only the displaced head matters.
            if let Some(assignment) = rules::assign_head(&aggregate, id, dept) {
                conflict = assignment.conflict;
                update.departments = Some(assignment.departments);
            }
        }

        let mut admins = aggregate.admins.clone();
        admins.push(user.clone());
        update.admins = Some(admins);

        let mut images = aggregate.profile_images.clone();
        images.push(image);
        update.profile_images = Some(images);

        let mut preferences = aggregate.preferences.clone();
        preferences.push(preference);
        update.preferences = Some(preferences);

        self.store.merge(update);
        info!(admin_id = %user.id, email = %user.email, "Admin added");

        Ok(AddedAdmin { user, conflict })
    }

    /// Delete an admin and everything that references it. Always allowed,
    /// even when the roster is at capacity.
    pub async fn delete_admin(&self, admin_id: Uuid) -> CampusResult<Outcome> {
        self.round_trip().await;
        let aggregate = self.snapshot()?;

        // Ids belonging to other roles are not this roster's to delete.
        if aggregate
            .find_user(admin_id)
            .is_some_and(|u| u.role != Role::Admin)
        {
            return Ok(Outcome::NoOp);
        }

        match rules::cascade_delete(&aggregate, admin_id) {
            Some(update) => {
                self.store.merge(update);
                info!(admin_id = %admin_id, "Admin deleted");
                Ok(Outcome::Applied)
            }
            None => Ok(Outcome::NoOp),
        }
    }

    /// The head a transfer would displace, without committing anything.
    pub fn preview_transfer(
        &self,
        admin_id: Uuid,
        department_id: Option<Uuid>,
    ) -> CampusResult<Option<HeadConflict>> {
        let department_id = department_id.ok_or(CampusError::DepartmentRequired)?;
        let aggregate = self.snapshot()?;
        Ok(rules::head_conflict(&aggregate, admin_id, department_id))
    }

    /// Make `admin_id` head of `department_id`.
    ///
    /// Any department the admin headed is released, and a different head
    /// already in place is replaced. The displaced head comes back as the
    /// conflict; callers warn about it through [`Self::preview_transfer`]
    /// before invoking this.
    pub async fn transfer_admin_department(
        &self,
        admin_id: Uuid,
        department_id: Option<Uuid>,
    ) -> CampusResult<TransferOutcome> {
        let department_id = department_id.ok_or(CampusError::DepartmentRequired)?;
        self.round_trip().await;
        let aggregate = self.snapshot()?;

        let no_op = TransferOutcome {
            outcome: Outcome::NoOp,
            conflict: None,
        };
        if !aggregate.admins.iter().any(|a| a.id == admin_id) {
            return Ok(no_op);
        }
        let Some(assignment) = rules::assign_head(&aggregate, admin_id, department_id) else {
            return Ok(no_op);
        };
        if assignment.departments == aggregate.departments {
            return Ok(no_op);
        }

        self.store.merge(UpdateSubscriber {
            departments: Some(assignment.departments),
            ..Default::default()
        });

        match &assignment.conflict {
            Some(c) => warn!(
                admin_id = %admin_id,
                department_id = %department_id,
                previous_head_id = %c.previous_head_id,
                "Admin transferred, previous head replaced"
            ),
            None => info!(admin_id = %admin_id, department_id = %department_id, "Admin transferred"),
        }

        Ok(TransferOutcome {
            outcome: Outcome::Applied,
            conflict: assignment.conflict,
        })
    }

    /// Run a roster query in the viewer's timezone. An empty store yields
    /// an empty page.
    pub fn query(&self, query: &RosterQuery, viewer_id: Option<Uuid>) -> PaginatedResult<AdminRow> {
        match self.store.get() {
            Some(aggregate) => {
                let zone =
                    ViewerZone::for_viewer(&aggregate, viewer_id, &self.config.default_timezone);
                query::run_query(&aggregate, query, zone)
            }
            None => PaginatedResult {
                items: Vec::new(),
                total: 0,
                page: 1,
                page_size: query.page_size().get(),
                page_count: 1,
            },
        }
    }

    pub fn filter_options(&self) -> Option<FilterOptions> {
        self.store.get().map(|a| query::filter_options(&a))
    }

    /// Roster query state at the configured default page size.
    pub fn new_query(&self) -> RosterQuery {
        RosterQuery::new(self.config.default_page_size)
    }
}
