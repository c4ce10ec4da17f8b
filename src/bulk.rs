use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::api::devices::DeviceClient;
use crate::api::models::{BulkOutcome, DeviceStatus};
use crate::cache::QueryCache;
use crate::error::FetchError;
use crate::query::QueryDescriptor;
use crate::selection::SelectionSet;

// ─── Invalidation rule table ────────────────────────────────────────────────

/// Cache regions a mutation can touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheScope {
    /// Every descriptor addressing the device collection, whatever the
    /// filter — status and department changes shift filtered counts
    /// everywhere.
    Devices,
    DashboardStats,
    Departments,
}

impl CacheScope {
    pub fn matches(&self, descriptor: &QueryDescriptor) -> bool {
        match self {
            CacheScope::Devices => descriptor.is_devices(),
            CacheScope::DashboardStats => descriptor.path() == "dashboard/stats",
            CacheScope::Departments => descriptor.path() == "departments",
        }
    }
}

/// What a device mutation did, independent of whether it was applied to one
/// device or a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    StatusChange,
    DepartmentChange,
    Deletion,
}

/// The single place that says which caches a mutation invalidates. Both the
/// orchestrator and the single-device mutation paths consult this table;
/// nothing invalidates inline.
pub fn invalidation_scopes(kind: MutationKind) -> &'static [CacheScope] {
    match kind {
        MutationKind::StatusChange => &[CacheScope::Devices, CacheScope::DashboardStats],
        MutationKind::DepartmentChange => {
            &[CacheScope::Devices, CacheScope::DashboardStats, CacheScope::Departments]
        }
        MutationKind::Deletion => {
            &[CacheScope::Devices, CacheScope::DashboardStats, CacheScope::Departments]
        }
    }
}

pub(crate) fn invalidate_scopes(cache: &QueryCache, scopes: &[CacheScope]) {
    for scope in scopes {
        cache.invalidate(|d| scope.matches(d));
    }
}

// ─── Bulk actions ───────────────────────────────────────────────────────────

/// A mutation applied to the whole selection in one request.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkAction {
    SetStatus(DeviceStatus),
    AssignDepartment(Option<Uuid>),
    Delete,
}

impl BulkAction {
    /// Destructive and department-reassigning actions park in `Confirming`
    /// first. Re-activating devices is the one harmless direction and goes
    /// straight through.
    pub fn requires_confirmation(&self) -> bool {
        !matches!(self, BulkAction::SetStatus(DeviceStatus::Active))
    }

    pub fn mutation_kind(&self) -> MutationKind {
        match self {
            BulkAction::SetStatus(_) => MutationKind::StatusChange,
            BulkAction::AssignDepartment(_) => MutationKind::DepartmentChange,
            BulkAction::Delete => MutationKind::Deletion,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            BulkAction::SetStatus(DeviceStatus::Active) => "activate",
            BulkAction::SetStatus(DeviceStatus::Inactive) => "deactivate",
            BulkAction::AssignDepartment(_) => "assign department",
            BulkAction::Delete => "delete",
        }
    }
}

/// Where the orchestrator stands. Views render action buttons disabled
/// while `Applying` and surface `Succeeded`/`Failed` messages.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkPhase {
    Idle,
    Confirming(BulkAction),
    Applying(BulkAction),
    Succeeded(BulkOutcome),
    Failed(String),
}

/// Misuse of the state machine, as opposed to a failed request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BulkFlowError {
    #[error("a bulk action is already in flight")]
    Busy,
    #[error("the action awaits confirmation")]
    AwaitingConfirmation,
    #[error("no bulk action pending")]
    NothingPending,
    #[error("no devices selected")]
    EmptySelection,
}

#[derive(Debug, Clone, Error)]
pub enum BulkError {
    #[error(transparent)]
    Flow(#[from] BulkFlowError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

// ─── Orchestrator ───────────────────────────────────────────────────────────

/// Drives one bulk action at a time: `Idle → Confirming → Applying →
/// {Succeeded, Failed}`.
///
/// On success the dependent caches are invalidated per the rule table and
/// the selection is cleared *before* the phase reports `Succeeded`, so no
/// view can observe a successful action while still being served
/// pre-mutation data. On failure the selection is left untouched and the
/// server's message is surfaced verbatim; the `affected` count is trusted
/// as-is, with no per-item reconciliation.
pub struct BulkOrchestrator {
    devices: DeviceClient,
    cache: Arc<QueryCache>,
    phase: BulkPhase,
    pending: Option<BulkAction>,
    confirmed: bool,
}

impl BulkOrchestrator {
    pub fn new(devices: DeviceClient, cache: Arc<QueryCache>) -> Self {
        BulkOrchestrator {
            devices,
            cache,
            phase: BulkPhase::Idle,
            pending: None,
            confirmed: false,
        }
    }

    pub fn phase(&self) -> &BulkPhase {
        &self.phase
    }

    pub fn is_applying(&self) -> bool {
        matches!(self.phase, BulkPhase::Applying(_))
    }

    /// Stages an action. Actions that require confirmation move to
    /// `Confirming`; the rest are immediately ready for `apply`.
    pub fn begin(&mut self, action: BulkAction) -> Result<(), BulkFlowError> {
        if self.is_applying() {
            return Err(BulkFlowError::Busy);
        }
        self.confirmed = !action.requires_confirmation();
        self.phase = if self.confirmed {
            BulkPhase::Idle
        } else {
            BulkPhase::Confirming(action.clone())
        };
        self.pending = Some(action);
        Ok(())
    }

    /// Acknowledges the confirmation step.
    pub fn confirm(&mut self) -> Result<(), BulkFlowError> {
        match self.phase {
            BulkPhase::Confirming(_) => {
                self.confirmed = true;
                Ok(())
            }
            _ => Err(BulkFlowError::NothingPending),
        }
    }

    /// Abandons a staged action. No-op while a request is in flight.
    pub fn cancel(&mut self) {
        if !self.is_applying() {
            self.pending = None;
            self.confirmed = false;
            self.phase = BulkPhase::Idle;
        }
    }

    /// Sends the staged mutation for the current selection. Exactly one
    /// request is in flight per orchestrator; the staged action survives a
    /// failure so the user can retry without re-confirming.
    pub async fn apply(&mut self, selection: &mut SelectionSet) -> Result<BulkOutcome, BulkError> {
        if self.is_applying() {
            return Err(BulkFlowError::Busy.into());
        }
        let action = self.pending.clone().ok_or(BulkFlowError::NothingPending)?;
        if !self.confirmed {
            return Err(BulkFlowError::AwaitingConfirmation.into());
        }
        let ids = selection.ids();
        if ids.is_empty() {
            return Err(BulkFlowError::EmptySelection.into());
        }

        self.phase = BulkPhase::Applying(action.clone());
        tracing::info!("bulk {} for {} device(s)", action.label(), ids.len());

        let result = match &action {
            BulkAction::SetStatus(status) => {
                self.devices.bulk_update_status(&ids, *status).await
            }
            BulkAction::AssignDepartment(dept) => {
                self.devices.bulk_update_department(&ids, *dept).await
            }
            BulkAction::Delete => self.devices.bulk_delete(&ids).await,
        };

        match result {
            Ok(outcome) => {
                // Reconcile every dependent view before success is
                // observable, then drop the selection.
                invalidate_scopes(&self.cache, invalidation_scopes(action.mutation_kind()));
                selection.clear();
                if outcome.affected < ids.len() as u64 {
                    tracing::warn!(
                        "bulk {} affected {} of {} requested devices",
                        action.label(),
                        outcome.affected,
                        ids.len()
                    );
                }
                self.pending = None;
                self.confirmed = false;
                self.phase = BulkPhase::Succeeded(outcome.clone());
                Ok(outcome)
            }
            Err(err) => {
                tracing::warn!("bulk {} failed: {}", action.label(), err);
                self.phase = BulkPhase::Failed(err.user_message());
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_activation_skips_confirmation() {
        assert!(!BulkAction::SetStatus(DeviceStatus::Active).requires_confirmation());
        assert!(BulkAction::SetStatus(DeviceStatus::Inactive).requires_confirmation());
        assert!(BulkAction::AssignDepartment(None).requires_confirmation());
        assert!(BulkAction::AssignDepartment(Some(Uuid::new_v4())).requires_confirmation());
        assert!(BulkAction::Delete.requires_confirmation());
    }

    #[test]
    fn rule_table_always_covers_devices_and_dashboard() {
        for kind in [
            MutationKind::StatusChange,
            MutationKind::DepartmentChange,
            MutationKind::Deletion,
        ] {
            let scopes = invalidation_scopes(kind);
            assert!(scopes.contains(&CacheScope::Devices));
            assert!(scopes.contains(&CacheScope::DashboardStats));
        }
    }

    #[test]
    fn department_membership_changes_reach_department_listings() {
        assert!(invalidation_scopes(MutationKind::DepartmentChange)
            .contains(&CacheScope::Departments));
        assert!(invalidation_scopes(MutationKind::Deletion).contains(&CacheScope::Departments));
        assert!(!invalidation_scopes(MutationKind::StatusChange)
            .contains(&CacheScope::Departments));
    }

    #[test]
    fn devices_scope_matches_any_filter() {
        let scope = CacheScope::Devices;
        assert!(scope.matches(&QueryDescriptor::new("devices")));
        assert!(scope.matches(&QueryDescriptor::new("devices").param("status", "inactive")));
        assert!(scope.matches(&QueryDescriptor::new("devices/abc/activity")));
        assert!(!scope.matches(&QueryDescriptor::new("departments")));
    }
}
