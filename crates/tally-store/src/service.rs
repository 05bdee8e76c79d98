//! Service layer orchestrating inventory mutations with the JSONL trail.
//!
//! `InventoryService` owns the in-memory [`InventoryState`] and the
//! [`TrailWriter`]. The reconciliation rules live in `tally-engine`; this
//! layer decides *when* they run and makes their results durable.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tally_core::audit_detail::{CountChangedDetail, StatusChangedDetail};
use tally_core::entities::{
    Assignment, ExtensionAttributes, ExtractRow, Metrics, Quantity, Session, SessionReport,
};
use tally_core::enums::{EntityType, InventoryType, SessionStatus, TrailOp};
use tally_core::errors::{CoreError, ReconcileError};
use tally_core::ids::{IdGenerator, PREFIX_SESSION, RandomIds, UniqueIds};
use tally_core::responses::{
    AssignmentChangeResponse, DashboardResponse, FinalizeResponse, RebuildResponse,
    SessionMetricsResponse,
};
use tally_core::trail::TrailOperation;
use tally_engine as engine;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::state::InventoryState;
use crate::trail::{TrailReplayer, TrailWriter};

type BoxedIds = Box<dyn IdGenerator + Send + Sync>;

struct Inner {
    state: InventoryState,
    ids: BoxedIds,
}

/// Orchestrates inventory mutations with the JSONL trail.
///
/// Every mutation method follows this protocol:
/// 1. Read the current entities and check the session is still active
/// 2. Run the engine operation on a snapshot
/// 3. Take the write lock and compare the stored assignment with the snapshot
/// 4. Append the new entity state to the trail
/// 5. Commit it in memory
pub struct InventoryService {
    inner: RwLock<Inner>,
    trail: TrailWriter,
}

impl InventoryService {
    /// Create an empty service with random ids.
    #[must_use]
    pub fn new(trail: TrailWriter) -> Self {
        Self::with_ids(trail, RandomIds::new())
    }

    /// Create an empty service drawing ids from `ids`.
    #[must_use]
    pub fn with_ids(trail: TrailWriter, ids: impl IdGenerator + Send + Sync + 'static) -> Self {
        Self {
            inner: RwLock::new(Inner {
                state: InventoryState::default(),
                ids: Box::new(ids),
            }),
            trail,
        }
    }

    /// Open the store at `trail_dir`, replaying any existing trail.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the directory cannot be created or the trail
    /// does not replay cleanly.
    pub async fn open(trail_dir: PathBuf) -> Result<Self, StoreError> {
        let service = Self::new(TrailWriter::new(trail_dir)?);
        service.rebuild().await?;
        Ok(service)
    }

    /// Access the trail writer.
    #[must_use]
    pub const fn trail(&self) -> &TrailWriter {
        &self.trail
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// All sessions, newest first.
    pub async fn load_sessions(&self) -> Vec<Session> {
        let inner = self.inner.read().await;
        let mut sessions: Vec<Session> = inner.state.sessions().cloned().collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        sessions
    }

    /// # Errors
    ///
    /// Returns `NotFound` for an unknown session.
    pub async fn get_session(&self, session_id: &str) -> Result<Session, StoreError> {
        let inner = self.inner.read().await;
        inner
            .state
            .session(session_id)
            .cloned()
            .ok_or_else(|| StoreError::session_not_found(session_id))
    }

    /// Assignments of a session in creation order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown session.
    pub async fn load_assignments(&self, session_id: &str) -> Result<Vec<Assignment>, StoreError> {
        let inner = self.inner.read().await;
        if inner.state.session(session_id).is_none() {
            return Err(StoreError::session_not_found(session_id));
        }
        Ok(inner.state.assignments(session_id).to_vec())
    }

    /// # Errors
    ///
    /// Returns `NotFound` for an unknown assignment.
    pub async fn get_assignment(&self, assignment_id: &str) -> Result<Assignment, StoreError> {
        let inner = self.inner.read().await;
        inner
            .state
            .find_assignment(assignment_id)
            .cloned()
            .ok_or_else(|| StoreError::assignment_not_found(assignment_id))
    }

    /// Unmapped extract columns kept for a session, keyed by material id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown session.
    pub async fn extensions(&self, session_id: &str) -> Result<ExtensionAttributes, StoreError> {
        let inner = self.inner.read().await;
        if inner.state.session(session_id).is_none() {
            return Err(StoreError::session_not_found(session_id));
        }
        Ok(inner.state.extensions(session_id).cloned().unwrap_or_default())
    }

    // -----------------------------------------------------------------------
    // Sessions
    // -----------------------------------------------------------------------

    /// Open a new, empty session.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for a blank name, or `Trail` if the
    /// trail write fails.
    pub async fn create_session(
        &self,
        name: &str,
        inventory_type: InventoryType,
        created_by: &str,
    ) -> Result<Session, StoreError> {
        if name.trim().is_empty() {
            return Err(CoreError::Validation("session name must not be empty".into()).into());
        }

        let mut inner = self.inner.write().await;
        let taken: Vec<String> = inner.state.sessions().map(|s| s.id.clone()).collect();
        let id = UniqueIds::new(&mut inner.ids, taken).next_id(PREFIX_SESSION);

        let session = Session {
            id,
            name: name.trim().to_string(),
            inventory_type,
            created_by: created_by.to_string(),
            created_at: Utc::now(),
            status: SessionStatus::Active,
            item_count: 0,
            finalized_at: None,
        };

        self.trail.append(&session_op(TrailOp::Create, &session)?)?;
        inner.state.upsert_session(session.clone());
        info!(session = %session.id, kind = %inventory_type, "session created");
        Ok(session)
    }

    /// Close a session once nothing is pending.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown session
    /// - `Reconcile(SessionFinalized | IncompleteInventory)` from the guard
    pub async fn finalize_session(&self, session_id: &str) -> Result<FinalizeResponse, StoreError> {
        let mut inner = self.inner.write().await;
        let session = inner
            .state
            .session(session_id)
            .ok_or_else(|| StoreError::session_not_found(session_id))?;
        let assignments = inner.state.assignments(session_id);

        let finalized = engine::finalize(session, assignments, Utc::now())?;
        let report = engine::report(&finalized, assignments).ok_or_else(|| {
            StoreError::InvalidState(format!("finalized session {session_id} has no report"))
        })?;

        self.trail.append(&session_op(TrailOp::Transition, &finalized)?)?;
        inner.state.upsert_session(finalized.clone());
        info!(
            session = %session_id,
            accuracy = report.metrics.accuracy,
            "session finalized"
        );
        Ok(FinalizeResponse {
            session: finalized,
            report,
        })
    }

    /// Metrics of one session, overall and per auditor.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown session.
    pub async fn session_metrics(
        &self,
        session_id: &str,
    ) -> Result<SessionMetricsResponse, StoreError> {
        let inner = self.inner.read().await;
        let session = inner
            .state
            .session(session_id)
            .ok_or_else(|| StoreError::session_not_found(session_id))?;
        let assignments = inner.state.assignments(session_id);
        Ok(SessionMetricsResponse {
            session: session.clone(),
            metrics: engine::summarize(assignments),
            by_auditor: engine::by_auditor(assignments),
        })
    }

    /// Reports of every finalized session, most recently finalized first.
    ///
    /// Finalized sessions are immutable, so each report equals the snapshot
    /// taken when the session was closed.
    pub async fn history(&self) -> Vec<SessionReport> {
        let inner = self.inner.read().await;
        let mut reports: Vec<SessionReport> = inner
            .state
            .sessions()
            .filter_map(|s| engine::report(s, inner.state.assignments(&s.id)))
            .collect();
        reports.sort_by(|a, b| b.finalized_at.cmp(&a.finalized_at));
        reports
    }

    /// Workspace-wide counters. "Today" is the current UTC date.
    pub async fn dashboard(&self) -> DashboardResponse {
        self.dashboard_at(Utc::now()).await
    }

    async fn dashboard_at(&self, now: DateTime<Utc>) -> DashboardResponse {
        let inner = self.inner.read().await;
        let today = now.date_naive();

        let (mut active_sessions, mut finalized_sessions) = (0u32, 0u32);
        let mut metrics = Metrics::default();
        for session in inner.state.sessions() {
            match session.status {
                SessionStatus::Active => active_sessions += 1,
                SessionStatus::Finalized => finalized_sessions += 1,
            }
            metrics = metrics.merge(engine::summarize(inner.state.assignments(&session.id)));
        }

        let counts_today = inner
            .state
            .all_assignments()
            .filter(|a| a.controlled_at.is_some_and(|at| at.date_naive() == today))
            .count();

        DashboardResponse {
            active_sessions,
            finalized_sessions,
            counts_today: u32::try_from(counts_today).unwrap_or(u32::MAX),
            accuracy: metrics.accuracy,
            open_alerts: metrics.error,
        }
    }

    // -----------------------------------------------------------------------
    // Assignments
    // -----------------------------------------------------------------------

    /// Turn extract rows into pending assignments for `auditor_id`.
    ///
    /// New ids never collide with ids already in the store. Either every
    /// row becomes an assignment or none does.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown session
    /// - `Reconcile(SessionFinalized)` for a finalized session
    /// - `Reconcile(DuplicateRow | InvalidRow | InvalidQuantity)` from the engine,
    ///   including a material already assigned in this session
    pub async fn push_import(
        &self,
        session_id: &str,
        auditor_id: &str,
        rows: &[ExtractRow],
    ) -> Result<Vec<Assignment>, StoreError> {
        self.push_import_with_extensions(
            session_id,
            auditor_id,
            rows,
            &ExtensionAttributes::default(),
        )
        .await
    }

    /// [`Self::push_import`], also keeping the unmapped columns of the
    /// imported materials. Columns of materials not in `rows` are dropped.
    ///
    /// # Errors
    ///
    /// As [`Self::push_import`].
    pub async fn push_import_with_extensions(
        &self,
        session_id: &str,
        auditor_id: &str,
        rows: &[ExtractRow],
        extensions: &ExtensionAttributes,
    ) -> Result<Vec<Assignment>, StoreError> {
        let mut inner = self.inner.write().await;
        let Inner { state, ids } = &mut *inner;

        let session = state
            .session(session_id)
            .ok_or_else(|| StoreError::session_not_found(session_id))?;
        engine::ensure_mutable(session)?;

        let materials: BTreeSet<&str> = state
            .assignments(session_id)
            .iter()
            .map(|a| a.material_id.as_str())
            .collect();
        if let Some(row) = rows.iter().find(|r| materials.contains(r.material_id.as_str())) {
            return Err(ReconcileError::DuplicateRow {
                material_id: row.material_id.clone(),
            }
            .into());
        }

        // Assignment ids are looked up across sessions, so they must be
        // unique store-wide.
        let taken: Vec<String> = state.all_assignments().map(|a| a.id.clone()).collect();
        let mut unique_ids = UniqueIds::new(ids, taken);
        let created =
            engine::create_assignments(session_id, auditor_id, rows, &mut unique_ids, Utc::now())?;

        let columns: Vec<(&str, &BTreeMap<String, String>)> = rows
            .iter()
            .filter_map(|r| {
                extensions
                    .get(&r.material_id)
                    .filter(|c| !c.is_empty())
                    .map(|c| (r.material_id.as_str(), c))
            })
            .collect();

        self.save_new(state, session_id, &created, &columns)?;
        info!(
            session = %session_id,
            auditor = %auditor_id,
            created = created.len(),
            extended = columns.len(),
            "extract imported"
        );
        Ok(created)
    }

    /// Persist assignments of one session as they are.
    ///
    /// Unknown ids are created; known ids are replaced, provided the status
    /// change is allowed by the control state machine.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown session
    /// - `Reconcile(SessionFinalized)` for a finalized session
    /// - `InvalidState` for an assignment of another session or one whose
    ///   count fields contradict its status
    /// - `Core(InvalidTransition)` for a disallowed status change
    pub async fn save_assignments(
        &self,
        session_id: &str,
        assignments: Vec<Assignment>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let session = inner
            .state
            .session(session_id)
            .ok_or_else(|| StoreError::session_not_found(session_id))?;
        engine::ensure_mutable(session)?;

        let mut ops = Vec::with_capacity(assignments.len());
        for assignment in &assignments {
            if assignment.session_id != session_id {
                return Err(StoreError::InvalidState(format!(
                    "assignment {} belongs to session {}, not {session_id}",
                    assignment.id, assignment.session_id
                )));
            }
            if !assignment.invariants_hold() {
                return Err(StoreError::InvalidState(format!(
                    "assignment {} has count fields that contradict status {}",
                    assignment.id, assignment.status
                )));
            }
            let stored = inner.state.find_assignment(&assignment.id);
            if let Some(stored) = stored {
                check_transition(stored, assignment)?;
            }
            ops.push(assignment_op(op_for(stored, assignment), assignment)?);
        }

        self.trail.append_all(&ops)?;
        for assignment in assignments {
            inner.state.upsert_assignment(assignment)?;
        }
        Ok(())
    }

    /// Record the first physical count of an assignment.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown assignment
    /// - `Reconcile(..)` from the session guard or the engine
    /// - `StaleAssignment` if the assignment changed concurrently
    pub async fn record_count(
        &self,
        assignment_id: &str,
        physical_quantity: Quantity,
        notes: Option<&str>,
    ) -> Result<AssignmentChangeResponse, StoreError> {
        let before = self.mutable_snapshot(assignment_id).await?;
        let after = engine::record_count(&before, physical_quantity, notes, Utc::now())?;
        self.commit_change(&before, after, TrailOp::Count).await
    }

    /// Replace the count of a controlled or errored assignment.
    ///
    /// # Errors
    ///
    /// As [`Self::record_count`].
    pub async fn correct_count(
        &self,
        assignment_id: &str,
        physical_quantity: Quantity,
        notes: Option<&str>,
    ) -> Result<AssignmentChangeResponse, StoreError> {
        let before = self.mutable_snapshot(assignment_id).await?;
        let after = engine::correct_count(&before, physical_quantity, notes)?;
        self.commit_change(&before, after, TrailOp::Correct).await
    }

    /// Acknowledge a counted assignment. Terminal.
    ///
    /// # Errors
    ///
    /// As [`Self::record_count`].
    pub async fn validate_assignment(
        &self,
        assignment_id: &str,
    ) -> Result<AssignmentChangeResponse, StoreError> {
        let before = self.mutable_snapshot(assignment_id).await?;
        let after = engine::validate(&before)?;
        self.commit_change(&before, after, TrailOp::Transition).await
    }

    /// Store `updated` only if the stored assignment still equals
    /// `expected`. Returns the stored value.
    ///
    /// `updated` must keep the id and session of `expected` and be a legal
    /// successor under the control state machine.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown assignment
    /// - `Reconcile(SessionFinalized)` if the session was finalized meanwhile
    /// - `StaleAssignment` if the stored assignment differs from `expected`
    /// - `InvalidState` if `updated` names another assignment or session, or
    ///   its count fields contradict its status
    /// - `Core(InvalidTransition)` for a disallowed status change
    pub async fn compare_and_save(
        &self,
        expected: &Assignment,
        updated: Assignment,
        op: TrailOp,
    ) -> Result<Assignment, StoreError> {
        let mut inner = self.inner.write().await;

        let stored = inner
            .state
            .find_assignment(&expected.id)
            .ok_or_else(|| StoreError::assignment_not_found(&expected.id))?;
        if stored != expected {
            return Err(StoreError::StaleAssignment {
                assignment_id: expected.id.clone(),
                expected: expected.status,
                found: stored.status,
            });
        }
        if updated.id != stored.id || updated.session_id != stored.session_id {
            return Err(StoreError::InvalidState(format!(
                "update for assignment {} names assignment {} of session {}",
                stored.id, updated.id, updated.session_id
            )));
        }
        if !updated.invariants_hold() {
            return Err(StoreError::InvalidState(format!(
                "assignment {} has count fields that contradict status {}",
                updated.id, updated.status
            )));
        }
        check_transition(stored, &updated)?;
        let session = inner
            .state
            .session(&stored.session_id)
            .ok_or_else(|| StoreError::session_not_found(&stored.session_id))?;
        engine::ensure_mutable(session)?;

        self.trail.append(&assignment_op(op, &updated)?)?;
        debug!(
            assignment = %updated.id,
            from = %expected.status,
            to = %updated.status,
            op = %op,
            "assignment updated"
        );
        inner.state.upsert_assignment(updated.clone())?;
        Ok(updated)
    }

    /// Replace the whole state with a replay of the trail directory.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Trail` if the trail does not replay cleanly; the
    /// current state is kept in that case.
    pub async fn rebuild(&self) -> Result<RebuildResponse, StoreError> {
        if !self.trail.is_enabled() {
            return Err(StoreError::InvalidState(
                "cannot rebuild without a trail directory".into(),
            ));
        }
        let (state, response) = TrailReplayer::replay(self.trail.trail_dir())?;
        self.inner.write().await.state = state;
        Ok(response)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn mutable_snapshot(&self, assignment_id: &str) -> Result<Assignment, StoreError> {
        let inner = self.inner.read().await;
        let assignment = inner
            .state
            .find_assignment(assignment_id)
            .ok_or_else(|| StoreError::assignment_not_found(assignment_id))?;
        let session = inner
            .state
            .session(&assignment.session_id)
            .ok_or_else(|| StoreError::session_not_found(&assignment.session_id))?;
        engine::ensure_mutable(session)?;
        Ok(assignment.clone())
    }

    async fn commit_change(
        &self,
        before: &Assignment,
        after: Assignment,
        op: TrailOp,
    ) -> Result<AssignmentChangeResponse, StoreError> {
        let after = self.compare_and_save(before, after, op).await?;
        Ok(AssignmentChangeResponse {
            status: StatusChangedDetail::between(before, &after),
            count: if op == TrailOp::Transition {
                None
            } else {
                CountChangedDetail::between(before, &after)
            },
            assignment: after,
        })
    }

    fn save_new(
        &self,
        state: &mut InventoryState,
        session_id: &str,
        created: &[Assignment],
        columns: &[(&str, &BTreeMap<String, String>)],
    ) -> Result<(), StoreError> {
        let mut ops = created
            .iter()
            .map(|a| assignment_op(TrailOp::Create, a))
            .collect::<Result<Vec<_>, _>>()?;
        for (material_id, values) in columns {
            ops.push(extension_op(session_id, material_id, values)?);
        }
        self.trail.append_all(&ops)?;
        for assignment in created {
            state.upsert_assignment(assignment.clone())?;
        }
        for (material_id, values) in columns {
            state.set_extension(session_id, material_id, (*values).clone())?;
        }
        Ok(())
    }
}

fn check_transition(stored: &Assignment, updated: &Assignment) -> Result<(), CoreError> {
    let allowed = if stored.status.is_terminal() {
        stored == updated
    } else {
        stored.status == updated.status || stored.status.can_transition_to(updated.status)
    };
    if allowed {
        return Ok(());
    }
    Err(CoreError::InvalidTransition {
        entity_type: EntityType::Assignment.to_string(),
        id: stored.id.clone(),
        from: stored.status.to_string(),
        to: updated.status.to_string(),
    })
}

fn op_for(stored: Option<&Assignment>, updated: &Assignment) -> TrailOp {
    match stored {
        None => TrailOp::Create,
        Some(stored) if stored.physical_quantity == updated.physical_quantity => {
            TrailOp::Transition
        }
        Some(stored) if stored.physical_quantity.is_none() => TrailOp::Count,
        Some(_) => TrailOp::Correct,
    }
}

fn session_op(op: TrailOp, session: &Session) -> Result<TrailOperation, StoreError> {
    TrailOperation::record(
        Utc::now(),
        &session.id,
        op,
        EntityType::Session,
        &session.id,
        session,
    )
    .map_err(|e| StoreError::Trail(e.to_string()))
}

fn assignment_op(op: TrailOp, assignment: &Assignment) -> Result<TrailOperation, StoreError> {
    TrailOperation::record(
        Utc::now(),
        &assignment.session_id,
        op,
        EntityType::Assignment,
        &assignment.id,
        assignment,
    )
    .map_err(|e| StoreError::Trail(e.to_string()))
}

fn extension_op(
    session_id: &str,
    material_id: &str,
    columns: &BTreeMap<String, String>,
) -> Result<TrailOperation, StoreError> {
    TrailOperation::record(
        Utc::now(),
        session_id,
        TrailOp::Create,
        EntityType::Extension,
        material_id,
        columns,
    )
    .map_err(|e| StoreError::Trail(e.to_string()))
}
