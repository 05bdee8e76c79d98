//! In-memory inventory state and how trail operations fold into it.

use std::collections::BTreeMap;

use tally_core::entities::{Assignment, ExtensionAttributes, Session};
use tally_core::enums::{EntityType, TrailOp};
use tally_core::trail::{TRAIL_VERSION, TrailOperation};

use crate::error::StoreError;

/// Sessions keyed by id, each session's assignments in creation order, and
/// the unmapped extract columns imported with them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryState {
    sessions: BTreeMap<String, Session>,
    assignments: BTreeMap<String, Vec<Assignment>>,
    extensions: BTreeMap<String, ExtensionAttributes>,
}

impl InventoryState {
    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    #[must_use]
    pub fn session(&self, id: &str) -> Option<&Session> {
        self.sessions.get(id)
    }

    /// Assignments of one session; empty for unknown sessions.
    #[must_use]
    pub fn assignments(&self, session_id: &str) -> &[Assignment] {
        self.assignments.get(session_id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn all_assignments(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.values().flatten()
    }

    #[must_use]
    pub fn find_assignment(&self, id: &str) -> Option<&Assignment> {
        self.all_assignments().find(|a| a.id == id)
    }

    /// Extension attributes of one session; `None` if nothing was kept.
    #[must_use]
    pub fn extensions(&self, session_id: &str) -> Option<&ExtensionAttributes> {
        self.extensions.get(session_id)
    }

    /// Insert or replace a session. Returns `true` if it was new.
    ///
    /// `item_count` is always recomputed from the stored assignments.
    pub fn upsert_session(&mut self, mut session: Session) -> bool {
        session.item_count = count(self.assignments(&session.id));
        self.sessions.insert(session.id.clone(), session).is_none()
    }

    /// Insert or replace an assignment under its session. Returns `true` if
    /// it was new.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the owning session is unknown.
    pub fn upsert_assignment(&mut self, assignment: Assignment) -> Result<bool, StoreError> {
        let session_id = assignment.session_id.clone();
        let Some(session) = self.sessions.get_mut(&session_id) else {
            return Err(StoreError::session_not_found(&session_id));
        };
        let items = self.assignments.entry(session_id).or_default();
        let created = match items.iter_mut().find(|a| a.id == assignment.id) {
            Some(existing) => {
                *existing = assignment;
                false
            }
            None => {
                items.push(assignment);
                true
            }
        };
        session.item_count = count(items);
        Ok(created)
    }

    /// Store the extension columns of one material. Returns `true` if the
    /// material had none before.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the owning session is unknown.
    pub fn set_extension(
        &mut self,
        session_id: &str,
        material_id: &str,
        columns: BTreeMap<String, String>,
    ) -> Result<bool, StoreError> {
        if !self.sessions.contains_key(session_id) {
            return Err(StoreError::session_not_found(session_id));
        }
        let by_material = &mut self
            .extensions
            .entry(session_id.to_string())
            .or_default()
            .by_material;
        Ok(by_material.insert(material_id.to_string(), columns).is_none())
    }

    /// Fold one trail operation into the state. Returns `true` if it created
    /// an entity.
    ///
    /// # Errors
    ///
    /// - `Trail` for an unsupported version or a payload that does not
    ///   deserialize into the entity it names
    /// - `NotFound` for an assignment or extension whose session has not
    ///   been replayed
    pub fn apply(&mut self, op: &TrailOperation) -> Result<bool, StoreError> {
        if op.v != TRAIL_VERSION {
            return Err(StoreError::Trail(format!(
                "unsupported trail version {} for {} {}",
                op.v, op.entity, op.id
            )));
        }

        let created = match op.entity {
            EntityType::Session => {
                let session: Session = decode(op)?;
                self.upsert_session(session)
            }
            EntityType::Assignment => {
                let assignment: Assignment = decode(op)?;
                if !assignment.invariants_hold() {
                    return Err(StoreError::Trail(format!(
                        "assignment {} in trail breaks the count invariants",
                        op.id
                    )));
                }
                self.upsert_assignment(assignment)?
            }
            EntityType::Extension => {
                let columns: BTreeMap<String, String> = decode(op)?;
                self.set_extension(&op.ses, &op.id, columns)?
            }
        };

        if created != (op.op == TrailOp::Create) {
            tracing::warn!(
                op = %op.op,
                entity = %op.entity,
                id = %op.id,
                "trail operation does not match existing state"
            );
        }
        Ok(created)
    }
}

fn decode<T: serde::de::DeserializeOwned>(op: &TrailOperation) -> Result<T, StoreError> {
    let value: T = serde_json::from_value(op.data.clone())
        .map_err(|e| StoreError::Trail(format!("{} {}: {e}", op.entity, op.id)))?;
    Ok(value)
}

fn count(items: &[Assignment]) -> u32 {
    u32::try_from(items.len()).unwrap_or(u32::MAX)
}
