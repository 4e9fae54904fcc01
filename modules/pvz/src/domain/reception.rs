//! Reception lifecycle rules.
//!
//! A reception is created `InProgress` and may move to `Closed` exactly once.
//! There is no way back, and a point has at most one reception in progress
//! at any time (enforced by the store's insert-if-no-active primitive).

use crate::contract::model::{Reception, ReceptionStatus};
use crate::domain::error::DomainError;

/// Status every new reception starts in.
pub const INITIAL_STATUS: ReceptionStatus = ReceptionStatus::InProgress;

/// Validate a status change.
pub fn transition(
    from: ReceptionStatus,
    to: ReceptionStatus,
) -> Result<ReceptionStatus, DomainError> {
    match (from, to) {
        (ReceptionStatus::InProgress, ReceptionStatus::Closed) => Ok(to),
        _ => Err(DomainError::invalid_transition(from, to)),
    }
}

/// Close a reception in place.
pub fn close(reception: &mut Reception) -> Result<(), DomainError> {
    reception.status = transition(reception.status, ReceptionStatus::Closed)?;
    Ok(())
}

pub fn is_active(reception: &Reception) -> bool {
    reception.status == ReceptionStatus::InProgress
}
