//! Draw orchestration and per-participant lookup.

use rand::Rng;
use thiserror::Error;
use tracing::info;

use santa_types::models::{AssignmentMap, Participant};

use crate::assign::{DrawError, Generator};
use crate::auth::AdminSession;
use crate::registry::normalize_email;
use crate::store::{AssignmentStore, ParticipantStore, StoreError};

/// A persisted draw, with the participant list it was made from.
#[derive(Debug, Clone)]
pub struct DrawOutcome {
    pub participants: Vec<Participant>,
    pub assignments: AssignmentMap,
}

impl DrawOutcome {
    /// `(giver name, giftee name)` in registration order.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.participants
            .iter()
            .filter_map(|giver| {
                let assignment = self.assignments.get(&giver.email)?;
                let giftee = self
                    .participants
                    .iter()
                    .find(|p| p.email == assignment.giftee_email)?;
                Some((giver.name.as_str(), giftee.name.as_str()))
            })
            .collect()
    }
}

/// Generate a fresh assignment set and replace the stored one with it.
///
/// Requires an admin session. Existing assignments are overwritten without
/// confirmation; prompting is the caller's business.
pub fn execute<R: Rng + ?Sized>(
    session: &AdminSession,
    participants: &dyn ParticipantStore,
    assignments: &dyn AssignmentStore,
    generator: &Generator,
    rng: &mut R,
) -> Result<DrawOutcome, DrawError> {
    let people = participants.list()?;
    let drawn = generator.draw(&people, rng)?;
    assignments.replace_all(&drawn)?;

    info!(
        count = drawn.len(),
        session_issued_at = %session.issued_at(),
        "Assignments generated"
    );

    Ok(DrawOutcome { participants: people, assignments: drawn })
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Email is required")]
    MissingEmail,

    #[error("No assignment found for this email")]
    NoAssignment,

    #[error("Assignment found but giftee not found")]
    GifteeMissing,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Resolve who `email` is giving to.
pub fn lookup(
    participants: &dyn ParticipantStore,
    assignments: &dyn AssignmentStore,
    email: &str,
) -> Result<Participant, LookupError> {
    let email = normalize_email(email);
    if email.is_empty() {
        return Err(LookupError::MissingEmail);
    }

    let assignment = assignments.find(&email)?.ok_or(LookupError::NoAssignment)?;
    participants
        .list()?
        .into_iter()
        .find(|p| p.email == assignment.giftee_email)
        .ok_or(LookupError::GifteeMissing)
}
