use thiserror::Error;
use tracing::{info, warn};

use santa_types::models::{AssignmentMap, NotificationOutcome, Participant};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Email configuration not set")]
    NotConfigured,

    #[error("invalid address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("could not build message: {0}")]
    Compose(String),

    #[error("{0}")]
    Transport(String),
}

/// What a participant needs to hear about their draw.
#[derive(Debug, Clone, Copy)]
pub struct Notice<'a> {
    pub recipient_email: &'a str,
    pub recipient_name: &'a str,
    pub giftee_name: &'a str,
    pub giftee_email: &'a str,
}

pub trait Notifier: Send + Sync {
    fn send(&self, notice: &Notice<'_>) -> Result<(), NotifyError>;
}

/// Tell every assigned participant who their giftee is.
///
/// Sends run one after another. A failure is recorded in the returned list
/// and the remaining recipients are still attempted.
pub fn notify_all(
    participants: &[Participant],
    assignments: &AssignmentMap,
    notifier: &dyn Notifier,
) -> Vec<NotificationOutcome> {
    let mut outcomes = Vec::with_capacity(participants.len());

    for participant in participants {
        let Some(assignment) = assignments.get(&participant.email) else {
            continue;
        };
        let Some(giftee) = participants.iter().find(|p| p.email == assignment.giftee_email) else {
            warn!(giver = %participant.email, "Giftee not among participants, skipping");
            continue;
        };

        let notice = Notice {
            recipient_email: &participant.email,
            recipient_name: &participant.name,
            giftee_name: &giftee.name,
            giftee_email: &giftee.email,
        };

        let (success, message) = match notifier.send(&notice) {
            Ok(()) => {
                info!(to = %participant.email, "Assignment email sent");
                (true, "Email sent successfully".to_string())
            }
            Err(e) => {
                warn!(to = %participant.email, error = %e, "Assignment email failed");
                (false, format!("Failed to send email: {e}"))
            }
        };

        outcomes.push(NotificationOutcome {
            participant: participant.name.clone(),
            email: participant.email.clone(),
            success,
            message,
        });
    }

    outcomes
}
