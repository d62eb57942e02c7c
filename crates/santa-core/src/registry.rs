use thiserror::Error;
use tracing::info;

use santa_types::models::{NewParticipant, Participant};

use crate::store::{ParticipantStore, StoreError};

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Name and email are required")]
    MissingFields,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("This email is already registered")]
    DuplicateIdentity,

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for RegistrationError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateIdentity(_) => Self::DuplicateIdentity,
            other => Self::Store(other),
        }
    }
}

/// Trim and lowercase an email so lookups are case-insensitive.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Validate and append a new participant.
pub fn register(
    store: &dyn ParticipantStore,
    name: &str,
    email: &str,
) -> Result<Participant, RegistrationError> {
    let name = name.trim();
    let email = normalize_email(email);

    if name.is_empty() || email.is_empty() {
        return Err(RegistrationError::MissingFields);
    }
    if !email.contains('@') {
        return Err(RegistrationError::InvalidEmail);
    }

    let participant = store.append(NewParticipant { name: name.to_string(), email })?;
    info!(email = %participant.email, "Participant registered");
    Ok(participant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn normalizes_input() {
        let store = MemoryStore::new();
        let p = register(&store, "  Alice ", " Alice@Example.COM ").unwrap();
        assert_eq!(p.name, "Alice");
        assert_eq!(p.email, "alice@example.com");
    }

    #[test]
    fn rejects_blank_and_malformed() {
        let store = MemoryStore::new();
        assert!(matches!(register(&store, "", "a@b.c"), Err(RegistrationError::MissingFields)));
        assert!(matches!(register(&store, "Bob", "   "), Err(RegistrationError::MissingFields)));
        assert!(matches!(register(&store, "Bob", "bob.example.com"), Err(RegistrationError::InvalidEmail)));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn second_registration_is_rejected() {
        let store = MemoryStore::new();
        register(&store, "Alice", "alice@example.com").unwrap();

        let err = register(&store, "Other Alice", "ALICE@example.com").unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateIdentity));
        assert_eq!(err.to_string(), "This email is already registered");
        assert_eq!(store.list().unwrap().len(), 1);
    }
}
