//! Repository interfaces for participants and assignments.

use std::sync::Mutex;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use santa_types::models::{Assignment, AssignmentMap, NewParticipant, Participant};

use crate::registry::normalize_email;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("This email is already registered: {0}")]
    DuplicateIdentity(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub trait ParticipantStore: Send + Sync {
    /// All participants in registration order.
    fn list(&self) -> Result<Vec<Participant>, StoreError>;

    /// Insert a participant, rejecting an email that is already registered.
    fn append(&self, new: NewParticipant) -> Result<Participant, StoreError>;
}

pub trait AssignmentStore: Send + Sync {
    /// Drop every stored assignment and store `assignments` in their place.
    fn replace_all(&self, assignments: &AssignmentMap) -> Result<(), StoreError>;

    fn load_all(&self) -> Result<AssignmentMap, StoreError>;

    fn find(&self, giver_email: &str) -> Result<Option<Assignment>, StoreError> {
        Ok(self.load_all()?.remove(&normalize_email(giver_email)))
    }
}

/// Volatile store backing both traits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    participants: Mutex<Vec<Participant>>,
    assignments: Mutex<AssignmentMap>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Backend(anyhow::anyhow!("Store lock poisoned: {}", e))
}

impl ParticipantStore for MemoryStore {
    fn list(&self) -> Result<Vec<Participant>, StoreError> {
        Ok(self.participants.lock().map_err(poisoned)?.clone())
    }

    fn append(&self, new: NewParticipant) -> Result<Participant, StoreError> {
        let mut participants = self.participants.lock().map_err(poisoned)?;
        let key = normalize_email(&new.email);
        if participants.iter().any(|p| normalize_email(&p.email) == key) {
            return Err(StoreError::DuplicateIdentity(new.email));
        }

        let participant = Participant {
            id: Uuid::new_v4(),
            name: new.name,
            email: key,
            registered_at: Utc::now(),
        };
        participants.push(participant.clone());
        Ok(participant)
    }
}

impl AssignmentStore for MemoryStore {
    fn replace_all(&self, assignments: &AssignmentMap) -> Result<(), StoreError> {
        *self.assignments.lock().map_err(poisoned)? = assignments.clone();
        Ok(())
    }

    fn load_all(&self) -> Result<AssignmentMap, StoreError> {
        Ok(self.assignments.lock().map_err(poisoned)?.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new(name: &str, email: &str) -> NewParticipant {
        NewParticipant { name: name.into(), email: email.into() }
    }

    #[test]
    fn append_rejects_duplicate_email() {
        let store = MemoryStore::new();
        store.append(new("Alice", "alice@example.com")).unwrap();

        let err = store.append(new("Alice Again", "ALICE@example.com")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateIdentity(_)));

        let all = store.list().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Alice");
    }

    #[test]
    fn duplicate_check_folds_non_ascii_case() {
        let store = MemoryStore::new();
        store.append(new("Zoë", "zoë@example.com")).unwrap();

        let err = store.append(new("Zoë", "ZOË@EXAMPLE.COM")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateIdentity(_)));
    }

    #[test]
    fn list_keeps_registration_order() {
        let store = MemoryStore::new();
        for (name, email) in [("Carol", "c@x.io"), ("Alice", "a@x.io"), ("Bob", "b@x.io")] {
            store.append(new(name, email)).unwrap();
        }
        let names: Vec<_> = store.list().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["Carol", "Alice", "Bob"]);
    }

    #[test]
    fn replace_all_overwrites() {
        let store = MemoryStore::new();
        let at = Utc::now();
        let mut first = AssignmentMap::new();
        first.insert("a@x.io".into(), Assignment { giftee_email: "b@x.io".into(), assigned_at: at });
        first.insert("b@x.io".into(), Assignment { giftee_email: "a@x.io".into(), assigned_at: at });
        store.replace_all(&first).unwrap();

        let mut second = AssignmentMap::new();
        second.insert("c@x.io".into(), Assignment { giftee_email: "d@x.io".into(), assigned_at: at });
        store.replace_all(&second).unwrap();

        assert_eq!(store.load_all().unwrap(), second);
        assert!(store.find("a@x.io").unwrap().is_none());
        assert_eq!(store.find("C@X.IO").unwrap().unwrap().giftee_email, "d@x.io");
    }
}
