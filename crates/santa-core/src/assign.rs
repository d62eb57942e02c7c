//! Giftee assignment.
//!
//! Draws a derangement by rejection sampling: shuffle `[0, n)` and keep the
//! first permutation with no fixed point. For large `n` roughly `1/e` of
//! shuffles qualify, so the expected number of attempts tends to `e`. The
//! attempt ceiling turns pathological bad luck into an explicit error.

use std::collections::HashSet;

use chrono::Utc;
use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;
use tracing::{debug, warn};

use santa_types::models::{Assignment, AssignmentMap, Participant};

use crate::registry::normalize_email;
use crate::store::StoreError;

/// Shuffles tried before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// A derangement needs at least two elements.
pub const MIN_PARTICIPANTS: usize = 2;

#[derive(Debug, Error)]
pub enum DrawError {
    #[error("Need at least 2 participants to generate assignments")]
    InsufficientParticipants { count: usize },

    #[error("Participant listed more than once: {0}")]
    DuplicateIdentity(String),

    #[error("Could not generate valid assignments after multiple attempts")]
    GenerationExhausted { attempts: u32 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Returns a permutation `p` of `[0, n)` with `p[i] != i` for every `i`.
pub fn derangement<R: Rng + ?Sized>(
    n: usize,
    max_attempts: u32,
    rng: &mut R,
) -> Result<Vec<usize>, DrawError> {
    if n < MIN_PARTICIPANTS {
        return Err(DrawError::InsufficientParticipants { count: n });
    }

    let mut indices: Vec<usize> = (0..n).collect();
    for attempt in 1..=max_attempts {
        indices.shuffle(rng);
        if indices.iter().enumerate().all(|(i, &j)| i != j) {
            debug!(n, attempt, "Derangement accepted");
            return Ok(indices);
        }
    }

    warn!(n, max_attempts, "No derangement found within attempt ceiling");
    Err(DrawError::GenerationExhausted { attempts: max_attempts })
}

/// Identity-level wrapper around [`derangement`].
#[derive(Debug, Clone, Copy)]
pub struct Generator {
    max_attempts: u32,
}

impl Default for Generator {
    fn default() -> Self {
        Self { max_attempts: DEFAULT_MAX_ATTEMPTS }
    }
}

impl Generator {
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Assign every participant a giftee other than themselves.
    ///
    /// Pure apart from the random source: nothing is persisted here. All
    /// entries share one timestamp.
    pub fn draw<R: Rng + ?Sized>(
        &self,
        participants: &[Participant],
        rng: &mut R,
    ) -> Result<AssignmentMap, DrawError> {
        if participants.len() < MIN_PARTICIPANTS {
            return Err(DrawError::InsufficientParticipants { count: participants.len() });
        }

        let mut seen = HashSet::with_capacity(participants.len());
        for p in participants {
            if !seen.insert(normalize_email(&p.email)) {
                return Err(DrawError::DuplicateIdentity(p.email.clone()));
            }
        }

        let perm = derangement(participants.len(), self.max_attempts, rng)?;
        let assigned_at = Utc::now();

        Ok(participants
            .iter()
            .zip(perm)
            .map(|(giver, j)| {
                (
                    giver.email.clone(),
                    Assignment {
                        giftee_email: participants[j].email.clone(),
                        assigned_at,
                    },
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::BTreeSet;
    use uuid::Uuid;

    fn people(names: &[&str]) -> Vec<Participant> {
        names
            .iter()
            .map(|n| Participant {
                id: Uuid::new_v4(),
                name: n.to_string(),
                email: format!("{}@example.com", n.to_lowercase()),
                registered_at: Utc::now(),
            })
            .collect()
    }

    fn giftee<'a>(map: &'a AssignmentMap, giver: &str) -> &'a str {
        &map[&format!("{giver}@example.com")].giftee_email
    }

    #[test]
    fn derangement_has_no_fixed_points() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 2..40 {
            let perm = derangement(n, DEFAULT_MAX_ATTEMPTS, &mut rng).unwrap();
            assert_eq!(perm.len(), n);
            let values: BTreeSet<usize> = perm.iter().copied().collect();
            assert_eq!(values, (0..n).collect::<BTreeSet<_>>());
            assert!(perm.iter().enumerate().all(|(i, &j)| i != j));
        }
    }

    #[test]
    fn fewer_than_two_is_rejected_up_front() {
        let mut rng = StdRng::seed_from_u64(1);
        for n in 0..2 {
            // The size guard fires even with an unlimited budget.
            let err = derangement(n, u32::MAX, &mut rng).unwrap_err();
            assert!(matches!(err, DrawError::InsufficientParticipants { count } if count == n));
        }

        let err = Generator::default().draw(&people(&["Alice"]), &mut rng).unwrap_err();
        assert!(matches!(err, DrawError::InsufficientParticipants { count: 1 }));
    }

    #[test]
    fn zero_attempt_budget_is_exhausted() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = Generator::new(0).draw(&people(&["Alice", "Bob", "Carol"]), &mut rng).unwrap_err();
        assert!(matches!(err, DrawError::GenerationExhausted { attempts: 0 }));
        assert_eq!(
            err.to_string(),
            "Could not generate valid assignments after multiple attempts"
        );
    }

    #[test]
    fn two_participants_always_swap() {
        let group = people(&["Alice", "Bob"]);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let map = Generator::default().draw(&group, &mut rng).unwrap();
            assert_eq!(giftee(&map, "alice"), "bob@example.com");
            assert_eq!(giftee(&map, "bob"), "alice@example.com");
        }
    }

    #[test]
    fn three_participants_yield_only_three_cycles() {
        let group = people(&["Alice", "Bob", "Carol"]);
        let forward = ["bob@example.com", "carol@example.com", "alice@example.com"];
        let backward = ["carol@example.com", "alice@example.com", "bob@example.com"];
        let (mut saw_forward, mut saw_backward) = (false, false);

        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let map = Generator::default().draw(&group, &mut rng).unwrap();
            let got = [giftee(&map, "alice"), giftee(&map, "bob"), giftee(&map, "carol")];
            if got == forward {
                saw_forward = true;
            } else if got == backward {
                saw_backward = true;
            } else {
                panic!("not a 3-cycle: {got:?}");
            }
        }

        assert!(saw_forward && saw_backward);
    }

    #[test]
    fn keys_and_values_cover_input_exactly() {
        let group = people(&["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K"]);
        let expected: BTreeSet<String> = group.iter().map(|p| p.email.clone()).collect();

        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let map = Generator::default().draw(&group, &mut rng).unwrap();

            let keys: BTreeSet<String> = map.keys().cloned().collect();
            let values: Vec<&String> = map.values().map(|a| &a.giftee_email).collect();
            let value_set: BTreeSet<String> = values.iter().map(|v| v.to_string()).collect();

            assert_eq!(keys, expected);
            assert_eq!(values.len(), group.len());
            assert_eq!(value_set, expected);
            assert!(map.iter().all(|(giver, a)| *giver != a.giftee_email));

            let first = map.values().next().unwrap().assigned_at;
            assert!(map.values().all(|a| a.assigned_at == first));
        }
    }

    #[test]
    fn duplicate_identity_is_rejected() {
        let mut group = people(&["Alice", "Bob"]);
        let mut dup = group[0].clone();
        dup.email = dup.email.to_uppercase();
        group.push(dup);

        let mut rng = StdRng::seed_from_u64(3);
        let err = Generator::default().draw(&group, &mut rng).unwrap_err();
        assert!(matches!(err, DrawError::DuplicateIdentity(_)));
    }

    #[test]
    fn duplicate_identity_folds_non_ascii_case() {
        let mut group = people(&["Alice", "Bob"]);
        let mut dup = group[0].clone();
        dup.email = "zoë@example.com".into();
        group.push(dup.clone());
        dup.email = "ZOË@example.com".into();
        group.push(dup);

        let mut rng = StdRng::seed_from_u64(3);
        let err = Generator::default().draw(&group, &mut rng).unwrap_err();
        assert!(matches!(err, DrawError::DuplicateIdentity(ref e) if e == "ZOË@example.com"));
    }
}
