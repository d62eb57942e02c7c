use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{Connection, ErrorCode, OptionalExtension};
use uuid::Uuid;

use santa_core::registry::normalize_email;
use santa_core::store::{AssignmentStore, ParticipantStore, StoreError};
use santa_types::models::{Assignment, AssignmentMap, NewParticipant, Participant};

use crate::Database;
use crate::models::{AssignmentRow, ParticipantRow};

impl Database {
    // -- Participants --

    pub fn insert_participant(&self, row: &ParticipantRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO participants (id, name, email, registered_at) VALUES (?1, ?2, ?3, ?4)",
                (&row.id, &row.name, &row.email, &row.registered_at),
            )?;
            Ok(())
        })
    }

    pub fn get_participant_by_email(&self, email: &str) -> Result<Option<ParticipantRow>> {
        self.with_conn(|conn| query_participant_by_email(conn, email))
    }

    /// Registration order: rowid grows with every insert.
    pub fn list_participants(&self) -> Result<Vec<ParticipantRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, email, registered_at FROM participants ORDER BY rowid",
            )?;

            let rows = stmt
                .query_map([], |row| {
                    Ok(ParticipantRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                        registered_at: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    // -- Assignments --

    /// Swap the whole assignment table in one transaction.
    pub fn replace_assignments(&self, rows: &[AssignmentRow]) -> Result<()> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;
            tx.execute("DELETE FROM assignments", [])?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO assignments (giver_email, giftee_email, assigned_at) VALUES (?1, ?2, ?3)",
                )?;
                for row in rows {
                    stmt.execute((&row.giver_email, &row.giftee_email, &row.assigned_at))?;
                }
            }
            tx.commit()?;
            Ok(())
        })
    }

    pub fn list_assignments(&self) -> Result<Vec<AssignmentRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT giver_email, giftee_email, assigned_at FROM assignments")?;

            let rows = stmt
                .query_map([], |row| {
                    Ok(AssignmentRow {
                        giver_email: row.get(0)?,
                        giftee_email: row.get(1)?,
                        assigned_at: row.get(2)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn get_assignment(&self, giver_email: &str) -> Result<Option<AssignmentRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT giver_email, giftee_email, assigned_at FROM assignments WHERE giver_email = ?1",
                    [giver_email],
                    |row| {
                        Ok(AssignmentRow {
                            giver_email: row.get(0)?,
                            giftee_email: row.get(1)?,
                            assigned_at: row.get(2)?,
                        })
                    },
                )
                .optional()?;

            Ok(row)
        })
    }
}

fn query_participant_by_email(conn: &Connection, email: &str) -> Result<Option<ParticipantRow>> {
    let mut stmt = conn
        .prepare("SELECT id, name, email, registered_at FROM participants WHERE email = ?1")?;

    let row = stmt
        .query_row([email], |row| {
            Ok(ParticipantRow {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                registered_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // Rows written by hand through sqlite3 use datetime('now') format.
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .map_err(|e| anyhow!("Corrupt timestamp '{}': {}", raw, e))
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<rusqlite::Error>(),
        Some(rusqlite::Error::SqliteFailure(f, _)) if f.code == ErrorCode::ConstraintViolation
    )
}

impl TryFrom<ParticipantRow> for Participant {
    type Error = anyhow::Error;

    fn try_from(row: ParticipantRow) -> Result<Self> {
        Ok(Participant {
            id: row
                .id
                .parse::<Uuid>()
                .map_err(|e| anyhow!("Corrupt participant id '{}': {}", row.id, e))?,
            registered_at: parse_timestamp(&row.registered_at)?,
            name: row.name,
            email: row.email,
        })
    }
}

impl ParticipantStore for Database {
    fn list(&self) -> std::result::Result<Vec<Participant>, StoreError> {
        let participants = self
            .list_participants()?
            .into_iter()
            .map(Participant::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(participants)
    }

    fn append(&self, new: NewParticipant) -> std::result::Result<Participant, StoreError> {
        // NOCASE only folds ASCII, so the column holds the folded form.
        let email = normalize_email(&new.email);
        if self.get_participant_by_email(&email)?.is_some() {
            return Err(StoreError::DuplicateIdentity(new.email));
        }

        let participant = Participant {
            id: Uuid::new_v4(),
            name: new.name,
            email,
            registered_at: Utc::now(),
        };

        let row = ParticipantRow {
            id: participant.id.to_string(),
            name: participant.name.clone(),
            email: participant.email.clone(),
            registered_at: participant.registered_at.to_rfc3339(),
        };

        match self.insert_participant(&row) {
            Ok(()) => Ok(participant),
            // Lost a race with a concurrent registration of the same email.
            Err(e) if is_unique_violation(&e) => Err(StoreError::DuplicateIdentity(row.email)),
            Err(e) => Err(e.into()),
        }
    }
}

impl AssignmentStore for Database {
    fn replace_all(&self, assignments: &AssignmentMap) -> std::result::Result<(), StoreError> {
        let rows: Vec<AssignmentRow> = assignments
            .iter()
            .map(|(giver, a)| AssignmentRow {
                giver_email: giver.clone(),
                giftee_email: a.giftee_email.clone(),
                assigned_at: a.assigned_at.to_rfc3339(),
            })
            .collect();

        self.replace_assignments(&rows)?;
        Ok(())
    }

    fn load_all(&self) -> std::result::Result<AssignmentMap, StoreError> {
        let mut map = AssignmentMap::new();
        for row in self.list_assignments()? {
            map.insert(
                row.giver_email,
                Assignment {
                    giftee_email: row.giftee_email,
                    assigned_at: parse_timestamp(&row.assigned_at)?,
                },
            );
        }
        Ok(map)
    }

    fn find(&self, giver_email: &str) -> std::result::Result<Option<Assignment>, StoreError> {
        let Some(row) = self.get_assignment(&normalize_email(giver_email))? else {
            return Ok(None);
        };

        Ok(Some(Assignment {
            giftee_email: row.giftee_email,
            assigned_at: parse_timestamp(&row.assigned_at)?,
        }))
    }
}
