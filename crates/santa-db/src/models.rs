/// Database row types, mapped directly from SQLite rows.
/// Distinct from santa-types models to keep the DB layer independent.

pub struct ParticipantRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub registered_at: String,
}

pub struct AssignmentRow {
    pub giver_email: String,
    pub giftee_email: String,
    pub assigned_at: String,
}
