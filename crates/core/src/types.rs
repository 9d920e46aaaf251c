/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Public record identifier. Every API operation keys on this, never on
/// the numeric `id`.
pub type RecordUuid = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
