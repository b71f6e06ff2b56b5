//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// One user's accumulated set of seen message ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SeenRecord {
    /// Store-assigned record id (a UUID).
    pub id: String,
    /// Identifier of the owning user. Unique across records.
    pub user_id: String,
    /// Optional display name; overwritten by merges that add ids.
    pub username: Option<String>,
    /// Message ids in first-insertion order, stored as a JSON array.
    /// The merge path never writes duplicates.
    pub message_ids: Json<Vec<String>>,
    /// Set on creation and on any merge that appends new ids.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: String,
    /// Last modification timestamp.
    pub updated_at: String,
}

/// Input for the create-or-merge operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSeenRecord {
    /// Identifier of the owning user.
    pub user_id: String,
    /// Optional display name.
    pub username: Option<String>,
    /// Message ids to record as seen. May contain duplicates; they are
    /// screened out before anything is stored.
    pub message_ids: Vec<String>,
}

/// Partial update applied verbatim to a stored record.
///
/// Unspecified fields are left untouched. Unlike the merge path, a patch
/// that sets `message_ids` is stored exactly as given, without
/// deduplication; callers editing the list directly own its contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SeenRecordPatch {
    /// Replace the owning user id.
    pub user_id: Option<String>,
    /// Replace the display name.
    pub username: Option<String>,
    /// Replace the stored message ids wholesale.
    pub message_ids: Option<Vec<String>>,
    /// Replace the active flag.
    pub active: Option<bool>,
}
