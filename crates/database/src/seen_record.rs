//! Seen-record CRUD and merge operations.

use std::collections::HashSet;

use sqlx::types::Json;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::{NewSeenRecord, SeenRecord, SeenRecordPatch};
use crate::page::{Page, PageInfo};

/// Filter for listing seen records.
///
/// Absent fields are left out of the query entirely; present fields are
/// combined conjunctively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenRecordFilter {
    /// Match the owning user id exactly.
    pub user_id: Option<String>,
    /// Match the display name exactly.
    pub username: Option<String>,
    /// Match the active flag.
    pub active: Option<bool>,
}

impl SeenRecordFilter {
    /// Render the WHERE clause for the present fields.
    ///
    /// Binds must be applied in field order: user_id, username, active.
    fn where_clause(&self) -> String {
        let mut conditions = Vec::new();
        if self.user_id.is_some() {
            conditions.push("user_id = ?");
        }
        if self.username.is_some() {
            conditions.push("username = ?");
        }
        if self.active.is_some() {
            conditions.push("active = ?");
        }

        if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        }
    }
}

/// Outcome of [`create_or_merge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// No record existed for the user; a new one was inserted.
    Created(SeenRecord),
    /// The user's existing record absorbed the submitted ids.
    Merged(SeenRecord),
}

impl CreateOutcome {
    /// The record, however it was produced.
    pub fn into_record(self) -> SeenRecord {
        match self {
            CreateOutcome::Created(record) | CreateOutcome::Merged(record) => record,
        }
    }
}

/// List seen records matching a filter, most recently updated first.
///
/// The page fetch and the total count run concurrently and are independent
/// reads, so the reported total can drift from the page contents under
/// concurrent writes.
pub async fn list(
    pool: &SqlitePool,
    filter: &SeenRecordFilter,
    page: &Page,
) -> Result<(Vec<SeenRecord>, PageInfo)> {
    let where_clause = filter.where_clause();
    let select_sql = format!(
        r#"
        SELECT id, user_id, username, message_ids, active, created_at, updated_at
        FROM seen_records
        {where_clause}
        ORDER BY updated_at DESC
        LIMIT ? OFFSET ?
        "#
    );
    let count_sql = format!("SELECT COUNT(*) FROM seen_records {where_clause}");

    let mut select = sqlx::query_as::<_, SeenRecord>(&select_sql);
    let mut count = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(user_id) = &filter.user_id {
        select = select.bind(user_id);
        count = count.bind(user_id);
    }
    if let Some(username) = &filter.username {
        select = select.bind(username);
        count = count.bind(username);
    }
    if let Some(active) = filter.active {
        select = select.bind(active);
        count = count.bind(active);
    }
    let select = select.bind(page.limit()).bind(page.offset());

    let (records, total) = tokio::try_join!(select.fetch_all(pool), count.fetch_one(pool))?;

    Ok((records, PageInfo::new(page, total)))
}

/// Get a seen record by id.
pub async fn get(pool: &SqlitePool, id: &str) -> Result<SeenRecord> {
    sqlx::query_as::<_, SeenRecord>(
        r#"
        SELECT id, user_id, username, message_ids, active, created_at, updated_at
        FROM seen_records
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Seen record",
        id: id.to_string(),
    })
}

/// Look up the record owned by a user, if any.
pub async fn find_by_user_id(pool: &SqlitePool, user_id: &str) -> Result<Option<SeenRecord>> {
    let record = sqlx::query_as::<_, SeenRecord>(
        r#"
        SELECT id, user_id, username, message_ids, active, created_at, updated_at
        FROM seen_records
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Insert a record for a first-time user, or merge new message ids into the
/// user's existing record.
///
/// Merging appends only ids not already stored, in input order, and writes
/// nothing when every submitted id is already present. Two racing calls for
/// the same unseen user are resolved by the unique constraint on `user_id`:
/// the loser of the insert race retries and merges instead.
pub async fn create_or_merge(pool: &SqlitePool, new: &NewSeenRecord) -> Result<CreateOutcome> {
    loop {
        if let Some(existing) = find_by_user_id(pool, &new.user_id).await? {
            let record = merge_into(pool, existing, new).await?;
            return Ok(CreateOutcome::Merged(record));
        }

        match insert(pool, new).await {
            Ok(record) => return Ok(CreateOutcome::Created(record)),
            // Lost the insert race; merge into the winner's record.
            Err(DatabaseError::AlreadyExists { .. }) => continue,
            Err(err) => return Err(err),
        }
    }
}

/// Insert a fresh record with a deduplicated copy of the input ids.
async fn insert(pool: &SqlitePool, new: &NewSeenRecord) -> Result<SeenRecord> {
    let id = Uuid::new_v4().to_string();

    // Stable first-occurrence dedup of the input sequence.
    let mut seen = HashSet::new();
    let message_ids: Vec<String> = new
        .message_ids
        .iter()
        .filter(|m| seen.insert(m.as_str()))
        .cloned()
        .collect();

    sqlx::query(
        r#"
        INSERT INTO seen_records (id, user_id, username, message_ids, active)
        VALUES (?, ?, ?, ?, 1)
        "#,
    )
    .bind(&id)
    .bind(&new.user_id)
    .bind(new.username.as_deref())
    .bind(Json(&message_ids))
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Seen record",
                    id: new.user_id.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    get(pool, &id).await
}

/// Append genuinely new ids to an existing record.
///
/// The membership set starts from the stored ids and grows as ids are
/// taken, so duplicates within the input are screened as well. When nothing
/// new arrives the row is left untouched and returned as is.
async fn merge_into(
    pool: &SqlitePool,
    mut record: SeenRecord,
    new: &NewSeenRecord,
) -> Result<SeenRecord> {
    let mut seen: HashSet<String> = record.message_ids.iter().cloned().collect();
    let mut appended = false;
    for id in &new.message_ids {
        if seen.insert(id.clone()) {
            record.message_ids.push(id.clone());
            appended = true;
        }
    }

    if !appended {
        return Ok(record);
    }

    if let Some(username) = &new.username {
        record.username = Some(username.clone());
    }

    sqlx::query(
        r#"
        UPDATE seen_records
        SET message_ids = ?, username = ?, active = 1, updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(Json(&record.message_ids.0))
    .bind(record.username.as_deref())
    .bind(&record.id)
    .execute(pool)
    .await?;

    get(pool, &record.id).await
}

/// Apply a partial update to a seen record and return the updated row.
///
/// Only supplied fields are written; `message_ids` is stored verbatim,
/// without the merge path's deduplication.
pub async fn update(pool: &SqlitePool, id: &str, patch: &SeenRecordPatch) -> Result<SeenRecord> {
    let mut assignments = Vec::new();
    if patch.user_id.is_some() {
        assignments.push("user_id = ?");
    }
    if patch.username.is_some() {
        assignments.push("username = ?");
    }
    if patch.message_ids.is_some() {
        assignments.push("message_ids = ?");
    }
    if patch.active.is_some() {
        assignments.push("active = ?");
    }

    // An empty patch degrades to a read, still surfacing not-found.
    if assignments.is_empty() {
        return get(pool, id).await;
    }

    let sql = format!(
        r#"
        UPDATE seen_records
        SET {}, updated_at = datetime('now')
        WHERE id = ?
        "#,
        assignments.join(", ")
    );

    let mut query = sqlx::query(&sql);
    if let Some(user_id) = &patch.user_id {
        query = query.bind(user_id);
    }
    if let Some(username) = &patch.username {
        query = query.bind(username);
    }
    if let Some(message_ids) = &patch.message_ids {
        query = query.bind(Json(message_ids));
    }
    if let Some(active) = patch.active {
        query = query.bind(active);
    }

    let result = query.bind(id).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Seen record",
            id: id.to_string(),
        });
    }

    get(pool, id).await
}

/// Delete a seen record by id.
pub async fn delete(pool: &SqlitePool, id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM seen_records
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Seen record",
            id: id.to_string(),
        });
    }

    Ok(())
}
