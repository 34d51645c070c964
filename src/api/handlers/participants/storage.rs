//! SQL storage helpers for participant records.

use serde::Serialize;
use sqlx::{PgPool, Row};
use tracing::Instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use super::types::{ListParams, ParticipantForm};

#[derive(Debug, Serialize, ToSchema)]
pub struct ParticipantRecord {
    pub id: String,
    pub name: String,
    pub birth_place: String,
    pub birth_date: String,
    pub campus: String,
    pub major: String,
    pub cohort: String,
    pub phone: String,
    pub created_at: String,
    pub updated_at: String,
}

const PARTICIPANT_COLUMNS: &str = r#"
    id::text AS id,
    name,
    birth_place,
    to_char(birth_date, 'YYYY-MM-DD') AS birth_date,
    campus,
    major,
    cohort,
    phone,
    to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at,
    to_char(updated_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS updated_at
"#;

fn record_from_row(row: &sqlx::postgres::PgRow) -> ParticipantRecord {
    ParticipantRecord {
        id: row.get("id"),
        name: row.get("name"),
        birth_place: row.get("birth_place"),
        birth_date: row.get("birth_date"),
        campus: row.get("campus"),
        major: row.get("major"),
        cohort: row.get("cohort"),
        phone: row.get("phone"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

pub(super) async fn insert_participant(
    pool: &PgPool,
    form: &ParticipantForm,
) -> Result<ParticipantRecord, sqlx::Error> {
    let query = format!(
        r"
        INSERT INTO participants (name, birth_place, birth_date, campus, major, cohort, phone)
        VALUES ($1, $2, $3::date, $4, $5, $6, $7)
        RETURNING {PARTICIPANT_COLUMNS}
        "
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(form.name.trim())
        .bind(form.birth_place.trim())
        .bind(form.birth_date.trim())
        .bind(form.campus.trim())
        .bind(form.major.trim())
        .bind(form.cohort.trim())
        .bind(form.phone.trim())
        .fetch_one(pool)
        .instrument(span)
        .await?;
    Ok(record_from_row(&row))
}

/// Paginated, searchable, sorted listing. Returns the page plus the total
/// matching count. `sort_by`/`sort_order` were allow-listed by the caller, so
/// interpolating them into ORDER BY is safe.
pub(super) async fn list_participants(
    pool: &PgPool,
    params: &ListParams,
) -> Result<(Vec<ParticipantRecord>, i64), sqlx::Error> {
    let search_pattern = params
        .search
        .as_deref()
        .map(|search| format!("%{search}%"));

    let count_query = r"
        SELECT COUNT(*) AS total
        FROM participants
        WHERE ($1::text IS NULL OR name ILIKE $1)
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = count_query
    );
    let total: i64 = sqlx::query(count_query)
        .bind(search_pattern.as_deref())
        .fetch_one(pool)
        .instrument(span)
        .await?
        .get("total");

    let query = format!(
        r"
        SELECT {PARTICIPANT_COLUMNS}
        FROM participants
        WHERE ($1::text IS NULL OR name ILIKE $1)
        ORDER BY {} {}
        OFFSET $2 LIMIT $3
        ",
        params.sort_by, params.sort_order
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let rows = sqlx::query(&query)
        .bind(search_pattern.as_deref())
        .bind(params.offset())
        .bind(params.limit)
        .fetch_all(pool)
        .instrument(span)
        .await?;

    Ok((rows.iter().map(record_from_row).collect(), total))
}

pub(super) async fn count_participants(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let query = "SELECT COUNT(*) AS total FROM participants";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query).fetch_one(pool).instrument(span).await?;
    Ok(row.get("total"))
}

pub(super) async fn fetch_participant(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<ParticipantRecord>, sqlx::Error> {
    let query = format!(
        r"
        SELECT {PARTICIPANT_COLUMNS}
        FROM participants
        WHERE id = $1
        LIMIT 1
        "
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(id)
        .fetch_optional(pool)
        .instrument(span)
        .await?;
    Ok(row.as_ref().map(record_from_row))
}

pub(super) async fn update_participant(
    pool: &PgPool,
    id: Uuid,
    form: &ParticipantForm,
) -> Result<Option<ParticipantRecord>, sqlx::Error> {
    let query = format!(
        r"
        UPDATE participants
        SET name = $1,
            birth_place = $2,
            birth_date = $3::date,
            campus = $4,
            major = $5,
            cohort = $6,
            phone = $7,
            updated_at = NOW()
        WHERE id = $8
        RETURNING {PARTICIPANT_COLUMNS}
        "
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(form.name.trim())
        .bind(form.birth_place.trim())
        .bind(form.birth_date.trim())
        .bind(form.campus.trim())
        .bind(form.major.trim())
        .bind(form.cohort.trim())
        .bind(form.phone.trim())
        .bind(id)
        .fetch_optional(pool)
        .instrument(span)
        .await?;
    Ok(row.as_ref().map(record_from_row))
}

pub(super) async fn delete_participant(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let query = "DELETE FROM participants WHERE id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(id)
        .execute(pool)
        .instrument(span)
        .await?;
    Ok(result.rows_affected() > 0)
}
