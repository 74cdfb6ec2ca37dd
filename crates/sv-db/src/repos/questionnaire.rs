//! Questionnaire rows.

use chrono::Utc;
use libsql::Connection;
use sv_core::entities::Questionnaire;
use sv_core::ids::QuestionnaireId;

use crate::error::DatabaseError;
use crate::helpers::{get_bool, get_count, parse_datetime, placeholders};
use crate::updates::QuestionnairePatch;

const SELECT_COLS: &str = "question_id, user_id, title, description, css, js, \
     is_published, is_star, is_deleted, answer_count, created_at";

fn row_to_questionnaire(row: &libsql::Row) -> Result<Questionnaire, DatabaseError> {
    Ok(Questionnaire {
        id: QuestionnaireId::new(row.get(0)?),
        owner_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        css: row.get(4)?,
        js: row.get(5)?,
        is_published: get_bool(row, 6)?,
        is_star: get_bool(row, 7)?,
        is_deleted: get_bool(row, 8)?,
        answer_count: get_count(row, 9)?,
        created_at: parse_datetime(&row.get::<String>(10)?)?,
    })
}

/// Fields for a new questionnaire row.
pub struct NewQuestionnaire<'a> {
    pub owner_id: i64,
    pub title: &'a str,
    pub description: &'a str,
    pub css: &'a str,
    pub js: &'a str,
}

pub async fn insert(
    conn: &Connection,
    new: &NewQuestionnaire<'_>,
) -> Result<QuestionnaireId, DatabaseError> {
    conn.execute(
        "INSERT INTO questions (user_id, title, description, css, js, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        libsql::params![
            new.owner_id,
            new.title,
            new.description,
            new.css,
            new.js,
            Utc::now().to_rfc3339()
        ],
    )
    .await?;
    Ok(QuestionnaireId::new(conn.last_insert_rowid()))
}

pub async fn find(
    conn: &Connection,
    id: QuestionnaireId,
) -> Result<Option<Questionnaire>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM questions WHERE question_id = ?1"),
            [id.get()],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_questionnaire(&row)?)),
        None => Ok(None),
    }
}

pub async fn get(conn: &Connection, id: QuestionnaireId) -> Result<Questionnaire, DatabaseError> {
    find(conn, id)
        .await?
        .ok_or_else(|| DatabaseError::questionnaire_not_found(id))
}

/// Write the scalar fields present in `patch` plus the recomputed answer count.
///
/// `component_list` is ignored here; the orchestrator reconciles it separately.
pub async fn apply_fields(
    conn: &Connection,
    id: QuestionnaireId,
    patch: &QuestionnairePatch,
    answer_count: u32,
) -> Result<(), DatabaseError> {
    let mut sets = Vec::new();
    let mut params: Vec<libsql::Value> = Vec::new();
    let mut idx = 1usize;

    if let Some(ref title) = patch.title {
        sets.push(format!("title = ?{idx}"));
        params.push(title.clone().into());
        idx += 1;
    }
    if let Some(ref description) = patch.description {
        sets.push(format!("description = ?{idx}"));
        params.push(description.clone().into());
        idx += 1;
    }
    if let Some(ref css) = patch.css {
        sets.push(format!("css = ?{idx}"));
        params.push(css.clone().into());
        idx += 1;
    }
    if let Some(ref js) = patch.js {
        sets.push(format!("js = ?{idx}"));
        params.push(js.clone().into());
        idx += 1;
    }
    if let Some(is_published) = patch.is_published {
        sets.push(format!("is_published = ?{idx}"));
        params.push(i64::from(is_published).into());
        idx += 1;
    }
    if let Some(is_star) = patch.is_star {
        sets.push(format!("is_star = ?{idx}"));
        params.push(i64::from(is_star).into());
        idx += 1;
    }
    if let Some(is_deleted) = patch.is_deleted {
        sets.push(format!("is_deleted = ?{idx}"));
        params.push(i64::from(is_deleted).into());
        idx += 1;
    }

    sets.push(format!("answer_count = ?{idx}"));
    params.push(i64::from(answer_count).into());
    idx += 1;

    params.push(id.get().into());
    let sql = format!(
        "UPDATE questions SET {} WHERE question_id = ?{idx}",
        sets.join(", ")
    );
    conn.execute(&sql, libsql::params_from_iter(params)).await?;
    Ok(())
}

pub async fn set_answer_count(
    conn: &Connection,
    id: QuestionnaireId,
    count: u32,
) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE questions SET answer_count = ?1 WHERE question_id = ?2",
        libsql::params![i64::from(count), id.get()],
    )
    .await?;
    Ok(())
}

/// Delete the questionnaire rows for `ids`. Returns how many existed.
///
/// Dependent rows must already be gone.
pub async fn delete_many(conn: &Connection, ids: &[i64]) -> Result<u64, DatabaseError> {
    if ids.is_empty() {
        return Ok(0);
    }
    let sql = format!(
        "DELETE FROM questions WHERE question_id IN ({})",
        placeholders(1, ids.len())
    );
    let deleted = conn
        .execute(&sql, libsql::params_from_iter(ids.iter().copied()))
        .await?;
    Ok(deleted)
}

/// Make `%`, `_` and `\` match literally under `LIKE ... ESCAPE '\'`.
fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for ch in keyword.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Filters for [`list`]. Pagination is applied by the caller's limit/offset.
pub struct ListFilter<'a> {
    pub owner_id: Option<i64>,
    pub keyword: Option<&'a str>,
    pub is_star: Option<bool>,
    pub is_deleted: bool,
}

impl ListFilter<'_> {
    fn where_clause(&self) -> (String, Vec<libsql::Value>) {
        let mut clauses = vec!["is_deleted = ?1".to_string()];
        let mut params: Vec<libsql::Value> = vec![i64::from(self.is_deleted).into()];
        let mut idx = 2usize;

        if let Some(owner_id) = self.owner_id {
            clauses.push(format!("user_id = ?{idx}"));
            params.push(owner_id.into());
            idx += 1;
        }
        if let Some(keyword) = self.keyword.filter(|k| !k.is_empty()) {
            clauses.push(format!("title LIKE ?{idx} ESCAPE '\\'"));
            params.push(format!("%{}%", escape_like(keyword)).into());
            idx += 1;
        }
        if let Some(is_star) = self.is_star {
            clauses.push(format!("is_star = ?{idx}"));
            params.push(i64::from(is_star).into());
        }
        (clauses.join(" AND "), params)
    }
}

pub async fn list(
    conn: &Connection,
    filter: &ListFilter<'_>,
    limit: u32,
    offset: u64,
) -> Result<Vec<Questionnaire>, DatabaseError> {
    let (where_sql, params) = filter.where_clause();
    let offset = i64::try_from(offset)
        .map_err(|_| DatabaseError::Validation(format!("page offset too large: {offset}")))?;
    let mut rows = conn
        .query(
            &format!(
                "SELECT {SELECT_COLS} FROM questions WHERE {where_sql} \
                 ORDER BY created_at DESC, question_id DESC LIMIT {limit} OFFSET {offset}"
            ),
            libsql::params_from_iter(params),
        )
        .await?;

    let mut list = Vec::new();
    while let Some(row) = rows.next().await? {
        list.push(row_to_questionnaire(&row)?);
    }
    Ok(list)
}

pub async fn count(conn: &Connection, filter: &ListFilter<'_>) -> Result<u64, DatabaseError> {
    let (where_sql, params) = filter.where_clause();
    let mut rows = conn
        .query(
            &format!("SELECT COUNT(*) FROM questions WHERE {where_sql}"),
            libsql::params_from_iter(params),
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    let total = row.get::<i64>(0)?;
    u64::try_from(total)
        .map_err(|_| DatabaseError::InvalidState(format!("negative count: {total}")))
}
