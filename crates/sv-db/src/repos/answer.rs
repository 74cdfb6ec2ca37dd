//! Answers and their items.

use chrono::Utc;
use libsql::Connection;
use sv_core::entities::{Answer, AnswerInput, AnswerItem};
use sv_core::ids::{AnswerId, QuestionnaireId};

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, placeholders};

/// Delete the items of this questionnaire's answers that reference `fe_ids`.
pub async fn delete_items_for_components(
    conn: &Connection,
    question_id: QuestionnaireId,
    fe_ids: &[String],
) -> Result<u64, DatabaseError> {
    if fe_ids.is_empty() {
        return Ok(0);
    }
    let sql = format!(
        "DELETE FROM answer_items \
         WHERE answer_id IN (SELECT answer_id FROM answers WHERE question_id = ?1) \
           AND fe_id IN ({})",
        placeholders(2, fe_ids.len())
    );
    let mut params: Vec<libsql::Value> = vec![question_id.get().into()];
    params.extend(fe_ids.iter().map(|f| libsql::Value::from(f.clone())));
    Ok(conn.execute(&sql, libsql::params_from_iter(params)).await?)
}

/// Delete this questionnaire's answers that have no items left.
pub async fn delete_orphans(
    conn: &Connection,
    question_id: QuestionnaireId,
) -> Result<u64, DatabaseError> {
    Ok(conn
        .execute(
            "DELETE FROM answers WHERE question_id = ?1 \
             AND NOT EXISTS (SELECT 1 FROM answer_items i WHERE i.answer_id = answers.answer_id)",
            [question_id.get()],
        )
        .await?)
}

pub async fn count_for(
    conn: &Connection,
    question_id: QuestionnaireId,
) -> Result<u32, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT COUNT(*) FROM answers WHERE question_id = ?1",
            [question_id.get()],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    let count = row.get::<i64>(0)?;
    u32::try_from(count).map_err(|_| {
        DatabaseError::InvalidState(format!("answer count out of range: {count}"))
    })
}

/// Delete every answer and item of the given questionnaires.
pub async fn wipe(conn: &Connection, ids: &[i64]) -> Result<u64, DatabaseError> {
    if ids.is_empty() {
        return Ok(0);
    }
    let in_list = placeholders(1, ids.len());
    conn.execute(
        &format!(
            "DELETE FROM answer_items WHERE answer_id IN \
             (SELECT answer_id FROM answers WHERE question_id IN ({in_list}))"
        ),
        libsql::params_from_iter(ids.iter().copied()),
    )
    .await?;
    Ok(conn
        .execute(
            &format!("DELETE FROM answers WHERE question_id IN ({in_list})"),
            libsql::params_from_iter(ids.iter().copied()),
        )
        .await?)
}

pub async fn insert(
    conn: &Connection,
    question_id: QuestionnaireId,
    items: &[AnswerInput],
) -> Result<AnswerId, DatabaseError> {
    conn.execute(
        "INSERT INTO answers (question_id, created_at) VALUES (?1, ?2)",
        libsql::params![question_id.get(), Utc::now().to_rfc3339()],
    )
    .await?;
    let answer_id = conn.last_insert_rowid();

    for item in items {
        conn.execute(
            "INSERT INTO answer_items (answer_id, fe_id, value) VALUES (?1, ?2, ?3)",
            libsql::params![answer_id, item.fe_id.as_str(), item.value.as_str()],
        )
        .await?;
    }
    Ok(answer_id)
}

/// Answers of a questionnaire with their items, oldest first.
pub async fn list_for(
    conn: &Connection,
    question_id: QuestionnaireId,
) -> Result<Vec<Answer>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT answer_id, created_at FROM answers WHERE question_id = ?1 ORDER BY answer_id",
            [question_id.get()],
        )
        .await?;
    let mut answers = Vec::new();
    while let Some(row) = rows.next().await? {
        answers.push(Answer {
            id: row.get(0)?,
            question_id,
            created_at: parse_datetime(&row.get::<String>(1)?)?,
            items: Vec::new(),
        });
    }

    let mut rows = conn
        .query(
            "SELECT i.id, i.answer_id, i.fe_id, i.value FROM answer_items i \
             JOIN answers a ON a.answer_id = i.answer_id \
             WHERE a.question_id = ?1 ORDER BY i.answer_id, i.id",
            [question_id.get()],
        )
        .await?;
    while let Some(row) = rows.next().await? {
        let item = AnswerItem {
            id: row.get(0)?,
            answer_id: row.get(1)?,
            fe_id: row.get(2)?,
            value: row.get(3)?,
        };
        if let Some(answer) = answers.iter_mut().find(|a| a.id == item.answer_id) {
            answer.items.push(item);
        }
    }
    Ok(answers)
}
