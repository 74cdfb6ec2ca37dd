//! Component rows, keyed by `(question_id, fe_id)`.

use libsql::Connection;
use sv_core::entities::{Component, ComponentData};
use sv_core::ids::{PREFIX_COMPONENT, QuestionnaireId};

use crate::error::DatabaseError;
use crate::helpers::{get_bool, parse_enum, parse_json, placeholders};

const SELECT_COLS: &str =
    "id, question_id, fe_id, type, title, props, sort_order, is_hidden, is_locked";

fn row_to_component(row: &libsql::Row) -> Result<Component, DatabaseError> {
    Ok(Component {
        row_id: row.get(0)?,
        question_id: QuestionnaireId::new(row.get(1)?),
        fe_id: row.get(2)?,
        component_type: parse_enum(&row.get::<String>(3)?)?,
        title: row.get(4)?,
        props: parse_json(&row.get::<String>(5)?)?,
        order: row.get(6)?,
        is_hidden: get_bool(row, 7)?,
        is_locked: get_bool(row, 8)?,
    })
}

/// Components of a questionnaire in render order.
pub async fn list_for(
    conn: &Connection,
    question_id: QuestionnaireId,
) -> Result<Vec<Component>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {SELECT_COLS} FROM components WHERE question_id = ?1 \
                 ORDER BY sort_order, id"
            ),
            [question_id.get()],
        )
        .await?;

    let mut components = Vec::new();
    while let Some(row) = rows.next().await? {
        components.push(row_to_component(&row)?);
    }
    Ok(components)
}

/// Insert the component or overwrite the row already holding its `fe_id`.
///
/// An existing row keeps its primary key.
pub async fn upsert(
    conn: &Connection,
    question_id: QuestionnaireId,
    data: &ComponentData,
) -> Result<(), DatabaseError> {
    let props = serde_json::to_string(&data.props)?;
    conn.execute(
        "INSERT INTO components
             (question_id, fe_id, type, title, props, sort_order, is_hidden, is_locked)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT (question_id, fe_id) DO UPDATE SET
             type = excluded.type,
             title = excluded.title,
             props = excluded.props,
             sort_order = excluded.sort_order,
             is_hidden = excluded.is_hidden,
             is_locked = excluded.is_locked",
        libsql::params![
            question_id.get(),
            data.fe_id.as_str(),
            data.component_type.as_str(),
            data.title.as_str(),
            props,
            data.order,
            i64::from(data.is_hidden),
            i64::from(data.is_locked)
        ],
    )
    .await?;
    Ok(())
}

pub async fn delete_by_fe_ids(
    conn: &Connection,
    question_id: QuestionnaireId,
    fe_ids: &[String],
) -> Result<u64, DatabaseError> {
    if fe_ids.is_empty() {
        return Ok(0);
    }
    let sql = format!(
        "DELETE FROM components WHERE question_id = ?1 AND fe_id IN ({})",
        placeholders(2, fe_ids.len())
    );
    let mut params: Vec<libsql::Value> = vec![question_id.get().into()];
    params.extend(fe_ids.iter().map(|f| libsql::Value::from(f.clone())));
    Ok(conn.execute(&sql, libsql::params_from_iter(params)).await?)
}

pub async fn delete_for_questionnaires(
    conn: &Connection,
    ids: &[i64],
) -> Result<u64, DatabaseError> {
    if ids.is_empty() {
        return Ok(0);
    }
    let sql = format!(
        "DELETE FROM components WHERE question_id IN ({})",
        placeholders(1, ids.len())
    );
    Ok(conn
        .execute(&sql, libsql::params_from_iter(ids.iter().copied()))
        .await?)
}

/// Fresh component key via libSQL, e.g. `"fe-3fa85f6457174562"`.
pub async fn generate_fe_id(conn: &Connection) -> Result<String, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT '{PREFIX_COMPONENT}-' || lower(hex(randomblob(8)))"),
            (),
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get::<String>(0)?)
}
