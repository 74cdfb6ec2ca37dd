use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ComponentType;
use crate::ids::QuestionnaireId;

/// A stored component row.
///
/// `row_id` is the relational primary key. It is kept so callers inside the
/// engine can observe in-place updates; it never appears in caller payloads
/// (see [`ComponentData`]).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Component {
    pub row_id: i64,
    pub question_id: QuestionnaireId,
    pub fe_id: String,
    pub component_type: ComponentType,
    pub title: String,
    pub props: serde_json::Value,
    pub order: i64,
    pub is_hidden: bool,
    pub is_locked: bool,
}

/// A component as supplied by callers and returned in views.
///
/// `props` is opaque: its schema depends on `type` and the engine persists
/// and copies it verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentData {
    #[serde(rename = "fe_id")]
    pub fe_id: String,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub title: String,
    #[serde(default)]
    pub props: serde_json::Value,
    pub order: i64,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub is_locked: bool,
}

impl From<&Component> for ComponentData {
    fn from(c: &Component) -> Self {
        Self {
            fe_id: c.fe_id.clone(),
            component_type: c.component_type,
            title: c.title.clone(),
            props: c.props.clone(),
            order: c.order,
            is_hidden: c.is_hidden,
            is_locked: c.is_locked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_default_to_false_when_omitted() {
        let data: ComponentData = serde_json::from_value(serde_json::json!({
            "fe_id": "c1",
            "type": "questionInput",
            "title": "Name",
            "props": {"placeholder": "..."},
            "order": 0
        }))
        .unwrap();
        assert!(!data.is_hidden);
        assert!(!data.is_locked);
        assert_eq!(data.component_type, ComponentType::QuestionInput);
    }

    #[test]
    fn wire_format_uses_fe_id_and_type_keys() {
        let data = ComponentData {
            fe_id: "c9".into(),
            component_type: ComponentType::QuestionRadio,
            title: "Pick".into(),
            props: serde_json::json!({"options": ["a", "b"]}),
            order: 3,
            is_hidden: true,
            is_locked: false,
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["fe_id"], "c9");
        assert_eq!(json["type"], "questionRadio");
        assert_eq!(json["isHidden"], true);
    }
}
