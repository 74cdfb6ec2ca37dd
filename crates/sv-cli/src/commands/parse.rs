use anyhow::Context;
use serde::de::DeserializeOwned;
use sv_core::ids::QuestionnaireId;

/// Parse a questionnaire id argument.
pub fn parse_id(raw: &str) -> anyhow::Result<QuestionnaireId> {
    Ok(QuestionnaireId::parse(raw)?)
}

/// Decode a JSON argument into `T`, naming the flag on failure.
pub fn parse_json<T: DeserializeOwned>(raw: &str, flag: &str) -> anyhow::Result<T> {
    serde_json::from_str(raw).with_context(|| format!("invalid JSON for --{flag}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sv_db::updates::QuestionnairePatch;

    #[test]
    fn rejects_non_numeric_and_non_positive_ids() {
        assert!(parse_id("abc").is_err());
        assert!(parse_id("0").is_err());
        assert!(parse_id("-2").is_err());
        assert_eq!(parse_id(" 12 ").unwrap(), QuestionnaireId::new(12));
    }

    #[test]
    fn json_errors_name_the_flag() {
        let err = parse_json::<QuestionnairePatch>("{", "patch").unwrap_err();
        assert!(err.to_string().contains("--patch"));
    }
}
