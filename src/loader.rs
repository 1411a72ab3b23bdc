//! JSON record files in, JSON report out.

use crate::errors::{AppError, ResultExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Parses a JSON array of records. `source` names the input in errors.
pub fn parse_records<T: DeserializeOwned>(content: &str, source: &str) -> Result<Vec<T>, AppError> {
    serde_json::from_str(content).with_context(|| format!("Failed to parse {}", source))
}

/// Reads and parses a JSON array of records from disk.
pub async fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, AppError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(AppError::from)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let records = parse_records(&content, &path.display().to_string())?;
    tracing::debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Serialises a report, pretty-printed or compact.
pub fn render_report<T: Serialize>(report: &T, pretty: bool) -> Result<String, AppError> {
    let output = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Campaign, NewLead};
    use serde_json::json;

    #[test]
    fn test_parse_records() {
        let leads: Vec<NewLead> =
            parse_records(r#"[{"campaign_id": "1"}, {"campaign_id": "2"}]"#, "leads.json").unwrap();
        assert_eq!(leads.len(), 2);
        assert_eq!(leads[1].campaign_id, "2");
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let err = parse_records::<Campaign>("[{", "campaigns.json").unwrap_err();

        assert!(matches!(err.root(), AppError::Serialization(_)));
        assert!(err.to_string().starts_with("Failed to parse campaigns.json"));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join(format!("lead-insights-{}.json", uuid::Uuid::new_v4()));
        let err = load_records::<NewLead>(&path).await.unwrap_err();

        assert!(matches!(err.root(), AppError::Io(_)));
        assert!(err.to_string().contains("Failed to read"));
    }

    #[tokio::test]
    async fn test_load_sample_leads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/sample_leads.json");
        let leads: Vec<NewLead> = load_records(&path).await.unwrap();
        assert_eq!(leads.len(), 5);
    }

    #[test]
    fn test_render_report() {
        let report = json!({ "recommendations": ["a"] });

        assert_eq!(
            render_report(&report, false).unwrap(),
            r#"{"recommendations":["a"]}"#
        );
        assert!(render_report(&report, true).unwrap().contains('\n'));
    }
}
