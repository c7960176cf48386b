//! JSON export of the current result.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::info;

use reqfinder_shared::{QueryResult, ReqFinderError, Result};

/// File name prefix for exported results.
const EXPORT_PREFIX: &str = "regulatory-requirements";

/// A downloadable export: file name plus JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Deterministic file name derived from product, market, and timestamp.
    pub filename: String,
    /// Pretty-printed JSON of the result.
    pub body: String,
}

/// Build the export file name, e.g.
/// `regulatory-requirements_wearable-tech_european-union_2024-01-05T10-20-30-123Z.json`.
pub fn export_filename(product_type: &str, market: &str, at: DateTime<Utc>) -> String {
    let timestamp = at
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
        .replace([':', '.'], "-");
    format!(
        "{EXPORT_PREFIX}_{}_{}_{timestamp}.json",
        slug(product_type),
        slug(market)
    )
}

/// Serialize `result` into an [`ExportArtifact`] stamped with `at`.
pub fn build_artifact(result: &QueryResult, at: DateTime<Utc>) -> Result<ExportArtifact> {
    let body = serde_json::to_string_pretty(result)
        .map_err(|e| ReqFinderError::Render(format!("failed to serialize export: {e}")))?;

    Ok(ExportArtifact {
        filename: export_filename(result.product_type(), result.market(), at),
        body,
    })
}

/// Write an artifact into `dir`, creating the directory if needed.
pub fn write_artifact(dir: &Path, artifact: &ExportArtifact) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| ReqFinderError::io(dir, e))?;

    let path = dir.join(&artifact.filename);
    std::fs::write(&path, &artifact.body).map_err(|e| ReqFinderError::io(&path, e))?;
    info!(?path, bytes = artifact.body.len(), "export written");

    Ok(path)
}

/// Collapse runs of whitespace and characters unsafe in file names to `-`,
/// then lower-case.
fn slug(value: &str) -> String {
    static UNSAFE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"[\s/\\<>:"|?*\p{Cc}]+"#).expect("valid regex")
    });

    UNSAFE_RUN_RE.replace_all(value, "-").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use reqfinder_shared::{Requirement, RequirementsDocument, SampleDocument};

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 5, 10, 20, 30).unwrap()
            + chrono::Duration::milliseconds(123)
    }

    fn wearable() -> RequirementsDocument {
        RequirementsDocument {
            product_type: "Wearable Tech".into(),
            market: "European Union".into(),
            summary: "CE marking applies.".into(),
            requirements: vec![
                Requirement {
                    name: "CE Marking".into(),
                    category: "Certification".into(),
                    description: "RED".into(),
                    source: Some("https://eur-lex.europa.eu".into()),
                },
                Requirement {
                    name: "WEEE".into(),
                    category: "Labeling".into(),
                    description: "Bin symbol".into(),
                    source: None,
                },
            ],
        }
    }

    #[test]
    fn filename_matches_pattern() {
        assert_eq!(
            export_filename("Wearable Tech", "European Union", fixed_time()),
            "regulatory-requirements_wearable-tech_european-union_2024-01-05T10-20-30-123Z.json"
        );
    }

    #[test]
    fn whitespace_runs_collapse_to_one_hyphen() {
        assert_eq!(slug("Smart \t  Home\nHub"), "smart-home-hub");
    }

    #[test]
    fn path_separators_and_controls_never_reach_the_filename() {
        assert_eq!(slug("USB charger / adapter"), "usb-charger-adapter");
        assert_eq!(slug(r"a\b:c*d?"), "a-b-c-d-");
        assert_eq!(slug("tab\u{7}bell"), "tab-bell");

        let name = export_filename("USB charger / adapter", "EU", fixed_time());
        assert!(!name.contains('/'));
        assert!(!name.contains('\\'));
    }

    #[test]
    fn slashed_product_exports_into_target_dir() {
        let dir = std::env::temp_dir().join(format!("reqfinder-export-slash-{}", std::process::id()));
        let mut doc = wearable();
        doc.product_type = "USB charger / adapter".into();
        doc.market = "EU".into();
        let artifact = build_artifact(&QueryResult::Requirements(doc), fixed_time()).unwrap();

        let path = write_artifact(&dir, &artifact).unwrap();

        assert_eq!(path.parent(), Some(dir.as_path()));
        assert_eq!(
            artifact.filename,
            "regulatory-requirements_usb-charger-adapter_eu_2024-01-05T10-20-30-123Z.json"
        );
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn artifact_body_roundtrips() {
        let result = QueryResult::Requirements(wearable());
        let artifact = build_artifact(&result, fixed_time()).unwrap();
        let parsed: QueryResult = serde_json::from_str(&artifact.body).unwrap();
        assert_eq!(parsed, result);
        assert!(artifact.filename.contains("wearable-tech_european-union"));
    }

    #[test]
    fn sample_artifact_roundtrips() {
        let result = QueryResult::Sample(SampleDocument {
            product_type: "fitness band with lithium battery".into(),
            market: "eu".into(),
            title: "EU".into(),
            content: "## CE".into(),
        });
        let artifact = build_artifact(&result, fixed_time()).unwrap();
        assert!(
            artifact
                .filename
                .starts_with("regulatory-requirements_fitness-band-with-lithium-battery_eu_")
        );
        let parsed: QueryResult = serde_json::from_str(&artifact.body).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn write_artifact_creates_file() {
        let dir = std::env::temp_dir().join(format!("reqfinder-export-{}", std::process::id()));
        let artifact = build_artifact(&QueryResult::Requirements(wearable()), fixed_time()).unwrap();

        let path = write_artifact(&dir, &artifact).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, artifact.body);

        std::fs::remove_dir_all(&dir).ok();
    }
}
