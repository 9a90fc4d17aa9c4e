//! JSON export for level summaries
//!
//! Writes the summaries of a sweep as a JSON array, one object per level, for
//! programmatic consumption. Text tables are produced elsewhere.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::MetricsError;
use crate::results::LevelSummary;

/// Serialize `summaries` to a JSON string.
pub fn to_json_string(summaries: &[LevelSummary], pretty: bool) -> Result<String, MetricsError> {
    let json = if pretty {
        serde_json::to_string_pretty(summaries)
    } else {
        serde_json::to_string(summaries)
    }?;
    Ok(json)
}

/// Write `summaries` to `path` as JSON.
pub fn export_json(summaries: &[LevelSummary], path: &Path, pretty: bool) -> Result<(), MetricsError> {
    JsonExporter::new(path, pretty).export(summaries)
}

/// Something that can persist the summaries of a sweep.
pub trait SummaryExporter {
    fn export(&self, summaries: &[LevelSummary]) -> Result<(), MetricsError>;
}

/// JSON file exporter
#[derive(Debug)]
pub struct JsonExporter {
    path: PathBuf,
    pretty: bool,
}

impl JsonExporter {
    /// # Arguments
    /// * `path` - Output file path
    /// * `pretty` - Whether to pretty-print the JSON
    pub fn new(path: &Path, pretty: bool) -> Self {
        Self {
            path: path.to_path_buf(),
            pretty,
        }
    }
}

impl SummaryExporter for JsonExporter {
    fn export(&self, summaries: &[LevelSummary]) -> Result<(), MetricsError> {
        let json = to_json_string(summaries, self.pretty)?;

        let mut file = File::create(&self.path).map_err(|e| {
            MetricsError::ExportError(format!("Failed to create {}: {e}", self.path.display()))
        })?;
        file.write_all(json.as_bytes())?;

        tracing::debug!(path = %self.path.display(), levels = summaries.len(), "Exported level summaries");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::ConfigurationOrdering;
    use crate::results::Results;

    fn summary() -> LevelSummary {
        Results::new(0.05, 1, 1, 1, ConfigurationOrdering::ArrivalOrder).summarize()
    }

    #[test]
    fn test_json_string_contains_levels() {
        let json = to_json_string(&[summary()], false).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("\"utilization\":0.05"));
        assert!(json.contains("\"wait_by_class\""));
    }

    #[test]
    fn test_export_writes_file() {
        let path = std::env::temp_dir().join(format!("qsim-export-{}.json", std::process::id()));
        export_json(&[summary()], &path, true).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value.as_array().map(|a| a.len()), Some(1));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let path = Path::new("/nonexistent-qsim-dir/out.json");
        assert!(matches!(
            export_json(&[summary()], path, false),
            Err(MetricsError::ExportError(_))
        ));
    }
}
