use serde::{Deserialize, Serialize};

/// One dataset entry as returned by the data.gouv.fr catalog API.
/// Only the fields the pipeline reads are deserialized; the rest of the
/// payload is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Public catalog page for the dataset.
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub organization: Option<Organization>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    #[serde(default)]
    pub name: Option<String>,
}

/// A downloadable resource attached to a dataset (CSV, JSON, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl DatasetRecord {
    pub fn organization_name(&self) -> Option<&str> {
        self.organization.as_ref().and_then(|o| o.name.as_deref())
    }
}

/// Lightweight view of a dataset for the report's `datasets_found` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub title: String,
    pub description: String,
    pub url: String,
    pub organization: String,
    pub resources_count: usize,
}

impl DatasetSummary {
    pub fn from_record(record: &DatasetRecord) -> Self {
        Self {
            title: if record.title.is_empty() {
                "Sans titre".to_string()
            } else {
                record.title.clone()
            },
            description: record
                .description
                .as_deref()
                .map(|d| truncate_chars(d, 150))
                .unwrap_or_default(),
            url: record.page.clone().unwrap_or_default(),
            organization: record
                .organization_name()
                .unwrap_or("Inconnu")
                .to_string(),
            resources_count: record.resources.len(),
        }
    }
}

/// Char-boundary-safe truncation with a trailing ellipsis when cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

/// One of the five heuristic analysis stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageReport {
    pub title: String,
    pub data: serde_json::Value,
    pub insights: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSteps {
    pub step1: StageReport,
    pub step2: StageReport,
    pub step3: StageReport,
    pub step4: StageReport,
    pub step5: StageReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub text: String,
    pub priority: String,
}

/// The full result of one pipeline run. Immutable once returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub sector: String,
    pub location: Option<String>,
    pub timestamp: String,
    pub datasets_found: Vec<DatasetSummary>,
    /// Absent (not null) when zero datasets were found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_steps: Option<MarketSteps>,
    pub ai_analysis: Option<String>,
    pub ai_recommendations: Option<String>,
    pub recommendations: Vec<Recommendation>,
    pub ai_enabled: bool,
    pub search_terms_used: Vec<String>,
}

/// Economic-indicator lookup for a geographic zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomicIndicators {
    pub location: String,
    pub datasets_available: usize,
    pub sources: Vec<IndicatorSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSource {
    pub title: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(description: Option<&str>) -> DatasetRecord {
        DatasetRecord {
            id: Some("abc".to_string()),
            title: "Commerces de Nice".to_string(),
            description: description.map(str::to_string),
            page: Some("https://www.data.gouv.fr/datasets/abc".to_string()),
            organization: None,
            resources: vec![],
        }
    }

    #[test]
    fn truncate_only_when_needed() {
        assert_eq!(truncate_chars("court", 150), "court");
        let long = "x".repeat(200);
        let cut = truncate_chars(&long, 150);
        assert_eq!(cut.chars().count(), 153);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let accented = "é".repeat(160);
        let cut = truncate_chars(&accented, 150);
        assert!(cut.starts_with("é"));
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn summary_defaults() {
        let summary = DatasetSummary::from_record(&record(None));
        assert_eq!(summary.organization, "Inconnu");
        assert_eq!(summary.description, "");
        assert_eq!(summary.resources_count, 0);
    }

    #[test]
    fn summary_short_description_untouched() {
        let summary = DatasetSummary::from_record(&record(Some("Liste des commerces")));
        assert_eq!(summary.description, "Liste des commerces");
    }

    #[test]
    fn dataset_record_ignores_unknown_fields() {
        let raw = serde_json::json!({
            "id": "xyz",
            "title": "Sirene",
            "metrics": {"views": 12},
            "resources": [{"title": "export", "url": "https://x/y.csv", "format": "csv"}]
        });
        let record: DatasetRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(record.id.as_deref(), Some("xyz"));
        assert_eq!(record.resources.len(), 1);
    }
}
