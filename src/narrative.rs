//! Narrative enrichment of the analysis report.
//!
//! Two interchangeable strategies behind one trait: `GenerativeNarrative`
//! asks the text-generation backend, `TemplateNarrative` produces
//! deterministic French text. Both are best-effort — a failed call degrades
//! the field to `None` and never fails the run.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::llm::LlmClient;
use crate::report::{truncate_chars, DatasetRecord};

#[async_trait]
pub trait NarrativeStrategy: Send + Sync {
    /// Whether a generative backend is answering. Reported in the health
    /// endpoint and as the report's `ai_enabled` flag.
    fn backend_enabled(&self) -> bool;

    /// Free-text commentary on the aggregated datasets.
    async fn describe_datasets(
        &self,
        datasets: &[DatasetRecord],
        sector: &str,
        location: Option<&str>,
    ) -> Option<String>;

    /// Free-text recommendations from sector, location and dataset count.
    async fn recommend(
        &self,
        sector: &str,
        location: Option<&str>,
        dataset_count: usize,
    ) -> Option<String>;

    /// Recommendations for the no-data path.
    async fn recommend_without_data(
        &self,
        sector: &str,
        location: Option<&str>,
    ) -> Option<String>;
}

fn zone_suffix(location: Option<&str>) -> String {
    location.map(|l| format!(" à {}", l)).unwrap_or_default()
}

/// Backend-backed strategy. Availability is resolved once by `probe` and
/// carried in the value; a backend that recovers later is picked up on the
/// next process start, not mid-run.
pub struct GenerativeNarrative {
    llm: Arc<LlmClient>,
    available: bool,
}

impl GenerativeNarrative {
    pub fn new(llm: Arc<LlmClient>, available: bool) -> Self {
        Self { llm, available }
    }

    pub async fn probe(llm: Arc<LlmClient>) -> Self {
        let available = llm.probe().await;
        if available {
            info!(model = llm.model(), "text-generation backend available");
        } else {
            info!("text-generation backend unavailable, narrative fields will be empty");
        }
        Self::new(llm, available)
    }

    async fn complete_or_none(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Option<String> {
        match self.llm.complete(prompt, max_tokens, temperature).await {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "narrative completion failed");
                None
            }
        }
    }
}

#[async_trait]
impl NarrativeStrategy for GenerativeNarrative {
    fn backend_enabled(&self) -> bool {
        self.available
    }

    async fn describe_datasets(
        &self,
        datasets: &[DatasetRecord],
        sector: &str,
        location: Option<&str>,
    ) -> Option<String> {
        if !self.available || datasets.is_empty() {
            return None;
        }

        // Short context: at most 3 truncated titles.
        let summary = datasets
            .iter()
            .take(3)
            .map(|ds| format!("- {}", truncate_chars(&ds.title, 80)))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "Analyse rapide du marché {sector}{zone}.\n\n\
             Datasets: {summary}\n\n\
             En 3 points courts (max 150 mots):\n\
             1. Pertinence des données\n\
             2. Opportunité principale\n\
             3. Risque principal",
            sector = sector,
            zone = zone_suffix(location),
            summary = summary,
        );

        self.complete_or_none(&prompt, 200, 0.7).await
    }

    async fn recommend(
        &self,
        sector: &str,
        location: Option<&str>,
        dataset_count: usize,
    ) -> Option<String> {
        if !self.available {
            return None;
        }

        let prompt = format!(
            "3 conseils rapides pour étude de marché {sector}{zone}.\n\n\
             {count} datasets trouvés.\n\n\
             Format: liste numérotée, 1 ligne par conseil.",
            sector = sector,
            zone = zone_suffix(location),
            count = dataset_count,
        );

        self.complete_or_none(&prompt, 150, 0.7).await
    }

    async fn recommend_without_data(
        &self,
        sector: &str,
        location: Option<&str>,
    ) -> Option<String> {
        if !self.available {
            return None;
        }

        let prompt = format!(
            "Conseils pour étude de marché {sector}{zone}.\n\n\
             Aucune donnée publique spécifique trouvée.\n\n\
             3 conseils pour trouver des informations utiles \
             (sources alternatives, approches créatives).\n\
             Format: liste courte.",
            sector = sector,
            zone = zone_suffix(location),
        );

        self.complete_or_none(&prompt, 200, 0.8).await
    }
}

/// Deterministic fallback strategy for deployments without a generative
/// backend. Same report shape, templated French text.
pub struct TemplateNarrative;

impl TemplateNarrative {
    fn recommendations_text(
        sector: &str,
        location: Option<&str>,
        dataset_count: usize,
    ) -> String {
        let mut text = format!(
            "Recommandations pour votre projet {}{}\n\n",
            sector,
            zone_suffix(location)
        );

        if dataset_count > 0 {
            text.push_str("Points positifs:\n");
            text.push_str(&format!(
                "  • {} sources de données disponibles\n",
                dataset_count
            ));
            text.push_str("  • Données publiques accessibles gratuitement\n");
            text.push_str("  • Informations officielles et fiables\n\n");
        }

        text.push_str("Prochaines étapes:\n");
        text.push_str("  1. Télécharger et analyser les datasets pertinents\n");
        text.push_str("  2. Étudier la démographie de la zone\n");
        text.push_str("  3. Analyser la concurrence existante\n");
        text.push_str("  4. Identifier votre clientèle cible\n");
        text.push_str("  5. Élaborer votre business plan\n");

        text
    }
}

#[async_trait]
impl NarrativeStrategy for TemplateNarrative {
    fn backend_enabled(&self) -> bool {
        false
    }

    async fn describe_datasets(
        &self,
        datasets: &[DatasetRecord],
        sector: &str,
        location: Option<&str>,
    ) -> Option<String> {
        if datasets.is_empty() {
            return None;
        }

        let mut text = format!("Analyse du secteur {}{}\n\n", sector, zone_suffix(location));
        text.push_str(&format!(
            "{} sources de données identifiées\n\n",
            datasets.len()
        ));

        // Distinct publishing organizations, first three, arrival order.
        let mut orgs: Vec<&str> = Vec::new();
        for ds in datasets.iter().take(5) {
            if let Some(name) = ds.organization_name() {
                if !orgs.contains(&name) {
                    orgs.push(name);
                }
            }
        }

        if !orgs.is_empty() {
            text.push_str("Principales sources:\n");
            for org in orgs.iter().take(3) {
                text.push_str(&format!("  • {}\n", org));
            }
            text.push('\n');
        }

        text.push_str("Recommandations:\n");
        text.push_str(&format!(
            "  • Consultez les {} datasets identifiés ci-dessous\n",
            datasets.len()
        ));
        text.push_str("  • Analysez les données démographiques et économiques\n");
        text.push_str("  • Identifiez les zones à fort potentiel\n");
        text.push_str("  • Étudiez la concurrence locale\n");

        Some(text)
    }

    async fn recommend(
        &self,
        sector: &str,
        location: Option<&str>,
        dataset_count: usize,
    ) -> Option<String> {
        Some(Self::recommendations_text(sector, location, dataset_count))
    }

    async fn recommend_without_data(
        &self,
        sector: &str,
        location: Option<&str>,
    ) -> Option<String> {
        Some(Self::recommendations_text(sector, location, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Organization;

    fn record(title: &str, org: Option<&str>) -> DatasetRecord {
        DatasetRecord {
            id: Some(title.to_string()),
            title: title.to_string(),
            description: None,
            page: None,
            organization: org.map(|name| Organization {
                name: Some(name.to_string()),
            }),
            resources: vec![],
        }
    }

    #[tokio::test]
    async fn template_lists_organizations_once() {
        let datasets = vec![
            record("Sirene", Some("INSEE")),
            record("Emplois", Some("INSEE")),
            record("Commerces", Some("Ville de Nice")),
        ];
        let text = TemplateNarrative
            .describe_datasets(&datasets, "boulangerie", Some("Nice"))
            .await
            .unwrap();

        assert!(text.contains("Analyse du secteur boulangerie à Nice"));
        assert!(text.contains("3 sources de données identifiées"));
        assert_eq!(text.matches("INSEE").count(), 1);
        assert!(text.contains("Ville de Nice"));
    }

    #[tokio::test]
    async fn template_analysis_absent_without_datasets() {
        assert!(TemplateNarrative
            .describe_datasets(&[], "boulangerie", None)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn template_recommendations_skip_positives_at_zero() {
        let with_data = TemplateNarrative
            .recommend("fleuriste", None, 4)
            .await
            .unwrap();
        assert!(with_data.contains("4 sources de données disponibles"));

        let without = TemplateNarrative
            .recommend_without_data("fleuriste", None)
            .await
            .unwrap();
        assert!(!without.contains("Points positifs"));
        assert!(without.contains("Prochaines étapes"));
    }

    #[tokio::test]
    async fn generative_disabled_yields_no_fields() {
        let llm = Arc::new(LlmClient::from_env().unwrap());
        let strategy = GenerativeNarrative::new(llm, false);

        assert!(!strategy.backend_enabled());
        assert!(strategy
            .describe_datasets(&[record("Sirene", None)], "commerce", None)
            .await
            .is_none());
        assert!(strategy.recommend("commerce", None, 1).await.is_none());
        assert!(strategy
            .recommend_without_data("commerce", None)
            .await
            .is_none());
    }
}
