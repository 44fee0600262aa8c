pub mod stages;

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::catalog::CatalogClient;
use crate::narrative::NarrativeStrategy;
use crate::report::{
    AnalysisReport, DatasetRecord, DatasetSummary, EconomicIndicators, IndicatorSource,
    MarketSteps, Recommendation,
};
use crate::sectors;

/// Hard cap on expansion terms actually queried, whatever the table produced.
const MAX_SEARCH_TERMS: usize = 2;
/// Results requested per catalog query.
const PAGE_SIZE: usize = 8;
/// Stop issuing queries once this many records accumulated pre-dedup.
const ACCUMULATION_CAP: usize = 15;
/// Dataset summaries included in the report.
const MAX_SUMMARIES: usize = 8;

/// Orchestrates one market-analysis run: expansion, aggregation,
/// deduplication, the five heuristic stages and narrative enrichment.
/// Never fails — every degraded input produces a complete report.
pub struct MarketAnalyzer {
    catalog: Arc<CatalogClient>,
    narrative: Arc<dyn NarrativeStrategy>,
}

impl MarketAnalyzer {
    pub fn new(catalog: Arc<CatalogClient>, narrative: Arc<dyn NarrativeStrategy>) -> Self {
        Self { catalog, narrative }
    }

    pub fn backend_enabled(&self) -> bool {
        self.narrative.backend_enabled()
    }

    /// Query the catalog for each term in sequence. Queries run strictly one
    /// after the other so the early stop at `ACCUMULATION_CAP` is
    /// deterministic. Returns the accumulated records and the terms that
    /// were actually sent.
    async fn collect_datasets(
        &self,
        terms: &[String],
        location: Option<&str>,
    ) -> (Vec<DatasetRecord>, Vec<String>) {
        let mut accumulated = Vec::new();
        let mut used_terms = Vec::new();

        for term in terms.iter().take(MAX_SEARCH_TERMS) {
            let query = match location {
                Some(loc) => format!("{} {}", term, loc),
                None => term.clone(),
            };

            let results = self.catalog.search(&query, PAGE_SIZE).await;
            debug!(query = %query, results = results.len(), "catalog term queried");

            used_terms.push(term.clone());
            accumulated.extend(results);

            if accumulated.len() >= ACCUMULATION_CAP {
                break;
            }
        }

        (accumulated, used_terms)
    }

    /// Order-preserving dedup on the dataset id. First occurrence of each
    /// non-empty id wins; records without an id are all kept.
    fn dedup(records: Vec<DatasetRecord>) -> Vec<DatasetRecord> {
        let mut seen = HashSet::new();
        records
            .into_iter()
            .filter(|ds| match ds.id.as_deref() {
                Some(id) if !id.is_empty() => seen.insert(id.to_string()),
                _ => true,
            })
            .collect()
    }

    /// Run the full pipeline for one sector/location request.
    pub async fn analyze_market(&self, sector: &str, location: Option<&str>) -> AnalysisReport {
        let search_terms = sectors::expand_search_terms(sector);
        debug!(sector, ?search_terms, "search terms expanded");

        let (accumulated, used_terms) = self.collect_datasets(&search_terms, location).await;
        let datasets = Self::dedup(accumulated);

        info!(
            sector,
            location = location.unwrap_or("-"),
            unique_datasets = datasets.len(),
            "aggregation complete"
        );

        let (datasets_found, market_steps, ai_analysis, ai_recommendations) =
            if datasets.is_empty() {
                // No-data path: no stage reports, recommendations only.
                let recommendations = self
                    .narrative
                    .recommend_without_data(sector, location)
                    .await;
                (Vec::new(), None, None, recommendations)
            } else {
                let summaries: Vec<DatasetSummary> = datasets
                    .iter()
                    .take(MAX_SUMMARIES)
                    .map(DatasetSummary::from_record)
                    .collect();

                // Stages consume the full deduplicated set, not the capped
                // summary list.
                let steps = MarketSteps {
                    step1: stages::market_size(&datasets, sector, location),
                    step2: stages::target_audience(&datasets, sector, location),
                    step3: stages::competition(&datasets, sector, location),
                    step4: stages::positioning(&datasets, sector, location),
                    step5: stages::business_plan(&datasets, sector, location),
                };

                let analysis = self
                    .narrative
                    .describe_datasets(&datasets, sector, location)
                    .await;
                let recommendations = self
                    .narrative
                    .recommend(sector, location, datasets.len())
                    .await;

                (summaries, Some(steps), analysis, recommendations)
            };

        AnalysisReport {
            sector: sector.to_string(),
            location: location.map(str::to_string),
            timestamp: chrono::Utc::now().to_rfc3339(),
            datasets_found,
            market_steps,
            ai_analysis,
            ai_recommendations,
            recommendations: Self::base_recommendations(sector, location),
            ai_enabled: self.narrative.backend_enabled(),
            search_terms_used: used_terms,
        }
    }

    /// The fixed deterministic recommendation list present in every report.
    fn base_recommendations(sector: &str, location: Option<&str>) -> Vec<Recommendation> {
        let zone = location
            .map(|l| format!(" dans la zone {}", l))
            .unwrap_or_default();

        vec![
            Recommendation {
                category: "Définition du marché".to_string(),
                text: format!("Analyser le secteur {}{}", sector, zone),
                priority: "high".to_string(),
            },
            Recommendation {
                category: "Analyse de la demande".to_string(),
                text: "Étudier les comportements d'achat et créer des personas clients"
                    .to_string(),
                priority: "high".to_string(),
            },
            Recommendation {
                category: "Analyse de l'offre".to_string(),
                text: "Identifier les concurrents directs et indirects via les données publiques"
                    .to_string(),
                priority: "medium".to_string(),
            },
            Recommendation {
                category: "Conformité RGPD".to_string(),
                text: "Toutes les données utilisées sont publiques et conformes au RGPD"
                    .to_string(),
                priority: "info".to_string(),
            },
        ]
    }

    /// Economic-indicator lookup for a zone: one catalog query, top sources.
    pub async fn economic_indicators(&self, location: &str) -> EconomicIndicators {
        let query = format!("économie {} entreprises", location);
        let datasets = self.catalog.search(&query, 10).await;

        let sources = datasets
            .iter()
            .take(3)
            .map(|ds| IndicatorSource {
                title: ds.title.clone(),
                url: ds.page.clone().unwrap_or_default(),
            })
            .collect();

        EconomicIndicators {
            location: location.to_string(),
            datasets_available: datasets.len(),
            sources,
        }
    }
}
