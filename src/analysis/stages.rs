//! The five heuristic analysis stages. Each is a pure function of
//! `(datasets, sector, location)` — no ordering dependency between stages,
//! each independently testable. Insight text is French, aimed at the
//! non-specialist reading the report.

use serde_json::json;

use crate::report::{DatasetRecord, StageReport};
use crate::sectors::{
    lookup, GENERIC_PERSONAS, GENERIC_POSITIONING, SECTOR_PERSONAS, SECTOR_POSITIONING,
};

/// Title keywords hinting at establishment/competitor registries.
const COMPETITION_KEYWORDS: &[&str] =
    &["établissement", "entreprise", "commerce", "sirene", "siret"];

/// Title keywords hinting at economic/demographic sources.
const ECONOMIC_KEYWORDS: &[&str] =
    &["économique", "emploi", "démographique", "population", "revenus"];

/// Plain char cap, no ellipsis — the stage `data` maps carry raw clipped
/// titles, unlike the 150-char description summaries.
fn clip_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn titles_matching<'a>(
    datasets: &'a [DatasetRecord],
    keywords: &[&str],
) -> Vec<&'a DatasetRecord> {
    datasets
        .iter()
        .filter(|ds| {
            let title = ds.title.to_lowercase();
            keywords.iter().any(|kw| title.contains(kw))
        })
        .collect()
}

/// Stage 1 — market size, classified on the total resource count.
pub fn market_size(
    datasets: &[DatasetRecord],
    sector: &str,
    location: Option<&str>,
) -> StageReport {
    let total_resources: usize = datasets.iter().map(|ds| ds.resources.len()).sum();

    let mut insights = vec![format!(
        "{} sources de données identifiées pour {}",
        datasets.len(),
        sector
    )];
    if let Some(loc) = location {
        insights.push(format!("Zone géographique: {}", loc));
    }
    insights.push(format!(
        "{} fichiers de données disponibles",
        total_resources
    ));

    // Threshold ladder: >50 important, >20 medium, otherwise niche.
    insights.push(
        if total_resources > 50 {
            "Marché important avec de nombreuses données disponibles"
        } else if total_resources > 20 {
            "Marché de taille moyenne, données suffisantes"
        } else {
            "Marché de niche, données limitées"
        }
        .to_string(),
    );

    StageReport {
        title: "Étape 1 - Taille du marché".to_string(),
        data: json!({
            "datasets_disponibles": datasets.len(),
            "ressources_totales": total_resources,
            "secteur": sector,
            "zone": location.unwrap_or("France"),
        }),
        insights,
    }
}

/// Stage 2 — target audience from the persona table.
pub fn target_audience(
    _datasets: &[DatasetRecord],
    sector: &str,
    location: Option<&str>,
) -> StageReport {
    let personas: &[&str] = lookup(sector, SECTOR_PERSONAS)
        .copied()
        .unwrap_or(GENERIC_PERSONAS);

    let mut insights = vec![format!(
        "{} segments de clientèle identifiés:",
        personas.len()
    )];
    for persona in personas {
        insights.push(format!("  • {}", persona));
    }
    if let Some(loc) = location {
        insights.push(format!("Ciblage géographique: {}", loc));
    }

    StageReport {
        title: "Étape 2 - Clientèle cible".to_string(),
        data: json!({
            "personas_identifies": personas,
            "nombre_segments": personas.len(),
        }),
        insights,
    }
}

/// Stage 3 — competition, from datasets that look like establishment
/// registries. The SWOT content itself is left to the user.
pub fn competition(
    datasets: &[DatasetRecord],
    _sector: &str,
    _location: Option<&str>,
) -> StageReport {
    let establishment_data = titles_matching(datasets, COMPETITION_KEYWORDS);

    let relevant_titles: Vec<String> = establishment_data
        .iter()
        .take(3)
        .map(|ds| clip_chars(&ds.title, 60))
        .collect();

    let insights = if establishment_data.is_empty() {
        vec![
            "Peu de données concurrentielles disponibles".to_string(),
            "Complétez avec recherche terrain locale".to_string(),
        ]
    } else {
        vec![
            format!(
                "{} sources de données sur les établissements",
                establishment_data.len()
            ),
            "Possibilité d'identifier les concurrents directs".to_string(),
            "Analyse SWOT recommandée:".to_string(),
            "  • Forces: Votre différenciation".to_string(),
            "  • Faiblesses: À améliorer".to_string(),
            "  • Opportunités: Niches non exploitées".to_string(),
            "  • Menaces: Concurrents établis".to_string(),
        ]
    };

    StageReport {
        title: "Étape 3 - Concurrence".to_string(),
        data: json!({
            "sources_concurrence": establishment_data.len(),
            "datasets_pertinents": relevant_titles,
        }),
        insights,
    }
}

/// Stage 4 — positioning strategies and differentiation axes.
pub fn positioning(
    _datasets: &[DatasetRecord],
    sector: &str,
    location: Option<&str>,
) -> StageReport {
    let strategy = lookup(sector, SECTOR_POSITIONING)
        .copied()
        .unwrap_or(GENERIC_POSITIONING);

    let mut insights = vec!["Stratégies de positionnement recommandées:".to_string()];
    for (i, strat) in strategy.strategies.iter().enumerate() {
        insights.push(format!("  {}. {}", i + 1, strat));
    }

    insights.push("Axes de différenciation possibles:".to_string());
    for diff in strategy.differentiators {
        insights.push(format!("  • {}", diff));
    }

    if let Some(loc) = location {
        insights.push(format!(
            "Adaptez votre positionnement au contexte de {}",
            loc
        ));
    }

    StageReport {
        title: "Étape 4 - Positionnement stratégique".to_string(),
        data: json!({
            "strategies_possibles": strategy.strategies,
            "axes_differentiation": strategy.differentiators,
        }),
        insights,
    }
}

/// Stage 5 — business-plan checklist, enriched with any economic sources
/// found in the dataset titles.
pub fn business_plan(
    datasets: &[DatasetRecord],
    _sector: &str,
    _location: Option<&str>,
) -> StageReport {
    let economic_data = titles_matching(datasets, ECONOMIC_KEYWORDS);

    let bp_titles: Vec<String> = economic_data
        .iter()
        .take(3)
        .map(|ds| clip_chars(&ds.title, 60))
        .collect();

    let mut insights = vec![
        "Éléments du Business Plan:".to_string(),
        "Investissement initial:".to_string(),
        "  • Local/Loyer".to_string(),
        "  • Équipement/Matériel".to_string(),
        "  • Stock initial".to_string(),
        "  • Marketing/Communication".to_string(),
        "Prévisions financières:".to_string(),
        "  • Chiffre d'affaires prévisionnel".to_string(),
        "  • Charges fixes et variables".to_string(),
        "  • Seuil de rentabilité".to_string(),
        "  • Cash-flow sur 3 ans".to_string(),
    ];

    if economic_data.is_empty() {
        insights.push("Complétez avec données chambre de commerce locale".to_string());
    } else {
        insights.push(format!(
            "{} sources de données économiques disponibles",
            economic_data.len()
        ));
        insights.push("Utilisez ces données pour affiner vos prévisions".to_string());
    }

    insights.push("Prochaines actions:".to_string());
    insights.push("  1. Télécharger les datasets pertinents".to_string());
    insights.push("  2. Analyser la démographie locale".to_string());
    insights.push("  3. Calculer le marché potentiel".to_string());
    insights.push("  4. Établir les projections financières".to_string());
    insights.push("  5. Rédiger le plan d'action".to_string());

    StageReport {
        title: "Étape 5 - Business Plan".to_string(),
        data: json!({
            "sources_economiques": economic_data.len(),
            "datasets_pour_bp": bp_titles,
        }),
        insights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Resource;

    fn dataset(title: &str, resource_count: usize) -> DatasetRecord {
        DatasetRecord {
            id: Some(title.to_string()),
            title: title.to_string(),
            description: None,
            page: None,
            organization: None,
            resources: (0..resource_count)
                .map(|_| Resource {
                    title: None,
                    url: None,
                })
                .collect(),
        }
    }

    fn classification(total_resources: usize) -> String {
        let datasets = vec![dataset("t", total_resources)];
        market_size(&datasets, "commerce", None)
            .insights
            .last()
            .unwrap()
            .clone()
    }

    #[test]
    fn market_size_ladder_is_threshold_exact() {
        assert!(classification(20).contains("niche"));
        assert!(classification(21).contains("taille moyenne"));
        assert!(classification(50).contains("taille moyenne"));
        assert!(classification(51).contains("Marché important"));
    }

    #[test]
    fn market_size_counts_and_location_line() {
        let datasets = vec![dataset("a", 2), dataset("b", 3)];
        let report = market_size(&datasets, "boulangerie", Some("Nice"));

        assert_eq!(report.data["datasets_disponibles"], 2);
        assert_eq!(report.data["ressources_totales"], 5);
        assert_eq!(report.data["zone"], "Nice");
        assert!(report
            .insights
            .iter()
            .any(|l| l == "Zone géographique: Nice"));

        let without = market_size(&datasets, "boulangerie", None);
        assert_eq!(without.data["zone"], "France");
        assert!(!without.insights.iter().any(|l| l.starts_with("Zone")));
    }

    #[test]
    fn target_audience_falls_back_to_generic_personas() {
        let report = target_audience(&[], "plomberie", None);
        assert_eq!(report.data["nombre_segments"], 3);
        assert!(report.insights.iter().any(|l| l.contains("Grand public")));

        let known = target_audience(&[], "boulangerie", None);
        assert!(known
            .insights
            .iter()
            .any(|l| l.contains("Habitants du quartier")));
    }

    #[test]
    fn competition_emits_swot_block_on_registry_titles() {
        let datasets = vec![
            dataset("Base SIRENE des entreprises", 1),
            dataset("Qualité de l'air", 1),
        ];
        let report = competition(&datasets, "commerce", None);
        assert_eq!(report.data["sources_concurrence"], 1);
        assert!(report
            .insights
            .iter()
            .any(|l| l.contains("Analyse SWOT recommandée")));
    }

    #[test]
    fn competition_suggests_field_research_without_matches() {
        let datasets = vec![dataset("Qualité de l'air", 1)];
        let report = competition(&datasets, "commerce", None);
        assert_eq!(report.data["sources_concurrence"], 0);
        assert!(report
            .insights
            .iter()
            .any(|l| l.contains("recherche terrain")));
    }

    #[test]
    fn positioning_appends_location_adaptation() {
        let report = positioning(&[], "restaurant", Some("Marseille"));
        assert!(report.insights.iter().any(|l| l.contains("  1. Qualité premium")));
        assert!(report
            .insights
            .last()
            .unwrap()
            .contains("contexte de Marseille"));

        let generic = positioning(&[], "plomberie", None);
        assert_eq!(generic.data["strategies_possibles"][0], "Qualité");
    }

    #[test]
    fn stage_data_titles_are_clipped_without_ellipsis() {
        let long = format!("Entreprises {}", "x".repeat(80));
        let report = competition(&[dataset(&long, 1)], "commerce", None);
        let clipped = report.data["datasets_pertinents"][0].as_str().unwrap();
        assert_eq!(clipped.chars().count(), 60);
        assert!(!clipped.ends_with("..."));

        let long_eco = format!("Population {}", "y".repeat(80));
        let report = business_plan(&[dataset(&long_eco, 1)], "commerce", None);
        let clipped = report.data["datasets_pour_bp"][0].as_str().unwrap();
        assert_eq!(clipped.chars().count(), 60);
        assert!(!clipped.ends_with("..."));
    }

    #[test]
    fn business_plan_reports_economic_sources() {
        let datasets = vec![
            dataset("Population légale 2023", 1),
            dataset("Revenus des ménages", 1),
        ];
        let report = business_plan(&datasets, "commerce", None);
        assert_eq!(report.data["sources_economiques"], 2);
        assert!(report
            .insights
            .iter()
            .any(|l| l.contains("2 sources de données économiques")));

        let empty = business_plan(&[], "commerce", None);
        assert!(empty
            .insights
            .iter()
            .any(|l| l.contains("chambre de commerce")));
        // The checklist and next actions are always present.
        assert!(empty.insights.iter().any(|l| l.contains("Seuil de rentabilité")));
        assert!(empty.insights.iter().any(|l| l.contains("5. Rédiger le plan d'action")));
    }
}
