//! Static sector knowledge: search-term expansions, customer personas and
//! positioning strategies per business sector.
//!
//! All tables are ordered slices scanned front to back; the first key that
//! matches wins, so the declaration order below is part of the contract.
//! A key matches when it is a substring of the lowercased sector string or
//! the sector string is a substring of the key.

/// Broader catalog search terms per sector keyword.
pub const SECTOR_EXPANSIONS: &[(&str, &[&str])] = &[
    (
        "boulangerie",
        &["commerce alimentaire", "artisanat", "commerces", "établissements"],
    ),
    (
        "restaurant",
        &["restauration", "commerce", "tourisme", "établissements"],
    ),
    (
        "commerce",
        &["commerces", "établissements", "entreprises", "économie"],
    ),
    (
        "technologie",
        &["innovation", "numérique", "entreprises", "startups"],
    ),
    ("santé", &["santé", "établissements santé", "professionnels santé"]),
    ("immobilier", &["logement", "construction", "foncier", "urbanisme"]),
    ("tourisme", &["tourisme", "hébergement", "culture", "loisirs"]),
    ("transport", &["transport", "mobilité", "infrastructure"]),
    ("agriculture", &["agriculture", "exploitation agricole", "alimentaire"]),
    ("éducation", &["éducation", "formation", "établissements scolaires"]),
];

/// Fallback terms appended when no sector key matches.
pub const GENERIC_EXPANSION: &[&str] =
    &["entreprises", "établissements", "activité économique"];

/// Customer personas per sector keyword (stage 2).
pub const SECTOR_PERSONAS: &[(&str, &[&str])] = &[
    (
        "restaurant",
        &["Familles", "Professionnels en pause déjeuner", "Touristes", "Étudiants"],
    ),
    (
        "boulangerie",
        &["Habitants du quartier", "Travailleurs locaux", "Familles", "Retraités"],
    ),
    ("commerce", &["Consommateurs locaux", "Entreprises B2B", "Touristes"]),
    (
        "technologie",
        &["Entreprises", "Startups", "Collectivités", "Particuliers tech-savvy"],
    ),
    (
        "santé",
        &["Patients locaux", "Personnes âgées", "Familles avec enfants", "Sportifs"],
    ),
    (
        "tourisme",
        &["Touristes nationaux", "Touristes internationaux", "Excursionnistes", "Groupes"],
    ),
];

pub const GENERIC_PERSONAS: &[&str] = &["Grand public", "Professionnels", "Collectivités"];

/// Positioning strategies and differentiation axes (stage 4).
#[derive(Debug, Clone, Copy)]
pub struct Positioning {
    pub strategies: &'static [&'static str],
    pub differentiators: &'static [&'static str],
}

pub const SECTOR_POSITIONING: &[(&str, Positioning)] = &[
    (
        "restaurant",
        Positioning {
            strategies: &["Qualité premium", "Rapidité/Prix bas", "Cuisine spécialisée", "Bio/Local"],
            differentiators: &["Menu unique", "Ambiance", "Service", "Origine produits"],
        },
    ),
    (
        "boulangerie",
        Positioning {
            strategies: &["Artisanat traditionnel", "Innovation", "Bio/Sans gluten", "Prix compétitifs"],
            differentiators: &["Recettes uniques", "Horaires étendus", "Produits locaux", "Service personnalisé"],
        },
    ),
    (
        "commerce",
        Positioning {
            strategies: &["Spécialisation", "Diversité", "Prix", "Service client"],
            differentiators: &["Expertise", "Gamme unique", "Conseil", "Expérience"],
        },
    ),
    (
        "technologie",
        Positioning {
            strategies: &["Innovation", "Open-source", "IA/Automation", "Sur-mesure"],
            differentiators: &["Technologie unique", "Support", "Prix", "Rapidité"],
        },
    ),
];

pub const GENERIC_POSITIONING: Positioning = Positioning {
    strategies: &["Qualité", "Prix", "Service", "Innovation"],
    differentiators: &["Expertise", "Proximité", "Personnalisation", "Rapidité"],
};

/// First-match lookup shared by expansion and stages 2/4.
/// Scans the table in declaration order and stops at the first key that is a
/// substring of the sector (or vice versa).
pub fn lookup<'a, T>(sector: &str, table: &'a [(&str, T)]) -> Option<&'a T> {
    let sector_lower = sector.to_lowercase();
    table
        .iter()
        .find(|(key, _)| sector_lower.contains(key) || key.contains(sector_lower.as_str()))
        .map(|(_, payload)| payload)
}

/// Expand a free-text sector into an ordered list of search terms.
/// The original sector always comes first.
pub fn expand_search_terms(sector: &str) -> Vec<String> {
    let mut terms = vec![sector.to_string()];
    match lookup(sector, SECTOR_EXPANSIONS) {
        Some(expansions) => terms.extend(expansions.iter().map(|t| t.to_string())),
        None => terms.extend(GENERIC_EXPANSION.iter().map(|t| t.to_string())),
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_sector_expands_from_table() {
        let terms = expand_search_terms("boulangerie");
        assert_eq!(
            terms,
            vec![
                "boulangerie",
                "commerce alimentaire",
                "artisanat",
                "commerces",
                "établissements"
            ]
        );
    }

    #[test]
    fn unknown_sector_gets_generic_terms() {
        let terms = expand_search_terms("xyz-unknown");
        assert_eq!(
            terms,
            vec!["xyz-unknown", "entreprises", "établissements", "activité économique"]
        );
    }

    #[test]
    fn match_is_case_insensitive_and_bidirectional() {
        // Sector contains the key.
        assert!(lookup("Boulangerie artisanale", SECTOR_EXPANSIONS).is_some());
        // Key contains the sector.
        assert!(lookup("resto", SECTOR_PERSONAS).is_none());
        assert!(lookup("restau", SECTOR_PERSONAS).is_some());
    }

    #[test]
    fn first_matching_key_wins() {
        // "commerce technologie" matches both "commerce" and "technologie";
        // "commerce" is declared first in the expansion table.
        let payload = lookup("commerce technologie", SECTOR_EXPANSIONS).unwrap();
        assert_eq!(payload[0], "commerces");
    }

    #[test]
    fn persona_fallback_is_generic() {
        assert!(lookup("plomberie", SECTOR_PERSONAS).is_none());
        assert_eq!(GENERIC_PERSONAS, &["Grand public", "Professionnels", "Collectivités"]);
    }
}
