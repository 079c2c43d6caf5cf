//! Built-in French vocabulary used as the fallback lexicon tier and as
//! gap-fill stock. Ported from the original generator's hard-coded word
//! lists (`lexicon.py::DEFAULT_FRENCH_FALLBACK`,
//! `grid_builder.py::_collect_short_words`'s `common_short`).

use lazy_static::lazy_static;

use crate::lexicon::{HybridLexicon, Lexicon, MemoryLexicon};

/// Common short French function words (2-4 letters), used by the grid
/// builder's gap-fill pass to densify residual empty runs.
pub const GAP_FILL_WORDS: &[&str] = &[
    // 2 letters
    "AU", "CE", "DE", "DU", "EN", "ES", "ET", "EU", "IL", "JE", "LA", "LE", "LU", "MA", "ME",
    "MI", "MU", "NE", "NI", "NU", "ON", "OR", "OU", "PA", "PU", "SA", "SE", "SI", "SU", "TA",
    "TE", "TU", "UN", "VA", "VU",
    // 3 letters
    "AGE", "AIR", "AME", "AMI", "ANE", "ANS", "ART", "BAL", "BAS", "BEC", "BLE", "BOL", "BON",
    "BUS", "CAR", "CAS", "CLE", "COL", "CRI", "EAU", "ELU", "ERE", "ETE", "FEU", "FIL", "FIN",
    "FOI", "GEL", "ILE", "JEU", "LAC", "LIT", "LOI", "MAI", "MAL", "MER", "MIS", "MOI", "MOT",
    "MUR", "NEZ", "NOM", "OIE", "OSE", "PAS", "PEU", "PIE", "POT", "PRE", "RAT", "RIZ", "ROI",
    "RUE", "SAC", "SEC", "SOL", "SOI", "SUR", "THE", "TOI", "TON", "VIE", "VIN", "VOL",
    // 4 letters
    "AIDE", "AILE", "AMER", "AMIE", "ANGE", "ARME", "AUTO", "AVIS", "BAIN", "BANC", "BEAU",
    "BIEN", "BLEU", "BOIS", "BOND", "BORD", "BRAS", "CAFE", "CAMP", "CAPE", "CAVE", "CHEF",
    "CHER", "CIEL", "CIRE", "CLEF", "COIN", "COTE", "COUP", "COUR", "DENT", "DEUX", "DIEU",
    "DOUX", "DRAP", "ELAN", "ELLE", "EPEE", "FACE", "FAIT", "FETE", "FIER", "FILS", "FLOT",
    "FOIS", "FOND", "FOUR", "FUIT", "GARE", "GOUT", "GRIS", "HAUT", "HIER", "IDEE", "IRIS",
    "IVRE", "JEAN", "JOLI", "JOUR", "JUIN", "JUPE", "JURY", "LAIT", "LAVE", "LIEN", "LIEU",
    "LION", "LIRE", "LONG", "LOUP", "LUXE", "MAIN", "MAIS", "MARC", "MARS", "MIDI", "MISE",
    "MODE", "MOIS", "MORT", "MUSE", "NAIN", "NERF", "NEUF", "NOCE", "NOIR", "NOTE", "NUIT",
    "ONDE", "OPUS", "OSER", "OURS", "PAGE", "PAIX", "PAPE", "PARE", "PART", "PAYS", "PEAU",
    "PERE", "PEUR", "PIED", "PILE", "PIPE", "PLAN", "PLUS", "POIL", "PONT", "PORT", "POUR",
    "PRIX", "PUCE", "PUIS", "REEL", "REIN", "RIEN", "RIRE", "RIVE", "ROBE", "ROCK", "ROSE",
    "ROUE", "SAGE", "SANG", "SANS", "SEIN", "SOIR", "SORT", "SOUS", "SUIS", "TARD", "TAUX",
    "TETE", "TOUR", "TOUS", "TRES", "TYPE", "VASE", "VENT", "VERS", "VIDE", "VITE", "VOIE",
    "VOIR", "VOUS", "VRAI", "YEUX", "ZERO", "ZONE",
];

lazy_static! {
    /// The built-in fallback tier, indexed once. `new_hybrid_lexicon` clones
    /// this instead of re-hashing the ~300-word list on every call.
    pub static ref DEFAULT_FALLBACK: MemoryLexicon = {
        let words: Vec<String> = GAP_FILL_WORDS.iter().map(|w| w.to_string()).collect();
        MemoryLexicon::from_words(words)
    };
}

/// Build a fresh `HybridLexicon` seeded with the built-in fallback tier.
/// The primary tier starts empty and is set per-run via `set_primary_words`.
pub fn new_hybrid_lexicon() -> HybridLexicon {
    HybridLexicon::with_fallback(DEFAULT_FALLBACK.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fallback_contains_common_words() {
        assert!(DEFAULT_FALLBACK.contains("LE"));
        assert!(DEFAULT_FALLBACK.contains("CAFE"));
    }

    #[test]
    fn hybrid_lexicon_has_fallback_preloaded() {
        let lex = new_hybrid_lexicon();
        assert!(lex.contains("DE"));
        assert!(lex.primary_words().is_empty());
    }
}
