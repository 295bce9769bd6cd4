//! Presentation tables for stored and freshly scored results
//!
//! Pure lookups. Inputs are plain strings because stored type codes come
//! back from the database and are not guaranteed to be canonical.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::quiz::{Dimension, DimensionTally};

const FALLBACK_ARCHETYPE: &str =
    "Your personality type combines several traits that make you unique.";

const FALLBACK_TRAIT: &str = "Unrecognized preference letter.";

/// Archetype text for a four-letter type code.
///
/// Codes outside the 16 canonical types get a generic description.
pub fn archetype_description(code: &str) -> &'static str {
    match code {
        "INTJ" => "Strategic, independent, and insightful. Known as \"The Architect\" or \"The Mastermind.\"",
        "INTP" => "Logical, curious, and innovative. Known as \"The Thinker\" or \"The Logician.\"",
        "ENTJ" => "Decisive, efficient, and strategic leader. Known as \"The Commander.\"",
        "ENTP" => "Innovative, adaptable, and enthusiastic. Known as \"The Debater\" or \"The Visionary.\"",
        "INFJ" => "Insightful, principled, and compassionate. Known as \"The Advocate\" or \"The Counselor.\"",
        "INFP" => "Idealistic, creative, and empathetic. Known as \"The Mediator\" or \"The Healer.\"",
        "ENFJ" => "Charismatic, inspiring, and empathetic leader. Known as \"The Protagonist\" or \"The Giver.\"",
        "ENFP" => "Enthusiastic, creative, and sociable. Known as \"The Campaigner\" or \"The Champion.\"",
        "ISTJ" => "Practical, responsible, and detail-oriented. Known as \"The Inspector\" or \"The Logistician.\"",
        "ISFJ" => "Dedicated, warm, and conscientious. Known as \"The Protector\" or \"The Defender.\"",
        "ESTJ" => "Practical, traditional, and organized. Known as \"The Supervisor\" or \"The Executive.\"",
        "ESFJ" => "Caring, social, and organized. Known as \"The Provider\" or \"The Consul.\"",
        "ISTP" => "Adaptable, practical, and action-oriented. Known as \"The Craftsman\" or \"The Virtuoso.\"",
        "ISFP" => "Gentle, artistic, and adaptable. Known as \"The Artist\" or \"The Adventurer.\"",
        "ESTP" => "Energetic, spontaneous, and practical. Known as \"The Doer\" or \"The Entrepreneur.\"",
        "ESFP" => "Enthusiastic, spontaneous, and friendly. Known as \"The Performer.\"",
        _ => FALLBACK_ARCHETYPE,
    }
}

fn trait_description(letter: char) -> &'static str {
    match letter {
        'E' => "Extraversion: You gain energy from external interaction and engagement with others.",
        'I' => "Introversion: You gain energy from internal reflection and value depth over breadth in relationships.",
        'S' => "Sensing: You focus on concrete facts and details, trusting information that's practical and experiential.",
        'N' => "Intuition: You focus on patterns, possibilities, and the big picture, looking toward the future.",
        'T' => "Thinking: You make decisions based on logic, consistency, and objective analysis.",
        'F' => "Feeling: You make decisions based on values, harmony, and how actions affect others.",
        'J' => "Judging: You prefer structure, plans, and closure in your external life.",
        'P' => "Perceiving: You prefer flexibility, adaptability, and keeping options open.",
        _ => FALLBACK_TRAIT,
    }
}

/// One letter of a type code with its description
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraitEntry {
    pub letter: char,
    pub description: &'static str,
}

/// Per-letter descriptions in code order; empty unless `code` has exactly 4 characters
pub fn trait_breakdown(code: &str) -> Vec<TraitEntry> {
    if code.chars().count() != 4 {
        return Vec::new();
    }
    code.chars()
        .map(|letter| TraitEntry {
            letter,
            description: trait_description(letter),
        })
        .collect()
}

/// Relative weight of the two letters of one dimension
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionShare {
    pub dimension: Dimension,
    pub label: &'static str,
    pub first: char,
    pub second: char,
    pub first_count: u32,
    pub second_count: u32,
    /// Percentage of answers that went to `first`; 50.0 when nothing was answered
    pub first_percent: f64,
}

/// Percentage split of every dimension, in type-code order
pub fn dimension_breakdown(tallies: &DimensionTally) -> Vec<DimensionShare> {
    Dimension::ALL
        .into_iter()
        .map(|dimension| {
            let (first, second) = dimension.letters();
            let (first_count, second_count) = tallies.pair(dimension);
            let total = tallies.total(dimension);
            let first_percent = if total == 0 {
                50.0
            } else {
                f64::from(first_count) * 100.0 / total as f64
            };
            DimensionShare {
                dimension,
                label: dimension.label(),
                first: first.as_char(),
                second: second.as_char(),
                first_count,
                second_count,
                first_percent,
            }
        })
        .collect()
}

/// Everything the result detail page needs, bundled for serialization
#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    pub result_type: String,
    pub headline: String,
    pub archetype: &'static str,
    pub traits: Vec<TraitEntry>,
    pub dimensions: Vec<DimensionShare>,
    pub created_at: DateTime<Utc>,
}

impl ResultView {
    pub fn new(code: &str, tallies: &DimensionTally, created_at: DateTime<Utc>) -> Self {
        let spelled: Vec<String> = code.chars().map(String::from).collect();
        Self {
            result_type: code.to_string(),
            headline: format!("{} Personality", spelled.join("-")),
            archetype: archetype_description(code),
            traits: trait_breakdown(code),
            dimensions: dimension_breakdown(tallies),
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::Letter;

    const ALL_TYPES: [&str; 16] = [
        "INTJ", "INTP", "ENTJ", "ENTP", "INFJ", "INFP", "ENFJ", "ENFP", "ISTJ", "ISFJ", "ESTJ",
        "ESFJ", "ISTP", "ISFP", "ESTP", "ESFP",
    ];

    #[test]
    fn test_every_canonical_type_has_its_own_description() {
        for code in ALL_TYPES {
            assert_ne!(archetype_description(code), FALLBACK_ARCHETYPE, "{}", code);
        }
    }

    #[test]
    fn test_unknown_type_falls_back() {
        assert_eq!(archetype_description("XXXX"), FALLBACK_ARCHETYPE);
        assert_eq!(archetype_description(""), FALLBACK_ARCHETYPE);
        assert_eq!(archetype_description("intj"), FALLBACK_ARCHETYPE);
    }

    #[test]
    fn test_trait_breakdown_follows_code_order() {
        let traits = trait_breakdown("ENFP");
        let letters: Vec<char> = traits.iter().map(|t| t.letter).collect();
        assert_eq!(letters, vec!['E', 'N', 'F', 'P']);
        assert!(traits[0].description.starts_with("Extraversion"));
        assert!(traits[3].description.starts_with("Perceiving"));
    }

    #[test]
    fn test_trait_breakdown_wrong_length_is_empty() {
        assert!(trait_breakdown("ENF").is_empty());
        assert!(trait_breakdown("ENFPX").is_empty());
        assert!(trait_breakdown("").is_empty());
    }

    #[test]
    fn test_trait_breakdown_unknown_letter() {
        let traits = trait_breakdown("EXFP");
        assert_eq!(traits.len(), 4);
        assert_eq!(traits[1].description, FALLBACK_TRAIT);
    }

    #[test]
    fn test_dimension_breakdown_percentages() {
        let tallies = DimensionTally::new().with(Letter::E, 2).with(Letter::I, 1);
        let shares = dimension_breakdown(&tallies);

        assert_eq!(shares.len(), 4);
        assert_eq!(shares[0].dimension, Dimension::EI);
        assert_eq!(shares[0].first_count, 2);
        assert!((shares[0].first_percent - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_dimension_breakdown_zero_total_is_even() {
        let shares = dimension_breakdown(&DimensionTally::new());
        assert!(shares.iter().all(|s| s.first_percent == 50.0));
    }

    #[test]
    fn test_dimension_breakdown_saturated_counts() {
        let tallies = DimensionTally::new()
            .with(Letter::E, u32::MAX)
            .with(Letter::I, u32::MAX)
            .with(Letter::S, u32::MAX)
            .with(Letter::N, 1);
        let shares = dimension_breakdown(&tallies);

        assert_eq!(shares[0].first_percent, 50.0);
        assert!(shares[1].first_percent > 99.9 && shares[1].first_percent < 100.0);
    }

    #[test]
    fn test_result_view_headline() {
        let view = ResultView::new("ISTJ", &DimensionTally::new(), Utc::now());
        assert_eq!(view.headline, "I-S-T-J Personality");
        assert_eq!(view.traits.len(), 4);
    }
}
