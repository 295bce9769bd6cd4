//! Dimension, letter, type-code and tally types

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

// ========================================
// Dimensions and Letters
// ========================================

/// One of the four bipolar personality axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dimension {
    /// Extraversion / Introversion
    EI,
    /// Sensing / Intuition
    SN,
    /// Thinking / Feeling
    TF,
    /// Judging / Perceiving
    JP,
}

impl Dimension {
    /// All dimensions in type-code order
    pub const ALL: [Dimension; 4] = [Dimension::EI, Dimension::SN, Dimension::TF, Dimension::JP];

    /// The ordered letter pair of this dimension
    pub fn letters(self) -> (Letter, Letter) {
        match self {
            Dimension::EI => (Letter::E, Letter::I),
            Dimension::SN => (Letter::S, Letter::N),
            Dimension::TF => (Letter::T, Letter::F),
            Dimension::JP => (Letter::J, Letter::P),
        }
    }

    /// Position of this dimension within a type code
    pub fn index(self) -> usize {
        match self {
            Dimension::EI => 0,
            Dimension::SN => 1,
            Dimension::TF => 2,
            Dimension::JP => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::EI => "EI",
            Dimension::SN => "SN",
            Dimension::TF => "TF",
            Dimension::JP => "JP",
        }
    }

    /// Human-readable axis label
    pub fn label(self) -> &'static str {
        match self {
            Dimension::EI => "Extraversion (E) vs. Introversion (I)",
            Dimension::SN => "Sensing (S) vs. Intuition (N)",
            Dimension::TF => "Thinking (T) vs. Feeling (F)",
            Dimension::JP => "Judging (J) vs. Perceiving (P)",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Dimension::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| Error::Validation(format!("Unknown dimension '{}'", s)))
    }
}

/// A single preference letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Letter {
    E,
    I,
    S,
    N,
    T,
    F,
    J,
    P,
}

impl Letter {
    pub const ALL: [Letter; 8] = [
        Letter::E,
        Letter::I,
        Letter::S,
        Letter::N,
        Letter::T,
        Letter::F,
        Letter::J,
        Letter::P,
    ];

    /// The dimension this letter belongs to
    pub fn dimension(self) -> Dimension {
        match self {
            Letter::E | Letter::I => Dimension::EI,
            Letter::S | Letter::N => Dimension::SN,
            Letter::T | Letter::F => Dimension::TF,
            Letter::J | Letter::P => Dimension::JP,
        }
    }

    /// True for the first-listed letter of its pair (E, S, T, J)
    pub fn is_first(self) -> bool {
        self.dimension().letters().0 == self
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Letter::E => "E",
            Letter::I => "I",
            Letter::S => "S",
            Letter::N => "N",
            Letter::T => "T",
            Letter::F => "F",
            Letter::J => "J",
            Letter::P => "P",
        }
    }

    pub fn as_char(self) -> char {
        self.as_str().as_bytes()[0] as char
    }

    pub fn from_char(c: char) -> Option<Letter> {
        Letter::ALL.into_iter().find(|l| l.as_char() == c)
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Letter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Letter::from_char(c).ok_or_else(|| Error::Validation(format!("Unknown letter '{}'", s)))
            }
            _ => Err(Error::Validation(format!("Unknown letter '{}'", s))),
        }
    }
}

// ========================================
// Personality Type
// ========================================

/// A four-letter type code, one letter per dimension in `EI SN TF JP` order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonalityType([Letter; 4]);

impl PersonalityType {
    /// Build a type code, checking each letter sits in its dimension's slot
    pub fn from_letters(letters: [Letter; 4]) -> Result<Self> {
        for (dimension, letter) in Dimension::ALL.into_iter().zip(letters) {
            if letter.dimension() != dimension {
                return Err(Error::Validation(format!(
                    "Letter '{}' cannot appear in the {} position",
                    letter, dimension
                )));
            }
        }
        Ok(Self(letters))
    }

    /// Caller guarantees slot `i` holds a letter of `Dimension::ALL[i]`
    pub(crate) fn from_ordered(letters: [Letter; 4]) -> Self {
        debug_assert!(Self::from_letters(letters).is_ok());
        Self(letters)
    }

    pub fn letters(&self) -> [Letter; 4] {
        self.0
    }

    /// Letter chosen for one dimension
    pub fn letter(&self, dimension: Dimension) -> Letter {
        self.0[dimension.index()]
    }
}

impl fmt::Display for PersonalityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for letter in self.0 {
            write!(f, "{}", letter)?;
        }
        Ok(())
    }
}

impl FromStr for PersonalityType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 4 {
            return Err(Error::Validation(format!(
                "Type code must have 4 letters, got '{}'",
                s
            )));
        }

        let mut letters = [Letter::I; 4];
        for (slot, c) in letters.iter_mut().zip(chars) {
            *slot = Letter::from_char(c)
                .ok_or_else(|| Error::Validation(format!("Unknown letter '{}' in '{}'", c, s)))?;
        }
        Self::from_letters(letters)
    }
}

impl TryFrom<String> for PersonalityType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<PersonalityType> for String {
    fn from(value: PersonalityType) -> Self {
        value.to_string()
    }
}

// ========================================
// Dimension Tally
// ========================================

/// Per-letter answer counts for all four dimensions.
///
/// Stored as `{"EI":{"E":2,"I":1},"SN":{...},"TF":{...},"JP":{...}}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "TallyWire")]
pub struct DimensionTally {
    counts: [[u32; 2]; 4],
}

type TallyWire = BTreeMap<String, BTreeMap<String, u32>>;

/// Largest per-letter count accepted when decoding a tally
pub const MAX_TALLY_COUNT: u32 = 1_000_000;

impl DimensionTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more answer for `letter`
    pub fn record(&mut self, letter: Letter) {
        let slot = self.slot_mut(letter);
        *slot = slot.saturating_add(1);
    }

    /// Overwrite the count for `letter`
    pub fn set(&mut self, letter: Letter, count: u32) {
        *self.slot_mut(letter) = count;
    }

    /// Builder-style [`set`](Self::set)
    pub fn with(mut self, letter: Letter, count: u32) -> Self {
        self.set(letter, count);
        self
    }

    pub fn count(&self, letter: Letter) -> u32 {
        self.counts[letter.dimension().index()][usize::from(!letter.is_first())]
    }

    /// `(first, second)` counts of a dimension's pair
    pub fn pair(&self, dimension: Dimension) -> (u32, u32) {
        let [first, second] = self.counts[dimension.index()];
        (first, second)
    }

    /// Number of answers recorded for a dimension
    pub fn total(&self, dimension: Dimension) -> u64 {
        let (first, second) = self.pair(dimension);
        u64::from(first) + u64::from(second)
    }

    /// Serialize to the structured text form kept in the database
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Internal(format!("Tally encode failed: {}", e)))
    }

    /// Parse the structured text form kept in the database
    pub fn from_json(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    fn slot_mut(&mut self, letter: Letter) -> &mut u32 {
        &mut self.counts[letter.dimension().index()][usize::from(!letter.is_first())]
    }
}

/// One dimension's pair, serialized as `{"E":2,"I":1}` in pair order
struct PairCounts<'a> {
    tally: &'a DimensionTally,
    dimension: Dimension,
}

impl Serialize for PairCounts<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let (first, second) = self.dimension.letters();
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(first.as_str(), &self.tally.count(first))?;
        map.serialize_entry(second.as_str(), &self.tally.count(second))?;
        map.end()
    }
}

impl Serialize for DimensionTally {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Dimension::ALL.len()))?;
        for dimension in Dimension::ALL {
            map.serialize_entry(dimension.as_str(), &PairCounts { tally: self, dimension })?;
        }
        map.end()
    }
}

impl TryFrom<TallyWire> for DimensionTally {
    type Error = String;

    fn try_from(wire: TallyWire) -> std::result::Result<Self, String> {
        if wire.len() != Dimension::ALL.len() {
            return Err(format!(
                "expected {} dimensions, found {}",
                Dimension::ALL.len(),
                wire.len()
            ));
        }

        let mut tally = DimensionTally::new();
        for (dimension_key, pair) in wire {
            let dimension: Dimension = dimension_key
                .parse()
                .map_err(|_| format!("unknown dimension '{}'", dimension_key))?;

            if pair.len() != 2 {
                return Err(format!(
                    "dimension {} needs exactly 2 letters, found {}",
                    dimension,
                    pair.len()
                ));
            }

            for (letter_key, count) in pair {
                let letter: Letter = letter_key
                    .parse()
                    .map_err(|_| format!("unknown letter '{}'", letter_key))?;
                if letter.dimension() != dimension {
                    return Err(format!("letter {} does not belong to {}", letter, dimension));
                }
                if count > MAX_TALLY_COUNT {
                    return Err(format!(
                        "count {} for {} exceeds {}",
                        count, letter, MAX_TALLY_COUNT
                    ));
                }
                tally.set(letter, count);
            }
        }

        Ok(tally)
    }
}
