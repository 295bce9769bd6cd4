//! Scoring engine
//!
//! Pure functions over data local to one request: no I/O, no shared state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::bank;
use super::types::{Dimension, DimensionTally, Letter, PersonalityType};
use crate::{Error, Result};

/// Answers keyed by question index.
///
/// Built one answer at a time; answering an index again replaces the earlier
/// choice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    answers: BTreeMap<usize, Letter>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw index → letter pairs, validating each one
    pub fn from_answers<I>(answers: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, Letter)>,
    {
        let mut set = Self::new();
        for (index, letter) in answers {
            set.record(index, letter)?;
        }
        Ok(set)
    }

    /// Record the choice for question `index`
    ///
    /// Fails if the index is outside the bank or `letter` is not one of the
    /// question's option codes.
    pub fn record(&mut self, index: usize, letter: Letter) -> Result<()> {
        let question = bank::question_at(index).ok_or_else(|| {
            Error::Validation(format!(
                "Question index {} out of range (0..{})",
                index,
                bank::question_count()
            ))
        })?;

        if !question.accepts(letter) {
            return Err(Error::Validation(format!(
                "Answer '{}' is not an option for question {}",
                letter, question.id
            )));
        }

        self.answers.insert(index, letter);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<Letter> {
        self.answers.get(&index).copied()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// True once every question in the bank has an answer
    pub fn is_complete(&self) -> bool {
        (0..bank::question_count()).all(|index| self.answers.contains_key(&index))
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Letter)> + '_ {
        self.answers.iter().map(|(index, letter)| (*index, *letter))
    }
}

/// Scored answers ready to hand to the result store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoredQuiz {
    #[serde(rename = "result_type")]
    pub personality_type: PersonalityType,
    #[serde(rename = "score")]
    pub tallies: DimensionTally,
    pub answered: usize,
    pub complete: bool,
}

/// Count the chosen letters of every answered question.
///
/// Unanswered questions contribute nothing and partial sets never fail.
/// Entries that do not resolve to a question option (possible only for a
/// deserialized set) are skipped.
pub fn tally(answers: &AnswerSet) -> DimensionTally {
    let mut tally = DimensionTally::new();
    for (index, letter) in answers.iter() {
        match bank::question_at(index) {
            Some(question) if question.accepts(letter) => tally.record(letter),
            _ => {}
        }
    }
    tally
}

/// Pick the winning letter of each dimension.
///
/// The first letter of a pair (E, S, T, J) wins only when its count is
/// strictly greater than the second's. Equal counts, including 0/0, yield
/// the second letter (I, N, F, P).
pub fn derive_type(tally: &DimensionTally) -> PersonalityType {
    PersonalityType::from_ordered(Dimension::ALL.map(|dimension| {
        let (first, second) = dimension.letters();
        if tally.count(first) > tally.count(second) {
            first
        } else {
            second
        }
    }))
}

/// Tally an answer set and derive its type in one step
pub fn score(answers: &AnswerSet) -> ScoredQuiz {
    let tallies = tally(answers);
    ScoredQuiz {
        personality_type: derive_type(&tallies),
        tallies,
        answered: answers.len(),
        complete: answers.is_complete(),
    }
}
