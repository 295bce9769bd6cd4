//! Fixed question bank
//!
//! Question order is part of the contract: an `AnswerSet` refers to questions
//! by index. Reordering invalidates in-progress answer sets but not stored
//! results, which keep only the final tallies.

use serde::Serialize;

use super::types::{Dimension, Letter};

/// One selectable answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionOption {
    pub code: Letter,
    pub label: &'static str,
}

/// A quiz question tagged with the dimension it measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: u32,
    pub prompt: &'static str,
    pub dimension: Dimension,
    pub options: [QuestionOption; 2],
}

impl Question {
    /// True if `letter` is one of this question's option codes
    pub fn accepts(&self, letter: Letter) -> bool {
        self.options.iter().any(|option| option.code == letter)
    }
}

const fn question(
    id: u32,
    prompt: &'static str,
    dimension: Dimension,
    first: (Letter, &'static str),
    second: (Letter, &'static str),
) -> Question {
    Question {
        id,
        prompt,
        dimension,
        options: [
            QuestionOption { code: first.0, label: first.1 },
            QuestionOption { code: second.0, label: second.1 },
        ],
    }
}

static QUESTIONS: [Question; 12] = [
    question(
        1,
        "At a party, you typically:",
        Dimension::EI,
        (Letter::E, "Meet and talk to many people, including strangers"),
        (Letter::I, "Interact with a few people you already know"),
    ),
    question(
        2,
        "You tend to focus on:",
        Dimension::SN,
        (Letter::S, "Details and facts in the present"),
        (Letter::N, "The big picture and future possibilities"),
    ),
    question(
        3,
        "When making decisions, you usually consider:",
        Dimension::TF,
        (Letter::T, "Objective principles and logical consequences"),
        (Letter::F, "How the decision affects people and their feelings"),
    ),
    question(
        4,
        "You prefer to:",
        Dimension::JP,
        (Letter::J, "Have things settled and decided"),
        (Letter::P, "Keep options open and flexible"),
    ),
    question(
        5,
        "You are more:",
        Dimension::EI,
        (Letter::E, "Outgoing and energized by social interaction"),
        (Letter::I, "Reserved and energized by time alone"),
    ),
    question(
        6,
        "You are more interested in:",
        Dimension::SN,
        (Letter::S, "What is real and actual"),
        (Letter::N, "What is possible and theoretical"),
    ),
    question(
        7,
        "In evaluating information, you are more likely to:",
        Dimension::TF,
        (Letter::T, "Find logical inconsistencies"),
        (Letter::F, "Consider the impact on people"),
    ),
    question(
        8,
        "You prefer to work:",
        Dimension::JP,
        (Letter::J, "On a schedule with clear deadlines"),
        (Letter::P, "In a flexible environment adapting as you go"),
    ),
    question(
        9,
        "You prefer to:",
        Dimension::EI,
        (Letter::E, "Think out loud and discuss"),
        (Letter::I, "Think quietly and then share"),
    ),
    question(
        10,
        "You are more likely to trust:",
        Dimension::SN,
        (Letter::S, "Your direct experiences"),
        (Letter::N, "Your gut feelings and intuition"),
    ),
    question(
        11,
        "Which is more important in a decision:",
        Dimension::TF,
        (Letter::T, "Being fair and rational"),
        (Letter::F, "Being compassionate and understanding"),
    ),
    question(
        12,
        "You prefer projects that:",
        Dimension::JP,
        (Letter::J, "Follow a clear plan"),
        (Letter::P, "Evolve as you work on them"),
    ),
];

/// Number of questions in the bank
pub fn question_count() -> usize {
    QUESTIONS.len()
}

/// Question at `index`, or `None` when out of range
pub fn question_at(index: usize) -> Option<&'static Question> {
    QUESTIONS.get(index)
}

/// All questions in presentation order
pub fn questions() -> &'static [Question] {
    &QUESTIONS
}
