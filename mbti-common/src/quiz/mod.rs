//! Quiz domain: question bank, type model and scoring engine

pub mod bank;
pub mod scoring;
pub mod types;

pub use bank::{question_at, question_count, questions, Question, QuestionOption};
pub use scoring::{derive_type, score, tally, AnswerSet, ScoredQuiz};
pub use types::{Dimension, DimensionTally, Letter, PersonalityType, MAX_TALLY_COUNT};
