//! # MBTI Common Library
//!
//! Shared code for the personality quiz service including:
//! - Question bank and scoring engine
//! - Presentation tables (archetypes, trait descriptions)
//! - Database schema, account store and result store
//! - Password hashing and bearer token signing
//! - Configuration loading

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod presentation;
pub mod quiz;
pub mod time;

pub use error::{DecodeError, Error, Result};
pub use quiz::{
    derive_type, tally, AnswerSet, Dimension, DimensionTally, Letter, PersonalityType, Question,
    ScoredQuiz,
};
