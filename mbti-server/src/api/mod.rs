//! HTTP API handlers for mbti-server

pub mod accounts;
pub mod auth;
pub mod health;
pub mod quiz;
pub mod results;

pub use accounts::{delete_profile, get_profile, login, register};
pub use auth::{auth_middleware, AuthUser};
pub use health::health_routes;
pub use quiz::{list_questions, score_answers};
pub use results::{create_result, get_result, list_results};
