//! Database schema, models and queries

pub mod init;
pub mod models;
pub mod results;
pub mod settings;
pub mod users;

pub use init::*;
pub use models::*;
pub use results::*;
pub use settings::*;
pub use users::*;
