pub mod api;
pub mod cli;
pub mod config;
pub mod session;

pub use api::{ApiClient, ApiError};
pub use config::AppConfig;
pub use session::{Phase, SessionController, SessionStore};
