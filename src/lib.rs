pub mod api;
pub mod cards;
pub mod config;
pub mod extract;
pub mod gemini;
pub mod prompt;

pub use api::{app, AppState};
pub use config::Config;
