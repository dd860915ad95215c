pub mod config;
pub mod quiz;

pub use config::Config;
pub use quiz::{Quiz, QuizSession};
