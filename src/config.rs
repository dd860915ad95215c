use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub quiz_file: PathBuf,
    /// Fixed seed for reproducible shuffles. Entropy is used when unset.
    pub seed: Option<u64>,
    pub show_explanations: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quiz_file: PathBuf::from("quiz.json"),
            seed: None,
            show_explanations: true,
        }
    }
}

impl Config {
    /// Reads `QUIZ_FILE`, `QUIZ_SEED` and `QUIZ_SHOW_EXPLANATIONS`, after
    /// loading a `.env` file if one is present.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        Self {
            quiz_file: lookup("QUIZ_FILE")
                .map(PathBuf::from)
                .unwrap_or(default.quiz_file),
            seed: lookup("QUIZ_SEED").and_then(|v| v.trim().parse().ok()),
            show_explanations: lookup("QUIZ_SHOW_EXPLANATIONS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default.show_explanations),
        }
    }

    /// A path given on the command line wins over `QUIZ_FILE`.
    pub fn with_quiz_file(mut self, path: Option<String>) -> Self {
        if let Some(path) = path {
            self.quiz_file = PathBuf::from(path);
        }
        self
    }
}
