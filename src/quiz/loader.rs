use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;

use crate::quiz::{Quiz, QuestionKind};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to open quiz file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid quiz definition: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },
    #[error("quiz \"{title}\" has no questions")]
    NoQuestions { title: String },
}

impl Quiz {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let quiz: Quiz = serde_json::from_reader(reader)?;
        quiz.checked()
    }

    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let quiz: Quiz = serde_json::from_str(json)?;
        quiz.checked()
    }

    /// Rejects empty quizzes and logs answer keys that can never be matched.
    /// Anything else is left for the grader to treat as wrong.
    fn checked(self) -> Result<Self, LoadError> {
        if self.questions.is_empty() {
            return Err(LoadError::NoQuestions { title: self.title });
        }

        for (index, question) in self.questions.iter().enumerate() {
            match &question.kind {
                QuestionKind::MultipleChoice {
                    choices,
                    correct_answer,
                } if *correct_answer >= choices.len() => {
                    warn!("question {}: answer index {} is out of range", index, correct_answer);
                }
                QuestionKind::MultipleAnswer {
                    choices,
                    correct_answer,
                } => {
                    for answer in correct_answer.iter().filter(|a| **a >= choices.len()) {
                        warn!("question {}: answer index {} is out of range", index, answer);
                    }
                }
                QuestionKind::Matching {
                    items,
                    matches,
                    correct_matches,
                } => {
                    for (label, item) in correct_matches {
                        if !matches.contains(label) || !items.contains(item) {
                            warn!(
                                "question {}: pair {} -> {} is not in the lists",
                                index, label, item
                            );
                        }
                    }
                }
                QuestionKind::Unsupported => {
                    warn!("question {}: unknown question type, it will not be graded", index);
                }
                _ => {}
            }
        }

        Ok(self)
    }
}

pub fn load_quiz(path: &Path) -> Result<Quiz, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let quiz = Quiz::from_reader(BufReader::new(file))?;
    info!(
        "Loaded quiz \"{}\" with {} questions from {}",
        quiz.title,
        quiz.questions.len(),
        path.display()
    );
    Ok(quiz)
}
