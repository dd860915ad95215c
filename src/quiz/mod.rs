pub mod grade;
pub mod loader;
pub mod options;
pub mod plan;
pub mod session;
pub mod shuffle;

use std::collections::{BTreeMap, BTreeSet};

pub use grade::{is_correct, UserResponse};
pub use options::{EffectiveOptions, OptionsOverride, QuizOptions};
pub use plan::{plan_display, DecoyPolicy, DisplayEntry, DisplayPlan};
pub use session::{QuizResults, QuizSession, Review, Submission};
pub use shuffle::{Component, ShuffleState, StateKey};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub questions: Vec<Question>,
    #[serde(default)]
    pub options: QuizOptions,
    #[serde(default)]
    pub decoys: DecoyPolicy,
}

impl Quiz {
    pub fn new(title: String, questions: Vec<Question>) -> Self {
        Self {
            title,
            description: String::new(),
            questions,
            options: QuizOptions::default(),
            decoys: DecoyPolicy::default(),
        }
    }

    /// Options in force for the question at `index`, or the quiz-level
    /// defaults if there is no such question.
    pub fn effective_options(&self, index: usize) -> EffectiveOptions {
        let question_override = self.questions.get(index).map(|q| &q.options);
        self.options.resolve(question_override)
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub text: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default)]
    pub options: OptionsOverride,
}

impl Question {
    pub fn new(text: String, kind: QuestionKind) -> Self {
        Self {
            text,
            kind,
            explanation: None,
            hint: None,
            options: OptionsOverride::default(),
        }
    }
}

/// The seven gradable question kinds. Unknown `type` tags in a quiz file
/// land in `Unsupported`, which has no input and never grades correct.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuestionKind {
    #[serde(rename_all = "camelCase")]
    MultipleChoice {
        choices: Vec<String>,
        correct_answer: usize,
    },
    #[serde(rename_all = "camelCase")]
    MultipleAnswer {
        choices: Vec<String>,
        correct_answer: BTreeSet<usize>,
    },
    #[serde(rename_all = "camelCase")]
    TrueFalse { correct_answer: bool },
    #[serde(rename_all = "camelCase")]
    Identification { correct_answer: Accepted },
    #[serde(rename_all = "camelCase")]
    Text { correct_answer: Accepted },
    #[serde(rename_all = "camelCase")]
    Enumeration { correct_answer: Vec<Accepted> },
    #[serde(rename_all = "camelCase")]
    Matching {
        items: Vec<String>,
        matches: Vec<String>,
        /// match label -> item text that pairs with it
        correct_matches: BTreeMap<String, String>,
    },
    #[serde(other)]
    Unsupported,
}

impl QuestionKind {
    pub fn name(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice { .. } => "multiple-choice",
            QuestionKind::MultipleAnswer { .. } => "multiple-answer",
            QuestionKind::TrueFalse { .. } => "true-false",
            QuestionKind::Identification { .. } => "identification",
            QuestionKind::Text { .. } => "text",
            QuestionKind::Enumeration { .. } => "enumeration",
            QuestionKind::Matching { .. } => "matching",
            QuestionKind::Unsupported => "unsupported",
        }
    }
}

/// One acceptable answer, or a set of alternatives any of which is accepted.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Accepted {
    One(String),
    AnyOf(Vec<String>),
}

impl Accepted {
    pub fn alternatives(&self) -> &[String] {
        match self {
            Accepted::One(answer) => std::slice::from_ref(answer),
            Accepted::AnyOf(answers) => answers,
        }
    }

    /// First alternative, used when the answer has to be shown to the user.
    pub fn display(&self) -> &str {
        self.alternatives().first().map(String::as_str).unwrap_or("")
    }
}

impl From<&str> for Accepted {
    fn from(answer: &str) -> Self {
        Accepted::One(answer.to_string())
    }
}
