use log::{debug, info};
use rand::Rng;

use crate::quiz::grade::{is_correct, UserResponse};
use crate::quiz::plan::{plan_display, DisplayPlan};
use crate::quiz::shuffle::ShuffleState;
use crate::quiz::Quiz;

/// Runtime state of one pass through a quiz. The quiz itself is borrowed
/// per call so the definition stays immutable and shareable.
#[derive(Debug, Clone)]
pub struct QuizSession {
    current_question: usize,
    score: u32,
    responses: Vec<Option<UserResponse>>,
    /// Grade of the first submission per question, the one that counts.
    outcomes: Vec<Option<bool>>,
    completed: bool,
    shuffle: ShuffleState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    pub correct: bool,
    /// Whether this submission was the one recorded for scoring.
    pub counted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub index: usize,
    pub text: String,
    pub correct: Option<bool>,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizResults {
    pub title: String,
    pub score: u32,
    pub total: usize,
    pub reviews: Vec<Review>,
}

impl QuizResults {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.score) * 100.0 / self.total as f64
    }
}

impl QuizSession {
    pub fn new(quiz: &Quiz) -> Self {
        let total = quiz.questions.len();
        Self {
            current_question: 0,
            score: 0,
            responses: vec![None; total],
            outcomes: vec![None; total],
            completed: false,
            shuffle: ShuffleState::new(),
        }
    }

    pub fn current(&self) -> usize {
        self.current_question
    }

    pub fn total(&self) -> usize {
        self.responses.len()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn shuffle_state(&self) -> &ShuffleState {
        &self.shuffle
    }

    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.total() {
            return false;
        }
        self.current_question = index;
        true
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.current_question + 1)
    }

    pub fn previous(&mut self) -> bool {
        match self.current_question.checked_sub(1) {
            Some(index) => self.go_to(index),
            None => false,
        }
    }

    pub fn is_last(&self) -> bool {
        self.current_question + 1 >= self.total()
    }

    /// Plans the current question. Call once per render.
    pub fn present<R>(&mut self, quiz: &Quiz, rng: &mut R) -> DisplayPlan
    where
        R: Rng + ?Sized,
    {
        let index = self.current_question;
        let Some(question) = quiz.questions.get(index) else {
            return DisplayPlan::NoInput;
        };
        let options = quiz.effective_options(index);
        plan_display(index, question, &options, &quiz.decoys, &mut self.shuffle, rng)
    }

    /// Records and grades an answer to the current question. Only the first
    /// submission per question moves the score; later ones are still graded
    /// and replace the stored response.
    pub fn submit(&mut self, quiz: &Quiz, response: UserResponse) -> Submission {
        let index = self.current_question;
        let Some(question) = quiz.questions.get(index) else {
            return Submission {
                correct: false,
                counted: false,
            };
        };

        let correct = is_correct(question, Some(&response), &quiz.effective_options(index));
        if self.completed {
            return Submission {
                correct,
                counted: false,
            };
        }

        self.responses[index] = Some(response);
        let counted = self.outcomes[index].is_none();
        if counted {
            self.outcomes[index] = Some(correct);
            if correct {
                self.score += 1;
            }
        }
        debug!(
            "question {}: correct = {}, counted = {}, score = {}",
            index, correct, counted, self.score
        );

        Submission { correct, counted }
    }

    pub fn response(&self, index: usize) -> Option<&UserResponse> {
        self.responses.get(index).and_then(Option::as_ref)
    }

    pub fn outcome(&self, index: usize) -> Option<bool> {
        self.outcomes.get(index).copied().flatten()
    }

    pub fn answered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_some()).count()
    }

    pub fn hint<'q>(&self, quiz: &'q Quiz) -> Option<&'q str> {
        quiz.questions
            .get(self.current_question)
            .and_then(|q| q.hint.as_deref())
    }

    /// Marks the session complete and reports how every question went.
    pub fn finish(&mut self, quiz: &Quiz) -> QuizResults {
        self.completed = true;
        let reviews = quiz
            .questions
            .iter()
            .enumerate()
            .map(|(index, question)| Review {
                index,
                text: question.text.clone(),
                correct: self.outcome(index),
                explanation: question.explanation.clone(),
            })
            .collect();

        info!(
            "Quiz \"{}\" finished: {} of {} correct",
            quiz.title,
            self.score,
            self.total()
        );
        QuizResults {
            title: quiz.title.clone(),
            score: self.score,
            total: self.total(),
            reviews,
        }
    }

    /// Back to the first question with no answers and no shuffle history.
    pub fn restart(&mut self) {
        let total = self.total();
        self.current_question = 0;
        self.score = 0;
        self.responses = vec![None; total];
        self.outcomes = vec![None; total];
        self.completed = false;
        self.shuffle.clear();
        info!("Quiz restarted");
    }
}
