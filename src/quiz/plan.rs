use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::quiz::shuffle::{Component, ShuffleState, StateKey};
use crate::quiz::{EffectiveOptions, Question, QuestionKind};

/// Where the extra entries of an unequal matching list come from.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DecoyPolicy {
    pub item_pool: Vec<String>,
    pub match_pool: Vec<String>,
    pub min: usize,
    pub max: usize,
}

impl Default for DecoyPolicy {
    fn default() -> Self {
        Self {
            item_pool: vec!["Distractor A".to_string(), "Distractor B".to_string()],
            match_pool: vec!["Extra Option 1".to_string(), "Extra Option 2".to_string()],
            min: 1,
            max: 2,
        }
    }
}

impl DecoyPolicy {
    /// Picks decoys for one list, skipping pool entries the list already has.
    fn pick<R>(&self, pool: &[String], existing: &[String], rng: &mut R) -> Vec<DisplayEntry>
    where
        R: Rng + ?Sized,
    {
        let available: Vec<&String> = pool.iter().filter(|d| !existing.contains(d)).collect();
        if available.is_empty() {
            return Vec::new();
        }

        let (low, high) = (self.min.min(self.max), self.min.max(self.max));
        let count = rng.gen_range(low..=high).min(available.len());
        available
            .choose_multiple(rng, count)
            .map(|decoy| DisplayEntry::Decoy((*decoy).clone()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEntry {
    /// Index into the question's own list.
    Canonical(usize),
    Decoy(String),
}

impl DisplayEntry {
    pub fn label<'a>(&'a self, canonical: &'a [String]) -> Option<&'a str> {
        match self {
            DisplayEntry::Canonical(index) => canonical.get(*index).map(String::as_str),
            DisplayEntry::Decoy(text) => Some(text),
        }
    }

    pub fn is_decoy(&self) -> bool {
        matches!(self, DisplayEntry::Decoy(_))
    }
}

/// What the renderer should put on screen for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayPlan {
    /// `order[display] = canonical` choice index.
    Choices { order: Vec<usize>, multiple: bool },
    TrueFalse { true_first: bool },
    Matching {
        items: Vec<DisplayEntry>,
        matches: Vec<DisplayEntry>,
    },
    Enumeration { slots: usize },
    FreeText,
    NoInput,
}

impl DisplayPlan {
    pub fn canonical_choice(&self, display: usize) -> Option<usize> {
        match self {
            DisplayPlan::Choices { order, .. } => order.get(display).copied(),
            _ => None,
        }
    }

    pub fn true_false_order(&self) -> Option<[bool; 2]> {
        match self {
            DisplayPlan::TrueFalse { true_first: true } => Some([true, false]),
            DisplayPlan::TrueFalse { true_first: false } => Some([false, true]),
            _ => None,
        }
    }

    pub fn true_false_value(&self, display: usize) -> Option<bool> {
        self.true_false_order()
            .and_then(|order| order.get(display).copied())
    }
}

/// Decides the presentation of question `index`, consulting and updating
/// `state` for every list that gets shuffled.
pub fn plan_display<R>(
    index: usize,
    question: &Question,
    options: &EffectiveOptions,
    decoys: &DecoyPolicy,
    state: &mut ShuffleState,
    rng: &mut R,
) -> DisplayPlan
where
    R: Rng + ?Sized,
{
    let plan = match &question.kind {
        QuestionKind::MultipleChoice { choices, .. } => DisplayPlan::Choices {
            order: choice_order(choices, Component::MultipleChoice, index, options, state, rng),
            multiple: false,
        },
        QuestionKind::MultipleAnswer { choices, .. } => DisplayPlan::Choices {
            order: choice_order(choices, Component::MultipleAnswer, index, options, state, rng),
            multiple: true,
        },
        QuestionKind::TrueFalse { .. } => {
            let true_first = if options.shuffle_answers {
                state.shuffle_binary_orientation(StateKey::new(Component::TrueFalse, index), rng)
            } else {
                true
            };
            DisplayPlan::TrueFalse { true_first }
        }
        QuestionKind::Matching { items, matches, .. } => {
            let item_order = if options.shuffle_choices {
                state.shuffle(items, StateKey::new(Component::MatchingItems, index), rng)
            } else {
                (0..items.len()).collect()
            };
            let match_order = if options.shuffle_matches {
                state.shuffle(matches, StateKey::new(Component::MatchingMatches, index), rng)
            } else {
                (0..matches.len()).collect()
            };

            let mut items_shown: Vec<DisplayEntry> =
                item_order.into_iter().map(DisplayEntry::Canonical).collect();
            let mut matches_shown: Vec<DisplayEntry> =
                match_order.into_iter().map(DisplayEntry::Canonical).collect();
            if options.unequal_list {
                items_shown.extend(decoys.pick(&decoys.item_pool, items, rng));
                matches_shown.extend(decoys.pick(&decoys.match_pool, matches, rng));
            }

            DisplayPlan::Matching {
                items: items_shown,
                matches: matches_shown,
            }
        }
        QuestionKind::Enumeration { correct_answer } => DisplayPlan::Enumeration {
            slots: correct_answer.len(),
        },
        QuestionKind::Identification { .. } | QuestionKind::Text { .. } => DisplayPlan::FreeText,
        QuestionKind::Unsupported => DisplayPlan::NoInput,
    };

    debug!("question {} ({}): {:?}", index, question.kind.name(), plan);
    plan
}

fn choice_order<R>(
    choices: &[String],
    component: Component,
    index: usize,
    options: &EffectiveOptions,
    state: &mut ShuffleState,
    rng: &mut R,
) -> Vec<usize>
where
    R: Rng + ?Sized,
{
    if options.shuffle_answers {
        state.shuffle(choices, StateKey::new(component, index), rng)
    } else {
        (0..choices.len()).collect()
    }
}
