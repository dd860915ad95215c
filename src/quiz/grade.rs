use std::collections::{BTreeMap, BTreeSet};

use crate::quiz::{Accepted, EffectiveOptions, Question, QuestionKind};

/// A user's answer in canonical terms: choice indices refer to the
/// question's own `choices`, never to display positions.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum UserResponse {
    Choice(usize),
    Choices(BTreeSet<usize>),
    Bool(bool),
    Text(String),
    List(Vec<String>),
    /// match label -> item text dropped on it
    Pairs(BTreeMap<String, String>),
}

/// Grades `response` against the answer key of `question`.
///
/// Missing, empty or mismatched responses are simply wrong; nothing here
/// panics or touches session state.
pub fn is_correct(
    question: &Question,
    response: Option<&UserResponse>,
    options: &EffectiveOptions,
) -> bool {
    let Some(response) = response else {
        return false;
    };
    let case_sensitive = options.case_sensitive;

    match (&question.kind, response) {
        (
            QuestionKind::MultipleChoice {
                choices,
                correct_answer,
            },
            UserResponse::Choice(chosen),
        ) => *chosen < choices.len() && chosen == correct_answer,
        (
            QuestionKind::MultipleAnswer {
                choices,
                correct_answer,
            },
            UserResponse::Choices(selected),
        ) => {
            !selected.is_empty()
                && selected.iter().all(|index| *index < choices.len())
                && selected == correct_answer
        }
        (QuestionKind::TrueFalse { correct_answer }, UserResponse::Bool(given)) => {
            given == correct_answer
        }
        (
            QuestionKind::Identification { correct_answer } | QuestionKind::Text { correct_answer },
            UserResponse::Text(given),
        ) => satisfies(correct_answer, given, case_sensitive),
        (QuestionKind::Enumeration { correct_answer }, UserResponse::List(given)) => {
            if options.order_sensitive {
                in_order(correct_answer, given, case_sensitive)
            } else {
                SlotMatcher::new(correct_answer, given, case_sensitive).saturates()
            }
        }
        (QuestionKind::Matching { correct_matches, .. }, UserResponse::Pairs(given)) => {
            !given.is_empty()
                && given.len() == correct_matches.len()
                && correct_matches
                    .iter()
                    .all(|(label, item)| given.get(label) == Some(item))
        }
        _ => false,
    }
}

/// Whether `given` is one of the accepted spellings. Blank input never is.
fn satisfies(accepted: &Accepted, given: &str, case_sensitive: bool) -> bool {
    let given = given.trim();
    if given.is_empty() {
        return false;
    }
    accepted.alternatives().iter().any(|expected| {
        let expected = expected.trim();
        if case_sensitive {
            expected == given
        } else {
            expected.to_lowercase() == given.to_lowercase()
        }
    })
}

fn in_order(slots: &[Accepted], given: &[String], case_sensitive: bool) -> bool {
    !given.is_empty()
        && given.len() == slots.len()
        && slots
            .iter()
            .zip(given)
            .all(|(slot, answer)| satisfies(slot, answer, case_sensitive))
}

/// Assigns every answer its own slot via augmenting paths, so an answer
/// that fits several slots never blocks one that fits only one of them.
struct SlotMatcher<'a> {
    slots: &'a [Accepted],
    answers: &'a [String],
    case_sensitive: bool,
    owner: Vec<Option<usize>>,
}

impl<'a> SlotMatcher<'a> {
    fn new(slots: &'a [Accepted], answers: &'a [String], case_sensitive: bool) -> Self {
        Self {
            slots,
            answers,
            case_sensitive,
            owner: vec![None; slots.len()],
        }
    }

    fn saturates(mut self) -> bool {
        if self.answers.is_empty() || self.answers.len() > self.slots.len() {
            return false;
        }
        let slot_count = self.slots.len();
        (0..self.answers.len()).all(|answer| {
            let mut visited = vec![false; slot_count];
            self.claim(answer, &mut visited)
        })
    }

    fn claim(&mut self, answer: usize, visited: &mut [bool]) -> bool {
        for slot in 0..self.slots.len() {
            if visited[slot]
                || !satisfies(&self.slots[slot], &self.answers[answer], self.case_sensitive)
            {
                continue;
            }
            visited[slot] = true;
            let free = match self.owner[slot] {
                None => true,
                Some(other) => self.claim(other, visited),
            };
            if free {
                self.owner[slot] = Some(answer);
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn question(kind: QuestionKind) -> Question {
        Question::new("?".to_string(), kind)
    }

    fn pairs(entries: &[(&str, &str)]) -> UserResponse {
        UserResponse::Pairs(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn unordered() -> EffectiveOptions {
        EffectiveOptions {
            order_sensitive: false,
            ..EffectiveOptions::default()
        }
    }

    fn pets() -> Question {
        question(QuestionKind::Enumeration {
            correct_answer: vec![
                Accepted::AnyOf(strings(&["cat", "feline"])),
                Accepted::from("dog"),
            ],
        })
    }

    #[test]
    fn multiple_choice_needs_exact_index_in_range() {
        let q = question(QuestionKind::MultipleChoice {
            choices: strings(&["a", "b", "c"]),
            correct_answer: 1,
        });
        let options = EffectiveOptions::default();

        assert!(is_correct(&q, Some(&UserResponse::Choice(1)), &options));
        assert!(!is_correct(&q, Some(&UserResponse::Choice(2)), &options));
        assert!(!is_correct(&q, None, &options));

        let broken = question(QuestionKind::MultipleChoice {
            choices: strings(&["a"]),
            correct_answer: 5,
        });
        assert!(!is_correct(&broken, Some(&UserResponse::Choice(5)), &options));
    }

    #[test]
    fn multiple_answer_is_set_equality() {
        let q = question(QuestionKind::MultipleAnswer {
            choices: strings(&["a", "b", "c", "d"]),
            correct_answer: BTreeSet::from([1, 3]),
        });
        let options = EffectiveOptions::default();
        let pick = |indices: &[usize]| UserResponse::Choices(indices.iter().copied().collect());

        assert!(is_correct(&q, Some(&pick(&[3, 1])), &options));
        assert!(!is_correct(&q, Some(&pick(&[1, 2, 3])), &options));
        assert!(!is_correct(&q, Some(&pick(&[1])), &options));
        assert!(!is_correct(&q, Some(&pick(&[])), &options));
    }

    #[test]
    fn true_false_compares_values() {
        let q = question(QuestionKind::TrueFalse {
            correct_answer: false,
        });
        let options = EffectiveOptions::default();

        assert!(is_correct(&q, Some(&UserResponse::Bool(false)), &options));
        assert!(!is_correct(&q, Some(&UserResponse::Bool(true)), &options));
        assert!(!is_correct(&q, Some(&UserResponse::Text("false".to_string())), &options));
    }

    #[test]
    fn identification_folds_case_unless_sensitive() {
        let q = question(QuestionKind::Identification {
            correct_answer: Accepted::from("Paris"),
        });
        let insensitive = EffectiveOptions::default();
        let sensitive = EffectiveOptions {
            case_sensitive: true,
            ..EffectiveOptions::default()
        };
        let text = |s: &str| UserResponse::Text(s.to_string());

        assert!(is_correct(&q, Some(&text("paris")), &insensitive));
        assert!(is_correct(&q, Some(&text("  PARIS ")), &insensitive));
        assert!(!is_correct(&q, Some(&text("")), &insensitive));
        assert!(!is_correct(&q, Some(&text("   ")), &insensitive));
        assert!(!is_correct(&q, Some(&text("paris")), &sensitive));
        assert!(is_correct(&q, Some(&text("Paris")), &sensitive));
    }

    #[test]
    fn text_accepts_any_alternative() {
        let q = question(QuestionKind::Text {
            correct_answer: Accepted::AnyOf(strings(&["Everest", "Mount Everest"])),
        });
        let options = EffectiveOptions::default();

        assert!(is_correct(&q, Some(&UserResponse::Text("mount everest".to_string())), &options));
        assert!(!is_correct(&q, Some(&UserResponse::Text("K2".to_string())), &options));
    }

    #[test]
    fn ordered_enumeration_checks_each_position() {
        let q = pets();
        let options = EffectiveOptions::default();
        let list = |v: &[&str]| UserResponse::List(strings(v));

        assert!(is_correct(&q, Some(&list(&["Feline", "dog"])), &options));
        assert!(!is_correct(&q, Some(&list(&["dog", "cat"])), &options));
        assert!(!is_correct(&q, Some(&list(&["cat"])), &options));
        assert!(!is_correct(&q, Some(&list(&[])), &options));
    }

    #[test]
    fn unordered_enumeration_never_double_claims() {
        let q = pets();
        let options = unordered();
        let list = |v: &[&str]| UserResponse::List(strings(v));

        assert!(is_correct(&q, Some(&list(&["dog", "feline"])), &options));
        assert!(!is_correct(&q, Some(&list(&["dog", "dog"])), &options));
        assert!(!is_correct(&q, Some(&list(&["cat", "dog", "mouse"])), &options));
        assert!(!is_correct(&q, Some(&list(&["cat", "mouse"])), &options));
        assert!(is_correct(&q, Some(&list(&["dog"])), &options));
        assert!(!is_correct(&q, Some(&list(&[])), &options));
    }

    #[test]
    fn unordered_enumeration_reassigns_overlapping_slots() {
        let q = question(QuestionKind::Enumeration {
            correct_answer: vec![Accepted::AnyOf(strings(&["a", "b"])), Accepted::from("a")],
        });
        let list = UserResponse::List(strings(&["a", "b"]));

        assert!(is_correct(&q, Some(&list), &unordered()));
    }

    #[test]
    fn matching_requires_exact_map() {
        let q = question(QuestionKind::Matching {
            items: strings(&["X", "Y"]),
            matches: strings(&["A", "B"]),
            correct_matches: BTreeMap::from([
                ("A".to_string(), "X".to_string()),
                ("B".to_string(), "Y".to_string()),
            ]),
        });
        let options = EffectiveOptions::default();

        assert!(is_correct(&q, Some(&pairs(&[("A", "X"), ("B", "Y")])), &options));
        assert!(!is_correct(&q, Some(&pairs(&[("A", "X"), ("B", "Y"), ("C", "Z")])), &options));
        assert!(!is_correct(&q, Some(&pairs(&[("A", "X")])), &options));
        assert!(!is_correct(&q, Some(&pairs(&[("A", "Y"), ("B", "X")])), &options));
        assert!(!is_correct(
            &q,
            Some(&pairs(&[("A", "X"), ("Extra Option 1", "Distractor A")])),
            &options
        ));
    }

    #[test]
    fn unsupported_and_mismatched_responses_are_wrong() {
        let options = EffectiveOptions::default();
        let unknown = question(QuestionKind::Unsupported);
        assert!(!is_correct(&unknown, Some(&UserResponse::Text("x".to_string())), &options));

        let mc = question(QuestionKind::MultipleChoice {
            choices: strings(&["a"]),
            correct_answer: 0,
        });
        assert!(!is_correct(&mc, Some(&UserResponse::Choices(BTreeSet::from([0]))), &options));
    }

    #[test]
    fn grading_is_repeatable() {
        let q = pets();
        let options = unordered();
        let response = UserResponse::List(strings(&["dog", "cat"]));
        let before = response.clone();

        let first = is_correct(&q, Some(&response), &options);
        let second = is_correct(&q, Some(&response), &options);
        assert_eq!(first, second);
        assert!(first);
        assert_eq!(response, before);
    }
}
