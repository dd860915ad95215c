/// Quiz-level defaults. Every field can be left out of a quiz file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuizOptions {
    pub shuffle_answers: bool,
    pub case_sensitive: bool,
    pub order_sensitive: bool,
    pub shuffle_choices: bool,
    pub shuffle_matches: bool,
    pub unequal_list: bool,
}

impl Default for QuizOptions {
    fn default() -> Self {
        Self {
            shuffle_answers: false,
            case_sensitive: false,
            order_sensitive: true,
            shuffle_choices: false,
            shuffle_matches: false,
            unequal_list: false,
        }
    }
}

/// Per-question override. `None` falls back to the quiz-level value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptionsOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shuffle_answers: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_sensitive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shuffle_choices: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shuffle_matches: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unequal_list: Option<bool>,
}

/// Options in force for a single question after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveOptions {
    pub shuffle_answers: bool,
    pub case_sensitive: bool,
    pub order_sensitive: bool,
    pub shuffle_choices: bool,
    pub shuffle_matches: bool,
    pub unequal_list: bool,
}

impl Default for EffectiveOptions {
    fn default() -> Self {
        QuizOptions::default().resolve(None)
    }
}

impl QuizOptions {
    pub fn resolve(&self, question_override: Option<&OptionsOverride>) -> EffectiveOptions {
        let over = question_override.copied().unwrap_or_default();
        EffectiveOptions {
            shuffle_answers: over.shuffle_answers.unwrap_or(self.shuffle_answers),
            case_sensitive: over.case_sensitive.unwrap_or(self.case_sensitive),
            order_sensitive: over.order_sensitive.unwrap_or(self.order_sensitive),
            shuffle_choices: over.shuffle_choices.unwrap_or(self.shuffle_choices),
            shuffle_matches: over.shuffle_matches.unwrap_or(self.shuffle_matches),
            unequal_list: over.unequal_list.unwrap_or(self.unequal_list),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_order_sensitive_only() {
        let options = EffectiveOptions::default();
        assert!(options.order_sensitive);
        assert!(!options.shuffle_answers);
        assert!(!options.case_sensitive);
        assert!(!options.shuffle_choices);
        assert!(!options.shuffle_matches);
        assert!(!options.unequal_list);
    }

    #[test]
    fn override_fields_win_independently() {
        let global = QuizOptions {
            shuffle_answers: true,
            case_sensitive: true,
            ..QuizOptions::default()
        };
        let over = OptionsOverride {
            case_sensitive: Some(false),
            order_sensitive: Some(false),
            ..OptionsOverride::default()
        };

        let options = global.resolve(Some(&over));
        assert!(options.shuffle_answers);
        assert!(!options.case_sensitive);
        assert!(!options.order_sensitive);
        assert!(global.resolve(None).case_sensitive);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let global: QuizOptions = serde_json::from_str(r#"{ "unequalList": true }"#).unwrap();
        assert!(global.unequal_list);
        assert!(global.order_sensitive);

        let over: OptionsOverride = serde_json::from_str(r#"{ "shuffleMatches": false }"#).unwrap();
        assert_eq!(over.shuffle_matches, Some(false));
        assert_eq!(over.shuffle_choices, None);
    }
}
