use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Text transformation requested from the language model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiAction {
    Summary,
    FixGrammar,
    Expand,
}

impl AiAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiAction::Summary => "summary",
            AiAction::FixGrammar => "fix_grammar",
            AiAction::Expand => "expand",
        }
    }

    /// Wrap the user's text in this action's fixed instruction.
    pub fn prompt(&self, text: &str) -> String {
        let instruction = match self {
            AiAction::Summary => {
                "Summarize the following text concisely in 2-4 sentences. Keep the same language as the original:"
            }
            AiAction::FixGrammar => {
                "Fix any grammar, spelling, and punctuation errors in the following text. Return ONLY the corrected text, no explanation:"
            }
            AiAction::Expand => {
                "Expand the following text into a longer, more detailed version. Keep the same tone:"
            }
        };
        format!("{instruction}\n\n{text}")
    }
}

impl FromStr for AiAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summary" => Ok(AiAction::Summary),
            "fix_grammar" => Ok(AiAction::FixGrammar),
            "expand" => Ok(AiAction::Expand),
            _ => Err(DomainError::Validation(
                "Invalid action. Use: summary, fix_grammar, expand".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_actions() {
        assert_eq!("summary".parse::<AiAction>().unwrap(), AiAction::Summary);
        assert_eq!("fix_grammar".parse::<AiAction>().unwrap(), AiAction::FixGrammar);
        assert_eq!("expand".parse::<AiAction>().unwrap(), AiAction::Expand);
    }

    #[test]
    fn test_parse_unknown_action_is_validation_error() {
        let err = "bogus_action".parse::<AiAction>().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_prompt_wraps_text() {
        let prompt = AiAction::FixGrammar.prompt("teh cat");
        assert!(prompt.starts_with("Fix any grammar"));
        assert!(prompt.ends_with("\n\nteh cat"));
    }
}
