//! Onboarding dialog — a fixed four-step waterfall that collects a name
//! and, with consent, an age.
//!
//! The dialog is a cursor (`OnboardingStep`) persisted per conversation
//! plus pure transitions. Feeding the user's reply to [`OnboardingStep::advance`]
//! yields the next cursor and the messages to send; the caller owns
//! persistence and delivery.

use serde::{Deserialize, Serialize};

const NAME_PROMPT: &str = "What is your name, human?";
const AGE_CONSENT_PROMPT: &str = "Do you want to give your age? (1) yes or (2) no";
const AGE_PROMPT: &str = "What is your age?";
const AGE_RETRY_PROMPT: &str = "Sorry, please specify your age as a positive number or say cancel.";
const AGE_NOT_POSITIVE: &str = "Your age can't be less than zero.";
const NO_AGE_GIVEN: &str = "No age given.";

/// What the bot remembers about a user across conversations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: Option<String>,
    /// Only set when consent was affirmative and a value above zero was given.
    pub age: Option<i64>,
}

/// Where the onboarding dialog is waiting for input.
///
/// Progresses linearly: AwaitingName → AwaitingAgeConsent → AwaitingAge,
/// with early exit when consent is declined. `None` as the persisted cursor
/// means no dialog is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    AwaitingName,
    AwaitingAgeConsent,
    AwaitingAge,
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AwaitingName => "awaiting_name",
            Self::AwaitingAgeConsent => "awaiting_age_consent",
            Self::AwaitingAge => "awaiting_age",
        };
        write!(f, "{s}")
    }
}

/// Result of one dialog transition: the cursor to persist (`None` ends the
/// dialog) and the replies to deliver, in order.
#[derive(Debug, PartialEq)]
pub struct StepOutcome {
    pub next: Option<OnboardingStep>,
    pub replies: Vec<String>,
}

impl OnboardingStep {
    /// Start the dialog: prompt for a name and wait on it.
    pub fn begin() -> StepOutcome {
        StepOutcome {
            next: Some(Self::AwaitingName),
            replies: vec![NAME_PROMPT.to_string()],
        }
    }

    /// Consume one user reply and move the dialog forward.
    pub fn advance(self, input: &str, profile: &mut UserProfile) -> StepOutcome {
        match self {
            Self::AwaitingName => {
                profile.name = Some(input.to_string());
                StepOutcome {
                    next: Some(Self::AwaitingAgeConsent),
                    replies: vec![AGE_CONSENT_PROMPT.to_string()],
                }
            }
            Self::AwaitingAgeConsent => match consent_choice(input) {
                Some(true) => StepOutcome {
                    next: Some(Self::AwaitingAge),
                    replies: vec![AGE_PROMPT.to_string()],
                },
                Some(false) => StepOutcome {
                    next: None,
                    replies: vec![NO_AGE_GIVEN.to_string()],
                },
                // Unrecognized choice: ask again, stay put.
                None => StepOutcome {
                    next: Some(Self::AwaitingAgeConsent),
                    replies: vec![AGE_CONSENT_PROMPT.to_string()],
                },
            },
            Self::AwaitingAge => match input.trim().parse::<i64>() {
                Ok(age) if age > 0 => {
                    profile.age = Some(age);
                    StepOutcome {
                        next: None,
                        replies: vec![format!("I will remember that you are {age} years old.")],
                    }
                }
                Ok(_) => StepOutcome {
                    next: Some(Self::AwaitingAge),
                    replies: vec![AGE_NOT_POSITIVE.to_string(), AGE_RETRY_PROMPT.to_string()],
                },
                Err(_) => StepOutcome {
                    next: Some(Self::AwaitingAge),
                    replies: vec![AGE_RETRY_PROMPT.to_string()],
                },
            },
        }
    }
}

/// Interpret a consent reply. Accepts the words and the rendered ordinals
/// from the choice prompt; anything else is unrecognized.
fn consent_choice(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "yes" | "y" | "1" => Some(true),
        "no" | "n" | "2" => Some(false),
        _ => None,
    }
}
