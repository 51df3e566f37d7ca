//! Scripted dialogs: serializable cursors plus pure transitions.

pub mod onboarding;
pub mod qna;

pub use onboarding::{OnboardingStep, StepOutcome, UserProfile};
pub use qna::{QnaOutcome, QnaStep};
