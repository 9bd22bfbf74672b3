//! First-run setup
//!
//! `Onboarding` performs the setup from validated answers; `SetupWizard`
//! collects those answers on the terminal.

pub mod onboarding;
pub mod wizard;

pub use onboarding::{Onboarding, OnboardingResult};
pub use wizard::{SetupAnswers, SetupWizard};
