//! Interactive setup wizard
//!
//! Asks for the onboarding answers on the terminal, re-asking until they
//! validate, then hands them to [`Onboarding`].

use std::io::{self, Write};

use chrono::Local;

use crate::config::settings::Settings;
use crate::error::{PeculeError, PeculeResult};
use crate::services::validation::validate_onboarding;
use crate::storage::Storage;

use super::onboarding::{Onboarding, OnboardingResult};

/// Answers gathered before onboarding runs; missing ones are prompted for
#[derive(Debug, Clone, Default)]
pub struct SetupAnswers {
    pub first_name: Option<String>,
    pub amount: Option<String>,
    pub start_date: Option<String>,
}

pub struct SetupWizard<'a> {
    storage: &'a Storage,
}

impl<'a> SetupWizard<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Run onboarding, prompting for whatever `answers` leaves out
    pub fn run(&self, settings: &mut Settings, answers: SetupAnswers) -> PeculeResult<OnboardingResult> {
        let interactive = answers.first_name.is_none()
            || answers.amount.is_none()
            || answers.start_date.is_none();

        if interactive {
            println!();
            println!("Bienvenue dans Pécule !");
            println!("Let's set up your first budget cycle.");
            println!();
        }

        let today = Local::now().date_naive().format("%d/%m/%Y").to_string();

        loop {
            let first_name = match &answers.first_name {
                Some(name) => name.clone(),
                None => prompt_string("First name: ")?,
            };
            let amount = match &answers.amount {
                Some(amount) => amount.clone(),
                None => prompt_string("Opening amount (e.g. 2500,00): ")?,
            };
            let start_date = match &answers.start_date {
                Some(date) => date.clone(),
                None => {
                    let input = prompt_string(&format!("Cycle start date [{}]: ", today))?;
                    if input.is_empty() {
                        today.clone()
                    } else {
                        input
                    }
                }
            };

            let errors = validate_onboarding(&first_name, &amount, &start_date);
            if errors.is_empty() {
                return Onboarding::new(self.storage).complete(settings, &first_name, &amount, &start_date);
            }

            if !interactive {
                return Err(PeculeError::from_messages(&errors));
            }

            println!();
            for error in &errors {
                println!("  - {}", error);
            }
            println!();
        }
    }
}

fn prompt_string(prompt: &str) -> PeculeResult<String> {
    print!("{}", prompt);
    io::stdout().flush().map_err(|e| PeculeError::Io(e.to_string()))?;

    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .map_err(|e| PeculeError::Io(e.to_string()))?;
    if read == 0 {
        return Err(PeculeError::Io("Setup cancelled: no more input".into()));
    }

    Ok(input.trim().to_string())
}
