//! Interactive prompts.
//!
//! Uses dialoguer on the terminal; tests substitute a scripted implementation.

use dialoguer::{Confirm, Input};

/// Questions a command may need to ask the user.
pub trait Prompt {
    /// Ask for a line of text.
    fn input(&self, message: &str) -> Result<String, PromptError>;

    /// Ask a yes/no question. Defaults to no.
    fn confirm(&self, message: &str) -> Result<bool, PromptError>;
}

#[derive(Debug, thiserror::Error)]
#[error("Prompt failed: {0}")]
pub struct PromptError(#[from] dialoguer::Error);

/// Prompts on the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn input(&self, message: &str) -> Result<String, PromptError> {
        let value: String = Input::new().with_prompt(message).interact_text()?;
        Ok(value)
    }

    fn confirm(&self, message: &str) -> Result<bool, PromptError> {
        let confirmed = Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()?;
        Ok(confirmed)
    }
}
