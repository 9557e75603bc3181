use crate::types::Result;
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::io::IsTerminal;

/// Yes/no prompt for destructive chat commands.
///
/// Without an interactive terminal (piped input, CI) nothing is asked and
/// `default_yes` is returned as the answer.
pub fn ask_confirmation(prompt: &str, default_yes: bool) -> Result<bool> {
    if !std::io::stdin().is_terminal() {
        return Ok(default_yes);
    }
    let answer = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default_yes)
        .wait_for_newline(true)
        .interact()?;
    Ok(answer)
}
