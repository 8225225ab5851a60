use dialoguer::{Confirm, console::Term};
use retitle_core::{ConfirmRequest, ConfirmationProvider};
use tracing::warn;

/// Asks on the terminal. Any prompt failure counts as "no".
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl ConfirmationProvider for TerminalPrompt {
    fn confirm(&mut self, request: &ConfirmRequest<'_>) -> bool {
        let prompt = match request {
            ConfirmRequest::Rename {
                path,
                proposed_name,
                decision,
            } => {
                eprintln!();
                eprintln!("  current:  {}", path.display());
                eprintln!("  proposed: {proposed_name}");
                eprintln!("  decision: {decision}");
                "Rename this file?".to_string()
            }
            ConfirmRequest::Overwrite {
                source,
                destination,
            } => format!(
                "{} already exists. Replace it with {}?",
                destination.display(),
                source.display()
            ),
        };

        match Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact_on(&Term::stderr())
        {
            Ok(answer) => answer,
            Err(err) => {
                warn!("confirmation prompt failed: {err}; treating as declined");
                false
            }
        }
    }
}
