use shelfapp::actions::Confirm;

/// Asks on the terminal. Without a terminal the answer is "no".
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, question: &str) -> bool {
        match dialoguer::Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact()
        {
            Ok(answer) => answer,
            Err(e) => {
                log::warn!("cannot prompt ({}), treating as no", e);
                false
            }
        }
    }
}
