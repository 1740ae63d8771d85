use crate::commands::{CmdMessage, CmdResult};
use crate::config::{ShelfConfig, CONFIG_FILE};
use crate::error::Result;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Effective values after env and file layering
    Show,
    /// A commented TOML template with every key
    Template,
}

pub fn run(config: &ShelfConfig, data_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match action {
        ConfigAction::Show => {
            result.entries = config.entries();
            let file = data_dir.join(CONFIG_FILE);
            let note = if file.exists() {
                format!("Loaded from {}", file.display())
            } else {
                format!("No {} found, using defaults", file.display())
            };
            result.add_message(CmdMessage::info(note));
        }
        ConfigAction::Template => {
            result.add_message(CmdMessage::info(ShelfConfig::template()));
        }
    }
    Ok(result)
}
