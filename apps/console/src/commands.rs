//! Console input lines mapped to controller commands.

use std::path::PathBuf;

use thiserror::Error;

pub const HELP: &str = "\
/open              open the upload surface
/select <path>     pick a document (no path clears the selection)
/upload [path]     upload the selected document, or pick and upload <path>
/close             close the upload surface
/status            show upload and chat status
/help              show this help
/quit              exit
Anything else is typed into the question box. End a line with '\\' to add a
line break instead of sending.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    OpenUpload,
    Select(Option<PathBuf>),
    Upload(Option<PathBuf>),
    CloseUpload,
    Status,
    Help,
    Quit,
    /// `continued` lines end with a modified Enter rather than a plain one.
    Type { text: String, continued: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '/{0}', try /help")]
    Unknown(String),
}

pub fn parse_line(line: &str) -> Result<ConsoleCommand, CommandError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(match line.strip_suffix('\\') {
            Some(text) => ConsoleCommand::Type {
                text: text.to_string(),
                continued: true,
            },
            None => ConsoleCommand::Type {
                text: line.to_string(),
                continued: false,
            },
        });
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    let path = (!arg.is_empty()).then(|| PathBuf::from(arg));

    match name {
        "open" => Ok(ConsoleCommand::OpenUpload),
        "select" => Ok(ConsoleCommand::Select(path)),
        "upload" => Ok(ConsoleCommand::Upload(path)),
        "close" => Ok(ConsoleCommand::CloseUpload),
        "status" => Ok(ConsoleCommand::Status),
        "help" => Ok(ConsoleCommand::Help),
        "quit" | "exit" => Ok(ConsoleCommand::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}
