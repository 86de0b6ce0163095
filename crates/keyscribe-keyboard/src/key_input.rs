use keyscribe_core::{ActionKind, PROMPT_PARAMETER};

use std::collections::BTreeMap;

/// One key press on the keyboard's control row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyInput {
    /// Send an action to the host.
    Press {
        /// Action to send.
        action: ActionKind,
        /// Parameters sent with it.
        parameters: BTreeMap<String, String>,
    },
    /// Dismiss the keyboard.
    Quit,
}

/// Parameters for a start action carrying an optional cleanup prompt.
pub fn start_parameters(prompt: Option<String>) -> BTreeMap<String, String> {
    prompt
        .filter(|p| !p.trim().is_empty())
        .map(|p| BTreeMap::from([(PROMPT_PARAMETER.to_string(), p)]))
        .unwrap_or_default()
}

/// Parse a typed control line such as `start formal tone` or `stop`.
///
/// Returns `None` for blank or unrecognized lines.
pub fn parse_key(line: &str) -> Option<KeyInput> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

    let press = |action| KeyInput::Press {
        action,
        parameters: BTreeMap::new(),
    };

    match word.to_ascii_lowercase().as_str() {
        "start" | "record" => Some(KeyInput::Press {
            action: ActionKind::StartRecording,
            parameters: start_parameters(Some(rest.trim().to_string())),
        }),
        "pause" => Some(press(ActionKind::PauseRecording)),
        "resume" => Some(press(ActionKind::ResumeRecording)),
        "stop" => Some(press(ActionKind::StopRecording)),
        "status" => Some(press(ActionKind::CheckStatus)),
        "quit" | "exit" => Some(KeyInput::Quit),
        _ => None,
    }
}
