//! Line-oriented terminal front end.
//!
//! Parses one command per line into an [`Intent`] and renders board
//! snapshots as plain text. Holds no state of its own.

use crate::board::{BoardError, BoardSnapshot, Message, SubmitOutcome};

/// A user action read from the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Connect,
    Disconnect,
    /// Replace the draft.
    Draft(String),
    /// Submit the given text, or the current draft when `None`.
    Post(Option<String>),
    List,
    Status,
    Help,
    Quit,
}

/// Error for lines that are not a known command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl std::fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown command '{}', type 'help'", self.0)
    }
}

impl std::error::Error for UnknownCommand {}

pub const HELP: &str = "\
commands:
  connect          connect the wallet and check the token gate
  disconnect       forget the connected wallet
  draft <text>     set the draft message
  post [text]      attest and post <text>, or the current draft
  list             show all messages
  status           show wallet, draft and busy state
  help             show this text
  quit             leave the board";

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_intent(line: &str) -> Result<Option<Intent>, UnknownCommand> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let intent = match command.to_ascii_lowercase().as_str() {
        "connect" => Intent::Connect,
        "disconnect" => Intent::Disconnect,
        "draft" => Intent::Draft(rest.to_string()),
        "post" | "submit" => {
            if rest.is_empty() {
                Intent::Post(None)
            } else {
                Intent::Post(Some(rest.to_string()))
            }
        }
        "list" | "ls" => Intent::List,
        "status" => Intent::Status,
        "help" | "?" => Intent::Help,
        "quit" | "exit" => Intent::Quit,
        other => return Err(UnknownCommand(other.to_string())),
    };
    Ok(Some(intent))
}

pub fn render_message(message: &Message) -> String {
    let mut line = format!(
        "#{} [{}] {}: {}",
        message.id,
        message.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        message.author,
        message.content
    );
    if let Some(uid) = &message.attestation_uid {
        line.push_str(&format!("  (attestation {})", uid));
    }
    line
}

pub fn render_messages(messages: &[Message]) -> String {
    if messages.is_empty() {
        return "no messages yet".to_string();
    }
    messages.iter().map(render_message).collect::<Vec<_>>().join("\n")
}

pub fn render_status(snapshot: &BoardSnapshot) -> String {
    let wallet = snapshot.author().unwrap_or_else(|| "not connected".to_string());
    let mut busy = Vec::new();
    if snapshot.connecting {
        busy.push("connecting");
    }
    if snapshot.attesting {
        busy.push("attesting");
    }
    let busy = if busy.is_empty() { "idle".to_string() } else { busy.join(", ") };

    format!(
        "wallet: {}\nstate: {}\ndraft: {}\nmessages: {}",
        wallet,
        busy,
        if snapshot.draft.is_empty() { "<empty>" } else { snapshot.draft.as_str() },
        snapshot.messages.len()
    )
}

pub fn render_outcome(outcome: &SubmitOutcome) -> String {
    match outcome {
        SubmitOutcome::Posted(message) => render_message(message),
        SubmitOutcome::Skipped => "nothing to post (empty draft or no wallet connected)".to_string(),
        SubmitOutcome::Discarded { .. } => {
            "wallet changed while attesting; the post was dropped".to_string()
        }
    }
}

pub fn render_error(err: &BoardError) -> String {
    format!("error: {}", err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Address;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn message() -> Message {
        Message {
            id: 3,
            author: "0xf39F...2266".to_string(),
            content: "hello".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap(),
            attestation_uid: Some("att-42".to_string()),
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_intent("connect"), Ok(Some(Intent::Connect)));
        assert_eq!(parse_intent("  DISCONNECT "), Ok(Some(Intent::Disconnect)));
        assert_eq!(parse_intent("post"), Ok(Some(Intent::Post(None))));
        assert_eq!(
            parse_intent("post  gm  frens "),
            Ok(Some(Intent::Post(Some("gm  frens".to_string()))))
        );
        assert_eq!(
            parse_intent("draft work in progress"),
            Ok(Some(Intent::Draft("work in progress".to_string())))
        );
        assert_eq!(parse_intent("draft"), Ok(Some(Intent::Draft(String::new()))));
        assert_eq!(parse_intent(""), Ok(None));
        assert_eq!(parse_intent("exit"), Ok(Some(Intent::Quit)));
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_intent("delete 1").unwrap_err();
        assert_eq!(err, UnknownCommand("delete".to_string()));
        assert!(err.to_string().contains("help"));
    }

    #[test]
    fn test_render_message() {
        assert_eq!(
            render_message(&message()),
            "#3 [2026-10-16 09:30:00 UTC] 0xf39F...2266: hello  (attestation att-42)"
        );
    }

    #[test]
    fn test_render_status() {
        let snapshot = BoardSnapshot {
            wallet: Some("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".parse::<Address>().unwrap()),
            connecting: false,
            attesting: true,
            draft: String::new(),
            messages: Arc::new(vec![message()]),
        };
        assert_eq!(
            render_status(&snapshot),
            "wallet: 0xf39F...2266\nstate: attesting\ndraft: <empty>\nmessages: 1"
        );
    }

    #[test]
    fn test_render_empty_board() {
        assert_eq!(render_messages(&[]), "no messages yet");
    }
}
