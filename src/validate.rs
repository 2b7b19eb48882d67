//! Schema checks for user-submitted payloads.
//!
//! Each check reports only the first rule that fails. System notices
//! (`type = status`) are built internally and never pass through here.

use serde::Deserialize;

use crate::model::{MessageKind, NewMessage};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(String);

impl ValidationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ParticipantInput {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MessageInput {
    pub to:   Option<String>,
    pub text: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, ValidationError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::new(format!("{field} must be a non-empty string"))),
    }
}

pub fn participant(input: &ParticipantInput) -> Result<&str, ValidationError> {
    required("name", input.name.as_deref())
}

/// Assembles and checks a user message; `from` is the resolved sender name
/// (empty when the sender is not a registered participant).
pub fn message(from: &str, input: MessageInput, time: String) -> Result<NewMessage, ValidationError> {
    required("from", Some(from))?;
    let to   = required("to", input.to.as_deref())?;
    let text = required("text", input.text.as_deref())?;
    let kind = match input.kind.as_deref().and_then(MessageKind::parse) {
        Some(k @ (MessageKind::Message | MessageKind::PrivateMessage)) => k,
        _ => return Err(ValidationError::new("type must be message or private_message")),
    };
    Ok(NewMessage {
        from: from.to_owned(),
        to:   to.to_owned(),
        text: text.to_owned(),
        kind,
        time,
    })
}

/// `limit` query value: absent/empty/0 means "everything".
pub fn limit(raw: Option<&str>) -> Result<Option<usize>, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => match s.parse::<usize>() {
            Ok(0)  => Ok(None),
            Ok(n)  => Ok(Some(n)),
            Err(_) => Err(ValidationError::new(format!("limit must be a non-negative integer, got {s:?}"))),
        },
    }
}
