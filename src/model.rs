use serde::{Deserialize, Serialize};

/// Recipient meaning "everyone in the room".
pub const BROADCAST: &str = "Todos";
pub const JOIN_NOTICE: &str = "entra na sala...";
pub const LEAVE_NOTICE: &str = "sai da sala...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub name: String,
    /// Epoch millis of the last heartbeat (or of registration).
    pub last_status: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Message,
    PrivateMessage,
    Status,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Message        => "message",
            MessageKind::PrivateMessage => "private_message",
            MessageKind::Status         => "status",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "message"         => Some(MessageKind::Message),
            "private_message" => Some(MessageKind::PrivateMessage),
            "status"          => Some(MessageKind::Status),
            _                 => None,
        }
    }
}

/* ------------ message before the store assigns an id ------------ */
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMessage {
    pub from: String,
    pub to:   String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub time: String,
}

impl NewMessage {
    /// Join/leave notice addressed to the whole room.
    pub fn status(from: &str, text: &str, time: String) -> Self {
        Self {
            from: from.to_owned(),
            to:   BROADCAST.to_owned(),
            text: text.to_owned(),
            kind: MessageKind::Status,
            time,
        }
    }

    pub fn with_id(self, id: String) -> Message {
        Message {
            id,
            from: self.from,
            to:   self.to,
            text: self.text,
            kind: self.kind,
            time: self.time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "_id")]
    pub id:   String,
    pub from: String,
    pub to:   String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub time: String,
}

impl Message {
    /// Private messages are only shown to their two ends.
    pub fn visible_to(&self, requester: &str) -> bool {
        match self.kind {
            MessageKind::PrivateMessage => self.from == requester || self.to == requester,
            MessageKind::Message | MessageKind::Status => true,
        }
    }
}
