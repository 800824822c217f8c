//! Port messages exchanged with the embedded application.
//!
//! Both directions share the wire shape `{ "tag": <string>, "data"?: <value> }`.
//! The tag set is closed: inbound tags the bridge does not handle decode to
//! [`InboundMessage::Unknown`] instead of failing.

use serde::{Deserialize, Serialize};

/// Message sent by the embedded application to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag")]
pub enum InboundMessage {
    /// Request for the current clipboard text.
    AskForClipBoard,

    /// Any tag outside the handled set. Carries no payload.
    #[serde(other)]
    Unknown,
}

impl InboundMessage {
    pub fn tag(&self) -> &'static str {
        match self {
            InboundMessage::AskForClipBoard => "AskForClipBoard",
            InboundMessage::Unknown => "Unknown",
        }
    }
}

/// Message sent by the host back to the embedded application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", content = "data")]
pub enum OutboundMessage {
    /// Clipboard text read in response to [`InboundMessage::AskForClipBoard`].
    GotClipboard(String),
}

impl OutboundMessage {
    pub fn tag(&self) -> &'static str {
        match self {
            OutboundMessage::GotClipboard(_) => "GotClipboard",
        }
    }
}
