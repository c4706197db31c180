use serde::{Deserialize, Serialize};

/// What to do with a message that matches none of the direction markers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnrecognizedPolicy {
    /// Return an income draft with empty partner and title. This is what the
    /// mobile app has always done, so it stays the default.
    #[default]
    DefaultToIncome,
    /// Return nothing for unmatched messages, and for drafts without an amount.
    Reject,
}

/// One incoming SMS as delivered by the phone's broadcast receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsEvent {
    /// Originating address, e.g. "MPESA"
    pub sender: String,
    pub body: String,
}

impl SmsEvent {
    pub fn new(sender: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            body: body.into(),
        }
    }

    /// Split a `sender<TAB>body` line. Lines without a tab are rejected.
    pub fn from_line(line: &str) -> Option<Self> {
        let (sender, body) = line.split_once('\t')?;
        Some(Self::new(sender.trim(), body.trim()))
    }
}
