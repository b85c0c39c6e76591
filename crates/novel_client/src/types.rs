use std::fmt;

/// Shown for failures where no response was received at all.
pub const CONNECTIVITY_MESSAGE: &str = "network connection failed, please check your connection";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ClientError {
    pub kind: FailureKind,
    pub message: String,
}

impl ClientError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Message suitable for an inline error banner.
    pub fn user_message(&self) -> String {
        match self.kind {
            FailureKind::Network | FailureKind::Timeout => CONNECTIVITY_MESSAGE.to_string(),
            _ => self.message.clone(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self.kind {
            FailureKind::Unauthorized => Some(401),
            FailureKind::Validation(code) | FailureKind::Server(code) => Some(code),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == FailureKind::Unauthorized
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    /// No response: connection refused, DNS, reset.
    Network,
    Timeout,
    /// 401 on a token-protected endpoint.
    Unauthorized,
    /// Any other 4xx, and 401 on the login/register/verify flow.
    Validation(u16),
    Server(u16),
    /// Request body could not be encoded, or a required field was missing
    /// from a successful reply.
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Unauthorized => write!(f, "unauthorized"),
            FailureKind::Validation(code) => write!(f, "rejected with status {code}"),
            FailureKind::Server(code) => write!(f, "server error {code}"),
            FailureKind::Decode => write!(f, "decode error"),
        }
    }
}

/// Raw reply handed back by a [`crate::Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}
