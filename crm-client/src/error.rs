use thiserror::Error;

/// Errors returned by the CRM client.
///
/// Everything except [`CrmError::Rejected`] is a transport-level failure: the
/// request never produced a usable answer. `Rejected` means the server
/// answered 2xx but reported `success: false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CrmError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("TransportError: {0}")]
    Transport(String),
    #[error("{call} returned status {status}")]
    Status { call: String, status: u16 },
    #[error("ParsingError: {0}")]
    Parsing(String),
    #[error("{0} was rejected by the server")]
    Rejected(String),
    #[error("Missing CSRF token")]
    MissingCsrfToken,
    #[error("InvalidUrl: {0}")]
    InvalidUrl(String),
}

impl CrmError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// `true` when the server answered but refused the operation.
    pub fn is_application(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}
