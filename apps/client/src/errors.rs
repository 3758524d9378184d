use thiserror::Error;

pub const CONNECT_FAILED: &str = "Failed to connect to server.";
pub const NOT_AUTHENTICATED: &str = "Not authenticated. Please sign in again.";

/// Client-level error type.
///
/// Every failure a panel can hit ends up here and is rendered through
/// [`ClientError::user_message`]; none of them are fatal to the shell.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Input rejected before any request was built.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The request never produced an HTTP response (DNS, refused, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx status, or a 2xx body carrying an `error` field.
    #[error("Server error (status {status}): {}", message.as_deref().unwrap_or("<no message>"))]
    Server { status: u16, message: Option<String> },

    /// 2xx body that does not match the endpoint's response type.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A token-requiring request was attempted without a session.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The auth provider rejected the operation (bad credentials, taken email...).
    #[error("Auth error: {0}")]
    Auth(String),

    /// A submission is already pending on this panel.
    #[error("A request is already in progress")]
    Busy,

    /// The document renderer could not produce a file.
    #[error("Render error: {0}")]
    Render(String),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// The message a panel displays for this error.
    ///
    /// `fallback` is the panel's generic failure text, used when the server
    /// gave no usable message.
    pub fn user_message(&self, fallback: &str) -> String {
        self.user_message_offline(fallback, CONNECT_FAILED)
    }

    /// Like [`ClientError::user_message`], with a panel-specific text for
    /// requests that never reached the server.
    pub fn user_message_offline(&self, fallback: &str, connect_failed: &str) -> String {
        match self {
            ClientError::Validation(msg) | ClientError::Auth(msg) => msg.clone(),
            ClientError::Network(_) => connect_failed.to_string(),
            ClientError::Server { message, .. } => message
                .as_deref()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(fallback)
                .to_string(),
            ClientError::MalformedResponse(detail) => {
                tracing::warn!("Malformed response: {detail}");
                fallback.to_string()
            }
            ClientError::NotAuthenticated => NOT_AUTHENTICATED.to_string(),
            ClientError::Busy => "Please wait for the current request to finish.".to_string(),
            ClientError::Render(detail) => {
                tracing::warn!("Could not render resume: {detail}");
                "Could not create the PDF.".to_string()
            }
            ClientError::Io(e) => format!("Could not read file: {e}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
