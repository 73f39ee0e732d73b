use thiserror::Error;

/// Validation failures raised by the message store. The HTTP adapter maps
/// these to `400 Bad Request`; push mode never produces them because it only
/// relays messages accepted over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("content must not be empty")]
    EmptyContent,
}
