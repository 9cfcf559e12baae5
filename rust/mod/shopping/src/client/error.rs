use thiserror::Error;

/// Coarse classification of a client-side failure. Views branch on this,
/// never on the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never produced a response.
    Network,
    /// The server answered with an error status.
    Server,
    /// The server rejected the credentials.
    Auth,
    Unknown,
}

/// The one error shape every client-side failure is normalized into
/// before it reaches a view.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ClientError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Network,
            message: message.into(),
        }
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Server,
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Auth,
            message: message.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Unknown,
            message: message.into(),
        }
    }

    /// Normalize an HTTP error status into a kind.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let kind = match status {
            401 | 403 => ErrorKind::Auth,
            400..=599 => ErrorKind::Server,
            _ => ErrorKind::Unknown,
        };
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert_eq!(ClientError::from_status(401, "no").kind, ErrorKind::Auth);
        assert_eq!(ClientError::from_status(403, "no").kind, ErrorKind::Auth);
        assert_eq!(ClientError::from_status(404, "no").kind, ErrorKind::Server);
        assert_eq!(ClientError::from_status(500, "no").kind, ErrorKind::Server);
        assert_eq!(ClientError::from_status(302, "odd").kind, ErrorKind::Unknown);
    }

    #[test]
    fn display_is_the_message() {
        let err = ClientError::network("connection refused");
        assert_eq!(err.to_string(), "connection refused");
    }
}
