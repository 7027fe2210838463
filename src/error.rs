//! Error type shared by the signer, transport and response parser.

use thiserror::Error;

/// Boxed error used to carry transport failures through unchanged.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced while building, sending or decoding a signed request.
#[derive(Debug, Error)]
pub enum PaapiError {
    /// The HMAC could not be computed. Not retryable.
    #[error("failed to sign request: {0}")]
    Signing(String),

    /// The region code or endpoint override does not resolve to a usable host.
    #[error("invalid endpoint: {0}")]
    Endpoint(String),

    /// The request never got a response.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// The service answered with a non-success status.
    #[error("service returned status {status}: {message}")]
    BadStatus { status: u16, message: String },

    /// The request was rejected before signing.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The response body could not be decoded.
    #[error("failed to parse response: {0}")]
    Parse(String),
}

impl PaapiError {
    /// Wraps any transport-level error.
    pub fn transport(err: impl Into<BoxError>) -> Self {
        PaapiError::Transport(err.into())
    }

    /// Returns the HTTP status for `BadStatus` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            PaapiError::BadStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<roxmltree::Error> for PaapiError {
    fn from(err: roxmltree::Error) -> Self {
        PaapiError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_status_display() {
        let err = PaapiError::BadStatus { status: 403, message: "SignatureDoesNotMatch".into() };
        assert_eq!(err.to_string(), "service returned status 403: SignatureDoesNotMatch");
        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn test_transport_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = PaapiError::transport(io);
        assert!(err.to_string().contains("refused"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.status().is_none());
    }

    #[test]
    fn test_parse_from_xml_error() {
        let xml_err = roxmltree::Document::parse("<a>").unwrap_err();
        let err: PaapiError = xml_err.into();
        assert!(matches!(err, PaapiError::Parse(_)));
    }
}
