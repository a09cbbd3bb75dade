use anyhow::Error;

use crate::model::FetchFailure;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorType {
    ConnectionRefused,
    Timeout,
    Unauthorized, // HTTP 401
    NotFound,     // HTTP 404
    ServerError,  // HTTP 500+
    NetworkError, // DNS, routing, etc.
    Other,
}

impl ErrorType {
    /// Errors meaning the catalog can't be reached at all
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            ErrorType::ConnectionRefused | ErrorType::Timeout | ErrorType::NetworkError
        )
    }
}

/// Find the reqwest error anywhere in the chain
fn find_reqwest_error(error: &Error) -> Option<&reqwest::Error> {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<reqwest::Error>())
}

/// Classify an error based on its type and error chain
pub fn classify_error(error: &Error) -> ErrorType {
    if let Some(reqwest_err) = find_reqwest_error(error) {
        if reqwest_err.is_connect() {
            return ErrorType::ConnectionRefused;
        }
        if reqwest_err.is_timeout() {
            return ErrorType::Timeout;
        }
        if let Some(status) = reqwest_err.status() {
            return classify_status(status.as_u16());
        }
    }

    // Context wrappers hide the cause in to_string(), so match against the whole chain
    let error_msg = format!("{:#}", error).to_lowercase();

    if error_msg.contains("connection refused") {
        return ErrorType::ConnectionRefused;
    }
    if error_msg.contains("timeout") || error_msg.contains("timed out") {
        return ErrorType::Timeout;
    }
    if error_msg.contains("dns") || error_msg.contains("network") {
        return ErrorType::NetworkError;
    }

    ErrorType::Other
}

/// Classify an HTTP status code
pub fn classify_status(status: u16) -> ErrorType {
    match status {
        401 => ErrorType::Unauthorized,
        404 => ErrorType::NotFound,
        500..=599 => ErrorType::ServerError,
        _ => ErrorType::Other,
    }
}

/// Format error message for tech-savvy audience - show raw error details
pub fn format_error_message(error: &Error) -> String {
    if let Some(reqwest_err) = find_reqwest_error(error) {
        return reqwest_err.to_string();
    }

    // Otherwise the deepest (root cause) error
    error
        .chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| error.to_string())
}

impl FetchFailure {
    /// Map a transport-level error into the fetch failure taxonomy
    ///
    /// Unreachable service → `ConnectionUnavailable`; anything else is an API
    /// failure carrying the HTTP status when one is known, else code 0.
    pub fn from_error(error: &Error) -> Self {
        let message = format_error_message(error);
        if classify_error(error).is_connectivity() {
            return FetchFailure::ConnectionUnavailable(message);
        }

        let code = find_reqwest_error(error)
            .and_then(|e| e.status())
            .map(|status| status.as_u16())
            .unwrap_or(0);
        FetchFailure::Api { code, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_connection_refused() {
        let err = anyhow::anyhow!("connection refused (os error 111)");
        assert_eq!(classify_error(&err), ErrorType::ConnectionRefused);
    }

    #[test]
    fn test_classify_connection_refused_uppercase() {
        let err = anyhow::anyhow!("Connection Refused");
        assert_eq!(classify_error(&err), ErrorType::ConnectionRefused);
    }

    #[test]
    fn test_classify_looks_through_context() {
        let err = anyhow::anyhow!("connection refused").context("Failed to fetch latest books");
        assert_eq!(classify_error(&err), ErrorType::ConnectionRefused);
    }

    #[test]
    fn test_classify_timeout() {
        let err = anyhow::anyhow!("request timed out");
        assert_eq!(classify_error(&err), ErrorType::Timeout);
    }

    #[test]
    fn test_classify_dns_error() {
        let err = anyhow::anyhow!("dns lookup failed");
        assert_eq!(classify_error(&err), ErrorType::NetworkError);
    }

    #[test]
    fn test_classify_other_error() {
        let err = anyhow::anyhow!("some random error");
        assert_eq!(classify_error(&err), ErrorType::Other);
    }

    #[test]
    fn test_classify_status() {
        assert_eq!(classify_status(401), ErrorType::Unauthorized);
        assert_eq!(classify_status(404), ErrorType::NotFound);
        assert_eq!(classify_status(502), ErrorType::ServerError);
        assert_eq!(classify_status(418), ErrorType::Other);
    }

    #[test]
    fn test_format_shows_root_cause() {
        let inner = anyhow::anyhow!("tcp connect error");
        let outer = inner.context("Failed to fetch latest books");
        assert_eq!(format_error_message(&outer), "tcp connect error");
    }

    #[test]
    fn test_format_preserves_simple_errors() {
        let err = anyhow::anyhow!("custom error message");
        assert_eq!(format_error_message(&err), "custom error message");
    }

    #[test]
    fn test_fetch_failure_from_unreachable() {
        let err = anyhow::anyhow!("network unreachable").context("Failed to fetch latest books");
        assert_eq!(
            FetchFailure::from_error(&err),
            FetchFailure::ConnectionUnavailable("network unreachable".to_string())
        );
    }

    #[test]
    fn test_fetch_failure_from_other_is_api_code_zero() {
        let err = anyhow::anyhow!("expected value at line 1 column 1");
        assert_eq!(
            FetchFailure::from_error(&err),
            FetchFailure::Api {
                code: 0,
                message: "expected value at line 1 column 1".to_string()
            }
        );
    }
}
