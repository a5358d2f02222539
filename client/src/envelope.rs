use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Error descriptor the API embeds in an otherwise successful response.
///
/// On the wire this is `{"code": 2, "error": "Incorrect key"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: i64,
    #[serde(rename = "error", alias = "message")]
    pub message: String,
}

impl ErrorInfo {
    pub fn new<S: Into<String>>(code: i64, message: S) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Shared shape of every typed response.
///
/// The dispatcher only ever looks at the error slot; everything else in the
/// payload is opaque to it.
pub trait Envelope: DeserializeOwned {
    fn error_info(&self) -> Option<&ErrorInfo>;

    fn error_info_mut(&mut self) -> &mut Option<ErrorInfo>;

    fn is_error(&self) -> bool {
        self.error_info().is_some()
    }

    /// Detach the embedded error, leaving the slot empty.
    fn take_error_info(&mut self) -> Option<ErrorInfo> {
        self.error_info_mut().take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize)]
    struct Probe {
        #[serde(default)]
        error: Option<ErrorInfo>,
        #[serde(default)]
        name: Option<String>,
    }

    impl Envelope for Probe {
        fn error_info(&self) -> Option<&ErrorInfo> {
            self.error.as_ref()
        }

        fn error_info_mut(&mut self) -> &mut Option<ErrorInfo> {
            &mut self.error
        }
    }

    #[test]
    fn test_error_info_wire_shape() {
        let info: ErrorInfo = serde_json::from_str(r#"{"code":2,"error":"Incorrect key"}"#).unwrap();
        assert_eq!(info, ErrorInfo::new(2, "Incorrect key"));

        let info: ErrorInfo = serde_json::from_str(r#"{"code":5,"message":"Too many requests"}"#).unwrap();
        assert_eq!(info.code, 5);
        assert_eq!(info.message, "Too many requests");
    }

    #[test]
    fn test_take_error_info() {
        let mut probe: Probe =
            serde_json::from_str(r#"{"error":{"code":9,"error":"API disabled"}}"#).unwrap();
        assert!(probe.is_error());
        assert_eq!(probe.take_error_info().map(|e| e.code), Some(9));
        assert!(!probe.is_error());
        assert!(probe.name.is_none());
    }

    #[test]
    fn test_set_error_info() {
        let mut probe: Probe = serde_json::from_str(r#"{"name":"Chedburn"}"#).unwrap();
        assert!(!probe.is_error());
        *probe.error_info_mut() = Some(ErrorInfo::new(0, "Unknown error"));
        assert_eq!(probe.error_info().map(|e| e.code), Some(0));
    }
}
