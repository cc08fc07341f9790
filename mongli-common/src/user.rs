//! User profile payloads.

use serde::{Deserialize, Serialize};

/// Body of `PATCH /user/name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_request_deserialize() {
        let request: RenameRequest = serde_json::from_str(r#"{"name": "Mongli"}"#).unwrap();
        assert_eq!(request.name, "Mongli");
    }

    #[test]
    fn test_rename_request_missing_name() {
        assert!(serde_json::from_str::<RenameRequest>("{}").is_err());
    }
}
