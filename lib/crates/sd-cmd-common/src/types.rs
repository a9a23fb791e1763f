use serde::{Deserialize, Serialize};

/// A mutable tag → version mapping kept by the Screwdriver API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagPointer {
    pub namespace: String,
    pub name: String,
    pub tag: String,
    pub version: String,
}

/// Body of `PUT /commands/{namespace}/{name}/tags/{tag}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagRequest {
    pub version: String,
}

/// Body of `POST /validator/command`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorRequest {
    pub yaml: String,
}

/// One reason a manifest was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMessage {
    pub message: String,
}

/// Validator response. An empty `errors` list means the manifest is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    #[serde(default)]
    pub errors: Vec<ValidationMessage>,
}

impl ValidationResult {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Error messages in the order the validator returned them.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }
}

/// Error body returned by the API and the Store on 4xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(rename = "statusCode", default)]
    pub status_code: u16,
    #[serde(rename = "error")]
    pub reason: String,
    #[serde(default)]
    pub message: String,
}
