use crate::error::InputError;
use std::fmt;

pub const DEFAULT_KEY_PREFIX: &str = "sk-";

/// An API key that passed the shape check. Only [`CredentialPolicy::admit`]
/// constructs one, so holding an `ApiKey` means the gate was passed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Superficial format guard for caller-supplied keys. Actual authorization
/// happens at the provider.
#[derive(Debug, Clone)]
pub struct CredentialPolicy {
    pub required_prefix: String,
}

impl CredentialPolicy {
    pub fn new(required_prefix: impl Into<String>) -> Self {
        Self {
            required_prefix: required_prefix.into(),
        }
    }

    pub fn admit(&self, raw: &str) -> Result<ApiKey, InputError> {
        let key = raw.trim();
        if key.is_empty() || !key.starts_with(&self.required_prefix) {
            return Err(InputError::InvalidCredential {
                prefix: self.required_prefix.clone(),
            });
        }
        Ok(ApiKey(key.to_string()))
    }
}

impl Default for CredentialPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PREFIX)
    }
}
