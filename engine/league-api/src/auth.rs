//! Admin gate for write endpoints

use crate::error::ApiError;

/// Header carrying the admin secret on admin requests
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// Decides whether a request may use the admin endpoints
pub trait AdminAuthorizer: Send + Sync {
    fn authorize(&self, password: Option<&str>) -> Result<(), ApiError>;
}

/// A single shared secret, compared in constant time
#[derive(Debug, Clone, Default)]
pub struct SharedSecretAuthorizer {
    secret: Option<String>,
}

impl SharedSecretAuthorizer {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }
}

impl AdminAuthorizer for SharedSecretAuthorizer {
    fn authorize(&self, password: Option<&str>) -> Result<(), ApiError> {
        let Some(secret) = self.secret.as_deref() else {
            return Err(ApiError::AdminNotConfigured);
        };

        match password {
            Some(given) if constant_time_eq(given.as_bytes(), secret.as_bytes()) => Ok(()),
            _ => Err(ApiError::Unauthorized),
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_secret() {
        let auth = SharedSecretAuthorizer::new(Some("hunter2".to_string()));
        assert!(auth.authorize(Some("hunter2")).is_ok());
        assert!(matches!(
            auth.authorize(Some("hunter3")),
            Err(ApiError::Unauthorized)
        ));
        assert!(matches!(
            auth.authorize(Some("hunter")),
            Err(ApiError::Unauthorized)
        ));
        assert!(matches!(auth.authorize(None), Err(ApiError::Unauthorized)));
    }

    #[test]
    fn test_unconfigured_secret() {
        let auth = SharedSecretAuthorizer::new(Some(String::new()));
        assert!(matches!(
            auth.authorize(Some("")),
            Err(ApiError::AdminNotConfigured)
        ));
        assert!(matches!(
            SharedSecretAuthorizer::default().authorize(None),
            Err(ApiError::AdminNotConfigured)
        ));
    }
}
