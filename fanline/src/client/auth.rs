//! Authentication session state.

/// An authenticated session against the hosted backend.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Access token issued by the backend's auth service.
    pub access_token: String,
    /// User ID of the signed-in user.
    pub user_id: String,
    /// Email the user signed in with, when known.
    pub email: Option<String>,
}

impl AuthSession {
    /// Create a new session.
    pub fn new(access_token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            user_id: user_id.into(),
            email: None,
        }
    }

    /// Attach the sign-in email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Check if the session looks valid.
    pub fn is_valid(&self) -> bool {
        !self.access_token.is_empty() && !self.user_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_validity() {
        let valid = AuthSession::new("tok123", "u-1");
        assert!(valid.is_valid());

        let empty_token = AuthSession::new("", "u-1");
        assert!(!empty_token.is_valid());

        let empty_user = AuthSession::new("tok123", "");
        assert!(!empty_user.is_valid());
    }

    #[test]
    fn test_with_email() {
        let session = AuthSession::new("tok", "u-1").with_email("ada@x.com");
        assert_eq!(session.email.as_deref(), Some("ada@x.com"));
    }
}
