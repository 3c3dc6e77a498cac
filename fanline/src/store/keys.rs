//! Documented local store keys.

/// Fixed key names used by the identity resolver and UI layers.
pub mod wellknown {
    /// Resolved id of the signed-in user.
    pub const CURRENT_USER_ID: &str = "current_user_id";
    /// Public-facing id of the signed-in user.
    pub const PUBLIC_ID: &str = "public_id";
    /// Email address the user signed in with.
    pub const LOGGED_IN_EMAIL: &str = "logged_in_email";
    /// Handle of the signed-in user.
    pub const USERNAME: &str = "username";
    /// Avatar URL of the signed-in user.
    pub const AVATAR_URL: &str = "avatar_url";
    /// Id of the profile currently being viewed.
    pub const VIEWING_TARGET_ID: &str = "viewing_target_id";
    /// Prefix for per-email cached id entries.
    pub const ID_FOR_EMAIL_PREFIX: &str = "id_for_email/";
    /// Prefix for persisted UI preference flags.
    pub const PREF_PREFIX: &str = "pref/";
}

/// Store key for the cached id of the given email.
pub fn id_for_email(email: &str) -> String {
    format!("{}{}", wellknown::ID_FOR_EMAIL_PREFIX, email.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_for_email_normalizes() {
        assert_eq!(id_for_email("Ada@X.com "), "id_for_email/ada@x.com");
        assert_eq!(id_for_email("ada@x.com"), "id_for_email/ada@x.com");
    }
}
