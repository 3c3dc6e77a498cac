//! Type-safe ID wrappers.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            /// Check if this ID is empty.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Get the inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_owned())
            }
        }

        impl From<&String> for $name {
            fn from(s: &String) -> Self {
                $name(s.clone())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(UserId, "A user/creator identifier.");
define_id!(PostId, "A feed post identifier.");
define_id!(ConversationId, "A direct-message conversation identifier.");
define_id!(MessageId, "A direct-message identifier.");
define_id!(CollectionId, "A paid content collection identifier.");

impl MessageId {
    /// Prefix used for locally generated optimistic message IDs.
    pub const TEMP_PREFIX: &'static str = "temp-";

    /// Create a temporary ID for an optimistic message.
    pub fn temp(suffix: impl fmt::Display) -> Self {
        MessageId(format!("{}{}", Self::TEMP_PREFIX, suffix))
    }

    /// Check if this is a locally generated temporary ID.
    pub fn is_temp(&self) -> bool {
        self.0.starts_with(Self::TEMP_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = PostId::new("a1b2c3");
        assert_eq!(id.as_str(), "a1b2c3");
        assert_eq!(format!("{}", id), "a1b2c3");
    }

    #[test]
    fn test_id_is_empty() {
        assert!(UserId::new("").is_empty());
        assert!(!UserId::new("u-1").is_empty());
    }

    #[test]
    fn test_temp_message_id() {
        let id = MessageId::temp(123);
        assert_eq!(id.as_str(), "temp-123");
        assert!(id.is_temp());
        assert!(!MessageId::new("m-9").is_temp());
    }
}
