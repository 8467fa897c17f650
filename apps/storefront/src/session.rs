//! # Session
//!
//! The signed-in user, passed explicitly to every cart and checkout call.
//!
//! Authentication itself happens elsewhere; the storefront only needs to
//! know who the user is, or that there is nobody.

use serde::{Deserialize, Serialize};

use thali_core::ValidationError;

use crate::error::{ApiError, ApiResult};

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    user_id: String,
}

impl Session {
    /// Creates a session for a user id; a blank id is a validation error.
    pub fn new(user_id: impl Into<String>) -> ApiResult<Self> {
        let user_id = user_id.into().trim().to_string();
        if user_id.is_empty() {
            return Err(ValidationError::Required {
                field: "user_id".to_string(),
            }
            .into());
        }
        Ok(Session { user_id })
    }

    /// The authenticated user's id.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// Returns the session, or `Unauthenticated` ("Please login") when there is none.
pub fn require(session: Option<&Session>) -> ApiResult<&Session> {
    session.ok_or_else(ApiError::unauthenticated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_session() {
        let session = Session::new(" user-1 ").unwrap();
        assert_eq!(session.user_id(), "user-1");
        assert_eq!(require(Some(&session)).unwrap().user_id(), "user-1");
    }

    #[test]
    fn test_missing_session() {
        let err = require(None).unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
        assert_eq!(err.message, "Please login");
    }

    #[test]
    fn test_blank_user_id_says_why() {
        let err = Session::new("  ").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("user_id"));
    }
}
