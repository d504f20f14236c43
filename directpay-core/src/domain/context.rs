//! Request context
//!
//! The identity of the caller, resolved once per request by the server and
//! passed explicitly to every service call.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub user_id: i64,
    pub username: String,
    pub is_superuser: bool,
}

impl RequestContext {
    /// Owner-or-superuser check guarding every charge mutation
    pub fn can_manage(&self, owner_id: i64) -> bool {
        self.user_id == owner_id || self.is_superuser
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(user_id: i64, is_superuser: bool) -> RequestContext {
        RequestContext {
            user_id,
            username: format!("user{}", user_id),
            is_superuser,
        }
    }

    #[test]
    fn test_owner_can_manage() {
        assert!(ctx(7, false).can_manage(7));
    }

    #[test]
    fn test_stranger_cannot_manage() {
        assert!(!ctx(7, false).can_manage(8));
    }

    #[test]
    fn test_superuser_can_manage_anything() {
        assert!(ctx(1, true).can_manage(8));
        assert!(ctx(1, true).can_manage(1));
    }
}
