use serde::{Deserialize, Serialize};

use storefront_core::CustomerId;

/// The shopper behind the current request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: CustomerId,
    pub user_name: Option<String>,
    pub is_registered: bool,
}

impl CurrentUser {
    pub fn registered(id: CustomerId, user_name: impl Into<String>) -> Self {
        Self {
            id,
            user_name: Some(user_name.into()),
            is_registered: true,
        }
    }

    /// Anonymous visitor with a throwaway id.
    pub fn anonymous() -> Self {
        Self {
            id: CustomerId::new(),
            user_name: None,
            is_registered: false,
        }
    }
}
