use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier used for role-based view gating.
///
/// Roles are an open set of strings owned by the remote API; the constants
/// below are the ones the console's route table refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const ADMIN: Role = Role(Cow::Borrowed("Admin"));
    pub const CASHIER: Role = Role(Cow::Borrowed("Cashier"));
    pub const STOCK_CLERK: Role = Role(Cow::Borrowed("StockClerk"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_admin(&self) -> bool {
        *self == Self::ADMIN
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Role {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_comparison_is_case_sensitive() {
        assert!(Role::new("Admin").is_admin());
        assert!(!Role::new("admin").is_admin());
        assert_eq!(Role::new(String::from("Cashier")), Role::CASHIER);
    }

    #[test]
    fn roles_serialize_as_plain_strings() {
        let json = serde_json::to_string(&Role::STOCK_CLERK).unwrap();
        assert_eq!(json, "\"StockClerk\"");
        let back: Role = serde_json::from_str("\"Auditor\"").unwrap();
        assert_eq!(back.as_str(), "Auditor");
    }
}
