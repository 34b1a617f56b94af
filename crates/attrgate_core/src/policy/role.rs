//! Caller roles recognised by the attribute policy.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Token that selects [`Role::Admin`].
pub const ADMIN_ROLE_TOKEN: &str = "admin";

/// Caller privilege tier.
///
/// Deserializing any string other than `"admin"` (or `null`) yields
/// `Role::Default`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "&'static str")]
pub enum Role {
    /// Anonymous or ordinary caller.
    #[default]
    Default,
    Admin,
}

impl Role {
    /// Maps a caller-supplied role token to a role.
    ///
    /// The token must equal `"admin"` exactly. Absent, padded and unrecognised
    /// tokens all map to `Role::Default`.
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some(ADMIN_ROLE_TOKEN) => Self::Admin,
            _ => Self::Default,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Admin => ADMIN_ROLE_TOKEN,
        }
    }
}

impl From<Option<String>> for Role {
    fn from(value: Option<String>) -> Self {
        Self::from_token(value.as_deref())
    }
}

impl From<Role> for &'static str {
    fn from(value: Role) -> Self {
        value.as_str()
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::Role;
    use crate::policy::attribute_policy::{is_permitted, AttributeOperation, ONLY_ADMIN};

    #[test]
    fn only_the_admin_token_selects_admin() {
        assert_eq!(Role::from_token(Some("admin")), Role::Admin);
        assert_eq!(Role::from_token(Some(" admin ")), Role::Default);
        assert_eq!(Role::from_token(None), Role::Default);
        assert_eq!(Role::from_token(Some("")), Role::Default);
        assert_eq!(Role::from_token(Some("Admin")), Role::Default);
        assert_eq!(Role::from_token(Some("superuser")), Role::Default);
    }

    #[test]
    fn padded_admin_token_gets_default_rules() {
        for token in [" admin", "admin ", " admin\n", "\tadmin"] {
            let role = Role::from_token(Some(token));
            assert_eq!(role, Role::Default, "token {token:?}");
            assert!(!is_permitted(ONLY_ADMIN, AttributeOperation::Search, role));
        }
        let role: Role = serde_json::from_str("\" admin\\n\"").unwrap();
        assert_eq!(role, Role::Default);
    }

    #[test]
    fn unknown_role_strings_deserialize_to_default() {
        let role: Role = serde_json::from_str("\"root\"").unwrap();
        assert_eq!(role, Role::Default);
        let role: Role = serde_json::from_str("null").unwrap();
        assert_eq!(role, Role::Default);
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }
}
