use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

/// Role carried in the `role` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roles allowed through one protected route group.
///
/// An empty policy admits any authenticated role. Order is kept as given so the
/// rejection message lists roles the way the route declared them.
#[derive(Debug, Clone, Default)]
pub struct RolePolicy {
    allowed: Arc<[Role]>,
}

impl RolePolicy {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed: roles.into_iter().collect(),
        }
    }

    pub fn permits(&self, role: Role) -> bool {
        self.allowed.is_empty() || self.allowed.contains(&role)
    }

    /// `'admin' or 'super_admin'`
    pub fn describe(&self) -> String {
        self.allowed
            .iter()
            .map(|role| format!("'{role}'"))
            .collect::<Vec<_>>()
            .join(" or ")
    }
}
