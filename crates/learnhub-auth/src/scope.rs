//! Role to scope mapping
//!
//! Roles are computed from the user record's admin flag at issuance and
//! check time; they are never persisted.

use learnhub_db::User;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

/// Scopes granted to regular users
const USER_SCOPES: &[&str] = &["profile:read", "materials:read"];

/// Scopes granted to admins (superset of the user scopes)
const ADMIN_SCOPES: &[&str] = &[
    "profile:read",
    "materials:read",
    "users:read",
    "users:write",
];

/// Compute the role for a user record
pub fn role_of(user: &User) -> Role {
    if user.is_admin { Role::Admin } else { Role::User }
}

/// The scope set granted to a role
pub fn scopes_of(role: Role) -> &'static [&'static str] {
    match role {
        Role::User => USER_SCOPES,
        Role::Admin => ADMIN_SCOPES,
    }
}
