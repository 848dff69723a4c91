//! Authenticated principals and route classification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ambra_core::{AdminRole, Email, UserId};

/// A signed-in customer, persisted alongside its expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSession {
    pub uid: UserId,
    pub email: Email,
    pub display_name: String,
    pub expires_at: DateTime<Utc>,
}

/// A signed-in administrator, persisted alongside its expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    pub uid: UserId,
    pub email: Email,
    pub display_name: String,
    pub role: AdminRole,
    pub expires_at: DateTime<Utc>,
}

/// The authorization record in the `admins` collection.
///
/// A verified credential alone never grants admin access; this record must
/// exist (and be active) for the uid at login time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminRecord {
    pub email: Email,
    pub name: String,
    pub role: AdminRole,
    pub active: bool,
}

/// The customer profile document, auto-provisioned on first login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub email: Email,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

/// The authenticated actor. Exactly one variant is active at a time;
/// authenticating as one role clears any other.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Principal {
    #[default]
    Anonymous,
    Customer(CustomerSession),
    Admin(AdminSession),
}

impl Principal {
    /// Whether any authenticated variant is active.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        !matches!(self, Self::Anonymous)
    }

    /// The admin role, if the principal is an administrator.
    #[must_use]
    pub const fn admin_role(&self) -> Option<AdminRole> {
        match self {
            Self::Admin(session) => Some(session.role),
            _ => None,
        }
    }

    /// Session expiry of the active variant, if authenticated.
    #[must_use]
    pub const fn expires_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Anonymous => None,
            Self::Customer(session) => Some(session.expires_at),
            Self::Admin(session) => Some(session.expires_at),
        }
    }

    /// Whether the active session has expired at `now`. Anonymous never
    /// expires.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expires_at| expires_at <= now)
    }
}

/// Access classification of a navigable path.
///
/// Every path is exactly one of these; admin and super-admin paths gate
/// navigation on the active principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// No authentication needed; auth checks short-circuit here.
    Public,
    /// Requires an admin or super-admin principal.
    Admin,
    /// Requires the super-admin role.
    SuperAdminOnly,
}

impl RouteClass {
    /// Classify a path.
    #[must_use]
    pub fn classify(path: &str) -> Self {
        let path = path.trim_end_matches('/');
        if path == "/admin/team" || path.starts_with("/admin/team/") || path == "/admin/setup" {
            Self::SuperAdminOnly
        } else if path == "/admin" || path.starts_with("/admin/") {
            Self::Admin
        } else {
            Self::Public
        }
    }
}
