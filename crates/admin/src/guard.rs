//! Access guards for console routes.
//!
//! Pure decisions: given a route's class and the active principal, either
//! allow the navigation or redirect to the login view carrying the
//! originally requested path and a machine-readable reason code.

use chrono::{DateTime, Utc};

use ambra_core::AdminRole;
use ambra_storefront::models::session::{Principal, RouteClass};

/// Where under-privileged admin navigation is redirected.
pub const LOGIN_PATH: &str = "/admin/login";

/// Machine-readable denial reason, carried on the redirect for analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonCode {
    NotAuthenticated,
    SessionExpired,
    InsufficientRole,
}

impl ReasonCode {
    /// The wire form used in the redirect query string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotAuthenticated => "not_authenticated",
            Self::SessionExpired => "session_expired",
            Self::InsufficientRole => "insufficient_role",
        }
    }
}

/// Outcome of an access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Proceed with the navigation.
    Allow,
    /// Send the user to the login view.
    Redirect {
        /// Login path to navigate to.
        to: String,
        /// The originally requested path, echoed back after login.
        from: String,
        reason: ReasonCode,
    },
}

impl AccessDecision {
    fn redirect(from: &str, reason: ReasonCode) -> Self {
        Self::Redirect {
            to: LOGIN_PATH.to_owned(),
            from: from.to_owned(),
            reason,
        }
    }

    /// The full redirect URL, with the requested path and reason encoded
    /// as query parameters. `None` for [`AccessDecision::Allow`].
    #[must_use]
    pub fn redirect_url(&self) -> Option<String> {
        match self {
            Self::Allow => None,
            Self::Redirect { to, from, reason } => Some(format!(
                "{to}?from={}&reason={}",
                urlencoding::encode(from),
                reason.as_str()
            )),
        }
    }
}

/// Decide whether `principal` may navigate to `path` at `now`.
///
/// Public routes always pass. Admin routes need an unexpired admin
/// session; super-admin-only routes additionally need the super-admin
/// role. A customer principal on an admin route reads as insufficient
/// role, not as unauthenticated.
#[must_use]
pub fn check(path: &str, principal: &Principal, now: DateTime<Utc>) -> AccessDecision {
    let route = RouteClass::classify(path);
    if route == RouteClass::Public {
        return AccessDecision::Allow;
    }

    let Some(role) = principal.admin_role() else {
        let reason = if principal.is_authenticated() {
            ReasonCode::InsufficientRole
        } else {
            ReasonCode::NotAuthenticated
        };
        return AccessDecision::redirect(path, reason);
    };

    if principal.is_expired(now) {
        return AccessDecision::redirect(path, ReasonCode::SessionExpired);
    }

    match route {
        RouteClass::SuperAdminOnly if role != AdminRole::SuperAdmin => {
            AccessDecision::redirect(path, ReasonCode::InsufficientRole)
        }
        _ => AccessDecision::Allow,
    }
}
