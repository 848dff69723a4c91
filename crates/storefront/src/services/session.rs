//! Auth session manager.
//!
//! Resolves the signed-in principal to exactly one of anonymous, customer
//! or admin. Credential verification is delegated to the auth provider;
//! role resolution happens against the document backend, and the admin
//! authorization record is always re-verified at login time — never
//! trusted from a cached positive.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};

use ambra_core::{Email, UserId};

use crate::error::{Result, StoreError};
use crate::local::{LocalStore, keys};
use crate::models::session::{
    AdminRecord, AdminSession, CustomerProfile, CustomerSession, Principal, RouteClass,
};
use crate::ports::auth::{AuthBackend, AuthUser};
use crate::ports::documents::{DocumentError, Documents};
use crate::ports::ux::{Notifier, Severity};

const ADMINS_COLLECTION: &str = "admins";
const CUSTOMERS_COLLECTION: &str = "customers";

/// Sessions live a day; a remembered customer login lives a month.
const SESSION_TTL: TimeDelta = TimeDelta::hours(24);
const REMEMBERED_TTL: TimeDelta = TimeDelta::days(30);

/// Credential failure, missing authorization record and network failure
/// all read the same to the user; logs carry the distinction.
const ACCESS_DENIED: &str = "Invalid credentials or access denied";
const USE_ADMIN_PORTAL: &str = "This account signs in through the admin portal";

/// Customer login input.
#[derive(Debug, Clone)]
pub struct CustomerCredentials {
    pub email: Email,
    pub password: String,
    /// Extends the session from 24 hours to 30 days.
    pub remember: bool,
}

/// Owns the active [`Principal`] and the persisted session snapshots.
pub struct SessionService {
    auth: Arc<dyn AuthBackend>,
    docs: Arc<dyn Documents>,
    local: Arc<dyn LocalStore>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<Principal>,
}

impl SessionService {
    /// Create the service in the anonymous state. Persisted sessions are
    /// picked up by [`Self::check_auth`].
    pub fn new(
        auth: Arc<dyn AuthBackend>,
        docs: Arc<dyn Documents>,
        local: Arc<dyn LocalStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            auth,
            docs,
            local,
            notifier,
            state: Mutex::new(Principal::Anonymous),
        }
    }

    /// The currently active principal.
    #[must_use]
    pub fn principal(&self) -> Principal {
        self.lock().clone()
    }

    /// Sign in to the admin console.
    ///
    /// After credential verification the uid must have an active record in
    /// the admins collection; without one the fresh auth session is
    /// revoked immediately and the login reads as access denied.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AccessDenied`] for every failure mode; the
    /// log distinguishes them.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn admin_login(&self, email: &Email, password: &str) -> Result<AdminSession> {
        let user = match self.auth.sign_in(email, password).await {
            Ok(user) => user,
            Err(err) => {
                warn!(error = %err, "admin credential verification failed");
                return Err(self.deny(ACCESS_DENIED));
            }
        };

        let record = match self.admin_record(&user.uid).await {
            Ok(Some(record)) if record.active => record,
            Ok(Some(_)) => {
                warn!(uid = %user.uid, "admin record is disabled");
                self.revoke(&user.uid).await;
                return Err(self.deny(ACCESS_DENIED));
            }
            Ok(None) => {
                warn!(uid = %user.uid, "no admin record for verified credentials");
                self.revoke(&user.uid).await;
                return Err(self.deny(ACCESS_DENIED));
            }
            Err(err) => {
                warn!(error = %err, "admin record lookup failed");
                self.revoke(&user.uid).await;
                return Err(self.deny(ACCESS_DENIED));
            }
        };

        let session = AdminSession {
            uid: user.uid,
            email: user.email,
            display_name: record.name,
            role: record.role,
            expires_at: Utc::now() + SESSION_TTL,
        };

        self.persist_snapshot(keys::ADMIN_SESSION, &session);
        self.local.remove(keys::CUSTOMER_SESSION);
        *self.lock() = Principal::Admin(session.clone());
        info!(role = %session.role, "admin signed in");
        Ok(session)
    }

    /// Sign in to the storefront.
    ///
    /// An account that carries an admin record is rejected with a distinct
    /// "use the admin portal" message; otherwise a customer profile is
    /// resolved, auto-provisioning a default document on first login.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AccessDenied`] for every failure mode.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn customer_login(
        &self,
        credentials: &CustomerCredentials,
    ) -> Result<CustomerSession> {
        let user = match self
            .auth
            .sign_in(&credentials.email, &credentials.password)
            .await
        {
            Ok(user) => user,
            Err(err) => {
                warn!(error = %err, "customer credential verification failed");
                return Err(self.deny(ACCESS_DENIED));
            }
        };

        // Cross-role login is rejected, not silently downgraded.
        match self.admin_record(&user.uid).await {
            Ok(Some(_)) => {
                warn!(uid = %user.uid, "admin account attempted storefront login");
                self.revoke(&user.uid).await;
                return Err(self.deny(USE_ADMIN_PORTAL));
            }
            Ok(None) => {}
            Err(err) => {
                warn!(error = %err, "admin record lookup failed during customer login");
                self.revoke(&user.uid).await;
                return Err(self.deny(ACCESS_DENIED));
            }
        }

        let profile = match self.customer_profile(&user).await {
            Ok(profile) => profile,
            Err(err) => {
                warn!(error = %err, "customer profile resolution failed");
                self.revoke(&user.uid).await;
                return Err(self.deny(ACCESS_DENIED));
            }
        };

        let ttl = if credentials.remember {
            REMEMBERED_TTL
        } else {
            SESSION_TTL
        };
        let session = CustomerSession {
            uid: user.uid,
            email: user.email,
            display_name: profile.display_name,
            expires_at: Utc::now() + ttl,
        };

        self.persist_snapshot(keys::CUSTOMER_SESSION, &session);
        self.local.remove(keys::ADMIN_SESSION);
        *self.lock() = Principal::Customer(session.clone());
        info!("customer signed in");
        Ok(session)
    }

    /// Resolve the principal for a navigation.
    ///
    /// Public routes short-circuit to anonymous without contacting the
    /// provider unless `force` is set. Otherwise the persisted session is
    /// consulted first (valid while unexpired), then the provider's
    /// current-user state, with the admin record taking precedence over
    /// the customer profile on ambiguity.
    ///
    /// # Errors
    ///
    /// Infallible today; the signature leaves room for callers that must
    /// distinguish hard failures.
    #[instrument(skip(self), fields(path = %path, force))]
    pub async fn check_auth(&self, path: &str, force: bool) -> Result<Principal> {
        if !force && RouteClass::classify(path) == RouteClass::Public {
            return Ok(Principal::Anonymous);
        }

        let now = Utc::now();
        if let Some(principal) = self.restore_persisted(now) {
            *self.lock() = principal.clone();
            return Ok(principal);
        }

        let principal = match self.auth.current_user().await {
            Ok(Some(user)) => self.resolve_roles(user).await,
            Ok(None) => Principal::Anonymous,
            Err(err) => {
                warn!(error = %err, "current-user lookup failed; treating as anonymous");
                Principal::Anonymous
            }
        };

        *self.lock() = principal.clone();
        Ok(principal)
    }

    /// Sign out and clear every persisted snapshot.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        let uid = match self.principal() {
            Principal::Admin(session) => Some(session.uid),
            Principal::Customer(session) => Some(session.uid),
            Principal::Anonymous => None,
        };
        if let Some(uid) = uid {
            self.revoke(&uid).await;
        }

        self.local.remove(keys::ADMIN_SESSION);
        self.local.remove(keys::CUSTOMER_SESSION);
        *self.lock() = Principal::Anonymous;
        self.notifier.notify(Severity::Info, "Signed out");
    }

    /// Ask the provider to email a password-reset link.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Transient`] when the provider is unreachable.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn request_password_reset(&self, email: &Email) -> Result<()> {
        if let Err(err) = self.auth.send_password_reset(email).await {
            warn!(error = %err, "password reset request failed");
            self.notifier
                .notify(Severity::Error, "Could not send the reset email");
            return Err(StoreError::Transient(err.to_string()));
        }
        self.notifier
            .notify(Severity::Success, "Password reset email sent");
        Ok(())
    }

    /// Update the signed-in principal's display name, mirroring it to the
    /// provider profile, the customer document and the persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AccessDenied`] when anonymous and
    /// [`StoreError::Transient`] when a remote write fails; in-memory
    /// state is left unchanged so the user can retry.
    #[instrument(skip(self))]
    pub async fn update_display_name(&self, name: &str) -> Result<()> {
        let principal = self.principal();
        let uid = match &principal {
            Principal::Anonymous => {
                return Err(StoreError::AccessDenied(
                    "sign in to update your profile".into(),
                ));
            }
            Principal::Customer(session) => session.uid.clone(),
            Principal::Admin(session) => session.uid.clone(),
        };

        self.auth.update_display_name(&uid, name).await?;

        match principal {
            Principal::Customer(mut session) => {
                // Keep the profile document in step with the provider.
                if let Ok(raw) = self.docs.get(CUSTOMERS_COLLECTION, uid.as_str()).await
                    && let Ok(mut profile) = serde_json::from_value::<CustomerProfile>(raw)
                {
                    profile.display_name = name.to_owned();
                    self.docs
                        .put(
                            CUSTOMERS_COLLECTION,
                            uid.as_str(),
                            serde_json::to_value(&profile)
                                .map_err(|err| StoreError::Validation(err.to_string()))?,
                        )
                        .await?;
                }
                session.display_name = name.to_owned();
                self.persist_snapshot(keys::CUSTOMER_SESSION, &session);
                *self.lock() = Principal::Customer(session);
            }
            Principal::Admin(mut session) => {
                session.display_name = name.to_owned();
                self.persist_snapshot(keys::ADMIN_SESSION, &session);
                *self.lock() = Principal::Admin(session);
            }
            Principal::Anonymous => unreachable!("rejected above"),
        }

        self.notifier.notify(Severity::Success, "Profile updated");
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Map any login failure to the uniform user-visible denial.
    fn deny(&self, message: &str) -> StoreError {
        self.notifier.notify(Severity::Error, message);
        StoreError::AccessDenied(message.to_owned())
    }

    /// Compensating action: revoke the provider session we just opened.
    async fn revoke(&self, uid: &UserId) {
        if let Err(err) = self.auth.sign_out(uid).await {
            warn!(error = %err, "failed to revoke auth session");
        }
    }

    async fn admin_record(
        &self,
        uid: &UserId,
    ) -> std::result::Result<Option<AdminRecord>, DocumentError> {
        match self.docs.get(ADMINS_COLLECTION, uid.as_str()).await {
            Ok(raw) => match serde_json::from_value(raw) {
                Ok(record) => Ok(Some(record)),
                Err(err) => {
                    warn!(error = %err, "malformed admin record; denying");
                    Ok(None)
                }
            },
            Err(DocumentError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Resolve or provision the customer profile document.
    async fn customer_profile(&self, user: &AuthUser) -> Result<CustomerProfile> {
        match self.docs.get(CUSTOMERS_COLLECTION, user.uid.as_str()).await {
            Ok(raw) => match serde_json::from_value(raw) {
                Ok(profile) => Ok(profile),
                Err(err) => {
                    warn!(error = %err, "malformed customer profile; re-provisioning");
                    self.provision_profile(user).await
                }
            },
            Err(DocumentError::NotFound { .. }) => self.provision_profile(user).await,
            Err(err) => Err(err.into()),
        }
    }

    async fn provision_profile(&self, user: &AuthUser) -> Result<CustomerProfile> {
        let profile = CustomerProfile {
            email: user.email.clone(),
            display_name: user
                .display_name
                .clone()
                .unwrap_or_else(|| user.email.local_part().to_owned()),
            created_at: Utc::now(),
        };
        self.docs
            .put(
                CUSTOMERS_COLLECTION,
                user.uid.as_str(),
                serde_json::to_value(&profile)
                    .map_err(|err| StoreError::Validation(err.to_string()))?,
            )
            .await?;
        Ok(profile)
    }

    /// Build a principal from the provider's current user, admin record
    /// first.
    async fn resolve_roles(&self, user: AuthUser) -> Principal {
        match self.admin_record(&user.uid).await {
            Ok(Some(record)) if record.active => {
                let session = AdminSession {
                    uid: user.uid,
                    email: user.email,
                    display_name: record.name,
                    role: record.role,
                    expires_at: Utc::now() + SESSION_TTL,
                };
                self.persist_snapshot(keys::ADMIN_SESSION, &session);
                return Principal::Admin(session);
            }
            Ok(_) => {}
            Err(err) => {
                // Elevated access is never granted on an unverifiable record.
                warn!(error = %err, "admin record lookup failed; resolving as customer");
            }
        }

        let display_name = match self.docs.get(CUSTOMERS_COLLECTION, user.uid.as_str()).await {
            Ok(raw) => serde_json::from_value::<CustomerProfile>(raw)
                .map(|profile| profile.display_name)
                .ok(),
            Err(_) => None,
        };

        let session = CustomerSession {
            uid: user.uid,
            email: user.email.clone(),
            display_name: display_name
                .or(user.display_name)
                .unwrap_or_else(|| user.email.local_part().to_owned()),
            expires_at: Utc::now() + SESSION_TTL,
        };
        self.persist_snapshot(keys::CUSTOMER_SESSION, &session);
        Principal::Customer(session)
    }

    /// Restore an unexpired persisted session, admin first. Expired or
    /// unreadable snapshots are removed.
    fn restore_persisted(&self, now: DateTime<Utc>) -> Option<Principal> {
        if let Some(raw) = self.local.read(keys::ADMIN_SESSION) {
            match serde_json::from_str::<AdminSession>(&raw) {
                Ok(session) if session.expires_at > now => {
                    return Some(Principal::Admin(session));
                }
                Ok(_) => self.local.remove(keys::ADMIN_SESSION),
                Err(err) => {
                    warn!(error = %err, "discarding unreadable admin session");
                    self.local.remove(keys::ADMIN_SESSION);
                }
            }
        }

        if let Some(raw) = self.local.read(keys::CUSTOMER_SESSION) {
            match serde_json::from_str::<CustomerSession>(&raw) {
                Ok(session) if session.expires_at > now => {
                    return Some(Principal::Customer(session));
                }
                Ok(_) => self.local.remove(keys::CUSTOMER_SESSION),
                Err(err) => {
                    warn!(error = %err, "discarding unreadable customer session");
                    self.local.remove(keys::CUSTOMER_SESSION);
                }
            }
        }

        None
    }

    fn persist_snapshot<T: Serialize>(&self, key: &str, session: &T) {
        match serde_json::to_string(session) {
            Ok(raw) => {
                if let Err(err) = self.local.write(key, &raw) {
                    warn!(error = %err, "failed to persist session snapshot");
                }
            }
            Err(err) => warn!(error = %err, "failed to serialize session snapshot"),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Principal> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
