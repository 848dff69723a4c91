//! In-memory fakes for every external collaborator.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering as AtomicOrdering};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;

use ambra_core::{CurrencyCode, Email, UserId};
use ambra_storefront::local::{LocalStore, LocalStoreError};
use ambra_storefront::ports::auth::{AuthBackend, AuthBackendError, AuthUser};
use ambra_storefront::ports::documents::{Direction, DocumentError, Documents, Predicate, Query};
use ambra_storefront::ports::rates::{RateSource, RateSourceError};
use ambra_storefront::ports::storage::{ObjectStorage, StorageError};
use ambra_storefront::ports::ux::{Confirmer, Notifier, Severity};

// =============================================================================
// Documents
// =============================================================================

/// Map-backed document backend with query evaluation and an outage switch.
#[derive(Default)]
pub struct InMemoryDocuments {
    documents: Mutex<HashMap<(String, String), Value>>,
    unavailable: AtomicBool,
    query_calls: AtomicU32,
}

impl InMemoryDocuments {
    /// Insert a document directly, bypassing the port.
    pub fn seed(&self, collection: &str, id: &str, value: Value) {
        self.lock()
            .insert((collection.to_owned(), id.to_owned()), value);
    }

    /// Flip the outage switch; while set every call fails `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable
            .store(unavailable, AtomicOrdering::SeqCst);
    }

    /// Number of `query` calls served so far.
    #[must_use]
    pub fn query_call_count(&self) -> u32 {
        self.query_calls.load(AtomicOrdering::SeqCst)
    }

    /// Whether a document exists, bypassing the port.
    #[must_use]
    pub fn contains(&self, collection: &str, id: &str) -> bool {
        self.lock()
            .contains_key(&(collection.to_owned(), id.to_owned()))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(String, String), Value>> {
        self.documents.lock().expect("documents lock")
    }

    fn check_available(&self) -> Result<(), DocumentError> {
        if self.unavailable.load(AtomicOrdering::SeqCst) {
            Err(DocumentError::Unavailable("simulated outage".into()))
        } else {
            Ok(())
        }
    }
}

fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64().partial_cmp(&b.as_f64()),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn matches_predicate(document: &Value, field: &str, predicate: &Predicate) -> bool {
    let Some(actual) = document.get(field) else {
        return false;
    };
    match predicate {
        Predicate::Eq(expected) => actual == expected,
        Predicate::Gte(bound) => {
            matches!(compare_values(actual, bound), Some(Ordering::Greater | Ordering::Equal))
        }
        Predicate::Lte(bound) => {
            matches!(compare_values(actual, bound), Some(Ordering::Less | Ordering::Equal))
        }
    }
}

#[async_trait]
impl Documents for InMemoryDocuments {
    async fn get(&self, collection: &str, id: &str) -> Result<Value, DocumentError> {
        self.check_available()?;
        self.lock()
            .get(&(collection.to_owned(), id.to_owned()))
            .cloned()
            .ok_or_else(|| DocumentError::NotFound {
                collection: collection.to_owned(),
                id: id.to_owned(),
            })
    }

    async fn put(&self, collection: &str, id: &str, value: Value) -> Result<(), DocumentError> {
        self.check_available()?;
        self.lock()
            .insert((collection.to_owned(), id.to_owned()), value);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), DocumentError> {
        self.check_available()?;
        self.lock().remove(&(collection.to_owned(), id.to_owned()));
        Ok(())
    }

    async fn query(&self, collection: &str, query: Query) -> Result<Vec<Value>, DocumentError> {
        self.query_calls.fetch_add(1, AtomicOrdering::SeqCst);
        self.check_available()?;

        let mut results: Vec<Value> = self
            .lock()
            .iter()
            .filter(|((c, _), _)| c == collection)
            .map(|(_, value)| value.clone())
            .filter(|document| {
                query
                    .filters
                    .iter()
                    .all(|(field, predicate)| matches_predicate(document, field, predicate))
            })
            .collect();

        if let Some((field, direction)) = &query.order_by {
            results.sort_by(|a, b| {
                let ordering = match (a.get(field), b.get(field)) {
                    (Some(left), Some(right)) => {
                        compare_values(left, right).unwrap_or(Ordering::Equal)
                    }
                    _ => Ordering::Equal,
                };
                match direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit {
            results.truncate(limit);
        }
        Ok(results)
    }
}

// =============================================================================
// Auth
// =============================================================================

struct Account {
    password: String,
    user: AuthUser,
}

/// Auth provider fake with registered accounts, a controllable current
/// user and a revocation log.
#[derive(Default)]
pub struct FakeAuthBackend {
    accounts: Mutex<HashMap<String, Account>>,
    current: Mutex<Option<AuthUser>>,
    signed_out: Mutex<Vec<UserId>>,
    reset_requests: Mutex<Vec<Email>>,
    unavailable: AtomicBool,
}

impl FakeAuthBackend {
    /// Register an account and return its principal.
    pub fn register(&self, uid: &str, email: &str, password: &str) -> AuthUser {
        let user = AuthUser {
            uid: UserId::new(uid),
            email: Email::parse(email).expect("test email"),
            display_name: None,
        };
        self.accounts.lock().expect("accounts lock").insert(
            email.to_owned(),
            Account {
                password: password.to_owned(),
                user: user.clone(),
            },
        );
        user
    }

    /// Set the provider-side current user directly.
    pub fn set_current(&self, user: Option<AuthUser>) {
        *self.current.lock().expect("current lock") = user;
    }

    /// Flip the outage switch.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable
            .store(unavailable, AtomicOrdering::SeqCst);
    }

    /// Uids whose sessions were revoked, in order.
    #[must_use]
    pub fn signed_out_uids(&self) -> Vec<UserId> {
        self.signed_out.lock().expect("signed out lock").clone()
    }

    /// Emails that requested a password reset, in order.
    #[must_use]
    pub fn reset_requests(&self) -> Vec<Email> {
        self.reset_requests.lock().expect("resets lock").clone()
    }

    fn check_available(&self) -> Result<(), AuthBackendError> {
        if self.unavailable.load(AtomicOrdering::SeqCst) {
            Err(AuthBackendError::Unavailable("simulated outage".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AuthBackend for FakeAuthBackend {
    async fn sign_in(&self, email: &Email, password: &str) -> Result<AuthUser, AuthBackendError> {
        self.check_available()?;
        let accounts = self.accounts.lock().expect("accounts lock");
        let account = accounts
            .get(email.as_str())
            .ok_or(AuthBackendError::InvalidCredentials)?;
        if account.password != password {
            return Err(AuthBackendError::InvalidCredentials);
        }
        let user = account.user.clone();
        drop(accounts);
        *self.current.lock().expect("current lock") = Some(user.clone());
        Ok(user)
    }

    async fn sign_out(&self, uid: &UserId) -> Result<(), AuthBackendError> {
        self.signed_out
            .lock()
            .expect("signed out lock")
            .push(uid.clone());
        let mut current = self.current.lock().expect("current lock");
        if current.as_ref().is_some_and(|user| user.uid == *uid) {
            *current = None;
        }
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<AuthUser>, AuthBackendError> {
        self.check_available()?;
        Ok(self.current.lock().expect("current lock").clone())
    }

    async fn send_password_reset(&self, email: &Email) -> Result<(), AuthBackendError> {
        self.check_available()?;
        self.reset_requests
            .lock()
            .expect("resets lock")
            .push(email.clone());
        Ok(())
    }

    async fn update_display_name(
        &self,
        uid: &UserId,
        name: &str,
    ) -> Result<(), AuthBackendError> {
        self.check_available()?;
        let mut accounts = self.accounts.lock().expect("accounts lock");
        for account in accounts.values_mut() {
            if account.user.uid == *uid {
                account.user.display_name = Some(name.to_owned());
            }
        }
        Ok(())
    }
}

// =============================================================================
// Local store, rates, storage, UX
// =============================================================================

/// Map-backed [`LocalStore`].
#[derive(Default)]
pub struct MemoryLocalStore {
    entries: Mutex<HashMap<String, String>>,
}

impl LocalStore for MemoryLocalStore {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.lock().expect("entries lock").get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        self.entries
            .lock()
            .expect("entries lock")
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.lock().expect("entries lock").remove(key);
    }
}

/// Rate source fake with a fixed table, a call counter and an outage
/// switch.
#[derive(Default)]
pub struct StaticRateSource {
    rates: Mutex<HashMap<CurrencyCode, Decimal>>,
    calls: AtomicU32,
    unavailable: AtomicBool,
}

impl StaticRateSource {
    /// Replace the served table.
    pub fn set_rates(&self, pairs: &[(&str, &str)]) {
        let mut rates = self.rates.lock().expect("rates lock");
        rates.clear();
        for (code, rate) in pairs {
            rates.insert(
                CurrencyCode::parse(code).expect("test code"),
                rate.parse().expect("test rate"),
            );
        }
    }

    /// Flip the outage switch.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable
            .store(unavailable, AtomicOrdering::SeqCst);
    }

    /// Number of fetches served (or refused) so far.
    #[must_use]
    pub fn call_count(&self) -> u32 {
        self.calls.load(AtomicOrdering::SeqCst)
    }
}

#[async_trait]
impl RateSource for StaticRateSource {
    async fn fetch(
        &self,
        _base: &CurrencyCode,
    ) -> Result<HashMap<CurrencyCode, Decimal>, RateSourceError> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        if self.unavailable.load(AtomicOrdering::SeqCst) {
            return Err(RateSourceError::Unavailable("simulated outage".into()));
        }
        Ok(self.rates.lock().expect("rates lock").clone())
    }
}

/// One recorded upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRecord {
    pub path: String,
    pub content_type: String,
    pub byte_count: usize,
}

/// Object storage fake that records uploads and serves CDN-style URLs.
#[derive(Default)]
pub struct RecordingStorage {
    uploads: Mutex<Vec<UploadRecord>>,
}

impl RecordingStorage {
    /// Every upload so far, in order.
    #[must_use]
    pub fn uploads(&self) -> Vec<UploadRecord> {
        self.uploads.lock().expect("uploads lock").clone()
    }
}

#[async_trait]
impl ObjectStorage for RecordingStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.uploads.lock().expect("uploads lock").push(UploadRecord {
            path: path.to_owned(),
            content_type: content_type.to_owned(),
            byte_count: bytes.len(),
        });
        Ok(())
    }

    async fn download_url(&self, path: &str) -> Result<String, StorageError> {
        Ok(format!("https://cdn.ambra.test/{path}"))
    }
}

/// Confirmer with a settable answer.
pub struct AutoConfirmer {
    answer: AtomicBool,
}

impl AutoConfirmer {
    #[must_use]
    pub fn new(answer: bool) -> Self {
        Self {
            answer: AtomicBool::new(answer),
        }
    }

    /// Change the answer for subsequent prompts.
    pub fn set_answer(&self, answer: bool) {
        self.answer.store(answer, AtomicOrdering::SeqCst);
    }
}

impl Confirmer for AutoConfirmer {
    fn confirm(&self, _prompt: &str) -> bool {
        self.answer.load(AtomicOrdering::SeqCst)
    }
}

/// Notifier that records every message.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(Severity, String)>>,
}

impl RecordingNotifier {
    /// Every message so far, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<(Severity, String)> {
        self.messages.lock().expect("messages lock").clone()
    }

    /// Whether any message contains the substring.
    #[must_use]
    pub fn saw(&self, needle: &str) -> bool {
        self.messages
            .lock()
            .expect("messages lock")
            .iter()
            .any(|(_, message)| message.contains(needle))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        self.messages
            .lock()
            .expect("messages lock")
            .push((severity, message.to_owned()));
    }
}
