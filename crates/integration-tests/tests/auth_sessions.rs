//! Auth session scenarios: role exclusivity, cross-role rejection and
//! the compensating revocation when authorization records are missing.

use ambra_core::{AdminRole, Email, UserId};
use ambra_integration_tests::TestContext;
use ambra_integration_tests::fixtures::{admin_record_doc, customer_profile_doc};
use ambra_storefront::error::StoreError;
use ambra_storefront::models::session::Principal;
use ambra_storefront::services::CustomerCredentials;

fn email(address: &str) -> Email {
    Email::parse(address).expect("test email")
}

#[tokio::test]
async fn test_admin_login_requires_authorization_record() {
    let ctx = TestContext::new();
    ctx.auth.register("uid-1", "layla@example.com", "hunter2xyz");
    // No admins document for uid-1.

    let sessions = ctx.sessions();
    let result = sessions
        .admin_login(&email("layla@example.com"), "hunter2xyz")
        .await;

    assert!(matches!(result, Err(StoreError::AccessDenied(_))));
    // The freshly opened provider session was revoked, not just reported.
    assert_eq!(ctx.auth.signed_out_uids(), vec![UserId::new("uid-1")]);
    assert_eq!(sessions.principal(), Principal::Anonymous);
}

#[tokio::test]
async fn test_admin_login_with_record_resolves_role() {
    let ctx = TestContext::new();
    ctx.auth.register("uid-1", "noor@ambra-maison.com", "s3cretpass");
    ctx.docs.seed(
        "admins",
        "uid-1",
        admin_record_doc("noor@ambra-maison.com", "Noor", "super_admin", true),
    );

    let sessions = ctx.sessions();
    let session = sessions
        .admin_login(&email("noor@ambra-maison.com"), "s3cretpass")
        .await
        .expect("login succeeds");

    assert_eq!(session.role, AdminRole::SuperAdmin);
    assert_eq!(session.display_name, "Noor");

    // Expiry is fixed at 24 hours from login.
    let ttl = session.expires_at - chrono::Utc::now();
    assert!(ttl > chrono::TimeDelta::hours(23));
    assert!(ttl <= chrono::TimeDelta::hours(24));

    // Exactly one principal kind is active.
    let principal = sessions.principal();
    assert_eq!(principal.admin_role(), Some(AdminRole::SuperAdmin));
    assert!(principal.is_authenticated());
}

#[tokio::test]
async fn test_disabled_admin_record_is_denied_and_revoked() {
    let ctx = TestContext::new();
    ctx.auth.register("uid-1", "noor@ambra-maison.com", "s3cretpass");
    ctx.docs.seed(
        "admins",
        "uid-1",
        admin_record_doc("noor@ambra-maison.com", "Noor", "admin", false),
    );

    let sessions = ctx.sessions();
    let result = sessions
        .admin_login(&email("noor@ambra-maison.com"), "s3cretpass")
        .await;

    assert!(matches!(result, Err(StoreError::AccessDenied(_))));
    assert_eq!(ctx.auth.signed_out_uids(), vec![UserId::new("uid-1")]);
}

#[tokio::test]
async fn test_customer_login_with_admin_record_is_rejected() {
    let ctx = TestContext::new();
    ctx.auth.register("uid-1", "noor@ambra-maison.com", "s3cretpass");
    ctx.docs.seed(
        "admins",
        "uid-1",
        admin_record_doc("noor@ambra-maison.com", "Noor", "admin", true),
    );

    let sessions = ctx.sessions();
    let result = sessions
        .customer_login(&CustomerCredentials {
            email: email("noor@ambra-maison.com"),
            password: "s3cretpass".into(),
            remember: false,
        })
        .await;

    // Distinct "use the admin portal" class, and no principal of either
    // kind is set afterward.
    match result {
        Err(StoreError::AccessDenied(message)) => {
            assert!(message.contains("admin portal"), "got: {message}");
        }
        other => panic!("expected access denied, got {other:?}"),
    }
    assert_eq!(sessions.principal(), Principal::Anonymous);
    assert_eq!(ctx.auth.signed_out_uids(), vec![UserId::new("uid-1")]);
}

#[tokio::test]
async fn test_customer_login_provisions_profile() {
    let ctx = TestContext::new();
    ctx.auth.register("uid-7", "layla@example.com", "hunter2xyz");

    let sessions = ctx.sessions();
    let session = sessions
        .customer_login(&CustomerCredentials {
            email: email("layla@example.com"),
            password: "hunter2xyz".into(),
            remember: false,
        })
        .await
        .expect("login succeeds");

    // Default profile derives the display name from the email local part.
    assert_eq!(session.display_name, "layla");
    assert!(ctx.docs.contains("customers", "uid-7"));
}

#[tokio::test]
async fn test_remember_flag_extends_expiry() {
    let ctx = TestContext::new();
    ctx.auth.register("uid-7", "layla@example.com", "hunter2xyz");
    ctx.docs
        .seed("customers", "uid-7", customer_profile_doc("layla@example.com", "Layla"));

    let sessions = ctx.sessions();
    let session = sessions
        .customer_login(&CustomerCredentials {
            email: email("layla@example.com"),
            password: "hunter2xyz".into(),
            remember: true,
        })
        .await
        .expect("login succeeds");

    let ttl = session.expires_at - chrono::Utc::now();
    assert!(ttl > chrono::TimeDelta::days(29));
    assert!(ttl <= chrono::TimeDelta::days(30));
}

#[tokio::test]
async fn test_role_exclusivity_when_switching_accounts() {
    let ctx = TestContext::new();
    ctx.auth.register("uid-1", "noor@ambra-maison.com", "s3cretpass");
    ctx.auth.register("uid-7", "layla@example.com", "hunter2xyz");
    ctx.docs.seed(
        "admins",
        "uid-1",
        admin_record_doc("noor@ambra-maison.com", "Noor", "admin", true),
    );

    let sessions = ctx.sessions();
    sessions
        .admin_login(&email("noor@ambra-maison.com"), "s3cretpass")
        .await
        .expect("admin login");
    assert!(sessions.principal().admin_role().is_some());

    // A customer login replaces the admin principal entirely.
    sessions
        .customer_login(&CustomerCredentials {
            email: email("layla@example.com"),
            password: "hunter2xyz".into(),
            remember: false,
        })
        .await
        .expect("customer login");

    let principal = sessions.principal();
    assert!(principal.is_authenticated());
    assert_eq!(principal.admin_role(), None);

    // The persisted admin snapshot is gone too: a fresh session restores
    // the customer, not the admin.
    let resumed = ctx.sessions();
    let restored = resumed.check_auth("/admin", false).await.expect("check");
    assert!(matches!(restored, Principal::Customer(_)));
}

#[tokio::test]
async fn test_wrong_password_is_denied_without_revocation() {
    let ctx = TestContext::new();
    ctx.auth.register("uid-7", "layla@example.com", "hunter2xyz");

    let sessions = ctx.sessions();
    let result = sessions
        .customer_login(&CustomerCredentials {
            email: email("layla@example.com"),
            password: "wrong".into(),
            remember: false,
        })
        .await;

    assert!(matches!(result, Err(StoreError::AccessDenied(_))));
    // Nothing to revoke: sign-in never succeeded.
    assert!(ctx.auth.signed_out_uids().is_empty());
}

#[tokio::test]
async fn test_logout_clears_principal_and_snapshots() {
    let ctx = TestContext::new();
    ctx.auth.register("uid-7", "layla@example.com", "hunter2xyz");

    let sessions = ctx.sessions();
    sessions
        .customer_login(&CustomerCredentials {
            email: email("layla@example.com"),
            password: "hunter2xyz".into(),
            remember: false,
        })
        .await
        .expect("login");

    sessions.logout().await;
    assert_eq!(sessions.principal(), Principal::Anonymous);

    // No snapshot left for a later session to restore.
    let resumed = ctx.sessions();
    let restored = resumed.check_auth("/admin", false).await.expect("check");
    assert_eq!(restored, Principal::Anonymous);
}

#[tokio::test]
async fn test_password_reset_request_reaches_provider() {
    let ctx = TestContext::new();
    let sessions = ctx.sessions();

    sessions
        .request_password_reset(&email("layla@example.com"))
        .await
        .expect("reset request");

    assert_eq!(ctx.auth.reset_requests(), vec![email("layla@example.com")]);
}
