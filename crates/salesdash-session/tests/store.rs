//! Integration tests for `SessionStore` actions using wiremock HTTP mocks.
//!
//! Every test builds its own store over a fresh `MemoryStorage` and a local
//! mock server, so no real network traffic is made and no state leaks
//! between tests.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use salesdash_core::{SalesSource, StoreInfo, UserInfo, UserProfile};
use salesdash_session::storage::{ACCESS_TOKEN_KEY, LOGIN_EMAIL_KEY, USER_INFO_KEY};
use salesdash_session::{
    ClientCredentials, DashboardClient, KeyValueStore, MemoryStorage, Session, SessionError,
    SessionStore, StorageError,
};

fn test_client(base_url: &str) -> DashboardClient {
    let credentials = ClientCredentials {
        client_id: "C0001".to_owned(),
        client_secret: "SECRET0001".to_owned(),
        redirect_uri: "https://api.eva.guru".to_owned(),
        scope: "amazon_data".to_owned(),
    };
    DashboardClient::with_base_url(base_url, 5, "salesdash-test/0.1", credentials)
        .expect("failed to build test DashboardClient")
}

fn test_store(base_url: &str, source: SalesSource) -> (SessionStore, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let store = SessionStore::new(test_client(base_url), storage.clone(), source);
    (store, storage)
}

fn token_response() -> serde_json::Value {
    json!({
        "ApiStatus": true,
        "Data": {
            "AccessToken": "test-access-token",
            "RefreshToken": "test-refresh-token",
            "TokenType": "Bearer",
            "ExpiresAt": "2025-12-31T23:59:59Z"
        }
    })
}

fn user_info_response() -> serde_json::Value {
    json!({
        "ApiStatus": true,
        "Data": {
            "user": {
                "userId": "123",
                "email": "test@example.com",
                "firstName": "Test",
                "lastName": "User",
                "accountStatus": 1,
                "store": [
                    { "storeId": "store-123", "marketplaceName": "Amazon US", "currency": "USD" }
                ]
            }
        }
    })
}

fn user_with_store() -> UserInfo {
    UserInfo {
        user: UserProfile {
            id: "123".to_owned(),
            email: "test@example.com".to_owned(),
            name: None,
            currency: None,
            membership_status: None,
            store: Some(StoreInfo {
                store_id: "store-123".to_owned(),
                marketplace_name: "Amazon US".to_owned(),
            }),
        },
    }
}

// ---------------------------------------------------------------------------
// login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_sets_token_email_and_profile() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_json(json!({
            "Email": "test@example.com",
            "Password": "password123",
            "GrantType": "password",
            "Scope": "amazon_data",
            "ClientId": "C0001",
            "ClientSecret": "SECRET0001",
            "RedirectUri": "https://api.eva.guru"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/user/user-information"))
        .and(header("authorization", "Bearer test-access-token"))
        .and(body_json(json!({ "email": "test@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_info_response()))
        .expect(1)
        .mount(&server)
        .await;

    let (store, storage) = test_store(&server.uri(), SalesSource::Fixture);
    let result = store.login("test@example.com", "password123").await;
    assert!(result.is_ok(), "expected Ok, got: {result:?}");

    let session = store.snapshot();
    assert_eq!(session.access_token.as_deref(), Some("test-access-token"));
    assert_eq!(session.login_email.as_deref(), Some("test@example.com"));
    assert!(!session.is_loading);
    assert!(session.error.is_none());
    let user = session.user_info.expect("profile should be loaded").user;
    assert_eq!(user.email, "test@example.com");
    assert_eq!(user.name.as_deref(), Some("Test User"));

    assert_eq!(
        storage.get(ACCESS_TOKEN_KEY).as_deref(),
        Some("test-access-token")
    );
    assert_eq!(
        storage.get(LOGIN_EMAIL_KEY).as_deref(),
        Some("test@example.com")
    );
    assert!(storage.get(USER_INFO_KEY).is_some());
}

#[tokio::test]
async fn login_failure_records_error_and_rejects() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/user/user-information"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_info_response()))
        .expect(0)
        .mount(&server)
        .await;

    let (store, storage) = test_store(&server.uri(), SalesSource::Fixture);
    let result = store.login("test@example.com", "wrong-password").await;

    assert!(
        matches!(result, Err(SessionError::Authentication(ref m)) if m == "Login failed"),
        "expected Authentication(Login failed), got: {result:?}"
    );
    let session = store.snapshot();
    assert!(session.access_token.is_none());
    assert_eq!(session.error.as_deref(), Some("Login failed"));
    assert!(!session.is_loading);
    assert!(storage.get(ACCESS_TOKEN_KEY).is_none());
}

#[tokio::test]
async fn login_rejects_application_level_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "ApiStatus": false, "ApiStatusMessage": "bad" })),
        )
        .mount(&server)
        .await;

    let (store, _storage) = test_store(&server.uri(), SalesSource::Fixture);
    let result = store.login("test@example.com", "password123").await;

    assert!(matches!(result, Err(SessionError::Authentication(_))));
    assert_eq!(store.snapshot().error.as_deref(), Some("Login failed"));
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn login_clears_previous_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/user/user-information"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_info_response()))
        .mount(&server)
        .await;

    let (store, _storage) = test_store(&server.uri(), SalesSource::Fixture);
    store.set_error(Some("stale".to_owned()));
    store.login("test@example.com", "password123").await.unwrap();

    assert!(store.snapshot().error.is_none());
}

#[tokio::test]
async fn login_survives_profile_fetch_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response()))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/user/user-information"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let (store, _storage) = test_store(&server.uri(), SalesSource::Fixture);
    let result = store.login("test@example.com", "password123").await;
    assert!(result.is_ok(), "profile failure must not fail login: {result:?}");

    let session = store.snapshot();
    assert!(session.is_authenticated());
    assert_eq!(session.login_email.as_deref(), Some("test@example.com"));
    assert!(session.user_info.is_none());
    assert!(!session.is_loading);
    assert_eq!(
        session.error.as_deref(),
        Some("Failed to fetch user information")
    );
}

#[tokio::test]
async fn overlapping_logins_both_complete() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response()))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/user/user-information"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_info_response()))
        .expect(2)
        .mount(&server)
        .await;

    let (store, _storage) = test_store(&server.uri(), SalesSource::Fixture);
    let (a, b) = tokio::join!(
        store.login("test@example.com", "password123"),
        store.login("test@example.com", "password123"),
    );
    assert!(a.is_ok() && b.is_ok());

    let session = store.snapshot();
    assert!(session.is_authenticated());
    assert!(!session.is_loading);
}

// ---------------------------------------------------------------------------
// fetch_user_information
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_user_information_is_noop_without_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/user-information"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_info_response()))
        .expect(0)
        .mount(&server)
        .await;

    let (store, _storage) = test_store(&server.uri(), SalesSource::Fixture);
    store.fetch_user_information().await.unwrap();

    store.set_access_token(Some("test-token".to_owned()));
    store.fetch_user_information().await.unwrap();

    store.set_access_token(None);
    store.set_login_email(Some("test@example.com".to_owned()));
    store.fetch_user_information().await.unwrap();

    assert!(store.snapshot().user_info.is_none());
}

#[tokio::test]
async fn fetch_user_information_normalizes_profile() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/user-information"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Data": {
                "user": {
                    "userId": "123",
                    "email": "a@b.com",
                    "store": [{ "storeId": "s1", "marketplaceName": "Amazon US" }]
                }
            }
        })))
        .mount(&server)
        .await;

    let (store, _storage) = test_store(&server.uri(), SalesSource::Fixture);
    store.set_access_token(Some("test-token".to_owned()));
    store.set_login_email(Some("a@b.com".to_owned()));
    store.fetch_user_information().await.unwrap();

    let user = store.snapshot().user_info.unwrap().user;
    assert_eq!(
        user,
        UserProfile {
            id: "123".to_owned(),
            email: "a@b.com".to_owned(),
            name: None,
            currency: None,
            membership_status: None,
            store: Some(StoreInfo {
                store_id: "s1".to_owned(),
                marketplace_name: "Amazon US".to_owned(),
            }),
        }
    );
}

#[tokio::test]
async fn fetch_user_information_passes_server_message_through() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/user-information"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "ApiStatusMessage": "User not found" })),
        )
        .mount(&server)
        .await;

    let (store, _storage) = test_store(&server.uri(), SalesSource::Fixture);
    store.set_access_token(Some("test-token".to_owned()));
    store.set_login_email(Some("test@example.com".to_owned()));
    let result = store.fetch_user_information().await;

    assert!(
        matches!(result, Err(SessionError::ProfileFetch(ref m)) if m == "User not found"),
        "expected ProfileFetch(User not found), got: {result:?}"
    );
    assert_eq!(store.snapshot().error.as_deref(), Some("User not found"));
}

#[tokio::test]
async fn fetch_user_information_flags_failure_with_default_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/user-information"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ApiStatus": false })))
        .mount(&server)
        .await;

    let (store, _storage) = test_store(&server.uri(), SalesSource::Fixture);
    store.set_access_token(Some("test-token".to_owned()));
    store.set_login_email(Some("test@example.com".to_owned()));
    let result = store.fetch_user_information().await;

    assert!(matches!(result, Err(SessionError::ProfileFetch(_))));
    assert_eq!(
        store.snapshot().error.as_deref(),
        Some("Failed to fetch user information")
    );
}

// ---------------------------------------------------------------------------
// logout
// ---------------------------------------------------------------------------

fn sign_in(store: &SessionStore) {
    store.set_access_token(Some("test-token".to_owned()));
    store.set_user_info(Some(user_with_store()));
    store.set_login_email(Some("test@example.com".to_owned()));
}

fn assert_signed_out(store: &SessionStore, storage: &MemoryStorage) {
    let session = store.snapshot();
    assert!(session.access_token.is_none());
    assert!(session.user_info.is_none());
    assert!(session.login_email.is_none());
    assert!(storage.get(ACCESS_TOKEN_KEY).is_none());
    assert!(storage.get(USER_INFO_KEY).is_none());
    assert!(storage.get(LOGIN_EMAIL_KEY).is_none());
}

#[tokio::test]
async fn logout_notifies_server_and_clears_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/logout"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (store, storage) = test_store(&server.uri(), SalesSource::Fixture);
    sign_in(&store);
    store.logout().await;

    assert_signed_out(&store, &storage);
}

#[tokio::test]
async fn logout_clears_session_when_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let (store, storage) = test_store(&server.uri(), SalesSource::Fixture);
    sign_in(&store);
    store.logout().await;

    assert_signed_out(&store, &storage);
    assert!(store.snapshot().error.is_none());
}

#[tokio::test]
async fn logout_clears_session_when_server_unreachable() {
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };

    let (store, storage) = test_store(&uri, SalesSource::Fixture);
    sign_in(&store);
    store.logout().await;

    assert_signed_out(&store, &storage);
}

#[tokio::test]
async fn logout_without_token_skips_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (store, storage) = test_store(&server.uri(), SalesSource::Fixture);
    store.set_login_email(Some("test@example.com".to_owned()));
    store.logout().await;

    assert_signed_out(&store, &storage);
}

// ---------------------------------------------------------------------------
// fetch_daily_sales_data
// ---------------------------------------------------------------------------

#[tokio::test]
async fn daily_sales_requires_token_and_store() {
    let server = MockServer::start().await;
    let (store, _storage) = test_store(&server.uri(), SalesSource::Fixture);

    let result = store.fetch_daily_sales_data(30).await;
    assert!(
        matches!(result, Err(SessionError::Precondition(ref m)) if m == "Missing authentication or store information"),
        "expected Precondition, got: {result:?}"
    );

    // Token but a profile without a store is still missing context.
    let mut storeless = user_with_store();
    storeless.user.store = None;
    store.set_access_token(Some("test-token".to_owned()));
    store.set_user_info(Some(storeless));
    let result = store.fetch_daily_sales_data(30).await;
    assert!(matches!(result, Err(SessionError::Precondition(_))));

    let session = store.snapshot();
    assert!(session.daily_sales_data.is_empty());
    assert!(session.error.is_none());
}

#[tokio::test]
async fn daily_sales_without_token_keeps_existing_series() {
    let server = MockServer::start().await;
    let (store, _storage) = test_store(&server.uri(), SalesSource::Fixture);
    sign_in(&store);
    store.fetch_daily_sales_data(7).await.unwrap();
    let before = store.snapshot();
    assert_eq!(before.daily_sales_data.len(), 7);

    // Profile with a store but no token.
    store.set_access_token(None);
    let result = store.fetch_daily_sales_data(30).await;
    assert!(
        matches!(result, Err(SessionError::Precondition(ref m)) if m == "Missing authentication or store information"),
        "expected Precondition, got: {result:?}"
    );

    let after = store.snapshot();
    assert!(after.store().is_some());
    assert_eq!(after.daily_sales_data, before.daily_sales_data);
    assert!(after.error.is_none());
}

#[tokio::test]
async fn daily_sales_from_fixture_keeps_last_week() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/data/daily-sales-overview"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (store, _storage) = test_store(&server.uri(), SalesSource::Fixture);
    sign_in(&store);
    store.fetch_daily_sales_data(7).await.unwrap();

    let records = store.snapshot().daily_sales_data;
    let dates: Vec<&str> = records.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(
        dates,
        ["Mar 25", "Mar 26", "Mar 27", "Mar 28", "Mar 29", "Mar 30", "Mar 31"]
    );
    for r in &records {
        assert_eq!(r.total_sales, r.fba_amount + r.fbm_amount);
    }
    // The bundled Mar 30 entry has no profit figure.
    assert_eq!(records[5].profit, Decimal::ZERO);
    assert_eq!(records[6].total_sales, "3401.50".parse::<Decimal>().unwrap());
}

#[tokio::test]
async fn daily_sales_refetch_replaces_series() {
    let server = MockServer::start().await;
    let (store, _storage) = test_store(&server.uri(), SalesSource::Fixture);
    sign_in(&store);

    store.fetch_daily_sales_data(30).await.unwrap();
    assert_eq!(store.snapshot().daily_sales_data.len(), 30);

    store.fetch_daily_sales_data(14).await.unwrap();
    let records = store.snapshot().daily_sales_data;
    assert_eq!(records.len(), 14);
    assert_eq!(records[0].date, "Mar 18");
}

#[tokio::test]
async fn daily_sales_from_live_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/data/daily-sales-overview"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(json!({
            "marketplace": "Amazon US",
            "sellerId": "store-123",
            "requestStatus": 0,
            "day": 2,
            "excludeYoYData": true,
            "customDateData": null
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ApiStatus": true,
            "Data": {
                "item": [
                    { "date": "2025-06-01", "profit": 10, "fbaAmount": 100, "fbmAmount": 50, "fbaShippingAmount": 5 },
                    { "date": "2025-06-02", "profit": 12, "fbaAmount": 120 },
                    { "date": "2025-06-03", "fbaAmount": 80.5, "fbmAmount": 19.5, "fbaShippingAmount": null }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (store, _storage) = test_store(&server.uri(), SalesSource::Live);
    sign_in(&store);
    store.fetch_daily_sales_data(2).await.unwrap();

    let records = store.snapshot().daily_sales_data;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].date, "Jun 2");
    assert_eq!(records[0].fbm_amount, Decimal::ZERO);
    assert_eq!(records[0].total_sales, Decimal::from(120));
    assert_eq!(records[1].date, "Jun 3");
    assert_eq!(records[1].profit, Decimal::ZERO);
    assert_eq!(records[1].total_sales, Decimal::from(100));
}

#[tokio::test]
async fn daily_sales_live_failure_records_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/data/daily-sales-overview"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let (store, _storage) = test_store(&server.uri(), SalesSource::Live);
    sign_in(&store);
    let result = store.fetch_daily_sales_data(30).await;

    assert!(
        matches!(result, Err(SessionError::UnexpectedStatus { status: 502, .. })),
        "expected UnexpectedStatus(502), got: {result:?}"
    );
    let session = store.snapshot();
    assert!(session.error.is_some());
    assert!(session.daily_sales_data.is_empty());
}

// ---------------------------------------------------------------------------
// persistence and construction
// ---------------------------------------------------------------------------

#[tokio::test]
async fn token_mutation_mirrors_to_storage() {
    let server = MockServer::start().await;
    let (store, storage) = test_store(&server.uri(), SalesSource::Fixture);

    store.set_access_token(Some("persisted-token".to_owned()));
    assert_eq!(
        storage.get(ACCESS_TOKEN_KEY).as_deref(),
        Some("persisted-token")
    );
    assert!(store.is_authenticated());

    store.set_access_token(None);
    assert!(storage.get(ACCESS_TOKEN_KEY).is_none());
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn new_store_rehydrates_from_storage() {
    let server = MockServer::start().await;
    let storage = Arc::new(MemoryStorage::new());
    storage.set(ACCESS_TOKEN_KEY, "persisted-token").unwrap();
    storage.set(LOGIN_EMAIL_KEY, "test@example.com").unwrap();
    storage
        .set(USER_INFO_KEY, &serde_json::to_string(&user_with_store()).unwrap())
        .unwrap();

    let store = SessionStore::new(
        test_client(&server.uri()),
        storage.clone(),
        SalesSource::Fixture,
    );
    let session = store.snapshot();
    assert!(session.is_authenticated());
    assert_eq!(session.user_info, Some(user_with_store()));
    assert_eq!(session.login_email.as_deref(), Some("test@example.com"));
}

#[tokio::test]
async fn reset_returns_to_initial_state() {
    let server = MockServer::start().await;
    let storage = Arc::new(MemoryStorage::new());
    let start = Session {
        is_loading: true,
        error: Some("boom".to_owned()),
        ..Session::default()
    };
    let store = SessionStore::with_session(
        test_client(&server.uri()),
        storage.clone(),
        SalesSource::Fixture,
        start,
    );
    sign_in(&store);

    store.reset();
    assert_eq!(store.snapshot(), Session::default());
    assert_signed_out(&store, &storage);
}

/// Storage whose write of one chosen value stalls, to widen the window
/// between a commit's state change and its storage write.
struct StallingStorage {
    inner: MemoryStorage,
    stall_on: &'static str,
}

impl KeyValueStore for StallingStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if value == self.stall_on {
            thread::sleep(Duration::from_millis(200));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }
}

#[test]
fn overlapping_commits_persist_in_commit_order() {
    let storage = Arc::new(StallingStorage {
        inner: MemoryStorage::new(),
        stall_on: "token-a",
    });
    let store = SessionStore::new(
        test_client("http://127.0.0.1:9"),
        storage.clone(),
        SalesSource::Fixture,
    );

    thread::scope(|s| {
        s.spawn(|| store.set_access_token(Some("token-a".to_owned())));
        thread::sleep(Duration::from_millis(50));
        s.spawn(|| store.set_access_token(Some("token-b".to_owned())));
    });

    let in_memory = store.snapshot().access_token;
    let persisted = storage.get(ACCESS_TOKEN_KEY);
    assert_eq!(in_memory.as_deref(), Some("token-b"));
    assert_eq!(persisted, in_memory, "session and persisted token diverged");
}
