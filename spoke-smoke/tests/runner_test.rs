//! Full smoke iterations against mock users/notifications/bikes services

use serde_json::json;
use spoke_auth::{AuthFlow, Authenticator, Credentials};
use spoke_http::{HttpClient, HttpManager};
use spoke_smoke::{BikesApi, LoadProfile, NotificationFilters, NotificationsApi, SmokeRunner};
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> Arc<dyn HttpClient> {
    Arc::new(HttpManager::new().unwrap())
}

async fn mount_v2_login(server: &MockServer, access_token: &str, expected_logins: u64) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(expected_logins)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/verify"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"access_token": access_token})),
        )
        .expect(expected_logins)
        .mount(server)
        .await;
}

fn authenticator(server: &MockServer, environment: &str) -> Arc<Authenticator> {
    let flow = AuthFlow::new(
        client(),
        server.uri(),
        "/auth/login",
        "/auth/verify",
        Credentials::new("6281200000001", "whatsapp", "123456"),
    );
    Arc::new(Authenticator::new(environment, flow))
}

fn notifications(server: &MockServer) -> NotificationsApi {
    NotificationsApi::new(
        client(),
        Some(server.uri()),
        Some("/notifications".to_string()),
        Some("/notifications".to_string()),
    )
}

#[tokio::test]
async fn test_vus_log_in_once_and_list_notifications() {
    let server = MockServer::start().await;
    mount_v2_login(&server, "vu-token", 2).await;

    Mock::given(method("GET"))
        .and(path("/notifications"))
        .and(header("authorization", "Bearer vu-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 1, "is_read": false}],
            "meta": {"total": 1}
        })))
        .expect(6)
        .mount(&server)
        .await;

    let runner = SmokeRunner::new(authenticator(&server, "stage"), notifications(&server));
    let report = runner.run(LoadProfile::new(2, 3)).await;

    assert_eq!(report.iterations_run, 6);
    assert_eq!(report.iterations_skipped, 0);
    assert_eq!(report.token_cache.misses, 2);
    assert_eq!(report.token_cache.hits, 4);
    assert_eq!(report.checks.checks["Status is 200"].passed, 6);
    assert_eq!(report.checks.checks["Field \"data\" is an array"].passed, 6);
    assert_eq!(report.auth_version.to_string(), "V2");
}

#[tokio::test]
async fn test_iterations_are_skipped_without_a_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(0)
        .mount(&server)
        .await;

    let runner = SmokeRunner::new(authenticator(&server, "stage"), notifications(&server));
    let report = runner.run(LoadProfile::new(1, 3)).await;

    assert_eq!(report.iterations_run, 0);
    assert_eq!(report.iterations_skipped, 3);
    assert_eq!(report.token_cache.failed, 1);
    assert!(!report.passed());
}

#[tokio::test]
async fn test_toggle_read_and_bike_lookup() {
    let server = MockServer::start().await;
    mount_v2_login(&server, "t", 1).await;

    Mock::given(method("GET"))
        .and(path("/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "n-9", "is_read": true}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/notifications/n-9"))
        .and(body_json(json!({"is_read": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/bikes"))
        .and(header("authorization", "Bearer t"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 314}, {"id": 315}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let bikes = BikesApi::new(client(), Some(server.uri()), Some("bikes".to_string()));
    let runner = SmokeRunner::new(authenticator(&server, "stage"), notifications(&server))
        .with_toggle_read(true)
        .with_bikes(bikes);

    let report = runner.run(LoadProfile::smoke()).await;

    assert!(report.passed(), "{:?}", report.checks);
    assert_eq!(
        report.checks.checks["Update notification status is 200"].passed,
        1
    );
    assert_eq!(report.checks.checks["Bike ID retrieved"].passed, 1);
}

#[tokio::test]
async fn test_toggle_skipped_when_listing_has_no_data() {
    let server = MockServer::start().await;
    mount_v2_login(&server, "t", 1).await;

    Mock::given(method("GET"))
        .and(path("/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let runner = SmokeRunner::new(authenticator(&server, "stage"), notifications(&server))
        .with_toggle_read(true);
    let report = runner.run(LoadProfile::smoke()).await;

    assert_eq!(report.iterations_run, 1);
    assert_eq!(report.checks.checks["Field \"data\" is an array"].failed, 1);
    assert!(!report
        .checks
        .checks
        .contains_key("Update notification status is 200"));
}

#[tokio::test]
async fn test_update_encodes_notification_id() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/notifications/a%2Fb%3Fc"))
        .and(body_json(json!({"is_read": true})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    notifications(&server)
        .update_is_read("t", "a/b?c", true)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_list_with_filters_and_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notifications"))
        .and(query_param("page", "2"))
        .and(query_param("is_read", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 5}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/notifications"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "jwt expired"})))
        .mount(&server)
        .await;

    let api = notifications(&server);
    let filters = NotificationFilters {
        page: Some(2),
        is_read: Some(false),
        ..Default::default()
    };

    let page = api.list_with_filters("fresh", &filters).await.unwrap();
    assert_eq!(page.notifications[0].id, "5");
    assert!(!page.notifications[0].is_read);

    let err = api.list("stale").await.unwrap_err();
    assert_eq!(err.to_string(), "Unauthorized: jwt expired");
}

#[tokio::test]
async fn test_missing_configuration_is_reported() {
    let api = NotificationsApi::new(client(), None, Some("/n".to_string()), None);
    assert!(!api.can_update());
    let err = api.list("t").await.unwrap_err();
    assert!(err.to_string().contains("notifications base URL"));

    let bikes = BikesApi::new(client(), Some("http://bikes.test".to_string()), None);
    assert!(bikes.first_bike_id("t").await.is_err());
}
