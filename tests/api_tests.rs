use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use upsen::config::Config;

const ADMIN_KEY: &str = "test-admin-key";

fn test_config() -> Config {
    let mut config = Config::default();
    config.store.persist = false;
    config.server.admin_api_key = Some(ADMIN_KEY.to_string());
    config.observability.metrics_enabled = false;
    config
}

async fn spawn_app() -> Router {
    let state = upsen::api::create_app_state_from_config(test_config(), None)
        .await
        .expect("Failed to create app state");
    upsen::api::router(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn login_json(user_id: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/user/login")
        .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
        .body(Body::from(serde_json::json!({ "userId": user_id }).to_string()))
        .unwrap()
}

fn login(user_id: &str) -> Request<Body> {
    login_json(&serde_json::Value::String(user_id.to_string()))
}

#[tokio::test]
async fn test_login_registers_new_user() {
    let app = spawn_app().await;

    let (status, body) = send(&app, login("u0_a123")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["apiVersion"], "1.0");
    assert_eq!(body["data"]["userId"], "u0_a123");
    assert_eq!(body["data"]["totalUsage"], 1);
    assert_eq!(body["data"]["activeDays"], 1);
    assert_eq!(body["data"]["rank"], 1);
    assert_eq!(body["data"]["badges"], serde_json::json!(["newbie", "top_10", "champion"]));
    assert_eq!(body["stats"]["totalUsers"], 1);
    assert_eq!(body["stats"]["userRank"], 1);
    assert_eq!(body["stats"]["leaderboardPosition"], "1/1");
    assert!(body["serverTime"].is_string());
}

#[tokio::test]
async fn test_repeat_login_increments_usage() {
    let app = spawn_app().await;

    send(&app, login("alice")).await;
    let (status, body) = send(&app, login("alice")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalUsage"], 2);
    // Same calendar day, so no extra active day.
    assert_eq!(body["data"]["activeDays"], 1);
    assert_eq!(body["stats"]["totalUsers"], 1);
}

#[tokio::test]
async fn test_login_via_query_string() {
    let app = spawn_app().await;

    let (status, body) = send(&app, get("/api/user/login?userId=query_user")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["userId"], "query_user");

    let request = Request::builder()
        .method("POST")
        .uri("/api/user/login?userId=post_query")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["userId"], "post_query");
}

#[tokio::test]
async fn test_login_sanitizes_user_id() {
    let app = spawn_app().await;

    let (status, body) = send(&app, login("john doe!")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["userId"], "john_doe_");

    let (status, body) = send(&app, get("/api/users/john_doe_")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalUsage"], 1);
}

#[tokio::test]
async fn test_login_rejects_bad_user_ids() {
    let app = spawn_app().await;

    let (status, body) = send(&app, login("")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "User ID is required");

    let request = Request::builder()
        .method("POST")
        .uri("/api/user/login")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, login(&"x".repeat(51))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid user ID"));

    let (status, _) = send(&app, login_json(&serde_json::json!(42))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing above was recorded.
    let (_, body) = send(&app, get("/api/user/stats")).await;
    assert_eq!(body["totalUsers"], 0);
}

#[tokio::test]
async fn test_fifty_char_user_id_is_accepted() {
    let app = spawn_app().await;

    let id = "y".repeat(50);
    let (status, body) = send(&app, login(&id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["userId"], id);
}

#[tokio::test]
async fn test_leaderboard_shape_and_order() {
    let app = spawn_app().await;

    for _ in 0..3 {
        send(&app, login("busy")).await;
    }
    send(&app, login("casual")).await;

    let (status, body) = send(&app, get("/api/leaderboard")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 2);
    assert!(body["lastReset"].is_string());
    assert!(body["serverTime"].is_string());

    let data = body["data"].as_array().unwrap();
    assert_eq!(data[0]["userId"], "busy");
    assert_eq!(data[0]["rank"], 1);
    assert_eq!(data[1]["userId"], "casual");
    assert_eq!(data[1]["rank"], 2);
    assert!(data[0]["score"].as_f64().unwrap() > data[1]["score"].as_f64().unwrap());
}

#[tokio::test]
async fn test_leaderboard_limit() {
    let app = spawn_app().await;

    for user in ["a", "b", "c"] {
        send(&app, login(user)).await;
    }

    let (status, body) = send(&app, get("/api/leaderboard?limit=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    for bad in ["0", "1001"] {
        let (status, body) = send(&app, get(&format!("/api/leaderboard?limit={bad}"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "limit={bad}");
        assert_eq!(body["success"], false);
    }
}

#[tokio::test]
async fn test_malformed_limit_is_json_validation_error() {
    let app = spawn_app().await;
    send(&app, login("alice")).await;

    for uri in [
        "/api/leaderboard?limit=abc",
        "/api/leaderboard?limit=-5",
        "/api/activities?limit=abc",
    ] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            mime::APPLICATION_JSON.as_ref(),
            "{uri}"
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false, "{uri}");
        assert!(json["error"].as_str().unwrap().starts_with("Invalid limit"), "{uri}");
    }

    // An empty value falls back to the default.
    let (status, body) = send(&app, get("/api/leaderboard?limit=")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn test_empty_leaderboard() {
    let app = spawn_app().await;

    let (status, body) = send(&app, get("/api/leaderboard")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["data"], serde_json::json!([]));
}

#[tokio::test]
async fn test_stats_shape() {
    let app = spawn_app().await;

    send(&app, login("alice")).await;
    send(&app, login("alice")).await;
    send(&app, login("bob")).await;

    let (status, body) = send(&app, get("/api/user/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "operational");
    assert_eq!(body["totalUsers"], 2);
    assert_eq!(body["activeToday"], 2);
    assert_eq!(body["totalUsage"], 3);
    assert_eq!(body["daysUntilReset"], 30);
    assert!(body["lastReset"].is_string());
    assert!(body["nextReset"].is_string());
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let app = spawn_app().await;

    let (status, body) = send(&app, get("/api/users/nobody")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_recent_activities_newest_first() {
    let app = spawn_app().await;

    send(&app, login("first")).await;
    send(&app, login("second")).await;
    send(&app, login("first")).await;

    let (status, body) = send(&app, get("/api/activities?limit=2")).await;
    assert_eq!(status, StatusCode::OK);

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["userId"], "first");
    assert_eq!(data[0]["action"], "login");
    assert_eq!(data[1]["userId"], "second");
    assert_eq!(data[1]["action"], "register");
}

#[tokio::test]
async fn test_badge_catalog() {
    let app = spawn_app().await;

    let (status, body) = send(&app, get("/api/badges")).await;
    assert_eq!(status, StatusCode::OK);

    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        [
            "newbie",
            "heavy_user",
            "power_user",
            "weekly_hero",
            "monthly_warrior",
            "top_10",
            "champion"
        ]
    );
}

#[tokio::test]
async fn test_admin_reset_requires_key() {
    let app = spawn_app().await;

    send(&app, login("alice")).await;
    send(&app, login("alice")).await;

    let reset = |key: Option<&str>| {
        let mut builder = Request::builder().method("POST").uri("/api/admin/reset");
        if let Some(key) = key {
            builder = builder.header("X-Api-Key", key);
        }
        builder.body(Body::empty()).unwrap()
    };

    let (status, _) = send(&app, reset(None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, reset(Some("wrong-key"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, reset(Some(ADMIN_KEY))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["usersReset"], 1);

    let (_, body) = send(&app, get("/api/users/alice")).await;
    assert_eq!(body["data"]["totalUsage"], 0);
    assert_eq!(body["data"]["activeDays"], 0);
    // Badges survive a reset.
    assert!(
        body["data"]["badges"]
            .as_array()
            .unwrap()
            .contains(&serde_json::json!("newbie"))
    );
}

#[tokio::test]
async fn test_admin_reset_accepts_bearer_token() {
    let app = spawn_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/admin/reset")
        .header(header::AUTHORIZATION, format!("Bearer {ADMIN_KEY}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["usersReset"], 0);
}

#[tokio::test]
async fn test_admin_disabled_without_key() {
    let mut config = test_config();
    config.server.admin_api_key = None;
    let state = upsen::api::create_app_state_from_config(config, None)
        .await
        .unwrap();
    let app = upsen::api::router(state);

    let request = Request::builder()
        .method("POST")
        .uri("/api/admin/reset")
        .header("X-Api-Key", ADMIN_KEY)
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_and_status() {
    let app = spawn_app().await;

    let (status, body) = send(&app, get("/api/health/live")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "alive");

    let (status, body) = send(&app, get("/api/health/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);

    send(&app, login("alice")).await;
    let (status, body) = send(&app, get("/api/system/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalUsers"], 1);
    assert_eq!(body["data"]["persistence"], false);
}
