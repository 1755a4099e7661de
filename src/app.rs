use axum::{Router, routing::get};
use http::{HeaderValue, Method, header};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers;
use crate::state::AppState;

/// Router の構築
pub fn create_router(state: AppState) -> Router {
    let cors = create_cors_layer(&state.config.cors_allowed_origins);

    let router = Router::new()
        .route("/ping", get(handlers::ping))
        .route("/actuator/health", get(handlers::health_check))
        .route("/v3/api-docs", get(handlers::api_docs))
        // ユーザー
        .route(
            "/v1/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/v1/users/{user_id}",
            get(handlers::get_user)
                .patch(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route("/v1/users/{user_id}/profile", get(handlers::get_profile))
        // 住所
        .route(
            "/v1/users/{user_id}/addresses",
            get(handlers::list_addresses).post(handlers::create_address),
        )
        .route(
            "/v1/users/{user_id}/addresses/{address_id}",
            get(handlers::get_address)
                .patch(handlers::update_address)
                .delete(handlers::delete_address),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

/// 許可オリジンから CORS レイヤーを作成（未設定なら `None`）
fn create_cors_layer(allowed_origins: &[String]) -> Option<CorsLayer> {
    if allowed_origins.is_empty() {
        return None;
    }

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if allowed_origins.iter().any(|o| o == "*") {
        return Some(cors.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = ?e, "不正な CORS オリジンを無視");
                None
            }
        })
        .collect();

    Some(cors.allow_origin(origins))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(AppState::in_memory(Config::test_profile()))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, json)
    }

    fn user_body(username: &str, email: &str) -> Value {
        json!({
            "username": username,
            "email": email,
            "password": "password",
            "first_name": "Tom",
            "last_name": "Bombadil",
            "phone_number": "5746857273733",
            "profile_image_url": "www.someurl.com",
            "address": {
                "address_type": "Home",
                "address_line_1": "1717 Old Forest Rd",
                "city": "Old Forest",
                "state": "Old Forest",
                "zip_code": "17171",
                "country": "USA"
            }
        })
    }

    async fn create_user(app: &Router) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/v1/users",
            Some(user_body("magicalwizardman4848", "somewhere@someplace.com")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["user_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_ping_and_health() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/ping", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "pong");

        let (status, body) = send(&app, Method::GET, "/actuator/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "UP");

        let (status, body) = send(&app, Method::GET, "/v3/api-docs", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/v1/users"].is_object());
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let app = app();
        let (status, created) = send(
            &app,
            Method::POST,
            "/v1/users",
            Some(user_body("magicalwizardman4848", "somewhere@someplace.com")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["username"], "magicalwizardman4848");
        assert_eq!(created["status"], "ACTIVE");
        assert!(created.get("password").is_none());
        assert_eq!(created["addresses"].as_array().unwrap().len(), 1);

        let user_id = created["user_id"].as_str().unwrap();
        assert_eq!(
            created["_links"]["self"]["href"],
            format!("/v1/users/{user_id}")
        );
        assert_eq!(created["_links"]["collection"]["href"], "/v1/users");

        let (status, fetched) = send(&app, Method::GET, &format!("/v1/users/{user_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["email"], "somewhere@someplace.com");
        assert_eq!(
            fetched["addresses"][0]["_links"]["user"]["href"],
            format!("/v1/users/{user_id}")
        );
    }

    #[tokio::test]
    async fn test_create_user_duplicate_is_conflict() {
        let app = app();
        create_user(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/v1/users",
            Some(user_body("magicalwizardman4848", "other@someplace.com")),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["status"], 409);
    }

    #[tokio::test]
    async fn test_create_user_missing_fields_is_bad_request() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/v1/users",
            Some(json!({ "email": "somewhere@someplace.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Bad Request");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let app = app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/v1/users")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_user_errors() {
        let app = app();
        let (status, _) = send(&app, Method::GET, "/v1/users/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let missing = uuid::Uuid::new_v4();
        let (status, body) = send(&app, Method::GET, &format!("/v1/users/{missing}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);
    }

    #[tokio::test]
    async fn test_list_users_paging_links() {
        let app = app();
        for i in 0..3 {
            let (status, _) = send(
                &app,
                Method::POST,
                "/v1/users",
                Some(user_body(&format!("user{i}"), &format!("user{i}@example.com"))),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(&app, Method::GET, "/v1/users?page=0&size=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["users"].as_array().unwrap().len(), 2);
        assert_eq!(body["page"]["total_elements"], 3);
        assert_eq!(body["page"]["total_pages"], 2);
        assert_eq!(body["_links"]["next"]["href"], "/v1/users?page=1&size=2");
        assert!(body["_links"].get("prev").is_none());

        let (status, body) = send(&app, Method::GET, "/v1/users?username=USER1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["users"].as_array().unwrap().len(), 1);
        assert_eq!(body["users"][0]["username"], "user1");
    }

    #[tokio::test]
    async fn test_list_users_invalid_paging() {
        let app = app();
        let (status, _) = send(&app, Method::GET, "/v1/users?size=0", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::GET, "/v1/users?page=-1", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::GET, "/v1/users?page=abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/v1/users?page={}&size=10", i64::MAX),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);
    }

    #[tokio::test]
    async fn test_list_users_last_valid_page_is_empty() {
        let app = app();
        create_user(&app).await;

        let max_page = crate::dto::requests::MAX_PAGE;
        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/v1/users?page={max_page}&size=100"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["users"].as_array().unwrap().is_empty());
        assert_eq!(body["page"]["page_number"], max_page);
        assert_eq!(body["page"]["total_elements"], 1);
        assert_eq!(
            body["_links"]["self"]["href"],
            format!("/v1/users?page={max_page}&size=100")
        );
        assert_eq!(body["_links"]["first"]["href"], "/v1/users?page=0&size=100");
        assert!(body["_links"].get("next").is_none());
    }

    #[tokio::test]
    async fn test_list_users_blank_filter_ignored() {
        let app = app();
        create_user(&app).await;

        let (status, body) = send(&app, Method::GET, "/v1/users?username=%20%20&size=1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["users"].as_array().unwrap().len(), 1);
        assert_eq!(body["_links"]["self"]["href"], "/v1/users?page=0&size=1");
    }

    #[tokio::test]
    async fn test_patch_user() {
        let app = app();
        let user_id = create_user(&app).await;
        let uri = format!("/v1/users/{user_id}");

        let (status, body) = send(
            &app,
            Method::PATCH,
            &uri,
            Some(json!({ "first_name": "Goldberry", "profile_image_url": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["first_name"], "Goldberry");
        assert!(body.get("profile_image_url").is_none());

        let (status, _) = send(
            &app,
            Method::PATCH,
            &uri,
            Some(json!({ "email": "new@someplace.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({ "last_name": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_user_is_idempotent() {
        let app = app();
        let user_id = create_user(&app).await;
        let uri = format!("/v1/users/{user_id}");

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_profile() {
        let app = app();
        let user_id = create_user(&app).await;

        let (status, body) = send(&app, Method::GET, &format!("/v1/users/{user_id}/profile"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["last_name"], "Bombadil");
        assert_eq!(
            body["_links"]["addresses"]["href"],
            format!("/v1/users/{user_id}/addresses")
        );
    }

    #[tokio::test]
    async fn test_address_lifecycle() {
        let app = app();
        let user_id = create_user(&app).await;
        let addresses_uri = format!("/v1/users/{user_id}/addresses");

        let (status, created) = send(
            &app,
            Method::POST,
            &addresses_uri,
            Some(json!({
                "address_line_1": "1 Bag End",
                "city": "Hobbiton",
                "state": "The Shire",
                "zip_code": "00001",
                "country": "Middle-earth"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["address_type"], "home");
        let address_id = created["address_id"].as_str().unwrap().to_string();
        let address_uri = format!("{addresses_uri}/{address_id}");
        assert_eq!(created["_links"]["collection"]["href"], addresses_uri);

        let (status, list) = send(&app, Method::GET, &addresses_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list["addresses"].as_array().unwrap().len(), 2);
        assert_eq!(list["_links"]["self"]["href"], addresses_uri);

        let (status, patched) = send(
            &app,
            Method::PATCH,
            &address_uri,
            Some(json!({ "city": "Bywater" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(patched["city"], "Bywater");

        let (status, _) = send(&app, Method::DELETE, &address_uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, &address_uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_address_errors() {
        let app = app();
        let missing = uuid::Uuid::new_v4();

        let (status, _) = send(&app, Method::GET, &format!("/v1/users/{missing}/addresses"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/v1/users/{missing}/addresses"),
            Some(json!({
                "address_line_1": "1 Bag End",
                "city": "Hobbiton",
                "state": "The Shire",
                "zip_code": "00001",
                "country": "Middle-earth"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let user_id = create_user(&app).await;
        let (status, _) = send(
            &app,
            Method::GET,
            &format!("/v1/users/{user_id}/addresses/not-a-uuid"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_cors_layer_disabled_without_origins() {
        assert!(create_cors_layer(&[]).is_none());
        assert!(create_cors_layer(&["*".to_string()]).is_some());
        assert!(create_cors_layer(&["http://localhost:3000".to_string()]).is_some());
    }
}
