//! HTTP router assembly.
//!
//! Routes fall into three groups:
//! - public: no token required
//! - admin: bearer token with role `admin`
//! - customer: bearer token with role `customer`
//!
//! Groups share paths where only the method differs (e.g. `GET /fuel` is
//! public, `PATCH /fuel` is admin); axum merges those method routers.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware as axum_middleware,
    routing::{get, patch, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{amenities, auth, customers, fuel, health, inventory, parking},
    middleware::auth::{auth_middleware, require_admin, require_customer},
    services::upload_service::MAX_UPLOAD_BYTES,
    state::AppState,
};

/// Request body ceiling for uploads: the file plus multipart framing.
const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 64 * 1024;

/// Build the full application router.
pub fn build_router(state: AppState, cors_origin: HeaderValue) -> Router {
    let public_routes = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/auth/login", post(auth::login))
        .route("/customers/login", post(customers::login))
        .route("/fuel", get(fuel::list_fuel))
        .route("/services", get(amenities::list_amenities))
        .route("/inventory", get(inventory::list_items))
        .route("/inventory/categories", get(inventory::list_categories))
        .route("/inventory/featured", get(inventory::list_featured))
        .route("/parking/reservations", post(parking::create_reservation))
        .route(
            "/parking/reservations/{tracking_id}",
            get(parking::get_reservation),
        );

    // route_layer: the last layer added runs first, so tokens are verified
    // before roles are checked
    let admin_routes = Router::new()
        .route("/fuel", patch(fuel::update_fuel))
        .route("/inventory", post(inventory::create_item))
        .route(
            "/inventory/upload",
            post(inventory::upload_image).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/inventory/{id}", patch(inventory::update_item))
        .route(
            "/customers",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route(
            "/customers/{id}",
            get(customers::get_customer).patch(customers::update_customer),
        )
        .route_layer(axum_middleware::from_fn(require_admin))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let customer_routes = Router::new()
        .route("/customers/me", get(customers::me))
        .route_layer(axum_middleware::from_fn(require_customer))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .merge(customer_routes)
        .nest_service("/uploads", ServeDir::new(&state.upload_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
        response::Response,
    };
    use serde_json::{Value, json};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::{models::user::Role, services::auth_service::TokenKeys};

    const ORIGIN: &str = "http://localhost:3000";

    /// State whose pool never connects: only paths that answer before
    /// touching the database can be exercised here.
    fn test_state() -> AppState {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy("postgres://postgres@127.0.0.1:1/truck_stop_test")
            .unwrap();

        AppState {
            pool,
            tokens: Arc::new(TokenKeys::new("router-test-secret", Duration::from_secs(600))),
            upload_dir: std::env::temp_dir().join("truck-stop-router-test"),
            bcrypt_cost: 4,
        }
    }

    fn app() -> (Router, AppState) {
        let state = test_state();
        let router = build_router(state.clone(), HeaderValue::from_static(ORIGIN));
        (router, state)
    }

    fn token(state: &AppState, role: Role) -> String {
        state.tokens.issue(1, "someone@example.com", role).unwrap()
    }

    fn json_request(method: Method, uri: &str, bearer: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    /// Admin multipart upload of a PNG `len` bytes long.
    fn image_upload(state: &AppState, len: usize) -> Request<Body> {
        let mut body = b"--XBOUNDARY\r\n\
            Content-Disposition: form-data; name=\"file\"; filename=\"photo.png\"\r\n\
            Content-Type: image/png\r\n\r\n"
            .to_vec();
        body.resize(body.len() + len, b'x');
        body.extend_from_slice(b"\r\n--XBOUNDARY--\r\n");

        let admin = token(state, Role::Admin);
        Request::post("/inventory/upload")
            .header(header::AUTHORIZATION, format!("Bearer {admin}"))
            .header(header::HOST, "h")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn root_reports_service() {
        let (app, _) = app();
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "buena-truck-stop-api");
    }

    #[tokio::test]
    async fn admin_route_requires_token() {
        let (app, _) = app();
        let response = app
            .oneshot(json_request(
                Method::PATCH,
                "/fuel",
                None,
                json!({"type": "diesel", "price": "3.99"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"]["message"], "Missing token");
    }

    #[tokio::test]
    async fn admin_route_rejects_bad_token() {
        let (app, _) = app();
        let response = app
            .oneshot(json_request(
                Method::PATCH,
                "/fuel",
                Some("not-a-token"),
                json!({"type": "diesel"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"]["message"], "Invalid token");
    }

    #[tokio::test]
    async fn admin_route_rejects_customer_role() {
        let (app, state) = app();
        let customer = token(&state, Role::Customer);
        let response = app
            .oneshot(json_request(
                Method::POST,
                "/inventory",
                Some(&customer),
                json!({"name": "Jerky", "category": "Snacks"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn staff_role_is_not_admin() {
        let (app, state) = app();
        let staff = token(&state, Role::Staff);
        let response = app
            .oneshot(
                Request::get("/customers")
                    .header(header::AUTHORIZATION, format!("Bearer {staff}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn customer_profile_rejects_admin_role() {
        let (app, state) = app();
        let admin = token(&state, Role::Admin);
        let response = app
            .oneshot(
                Request::get("/customers/me")
                    .header(header::AUTHORIZATION, format!("Bearer {admin}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_fuel_update_validates_price() {
        let (app, state) = app();
        let admin = token(&state, Role::Admin);
        let response = app
            .oneshot(json_request(
                Method::PATCH,
                "/fuel",
                Some(&admin),
                json!({"type": "diesel", "price": "3.9"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "invalid_request");
        assert_eq!(body["error"]["message"], "price must look like 3.47");
    }

    #[tokio::test]
    async fn admin_customer_create_validates_email() {
        let (app, state) = app();
        let admin = token(&state, Role::Admin);
        let response = app
            .oneshot(json_request(
                Method::POST,
                "/customers",
                Some(&admin),
                json!({"name": "Jane", "email": "nope", "password": "secret1"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_numeric_id_is_rejected() {
        let (app, state) = app();
        let admin = token(&state, Role::Admin);
        let response = app
            .oneshot(json_request(
                Method::PATCH,
                "/inventory/abc",
                Some(&admin),
                json!({"featured": true}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn reservation_validates_days() {
        let (app, _) = app();
        let response = app
            .oneshot(json_request(
                Method::POST,
                "/parking/reservations",
                None,
                json!({
                    "name": "Sam",
                    "phone": "555-0199",
                    "arrivalDate": "2025-07-04",
                    "days": 31
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"]["message"],
            "days must be between 1 and 30"
        );
    }

    #[tokio::test]
    async fn reservation_rejects_malformed_json() {
        let (app, _) = app();
        let response = app
            .oneshot(
                Request::post("/parking/reservations")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "invalid_request");
    }

    #[tokio::test]
    async fn login_validates_before_lookup() {
        let (app, _) = app();
        let response = app
            .oneshot(json_request(
                Method::POST,
                "/auth/login",
                None,
                json!({"email": "admin", "password": "x"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upload_requires_multipart_body() {
        let (app, state) = app();
        let admin = token(&state, Role::Admin);
        let response = app
            .oneshot(json_request(
                Method::POST,
                "/inventory/upload",
                Some(&admin),
                json!({}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upload_rejects_non_image() {
        let (app, state) = app();
        let admin = token(&state, Role::Admin);
        let body = "--XBOUNDARY\r\n\
                    Content-Disposition: form-data; name=\"file\"; filename=\"notes.txt\"\r\n\
                    Content-Type: text/plain\r\n\r\n\
                    hello\r\n\
                    --XBOUNDARY--\r\n";
        let response = app
            .oneshot(
                Request::post("/inventory/upload")
                    .header(header::AUTHORIZATION, format!("Bearer {admin}"))
                    .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"]["message"],
            "Only image uploads are allowed"
        );
    }

    #[tokio::test]
    async fn upload_accepts_image_at_the_limit() {
        let (app, state) = app();
        let response = app
            .oneshot(image_upload(&state, MAX_UPLOAD_BYTES))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["size"], MAX_UPLOAD_BYTES);

        let filename = body["filename"].as_str().unwrap();
        assert!(filename.ends_with(".png"));
        assert_eq!(body["url"], format!("http://h/uploads/inventory/{filename}"));
        tokio::fs::remove_file(state.upload_dir.join("inventory").join(filename))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn upload_over_the_limit_is_413() {
        for len in [MAX_UPLOAD_BYTES + 1, MAX_UPLOAD_BYTES + 1024 * 1024] {
            let (app, state) = app();
            let response = app.oneshot(image_upload(&state, len)).await.unwrap();

            assert_eq!(
                response.status(),
                StatusCode::PAYLOAD_TOO_LARGE,
                "{len} bytes"
            );
            assert_eq!(
                body_json(response).await["error"]["code"],
                "payload_too_large"
            );
        }
    }

    #[tokio::test]
    async fn cors_preflight_allows_configured_origin() {
        let (app, _) = app();
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/fuel")
                    .header(header::ORIGIN, ORIGIN)
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            ORIGIN
        );
    }

    #[tokio::test]
    async fn missing_upload_is_404() {
        let (app, _) = app();
        let response = app
            .oneshot(
                Request::get("/uploads/inventory/does-not-exist.png")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
