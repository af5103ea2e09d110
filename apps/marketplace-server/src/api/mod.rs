// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Body,
    http::{header, HeaderValue, Method, Request},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::warn;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{require_session, IdentityClaim, SESSION_COOKIE},
    models::{Bid, BidStatusUpdate, Job, JobUpdate, NewBid, NewJob},
    state::AppState,
    storage::{DeleteAck, InsertAck, UpdateAck},
};

pub mod bids;
pub mod health;
pub mod jobs;
pub mod session;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn router(state: AppState, cors: CorsLayer) -> Router {
    let session_guard = from_fn_with_state(state.clone(), require_session);

    // `route_layer` on a method router only wraps the methods registered
    // before it, so `POST /bids` stays public.
    let routes = Router::new()
        .route("/", get(health::root))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/jwt", post(session::issue_session))
        .route("/logout", post(session::logout))
        .route("/jobs", get(jobs::list_jobs).post(jobs::create_job))
        .route(
            "/jobs/{id}",
            get(jobs::get_job)
                .patch(jobs::update_job)
                .delete(jobs::delete_job),
        )
        .route(
            "/bids",
            get(bids::list_bidder_bids)
                .route_layer(session_guard.clone())
                .post(bids::create_bid),
        )
        .route(
            "/bids/buyerEmail",
            get(bids::list_buyer_bids).route_layer(session_guard),
        )
        .route(
            "/bids/{id}",
            get(bids::get_bid).patch(bids::update_bid_status),
        )
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        }))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors)
}

/// CORS for the browser frontend.
///
/// Credentials are allowed so the session cookie travels with cross-origin
/// requests, which rules out wildcard origins. Unparseable origins are
/// skipped.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::root,
        health::liveness,
        health::readiness,
        session::issue_session,
        session::logout,
        jobs::create_job,
        jobs::list_jobs,
        jobs::get_job,
        jobs::update_job,
        jobs::delete_job,
        bids::create_bid,
        bids::list_bidder_bids,
        bids::list_buyer_bids,
        bids::get_bid,
        bids::update_bid_status
    ),
    components(
        schemas(
            Job,
            NewJob,
            JobUpdate,
            Bid,
            NewBid,
            BidStatusUpdate,
            InsertAck,
            UpdateAck,
            DeleteAck,
            IdentityClaim,
            session::SessionAck,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Jobs", description = "Job postings"),
        (name = "Bids", description = "Bids on jobs"),
        (name = "Session", description = "Session cookie issuance and logout"),
        (name = "Health", description = "Liveness and readiness checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;
    use axum::{body::to_bytes, http::StatusCode, response::Response};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(state: AppState) -> Router {
        router(state, cors_layer(&["http://localhost:5173".to_string()]))
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_with_cookie(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Log in through `POST /jwt` and return the `name=value` cookie pair.
    async fn login(app: &Router, email: &str) -> String {
        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/jwt", json!({ "email": email })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .expect("session cookie set")
            .to_string();
        set_cookie
            .split(';')
            .next()
            .unwrap_or_default()
            .to_string()
    }

    async fn post_bid(app: &Router, bidder: &str, buyer: &str) {
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/bids",
                json!({
                    "jobTitle": "Logo",
                    "price": 80,
                    "deadline": "2026-11-30",
                    "userEmail": bidder,
                    "buyerEmail": buyer
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn root_reports_running() {
        let (state, _dir) = test_state();
        let response = app(state).oneshot(get_with_cookie("/", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Server is running");
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let (state, _dir) = test_state();
        let response = app(state)
            .oneshot(get_with_cookie("/health/live", None))
            .await
            .unwrap();
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn session_cookie_flags() {
        let (state, _dir) = test_state();
        let response = app(state)
            .oneshot(json_request(Method::POST, "/jwt", json!({ "email": "a@x.com" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        assert!(set_cookie.starts_with("token="));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Strict"));
        assert!(!set_cookie.contains("Secure"));
        assert_eq!(body_json(response).await, json!({ "success": true }));
    }

    #[tokio::test]
    async fn bid_listing_requires_cookie() {
        let (state, _dir) = test_state();
        let app = app(state);
        for uri in ["/bids?email=a@x.com", "/bids/buyerEmail?email=a@x.com"] {
            let response = app.clone().oneshot(get_with_cookie(uri, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(body_json(response).await["message"], "unauthorized access");
        }
    }

    #[tokio::test]
    async fn bid_listing_rejects_bad_token() {
        let (state, _dir) = test_state();
        let response = app(state)
            .oneshot(get_with_cookie("/bids?email=a@x.com", Some("token=not.a.jwt")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn bid_listing_for_other_user_is_forbidden() {
        let (state, _dir) = test_state();
        let app = app(state);
        let cookie = login(&app, "a@x.com").await;

        for uri in ["/bids?email=b@x.com", "/bids/buyerEmail?email=b@x.com"] {
            let response = app
                .clone()
                .oneshot(get_with_cookie(uri, Some(&cookie)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
            assert_eq!(body_json(response).await["message"], "forbidden access");
        }
    }

    #[tokio::test]
    async fn bid_listings_return_callers_bids() {
        let (state, _dir) = test_state();
        let app = app(state);
        post_bid(&app, "a@x.com", "owner@x.com").await;
        post_bid(&app, "b@x.com", "owner@x.com").await;
        post_bid(&app, "a@x.com", "other@x.com").await;

        let cookie = login(&app, "a@x.com").await;
        let response = app
            .clone()
            .oneshot(get_with_cookie("/bids?email=a@x.com", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bids = body_json(response).await;
        let bids = bids.as_array().unwrap();
        assert_eq!(bids.len(), 2);
        assert!(bids.iter().all(|b| b["userEmail"] == "a@x.com"));
        assert!(bids.iter().all(|b| b["status"] == "pending"));

        let cookie = login(&app, "owner@x.com").await;
        let response = app
            .clone()
            .oneshot(get_with_cookie(
                "/bids/buyerEmail?email=owner@x.com",
                Some(&cookie),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bids = body_json(response).await;
        assert_eq!(bids.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn logout_clears_cookie() {
        let (state, _dir) = test_state();
        let response = app(state)
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/logout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        assert!(set_cookie.starts_with("token=;"));
        assert!(set_cookie.contains("Max-Age=0"));
        assert_eq!(body_json(response).await, json!({ "success": true }));
    }

    #[tokio::test]
    async fn logout_accepts_json_body() {
        let (state, _dir) = test_state();
        let response = app(state)
            .oneshot(json_request(Method::POST, "/logout", json!({ "email": "a@x.com" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(header::SET_COOKIE));
    }

    #[tokio::test]
    async fn job_lifecycle_over_http() {
        let (state, _dir) = test_state();
        let app = app(state);

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/jobs",
                json!({
                    "jobTitle": "Logo",
                    "category": "graphics-design",
                    "minimumPrice": 50,
                    "maximumPrice": 120,
                    "description": "A new logo",
                    "email": "c@x.com"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let ack = body_json(response).await;
        assert_eq!(ack["acknowledged"], true);
        let id = ack["insertedId"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PATCH,
                &format!("/jobs/{id}"),
                json!({ "jobTitle": "Logo v2" }),
            ))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["modifiedCount"], 1);

        let response = app
            .clone()
            .oneshot(get_with_cookie("/jobs?email=c@x.com", None))
            .await
            .unwrap();
        let jobs = body_json(response).await;
        assert_eq!(jobs.as_array().unwrap().len(), 1);
        assert_eq!(jobs[0]["jobTitle"], "Logo v2");
        assert_eq!(jobs[0]["_id"], id.as_str());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri(format!("/jobs/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(response).await["deletedCount"], 1);

        let response = app
            .oneshot(get_with_cookie(&format!("/jobs/{id}"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, Value::Null);
    }

    #[tokio::test]
    async fn patch_unknown_job_upserts() {
        let (state, _dir) = test_state();
        let app = app(state);
        let id = crate::storage::DocumentId::generate().to_string();

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PATCH,
                &format!("/jobs/{id}"),
                json!({ "jobTitle": "X" }),
            ))
            .await
            .unwrap();
        let ack = body_json(response).await;
        assert_eq!(ack["upsertedCount"], 1);
        assert_eq!(ack["upsertedId"], id.as_str());

        let response = app
            .oneshot(get_with_cookie(&format!("/jobs/{id}"), None))
            .await
            .unwrap();
        let job = body_json(response).await;
        assert_eq!(job["jobTitle"], "X");
        assert!(job.get("category").is_none());
    }

    #[tokio::test]
    async fn malformed_id_is_bad_request() {
        let (state, _dir) = test_state();
        let response = app(state)
            .oneshot(get_with_cookie("/bids/xyz", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn cors_allows_configured_origin_with_credentials() {
        let (state, _dir) = test_state();
        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/jobs")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }

    #[test]
    fn openapi_documents_cookie_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components present");
        assert!(components.security_schemes.contains_key("session_cookie"));
        assert!(doc.paths.paths.contains_key("/bids/buyerEmail"));
    }
}
