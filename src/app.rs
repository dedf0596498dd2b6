use std::net::SocketAddr;

use axum::{extract::DefaultBodyLimit, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::state::AppState;
use crate::{analysis, auth, meals, posts, profile, recipes, voice};

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "message": "SnackOverflow API is running" }))
}

async fn welcome() -> &'static str {
    "Welcome to Campus Eats API!"
}

pub fn build_app(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    let static_dir = state.config.static_dir.clone();

    let mut app = Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(posts::router())
                .merge(meals::router())
                .merge(recipes::router())
                .merge(profile::router())
                .merge(auth::router())
                .merge(voice::router()),
        )
        .merge(analysis::router())
        .route("/health", get(health));

    app = match static_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app.route("/", get(welcome)),
    };

    app.with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, host: &str, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::extract::{INVALID_BODY, INVALID_PATH};

    fn app() -> Router {
        build_app(AppState::fake())
    }

    async fn body_json(res: axum::response::Response) -> Value {
        let bytes = to_bytes(res.into_body(), 1024 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_and_welcome() {
        let res = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await["status"], "healthy");

        let res = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(res.into_body(), 1024).await.unwrap();
        assert_eq!(&bytes[..], b"Welcome to Campus Eats API!");
    }

    #[tokio::test]
    async fn assess_meal_without_database() {
        let res = app()
            .oneshot(json_request(
                "POST",
                "/api/meals/assess",
                r#"{"protein":"1","carbs":"100","fats":"1"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let v = body_json(res).await;
        assert_eq!(v["calories"], 413);
        assert!(v["warning"].as_str().unwrap().contains("unbalanced"));
        assert!(v.get("message").is_none());
    }

    #[tokio::test]
    async fn validation_errors_are_400() {
        let vote_uri = format!("/api/posts/{}/vote", uuid::Uuid::nil());
        let cases = [
            ("POST", "/api/meals", r#"{"name":"Toast"}"#, "All fields are required."),
            ("POST", "/api/posts", r#"{"restaurantName":"A"}"#, "All fields are required."),
            ("PUT", vote_uri.as_str(), r#"{"change":3}"#, "Invalid vote change."),
            ("POST", "/api/profile", r#"{"email":"a@b.co"}"#, "Name and Email are required."),
            ("POST", "/api/speech", r#"{"text":"  "}"#, "Text is required"),
        ];
        for (method, uri, body, message) in cases {
            let res = app().oneshot(json_request(method, uri, body)).await.unwrap();
            assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body_json(res).await["error"], message, "{uri}");
        }
    }

    #[tokio::test]
    async fn malformed_bodies_and_ids_are_json_400() {
        let bad_id = "/api/posts/not-a-uuid/vote";
        let cases = [
            ("POST", "/api/meals", r#"{"name":"Toast","protein":"abc"}"#, INVALID_BODY),
            ("POST", "/api/meals/assess", r#"{"protein":"NaN"}"#, INVALID_BODY),
            ("POST", "/api/posts", r#"{"restaurantName":"A","rating":"five"}"#, INVALID_BODY),
            ("POST", "/api/profile", r#"{"email":"a@b.co","#, INVALID_BODY),
            ("PUT", bad_id, r#"{"change":1}"#, INVALID_PATH),
            ("DELETE", "/api/meals/42", "", INVALID_PATH),
        ];
        for (method, uri, body, message) in cases {
            let res = app().oneshot(json_request(method, uri, body)).await.unwrap();
            assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{method} {uri}");
            assert_eq!(body_json(res).await["error"], message, "{method} {uri}");
        }

        let res = app()
            .oneshot(
                Request::post("/api/meals/assess")
                    .body(Body::from(r#"{"protein":1}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["error"], INVALID_BODY);
    }

    #[tokio::test]
    async fn me_requires_token() {
        let res = app()
            .oneshot(Request::get("/api/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn speech_returns_wav() {
        let res = app()
            .oneshot(json_request("POST", "/api/speech", r#"{"text":"hello"}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "audio/wav");
    }

    fn multipart_request(uri: &str, field: &str, filename: &str, content_type: &str) -> Request<Body> {
        let boundary = "XBOUNDARY";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\nDATA\r\n--{boundary}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn voice_command_is_recognised() {
        let res = app()
            .oneshot(multipart_request("/api/voice-command", "audio", "clip.webm", "audio/webm"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let v = body_json(res).await;
        assert_eq!(v["transcript"], "Open the camera");
        assert_eq!(v["command"], "camera");
    }

    #[tokio::test]
    async fn analyze_requires_image_field() {
        let res = app()
            .oneshot(multipart_request("/analyze", "photo", "x.jpg", "image/jpeg"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["error"], "No image file provided");
    }
}
