//! Structured per-request logging.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{Request, Response, StatusCode, header::HOST},
    middleware::Next,
};
use std::time::Instant;
use tracing::Level;

/// Severity for a finished request: info below 400, warn for 4xx, error for 5xx.
pub fn severity_for_status(status: StatusCode) -> Level {
    if status.is_server_error() {
        Level::ERROR
    } else if status.is_client_error() {
        Level::WARN
    } else {
        Level::INFO
    }
}

macro_rules! emit {
    ($level:expr, $($fields:tt)+) => {
        if $level == Level::ERROR {
            tracing::error!($($fields)+)
        } else if $level == Level::WARN {
            tracing::warn!($($fields)+)
        } else {
            tracing::info!($($fields)+)
        }
    };
}

/// Emits one record per request once the response is ready.
///
/// Fields use OpenTelemetry HTTP semantic-convention names so log pipelines
/// can index them without remapping. The route is the matched pattern
/// (e.g. `/api/v1/users/id/{id}`) or the raw path when nothing matched.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, middleware};
/// use axum_helpers::middleware::request_logger;
///
/// let app = Router::new()
///     .route("/", get(handler))
///     .layer(middleware::from_fn(request_logger));
/// ```
pub async fn request_logger(
    matched_path: Option<MatchedPath>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let route = matched_path
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| path.clone());
    let host = request
        .headers()
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .or_else(|| request.uri().host().map(str::to_string))
        .unwrap_or_default();

    let response = next.run(request).await;

    let status = response.status();
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
    let level = severity_for_status(status);

    emit!(
        level,
        http.request.method = %method,
        http.route = %route,
        server.address = %path,
        http.request.host = %host,
        http.response.status_code = status.as_u16(),
        http.server.request.duration = duration_ms,
        http.log.level = %level.as_str().to_ascii_lowercase(),
        "Incoming request:"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, middleware, routing::get};
    use serde_json::Value;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn records(&self) -> Vec<Value> {
            let contents = String::from_utf8(self.0.lock().unwrap().clone()).unwrap();
            contents
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(|line| serde_json::from_str(line).unwrap())
                .collect()
        }
    }

    #[test]
    fn test_severity_for_status() {
        assert_eq!(severity_for_status(StatusCode::OK), Level::INFO);
        assert_eq!(severity_for_status(StatusCode::CREATED), Level::INFO);
        assert_eq!(severity_for_status(StatusCode::NO_CONTENT), Level::INFO);
        assert_eq!(severity_for_status(StatusCode::MOVED_PERMANENTLY), Level::INFO);
        assert_eq!(severity_for_status(StatusCode::BAD_REQUEST), Level::WARN);
        assert_eq!(severity_for_status(StatusCode::NOT_FOUND), Level::WARN);
        assert_eq!(severity_for_status(StatusCode::CONFLICT), Level::WARN);
        assert_eq!(severity_for_status(StatusCode::INTERNAL_SERVER_ERROR), Level::ERROR);
        assert_eq!(severity_for_status(StatusCode::SERVICE_UNAVAILABLE), Level::ERROR);
    }

    #[tokio::test]
    async fn test_logger_does_not_alter_responses() {
        let app = Router::new()
            .route("/ok", get(|| async { "fine" }))
            .route(
                "/boom",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            )
            .layer(middleware::from_fn(request_logger));

        for (uri, expected) in [
            ("/ok", StatusCode::OK),
            ("/boom", StatusCode::INTERNAL_SERVER_ERROR),
            ("/missing", StatusCode::NOT_FOUND),
        ] {
            let response = app
                .clone()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), expected, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_one_record_per_request_with_route_and_severity() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .flatten_event(true)
            .with_max_level(Level::INFO)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let app = Router::new()
            .route("/api/v1/users/id/{id}", get(|| async { "user" }))
            .layer(middleware::from_fn(request_logger));

        for uri in ["/api/v1/users/id/7", "/nope"] {
            app.clone()
                .oneshot(
                    Request::get(uri)
                        .header(HOST, "users.test")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
        }

        let records = logs.records();
        assert_eq!(records.len(), 2);

        let matched = &records[0];
        assert_eq!(matched["message"], "Incoming request:");
        assert_eq!(matched["level"], "INFO");
        assert_eq!(matched["http.request.method"], "GET");
        assert_eq!(matched["http.route"], "/api/v1/users/id/{id}");
        assert_eq!(matched["server.address"], "/api/v1/users/id/7");
        assert_eq!(matched["http.request.host"], "users.test");
        assert_eq!(matched["http.response.status_code"], 200);
        assert_eq!(matched["http.log.level"], "info");
        assert!(matched["http.server.request.duration"].as_f64().unwrap() >= 0.0);

        let unmatched = &records[1];
        assert_eq!(unmatched["level"], "WARN");
        assert_eq!(unmatched["http.route"], "/nope");
        assert_eq!(unmatched["http.response.status_code"], 404);
        assert_eq!(unmatched["http.log.level"], "warn");
    }
}
