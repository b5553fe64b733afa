use axum::{extract::Request, http::Method, middleware::Next, response::Response};
use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "academy_http_requests_total",
        "HTTP requests by method and status",
        &["method", "status"]
    )
    .expect("register http_requests_total")
});

/// Standard verbs keep their name; extension methods share one series.
pub fn method_label(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::HEAD => "HEAD",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        Method::PATCH => "PATCH",
        Method::OPTIONS => "OPTIONS",
        Method::CONNECT => "CONNECT",
        Method::TRACE => "TRACE",
        _ => "other",
    }
}

/// Middleware counting every response by method and status code.
pub async fn track_requests(req: Request, next: Next) -> Response {
    let method = method_label(req.method());
    let resp = next.run(req).await;
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, resp.status().as_str()])
        .inc();
    resp
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_methods_collapse_to_other() {
        assert_eq!(method_label(&Method::POST), "POST");
        assert_eq!(method_label(&Method::from_bytes(b"ZZ0").unwrap()), "other");
        assert_eq!(method_label(&Method::from_bytes(b"PURGE").unwrap()), "other");
    }
}
