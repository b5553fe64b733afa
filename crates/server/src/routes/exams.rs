use axum::{
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, warn};

use common::types::ExamsFromMarkdown;

pub const NOT_IMPLEMENTED_MESSAGE: &str =
    "Markdown exam import is not available yet; no exams were created.";

/// Placeholder for the Markdown exam importer.
///
/// GET always succeeds with an empty list, whatever the query or body.
/// Other methods get `405` with `Allow: GET`.
#[utoipa::path(
    get,
    path = "/api/admin/exams/from-markdown",
    tag = "exams",
    responses(
        (status = 200, description = "Import result", body = common::types::ExamsFromMarkdown),
        (status = 405, description = "Method not allowed; `Allow: GET`"),
    )
)]
pub async fn exams_from_markdown(method: Method) -> Response {
    if method != Method::GET {
        warn!(%method, "method not allowed on exams/from-markdown");
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "GET")],
            format!("Method {method} Not Allowed"),
        )
            .into_response();
    }

    debug!("markdown exam import requested");
    Json(ExamsFromMarkdown {
        success: true,
        exams: Vec::new(),
        message: NOT_IMPLEMENTED_MESSAGE.to_string(),
    })
    .into_response()
}
