use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::config::public_config,
        crate::routes::exams::exams_from_markdown,
    ),
    components(
        schemas(
            HealthResponse,
            common::types::ExamSummary,
            common::types::ExamsFromMarkdown,
            configs::PublicConfig,
        )
    ),
    tags(
        (name = "health"),
        (name = "config"),
        (name = "exams")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        assert!(paths.contains_key("/health"));
        assert!(paths.contains_key("/api/config/public"));
        assert!(paths.contains_key("/api/admin/exams/from-markdown"));
    }

    #[test]
    fn schemas_come_from_shared_types() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let schemas = &doc["components"]["schemas"];
        assert!(schemas["ExamSummary"]["properties"]["questionCount"].is_object());
        assert!(schemas["ExamsFromMarkdown"]["properties"]["exams"].is_object());
        assert!(schemas["PublicConfig"]["properties"]["supabaseAnonKey"].is_object());
        assert!(schemas["PublicConfig"]["properties"].get("supabaseServiceRoleKey").is_none());
    }
}
