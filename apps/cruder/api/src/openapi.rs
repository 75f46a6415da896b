use utoipa::OpenApi;

/// OpenAPI document served at `/api-docs/openapi.json`.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        let mut doc = domain_users::ApiDoc::openapi();
        doc.info.title = "cruder API".to_string();
        doc.info.version = env!("CARGO_PKG_VERSION").to_string();
        doc.info.description = Some("CRUD over users, guarded by an optional X-API-Key.".to_string());
        doc
    }
}
