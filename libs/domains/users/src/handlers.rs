use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    IdPath, JsonBody,
    errors::responses::{
        BadRequestResponse, ConflictResponse, ForbiddenResponse, InternalServerErrorResponse,
        NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{User, UserInput};
use crate::repository::UserRepository;
use crate::service::UserService;

pub const BASE_PATH: &str = "/api/v1/users";
const TAG: &str = "users";

struct ApiKeyAddon;

impl Modify for ApiKeyAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "ApiKey",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "X-API-Key",
                "Shared API key. Not enforced when the server has no key configured.",
            ))),
        );
    }
}

/// OpenAPI documentation for Users API
#[derive(OpenApi)]
#[openapi(
    modifiers(&ApiKeyAddon),
    security(("ApiKey" = [])),
    paths(
        list_users,
        create_user,
        get_user_by_username,
        get_user_by_id,
        get_user_by_uuid,
        update_user,
        delete_user,
    ),
    components(
        schemas(User, UserInput),
        responses(
            BadRequestResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            NotFoundResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "User management endpoints")
    )
)]
pub struct ApiDoc;

type SharedService<R> = Arc<UserService<R>>;

/// Create the users router with all HTTP endpoints under [`BASE_PATH`].
///
/// List and create answer both with and without the trailing slash.
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route(BASE_PATH, get(list_users).post(create_user))
        .route(&format!("{BASE_PATH}/"), get(list_users).post(create_user))
        .route(
            &format!("{BASE_PATH}/username/{{username}}"),
            get(get_user_by_username),
        )
        .route(&format!("{BASE_PATH}/id/{{id}}"), get(get_user_by_id))
        .route(
            &format!("{BASE_PATH}/{{uuid}}"),
            get(get_user_by_uuid).patch(update_user).delete(delete_user),
        )
        .with_state(shared_service)
}

/// A string that is not a UUID cannot name a stored user.
fn parse_uuid(raw: &str) -> UserResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| UserError::NotFound(format!("uuid {}", raw)))
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = TAG,
    responses(
        (status = 200, description = "All users, possibly empty", body = Vec<User>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<SharedService<R>>,
) -> UserResult<Json<Vec<User>>> {
    let users = service.list_users().await?;
    Ok(Json(users))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = TAG,
    request_body = UserInput,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<SharedService<R>>,
    JsonBody(input): JsonBody<UserInput>,
) -> UserResult<impl IntoResponse> {
    let user = service.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a user by username
#[utoipa::path(
    get,
    path = "/api/v1/users/username/{username}",
    tag = TAG,
    params(
        ("username" = String, Path, description = "Exact username")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user_by_username<R: UserRepository>(
    State(service): State<SharedService<R>>,
    Path(username): Path<String>,
) -> UserResult<Json<User>> {
    let user = service.get_user_by_username(&username).await?;
    Ok(Json(user))
}

/// Get a user by numeric id
#[utoipa::path(
    get,
    path = "/api/v1/users/id/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Numeric user id")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user_by_id<R: UserRepository>(
    State(service): State<SharedService<R>>,
    IdPath(id): IdPath,
) -> UserResult<Json<User>> {
    let user = service.get_user_by_id(id).await?;
    Ok(Json(user))
}

/// Get a user by uuid
#[utoipa::path(
    get,
    path = "/api/v1/users/{uuid}",
    tag = TAG,
    params(
        ("uuid" = Uuid, Path, description = "Public user identifier")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user_by_uuid<R: UserRepository>(
    State(service): State<SharedService<R>>,
    Path(uuid): Path<String>,
) -> UserResult<Json<User>> {
    let user = service.get_user_by_uuid(parse_uuid(&uuid)?).await?;
    Ok(Json(user))
}

/// Replace a user's username, email and full name
#[utoipa::path(
    patch,
    path = "/api/v1/users/{uuid}",
    tag = TAG,
    params(
        ("uuid" = Uuid, Path, description = "Public user identifier")
    ),
    request_body = UserInput,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<SharedService<R>>,
    Path(uuid): Path<String>,
    JsonBody(input): JsonBody<UserInput>,
) -> UserResult<Json<User>> {
    let user = service.update_user(parse_uuid(&uuid)?, input).await?;
    Ok(Json(user))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/v1/users/{uuid}",
    tag = TAG,
    params(
        ("uuid" = Uuid, Path, description = "Public user identifier")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<SharedService<R>>,
    Path(uuid): Path<String>,
) -> UserResult<StatusCode> {
    service.delete_user(parse_uuid(&uuid)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
