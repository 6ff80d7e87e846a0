use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, StatusCode},
    Json,
};
use common::types::ApiResponse;
use service::person::PersonDto;
use tracing::info;

use crate::errors::ApiError;
use crate::routes::ServerState;

type Envelope<T> = Json<ApiResponse<T>>;

#[utoipa::path(
    get, path = "/Persons", tag = "persons",
    responses(
        (status = 200, description = "All persons", body = crate::openapi::PersonListResponseDoc),
        (status = 500, description = "Store failure", body = crate::openapi::ErrorResponseDoc)
    )
)]
pub async fn list_persons(State(state): State<ServerState>) -> Result<Envelope<Vec<PersonDto>>, ApiError> {
    let people = state.persons.list_all().await?;
    info!(count = people.len(), "list persons");
    Ok(Json(ApiResponse::success(people)))
}

#[utoipa::path(
    get, path = "/Persons/{id}", tag = "persons",
    params(("id" = i64, Path, description = "Person ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::PersonResponseDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorResponseDoc)
    )
)]
pub async fn get_person(
    State(state): State<ServerState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Envelope<PersonDto>, ApiError> {
    let Path(id) = path?;
    let person = state.persons.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(person)))
}

#[utoipa::path(
    post, path = "/Persons", tag = "persons",
    request_body = crate::openapi::PersonDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::PersonResponseDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorResponseDoc),
        (status = 409, description = "Email already in use", body = crate::openapi::ErrorResponseDoc)
    )
)]
pub async fn add_person(
    State(state): State<ServerState>,
    body: Result<Json<PersonDto>, JsonRejection>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Envelope<PersonDto>), ApiError> {
    let Json(dto) = body?;
    dto.validate()?;
    let created = state.persons.add(dto).await?;
    let id = created.id.ok_or_else(|| ApiError::internal("store returned a person without id"))?;
    info!(id, "created person");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/Persons/{id}"))],
        Json(ApiResponse::success(created)),
    ))
}

#[utoipa::path(
    put, path = "/Persons/{id}", tag = "persons",
    params(("id" = i64, Path, description = "Person ID")),
    request_body = crate::openapi::PersonDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::PersonResponseDoc),
        (status = 400, description = "Validation Error or id mismatch", body = crate::openapi::ErrorResponseDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorResponseDoc),
        (status = 409, description = "Email already in use", body = crate::openapi::ErrorResponseDoc)
    )
)]
pub async fn update_person(
    State(state): State<ServerState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<PersonDto>, JsonRejection>,
) -> Result<Envelope<PersonDto>, ApiError> {
    let Path(id) = path?;
    let Json(dto) = body?;
    dto.validate()?;
    let updated = state.persons.update(dto, id).await?;
    info!(id, "updated person");
    Ok(Json(ApiResponse::success(updated)))
}

#[utoipa::path(
    delete, path = "/Persons/{id}", tag = "persons",
    params(("id" = i64, Path, description = "Person ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorResponseDoc)
    )
)]
pub async fn delete_person(
    State(state): State<ServerState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    state.persons.remove(id).await?;
    info!(id, "deleted person");
    Ok(StatusCode::NO_CONTENT)
}
