use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Wire shape of a person, in and out.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct PersonDoc {
    /// Assigned by the store; ignored on create.
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub age: f64,
    pub email: String,
}

#[derive(ToSchema)]
pub struct PersonResponseDoc {
    pub status: String,
    pub data: Option<PersonDoc>,
    pub error: Option<String>,
}

#[derive(ToSchema)]
pub struct PersonListResponseDoc {
    pub status: String,
    pub data: Option<Vec<PersonDoc>>,
    pub error: Option<String>,
}

#[derive(ToSchema)]
pub struct ErrorResponseDoc {
    pub status: String,
    pub data: Option<String>,
    pub error: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::persons::list_persons,
        crate::routes::persons::get_person,
        crate::routes::persons::add_person,
        crate::routes::persons::update_person,
        crate::routes::persons::delete_person,
    ),
    components(
        schemas(
            HealthResponse,
            PersonDoc,
            PersonResponseDoc,
            PersonListResponseDoc,
            ErrorResponseDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "persons", description = "Person resource CRUD"),
    )
)]
pub struct ApiDoc;
