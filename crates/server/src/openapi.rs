use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ReviewDoc { pub username: String, pub text: String }

#[derive(ToSchema)]
pub struct BookDoc {
    pub isbn: i64,
    pub author: String,
    pub title: String,
    pub reviews: Vec<ReviewDoc>,
}

#[derive(ToSchema)]
pub struct CreateBookRequest { pub isbn: i64, pub author: String, pub title: String }

/// `text` is also accepted as `review`.
#[derive(ToSchema)]
pub struct ReviewRequest { pub username: String, pub text: String }

#[derive(ToSchema)]
pub struct DeleteReviewRequest { pub username: String }

#[derive(ToSchema)]
pub struct RegisterRequest { pub username: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub username: String, pub password: String }

#[derive(ToSchema)]
pub struct UserDoc {
    pub id: String,
    pub username: String,
    pub created_at: String,
}

#[derive(ToSchema)]
pub struct LoginResponse {
    pub id: String,
    pub username: String,
    pub created_at: String,
    pub token: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::books::list,
        crate::routes::books::create,
        crate::routes::books::search,
        crate::routes::books::get,
        crate::routes::books::reviews,
        crate::routes::books::add_review,
        crate::routes::books::update_review,
        crate::routes::books::delete_review,
        crate::routes::users::register,
        crate::routes::users::login,
    ),
    components(
        schemas(
            HealthResponse,
            ReviewDoc,
            BookDoc,
            CreateBookRequest,
            ReviewRequest,
            DeleteReviewRequest,
            RegisterRequest,
            LoginRequest,
            UserDoc,
            LoginResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "books"),
        (name = "reviews"),
        (name = "users")
    )
)]
pub struct ApiDoc;
