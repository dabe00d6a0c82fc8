//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, checkouts, health, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stacks API",
        version = "0.1.0",
        description = "Library Circulation Server REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::create_book,
        books::add_book_copy,
        books::list_book_reservations,
        // Checkouts
        checkouts::checkout_book,
        checkouts::return_checkout,
        checkouts::list_user_checkouts,
        // Users
        users::create_user,
        users::get_user,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::BookCopy,
            crate::models::book::CopyStatus,
            crate::models::book::CreateBook,
            // Checkouts
            crate::models::checkout::Checkout,
            crate::models::checkout::CheckoutOutcome,
            crate::models::checkout::CheckoutRequest,
            // Reservations
            crate::models::reservation::Reservation,
            // Users
            crate::models::user::User,
            crate::models::user::UserRole,
            crate::models::user::CreateUser,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Catalogue and copy management"),
        (name = "checkouts", description = "Checkout and return workflow"),
        (name = "users", description = "User management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
