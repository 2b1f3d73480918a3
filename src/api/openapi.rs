//! OpenAPI documentation

use axum::Json;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};

use crate::api::{accounts, comments, health, library, posts};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Quill API",
        version = "1.0.0",
        description = "Social posts, comments and follows, plus library catalog administration",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api", description = "JSON API")
    ),
    paths(
        // Health
        health::health_check,
        // Accounts
        accounts::register,
        accounts::login,
        accounts::get_profile,
        accounts::update_profile,
        accounts::get_account,
        accounts::follow,
        accounts::unfollow,
        accounts::set_role,
        accounts::grant_permission,
        accounts::revoke_permission,
        // Posts
        posts::list_posts,
        posts::create_post,
        posts::get_post,
        posts::replace_post,
        posts::patch_post,
        posts::delete_post,
        posts::feed,
        // Comments
        comments::list_comments,
        comments::create_comment,
        comments::get_comment,
        comments::replace_comment,
        comments::patch_comment,
        comments::delete_comment,
        // Library
        library::list_books,
        library::list_authors,
        library::create_author,
        library::author_books,
        library::delete_author,
        library::list_libraries,
        library::create_library,
        library::get_library,
        library::delete_library,
        library::link_book,
        library::unlink_book,
        library::assign_librarian,
    ),
    components(
        schemas(
            // Accounts
            crate::models::account::Role,
            crate::models::account::AccountDetail,
            crate::models::account::RegisterRequest,
            crate::models::account::RegisterResponse,
            crate::models::account::LoginRequest,
            crate::models::account::LoginResponse,
            crate::models::account::UpdateAccount,
            crate::models::account::UpdateRole,
            crate::models::account::GrantPermission,
            // Posts & comments
            crate::models::social::Post,
            crate::models::social::Comment,
            crate::models::social::CreatePost,
            crate::models::social::PatchPost,
            crate::models::social::CreateComment,
            crate::models::social::PatchComment,
            crate::models::pagination::PostPage,
            crate::models::pagination::CommentPage,
            // Library
            crate::models::library::Author,
            crate::models::library::Book,
            crate::models::library::Library,
            crate::models::library::Librarian,
            crate::models::library::LibraryDetail,
            crate::models::library::CreateAuthor,
            crate::models::library::CreateLibrary,
            crate::models::library::LinkBook,
            crate::models::library::AssignLibrarian,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "accounts", description = "Registration, tokens, profiles and follows"),
        (name = "posts", description = "Posts and the follow feed"),
        (name = "comments", description = "Comments on posts"),
        (name = "library", description = "Library catalog administration")
    )
)]
pub struct ApiDoc;

/// `Authorization: Token <key>` scheme referenced by protected paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "token_auth",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("Authorization"))),
            );
        }
    }
}

/// Serve the generated OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
