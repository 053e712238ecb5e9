//! Current user handler.

use axum::{Extension, Json};
use common::jwt::UserView;
use tracing::instrument;

/// Handler for GET /api/v1/me
///
/// Returns the user carried by the verified session token. Requires the
/// auth middleware, which places the `UserView` in request extensions.
///
/// ```json
/// {"userId": "u1", "username": "bob", "email": "b@x.com"}
/// ```
#[instrument(skip_all, name = "portal.me")]
pub async fn get_me(Extension(user): Extension<UserView>) -> Json<UserView> {
    Json(user)
}
