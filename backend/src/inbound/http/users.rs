//! Users API handlers: self-service endpoints plus superuser management.
//!
//! ```text
//! GET/PATCH /api/v1/users/me
//! PATCH /api/v1/users/me/password
//! GET/POST /api/v1/users
//! GET/PATCH/DELETE /api/v1/users/{id}
//! ```

use actix_web::{delete, get, patch, post, web, HttpResponse};
use tracing::info;
use uuid::Uuid;

use crate::domain::{ops, UserCreate, UserId, UserUpdate, UserUpdateMe};
use crate::inbound::http::auth::{CurrentSuperuser, CurrentUser};
use crate::inbound::http::schemas::{
    ListQuery, Message, UpdatePasswordRequest, UserCreateRequest, UserPublic,
    UserUpdateMeRequest, UserUpdateRequest, UsersPublic,
};
use crate::inbound::http::state::AppState;
use crate::inbound::http::ApiResult;

// ------------------------- self-service -------------------------

/// The authenticated user's own record.
#[get("/users/me")]
pub async fn read_me(user: CurrentUser) -> ApiResult<web::Json<UserPublic>> {
    Ok(web::Json(UserPublic::from(user.into_inner())))
}

/// Update the authenticated user's email or display name.
#[patch("/users/me")]
pub async fn update_me(
    state: web::Data<AppState>,
    user: CurrentUser,
    payload: web::Json<UserUpdateMeRequest>,
) -> ApiResult<web::Json<UserPublic>> {
    let update = UserUpdateMe::try_from(payload.into_inner())?;
    let updated = ops::update_me(&state.store, &user.into_inner(), update)?;
    Ok(web::Json(UserPublic::from(updated)))
}

/// Change the authenticated user's password.
#[patch("/users/me/password")]
pub async fn update_my_password(
    state: web::Data<AppState>,
    user: CurrentUser,
    payload: web::Json<UpdatePasswordRequest>,
) -> ApiResult<web::Json<Message>> {
    payload.validate()?;
    ops::change_password(
        &state.store,
        &user.into_inner(),
        &payload.current_password,
        &payload.new_password,
    )?;
    Ok(web::Json(Message::new("Password updated successfully")))
}

// ------------------------- superuser management -------------------------

/// List users, newest first.
#[get("/users")]
pub async fn list_users(
    state: web::Data<AppState>,
    admin: CurrentSuperuser,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<UsersPublic>> {
    let query = query.into_inner().validate()?;
    let (data, count) = ops::list_users(
        &state.store,
        &admin.into_inner(),
        query.skip,
        query.limit,
    )?;
    Ok(web::Json(UsersPublic {
        data: data.iter().map(UserPublic::from).collect(),
        count,
    }))
}

/// Create a user with explicit flags.
#[post("/users")]
pub async fn create_user(
    state: web::Data<AppState>,
    admin: CurrentSuperuser,
    payload: web::Json<UserCreateRequest>,
) -> ApiResult<HttpResponse> {
    let create = UserCreate::try_from(payload.into_inner())?;
    let user = ops::create_user(&state.store, &admin.into_inner(), create)?;
    info!(user_id = %user.id(), "user created");
    Ok(HttpResponse::Created().json(UserPublic::from(user)))
}

/// Fetch a user by id.
#[get("/users/{user_id}")]
pub async fn read_user(
    state: web::Data<AppState>,
    admin: CurrentSuperuser,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<UserPublic>> {
    let id = UserId::from(path.into_inner());
    let found = ops::read_user(&state.store, &admin.into_inner(), id)?;
    Ok(web::Json(UserPublic::from(found)))
}

/// Apply a partial update to any user.
#[patch("/users/{user_id}")]
pub async fn update_user(
    state: web::Data<AppState>,
    admin: CurrentSuperuser,
    path: web::Path<Uuid>,
    payload: web::Json<UserUpdateRequest>,
) -> ApiResult<web::Json<UserPublic>> {
    let id = UserId::from(path.into_inner());
    let update = UserUpdate::try_from(payload.into_inner())?;
    let updated = ops::update_user(&state.store, &admin.into_inner(), id, update)?;
    Ok(web::Json(UserPublic::from(updated)))
}

/// Delete a user and every item they own.
#[delete("/users/{user_id}")]
pub async fn delete_user(
    state: web::Data<AppState>,
    admin: CurrentSuperuser,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Message>> {
    let id = UserId::from(path.into_inner());
    ops::delete_user(&state.store, &admin.into_inner(), id)?;
    info!(user_id = %id, "user deleted");
    Ok(web::Json(Message::new("User deleted successfully")))
}
