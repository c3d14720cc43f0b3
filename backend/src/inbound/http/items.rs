//! Items API handlers.
//!
//! ```text
//! GET/POST /api/v1/items
//! GET/PATCH/DELETE /api/v1/items/{id}
//! ```
//!
//! Visibility is owner-scoped: superusers operate on every item, everyone
//! else only on their own. The ownership rules live in `domain::ops`; these
//! handlers only translate payloads.

use actix_web::{delete, get, patch, post, web, HttpResponse};
use tracing::info;
use uuid::Uuid;

use crate::domain::{ops, ItemCreate, ItemId, ItemUpdate};
use crate::inbound::http::auth::CurrentUser;
use crate::inbound::http::schemas::{
    ItemCreateRequest, ItemPublic, ItemUpdateRequest, ItemsPublic, ListQuery, Message,
};
use crate::inbound::http::state::AppState;
use crate::inbound::http::ApiResult;

/// List items visible to the requester, newest first.
#[get("/items")]
pub async fn list_items(
    state: web::Data<AppState>,
    user: CurrentUser,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<ItemsPublic>> {
    let query = query.into_inner().validate()?;
    let (data, count) = ops::list_items(&state.store, &user.into_inner(), query.skip, query.limit);
    Ok(web::Json(ItemsPublic {
        data: data.iter().map(ItemPublic::from).collect(),
        count,
    }))
}

/// Create an item owned by the requester.
#[post("/items")]
pub async fn create_item(
    state: web::Data<AppState>,
    user: CurrentUser,
    payload: web::Json<ItemCreateRequest>,
) -> ApiResult<HttpResponse> {
    let create = ItemCreate::try_from(payload.into_inner())?;
    let item = ops::create_item(&state.store, &user.into_inner(), create);
    info!(item_id = %item.id(), owner_id = %item.owner_id(), "item created");
    Ok(HttpResponse::Created().json(ItemPublic::from(item)))
}

/// Fetch one item the requester can access.
#[get("/items/{item_id}")]
pub async fn read_item(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<ItemPublic>> {
    let id = ItemId::from(path.into_inner());
    let item = ops::read_item(&state.store, &user.into_inner(), id)?;
    Ok(web::Json(ItemPublic::from(item)))
}

/// Apply a partial update to an item the requester can access.
#[patch("/items/{item_id}")]
pub async fn update_item(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
    payload: web::Json<ItemUpdateRequest>,
) -> ApiResult<web::Json<ItemPublic>> {
    let id = ItemId::from(path.into_inner());
    let update = ItemUpdate::try_from(payload.into_inner())?;
    let item = ops::update_item(&state.store, &user.into_inner(), id, update)?;
    Ok(web::Json(ItemPublic::from(item)))
}

/// Delete an item the requester can access.
#[delete("/items/{item_id}")]
pub async fn delete_item(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Message>> {
    let id = ItemId::from(path.into_inner());
    ops::delete_item(&state.store, &user.into_inner(), id)?;
    info!(item_id = %id, "item deleted");
    Ok(web::Json(Message::new("Item deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{bearer_for, spawn_user, test_state};
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, App};
    use serde_json::{json, Value};

    async fn service(
        state: web::Data<AppState>,
    ) -> impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    > {
        actix_test::init_service(
            App::new()
                .app_data(state)
                .service(list_items)
                .service(create_item)
                .service(read_item)
                .service(update_item)
                .service(delete_item),
        )
        .await
    }

    #[actix_web::test]
    async fn create_then_read_round_trip() {
        let state = test_state();
        let bob = spawn_user(&state, "bob@example.com", "secret123", false);
        let header = bearer_for(&state, &bob);
        let app = service(state).await;

        let request = actix_test::TestRequest::post()
            .uri("/items")
            .insert_header(("Authorization", header.clone()))
            .set_json(json!({ "title": "Tent", "description": "2-person" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: ItemPublic = actix_test::read_body_json(response).await;
        assert_eq!(created.owner_id, bob.id());

        let request = actix_test::TestRequest::get()
            .uri(&format!("/items/{}", created.id))
            .insert_header(("Authorization", header))
            .to_request();
        let fetched: ItemPublic = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(fetched.title, "Tent");
        assert_eq!(fetched.description.as_deref(), Some("2-person"));
    }

    #[actix_web::test]
    async fn other_owners_items_are_invisible_and_forbidden() {
        let state = test_state();
        let alice = spawn_user(&state, "alice@example.com", "secret123", false);
        let bob = spawn_user(&state, "bob@example.com", "secret123", false);
        let tent = state.store.create_item(
            ItemCreate {
                title: crate::domain::ItemTitle::new("Tent").expect("valid"),
                description: None,
            },
            alice.id(),
        );
        let bob_header = bearer_for(&state, &bob);
        let app = service(state).await;

        let request = actix_test::TestRequest::get()
            .uri("/items")
            .insert_header(("Authorization", bob_header.clone()))
            .to_request();
        let listing: ItemsPublic = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(listing.count, 0, "listing excludes other owners");

        let request = actix_test::TestRequest::get()
            .uri(&format!("/items/{}", tent.id()))
            .insert_header(("Authorization", bob_header))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("Not enough permissions")
        );
    }

    #[actix_web::test]
    async fn superuser_sees_every_item() {
        let state = test_state();
        let alice = spawn_user(&state, "alice@example.com", "secret123", false);
        let admin = spawn_user(&state, "admin@example.com", "secret123", true);
        state.store.create_item(
            ItemCreate {
                title: crate::domain::ItemTitle::new("Tent").expect("valid"),
                description: None,
            },
            alice.id(),
        );
        let header = bearer_for(&state, &admin);
        let app = service(state).await;

        let request = actix_test::TestRequest::get()
            .uri("/items")
            .insert_header(("Authorization", header))
            .to_request();
        let listing: ItemsPublic = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(listing.count, 1);
    }

    #[actix_web::test]
    async fn update_distinguishes_null_description_from_absent() {
        let state = test_state();
        let bob = spawn_user(&state, "bob@example.com", "secret123", false);
        let item = state.store.create_item(
            ItemCreate {
                title: crate::domain::ItemTitle::new("Tent").expect("valid"),
                description: Some("2-person".into()),
            },
            bob.id(),
        );
        let header = bearer_for(&state, &bob);
        let app = service(state).await;

        // Absent description leaves the field alone.
        let request = actix_test::TestRequest::patch()
            .uri(&format!("/items/{}", item.id()))
            .insert_header(("Authorization", header.clone()))
            .set_json(json!({ "title": "Bigger Tent" }))
            .to_request();
        let updated: ItemPublic = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(updated.description.as_deref(), Some("2-person"));

        // Explicit null clears it.
        let request = actix_test::TestRequest::patch()
            .uri(&format!("/items/{}", item.id()))
            .insert_header(("Authorization", header))
            .set_json(json!({ "description": null }))
            .to_request();
        let updated: ItemPublic = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(updated.description, None);
        assert_eq!(updated.title, "Bigger Tent");
    }

    #[actix_web::test]
    async fn missing_item_is_not_found() {
        let state = test_state();
        let bob = spawn_user(&state, "bob@example.com", "secret123", false);
        let header = bearer_for(&state, &bob);
        let app = service(state).await;

        let request = actix_test::TestRequest::get()
            .uri(&format!("/items/{}", Uuid::new_v4()))
            .insert_header(("Authorization", header))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn oversized_limit_is_rejected() {
        let state = test_state();
        let bob = spawn_user(&state, "bob@example.com", "secret123", false);
        let header = bearer_for(&state, &bob);
        let app = service(state).await;

        let request = actix_test::TestRequest::get()
            .uri("/items?limit=101")
            .insert_header(("Authorization", header))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
