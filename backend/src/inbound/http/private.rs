//! Local-environment tooling endpoints.
//!
//! ```text
//! POST /api/v1/private/reset-mock-data
//! GET /api/v1/private/mock-summary
//! GET /api/v1/private/all-users
//! GET /api/v1/private/all-items
//! ```
//!
//! These routes are only registered when the process runs in the `local`
//! environment; they are unauthenticated and exist for frontend fixtures
//! and debugging.

use actix_web::{get, post, web};
use tracing::info;

use crate::inbound::http::schemas::{ItemPublic, Message, StoreCounts, UserPublic};
use crate::inbound::http::state::AppState;
use crate::inbound::http::ApiResult;

/// Drop everything and restore the fixed development fixture.
#[post("/private/reset-mock-data")]
pub async fn reset_mock_data(state: web::Data<AppState>) -> ApiResult<web::Json<Message>> {
    state.store.reset(&state.seed)?;
    info!("mock data reset to fixture");
    Ok(web::Json(Message::new("Mock data reset")))
}

/// Record counts without the payloads.
#[get("/private/mock-summary")]
pub async fn mock_summary(state: web::Data<AppState>) -> web::Json<StoreCounts> {
    web::Json(StoreCounts {
        users: state.store.all_users().len(),
        items: state.store.all_items().len(),
    })
}

/// Every user, unordered.
#[get("/private/all-users")]
pub async fn all_users(state: web::Data<AppState>) -> web::Json<Vec<UserPublic>> {
    web::Json(state.store.all_users().iter().map(UserPublic::from).collect())
}

/// Every item, unordered.
#[get("/private/all-items")]
pub async fn all_items(state: web::Data<AppState>) -> web::Json<Vec<ItemPublic>> {
    web::Json(state.store.all_items().iter().map(ItemPublic::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{spawn_user, test_state};
    use actix_web::{test as actix_test, App};

    #[actix_web::test]
    async fn reset_restores_the_fixture() {
        let state = test_state();
        spawn_user(&state, "extra@example.com", "secret123", false);
        let app = actix_test::init_service(
            App::new()
                .app_data(state.clone())
                .service(reset_mock_data)
                .service(mock_summary),
        )
        .await;

        let request = actix_test::TestRequest::post()
            .uri("/private/reset-mock-data")
            .to_request();
        let body: Message = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(body.message, "Mock data reset");

        let request = actix_test::TestRequest::get()
            .uri("/private/mock-summary")
            .to_request();
        let summary: StoreCounts = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!((summary.users, summary.items), (2, 3));
        assert!(state.store.get_user_by_email("extra@example.com").is_none());
    }

    #[actix_web::test]
    async fn snapshots_list_every_record() {
        let state = test_state();
        spawn_user(&state, "bob@example.com", "secret123", false);
        let app = actix_test::init_service(
            App::new()
                .app_data(state)
                .service(all_users)
                .service(all_items),
        )
        .await;

        let request = actix_test::TestRequest::get()
            .uri("/private/all-users")
            .to_request();
        let users: Vec<UserPublic> = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(users.len(), 1);

        let request = actix_test::TestRequest::get()
            .uri("/private/all-items")
            .to_request();
        let items: Vec<ItemPublic> = actix_test::call_and_read_body_json(&app, request).await;
        assert!(items.is_empty());
    }
}
