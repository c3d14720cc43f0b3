//! Service utility handlers.
//!
//! ```text
//! GET /api/v1/utils/health-check
//! GET /api/v1/utils/debug-seed
//! GET /api/v1/utils/whoami
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};

use crate::inbound::http::auth::CurrentUser;
use crate::inbound::http::schemas::StoreCounts;
use crate::inbound::http::state::AppState;
use crate::inbound::http::ApiResult;

/// Liveness payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Authenticated identity, reduced to the email.
#[derive(Debug, Serialize, Deserialize)]
pub struct WhoAmI {
    pub email: String,
}

/// Liveness endpoint.
#[get("/utils/health-check")]
pub async fn health_check() -> web::Json<HealthStatus> {
    web::Json(HealthStatus {
        status: "ok".into(),
    })
}

/// Record counts without the payloads; unauthenticated debugging aid.
#[get("/utils/debug-seed")]
pub async fn debug_seed(state: web::Data<AppState>) -> web::Json<StoreCounts> {
    web::Json(StoreCounts {
        users: state.store.all_users().len(),
        items: state.store.all_items().len(),
    })
}

/// The email behind the presented token.
#[get("/utils/whoami")]
pub async fn whoami(user: CurrentUser) -> ApiResult<web::Json<WhoAmI>> {
    Ok(web::Json(WhoAmI {
        email: user.into_inner().email().as_str().to_owned(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{bearer_for, spawn_user, test_state};
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, App};

    #[actix_web::test]
    async fn health_check_needs_no_auth() {
        let app = actix_test::init_service(App::new().service(health_check)).await;
        let request = actix_test::TestRequest::get()
            .uri("/utils/health-check")
            .to_request();
        let body: HealthStatus = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(body.status, "ok");
    }

    #[actix_web::test]
    async fn debug_seed_reports_store_counts() {
        let state = test_state();
        spawn_user(&state, "bob@example.com", "secret123", false);
        let app = actix_test::init_service(App::new().app_data(state).service(debug_seed)).await;

        let request = actix_test::TestRequest::get()
            .uri("/utils/debug-seed")
            .to_request();
        let counts: StoreCounts = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!((counts.users, counts.items), (1, 0));
    }

    #[actix_web::test]
    async fn whoami_reports_the_token_subjects_email() {
        let state = test_state();
        let bob = spawn_user(&state, "bob@example.com", "secret123", false);
        let header = bearer_for(&state, &bob);
        let app = actix_test::init_service(App::new().app_data(state).service(whoami)).await;

        let request = actix_test::TestRequest::get()
            .uri("/utils/whoami")
            .insert_header(("Authorization", header))
            .to_request();
        let body: WhoAmI = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(body.email, "bob@example.com");
    }

    #[actix_web::test]
    async fn whoami_rejects_garbage_tokens() {
        let state = test_state();
        let app = actix_test::init_service(App::new().app_data(state).service(whoami)).await;
        let request = actix_test::TestRequest::get()
            .uri("/utils/whoami")
            .insert_header(("Authorization", "Bearer garbage"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
