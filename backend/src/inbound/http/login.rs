//! Login API handlers.
//!
//! ```text
//! POST /api/v1/login/access-token  username=bob@example.com&password=...
//! POST /api/v1/login/test-token
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::domain::{Error, LoginCredentials, LoginValidationError, ops};
use crate::inbound::http::auth::CurrentUser;
use crate::inbound::http::schemas::{Token, UserPublic};
use crate::inbound::http::state::AppState;
use crate::inbound::http::ApiResult;

/// Form body for `POST /login/access-token` (OAuth2 password grant shape).
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessTokenForm {
    pub username: String,
    pub password: String,
}

impl TryFrom<AccessTokenForm> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: AccessTokenForm) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "empty_username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Exchange email and password for a bearer access token.
#[post("/login/access-token")]
pub async fn access_token(
    state: web::Data<AppState>,
    form: web::Form<AccessTokenForm>,
) -> ApiResult<web::Json<Token>> {
    let credentials =
        LoginCredentials::try_from(form.into_inner()).map_err(map_login_validation_error)?;
    let token = ops::login(&state.store, &state.tokens, &credentials, state.token_ttl)?;
    info!(email = %credentials.email(), "access token issued");
    Ok(web::Json(Token::bearer(token)))
}

/// Echo the authenticated user; lets clients check a stored token.
#[post("/login/test-token")]
pub async fn test_token(user: CurrentUser) -> ApiResult<web::Json<UserPublic>> {
    Ok(web::Json(UserPublic::from(user.into_inner())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{spawn_user, test_state};
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, App};
    use rstest::rstest;
    use serde_json::Value;

    #[actix_web::test]
    async fn issues_a_token_that_test_token_accepts() {
        let state = test_state();
        spawn_user(&state, "bob@example.com", "secret123", false);
        let app = actix_test::init_service(
            App::new()
                .app_data(state.clone())
                .service(access_token)
                .service(test_token),
        )
        .await;

        let request = actix_test::TestRequest::post()
            .uri("/login/access-token")
            .set_form(AccessTokenForm {
                username: "bob@example.com".into(),
                password: "secret123".into(),
            })
            .to_request();
        let body: Token = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(body.token_type, "bearer");

        let request = actix_test::TestRequest::post()
            .uri("/login/test-token")
            .insert_header(("Authorization", format!("Bearer {}", body.access_token)))
            .to_request();
        let user: UserPublic = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(user.email, "bob@example.com");
    }

    #[actix_web::test]
    async fn wrong_password_is_rejected_with_a_single_message() {
        let state = test_state();
        spawn_user(&state, "bob@example.com", "secret123", false);
        let app =
            actix_test::init_service(App::new().app_data(state).service(access_token)).await;

        let request = actix_test::TestRequest::post()
            .uri("/login/access-token")
            .set_form(AccessTokenForm {
                username: "bob@example.com".into(),
                password: "wrongpass".into(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("Incorrect email or password")
        );
    }

    #[actix_web::test]
    async fn test_token_requires_a_bearer_header() {
        let state = test_state();
        let app = actix_test::init_service(App::new().app_data(state).service(test_token)).await;
        let request = actix_test::TestRequest::post()
            .uri("/login/test-token")
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    fn empty_form_fields_map_to_invalid_request() {
        let err = map_login_validation_error(LoginValidationError::EmptyEmail);
        assert_eq!(err.message(), "username must not be empty");
    }
}
