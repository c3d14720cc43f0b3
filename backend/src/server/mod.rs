//! Server construction and middleware wiring.

mod config;

pub use config::{Environment, Settings, SettingsError};

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use tracing::info;

use crate::domain::IdentityStore;
use crate::inbound::http::state::AppState;
use crate::inbound::http::{items, login, private, users, utils};
use crate::middleware::SecurityHeaders;
use crate::domain::TokenCodec;

/// Register every API service under the `/api/v1` prefix.
///
/// Private tooling routes are only mounted when `include_private` is set;
/// the server passes the environment check down here so tests can exercise
/// both shapes.
pub fn api_services(cfg: &mut web::ServiceConfig, include_private: bool) {
    let mut scope = web::scope("/api/v1")
        .service(login::access_token)
        .service(login::test_token)
        .service(users::read_me)
        .service(users::update_me)
        .service(users::update_my_password)
        .service(users::list_users)
        .service(users::create_user)
        .service(users::read_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(items::list_items)
        .service(items::create_item)
        .service(items::read_item)
        .service(items::update_item)
        .service(items::delete_item)
        .service(utils::health_check)
        .service(utils::debug_seed)
        .service(utils::whoami);
    if include_private {
        scope = scope
            .service(private::reset_mock_data)
            .service(private::mock_summary)
            .service(private::all_users)
            .service(private::all_items);
    }
    cfg.service(scope);
}

fn cors_for(origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
        .allow_any_header()
        .supports_credentials()
        .max_age(3600);
    for origin in origins {
        cors = cors.allowed_origin(origin);
    }
    cors
}

/// Build and bind the HTTP server around an existing store.
///
/// The store is created (and seeded) by the caller so its lifetime is not
/// tied to server construction.
pub fn create_server(settings: Settings, store: Arc<IdentityStore>) -> std::io::Result<Server> {
    let state = web::Data::new(AppState::new(
        store,
        TokenCodec::new(settings.secret_key.as_bytes()),
        settings.token_ttl(),
        settings.seed.clone(),
    ));
    let origins = settings.cors_origins();
    let include_private = settings.is_local();
    let hsts = !settings.is_local();

    info!(
        environment = settings.environment.as_str(),
        bind_addr = %settings.bind_addr,
        cors_origins = ?origins,
        "starting server"
    );

    let server = HttpServer::new(move || {
        App::new()
            .wrap(SecurityHeaders::new(hsts))
            .wrap(cors_for(&origins))
            .app_data(state.clone())
            .configure(|cfg| api_services(cfg, include_private))
    })
    .bind(settings.bind_addr)?;
    Ok(server.run())
}
