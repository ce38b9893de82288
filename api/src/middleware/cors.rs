//! CORS configuration for the card app and web clients.
//!
//! Development is permissive. Production only admits the origins listed in
//! `ServerConfig::allowed_origins` plus the local schemes the mobile shells
//! use.

use actix_cors::Cors;
use actix_web::http::{header, Method};

use hc_shared::{Environment, ServerConfig};

/// Creates a CORS middleware instance for the given environment.
pub fn create_cors(server: &ServerConfig, environment: Environment) -> Cors {
    if environment.is_production() {
        create_production_cors(server)
    } else {
        create_development_cors(server.cors_max_age)
    }
}

fn create_development_cors(max_age: usize) -> Cors {
    tracing::info!("Configuring CORS for development environment");

    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::USER_AGENT,
            header::HeaderName::from_static("x-request-id"),
            header::HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(max_age)
}

fn create_production_cors(server: &ServerConfig) -> Cors {
    tracing::info!("Configuring CORS for production environment");

    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-request-id"),
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(server.cors_max_age);

    for origin in server
        .allowed_origins
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
    {
        tracing::info!(origin = origin, "Adding allowed origin");
        cors = cors.allowed_origin(origin);
    }

    // Expo dev client and web preview
    cors = cors.allowed_origin("http://localhost");
    cors = cors.allowed_origin("https://localhost");

    cors
}
