mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{App, HttpResponse, HttpServer, web};
use serde_json::json;

use crate::application::auth_service::AuthService;
use crate::application::invoice_service::InvoiceService;
use crate::data::invoice_repository::PostgresInvoiceRepository;
use crate::data::user_repository::PostgresUserRepository;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::database::{create_pool, run_migrations};
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::security::JwtKeys;
use crate::presentation::middleware::{BearerAuthMiddleware, TelemetryMiddleware};
use crate::presentation::{handlers, spa};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_logging();

    let config = AppConfig::from_env().expect("invalid configuration");
    let pool = create_pool(&config.database_url)
        .await
        .expect("failed to connect to database");
    run_migrations(&pool)
        .await
        .expect("failed to run migrations");

    let user_repo = Arc::new(PostgresUserRepository::new(pool.clone()));
    let invoice_repo = Arc::new(PostgresInvoiceRepository::new(pool.clone()));

    let auth_service = AuthService::new(
        Arc::clone(&user_repo),
        JwtKeys::new(config.jwt_secret.clone(), config.token_ttl_hours),
    );
    let invoice_service = InvoiceService::new(Arc::clone(&invoice_repo));

    if let Some(seed) = &config.seed_user {
        auth_service
            .provision_user(&seed.email, &seed.password)
            .await
            .expect("failed to provision seed user");
    }

    let config_data = config.clone();

    HttpServer::new(move || {
        let cors = build_cors(&config_data);
        App::new()
            .wrap(Logger::default())
            .wrap(TelemetryMiddleware)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer")),
            )
            .wrap(cors)
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                let message = err.to_string();
                actix_web::error::InternalError::from_response(
                    err,
                    HttpResponse::BadRequest()
                        .json(json!({ "success": false, "message": message })),
                )
                .into()
            }))
            .app_data(web::Data::new(invoice_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .service(
                web::scope("/api")
                    .service(handlers::auth::sign_in)
                    .service(
                        web::scope("/invoices")
                            .wrap(BearerAuthMiddleware::new(auth_service.keys().clone()))
                            .service(handlers::invoice::create_invoice)
                            .service(handlers::invoice::list_invoices),
                    ),
            )
            .default_service(web::to(spa::index))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

fn build_cors(config: &AppConfig) -> Cors {
    // CORS-open by default; explicit origins via CORS_ORIGINS.
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .max_age(3600);

    if config.cors_origins.iter().any(|origin| origin == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.cors_origins {
            cors = cors.allowed_origin(origin);
        }
        cors = cors.supports_credentials();
    }

    cors
}
