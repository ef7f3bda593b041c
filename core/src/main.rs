mod cors;

use std::sync::Arc;

use actix_web::{App, HttpResponse, HttpServer, web};
use api_auth::middleware::auth::AuthMiddleware;
use api_company::services::assets::{CloudinaryHost, ImageHost};
use common::env_config::Config;

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Backend server is running. Please use the API endpoints.",
    }))
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "ok": true }))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "success": false,
        "message": "Route not found",
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // get env vars
    let config = Config::from_env();
    let config_data = config.clone();

    // init logger
    if config.console_logging_enabled {
        logger::setup().expect("Failed to set up logger");
    }

    // init db connection, creating the database and running migrations
    let pool = db::setup(&config.database_url, config.database_require_ssl)
        .await
        .expect("Failed to connect to database");

    // select collaborators once at startup and inject them
    let identity = api_auth::services::identity::select_provider(&config);
    let image_host: Arc<dyn ImageHost> = Arc::new(CloudinaryHost::from_config(&config.cloudinary));

    let origins = config.cors_allowed_origins.clone();
    let jwt_secret = config.jwt_config.secret.clone();

    log::info!(
        "Server starting on {}:{}",
        config.server_host,
        config.server_port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(logger::middleware())
            .wrap(cors::default(&origins))
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_data.clone()))
            .app_data(web::Data::from(identity.clone()))
            .app_data(web::Data::from(image_host.clone()))
            .route("/", web::get().to(index))
            .route("/health", web::get().to(health))
            .service(
                web::scope("/api")
                    .service(api_auth::mount::mount())
                    .service(
                        api_company::mount::mount().wrap(AuthMiddleware::new(jwt_secret.clone())),
                    ),
            )
            .default_service(web::route().to(not_found))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .workers(config.num_workers)
    .run()
    .await
}
