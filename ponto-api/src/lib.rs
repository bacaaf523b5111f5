#[macro_use]
extern crate rocket;

use rocket::figment::value::{Map, Value};
use rocket::figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use rocket::http::Status;
use rocket::request::Request;
use rocket::serde::json::Json;
use rocket::{Build, Rocket};
use rocket_cors::{AllowedOrigins, CorsOptions};

pub mod api;
pub mod errors;
pub mod logged_json;
pub mod models;
pub mod orm;
pub use orm::DbConn;
pub mod response;
pub mod schema;
pub mod services;
pub mod session_guards;
pub mod validation;

#[cfg(test)]
pub mod generate_types;

use response::ApiResponse;
use validation::messages;

fn envelope(message: impl Into<String>) -> Json<ApiResponse<()>> {
    Json(ApiResponse::error(message))
}

#[catch(400)]
fn bad_request(_req: &Request) -> Json<ApiResponse<()>> {
    envelope(messages::INVALID_REQUEST)
}

#[catch(401)]
fn unauthorized(_req: &Request) -> Json<ApiResponse<()>> {
    envelope(messages::UNAUTHORIZED)
}

#[catch(403)]
fn forbidden(_req: &Request) -> Json<ApiResponse<()>> {
    envelope(messages::FORBIDDEN)
}

#[catch(404)]
fn not_found(req: &Request) -> Json<ApiResponse<()>> {
    info!("No route for {} {}", req.method(), req.uri().path());
    envelope(messages::ROUTE_NOT_FOUND)
}

#[catch(422)]
fn unprocessable_entity(_req: &Request) -> Json<ApiResponse<()>> {
    envelope(messages::INVALID_REQUEST)
}

#[catch(500)]
fn internal_server_error(_req: &Request) -> Json<ApiResponse<()>> {
    envelope(messages::INTERNAL_ERROR)
}

#[catch(default)]
fn default_catcher(status: Status, _req: &Request) -> Json<ApiResponse<()>> {
    envelope(status.reason().unwrap_or("Erro desconhecido.").to_string())
}

/// Mounts every API route under `/api`, registers the envelope catchers and
/// opens CORS to any origin. Shared by the server and `test_rocket()`.
pub fn mount_api_routes(rocket: Rocket<Build>) -> Rocket<Build> {
    let cors = CorsOptions {
        allowed_origins: AllowedOrigins::all(),
        ..Default::default()
    }
    .to_cors();

    let rocket = match cors {
        Ok(cors) => rocket.attach(cors),
        Err(e) => {
            error!("Invalid CORS configuration, CORS disabled: {}", e);
            rocket
        }
    };

    rocket.mount("/api", api::routes()).register(
        "/",
        catchers![
            bad_request,
            unauthorized,
            forbidden,
            not_found,
            unprocessable_entity,
            internal_server_error,
            default_catcher
        ],
    )
}

fn log_rocket_info(rocket: &Rocket<Build>) {
    let figment = rocket.figment();

    if let Ok(address) = figment.extract_inner::<String>("address") {
        info!("Rocket is running at: {}", address);
    }

    if let Ok(port) = figment.extract_inner::<u16>("port") {
        info!("Rocket is listening on port: {}", port);
    }

    match figment.extract_inner::<Map<String, Value>>("databases.sqlite_db") {
        Ok(db_config) => {
            if let Some(Value::String(_, url)) = db_config.get("url") {
                info!("Database URL: {}", url);
            } else {
                warn!("Database URL not found in configuration");
            }
        }
        Err(e) => {
            warn!("Failed to extract database configuration: {}", e);
        }
    }
}

/// Builds the production server: `Rocket.toml`, then `ROCKET_*` variables,
/// then `database_url` as the `sqlite_db` pool URL.
///
/// Tests use `orm::testing::test_rocket()` instead.
pub fn rocket(database_url: &str) -> Rocket<Build> {
    let figment = Figment::from(rocket::Config::default())
        .merge(Toml::file("Rocket.toml").nested())
        .merge(Env::prefixed("ROCKET_").global())
        .merge(("databases.sqlite_db.url", database_url));

    let rocket = rocket::custom(figment)
        .attach(DbConn::fairing())
        .attach(orm::db::set_foreign_keys_fairing())
        .attach(orm::db::run_migrations_fairing());

    log_rocket_info(&rocket);

    mount_api_routes(rocket)
}
