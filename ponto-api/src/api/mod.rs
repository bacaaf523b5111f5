pub mod auth;
pub mod cadastro_pf;
pub mod cadastro_pj;
pub mod company;
pub mod employee;
pub mod status;
pub mod time_entry;

use rocket::Route;
use rocket::serde::json;

use crate::response::{Envelope, bad_request};
use crate::validation::messages;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(auth::routes());
    routes.extend(cadastro_pf::routes());
    routes.extend(cadastro_pj::routes());
    routes.extend(company::routes());
    routes.extend(employee::routes());
    routes.extend(status::routes());
    routes.extend(time_entry::routes());
    routes
}

/// 400 envelope for a body that is not valid JSON for the expected shape.
pub(crate) fn invalid_body<T>(e: json::Error<'_>) -> Envelope<T> {
    let detail = match e {
        json::Error::Io(e) => e.to_string(),
        json::Error::Parse(_, e) => e.to_string(),
    };
    warn!("Rejected request body: {}", detail);
    bad_request(vec![format!("{}: {}", messages::INVALID_REQUEST, detail)])
}

/// Trimmed optional text; blank becomes `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
