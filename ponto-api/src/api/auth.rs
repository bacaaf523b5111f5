//! Login, logout and session introspection.
//!
//! A successful login sets an HTTP-only `session` cookie; every endpoint
//! guarded by `AuthenticatedEmployee` reads it back.

use rocket::Route;
use rocket::http::{Cookie, CookieJar, Status};
use rocket::serde::json;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::invalid_body;
use crate::DbConn;
use crate::errors::database_failure;
use crate::logged_json::LoggedJson;
use crate::models::{Company, Employee, Role};
use crate::orm::login::{SESSION_COOKIE, authenticate, create_and_store_session, set_session_cookie};
use crate::orm::logout::revoke_session;
use crate::response::{Envelope, bad_request, fail, ok};
use crate::session_guards::AuthenticatedEmployee;
use crate::validation::messages;

#[derive(Debug, Clone, Default, Deserialize, Serialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct LoginRequest {
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub password: String,
}

/// Returned by both login and `me`, so a client sees the same shape either way.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LoginResponse {
    pub employee_id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub company_id: i32,
    pub legal_name: String,
}

impl LoginResponse {
    fn new(employee: &Employee, company: &Company) -> Self {
        LoginResponse {
            employee_id: employee.id,
            name: employee.name.clone(),
            email: employee.email.clone(),
            role: employee.role,
            company_id: company.id,
            legal_name: company.legal_name.clone(),
        }
    }
}

/// Login endpoint.
///
/// - **URL:** `/api/auth`
/// - **Method:** `POST`
/// - **Authentication:** None required
///
/// ```json
/// { "email": "maria@acme.com", "password": "secret" }
/// ```
///
/// Unknown email and wrong password get the same 401 answer.
#[post("/auth", data = "<login>")]
pub async fn login(
    db: DbConn,
    cookies: &CookieJar<'_>,
    login: Result<LoggedJson<LoginRequest>, json::Error<'_>>,
) -> Envelope<LoginResponse> {
    let login = match login {
        Ok(login) => login.into_inner(),
        Err(e) => return invalid_body(e),
    };

    if login.email.trim().is_empty() || login.password.trim().is_empty() {
        return bad_request(vec![messages::CREDENTIALS_REQUIRED.to_string()]);
    }

    let result = db
        .run(move |conn| open_session(conn, &login.email, &login.password))
        .await;

    match result {
        Ok(Some((employee, company, token))) => {
            set_session_cookie(cookies, &token);
            info!("Employee {} logged in", employee.email);
            ok(LoginResponse::new(&employee, &company))
        }
        Ok(None) => {
            warn!("Failed login attempt");
            fail(
                Status::Unauthorized,
                vec![messages::INVALID_CREDENTIALS.to_string()],
            )
        }
        Err(e) => database_failure("Login", e),
    }
}

/// Checks the credentials and, when they match, stores a new session.
fn open_session(
    conn: &mut diesel::SqliteConnection,
    email: &str,
    password: &str,
) -> Result<Option<(Employee, Company, String)>, diesel::result::Error> {
    let Some((employee, company)) = authenticate(conn, email, password)? else {
        return Ok(None);
    };
    let token = create_and_store_session(conn, employee.id)?;
    Ok(Some((employee, company, token)))
}

/// Logout endpoint.
///
/// - **URL:** `/api/auth/logout`
/// - **Method:** `POST`
/// - **Authentication:** None required
///
/// Revokes the session named by the cookie, if any, and removes the cookie.
/// Always succeeds.
#[post("/auth/logout")]
pub async fn logout(db: DbConn, cookies: &CookieJar<'_>) -> Envelope<bool> {
    if let Some(cookie) = cookies.get(SESSION_COOKIE) {
        let session_id = cookie.value().to_string();
        match db.run(move |conn| revoke_session(conn, &session_id)).await {
            Ok(_) => info!("Session revoked"),
            Err(e) => error!("Failed to revoke session: {:?}", e),
        }
    }
    cookies.remove(Cookie::build(SESSION_COOKIE).path("/"));
    ok(true)
}

/// Current Session endpoint.
///
/// - **URL:** `/api/auth/me`
/// - **Method:** `GET`
/// - **Authentication:** Required
#[get("/auth/me")]
pub fn me(auth: AuthenticatedEmployee) -> Envelope<LoginResponse> {
    ok(LoginResponse::new(&auth.employee, &auth.company))
}

pub fn routes() -> Vec<Route> {
    routes![login, logout, me]
}
