//! Session-based authentication and authorization guards for Rocket routes.
//!
//! ```rust,ignore
//! #[get("/me")]
//! fn me(auth: AuthenticatedEmployee) -> String {
//!     format!("Hello, {}", auth.employee.name)
//! }
//!
//! #[delete("/lancamentos/<id>")]
//! fn remove(auth: AdminEmployee, id: i32) -> ...
//! ```

use chrono::Utc;
use diesel::prelude::*;
use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::request::{self, FromRequest, Request};

use crate::DbConn;
use crate::models::{Company, Employee, Role, Session};
use crate::orm::employee::get_employee_with_company;
use crate::orm::login::SESSION_COOKIE;
use crate::schema::sessions;

/// A request guard for routes that require a logged-in employee.
///
/// Succeeds when the `session` cookie names a session that exists, is not
/// revoked and has not expired. Fails with 401 otherwise, and with 500 when
/// no database connection can be obtained.
#[derive(Debug)]
pub struct AuthenticatedEmployee {
    pub employee: Employee,
    /// The employer, loaded alongside so handlers can check company scope.
    pub company: Company,
    /// Token of the session that authenticated this request.
    pub session_id: String,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedEmployee {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let db = match request.guard::<DbConn>().await {
            Outcome::Success(db) => db,
            _ => return Outcome::Error((Status::InternalServerError, ())),
        };

        let session_id = match request.cookies().get(SESSION_COOKIE) {
            Some(cookie) => cookie.value().to_string(),
            None => return Outcome::Error((Status::Unauthorized, ())),
        };

        let lookup_id = session_id.clone();
        let result = db
            .run(move |conn| {
                let session = sessions::table
                    .filter(sessions::id.eq(&lookup_id))
                    .filter(sessions::revoked.eq(false))
                    .filter(
                        sessions::expires_at
                            .is_null()
                            .or(sessions::expires_at.gt(Utc::now().naive_utc())),
                    )
                    .first::<Session>(conn)
                    .optional()?;
                match session {
                    Some(session) => get_employee_with_company(conn, session.employee_id),
                    None => Ok(None),
                }
            })
            .await;

        match result {
            Ok(Some((employee, company))) => Outcome::Success(AuthenticatedEmployee {
                employee,
                company,
                session_id,
            }),
            Ok(None) => Outcome::Error((Status::Unauthorized, ())),
            Err(e) => {
                error!("Database error resolving session: {:?}", e);
                Outcome::Error((Status::Unauthorized, ()))
            }
        }
    }
}

impl AuthenticatedEmployee {
    pub fn is_admin(&self) -> bool {
        self.employee.role == Role::Admin
    }

    /// True when this employee may read or change data owned by `owner`:
    /// it is themself, or they administer the owner's company.
    pub fn can_manage(&self, owner: &Employee) -> bool {
        self.employee.id == owner.id
            || (self.is_admin() && self.employee.company_id == owner.company_id)
    }
}

/// Builds a guard that requires a specific role on top of authentication.
/// Authenticated employees without the role get 403.
macro_rules! create_role_guard {
    ($name:ident, $role:expr) => {
        #[derive(Debug)]
        pub struct $name {
            pub employee: Employee,
            pub company: Company,
        }

        #[rocket::async_trait]
        impl<'r> FromRequest<'r> for $name {
            type Error = ();

            async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
                let auth = match AuthenticatedEmployee::from_request(request).await {
                    Outcome::Success(auth) => auth,
                    Outcome::Error(e) => return Outcome::Error(e),
                    Outcome::Forward(f) => return Outcome::Forward(f),
                };

                if auth.employee.role == $role {
                    Outcome::Success($name {
                        employee: auth.employee,
                        company: auth.company,
                    })
                } else {
                    Outcome::Error((Status::Forbidden, ()))
                }
            }
        }
    };
}

create_role_guard!(AdminEmployee, Role::Admin);
