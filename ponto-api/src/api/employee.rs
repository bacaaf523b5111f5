//! Employee profile updates.

use rocket::Route;
use rocket::serde::json;

use super::invalid_body;
use crate::DbConn;
use crate::errors::PersistError;
use crate::logged_json::LoggedJson;
use crate::models::{EmployeeChanges, EmployeeOutput, EmployeeUpdateInput};
use crate::orm::login::hash_password;
use crate::response::{Envelope, ok};
use crate::services::EmployeeService;
use crate::session_guards::AuthenticatedEmployee;
use crate::validation::{messages, validate_employee_update};

/// Update Employee endpoint.
///
/// - **URL:** `/api/funcionarios/<id>`
/// - **Method:** `PUT`
/// - **Authentication:** Required; the employee themself or an administrator
///   of the same company
///
/// ```json
/// {
///   "name": "Maria Silva",
///   "email": "maria@acme.com",
///   "password": "new secret",
///   "hourlyRate": 45.0,
///   "dailyWorkHours": 8,
///   "lunchHours": 1
/// }
/// ```
///
/// `password` is optional; when absent or blank the current one is kept.
/// Omitted numeric fields keep their stored values.
#[put("/funcionarios/<id>", data = "<body>")]
pub async fn update_employee(
    db: DbConn,
    id: i32,
    auth: AuthenticatedEmployee,
    body: Result<LoggedJson<EmployeeUpdateInput>, json::Error<'_>>,
) -> Envelope<EmployeeOutput> {
    info!("Updating employee {}", id);
    let input = match body {
        Ok(body) => body.into_inner(),
        Err(e) => return invalid_body(e),
    };

    let mut errors = validate_employee_update(&input);

    let result = db
        .run(move |conn| {
            let mut employees = EmployeeService::new(conn);
            let Some(target) = employees.find_by_id(id)? else {
                return Err(PersistError::NotFound(
                    messages::EMPLOYEE_NOT_FOUND.to_string(),
                ));
            };
            if !auth.can_manage(&target) {
                return Err(PersistError::Forbidden);
            }

            let email = input.email.trim().to_string();
            if !email.is_empty() {
                if let Some(other) = employees.find_by_email(&email)? {
                    if other.id != target.id {
                        errors.push(messages::EMAIL_EXISTS.to_string());
                    }
                }
            }
            if !errors.is_empty() {
                return Err(PersistError::Invalid(errors));
            }

            let password_hash = match input.password.as_deref() {
                Some(password) if !password.trim().is_empty() => Some(hash_password(password)?),
                _ => None,
            };

            employees.update(
                target.id,
                EmployeeChanges {
                    name: Some(input.name.trim().to_string()),
                    email: Some(email),
                    password_hash,
                    hourly_rate: input.hourly_rate,
                    daily_work_hours: input.daily_work_hours,
                    lunch_hours: input.lunch_hours,
                    updated_at: None,
                },
            )
        })
        .await;

    match result {
        Ok(employee) => ok(EmployeeOutput::from(employee)),
        Err(e) => e.into_envelope("Employee update"),
    }
}

pub fn routes() -> Vec<Route> {
    routes![update_employee]
}
