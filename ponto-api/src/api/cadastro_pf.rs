//! Employee (PF) registration for a company that is already registered.

use rocket::Route;
use rocket::serde::json;

use super::invalid_body;
use crate::DbConn;
use crate::errors::PersistError;
use crate::logged_json::LoggedJson;
use crate::models::{EmployeeInput, EmployeeRegistrationInput, EmployeeRegistrationOutput, Role};
use crate::orm::login::hash_password;
use crate::response::{Envelope, ok};
use crate::services::{CompanyService, EmployeeService};
use crate::validation::{
    is_valid_cnpj, messages, normalize_document, validate_employee_registration,
};

/// Register Employee endpoint.
///
/// - **URL:** `/api/cadastrar-pf`
/// - **Method:** `POST`
/// - **Authentication:** None required
///
/// The employer is identified by its tax id and must already exist. The new
/// employee always gets the `USER` role.
///
/// # Request Format
///
/// ```json
/// {
///   "name": "João Souza",
///   "email": "joao@acme.com",
///   "password": "secret",
///   "personalId": "111.444.777-35",
///   "hourlyRate": 42.5,
///   "dailyWorkHours": 8,
///   "lunchHours": 1,
///   "taxId": "11222333000181"
/// }
/// ```
///
/// **Failure (HTTP 400 Bad Request):** every violated constraint plus any of
/// `"Empresa não cadastrada."`, `"CPF já existente."`, `"Email já existente."`.
#[post("/cadastrar-pf", data = "<body>")]
pub async fn register_employee(
    db: DbConn,
    body: Result<LoggedJson<EmployeeRegistrationInput>, json::Error<'_>>,
) -> Envelope<EmployeeRegistrationOutput> {
    info!("Registering employee (PF)");
    let input = match body {
        Ok(body) => body.into_inner(),
        Err(e) => return invalid_body(e),
    };

    let mut errors = validate_employee_registration(&input);

    let result = db
        .run(move |conn| {
            let tax_id = normalize_document(&input.tax_id);
            let personal_id = normalize_document(&input.personal_id);
            let email = input.email.trim().to_string();

            // An invalid tax id is already reported; looking it up would only
            // add a redundant message.
            let company = if is_valid_cnpj(&tax_id) {
                let found = CompanyService::new(conn).find_by_tax_id(&tax_id)?;
                if found.is_none() {
                    errors.push(messages::COMPANY_NOT_REGISTERED.to_string());
                }
                found
            } else {
                None
            };

            let mut employees = EmployeeService::new(conn);
            if !personal_id.is_empty() && employees.find_by_personal_id(&personal_id)?.is_some() {
                errors.push(messages::PERSONAL_ID_EXISTS.to_string());
            }
            if !email.is_empty() && employees.find_by_email(&email)?.is_some() {
                errors.push(messages::EMAIL_EXISTS.to_string());
            }

            let company = match company {
                Some(company) if errors.is_empty() => company,
                _ => return Err(PersistError::Invalid(errors)),
            };

            let employee = employees.persist(EmployeeInput {
                name: input.name.trim().to_string(),
                email,
                password_hash: hash_password(&input.password)?,
                personal_id,
                role: Role::User,
                hourly_rate: input.hourly_rate,
                daily_work_hours: input.daily_work_hours,
                lunch_hours: input.lunch_hours,
                company_id: company.id,
            })?;

            Ok(EmployeeRegistrationOutput::from_saved(&employee, &company))
        })
        .await;

    match result {
        Ok(output) => {
            info!("Employee {} registered with id {}", output.email, output.id);
            ok(output)
        }
        Err(e) => e.into_envelope("Employee registration"),
    }
}

pub fn routes() -> Vec<Route> {
    routes![register_employee]
}
