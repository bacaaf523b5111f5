//! Company (PJ) registration endpoints.
//!
//! `POST /api/cadastrar-pj` registers a company on its own.
//! `POST /api/cadastrar-pj/completo` registers a company together with its
//! first employee, who becomes the company's administrator.
//!
//! Both accumulate every validation and conflict message before answering,
//! so a client sees all problems with its request in one round trip.

use diesel::Connection;
use rocket::Route;
use rocket::serde::json;

use super::invalid_body;
use crate::DbConn;
use crate::errors::PersistError;
use crate::logged_json::LoggedJson;
use crate::models::{
    Company, CompanyInput, EmployeeInput, RegistrationInput, RegistrationOutput, Role,
};
use crate::orm::login::hash_password;
use crate::response::{Envelope, ok};
use crate::services::{CompanyService, EmployeeService};
use crate::validation::{messages, normalize_document, validate_company, validate_registration};

/// Register Company endpoint.
///
/// - **URL:** `/api/cadastrar-pj`
/// - **Method:** `POST`
/// - **Authentication:** None required
///
/// # Request Format
///
/// ```json
/// { "taxId": "11222333000181", "legalName": "Acme LLC" }
/// ```
///
/// The tax id may carry the usual `.`, `/` and `-` punctuation; it is stored
/// digits-only.
///
/// # Response
///
/// **Success (HTTP 200 OK):**
/// ```json
/// {
///   "data": {
///     "id": 1,
///     "taxId": "11222333000181",
///     "legalName": "Acme LLC",
///     "createdAt": "2025-01-10T12:00:00",
///     "updatedAt": "2025-01-10T12:00:00"
///   },
///   "errors": []
/// }
/// ```
///
/// **Failure (HTTP 400 Bad Request):**
/// ```json
/// { "data": null, "errors": ["Empresa já existente."] }
/// ```
#[post("/cadastrar-pj", data = "<body>")]
pub async fn register_company(
    db: DbConn,
    body: Result<LoggedJson<CompanyInput>, json::Error<'_>>,
) -> Envelope<Company> {
    info!("Registering company (PJ)");
    let input = match body {
        Ok(body) => body.into_inner(),
        Err(e) => return invalid_body(e),
    };

    let mut errors = validate_company(&input);
    let input = CompanyInput {
        tax_id: normalize_document(&input.tax_id),
        legal_name: input.legal_name.trim().to_string(),
    };

    let result = db
        .run(move |conn| {
            let mut companies = CompanyService::new(conn);
            if !input.tax_id.is_empty() && companies.find_by_tax_id(&input.tax_id)?.is_some() {
                errors.push(messages::COMPANY_EXISTS.to_string());
            }
            if !errors.is_empty() {
                return Err(PersistError::Invalid(errors));
            }
            companies.persist(&input)
        })
        .await;

    match result {
        Ok(company) => {
            info!("Company {} registered with id {}", company.tax_id, company.id);
            ok(company)
        }
        Err(e) => e.into_envelope("Company registration"),
    }
}

/// Full Registration endpoint.
///
/// - **URL:** `/api/cadastrar-pj/completo`
/// - **Method:** `POST`
/// - **Authentication:** None required
///
/// Creates the company and its administrator in one transaction: either
/// both rows are written or neither is.
///
/// # Request Format
///
/// ```json
/// {
///   "name": "Maria Silva",
///   "email": "maria@acme.com",
///   "password": "secret",
///   "personalId": "529.982.247-25",
///   "taxId": "11.222.333/0001-81",
///   "legalName": "Acme LLC"
/// }
/// ```
///
/// # Response
///
/// **Success (HTTP 200 OK):**
/// ```json
/// {
///   "data": {
///     "id": 1,
///     "name": "Maria Silva",
///     "email": "maria@acme.com",
///     "personalId": "52998224725",
///     "legalName": "Acme LLC",
///     "taxId": "11222333000181"
///   },
///   "errors": []
/// }
/// ```
///
/// **Failure (HTTP 400 Bad Request):** every violated constraint plus any of
/// `"Empresa já existente."`, `"CPF já existente."`, `"Email já existente."`.
#[post("/cadastrar-pj/completo", data = "<body>")]
pub async fn register_company_with_admin(
    db: DbConn,
    body: Result<LoggedJson<RegistrationInput>, json::Error<'_>>,
) -> Envelope<RegistrationOutput> {
    info!("Registering company with administrator (PJ)");
    let input = match body {
        Ok(body) => body.into_inner(),
        Err(e) => return invalid_body(e),
    };

    let errors = validate_registration(&input);

    let result = db
        .run(move |conn| {
            conn.transaction::<_, PersistError, _>(|conn| {
                register_in_transaction(conn, input, errors)
            })
        })
        .await;

    match result {
        Ok(output) => {
            info!(
                "Company {} registered with administrator {}",
                output.tax_id, output.email
            );
            ok(output)
        }
        Err(e) => e.into_envelope("Full company registration"),
    }
}

fn register_in_transaction(
    conn: &mut diesel::SqliteConnection,
    input: RegistrationInput,
    mut errors: Vec<String>,
) -> Result<RegistrationOutput, PersistError> {
    let company_input = CompanyInput {
        tax_id: normalize_document(&input.tax_id),
        legal_name: input.legal_name.trim().to_string(),
    };
    let personal_id = normalize_document(&input.personal_id);
    let email = input.email.trim().to_string();

    if !company_input.tax_id.is_empty()
        && CompanyService::new(conn)
            .find_by_tax_id(&company_input.tax_id)?
            .is_some()
    {
        errors.push(messages::COMPANY_EXISTS.to_string());
    }
    {
        let mut employees = EmployeeService::new(conn);
        if !personal_id.is_empty() && employees.find_by_personal_id(&personal_id)?.is_some() {
            errors.push(messages::PERSONAL_ID_EXISTS.to_string());
        }
        if !email.is_empty() && employees.find_by_email(&email)?.is_some() {
            errors.push(messages::EMAIL_EXISTS.to_string());
        }
    }
    if !errors.is_empty() {
        return Err(PersistError::Invalid(errors));
    }

    let company = CompanyService::new(conn).persist(&company_input)?;
    let employee = EmployeeService::new(conn).persist(EmployeeInput {
        name: input.name.trim().to_string(),
        email,
        password_hash: hash_password(&input.password)?,
        personal_id,
        role: Role::Admin,
        hourly_rate: None,
        daily_work_hours: None,
        lunch_hours: None,
        company_id: company.id,
    })?;

    Ok(RegistrationOutput::from_saved(&employee, &company))
}

pub fn routes() -> Vec<Route> {
    routes![register_company, register_company_with_admin]
}
