//! Timesheet entries (lançamentos).
//!
//! Every endpoint requires a session. An employee reaches only their own
//! entries; an administrator reaches the entries of anyone in their company.

use diesel::SqliteConnection;
use rocket::Route;
use rocket::serde::json;

use super::{invalid_body, optional_text};
use crate::DbConn;
use crate::errors::PersistError;
use crate::logged_json::LoggedJson;
use crate::models::{Employee, EntryType, NewTimeEntry, TimeEntryChanges, TimeEntryInput, TimeEntryOutput};
use crate::orm::time_entry::{Direction, EntryOrder};
use crate::response::{Envelope, Page, ok};
use crate::services::{EmployeeService, TimeEntryService};
use crate::session_guards::{AdminEmployee, AuthenticatedEmployee};
use crate::validation::{messages, parse_entry_date, validate_time_entry};

pub const DEFAULT_PAGE_SIZE: i64 = 25;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Validated date and type of an entry body. Only called once
/// `validate_time_entry` reported nothing, so both parse.
fn parsed_fields(input: &TimeEntryInput) -> Result<(chrono::NaiveDateTime, EntryType), PersistError> {
    let date = parse_entry_date(&input.date)
        .ok_or_else(|| PersistError::Invalid(vec![messages::DATE_INVALID.to_string()]))?;
    let entry_type = input
        .entry_type
        .trim()
        .parse::<EntryType>()
        .map_err(|_| PersistError::Invalid(vec![messages::ENTRY_TYPE_INVALID.to_string()]))?;
    Ok((date, entry_type))
}

/// Loads the owner of an entry and checks the caller may act on it.
fn owner_checked(
    conn: &mut SqliteConnection,
    auth: &AuthenticatedEmployee,
    employee_id: i32,
) -> Result<Employee, PersistError> {
    match EmployeeService::new(conn).find_by_id(employee_id)? {
        Some(owner) if auth.can_manage(&owner) => Ok(owner),
        Some(_) => Err(PersistError::Forbidden),
        None => Err(PersistError::NotFound(messages::EMPLOYEE_NOT_FOUND.to_string())),
    }
}

/// List Entries By Employee endpoint.
///
/// - **URL:** `/api/lancamentos/funcionario/<employee_id>?pag=0&ord=id&dir=DESC&size=25`
/// - **Method:** `GET`
/// - **Authentication:** Required
///
/// `ord` is `id` or `date`; `dir` is `ASC` or `DESC`. Pages are zero-based.
///
/// ```json
/// {
///   "data": {
///     "content": [{ "id": 3, "date": "2025-03-03 08:00:00", "entryType": "WORK_START",
///                   "description": null, "location": null, "employeeId": 1 }],
///     "totalElements": 1,
///     "totalPages": 1,
///     "number": 0,
///     "size": 25
///   },
///   "errors": []
/// }
/// ```
#[get("/lancamentos/funcionario/<employee_id>?<pag>&<ord>&<dir>&<size>")]
pub async fn list_by_employee(
    db: DbConn,
    employee_id: i32,
    pag: Option<i64>,
    ord: Option<String>,
    dir: Option<String>,
    size: Option<i64>,
    auth: AuthenticatedEmployee,
) -> Envelope<Page<TimeEntryOutput>> {
    let page = pag.unwrap_or(0).max(0);
    let size = size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let order = EntryOrder::from_param(ord.as_deref());
    let direction = Direction::from_param(dir.as_deref());

    let result = db
        .run(move |conn| {
            owner_checked(conn, &auth, employee_id)?;
            Ok::<_, PersistError>(
                TimeEntryService::new(conn).find_by_employee(
                    employee_id,
                    order,
                    direction,
                    page,
                    size,
                )?,
            )
        })
        .await;

    match result {
        Ok(page) => ok(page.map(TimeEntryOutput::from)),
        Err(e) => e.into_envelope("Time entry listing"),
    }
}

/// Get Entry endpoint.
///
/// - **URL:** `/api/lancamentos/<id>`
/// - **Method:** `GET`
/// - **Authentication:** Required
#[get("/lancamentos/<id>")]
pub async fn get_entry(db: DbConn, id: i32, auth: AuthenticatedEmployee) -> Envelope<TimeEntryOutput> {
    let result = db
        .run(move |conn| {
            let Some(entry) = TimeEntryService::new(conn).find_by_id(id)? else {
                return Err(PersistError::NotFound(messages::entry_not_found(id)));
            };
            owner_checked(conn, &auth, entry.employee_id)?;
            Ok(entry)
        })
        .await;

    match result {
        Ok(entry) => ok(TimeEntryOutput::from(entry)),
        Err(e) => e.into_envelope("Time entry lookup"),
    }
}

/// Create Entry endpoint.
///
/// - **URL:** `/api/lancamentos`
/// - **Method:** `POST`
/// - **Authentication:** Required
///
/// ```json
/// {
///   "date": "2025-03-03 08:00:00",
///   "entryType": "WORK_START",
///   "description": "Início do expediente",
///   "location": "-23.5505,-46.6333",
///   "employeeId": 1
/// }
/// ```
#[post("/lancamentos", data = "<body>")]
pub async fn create_entry(
    db: DbConn,
    auth: AuthenticatedEmployee,
    body: Result<LoggedJson<TimeEntryInput>, json::Error<'_>>,
) -> Envelope<TimeEntryOutput> {
    info!("Creating time entry");
    let input = match body {
        Ok(body) => body.into_inner(),
        Err(e) => return invalid_body(e),
    };

    let mut errors = validate_time_entry(&input);

    let result = db
        .run(move |conn| {
            let owner = match input.employee_id {
                Some(employee_id) => EmployeeService::new(conn).find_by_id(employee_id)?,
                None => None,
            };
            if owner.is_none() {
                errors.push(messages::ENTRY_EMPLOYEE_NOT_FOUND.to_string());
            }
            if !errors.is_empty() {
                return Err(PersistError::Invalid(errors));
            }
            let owner = match owner {
                Some(owner) if auth.can_manage(&owner) => owner,
                _ => return Err(PersistError::Forbidden),
            };

            let (date, entry_type) = parsed_fields(&input)?;
            TimeEntryService::new(conn).persist(NewTimeEntry {
                date,
                description: optional_text(input.description),
                location: optional_text(input.location),
                entry_type,
                employee_id: owner.id,
            })
        })
        .await;

    match result {
        Ok(entry) => {
            info!("Time entry {} created for employee {}", entry.id, entry.employee_id);
            ok(TimeEntryOutput::from(entry))
        }
        Err(e) => e.into_envelope("Time entry creation"),
    }
}

/// Update Entry endpoint.
///
/// - **URL:** `/api/lancamentos/<id>`
/// - **Method:** `PUT`
/// - **Authentication:** Required
///
/// Same body as creation. The entry stays with its employee; `employeeId`
/// in the body is ignored.
#[put("/lancamentos/<id>", data = "<body>")]
pub async fn update_entry(
    db: DbConn,
    id: i32,
    auth: AuthenticatedEmployee,
    body: Result<LoggedJson<TimeEntryInput>, json::Error<'_>>,
) -> Envelope<TimeEntryOutput> {
    info!("Updating time entry {}", id);
    let input = match body {
        Ok(body) => body.into_inner(),
        Err(e) => return invalid_body(e),
    };

    let errors = validate_time_entry(&input);

    let result = db
        .run(move |conn| {
            let Some(entry) = TimeEntryService::new(conn).find_by_id(id)? else {
                return Err(PersistError::NotFound(messages::entry_not_found(id)));
            };
            owner_checked(conn, &auth, entry.employee_id)?;
            if !errors.is_empty() {
                return Err(PersistError::Invalid(errors));
            }

            let (date, entry_type) = parsed_fields(&input)?;
            TimeEntryService::new(conn)
                .update(
                    id,
                    TimeEntryChanges {
                        date,
                        description: optional_text(input.description),
                        location: optional_text(input.location),
                        entry_type,
                    },
                )?
                .ok_or_else(|| PersistError::NotFound(messages::entry_not_found(id)))
        })
        .await;

    match result {
        Ok(entry) => ok(TimeEntryOutput::from(entry)),
        Err(e) => e.into_envelope("Time entry update"),
    }
}

/// Delete Entry endpoint.
///
/// - **URL:** `/api/lancamentos/<id>`
/// - **Method:** `DELETE`
/// - **Authentication:** Administrator of the entry owner's company
///
/// Answers with the removed entry.
#[delete("/lancamentos/<id>")]
pub async fn delete_entry(db: DbConn, id: i32, admin: AdminEmployee) -> Envelope<TimeEntryOutput> {
    info!("Removing time entry {}", id);
    let admin_company_id = admin.company.id;

    let result = db
        .run(move |conn| {
            let Some(entry) = TimeEntryService::new(conn).find_by_id(id)? else {
                return Err(PersistError::NotFound(messages::entry_not_removed(id)));
            };
            let owner = EmployeeService::new(conn).find_by_id(entry.employee_id)?;
            if owner.map(|o| o.company_id) != Some(admin_company_id) {
                return Err(PersistError::Forbidden);
            }
            if !TimeEntryService::new(conn).remove(id)? {
                return Err(PersistError::NotFound(messages::entry_not_removed(id)));
            }
            Ok(entry)
        })
        .await;

    match result {
        Ok(entry) => ok(TimeEntryOutput::from(entry)),
        Err(e) => e.into_envelope("Time entry removal"),
    }
}

pub fn routes() -> Vec<Route> {
    routes![list_by_employee, get_entry, create_entry, update_entry, delete_entry]
}
