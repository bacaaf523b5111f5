use chrono::Utc;
use diesel::prelude::*;

use crate::models::{Company, Employee, EmployeeChanges, EmployeeInput, NewEmployee};
use crate::orm::company::last_insert_rowid;

pub fn get_employee_by_id(
    conn: &mut SqliteConnection,
    employee_id: i32,
) -> Result<Option<Employee>, diesel::result::Error> {
    use crate::schema::employees::dsl::*;
    employees.find(employee_id).first::<Employee>(conn).optional()
}

pub fn get_employee_by_email(
    conn: &mut SqliteConnection,
    employee_email: &str,
) -> Result<Option<Employee>, diesel::result::Error> {
    use crate::schema::employees::dsl::*;
    employees
        .filter(email.eq(employee_email))
        .first::<Employee>(conn)
        .optional()
}

/// `employee_personal_id` must be the digits-only CPF.
pub fn get_employee_by_personal_id(
    conn: &mut SqliteConnection,
    employee_personal_id: &str,
) -> Result<Option<Employee>, diesel::result::Error> {
    use crate::schema::employees::dsl::*;
    employees
        .filter(personal_id.eq(employee_personal_id))
        .first::<Employee>(conn)
        .optional()
}

/// Employee together with the company it belongs to.
pub fn get_employee_with_company(
    conn: &mut SqliteConnection,
    employee_id: i32,
) -> Result<Option<(Employee, Company)>, diesel::result::Error> {
    use crate::schema::{companies, employees};
    employees::table
        .inner_join(companies::table)
        .filter(employees::id.eq(employee_id))
        .select((Employee::as_select(), Company::as_select()))
        .first::<(Employee, Company)>(conn)
        .optional()
}

pub fn insert_employee(
    conn: &mut SqliteConnection,
    input: EmployeeInput,
) -> Result<Employee, diesel::result::Error> {
    use crate::schema::employees::dsl::*;

    let now = Utc::now().naive_utc();
    let new_employee = NewEmployee {
        name: input.name,
        email: input.email,
        password_hash: input.password_hash,
        personal_id: input.personal_id,
        role: input.role,
        hourly_rate: input.hourly_rate,
        daily_work_hours: input.daily_work_hours,
        lunch_hours: input.lunch_hours,
        company_id: input.company_id,
        created_at: now,
        updated_at: now,
    };

    diesel::insert_into(employees)
        .values(&new_employee)
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    employees.find(last_id).first::<Employee>(conn)
}

/// Apply a partial update. `updated_at` is always refreshed.
pub fn update_employee(
    conn: &mut SqliteConnection,
    employee_id: i32,
    mut changes: EmployeeChanges,
) -> Result<Employee, diesel::result::Error> {
    use crate::schema::employees::dsl::*;

    changes.updated_at = Some(Utc::now().naive_utc());
    diesel::update(employees.find(employee_id))
        .set(&changes)
        .execute(conn)?;

    employees.find(employee_id).first::<Employee>(conn)
}

pub fn get_employees_for_company(
    conn: &mut SqliteConnection,
    comp_id: i32,
) -> Result<Vec<Employee>, diesel::result::Error> {
    use crate::schema::employees::dsl::*;
    employees
        .filter(company_id.eq(comp_id))
        .order(id.asc())
        .load::<Employee>(conn)
}

pub fn get_all_employees(
    conn: &mut SqliteConnection,
) -> Result<Vec<Employee>, diesel::result::Error> {
    use crate::schema::employees::dsl::*;
    employees.order(id.asc()).load::<Employee>(conn)
}

/// Returns Ok(true) if a row was deleted.
pub fn delete_employee(
    conn: &mut SqliteConnection,
    employee_id: i32,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::employees::dsl::*;
    let affected = diesel::delete(employees.find(employee_id)).execute(conn)?;
    Ok(affected > 0)
}
