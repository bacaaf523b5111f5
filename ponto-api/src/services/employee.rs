use diesel::SqliteConnection;
use diesel::result::Error as DieselError;

use crate::errors::PersistError;
use crate::models::{Company, Employee, EmployeeChanges, EmployeeInput};
use crate::orm::employee::{
    get_employee_by_email, get_employee_by_id, get_employee_by_personal_id,
    get_employee_with_company, insert_employee, update_employee,
};

pub struct EmployeeService<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> EmployeeService<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub fn find_by_id(&mut self, id: i32) -> Result<Option<Employee>, DieselError> {
        info!("Looking up employee by id {}", id);
        get_employee_by_id(self.conn, id)
    }

    pub fn find_by_email(&mut self, email: &str) -> Result<Option<Employee>, DieselError> {
        info!("Looking up employee by email {}", email);
        get_employee_by_email(self.conn, email)
    }

    pub fn find_by_personal_id(
        &mut self,
        personal_id: &str,
    ) -> Result<Option<Employee>, DieselError> {
        info!("Looking up employee by personal id {}", personal_id);
        get_employee_by_personal_id(self.conn, personal_id)
    }

    pub fn find_with_company(
        &mut self,
        id: i32,
    ) -> Result<Option<(Employee, Company)>, DieselError> {
        get_employee_with_company(self.conn, id)
    }

    /// Inserts an employee whose password is already hashed.
    pub fn persist(&mut self, input: EmployeeInput) -> Result<Employee, PersistError> {
        info!("Persisting employee {}", input.email);
        Ok(insert_employee(self.conn, input)?)
    }

    pub fn update(&mut self, id: i32, changes: EmployeeChanges) -> Result<Employee, PersistError> {
        info!("Updating employee {}", id);
        Ok(update_employee(self.conn, id, changes)?)
    }
}
