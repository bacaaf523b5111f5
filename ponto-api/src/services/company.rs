use diesel::SqliteConnection;
use diesel::result::Error as DieselError;

use crate::errors::PersistError;
use crate::models::{Company, CompanyInput};
use crate::orm::company::{get_company_by_id, get_company_by_tax_id, insert_company, update_company};

pub struct CompanyService<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> CompanyService<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Absence is `Ok(None)`, not an error.
    pub fn find_by_tax_id(&mut self, tax_id: &str) -> Result<Option<Company>, DieselError> {
        info!("Looking up company by tax id {}", tax_id);
        get_company_by_tax_id(self.conn, tax_id)
    }

    pub fn find_by_id(&mut self, id: i32) -> Result<Option<Company>, DieselError> {
        info!("Looking up company by id {}", id);
        get_company_by_id(self.conn, id)
    }

    /// Inserts a company and returns it with its generated id.
    /// A tax id taken concurrently surfaces as `PersistError::Conflict`.
    pub fn persist(&mut self, input: &CompanyInput) -> Result<Company, PersistError> {
        info!("Persisting company {}", input.tax_id);
        Ok(insert_company(self.conn, input)?)
    }

    pub fn update(&mut self, id: i32, input: &CompanyInput) -> Result<Company, PersistError> {
        info!("Updating company {}", id);
        Ok(update_company(self.conn, id, input)?)
    }
}
