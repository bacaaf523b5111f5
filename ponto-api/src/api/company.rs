//! Company lookup.

use rocket::Route;

use crate::DbConn;
use crate::errors::PersistError;
use crate::models::Company;
use crate::response::{Envelope, ok};
use crate::services::CompanyService;
use crate::session_guards::AuthenticatedEmployee;
use crate::validation::{messages, normalize_document};

/// Company By Tax Id endpoint.
///
/// - **URL:** `/api/empresas/cnpj/<tax_id>`
/// - **Method:** `GET`
/// - **Authentication:** Required
///
/// **Failure (HTTP 404 Not Found):**
/// ```json
/// { "data": null, "errors": ["Empresa não encontrada para o CNPJ 11222333000181."] }
/// ```
#[get("/empresas/cnpj/<tax_id>")]
pub async fn get_company_by_tax_id(
    db: DbConn,
    tax_id: String,
    _auth: AuthenticatedEmployee,
) -> Envelope<Company> {
    info!("Fetching company by tax id {}", tax_id);
    let normalized = normalize_document(&tax_id);

    let result = db
        .run(move |conn| CompanyService::new(conn).find_by_tax_id(&normalized))
        .await;

    match result {
        Ok(Some(company)) => ok(company),
        Ok(None) => PersistError::NotFound(messages::company_not_found(&tax_id))
            .into_envelope("Company lookup"),
        Err(e) => PersistError::Database(e).into_envelope("Company lookup"),
    }
}

pub fn routes() -> Vec<Route> {
    routes![get_company_by_tax_id]
}
