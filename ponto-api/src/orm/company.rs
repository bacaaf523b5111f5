use chrono::Utc;
use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::BigInt;

use crate::models::{Company, CompanyChanges, CompanyInput, NewCompany};

#[derive(QueryableByName)]
pub(crate) struct LastInsertRowId {
    #[diesel(sql_type = BigInt)]
    pub(crate) last_insert_rowid: i64,
}

/// Id of the row most recently inserted on this connection.
/// A rowid outside the i32 range is a deserialization error.
pub(crate) fn last_insert_rowid(conn: &mut SqliteConnection) -> QueryResult<i32> {
    let row = diesel::sql_query("SELECT last_insert_rowid() as last_insert_rowid")
        .get_result::<LastInsertRowId>(conn)?;
    i32::try_from(row.last_insert_rowid)
        .map_err(|e| diesel::result::Error::DeserializationError(Box::new(e)))
}

/// Find a company by its digits-only tax id.
/// Returns Ok(Some(Company)) if found, Ok(None) if not, Err on DB error.
pub fn get_company_by_tax_id(
    conn: &mut SqliteConnection,
    company_tax_id: &str,
) -> Result<Option<Company>, diesel::result::Error> {
    use crate::schema::companies::dsl::*;
    companies
        .filter(tax_id.eq(company_tax_id))
        .first::<Company>(conn)
        .optional()
}

pub fn get_company_by_id(
    conn: &mut SqliteConnection,
    company_id: i32,
) -> Result<Option<Company>, diesel::result::Error> {
    use crate::schema::companies::dsl::*;
    companies.find(company_id).first::<Company>(conn).optional()
}

/// Insert a new company and read it back with its generated id and timestamps.
/// `input.tax_id` must already be normalized.
pub fn insert_company(
    conn: &mut SqliteConnection,
    input: &CompanyInput,
) -> Result<Company, diesel::result::Error> {
    use crate::schema::companies::dsl::*;

    let now = Utc::now().naive_utc();
    let new_company = NewCompany {
        tax_id: input.tax_id.clone(),
        legal_name: input.legal_name.trim().to_string(),
        created_at: now,
        updated_at: now,
    };

    diesel::insert_into(companies)
        .values(&new_company)
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    companies.find(last_id).first::<Company>(conn)
}

/// Overwrite tax id and legal name of an existing company.
pub fn update_company(
    conn: &mut SqliteConnection,
    company_id: i32,
    input: &CompanyInput,
) -> Result<Company, diesel::result::Error> {
    use crate::schema::companies::dsl::*;

    let changes = CompanyChanges {
        tax_id: Some(input.tax_id.clone()),
        legal_name: Some(input.legal_name.trim().to_string()),
        updated_at: Utc::now().naive_utc(),
    };

    diesel::update(companies.find(company_id))
        .set(&changes)
        .execute(conn)?;

    companies.find(company_id).first::<Company>(conn)
}

pub fn get_all_companies(
    conn: &mut SqliteConnection,
) -> Result<Vec<Company>, diesel::result::Error> {
    use crate::schema::companies::dsl::*;
    companies.order(id.asc()).load::<Company>(conn)
}

/// Delete a company. Its employees, their sessions and time entries go with
/// it through the foreign key cascades.
/// Returns Ok(true) if a row was deleted, Ok(false) if the id was unknown.
pub fn delete_company(
    conn: &mut SqliteConnection,
    company_id: i32,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::companies::dsl::*;
    let affected = diesel::delete(companies.find(company_id)).execute(conn)?;
    Ok(affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::setup_test_db;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    fn acme() -> CompanyInput {
        CompanyInput {
            tax_id: "11222333000181".to_string(),
            legal_name: "Acme LLC".to_string(),
        }
    }

    #[test]
    fn test_last_insert_rowid_rejects_ids_beyond_i32() {
        let mut conn = setup_test_db();

        let company = insert_company(&mut conn, &acme()).unwrap();
        assert_eq!(last_insert_rowid(&mut conn).unwrap(), company.id);

        diesel::sql_query(
            "INSERT INTO companies (id, tax_id, legal_name) \
             VALUES (4294967296, '11222333000262', 'Grande SA')",
        )
        .execute(&mut conn)
        .unwrap();
        let result = last_insert_rowid(&mut conn);
        assert!(matches!(result, Err(DieselError::DeserializationError(_))));
    }

    #[test]
    fn test_insert_company() {
        let mut conn = setup_test_db();

        let result = insert_company(&mut conn, &acme());
        assert!(result.is_ok());
        let company = result.unwrap();
        assert!(company.id > 0);
        assert_eq!(company.tax_id, "11222333000181");
        assert_eq!(company.legal_name, "Acme LLC");
    }

    #[test]
    fn test_insert_then_fetch_round_trip() {
        let mut conn = setup_test_db();

        let inserted = insert_company(&mut conn, &acme()).unwrap();
        let by_tax_id = get_company_by_tax_id(&mut conn, "11222333000181")
            .unwrap()
            .expect("company should exist");
        let by_id = get_company_by_id(&mut conn, inserted.id)
            .unwrap()
            .expect("company should exist");

        assert_eq!(by_tax_id, inserted);
        assert_eq!(by_id, inserted);
    }

    #[test]
    fn test_get_company_by_tax_id_absent() {
        let mut conn = setup_test_db();

        let first = get_company_by_tax_id(&mut conn, "11222333000181").unwrap();
        let second = get_company_by_tax_id(&mut conn, "11222333000181").unwrap();
        assert!(first.is_none());
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_tax_id_is_unique_violation() {
        let mut conn = setup_test_db();

        insert_company(&mut conn, &acme()).unwrap();
        let err = insert_company(&mut conn, &acme()).unwrap_err();
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                assert!(info.message().contains("companies.tax_id"));
            }
            other => panic!("expected unique violation, got {:?}", other),
        }
    }

    #[test]
    fn test_update_company() {
        let mut conn = setup_test_db();

        let company = insert_company(&mut conn, &acme()).unwrap();
        let renamed = CompanyInput {
            tax_id: company.tax_id.clone(),
            legal_name: "Acme Holdings".to_string(),
        };
        let updated = update_company(&mut conn, company.id, &renamed).unwrap();

        assert_eq!(updated.id, company.id);
        assert_eq!(updated.legal_name, "Acme Holdings");
        assert!(updated.updated_at >= company.updated_at);
    }

    #[test]
    fn test_get_all_and_delete() {
        let mut conn = setup_test_db();

        let a = insert_company(&mut conn, &acme()).unwrap();
        let b = insert_company(
            &mut conn,
            &CompanyInput {
                tax_id: "11222333000262".to_string(),
                legal_name: "Beta Comércio".to_string(),
            },
        )
        .unwrap();

        let all = get_all_companies(&mut conn).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, a.id);

        assert!(delete_company(&mut conn, b.id).unwrap());
        assert!(!delete_company(&mut conn, b.id).unwrap());
        assert_eq!(get_all_companies(&mut conn).unwrap().len(), 1);
    }
}
