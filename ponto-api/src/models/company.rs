use chrono::NaiveDateTime;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, QueryableByName, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::companies;

/// A registered legal entity. `tax_id` is the digits-only CNPJ.
#[derive(
    Deserialize,
    Queryable,
    Selectable,
    Identifiable,
    QueryableByName,
    Debug,
    Clone,
    PartialEq,
    Serialize,
    TS,
)]
#[diesel(table_name = companies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Company {
    pub id: i32,
    pub tax_id: String, // Will be unique
    pub legal_name: String,
    #[ts(type = "string")]
    pub created_at: NaiveDateTime,
    #[ts(type = "string")]
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = companies)]
pub struct NewCompany {
    pub tax_id: String,
    pub legal_name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = companies)]
pub struct CompanyChanges {
    pub tax_id: Option<String>,
    pub legal_name: Option<String>,
    pub updated_at: NaiveDateTime,
}

// For API inputs and validation. Missing fields deserialize as empty strings
// so validation can report them instead of the body parser.
#[derive(Debug, Clone, Default, Deserialize, Serialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct CompanyInput {
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub tax_id: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub legal_name: String,
}
