//! Transient request/response shapes for the signup flows.
//!
//! None of these are persisted directly; handlers convert them into
//! `CompanyInput`/`EmployeeInput` after validation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::{Company, Employee};

/// Company plus its first (admin) employee.
#[derive(Debug, Clone, Default, Deserialize, Serialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct RegistrationInput {
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub password: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub personal_id: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub tax_id: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub legal_name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RegistrationOutput {
    /// Id of the created employee.
    pub id: i32,
    pub name: String,
    pub email: String,
    pub personal_id: String,
    pub legal_name: String,
    pub tax_id: String,
}

impl RegistrationOutput {
    pub fn from_saved(employee: &Employee, company: &Company) -> Self {
        RegistrationOutput {
            id: employee.id,
            name: employee.name.clone(),
            email: employee.email.clone(),
            personal_id: employee.personal_id.clone(),
            legal_name: company.legal_name.clone(),
            tax_id: company.tax_id.clone(),
        }
    }
}

/// A new employee joining a company that is already registered.
#[derive(Debug, Clone, Default, Deserialize, Serialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct EmployeeRegistrationInput {
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub password: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub personal_id: String,
    pub hourly_rate: Option<f64>,
    pub daily_work_hours: Option<f64>,
    pub lunch_hours: Option<f64>,
    /// Tax id of the employer.
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub tax_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EmployeeRegistrationOutput {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub personal_id: String,
    pub hourly_rate: Option<f64>,
    pub daily_work_hours: Option<f64>,
    pub lunch_hours: Option<f64>,
    pub tax_id: String,
}

impl EmployeeRegistrationOutput {
    pub fn from_saved(employee: &Employee, company: &Company) -> Self {
        EmployeeRegistrationOutput {
            id: employee.id,
            name: employee.name.clone(),
            email: employee.email.clone(),
            personal_id: employee.personal_id.clone(),
            hourly_rate: employee.hourly_rate,
            daily_work_hours: employee.daily_work_hours,
            lunch_hours: employee.lunch_hours,
            tax_id: company.tax_id.clone(),
        }
    }
}
