use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::{
    AsChangeset, Associations, Identifiable, Insertable, Queryable, Selectable,
    deserialize::{self, FromSql},
    serialize::{self, Output, ToSql},
    sql_types::Text,
    sqlite::Sqlite,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::employees;

/// Access profile of an employee.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    TS,
    diesel::expression::AsExpression,
    diesel::deserialize::FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            _ => Err(format!("Invalid Role value: {}", s)),
        }
    }
}

impl ToSql<Text, Sqlite> for Role {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for Role {
    fn from_sql(
        bytes: <Sqlite as diesel::backend::Backend>::RawValue<'_>,
    ) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        s.parse::<Role>().map_err(Into::into)
    }
}

/// An employee row. The password hash never leaves the server.
#[derive(
    Queryable,
    Selectable,
    Identifiable,
    Associations,
    Debug,
    Clone,
    PartialEq,
    Serialize,
)]
#[diesel(belongs_to(crate::models::company::Company))]
#[diesel(table_name = employees)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i32,
    pub name: String,
    pub email: String, // Will be unique
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub personal_id: String, // Will be unique
    pub role: Role,
    pub hourly_rate: Option<f64>,
    pub daily_work_hours: Option<f64>,
    pub lunch_hours: Option<f64>,
    pub company_id: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = employees)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub personal_id: String,
    pub role: Role,
    pub hourly_rate: Option<f64>,
    pub daily_work_hours: Option<f64>,
    pub lunch_hours: Option<f64>,
    pub company_id: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Employee fields as the repository layer receives them: the password is
/// already hashed.
#[derive(Debug, Clone)]
pub struct EmployeeInput {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub personal_id: String,
    pub role: Role,
    pub hourly_rate: Option<f64>,
    pub daily_work_hours: Option<f64>,
    pub lunch_hours: Option<f64>,
    pub company_id: i32,
}

/// Partial update; `None` leaves the column untouched.
#[derive(AsChangeset, Debug, Default)]
#[diesel(table_name = employees)]
pub struct EmployeeChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub hourly_rate: Option<f64>,
    pub daily_work_hours: Option<f64>,
    pub lunch_hours: Option<f64>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Body of `PUT /api/funcionarios/<id>`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct EmployeeUpdateInput {
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub email: String,
    pub password: Option<String>,
    pub hourly_rate: Option<f64>,
    pub daily_work_hours: Option<f64>,
    pub lunch_hours: Option<f64>,
}

/// Public view of an employee.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EmployeeOutput {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub personal_id: String,
    pub role: Role,
    pub hourly_rate: Option<f64>,
    pub daily_work_hours: Option<f64>,
    pub lunch_hours: Option<f64>,
    pub company_id: i32,
}

impl From<Employee> for EmployeeOutput {
    fn from(employee: Employee) -> Self {
        EmployeeOutput {
            id: employee.id,
            name: employee.name,
            email: employee.email,
            personal_id: employee.personal_id,
            role: employee.role,
            hourly_rate: employee.hourly_rate,
            daily_work_hours: employee.daily_work_hours,
            lunch_hours: employee.lunch_hours,
            company_id: employee.company_id,
        }
    }
}
