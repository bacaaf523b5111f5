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

use crate::schema::time_entries;

/// Wire and storage format of `TimeEntry::date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The kind of punch an entry records
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
pub enum EntryType {
    WorkStart,
    WorkEnd,
    LunchStart,
    LunchEnd,
    BreakStart,
    BreakEnd,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::WorkStart => "WORK_START",
            EntryType::WorkEnd => "WORK_END",
            EntryType::LunchStart => "LUNCH_START",
            EntryType::LunchEnd => "LUNCH_END",
            EntryType::BreakStart => "BREAK_START",
            EntryType::BreakEnd => "BREAK_END",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WORK_START" => Ok(EntryType::WorkStart),
            "WORK_END" => Ok(EntryType::WorkEnd),
            "LUNCH_START" => Ok(EntryType::LunchStart),
            "LUNCH_END" => Ok(EntryType::LunchEnd),
            "BREAK_START" => Ok(EntryType::BreakStart),
            "BREAK_END" => Ok(EntryType::BreakEnd),
            _ => Err(format!("Invalid EntryType value: {}", s)),
        }
    }
}

impl ToSql<Text, Sqlite> for EntryType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for EntryType {
    fn from_sql(
        bytes: <Sqlite as diesel::backend::Backend>::RawValue<'_>,
    ) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        s.parse::<EntryType>().map_err(Into::into)
    }
}

/// A single timesheet punch belonging to one employee
#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone, PartialEq)]
#[diesel(belongs_to(crate::models::employee::Employee))]
#[diesel(table_name = time_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TimeEntry {
    pub id: i32,
    pub date: NaiveDateTime,
    pub description: Option<String>,
    pub location: Option<String>,
    pub entry_type: EntryType,
    pub employee_id: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Content of a new punch. `created_at`/`updated_at` are set on insert.
#[derive(Insertable)]
#[diesel(table_name = time_entries)]
pub struct NewTimeEntry {
    pub date: NaiveDateTime,
    pub description: Option<String>,
    pub location: Option<String>,
    pub entry_type: EntryType,
    pub employee_id: i32,
}

/// Full replacement of the editable columns. `employee_id` is not editable.
#[derive(AsChangeset)]
#[diesel(table_name = time_entries)]
#[diesel(treat_none_as_null = true)]
pub struct TimeEntryChanges {
    pub date: NaiveDateTime,
    pub description: Option<String>,
    pub location: Option<String>,
    pub entry_type: EntryType,
}

// Dates and types travel as strings so bad values reach validation instead of
// failing the body parser.
#[derive(Debug, Clone, Default, Deserialize, Serialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct TimeEntryInput {
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub entry_type: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub employee_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TimeEntryOutput {
    pub id: i32,
    pub date: String,
    pub entry_type: EntryType,
    pub description: Option<String>,
    pub location: Option<String>,
    pub employee_id: i32,
}

impl From<TimeEntry> for TimeEntryOutput {
    fn from(entry: TimeEntry) -> Self {
        TimeEntryOutput {
            id: entry.id,
            date: entry.date.format(DATE_FORMAT).to_string(),
            entry_type: entry.entry_type,
            description: entry.description,
            location: entry.location,
            employee_id: entry.employee_id,
        }
    }
}
