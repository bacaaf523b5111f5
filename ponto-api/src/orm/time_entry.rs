use chrono::Utc;
use diesel::prelude::*;

use crate::models::{NewTimeEntry, TimeEntry, TimeEntryChanges};
use crate::orm::company::last_insert_rowid;

/// Column a time-entry listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOrder {
    Id,
    Date,
}

impl EntryOrder {
    /// Unknown names fall back to `Id`.
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "date" || v == "data" => EntryOrder::Date,
            _ => EntryOrder::Id,
        }
    }
}

/// Sort direction; defaults to descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("asc") => Direction::Asc,
            _ => Direction::Desc,
        }
    }
}

pub fn insert_time_entry(
    conn: &mut SqliteConnection,
    entry: NewTimeEntry,
) -> Result<TimeEntry, diesel::result::Error> {
    use crate::schema::time_entries::dsl::*;

    let now = Utc::now().naive_utc();
    diesel::insert_into(time_entries)
        .values((&entry, created_at.eq(now), updated_at.eq(now)))
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    time_entries.find(last_id).first::<TimeEntry>(conn)
}

pub fn get_time_entry_by_id(
    conn: &mut SqliteConnection,
    entry_id: i32,
) -> Result<Option<TimeEntry>, diesel::result::Error> {
    use crate::schema::time_entries::dsl::*;
    time_entries.find(entry_id).first::<TimeEntry>(conn).optional()
}

/// Replace the editable columns of an entry and refresh `updated_at`.
/// Returns Ok(None) when no entry has that id.
pub fn update_time_entry(
    conn: &mut SqliteConnection,
    entry_id: i32,
    changes: TimeEntryChanges,
) -> Result<Option<TimeEntry>, diesel::result::Error> {
    use crate::schema::time_entries::dsl::*;

    let affected = diesel::update(time_entries.find(entry_id))
        .set((&changes, updated_at.eq(Utc::now().naive_utc())))
        .execute(conn)?;
    if affected == 0 {
        return Ok(None);
    }
    time_entries.find(entry_id).first::<TimeEntry>(conn).optional()
}

/// Returns Ok(true) if a row was deleted.
pub fn delete_time_entry(
    conn: &mut SqliteConnection,
    entry_id: i32,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::time_entries::dsl::*;
    let affected = diesel::delete(time_entries.find(entry_id)).execute(conn)?;
    Ok(affected > 0)
}

pub fn count_time_entries_for_employee(
    conn: &mut SqliteConnection,
    emp_id: i32,
) -> Result<i64, diesel::result::Error> {
    use crate::schema::time_entries::dsl::*;
    time_entries
        .filter(employee_id.eq(emp_id))
        .count()
        .get_result(conn)
}

/// One page of an employee's entries. `page` is zero-based; ties on `date`
/// are broken by id in the same direction so pages never overlap. A page
/// whose offset does not fit in an i64 is empty.
pub fn list_time_entries_for_employee(
    conn: &mut SqliteConnection,
    emp_id: i32,
    order: EntryOrder,
    direction: Direction,
    page: i64,
    size: i64,
) -> Result<Vec<TimeEntry>, diesel::result::Error> {
    use crate::schema::time_entries::dsl::*;

    let Some(skip) = page.checked_mul(size) else {
        return Ok(Vec::new());
    };

    let mut query = time_entries
        .filter(employee_id.eq(emp_id))
        .into_boxed();

    query = match (order, direction) {
        (EntryOrder::Id, Direction::Asc) => query.order(id.asc()),
        (EntryOrder::Id, Direction::Desc) => query.order(id.desc()),
        (EntryOrder::Date, Direction::Asc) => query.order((date.asc(), id.asc())),
        (EntryOrder::Date, Direction::Desc) => query.order((date.desc(), id.desc())),
    };

    query
        .limit(size)
        .offset(skip)
        .load::<TimeEntry>(conn)
}
