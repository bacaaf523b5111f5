use diesel::SqliteConnection;
use diesel::result::Error as DieselError;

use crate::errors::PersistError;
use crate::models::{NewTimeEntry, TimeEntry, TimeEntryChanges};
use crate::orm::time_entry::{
    Direction, EntryOrder, count_time_entries_for_employee, delete_time_entry,
    get_time_entry_by_id, insert_time_entry, list_time_entries_for_employee, update_time_entry,
};
use crate::response::Page;

pub struct TimeEntryService<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> TimeEntryService<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub fn find_by_id(&mut self, id: i32) -> Result<Option<TimeEntry>, DieselError> {
        info!("Looking up time entry {}", id);
        get_time_entry_by_id(self.conn, id)
    }

    pub fn find_by_employee(
        &mut self,
        employee_id: i32,
        order: EntryOrder,
        direction: Direction,
        page: i64,
        size: i64,
    ) -> Result<Page<TimeEntry>, DieselError> {
        info!(
            "Listing time entries of employee {} (page {}, size {})",
            employee_id, page, size
        );
        let total = count_time_entries_for_employee(self.conn, employee_id)?;
        let content =
            list_time_entries_for_employee(self.conn, employee_id, order, direction, page, size)?;
        Ok(Page::new(content, total, page, size))
    }

    pub fn persist(&mut self, entry: NewTimeEntry) -> Result<TimeEntry, PersistError> {
        info!("Persisting time entry for employee {}", entry.employee_id);
        Ok(insert_time_entry(self.conn, entry)?)
    }

    /// Ok(None) when the entry does not exist.
    pub fn update(
        &mut self,
        id: i32,
        changes: TimeEntryChanges,
    ) -> Result<Option<TimeEntry>, PersistError> {
        info!("Updating time entry {}", id);
        Ok(update_time_entry(self.conn, id, changes)?)
    }

    pub fn remove(&mut self, id: i32) -> Result<bool, DieselError> {
        info!("Removing time entry {}", id);
        delete_time_entry(self.conn, id)
    }
}
