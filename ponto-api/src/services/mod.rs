//! Per-entity service objects.
//!
//! Each service borrows the pooled connection for the duration of one
//! handler closure (`db.run(|conn| CompanyService::new(conn)...)`). They add
//! logging and error translation on top of the `orm` functions and hold no
//! business rules; uniqueness and ownership checks stay in the handlers.

pub mod company;
pub mod employee;
pub mod time_entry;

pub use company::CompanyService;
pub use employee::EmployeeService;
pub use time_entry::TimeEntryService;
