pub mod company;
pub mod db;
pub mod employee;
pub mod login;
pub mod logout;
#[cfg(any(test, feature = "test-staging"))]
pub mod testing;
pub mod time_entry;

pub use db::DbConn;
