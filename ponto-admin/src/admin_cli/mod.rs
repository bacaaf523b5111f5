pub mod company_commands;
pub mod employee_commands;
pub mod utils;
