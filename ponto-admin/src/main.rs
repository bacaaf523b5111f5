/*!
 * Ponto Administrative CLI
 *
 * Command-line maintenance of a ponto-api SQLite database: companies and
 * their employees can be listed, created and removed without going through
 * the HTTP API. Database access goes through the `ponto_api::orm` functions,
 * so the same normalization and uniqueness rules apply.
 *
 * The database is named by `DATABASE_URL` (a `.env` file is honored).
 * Pending migrations are applied on connect.
 *
 * For detailed usage information, run with --help.
 */

mod admin_cli;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use admin_cli::{
    company_commands::{CompanyAction, handle_company_command_with_conn},
    employee_commands::{EmployeeAction, handle_employee_command_with_conn},
    utils::establish_connection,
};

#[derive(Parser)]
#[command(name = "ponto-admin")]
#[command(about = "Administrative CLI for the ponto database")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Company {
        #[command(subcommand)]
        action: CompanyAction,
    },
    Employee {
        #[command(subcommand)]
        action: EmployeeAction,
    },
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = establish_connection()?;
    match cli.command {
        Commands::Company { action } => handle_company_command_with_conn(&mut conn, action),
        Commands::Employee { action } => handle_employee_command_with_conn(&mut conn, action),
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
