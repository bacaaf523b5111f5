use std::io::{self, Write};

use diesel::{prelude::*, sqlite::SqliteConnection};
use dotenvy::dotenv;
use ponto_api::{
    orm::{
        company::{get_company_by_id, get_company_by_tax_id},
        db::{run_pending_migrations, set_foreign_keys},
    },
    validation::normalize_document,
};
use regex::Regex;

pub fn establish_connection() -> Result<SqliteConnection, Box<dyn std::error::Error>> {
    dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;
    let mut conn = SqliteConnection::establish(&database_url)?;
    // Removals rely on ON DELETE CASCADE.
    set_foreign_keys(&mut conn)?;
    run_pending_migrations(&mut conn).map_err(|e| format!("Failed to run migrations: {}", e))?;
    Ok(conn)
}

/// Resolve a company identifier to a company id. A short number is an id; a
/// value with 14 digits (punctuation allowed) is a CNPJ.
pub fn resolve_company_id(
    conn: &mut SqliteConnection,
    company_identifier: &str,
) -> Result<i32, Box<dyn std::error::Error>> {
    let digits = normalize_document(company_identifier);
    if digits.len() == 14 {
        return match get_company_by_tax_id(conn, &digits)? {
            Some(company) => Ok(company.id),
            None => Err(format!("Company with CNPJ {} does not exist", digits).into()),
        };
    }

    let id = company_identifier
        .trim()
        .parse::<i32>()
        .map_err(|_| format!("'{}' is neither a company ID nor a CNPJ", company_identifier))?;
    match get_company_by_id(conn, id)? {
        Some(_company) => Ok(id),
        None => Err(format!("Company with ID {} does not exist", id).into()),
    }
}

/// Search term for `ls` and `rm`: a regex unless `fixed_string` is set.
pub enum SearchFilter {
    All,
    Fixed(String),
    Pattern(Regex),
}

impl SearchFilter {
    pub fn new(
        search_term: Option<String>,
        fixed_string: bool,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(match search_term {
            None => SearchFilter::All,
            Some(term) if fixed_string => SearchFilter::Fixed(term),
            Some(term) => SearchFilter::Pattern(
                Regex::new(&term).map_err(|e| format!("Invalid regex pattern '{}': {}", term, e))?,
            ),
        })
    }

    /// True when any of `fields` matches.
    pub fn matches(&self, fields: &[&str]) -> bool {
        match self {
            SearchFilter::All => true,
            SearchFilter::Fixed(term) => fields.iter().any(|f| f.contains(term.as_str())),
            SearchFilter::Pattern(regex) => fields.iter().any(|f| regex.is_match(f)),
        }
    }
}

/// Asks on stdin; anything but y/yes declines.
pub fn confirm(prompt: &str) -> Result<bool, Box<dyn std::error::Error>> {
    print!("{} [y/N]: ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

pub fn prompt_for_password() -> Result<String, Box<dyn std::error::Error>> {
    print!("Enter new password: ");
    io::stdout().flush()?;
    let password = rpassword::read_password()?;

    if password.trim().is_empty() {
        return Err("Password cannot be empty".into());
    }

    print!("Confirm new password: ");
    io::stdout().flush()?;
    let confirm_password = rpassword::read_password()?;

    if password != confirm_password {
        return Err("Passwords do not match".into());
    }

    Ok(password)
}
