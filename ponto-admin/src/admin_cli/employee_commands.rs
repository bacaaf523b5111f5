use clap::Subcommand;
use diesel::sqlite::SqliteConnection;
use ponto_api::{
    models::{Employee, EmployeeChanges, EmployeeInput, EmployeeRegistrationInput, Role},
    orm::{
        company::get_company_by_id,
        employee::{delete_employee, get_all_employees, get_employee_by_email, get_employee_by_personal_id, insert_employee, update_employee},
        login::hash_password,
    },
    validation::{normalize_document, validate_employee_registration},
};

use super::utils::{SearchFilter, confirm, prompt_for_password, resolve_company_id};

#[derive(Subcommand)]
pub enum EmployeeAction {
    #[command(about = "Add a new employee")]
    Add {
        #[arg(short, long, help = "Full name")]
        name: String,
        #[arg(short, long, help = "Email address")]
        email: String,
        #[arg(long, help = "CPF, punctuation allowed")]
        personal_id: String,
        #[arg(short, long, help = "Company ID or CNPJ")]
        company: String,
        #[arg(short, long, default_value = "USER", help = "ADMIN or USER")]
        role: String,
        #[arg(short, long, help = "Password (will be prompted securely if not provided)")]
        password: Option<String>,
    },
    #[command(about = "Change employee password")]
    ChangePassword {
        #[arg(short, long, help = "Email address")]
        email: String,
        #[arg(short, long, help = "New password (will be prompted securely if not provided)")]
        password: Option<String>,
    },
    #[command(about = "List employees, optionally filtered by search term")]
    Ls {
        #[arg(help = "Search term matched against email, name and CPF (regex by default, use -F for fixed string)")]
        search_term: Option<String>,
        #[arg(
            short = 'F',
            long = "fixed-string",
            help = "Treat search term as fixed string instead of regex"
        )]
        fixed_string: bool,
    },
    #[command(about = "Remove employees matching search term, with their entries")]
    Rm {
        #[arg(help = "Search term matched against email, name and CPF (regex by default, use -F for fixed string)")]
        search_term: String,
        #[arg(
            short = 'F',
            long = "fixed-string",
            help = "Treat search term as fixed string instead of regex"
        )]
        fixed_string: bool,
        #[arg(short = 'y', long = "yes", help = "Skip confirmation prompt")]
        yes: bool,
    },
}

pub fn handle_employee_command_with_conn(
    conn: &mut SqliteConnection,
    action: EmployeeAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        EmployeeAction::Add {
            name,
            email,
            personal_id,
            company,
            role,
            password,
        } => {
            employee_add_impl(conn, &name, &email, &personal_id, &company, &role, password)?;
        }
        EmployeeAction::ChangePassword { email, password } => {
            change_password_impl(conn, &email, password)?;
        }
        EmployeeAction::Ls { search_term, fixed_string } => {
            employee_ls_impl(conn, search_term, fixed_string)?;
        }
        EmployeeAction::Rm { search_term, fixed_string, yes } => {
            employee_rm_impl(conn, search_term, fixed_string, yes)?;
        }
    }
    Ok(())
}

fn matching_employees(
    conn: &mut SqliteConnection,
    filter: &SearchFilter,
) -> Result<Vec<Employee>, Box<dyn std::error::Error>> {
    Ok(get_all_employees(conn)?
        .into_iter()
        .filter(|e| filter.matches(&[e.email.as_str(), e.name.as_str(), e.personal_id.as_str()]))
        .collect())
}

pub fn employee_add_impl(
    conn: &mut SqliteConnection,
    name: &str,
    email: &str,
    personal_id: &str,
    company: &str,
    role: &str,
    password: Option<String>,
) -> Result<Employee, Box<dyn std::error::Error>> {
    let role = role.trim().to_uppercase().parse::<Role>()?;
    let company_id = resolve_company_id(conn, company)?;
    let company = get_company_by_id(conn, company_id)?
        .ok_or_else(|| format!("Company with ID {} does not exist", company_id))?;

    let password = match password {
        Some(p) => p,
        None => prompt_for_password()?,
    };

    // Same rules as self-service registration.
    let mut errors = validate_employee_registration(&EmployeeRegistrationInput {
        name: name.to_string(),
        email: email.to_string(),
        password: password.clone(),
        personal_id: personal_id.to_string(),
        tax_id: company.tax_id.clone(),
        ..Default::default()
    });
    let personal_id = normalize_document(personal_id);
    let email = email.trim().to_string();
    if get_employee_by_personal_id(conn, &personal_id)?.is_some() {
        errors.push(format!("CPF {} already registered", personal_id));
    }
    if get_employee_by_email(conn, &email)?.is_some() {
        errors.push(format!("Email {} already registered", email));
    }
    if !errors.is_empty() {
        return Err(errors.join(" ").into());
    }

    let password_hash =
        hash_password(&password).map_err(|e| format!("Failed to hash password: {}", e))?;

    let created = insert_employee(
        conn,
        EmployeeInput {
            name: name.trim().to_string(),
            email,
            password_hash,
            personal_id,
            role,
            hourly_rate: None,
            daily_work_hours: None,
            lunch_hours: None,
            company_id: company.id,
        },
    )?;

    println!("Employee created successfully!");
    println!("ID: {}", created.id);
    println!("Name: {}", created.name);
    println!("Email: {}", created.email);
    println!("Role: {}", created.role);
    println!("Company: {} ({})", company.legal_name, company.tax_id);

    Ok(created)
}

pub fn change_password_impl(
    conn: &mut SqliteConnection,
    email: &str,
    password: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(employee) = get_employee_by_email(conn, email.trim())? else {
        return Err(format!("Employee with email {} does not exist", email).into());
    };

    let password = match password {
        Some(p) => p,
        None => prompt_for_password()?,
    };
    if password.trim().is_empty() {
        return Err("Password cannot be empty".into());
    }

    let password_hash =
        hash_password(&password).map_err(|e| format!("Failed to hash password: {}", e))?;
    update_employee(
        conn,
        employee.id,
        EmployeeChanges {
            password_hash: Some(password_hash),
            ..Default::default()
        },
    )?;

    println!("Password changed successfully for employee: {}", employee.email);
    Ok(())
}

pub fn employee_ls_impl(
    conn: &mut SqliteConnection,
    search_term: Option<String>,
    fixed_string: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = SearchFilter::new(search_term, fixed_string)?;
    let employees = matching_employees(conn, &filter)?;

    if employees.is_empty() {
        println!("No employees found.");
    } else {
        println!("Employees:");
        for e in employees {
            println!(
                "  ID: {}, Name: {}, Email: {}, CPF: {}, Role: {}, Company ID: {}, Created: {}",
                e.id, e.name, e.email, e.personal_id, e.role, e.company_id, e.created_at
            );
        }
    }

    Ok(())
}

pub fn employee_rm_impl(
    conn: &mut SqliteConnection,
    search_term: String,
    fixed_string: bool,
    yes: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = SearchFilter::new(Some(search_term), fixed_string)?;
    let employees = matching_employees(conn, &filter)?;

    if employees.is_empty() {
        println!("No employees found matching the search term.");
        return Ok(());
    }

    println!("Found {} employee(s) matching the search term:", employees.len());
    for e in &employees {
        println!(
            "  ID: {}, Name: {}, Email: {}, Company ID: {}",
            e.id, e.name, e.email, e.company_id
        );
    }

    if !yes
        && !confirm(&format!(
            "Are you sure you want to delete these {} employee(s) and their entries?",
            employees.len()
        ))?
    {
        println!("Operation cancelled.");
        return Ok(());
    }

    let mut deleted_count = 0;
    let mut errors = Vec::new();

    for e in employees {
        match delete_employee(conn, e.id) {
            Ok(true) => {
                deleted_count += 1;
                println!("Deleted employee: {} (ID: {})", e.email, e.id);
            }
            Ok(false) => {}
            Err(err) => {
                errors.push(format!("Failed to delete employee {} (ID: {}): {}", e.email, e.id, err));
            }
        }
    }

    println!("Successfully deleted {} employee(s).", deleted_count);

    if !errors.is_empty() {
        println!("Errors encountered:");
        for error in errors {
            println!("  {}", error);
        }
        return Err("Some deletions failed".into());
    }

    Ok(())
}
