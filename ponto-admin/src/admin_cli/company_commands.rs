use clap::Subcommand;
use diesel::sqlite::SqliteConnection;
use ponto_api::{
    models::{Company, CompanyInput},
    orm::{
        company::{delete_company, get_all_companies, get_company_by_id, get_company_by_tax_id, insert_company, update_company},
        employee::get_employees_for_company,
    },
    validation::{normalize_document, validate_company},
};

use super::utils::{SearchFilter, confirm};

#[derive(Subcommand)]
pub enum CompanyAction {
    #[command(about = "List companies, optionally filtered by search term")]
    Ls {
        #[arg(help = "Search term matched against CNPJ and legal name (regex by default, use -F for fixed string)")]
        search_term: Option<String>,
        #[arg(
            short = 'F',
            long = "fixed-string",
            help = "Treat search term as fixed string instead of regex"
        )]
        fixed_string: bool,
    },
    #[command(about = "Add a new company")]
    Add {
        #[arg(short, long, help = "CNPJ, punctuation allowed")]
        tax_id: String,
        #[arg(short, long, help = "Legal name (razão social)")]
        legal_name: String,
    },
    #[command(about = "Remove companies matching search term, with their employees and entries")]
    Rm {
        #[arg(
            help = "Search term matched against CNPJ and legal name (regex by default, use -F for fixed string)"
        )]
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
    #[command(about = "Edit company fields")]
    Edit {
        #[arg(short, long, help = "Company ID to edit")]
        id: i32,
        #[arg(long, help = "New legal name")]
        legal_name: Option<String>,
    },
}

pub fn handle_company_command_with_conn(
    conn: &mut SqliteConnection,
    action: CompanyAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CompanyAction::Ls { search_term, fixed_string } => {
            company_ls_impl(conn, search_term, fixed_string)?;
        }
        CompanyAction::Add { tax_id, legal_name } => {
            company_add_impl(conn, &tax_id, &legal_name)?;
        }
        CompanyAction::Rm { search_term, fixed_string, yes } => {
            company_rm_impl(conn, search_term, fixed_string, yes)?;
        }
        CompanyAction::Edit { id, legal_name } => {
            company_edit_impl(conn, id, legal_name)?;
        }
    }
    Ok(())
}

fn matching_companies(
    conn: &mut SqliteConnection,
    filter: &SearchFilter,
) -> Result<Vec<Company>, Box<dyn std::error::Error>> {
    Ok(get_all_companies(conn)?
        .into_iter()
        .filter(|company| filter.matches(&[company.tax_id.as_str(), company.legal_name.as_str()]))
        .collect())
}

fn print_company(company: &Company) {
    println!("ID: {}", company.id);
    println!("CNPJ: {}", company.tax_id);
    println!("Legal name: {}", company.legal_name);
    println!("Created: {}", company.created_at);
}

pub fn company_ls_impl(
    conn: &mut SqliteConnection,
    search_term: Option<String>,
    fixed_string: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = SearchFilter::new(search_term, fixed_string)?;
    let companies = matching_companies(conn, &filter)?;

    if companies.is_empty() {
        println!("No companies found.");
    } else {
        println!("Companies:");
        for company in companies {
            println!(
                "  ID: {}, CNPJ: {}, Legal name: {}, Created: {}",
                company.id, company.tax_id, company.legal_name, company.created_at
            );
        }
    }

    Ok(())
}

pub fn company_add_impl(
    conn: &mut SqliteConnection,
    tax_id: &str,
    legal_name: &str,
) -> Result<Company, Box<dyn std::error::Error>> {
    let input = CompanyInput {
        tax_id: tax_id.to_string(),
        legal_name: legal_name.to_string(),
    };
    let errors = validate_company(&input);
    if !errors.is_empty() {
        return Err(errors.join(" ").into());
    }
    let input = CompanyInput {
        tax_id: normalize_document(tax_id),
        legal_name: legal_name.trim().to_string(),
    };

    if let Some(existing_company) = get_company_by_tax_id(conn, &input.tax_id)? {
        println!("Company already exists!");
        print_company(&existing_company);
        return Ok(existing_company);
    }

    let created_company = insert_company(conn, &input)?;

    println!("Company created successfully!");
    print_company(&created_company);

    Ok(created_company)
}

pub fn company_rm_impl(
    conn: &mut SqliteConnection,
    search_term: String,
    fixed_string: bool,
    yes: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = SearchFilter::new(Some(search_term), fixed_string)?;
    let companies = matching_companies(conn, &filter)?;

    if companies.is_empty() {
        println!("No companies found matching the search term.");
        return Ok(());
    }

    println!("Found {} company(ies) matching the search term:", companies.len());
    for company in &companies {
        let employees = get_employees_for_company(conn, company.id)?;
        println!(
            "  ID: {}, CNPJ: {}, Legal name: {}, Employees: {}",
            company.id,
            company.tax_id,
            company.legal_name,
            employees.len()
        );
    }

    if !yes
        && !confirm(&format!(
            "Are you sure you want to delete these {} company(ies) with all their employees and entries?",
            companies.len()
        ))?
    {
        println!("Operation cancelled.");
        return Ok(());
    }

    let mut deleted_count = 0;
    let mut errors = Vec::new();

    for company in companies {
        match delete_company(conn, company.id) {
            Ok(true) => {
                deleted_count += 1;
                println!("Deleted company: {} (ID: {})", company.legal_name, company.id);
            }
            Ok(false) => {}
            Err(e) => {
                errors.push(format!(
                    "Failed to delete company {} (ID: {}): {}",
                    company.legal_name, company.id, e
                ));
            }
        }
    }

    println!("Successfully deleted {} company(ies).", deleted_count);

    if !errors.is_empty() {
        println!("Errors encountered:");
        for error in errors {
            println!("  {}", error);
        }
        return Err("Some deletions failed".into());
    }

    Ok(())
}

pub fn company_edit_impl(
    conn: &mut SqliteConnection,
    company_id: i32,
    new_legal_name: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(company) = get_company_by_id(conn, company_id)? else {
        return Err(format!("Company with ID {} does not exist", company_id).into());
    };

    let Some(legal_name) = new_legal_name else {
        println!("No fields specified for update. Use --legal-name.");
        return Ok(());
    };

    let input = CompanyInput {
        tax_id: company.tax_id,
        legal_name: legal_name.trim().to_string(),
    };
    let errors = validate_company(&input);
    if !errors.is_empty() {
        return Err(errors.join(" ").into());
    }

    let updated = update_company(conn, company_id, &input)?;

    println!("Company updated successfully!");
    print_company(&updated);

    Ok(())
}
