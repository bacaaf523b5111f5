//! Database fixtures for unit and integration tests.
//!
//! `setup_test_db()` gives a bare migrated in-memory connection.
//! `test_rocket()` gives a fully mounted Rocket on its own shared in-memory
//! database, seeded with the companies and employees listed in [`seed`].

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use rocket::figment::{
    util::map,
    value::{Map, Value},
};
use rocket::{Build, Rocket, fairing::AdHoc};

use super::db::{DbConn, run_pending_migrations, set_foreign_keys};
use crate::models::{Company, CompanyInput, EmployeeInput, Role};
use crate::orm::company::{get_company_by_tax_id, insert_company};
use crate::orm::employee::{get_employee_by_email, insert_employee};
use crate::orm::login::hash_password;

/// Fixed data present in every `test_rocket()` database.
pub mod seed {
    pub const COMPANY_TAX_ID: &str = "11444777000161";
    pub const COMPANY_LEGAL_NAME: &str = "Empresa Teste Ltda";
    pub const OTHER_COMPANY_TAX_ID: &str = "98765432000198";
    pub const OTHER_COMPANY_LEGAL_NAME: &str = "Outra Empresa SA";

    pub const ADMIN_EMAIL: &str = "admin@teste.com";
    pub const ADMIN_PASSWORD: &str = "adminpass";
    pub const ADMIN_PERSONAL_ID: &str = "98765432100";
    pub const USER_EMAIL: &str = "user@teste.com";
    pub const USER_PASSWORD: &str = "userpass";
    pub const USER_PERSONAL_ID: &str = "24681357928";
    pub const COLLEAGUE_EMAIL: &str = "colleague@teste.com";
    pub const COLLEAGUE_PASSWORD: &str = "colleaguepass";
    pub const COLLEAGUE_PERSONAL_ID: &str = "13579246828";
    /// Admin of the other company.
    pub const OUTSIDER_EMAIL: &str = "outsider@outra.com";
    pub const OUTSIDER_PASSWORD: &str = "outsiderpass";
    pub const OUTSIDER_PERSONAL_ID: &str = "31415926590";
}

/// Trades durability for speed. Test databases only.
fn set_sqlite_test_pragmas(conn: &mut SqliteConnection) -> QueryResult<()> {
    conn.batch_execute(
        r#"
        PRAGMA synchronous = OFF;
        PRAGMA journal_mode = OFF;
        "#,
    )
}

fn set_sqlite_test_pragmas_fairing() -> AdHoc {
    AdHoc::try_on_ignite("Set SQLite Test Pragmas", |rocket| async {
        let Some(conn) = DbConn::get_one(&rocket).await else {
            return Err(rocket);
        };
        match conn.run(set_sqlite_test_pragmas).await {
            Ok(()) => Ok(rocket),
            Err(e) => {
                error!("[test-data-init] Failed to set SQLite pragmas: {:?}", e);
                Err(rocket)
            }
        }
    })
}

fn test_data_init_fairing() -> AdHoc {
    AdHoc::try_on_ignite("Test Data Initialization", |rocket| async {
        let Some(conn) = DbConn::get_one(&rocket).await else {
            return Err(rocket);
        };
        match conn.run(create_test_data).await {
            Ok(()) => {
                info!("[test-data-init] Test data initialization completed");
                Ok(rocket)
            }
            Err(e) => {
                error!("[test-data-init] Failed to create test data: {}", e);
                Err(rocket)
            }
        }
    })
}

/// Creates the [`seed`] companies and employees. Safe to call twice.
pub fn create_test_data(conn: &mut SqliteConnection) -> Result<(), String> {
    use seed::*;

    let company = find_or_create_company(conn, COMPANY_TAX_ID, COMPANY_LEGAL_NAME)?;
    let other = find_or_create_company(conn, OTHER_COMPANY_TAX_ID, OTHER_COMPANY_LEGAL_NAME)?;

    let employees = [
        ("Ana Admin", ADMIN_EMAIL, ADMIN_PASSWORD, ADMIN_PERSONAL_ID, Role::Admin, company.id),
        ("Ulisses User", USER_EMAIL, USER_PASSWORD, USER_PERSONAL_ID, Role::User, company.id),
        ("Carla Colega", COLLEAGUE_EMAIL, COLLEAGUE_PASSWORD, COLLEAGUE_PERSONAL_ID, Role::User, company.id),
        ("Otto Outsider", OUTSIDER_EMAIL, OUTSIDER_PASSWORD, OUTSIDER_PERSONAL_ID, Role::Admin, other.id),
    ];

    for (name, email, password, personal_id, role, company_id) in employees {
        if get_employee_by_email(conn, email)
            .map_err(|e| e.to_string())?
            .is_some()
        {
            continue;
        }
        let password_hash = hash_password(password).map_err(|e| e.to_string())?;
        insert_employee(
            conn,
            EmployeeInput {
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
                personal_id: personal_id.to_string(),
                role,
                hourly_rate: Some(50.0),
                daily_work_hours: Some(8.0),
                lunch_hours: Some(1.0),
                company_id,
            },
        )
        .map_err(|e| e.to_string())?;
        info!("[test-data-init] Created employee '{}'", email);
    }

    Ok(())
}

fn find_or_create_company(
    conn: &mut SqliteConnection,
    tax_id: &str,
    legal_name: &str,
) -> Result<Company, String> {
    if let Some(company) = get_company_by_tax_id(conn, tax_id).map_err(|e| e.to_string())? {
        return Ok(company);
    }
    insert_company(
        conn,
        &CompanyInput {
            tax_id: tax_id.to_string(),
            legal_name: legal_name.to_string(),
        },
    )
    .map_err(|e| e.to_string())
}

/// Creates a Rocket instance on a unique shared in-memory SQLite database,
/// with foreign keys on, migrations run, seed data loaded and all API
/// routes, catchers and CORS attached.
pub fn test_rocket() -> Rocket<Build> {
    use uuid::Uuid;

    let unique_db_name = format!("file:test_db_{}?mode=memory&cache=shared", Uuid::new_v4());

    let db_config: Map<_, Value> = map! {
        "url" => unique_db_name.into(),
        "pool_size" => 5.into(),
        "timeout" => 5.into(),
    };

    let figment = rocket::Config::figment().merge(("databases", map!["sqlite_db" => db_config]));

    let rocket = rocket::custom(figment)
        .attach(DbConn::fairing())
        .attach(super::db::set_foreign_keys_fairing())
        .attach(set_sqlite_test_pragmas_fairing())
        .attach(super::db::run_migrations_fairing())
        .attach(test_data_init_fairing());

    crate::mount_api_routes(rocket)
}

/// Fresh in-memory database with foreign keys on and all migrations applied.
///
/// # Panics
/// Panics if the database cannot be created or migrated.
pub fn setup_test_db() -> SqliteConnection {
    let mut conn = SqliteConnection::establish(":memory:")
        .expect("Failed to create in-memory SQLite database");
    set_foreign_keys(&mut conn).expect("Failed to enable foreign keys");
    run_pending_migrations(&mut conn).expect("Failed to run migrations");
    conn
}
