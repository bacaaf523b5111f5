//! Password hashing and session creation.
//!
//! Passwords are stored as Argon2 PHC strings. A successful login writes a
//! row to `sessions` and hands the same opaque token to the client in the
//! `session` cookie.

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use diesel::prelude::*;
use rocket::http::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::models::{Company, Employee, NewSession};
use crate::orm::employee::get_employee_with_company;
use crate::schema::{employees, sessions};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

fn generate_session_token() -> String {
    Uuid::new_v4().to_string()
}

/// Hashes a password using Argon2 with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Verifies a password against a stored hash. An unparseable hash never
/// verifies.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!("Stored password hash is not a valid PHC string: {}", e);
            false
        }
    }
}

/// Looks up the employee by email and checks the password.
/// Returns Ok(None) for an unknown email and for a wrong password alike.
pub fn authenticate(
    conn: &mut SqliteConnection,
    email: &str,
    password: &str,
) -> Result<Option<(Employee, Company)>, diesel::result::Error> {
    let employee_id = employees::table
        .filter(employees::email.eq(email.trim()))
        .select(employees::id)
        .first::<i32>(conn)
        .optional()?;

    let Some(employee_id) = employee_id else {
        return Ok(None);
    };

    match get_employee_with_company(conn, employee_id)? {
        Some((employee, company)) if verify_password(password, &employee.password_hash) => {
            Ok(Some((employee, company)))
        }
        _ => Ok(None),
    }
}

/// Creates a new session row and returns its token.
pub fn create_and_store_session(
    conn: &mut SqliteConnection,
    employee_id: i32,
) -> Result<String, diesel::result::Error> {
    let session_token = generate_session_token();

    let new_session = NewSession {
        id: session_token.clone(),
        employee_id,
        created_at: Utc::now().naive_utc(),
        expires_at: None,
        revoked: false,
    };

    diesel::insert_into(sessions::table)
        .values(&new_session)
        .execute(conn)?;

    Ok(session_token)
}

/// Sets the HTTP-only session cookie. The `secure` flag is dropped in test
/// builds so the local client can send it back over plain HTTP.
pub fn set_session_cookie(cookies: &CookieJar<'_>, session_token: &str) {
    cookies.add(build_session_cookie(session_token));
}

fn build_session_cookie(session_token: &str) -> Cookie<'static> {
    let secure_flag = !cfg!(test);
    Cookie::build((SESSION_COOKIE, session_token.to_string()))
        .http_only(true)
        .secure(secure_flag)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompanyInput, EmployeeInput, Role, Session};
    use crate::orm::company::insert_company;
    use crate::orm::employee::insert_employee;
    use crate::orm::testing::setup_test_db;

    fn insert_dummy_employee(conn: &mut SqliteConnection) -> Employee {
        let company = insert_company(
            conn,
            &CompanyInput {
                tax_id: "11222333000181".to_string(),
                legal_name: "Open Tech Strategies".to_string(),
            },
        )
        .expect("insert dummy company");

        insert_employee(
            conn,
            EmployeeInput {
                name: "Karl Fogel".to_string(),
                email: "karl@ots.com".to_string(),
                password_hash: hash_password("dummy password").unwrap(),
                personal_id: "52998224725".to_string(),
                role: Role::Admin,
                hourly_rate: None,
                daily_work_hours: None,
                lunch_hours: None,
                company_id: company.id,
            },
        )
        .expect("insert dummy employee")
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("correct_password").unwrap();
        assert!(verify_password("correct_password", &hash));
        assert!(!verify_password("wrong_password", &hash));
    }

    #[test]
    fn test_verify_password_rejects_garbage_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_authenticate() {
        let mut conn = setup_test_db();
        let inserted = insert_dummy_employee(&mut conn);

        let (employee, company) = authenticate(&mut conn, "karl@ots.com", "dummy password")
            .unwrap()
            .expect("credentials should match");
        assert_eq!(employee.id, inserted.id);
        assert_eq!(company.legal_name, "Open Tech Strategies");

        assert!(
            authenticate(&mut conn, "karl@ots.com", "wrong")
                .unwrap()
                .is_none()
        );
        assert!(
            authenticate(&mut conn, "nobody@ots.com", "dummy password")
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_create_and_store_session() {
        let mut conn = setup_test_db();
        let inserted = insert_dummy_employee(&mut conn);

        let token = create_and_store_session(&mut conn, inserted.id).unwrap();
        let session = sessions::table
            .filter(sessions::id.eq(&token))
            .first::<Session>(&mut conn)
            .unwrap();

        assert_eq!(session.employee_id, inserted.id);
        assert!(!session.revoked);
        assert!(session.expires_at.is_none());
        let now = Utc::now().naive_utc();
        assert!(session.created_at <= now);
        assert!(session.created_at > now - chrono::Duration::minutes(1));
    }

    #[test]
    fn test_session_cookie_flags() {
        let cookie = build_session_cookie("test_session_token_123");
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "test_session_token_123");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
    }
}
