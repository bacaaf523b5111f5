//! Session revocation.

use diesel::prelude::*;

use crate::schema::sessions::dsl::*;

/// Marks a session as revoked. The row is kept; the token stops working.
/// Returns the number of rows affected (0 for an unknown token).
pub fn revoke_session(
    conn: &mut SqliteConnection,
    session_id: &str,
) -> Result<usize, diesel::result::Error> {
    diesel::update(sessions.filter(id.eq(session_id)))
        .set(revoked.eq(true))
        .execute(conn)
}
