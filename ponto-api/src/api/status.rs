//! Health and build information.

use rocket::Route;
use serde::Serialize;
use ts_rs::TS;

use crate::response::{Envelope, ok};

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub built: &'static str,
    pub git_commit: Option<&'static str>,
}

/// Health Status endpoint.
///
/// - **URL:** `/api/status`
/// - **Method:** `GET`
/// - **Authentication:** None required
///
/// ```json
/// {
///   "data": {
///     "status": "running",
///     "version": "0.1.0",
///     "built": "Fri, 15 Aug 2025 18:13:43 +0000",
///     "gitCommit": "cd51275141a2e7d49737aa7dd4e8ff7c9a804d67"
///   },
///   "errors": []
/// }
/// ```
#[get("/status")]
pub fn health_status() -> Envelope<HealthStatus> {
    ok(HealthStatus {
        status: "running",
        version: env!("CARGO_PKG_VERSION"),
        built: built_info::BUILT_TIME_UTC,
        git_commit: built_info::GIT_COMMIT_HASH,
    })
}

pub fn routes() -> Vec<Route> {
    routes![health_status]
}
