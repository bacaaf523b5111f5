// ponto-api/src/main.rs

use clap::Parser;
use rocket::error;
use rocket::info;
use std::env;
use std::process::ExitCode;

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Parser)]
#[command(name = "ponto-api")]
#[command(about = "Point-of-work time tracking API server")]
#[command(version)]
struct Cli {
    /// Show extended version information
    #[arg(long, action = clap::ArgAction::SetTrue)]
    version_info: bool,
}

#[rocket::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version_info {
        println!("ponto-api {}", built_info::PKG_VERSION);
        println!("Built: {}", built_info::BUILT_TIME_UTC);
        if let Some(commit) = built_info::GIT_COMMIT_HASH {
            println!("Git commit: {}", commit);
        }
        return ExitCode::SUCCESS;
    }

    // A missing .env is fine; the variables may come from the environment.
    let _ = dotenvy::dotenv();

    match env::current_dir() {
        Ok(path) => info!("Current directory: {}", path.display()),
        Err(e) => error!("Error getting current directory: {}", e),
    };

    let database_url = match env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL must be set (environment or .env)");
            return ExitCode::FAILURE;
        }
    };

    info!("Ponto API v{} starting", built_info::PKG_VERSION);
    info!("Built: {}", built_info::BUILT_TIME_UTC);
    if let Some(commit) = built_info::GIT_COMMIT_HASH {
        info!("Git commit: {}", commit);
    }

    if let Err(e) = ponto_api::rocket(&database_url).launch().await {
        error!("Rocket server failed to launch: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
