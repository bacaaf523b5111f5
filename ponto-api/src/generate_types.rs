//! TypeScript type generation.
//!
//! Exports a `.ts` definition for every API type annotated with
//! `#[ts(export)]` when the test suite runs.

#[cfg(test)]
mod tests {
    use std::{env, path::Path};

    use ts_rs::TS;

    #[test]
    fn generate_typescript_types() {
        // Output directory: PONTO_TS_OUTPUT_DIR, else ../ts-bindings
        let output_dir_str = match env::var("PONTO_TS_OUTPUT_DIR") {
            Ok(env_dir) => {
                println!("Using TypeScript output directory from PONTO_TS_OUTPUT_DIR: {}", env_dir);
                env_dir
            }
            Err(_) => "../ts-bindings".to_string(),
        };

        let output_dir = Path::new(&output_dir_str);
        if !output_dir.exists() {
            std::fs::create_dir_all(output_dir).expect("Failed to create output directory");
        }

        // Remove stale definitions so renamed types don't linger.
        for entry in std::fs::read_dir(output_dir).expect("Failed to read output directory") {
            let path = entry.expect("Failed to read directory entry").path();
            if path.extension().and_then(|s| s.to_str()) == Some("ts") {
                std::fs::remove_file(&path)
                    .unwrap_or_else(|e| panic!("Failed to remove {:?}: {}", path, e));
            }
        }

        unsafe {
            env::set_var("TS_RS_EXPORT_DIR", output_dir);
        }

        use crate::api::auth::{LoginRequest, LoginResponse};
        use crate::api::status::HealthStatus;
        use crate::models::*;
        use crate::response::{ApiResponse, Page};

        Company::export().expect("Failed to export Company type");
        CompanyInput::export().expect("Failed to export CompanyInput type");

        Role::export().expect("Failed to export Role type");
        EmployeeUpdateInput::export().expect("Failed to export EmployeeUpdateInput type");
        EmployeeOutput::export().expect("Failed to export EmployeeOutput type");

        EntryType::export().expect("Failed to export EntryType type");
        TimeEntryInput::export().expect("Failed to export TimeEntryInput type");
        TimeEntryOutput::export().expect("Failed to export TimeEntryOutput type");

        RegistrationInput::export().expect("Failed to export RegistrationInput type");
        RegistrationOutput::export().expect("Failed to export RegistrationOutput type");
        EmployeeRegistrationInput::export()
            .expect("Failed to export EmployeeRegistrationInput type");
        EmployeeRegistrationOutput::export()
            .expect("Failed to export EmployeeRegistrationOutput type");

        ApiResponse::<Company>::export().expect("Failed to export ApiResponse type");
        Page::<TimeEntryOutput>::export().expect("Failed to export Page type");

        LoginRequest::export().expect("Failed to export LoginRequest type");
        LoginResponse::export().expect("Failed to export LoginResponse type");
        HealthStatus::export().expect("Failed to export HealthStatus type");

        println!("TypeScript types generated successfully in {:?}", output_dir);
    }
}
