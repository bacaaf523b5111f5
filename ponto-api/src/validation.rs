//! Field validation for every request DTO.
//!
//! Each `validate_*` function returns the violated constraints in field order,
//! at most one message per field. An empty vector means the input is valid.
//! Domain checks (uniqueness, existence) are appended by the handlers.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::models::{
    CompanyInput, DATE_FORMAT, EmployeeRegistrationInput, EmployeeUpdateInput, EntryType,
    RegistrationInput, TimeEntryInput,
};

/// User-facing messages. These strings are part of the API contract.
pub mod messages {
    pub const TAX_ID_BLANK: &str = "CNPJ não pode ser vazio.";
    pub const TAX_ID_INVALID: &str = "CNPJ inválido.";
    pub const LEGAL_NAME_BLANK: &str = "Razão social não pode ser vazia.";
    pub const LEGAL_NAME_LENGTH: &str = "Razão social deve conter entre 5 e 200 caracteres.";
    pub const NAME_BLANK: &str = "Nome não pode ser vazio.";
    pub const NAME_LENGTH: &str = "Nome deve conter entre 3 e 150 caracteres.";
    pub const EMAIL_BLANK: &str = "Email não pode ser vazio.";
    pub const EMAIL_LENGTH: &str = "Email deve conter entre 5 e 200 caracteres.";
    pub const EMAIL_INVALID: &str = "Email inválido.";
    pub const PASSWORD_BLANK: &str = "Senha não pode ser vazia.";
    pub const PERSONAL_ID_BLANK: &str = "CPF não pode ser vazio.";
    pub const PERSONAL_ID_INVALID: &str = "CPF inválido.";
    pub const HOURLY_RATE_NEGATIVE: &str = "Valor hora deve ser positivo.";
    pub const DAILY_HOURS_NEGATIVE: &str = "Horas de trabalho por dia devem ser positivas.";
    pub const LUNCH_HOURS_NEGATIVE: &str = "Horas de almoço devem ser positivas.";
    pub const DATE_BLANK: &str = "Data não pode ser vazia.";
    pub const DATE_INVALID: &str = "Data inválida.";
    pub const ENTRY_TYPE_INVALID: &str = "Tipo inválido.";

    pub const COMPANY_EXISTS: &str = "Empresa já existente.";
    pub const PERSONAL_ID_EXISTS: &str = "CPF já existente.";
    pub const EMAIL_EXISTS: &str = "Email já existente.";
    pub const COMPANY_NOT_REGISTERED: &str = "Empresa não cadastrada.";
    pub const ENTRY_EMPLOYEE_NOT_FOUND: &str = "Funcionário não encontrado. ID inexistente.";
    pub const EMPLOYEE_NOT_FOUND: &str = "Funcionário não encontrado.";

    pub const INVALID_REQUEST: &str = "Requisição inválida";
    pub const ROUTE_NOT_FOUND: &str = "Recurso não encontrado.";

    pub fn company_not_found(tax_id: &str) -> String {
        format!("Empresa não encontrada para o CNPJ {}.", tax_id)
    }

    pub fn entry_not_found(id: i32) -> String {
        format!("Lançamento não encontrado para o id {}.", id)
    }

    pub fn entry_not_removed(id: i32) -> String {
        format!(
            "Erro ao remover lançamento. Registro não encontrado para o id {}.",
            id
        )
    }

    pub const CREDENTIALS_REQUIRED: &str = "Email e senha são obrigatórios.";
    pub const INVALID_CREDENTIALS: &str = "Credenciais inválidas.";
    pub const UNAUTHORIZED: &str = "Acesso não autorizado.";
    pub const FORBIDDEN: &str = "Acesso negado.";
    pub const INTERNAL_ERROR: &str = "Erro interno do servidor.";
}

use messages::*;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles")
});

const CNPJ_FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CPF_FIRST_WEIGHTS: [u32; 9] = [10, 9, 8, 7, 6, 5, 4, 3, 2];
const CPF_SECOND_WEIGHTS: [u32; 10] = [11, 10, 9, 8, 7, 6, 5, 4, 3, 2];

/// Strips the usual CNPJ/CPF punctuation (`.`, `/`, `-`) and surrounding
/// whitespace. Digits-only input is returned unchanged.
pub fn normalize_document(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, '.' | '/' | '-'))
        .collect()
}

/// Mod-11 check digit shared by CNPJ and CPF.
fn check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    let rest = sum % 11;
    if rest < 2 { 0 } else { 11 - rest }
}

fn to_digits(value: &str, len: usize) -> Option<Vec<u32>> {
    if value.len() != len {
        return None;
    }
    let digits: Option<Vec<u32>> = value.chars().map(|c| c.to_digit(10)).collect();
    let digits = digits?;
    // Repeated-digit sequences pass the checksum but are never issued.
    if digits.iter().all(|d| *d == digits[0]) {
        return None;
    }
    Some(digits)
}

/// Validates a digits-only CNPJ (14 digits, two check digits).
pub fn is_valid_cnpj(value: &str) -> bool {
    let Some(digits) = to_digits(value, 14) else {
        return false;
    };
    check_digit(&digits[..12], &CNPJ_FIRST_WEIGHTS) == digits[12]
        && check_digit(&digits[..13], &CNPJ_SECOND_WEIGHTS) == digits[13]
}

/// Validates a digits-only CPF (11 digits, two check digits).
pub fn is_valid_cpf(value: &str) -> bool {
    let Some(digits) = to_digits(value, 11) else {
        return false;
    };
    check_digit(&digits[..9], &CPF_FIRST_WEIGHTS) == digits[9]
        && check_digit(&digits[..10], &CPF_SECOND_WEIGHTS) == digits[10]
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

fn char_len_between(value: &str, min: usize, max: usize) -> bool {
    let len = value.chars().count();
    len >= min && len <= max
}

fn check_tax_id(errors: &mut Vec<String>, tax_id: &str) {
    let tax_id = normalize_document(tax_id);
    if tax_id.is_empty() {
        errors.push(TAX_ID_BLANK.to_string());
    } else if !is_valid_cnpj(&tax_id) {
        errors.push(TAX_ID_INVALID.to_string());
    }
}

fn check_personal_id(errors: &mut Vec<String>, personal_id: &str) {
    let personal_id = normalize_document(personal_id);
    if personal_id.is_empty() {
        errors.push(PERSONAL_ID_BLANK.to_string());
    } else if !is_valid_cpf(&personal_id) {
        errors.push(PERSONAL_ID_INVALID.to_string());
    }
}

fn check_legal_name(errors: &mut Vec<String>, legal_name: &str) {
    let legal_name = legal_name.trim();
    if legal_name.is_empty() {
        errors.push(LEGAL_NAME_BLANK.to_string());
    } else if !char_len_between(legal_name, 5, 200) {
        errors.push(LEGAL_NAME_LENGTH.to_string());
    }
}

fn check_name(errors: &mut Vec<String>, name: &str) {
    let name = name.trim();
    if name.is_empty() {
        errors.push(NAME_BLANK.to_string());
    } else if !char_len_between(name, 3, 150) {
        errors.push(NAME_LENGTH.to_string());
    }
}

fn check_email(errors: &mut Vec<String>, email: &str) {
    let email = email.trim();
    if email.is_empty() {
        errors.push(EMAIL_BLANK.to_string());
    } else if !char_len_between(email, 5, 200) {
        errors.push(EMAIL_LENGTH.to_string());
    } else if !is_valid_email(email) {
        errors.push(EMAIL_INVALID.to_string());
    }
}

fn check_password(errors: &mut Vec<String>, password: &str) {
    if password.trim().is_empty() {
        errors.push(PASSWORD_BLANK.to_string());
    }
}

fn check_non_negative(errors: &mut Vec<String>, value: Option<f64>, message: &str) {
    if let Some(v) = value {
        if !v.is_finite() || v < 0.0 {
            errors.push(message.to_string());
        }
    }
}

fn check_work_figures(
    errors: &mut Vec<String>,
    hourly_rate: Option<f64>,
    daily_work_hours: Option<f64>,
    lunch_hours: Option<f64>,
) {
    check_non_negative(errors, hourly_rate, HOURLY_RATE_NEGATIVE);
    check_non_negative(errors, daily_work_hours, DAILY_HOURS_NEGATIVE);
    check_non_negative(errors, lunch_hours, LUNCH_HOURS_NEGATIVE);
}

pub fn validate_company(input: &CompanyInput) -> Vec<String> {
    let mut errors = Vec::new();
    check_tax_id(&mut errors, &input.tax_id);
    check_legal_name(&mut errors, &input.legal_name);
    errors
}

pub fn validate_registration(input: &RegistrationInput) -> Vec<String> {
    let mut errors = Vec::new();
    check_name(&mut errors, &input.name);
    check_email(&mut errors, &input.email);
    check_password(&mut errors, &input.password);
    check_personal_id(&mut errors, &input.personal_id);
    check_tax_id(&mut errors, &input.tax_id);
    check_legal_name(&mut errors, &input.legal_name);
    errors
}

pub fn validate_employee_registration(input: &EmployeeRegistrationInput) -> Vec<String> {
    let mut errors = Vec::new();
    check_name(&mut errors, &input.name);
    check_email(&mut errors, &input.email);
    check_password(&mut errors, &input.password);
    check_personal_id(&mut errors, &input.personal_id);
    check_work_figures(
        &mut errors,
        input.hourly_rate,
        input.daily_work_hours,
        input.lunch_hours,
    );
    check_tax_id(&mut errors, &input.tax_id);
    errors
}

pub fn validate_employee_update(input: &EmployeeUpdateInput) -> Vec<String> {
    let mut errors = Vec::new();
    check_name(&mut errors, &input.name);
    check_email(&mut errors, &input.email);
    check_work_figures(
        &mut errors,
        input.hourly_rate,
        input.daily_work_hours,
        input.lunch_hours,
    );
    errors
}

/// Parses a `YYYY-MM-DD HH:MM:SS` punch date.
pub fn parse_entry_date(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

pub fn validate_time_entry(input: &TimeEntryInput) -> Vec<String> {
    let mut errors = Vec::new();
    if input.date.trim().is_empty() {
        errors.push(DATE_BLANK.to_string());
    } else if parse_entry_date(&input.date).is_none() {
        errors.push(DATE_INVALID.to_string());
    }
    if input.entry_type.trim().parse::<EntryType>().is_err() {
        errors.push(ENTRY_TYPE_INVALID.to_string());
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cnpj_checksum() {
        assert!(is_valid_cnpj("11222333000181"));
        assert!(is_valid_cnpj("11222333000262"));
        assert!(!is_valid_cnpj("11222333000182"));
        assert!(!is_valid_cnpj("1122233300018"));
        assert!(!is_valid_cnpj("11111111111111"));
        assert!(!is_valid_cnpj("1122233300018a"));
    }

    #[test]
    fn test_cpf_checksum() {
        assert!(is_valid_cpf("52998224725"));
        assert!(is_valid_cpf("11144477735"));
        assert!(is_valid_cpf("12345678909"));
        assert!(!is_valid_cpf("52998224726"));
        assert!(!is_valid_cpf("00000000000"));
        assert!(!is_valid_cpf("5299822472"));
    }

    #[test]
    fn test_normalize_document_strips_punctuation() {
        assert_eq!(normalize_document(" 11.222.333/0001-81 "), "11222333000181");
        assert_eq!(normalize_document("529.982.247-25"), "52998224725");
        assert_eq!(normalize_document("11222333000181"), "11222333000181");
    }

    #[test]
    fn test_validate_company_ok() {
        let input = CompanyInput {
            tax_id: "11222333000181".to_string(),
            legal_name: "Acme LLC".to_string(),
        };
        assert!(validate_company(&input).is_empty());
    }

    #[test]
    fn test_validate_company_blank_fields() {
        let errors = validate_company(&CompanyInput::default());
        assert_eq!(errors, vec![TAX_ID_BLANK, LEGAL_NAME_BLANK]);
    }

    #[test]
    fn test_validate_company_malformed() {
        let input = CompanyInput {
            tax_id: "12345".to_string(),
            legal_name: "Acm".to_string(),
        };
        assert_eq!(
            validate_company(&input),
            vec![TAX_ID_INVALID, LEGAL_NAME_LENGTH]
        );
    }

    #[test]
    fn test_validate_registration_reports_in_field_order() {
        let input = RegistrationInput {
            name: "Jo".to_string(),
            email: "not-an-email".to_string(),
            password: " ".to_string(),
            personal_id: "52998224726".to_string(),
            tax_id: "".to_string(),
            legal_name: "Acme LLC".to_string(),
        };
        assert_eq!(
            validate_registration(&input),
            vec![
                NAME_LENGTH,
                EMAIL_INVALID,
                PASSWORD_BLANK,
                PERSONAL_ID_INVALID,
                TAX_ID_BLANK
            ]
        );
    }

    #[test]
    fn test_validate_employee_registration_rejects_negative_figures() {
        let input = EmployeeRegistrationInput {
            name: "Maria Silva".to_string(),
            email: "maria@example.com".to_string(),
            password: "secret".to_string(),
            personal_id: "52998224725".to_string(),
            hourly_rate: Some(-1.0),
            daily_work_hours: Some(8.0),
            lunch_hours: Some(-0.5),
            tax_id: "11222333000181".to_string(),
        };
        assert_eq!(
            validate_employee_registration(&input),
            vec![HOURLY_RATE_NEGATIVE, LUNCH_HOURS_NEGATIVE]
        );
    }

    #[test]
    fn test_validate_time_entry() {
        let ok = TimeEntryInput {
            date: "2025-03-01 08:00:00".to_string(),
            entry_type: "WORK_START".to_string(),
            ..Default::default()
        };
        assert!(validate_time_entry(&ok).is_empty());

        let bad = TimeEntryInput {
            date: "01/03/2025".to_string(),
            entry_type: "COFFEE".to_string(),
            ..Default::default()
        };
        assert_eq!(validate_time_entry(&bad), vec![DATE_INVALID, ENTRY_TYPE_INVALID]);

        let blank = TimeEntryInput::default();
        assert_eq!(validate_time_entry(&blank), vec![DATE_BLANK, ENTRY_TYPE_INVALID]);
    }
}
