use super::domain::{LeadId, LeadProfile, LeadStatus, LeadSubmission};

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 100;
const COMPANY_MIN_CHARS: usize = 2;
const COMPANY_MAX_CHARS: usize = 100;

/// Validation errors raised during lead intake.
#[derive(Debug, thiserror::Error)]
pub enum ValidationViolation {
    #[error("lead name is required")]
    MissingName,
    #[error("lead name must be between {min} and {max} characters")]
    NameLength { min: usize, max: usize },
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("company name must be between {min} and {max} characters")]
    CompanyLength { min: usize, max: usize },
    #[error("unknown lead status: {0}")]
    UnknownStatus(String),
}

/// Guard responsible for turning raw submissions into sanitized profiles.
/// Trims every field, drops empty optionals, and enforces the intake rules
/// before anything reaches scoring or storage.
#[derive(Debug, Clone, Default)]
pub struct LeadIntakeGuard;

impl LeadIntakeGuard {
    pub fn profile_from_submission(
        &self,
        submission: LeadSubmission,
    ) -> Result<(LeadProfile, LeadStatus), ValidationViolation> {
        let name = submission
            .name
            .as_deref()
            .unwrap_or("")
            .trim()
            .to_string();
        if name.is_empty() {
            return Err(ValidationViolation::MissingName);
        }
        let name_chars = name.chars().count();
        if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&name_chars) {
            return Err(ValidationViolation::NameLength {
                min: NAME_MIN_CHARS,
                max: NAME_MAX_CHARS,
            });
        }

        let email = sanitize(submission.email);
        if let Some(address) = &email {
            if !is_structurally_valid_email(address) {
                return Err(ValidationViolation::InvalidEmail(address.clone()));
            }
        }

        let company = sanitize(submission.company);
        if let Some(company_name) = &company {
            let company_chars = company_name.chars().count();
            if !(COMPANY_MIN_CHARS..=COMPANY_MAX_CHARS).contains(&company_chars) {
                return Err(ValidationViolation::CompanyLength {
                    min: COMPANY_MIN_CHARS,
                    max: COMPANY_MAX_CHARS,
                });
            }
        }

        let status = match sanitize(submission.status) {
            Some(raw) => {
                LeadStatus::parse(&raw).ok_or(ValidationViolation::UnknownStatus(raw))?
            }
            None => LeadStatus::default(),
        };

        Ok((
            LeadProfile {
                lead_id: LeadId("pending".to_string()),
                name,
                email,
                company,
                phone: sanitize(submission.phone),
                notes: sanitize(submission.notes),
            },
            status,
        ))
    }
}

fn sanitize(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

/// Structural email check: exactly one `@`, a non-empty local part, and a
/// dotted domain that neither starts nor ends with the dot.
fn is_structurally_valid_email(value: &str) -> bool {
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}
