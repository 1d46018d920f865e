use serde::{Deserialize, Serialize};

/// Number of numeric features derived from a lead snapshot.
pub const FEATURE_COUNT: usize = 5;

/// Email suffixes treated as business-style domains during encoding and
/// rule-based scoring.
pub const BUSINESS_DOMAIN_SUFFIXES: [&str; 5] = [".com", ".org", ".net", ".io", ".co"];

/// The lead fields consulted by the scoring subsystem. Every field is
/// optional; callers may hand over partially filled records and absent
/// values degrade to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadSnapshot {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl LeadSnapshot {
    pub fn name_text(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn email_text(&self) -> &str {
        self.email.as_deref().unwrap_or("")
    }

    pub fn company_text(&self) -> &str {
        self.company.as_deref().unwrap_or("")
    }
}

/// Ordered, fixed-length numeric encoding of one lead snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }
}

/// Encode a snapshot into its feature vector. Pure and total: the same
/// snapshot always yields the identical vector, and missing fields encode
/// as zeros rather than erroring.
pub fn encode(snapshot: &LeadSnapshot) -> FeatureVector {
    let name = snapshot.name_text();
    let email = snapshot.email_text();
    let company = snapshot.company_text();

    let name_length = name.chars().count() as f64;

    let email_domain_type = if email.is_empty() {
        0.0
    } else {
        // An address without '@' has no domain and never counts as business.
        let domain = match email.rfind('@') {
            Some(position) => &email[position + 1..],
            None => "",
        };
        if BUSINESS_DOMAIN_SUFFIXES
            .iter()
            .any(|suffix| domain.ends_with(suffix))
        {
            1.0
        } else {
            0.0
        }
    };

    let company_name_length = company.chars().count() as f64;
    let has_company = if company.is_empty() { 0.0 } else { 1.0 };
    let has_email = if email.is_empty() { 0.0 } else { 1.0 };

    FeatureVector([
        name_length,
        email_domain_type,
        company_name_length,
        has_company,
        has_email,
    ])
}
