use super::dataset::SampleLead;
use super::features::{LeadSnapshot, BUSINESS_DOMAIN_SUFFIXES};

/// Company-name terms that earn the technology bonus.
const TECH_TERMS: [&str; 6] = [
    "tech",
    "solutions",
    "digital",
    "software",
    "innovations",
    "systems",
];

/// Deterministic heuristic score in [0, 1] for one lead, consulting the
/// reference dataset for exact and fuzzy matches. Pure function of its two
/// inputs; an empty dataset simply contributes no matches.
pub fn score(snapshot: &LeadSnapshot, reference: &[SampleLead]) -> f64 {
    let name = snapshot.name_text().to_lowercase();
    let email = snapshot.email_text().to_lowercase();
    let company = snapshot.company_text().to_lowercase();

    // A curated entry matching on email or company wins outright and its
    // score is returned verbatim, trusting the reference data.
    for entry in reference {
        if entry.email.to_lowercase() == email || entry.company.to_lowercase() == company {
            return entry.score;
        }
    }

    let mut score = 0.0;

    if !email.is_empty() {
        score += 0.3;
        if BUSINESS_DOMAIN_SUFFIXES
            .iter()
            .any(|suffix| email.ends_with(suffix))
        {
            score += 0.1;
        }
    }

    if !company.is_empty() {
        score += 0.3;
        if TECH_TERMS.iter().any(|term| company.contains(term)) {
            score += 0.1;
        }
    }

    if !name.is_empty() {
        score += 0.2;
    }

    let mut best_match = 0.0f64;
    for entry in reference {
        let name_ratio = similarity_ratio(&name, &entry.name.to_lowercase());
        let company_ratio = similarity_ratio(&company, &entry.company.to_lowercase());
        best_match = best_match.max((name_ratio + company_ratio) / 2.0);
    }
    score += best_match * 0.1;

    score.clamp(0.0, 1.0)
}

/// Normalized matching-blocks similarity in [0, 1]: twice the number of
/// characters covered by recursively extracted longest common substrings,
/// over the combined length. Two empty strings compare as identical.
pub(crate) fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let (start_a, start_b, length) = longest_common_block(a, b);
    if length == 0 {
        return 0;
    }

    length
        + matching_chars(&a[..start_a], &b[..start_b])
        + matching_chars(&a[start_a + length..], &b[start_b + length..])
}

fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut lengths = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        let mut previous = 0;
        for (j, &cb) in b.iter().enumerate() {
            let current = lengths[j + 1];
            if ca == cb {
                lengths[j + 1] = previous + 1;
                if lengths[j + 1] > best.2 {
                    best = (i + 1 - lengths[j + 1], j + 1 - lengths[j + 1], lengths[j + 1]);
                }
            } else {
                lengths[j + 1] = 0;
            }
            previous = current;
        }
    }

    best
}
