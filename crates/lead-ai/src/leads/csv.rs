use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::domain::{LeadRecord, LeadSubmission};

/// Errors raised while parsing a lead CSV upload or rendering an export.
#[derive(Debug)]
pub enum CsvImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for CsvImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CsvImportError::Io(err) => write!(f, "failed to read lead CSV: {}", err),
            CsvImportError::Csv(err) => write!(f, "invalid lead CSV data: {}", err),
        }
    }
}

impl std::error::Error for CsvImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CsvImportError::Io(err) => Some(err),
            CsvImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CsvImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CsvImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Parse an uploaded CSV into raw submissions. Only the `name` column is
/// expected; everything else is optional and blank cells become `None`.
pub(crate) fn parse_submissions<R: Read>(reader: R) -> Result<Vec<LeadSubmission>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut submissions = Vec::new();

    for row in csv_reader.deserialize::<LeadRow>() {
        let row = row?;
        submissions.push(row.into_submission());
    }

    Ok(submissions)
}

/// Render stored leads as the downloadable CSV export.
pub(crate) fn render_leads(records: &[LeadRecord]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["name", "email", "company", "status", "quality_score"])?;

    for record in records {
        writer.write_record([
            record.profile.name.as_str(),
            record.profile.email.as_deref().unwrap_or(""),
            record.profile.company.as_deref().unwrap_or(""),
            record.status.label(),
            &record.quality_score.to_string(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|err| {
        csv::Error::from(std::io::Error::new(std::io::ErrorKind::Other, err.to_string()))
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[derive(Debug, Deserialize)]
struct LeadRow {
    #[serde(rename = "name", default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(rename = "email", default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
    #[serde(rename = "company", default, deserialize_with = "empty_string_as_none")]
    company: Option<String>,
    #[serde(rename = "phone", default, deserialize_with = "empty_string_as_none")]
    phone: Option<String>,
    #[serde(rename = "status", default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    #[serde(rename = "notes", default, deserialize_with = "empty_string_as_none")]
    notes: Option<String>,
}

impl LeadRow {
    fn into_submission(self) -> LeadSubmission {
        LeadSubmission {
            name: self.name,
            email: self.email,
            company: self.company,
            phone: self.phone,
            status: self.status,
            notes: self.notes,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
