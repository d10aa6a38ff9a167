use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One ranked entry read from the listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillionaireRecord {
    pub name: String,
    pub net_worth: String,
    /// Remote URL, local file path after resizing, or empty when unavailable.
    pub image_reference: String,
}

impl BillionaireRecord {
    pub fn new(
        name: impl Into<String>,
        net_worth: impl Into<String>,
        image_reference: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            net_worth: net_worth.into(),
            image_reference: image_reference.into(),
        }
    }
}

/// CSS selectors locating a row node and its three fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSelectors {
    pub row: String,
    pub name: String,
    pub net_worth: String,
    pub image: String,
}

impl Default for RowSelectors {
    fn default() -> Self {
        Self {
            row: "div.table-row".to_string(),
            name: "div.personName".to_string(),
            net_worth: "div.netWorth".to_string(),
            image: "img".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSettings {
    pub dir: String,
    /// Edge length of the square output image.
    pub size: u32,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            dir: "billionaire_images".to_string(),
            size: 300,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    NetWorth,
    Image,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Field::Name => "name",
            Field::NetWorth => "net worth",
            Field::Image => "image",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingElement(Field),
    MissingAttribute { field: Field, attribute: String },
    EmptyValue(Field),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingElement(field) => write!(f, "no {} element", field),
            SkipReason::MissingAttribute { field, attribute } => {
                write!(f, "{} element has no '{}' attribute", field, attribute)
            }
            SkipReason::EmptyValue(field) => write!(f, "{} is empty", field),
        }
    }
}

/// A row node that did not produce a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSkip {
    /// Zero-based position among the selected row nodes.
    pub index: usize,
    pub reason: SkipReason,
}

pub type RowOutcome = std::result::Result<BillionaireRecord, RowSkip>;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Extraction {
    pub records: Vec<BillionaireRecord>,
    pub skipped: Vec<RowSkip>,
    /// Row nodes inspected after the limit was applied.
    pub rows_seen: usize,
}

impl FromIterator<RowOutcome> for Extraction {
    fn from_iter<I: IntoIterator<Item = RowOutcome>>(iter: I) -> Self {
        let mut extraction = Extraction::default();
        for outcome in iter {
            extraction.rows_seen += 1;
            match outcome {
                Ok(record) => extraction.records.push(record),
                Err(skip) => extraction.skipped.push(skip),
            }
        }
        extraction
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum NetWorthFormat {
    /// Trimmed page text, e.g. `$204.6 B`.
    #[default]
    Raw,
    /// Currency symbols and thousands separators removed.
    Stripped,
    /// Stripped value wrapped as `$<value> billion`.
    Billions,
}

impl NetWorthFormat {
    pub fn apply(self, raw: &str) -> String {
        match self {
            NetWorthFormat::Raw => raw.trim().to_string(),
            NetWorthFormat::Stripped => strip_currency(raw),
            NetWorthFormat::Billions => format!("${} billion", strip_currency(raw)),
        }
    }
}

fn strip_currency(raw: &str) -> String {
    raw.replace(['$', ','], "").trim().to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Plain INSERT, duplicates allowed.
    Insert,
    /// `ON CONFLICT (name) DO NOTHING`
    #[default]
    DoNothing,
    /// `ON CONFLICT (name) DO UPDATE` overwriting image and net worth.
    DoUpdate,
}

impl ConflictPolicy {
    /// Clause appended after `VALUES (...)`; empty for plain inserts.
    pub fn clause(self) -> &'static str {
        match self {
            ConflictPolicy::Insert => "",
            ConflictPolicy::DoNothing => " ON CONFLICT (name) DO NOTHING",
            ConflictPolicy::DoUpdate => {
                " ON CONFLICT (name) DO UPDATE SET image_url = excluded.image_url, net_worth = excluded.net_worth"
            }
        }
    }
}

/// Where the load stage writes records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkSettings {
    Database {
        url: String,
        table: String,
        policy: ConflictPolicy,
        create_table: bool,
    },
    SqlFile {
        output_path: String,
        file_name: String,
        table: String,
        policy: ConflictPolicy,
    },
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub records: Vec<BillionaireRecord>,
    pub images_saved: usize,
    pub images_failed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub destination: String,
    pub attempted: usize,
    pub written: usize,
    pub completed_at: DateTime<Utc>,
}

impl LoadReport {
    pub fn new(destination: impl Into<String>, attempted: usize, written: usize) -> Self {
        Self {
            destination: destination.into(),
            attempted,
            written,
            completed_at: Utc::now(),
        }
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} records written to {} at {}",
            self.written,
            self.attempted,
            self.destination,
            self.completed_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_worth_formats() {
        assert_eq!(NetWorthFormat::Raw.apply("  $204.6 B "), "$204.6 B");
        assert_eq!(NetWorthFormat::Stripped.apply("$1,204.6"), "1204.6");
        assert_eq!(NetWorthFormat::Billions.apply("$1,204.6"), "$1204.6 billion");
    }

    #[test]
    fn test_extraction_collects_outcomes_in_order() {
        let outcomes: Vec<RowOutcome> = vec![
            Ok(BillionaireRecord::new("A", "$1 B", "")),
            Err(RowSkip {
                index: 1,
                reason: SkipReason::MissingElement(Field::Name),
            }),
            Ok(BillionaireRecord::new("C", "$3 B", "")),
        ];

        let extraction: Extraction = outcomes.into_iter().collect();

        assert_eq!(extraction.rows_seen, 3);
        assert_eq!(extraction.records.len(), 2);
        assert_eq!(extraction.records[1].name, "C");
        assert_eq!(extraction.skipped[0].index, 1);
    }

    #[test]
    fn test_load_report_display_includes_completion_time() {
        let mut report = LoadReport::new("billionaires.sql", 3, 2);
        report.completed_at = DateTime::parse_from_rfc3339("2024-03-01T12:30:00Z")
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(
            report.to_string(),
            "2 of 3 records written to billionaires.sql at 2024-03-01 12:30:00 UTC"
        );
    }

    #[test]
    fn test_skip_reason_display() {
        let reason = SkipReason::MissingAttribute {
            field: Field::Image,
            attribute: "src".to_string(),
        };
        assert_eq!(reason.to_string(), "image element has no 'src' attribute");
    }
}
