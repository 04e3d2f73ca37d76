use serde::Deserialize;

/// A cell value that may arrive as a JSON number or string.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    pub fn display(&self) -> String {
        match self {
            // Render integral amounts without a trailing ".0"
            Scalar::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            Scalar::Number(n) => format!("{n}"),
            Scalar::Text(s) => s.clone(),
        }
    }
}

/// One application entry as served by the remote endpoint. Every field is
/// optional; records with missing or null fields are kept and rendered with
/// empty cells.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Application {
    #[serde(rename = "applicationNO", default)]
    pub application_number: Option<Scalar>,
    #[serde(rename = "applicantName", default)]
    pub applicant_name: Option<String>,
    #[serde(rename = "applicationDate", default)]
    pub application_date: Option<String>,
    #[serde(rename = "studentID", default)]
    pub student_id: Option<String>,
    #[serde(rename = "paidAmount", default)]
    pub paid_amount: Option<Scalar>,
    #[serde(rename = "status_En", default)]
    pub status_english: Option<String>,
    #[serde(rename = "status_Ar", default)]
    pub status_arabic: Option<String>,
    #[serde(rename = "lastDate", default)]
    pub last_updated: Option<String>,
}

/// Display columns, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    ApplicationNumber,
    ApplicantName,
    ApplicationDate,
    StudentId,
    PaidAmount,
    StatusEnglish,
    StatusArabic,
    LastUpdated,
}

pub const COLUMNS: [Column; 8] = [
    Column::ApplicationNumber,
    Column::ApplicantName,
    Column::ApplicationDate,
    Column::StudentId,
    Column::PaidAmount,
    Column::StatusEnglish,
    Column::StatusArabic,
    Column::LastUpdated,
];

impl Column {
    pub fn header(&self) -> &'static str {
        match self {
            Column::ApplicationNumber => "Application No",
            Column::ApplicantName => "Applicant Name",
            Column::ApplicationDate => "Application Date",
            Column::StudentId => "Student ID",
            Column::PaidAmount => "Paid Amount",
            Column::StatusEnglish => "Status (English)",
            Column::StatusArabic => "Status (Arabic)",
            Column::LastUpdated => "Last Updated",
        }
    }

    /// The sort key wired to this column, if it is sortable.
    pub fn sort_key(&self) -> Option<SortKey> {
        match self {
            Column::ApplicationNumber => Some(SortKey::ApplicationNumber),
            Column::ApplicantName => Some(SortKey::ApplicantName),
            Column::ApplicationDate => Some(SortKey::ApplicationDate),
            _ => None,
        }
    }
}

/// The three columns the table can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    ApplicationNumber,
    ApplicantName,
    ApplicationDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl Application {
    /// Display string for a column; missing fields render empty.
    pub fn cell(&self, column: Column) -> String {
        match column {
            Column::ApplicationNumber => {
                self.application_number.as_ref().map(Scalar::display)
            }
            Column::ApplicantName => self.applicant_name.clone(),
            Column::ApplicationDate => self.application_date.clone(),
            Column::StudentId => self.student_id.clone(),
            Column::PaidAmount => self.paid_amount.as_ref().map(Scalar::display),
            Column::StatusEnglish => self.status_english.clone(),
            Column::StatusArabic => self.status_arabic.clone(),
            Column::LastUpdated => self.last_updated.clone(),
        }
        .unwrap_or_default()
    }

    /// Sort value for a key, defaulting to the empty string when the field
    /// is absent. All comparisons in the pipeline go through this accessor.
    pub fn sort_value(&self, key: SortKey) -> String {
        match key {
            SortKey::ApplicationNumber => self
                .application_number
                .as_ref()
                .map(Scalar::display)
                .unwrap_or_default(),
            SortKey::ApplicantName => self.applicant_name.clone().unwrap_or_default(),
            SortKey::ApplicationDate => self.application_date.clone().unwrap_or_default(),
        }
    }
}
