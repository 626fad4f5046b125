//! Domain records, named after the columns of the external schema
//! (`chercheur`, `publication`, `publier`, `historique_chercheurs`).
//!
//! The application never holds these beyond a single request: they are
//! decoded from result rows, serialized into a response, and dropped.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A full `chercheur` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Researcher {
    pub chno: i64,
    pub chnom: String,
    pub grade: Option<String>,
    pub statut: Option<String>,
    pub daterecrut: Option<NaiveDate>,
    pub salaire: Option<f64>,
    pub prime: Option<f64>,
    pub email: Option<String>,
    pub supno: Option<i64>,
    pub labno: Option<i64>,
    pub facno: Option<i64>,
}

/// Submitted fields for creating a researcher. Forwarded positionally to the
/// store's add routine in this exact order; nothing is validated
/// application-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearcherForm {
    pub chnom: String,
    pub grade: Option<String>,
    pub statut: Option<String>,
    pub daterecrut: Option<NaiveDate>,
    pub salaire: Option<f64>,
    pub prime: Option<f64>,
    pub email: Option<String>,
    pub supno: Option<i64>,
    pub labno: Option<i64>,
    pub facno: Option<i64>,
}

/// Submitted fields for the full update statement (keyed by chno from the
/// path, so the identifier is not part of the body).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearcherUpdate {
    pub chnom: String,
    pub grade: Option<String>,
    pub statut: Option<String>,
    pub salaire: Option<f64>,
    pub prime: Option<f64>,
    pub supno: Option<i64>,
}

/// Partial profile update: absent fields leave the stored value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub grade: Option<String>,
    pub statut: Option<String>,
    pub salaire: Option<f64>,
    pub prime: Option<f64>,
    pub email: Option<String>,
    pub supno: Option<i64>,
    pub labno: Option<i64>,
    pub facno: Option<i64>,
}

/// Reduced researcher view for laboratory listings.
#[derive(Debug, Clone, Serialize)]
pub struct ResearcherSummary {
    pub chno: i64,
    pub chnom: String,
    pub grade: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Publication {
    pub pubno: String,
    pub titre: String,
    pub date: Option<NaiveDate>,
    pub theme: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// One line of a publication's bibliography: author name and authorship rank.
#[derive(Debug, Clone, Serialize)]
pub struct BibliographyEntry {
    pub chnom: String,
    pub rang: i64,
}

/// Audit row produced by the database's history trigger. Read-only here.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub histno: i64,
    pub chno: Option<i64>,
    pub action: String,
    pub action_date: DateTime<Utc>,
}

/// One row of the top-researchers report.
#[derive(Debug, Clone, Serialize)]
pub struct TopResearcher {
    pub chno: i64,
    pub chnom: String,
    pub publication_count: i64,
}
