use serde::{Deserialize, Serialize};

use super::CaseId;

/// A single case returned by the case search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseSummary {
    pub id: CaseId,
    pub title: String,
    pub case_number: String,
    #[serde(default)]
    pub client_name: Option<String>,
}
