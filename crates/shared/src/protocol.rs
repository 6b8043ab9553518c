//! Wire contract with the case-study backend.

use serde::{Deserialize, Serialize};

pub const CASE_PATH: &str = "/case";
pub const UPLOAD_CASE_PATH: &str = "/upload_case";
pub const SOLVE_PATH: &str = "/solve";
pub const COMPARE_PATH: &str = "/compare";

/// Multipart field carrying the uploaded document.
pub const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseResponse {
    #[serde(alias = "case")]
    pub case_study: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadCaseResponse {
    pub uploaded_case: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveRequest {
    #[serde(rename = "case")]
    pub case_study: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveResponse {
    pub ia_solution: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareRequest {
    #[serde(rename = "case")]
    pub case_study: String,
    pub user_solution: String,
    pub ia_solution: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareResponse {
    pub comparison: String,
}
