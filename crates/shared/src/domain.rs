use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// Document formats the case upload dialog offers. The backend remains the
/// authority on what it can extract text from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadFormat {
    Txt,
    Pdf,
    Doc,
    Docx,
}

pub const ACCEPTED_UPLOAD_EXTENSIONS: [&str; 4] = ["txt", "pdf", "doc", "docx"];

impl UploadFormat {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "txt" => Some(Self::Txt),
            "pdf" => Some(Self::Pdf),
            "doc" => Some(Self::Doc),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;
        Self::from_extension(extension)
    }
}

/// Sections of the full report, in print order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSection {
    CaseStudy,
    UserAnswer,
    IaSolution,
    Comparison,
}

impl ReportSection {
    pub const ALL: [ReportSection; 4] = [
        ReportSection::CaseStudy,
        ReportSection::UserAnswer,
        ReportSection::IaSolution,
        ReportSection::Comparison,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ReportSection::CaseStudy => "Caso de Estudio",
            ReportSection::UserAnswer => "Respuesta del Usuario",
            ReportSection::IaSolution => "Solución Generada por IA",
            ReportSection::Comparison => "Resultado de la Comparación",
        }
    }
}
