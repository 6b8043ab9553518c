//! PDF export of a case study and of the full answer report.

use std::{
    fs,
    path::{Path, PathBuf},
};

use printpdf::{BuiltinFont, Mm, PdfDocument};
use shared::domain::ReportSection;
use thiserror::Error;
use tracing::debug;

pub mod layout;
pub mod metrics;

use layout::{paginate, Block, Page, PageLayout};

pub const CASE_PDF_FILENAME: &str = "caso_de_estudio.pdf";
pub const REPORT_PDF_FILENAME: &str = "reporte_completo.pdf";

const CASE_DOCUMENT_TITLE: &str = "Caso de Estudio ISO/IEC 29100";
const REPORT_DOCUMENT_TITLE: &str = "Reporte Completo ISO/IEC 29100";
const LAYER_NAME: &str = "Contenido";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report is missing sections: {}", describe_sections(.0))]
    MissingSections(Vec<ReportSection>),
    #[error("failed to render pdf: {0}")]
    Render(String),
    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn describe_sections(sections: &[ReportSection]) -> String {
    sections
        .iter()
        .map(|section| section.title())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Copy)]
pub struct ReportContent<'a> {
    pub case_study: &'a str,
    pub user_answer: &'a str,
    pub ia_solution: &'a str,
    pub comparison: &'a str,
}

impl<'a> ReportContent<'a> {
    pub fn section_text(&self, section: ReportSection) -> &'a str {
        match section {
            ReportSection::CaseStudy => self.case_study,
            ReportSection::UserAnswer => self.user_answer,
            ReportSection::IaSolution => self.ia_solution,
            ReportSection::Comparison => self.comparison,
        }
    }

    /// Sections whose text is empty or whitespace only.
    pub fn missing_sections(&self) -> Vec<ReportSection> {
        ReportSection::ALL
            .into_iter()
            .filter(|section| self.section_text(*section).trim().is_empty())
            .collect()
    }
}

pub fn case_pages(layout: &PageLayout, case_study: &str) -> Vec<Page> {
    paginate(
        layout,
        &[Block {
            title: None,
            body: case_study,
        }],
    )
}

pub fn report_pages(
    layout: &PageLayout,
    content: &ReportContent<'_>,
) -> Result<Vec<Page>, ReportError> {
    let missing = content.missing_sections();
    if !missing.is_empty() {
        return Err(ReportError::MissingSections(missing));
    }

    let blocks = ReportSection::ALL.map(|section| Block {
        title: Some(section.title()),
        body: content.section_text(section),
    });
    Ok(paginate(layout, &blocks))
}

pub fn render_case_pdf(case_study: &str) -> Result<Vec<u8>, ReportError> {
    let layout = PageLayout::default();
    render_pages(&layout, CASE_DOCUMENT_TITLE, &case_pages(&layout, case_study))
}

pub fn render_full_report_pdf(content: &ReportContent<'_>) -> Result<Vec<u8>, ReportError> {
    let layout = PageLayout::default();
    let pages = report_pages(&layout, content)?;
    render_pages(&layout, REPORT_DOCUMENT_TITLE, &pages)
}

pub fn render_pages(
    layout: &PageLayout,
    document_title: &str,
    pages: &[Page],
) -> Result<Vec<u8>, ReportError> {
    let width = Mm(layout.page_width_mm);
    let height = Mm(layout.page_height_mm);
    let (doc, first_page, first_layer) = PdfDocument::new(document_title, width, height, LAYER_NAME);
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|err| ReportError::Render(err.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|err| ReportError::Render(err.to_string()))?;

    let mut targets = vec![(first_page, first_layer)];
    for _ in 1..pages.len() {
        targets.push(doc.add_page(width, height, LAYER_NAME));
    }

    for (page, (page_index, layer_index)) in pages.iter().zip(targets) {
        let layer = doc.get_page(page_index).get_layer(layer_index);
        for line in &page.lines {
            if line.text.is_empty() {
                continue;
            }
            let font = if line.bold { &bold } else { &regular };
            layer.use_text(
                line.text.as_str(),
                line.font_pt,
                Mm(layout.margin_mm),
                Mm(layout.page_height_mm - line.top_mm),
                font,
            );
        }
    }

    debug!(document_title, pages = pages.len().max(1), "rendered pdf");
    doc.save_to_bytes()
        .map_err(|err| ReportError::Render(err.to_string()))
}

pub fn write_pdf(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, ReportError> {
    let path = dir.join(filename);
    fs::create_dir_all(dir).map_err(|source| ReportError::Write {
        path: dir.to_path_buf(),
        source,
    })?;
    fs::write(&path, bytes).map_err(|source| ReportError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
