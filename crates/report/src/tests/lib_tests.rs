use super::*;

fn complete_report() -> ReportContent<'static> {
    ReportContent {
        case_study: "Una clínica comparte historiales con una aseguradora.",
        user_answer: "Falta consentimiento explícito.",
        ia_solution: "Aplicar el principio de limitación de uso.",
        comparison: "Ambas respuestas coinciden parcialmente.",
    }
}

#[test]
fn reports_every_missing_section() {
    let content = ReportContent {
        user_answer: "   ",
        comparison: "",
        ..complete_report()
    };
    assert_eq!(
        content.missing_sections(),
        vec![ReportSection::UserAnswer, ReportSection::Comparison]
    );

    let err = report_pages(&PageLayout::default(), &content).expect_err("missing sections");
    assert!(matches!(err, ReportError::MissingSections(ref s) if s.len() == 2));
    assert!(err.to_string().contains("Respuesta del Usuario"));
}

#[test]
fn full_report_titles_sections_in_print_order() {
    let pages = report_pages(&PageLayout::default(), &complete_report()).expect("pages");
    let titles: Vec<&str> = pages
        .iter()
        .flat_map(|page| page.lines.iter())
        .filter(|line| line.bold)
        .map(|line| line.text.as_str())
        .collect();
    assert_eq!(
        titles,
        vec![
            "Caso de Estudio",
            "Respuesta del Usuario",
            "Solución Generada por IA",
            "Resultado de la Comparación",
        ]
    );
}

#[test]
fn case_pdf_has_no_section_title() {
    let pages = case_pages(&PageLayout::default(), "Caso A");
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].lines.len(), 1);
    assert!(!pages[0].lines[0].bold);
}

#[test]
fn renders_pdf_documents() {
    let bytes = render_case_pdf("Caso A\n\nDescripción del tratamiento de datos.").expect("case");
    assert!(bytes.starts_with(b"%PDF"));

    let long_answer = "respuesta extensa ".repeat(2_000);
    let content = ReportContent {
        user_answer: &long_answer,
        ..complete_report()
    };
    let bytes = render_full_report_pdf(&content).expect("report");
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn full_report_render_refuses_incomplete_content() {
    let content = ReportContent {
        ia_solution: "",
        ..complete_report()
    };
    assert!(matches!(
        render_full_report_pdf(&content),
        Err(ReportError::MissingSections(_))
    ));
}

#[test]
fn writes_pdf_into_missing_export_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    let export_dir = dir.path().join("exports");
    let path = write_pdf(&export_dir, CASE_PDF_FILENAME, b"%PDF-1.3").expect("write");
    assert_eq!(path, export_dir.join("caso_de_estudio.pdf"));
    assert_eq!(std::fs::read(path).expect("read back"), b"%PDF-1.3");
}
