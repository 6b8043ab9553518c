//! View state for one case-study lifecycle and the controller that keeps it
//! consistent.
//!
//! Every network action is split into a `begin_*` step, which checks the
//! preconditions, raises the loading flag and yields the [`BackendRequest`]
//! to issue, and [`CaseController::complete`], which applies the outcome.
//! [`CaseSession`] glues both halves around an awaited backend call; the
//! desktop shell runs the request on its worker thread instead and feeds the
//! outcome back through the same `complete`.

use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
    time::Duration,
};

use report::{ReportContent, CASE_PDF_FILENAME, REPORT_PDF_FILENAME};
use shared::{
    domain::{NoticeKind, UploadFormat},
    protocol::CompareRequest,
};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::{BackendError, CaseBackend, CaseUpload};

pub const UPLOAD_NOTICE_TTL: Duration = Duration::from_millis(3000);

pub const EMPTY_ANSWER_COMPARISON: &str =
    "No se proporcionó una respuesta manual, por lo que no es posible realizar la comparación.";

const GENERATE_FAILED: &str = "Error al generar el caso";
const SOLVE_FAILED: &str = "Error al obtener la solución IA";
const COMPARE_FAILED: &str = "Error al comparar las respuestas";
const UPLOAD_SUCCEEDED: &str = "Caso de estudio cargado con éxito";
const UPLOAD_FAILED: &str = "Error al cargar el caso";
const CASE_REQUIRED: &str = "Primero genera o carga un caso de estudio.";
const SOLUTION_REQUIRED: &str = "Primero obtén la solución IA.";
const NOTHING_TO_EXPORT: &str = "No hay un caso de estudio para descargar.";
const REPORT_INCOMPLETE: &str =
    "Completa el caso, tu respuesta, la solución IA y la comparación antes de descargar el reporte.";
const EXPORT_FAILED: &str = "Error al generar el PDF";
const UNEXPECTED_EXTENSION: &str =
    "El archivo no es .txt, .pdf, .doc ni .docx; se enviará de todas formas.";

/// Notices beyond this many are dropped oldest first until the caller drains
/// them with [`CaseController::take_notices`].
pub const MAX_PENDING_NOTICES: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadNotice {
    pub kind: NoticeKind,
    pub message: String,
    expires_at: Instant,
}

impl UploadNotice {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}

#[derive(Debug, Default)]
pub struct ViewState {
    case_study: String,
    manual_input: String,
    ia_solution: String,
    comparison: String,
    is_loading: bool,
    upload_notice: Option<UploadNotice>,
    selected_upload: Option<PathBuf>,
    notices: VecDeque<Notice>,
}

impl ViewState {
    pub fn case_study(&self) -> &str {
        &self.case_study
    }

    pub fn manual_input(&self) -> &str {
        &self.manual_input
    }

    pub fn ia_solution(&self) -> &str {
        &self.ia_solution
    }

    pub fn comparison(&self) -> &str {
        &self.comparison
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn selected_upload(&self) -> Option<&Path> {
        self.selected_upload.as_deref()
    }

    /// The upload notice, unless it has outlived [`UPLOAD_NOTICE_TTL`].
    pub fn upload_notice_at(&self, now: Instant) -> Option<&UploadNotice> {
        self.upload_notice
            .as_ref()
            .filter(|notice| !notice.is_expired(now))
    }

    pub fn upload_notice(&self) -> Option<&UploadNotice> {
        self.upload_notice_at(Instant::now())
    }

    pub fn is_empty(&self) -> bool {
        self.case_study.is_empty()
            && self.manual_input.is_empty()
            && self.ia_solution.is_empty()
            && self.comparison.is_empty()
            && self.upload_notice.is_none()
            && self.selected_upload.is_none()
    }

    fn replace_case(&mut self, case_study: String) {
        self.case_study = case_study;
        self.clear_derived();
    }

    fn clear_derived(&mut self) {
        self.manual_input.clear();
        self.ia_solution.clear();
        self.comparison.clear();
    }

    fn push_notice(&mut self, kind: NoticeKind, message: impl Into<String>) {
        if self.notices.len() == MAX_PENDING_NOTICES {
            self.notices.pop_front();
        }
        self.notices.push_back(Notice::new(kind, message));
    }

    fn set_upload_notice(&mut self, kind: NoticeKind, message: &str) {
        self.upload_notice = Some(UploadNotice {
            kind,
            message: message.to_string(),
            expires_at: Instant::now() + UPLOAD_NOTICE_TTL,
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendRequest {
    GenerateCase,
    UploadCase(PathBuf),
    Solve { case_study: String },
    Compare(CompareRequest),
}

impl BackendRequest {
    pub fn name(&self) -> &'static str {
        match self {
            BackendRequest::GenerateCase => "generate_case",
            BackendRequest::UploadCase(_) => "upload_case",
            BackendRequest::Solve { .. } => "solve",
            BackendRequest::Compare(_) => "compare",
        }
    }
}

#[derive(Debug)]
pub enum BackendOutcome {
    CaseGenerated(Result<String, BackendError>),
    CaseUploaded(Result<String, BackendError>),
    Solved(Result<String, BackendError>),
    Compared(Result<String, BackendError>),
}

impl BackendOutcome {
    /// The outcome of `request` when it could not be issued at all.
    pub fn failed(request: &BackendRequest, err: BackendError) -> Self {
        match request {
            BackendRequest::GenerateCase => BackendOutcome::CaseGenerated(Err(err)),
            BackendRequest::UploadCase(_) => BackendOutcome::CaseUploaded(Err(err)),
            BackendRequest::Solve { .. } => BackendOutcome::Solved(Err(err)),
            BackendRequest::Compare(_) => BackendOutcome::Compared(Err(err)),
        }
    }
}

pub async fn execute(backend: &dyn CaseBackend, request: BackendRequest) -> BackendOutcome {
    match request {
        BackendRequest::GenerateCase => BackendOutcome::CaseGenerated(backend.generate_case().await),
        BackendRequest::UploadCase(path) => {
            let result = match CaseUpload::from_path(&path).await {
                Ok(upload) => backend.upload_case(upload).await,
                Err(err) => Err(err),
            };
            BackendOutcome::CaseUploaded(result)
        }
        BackendRequest::Solve { case_study } => {
            BackendOutcome::Solved(backend.solve(&case_study).await)
        }
        BackendRequest::Compare(request) => {
            BackendOutcome::Compared(backend.compare(request).await)
        }
    }
}

/// Owns the [`ViewState`] and applies every user action and backend outcome
/// to it.
#[derive(Debug)]
pub struct CaseController {
    state: ViewState,
    export_dir: PathBuf,
}

impl CaseController {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            state: ViewState::default(),
            export_dir: export_dir.into(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn set_manual_input(&mut self, text: impl Into<String>) {
        self.state.manual_input = text.into();
    }

    /// Editable buffer for the answer editor.
    pub fn manual_input_mut(&mut self) -> &mut String {
        &mut self.state.manual_input
    }

    pub fn clear_derived(&mut self) {
        self.state.clear_derived();
    }

    /// Drains the pending notices. Callers are expected to do this after
    /// every action; the queue keeps only the newest [`MAX_PENDING_NOTICES`].
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.state.notices.drain(..).collect()
    }

    /// Drops the upload notice once it has expired.
    pub fn prune_expired(&mut self, now: Instant) {
        if self
            .state
            .upload_notice
            .as_ref()
            .is_some_and(|notice| notice.is_expired(now))
        {
            self.state.upload_notice = None;
        }
    }

    /// Records the file-input selection. Returns `false` when the same file is
    /// selected again, in which case no upload is triggered.
    pub fn select_upload_file(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if self.state.selected_upload.as_ref() == Some(&path) {
            return false;
        }
        self.state.selected_upload = Some(path);
        true
    }

    pub fn reset(&mut self) {
        let notices = std::mem::take(&mut self.state.notices);
        let is_loading = self.state.is_loading;
        self.state = ViewState {
            notices,
            is_loading,
            ..ViewState::default()
        };
        info!("view state reset");
    }

    fn start(&mut self, request: BackendRequest) -> Option<BackendRequest> {
        self.state.is_loading = true;
        Some(request)
    }

    pub fn begin_generate_case(&mut self) -> Option<BackendRequest> {
        self.start(BackendRequest::GenerateCase)
    }

    pub fn begin_upload_case(&mut self, path: impl Into<PathBuf>) -> Option<BackendRequest> {
        let path = path.into();
        let advisory_ok = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(UploadFormat::from_filename)
            .is_some();
        if !advisory_ok {
            warn!(path = %path.display(), "uploading file with unexpected extension");
            self.state.push_notice(NoticeKind::Info, UNEXPECTED_EXTENSION);
        }
        self.state.selected_upload = Some(path.clone());
        self.start(BackendRequest::UploadCase(path))
    }

    pub fn begin_request_solution(&mut self) -> Option<BackendRequest> {
        if self.state.case_study.trim().is_empty() {
            self.state.push_notice(NoticeKind::Error, CASE_REQUIRED);
            return None;
        }
        let case_study = self.state.case_study.clone();
        self.start(BackendRequest::Solve { case_study })
    }

    pub fn begin_compare_answers(&mut self) -> Option<BackendRequest> {
        if self.state.manual_input.trim().is_empty() {
            info!("no manual answer; using placeholder comparison");
            self.state.comparison = EMPTY_ANSWER_COMPARISON.to_string();
            return None;
        }
        if self.state.case_study.trim().is_empty() {
            self.state.push_notice(NoticeKind::Error, CASE_REQUIRED);
            return None;
        }
        if self.state.ia_solution.trim().is_empty() {
            self.state.push_notice(NoticeKind::Error, SOLUTION_REQUIRED);
            return None;
        }
        let request = CompareRequest {
            case_study: self.state.case_study.clone(),
            user_solution: self.state.manual_input.clone(),
            ia_solution: self.state.ia_solution.clone(),
        };
        self.start(BackendRequest::Compare(request))
    }

    pub fn complete(&mut self, outcome: BackendOutcome) {
        self.state.is_loading = false;
        match outcome {
            BackendOutcome::CaseGenerated(Ok(case_study)) => {
                info!(chars = case_study.len(), "case study generated");
                self.state.replace_case(case_study);
            }
            BackendOutcome::CaseGenerated(Err(err)) => {
                warn!("case generation failed: {err}");
                self.state.push_notice(NoticeKind::Error, GENERATE_FAILED);
            }
            BackendOutcome::CaseUploaded(Ok(case_study)) => {
                info!(chars = case_study.len(), "case study uploaded");
                self.state.replace_case(case_study);
                self.state
                    .set_upload_notice(NoticeKind::Success, UPLOAD_SUCCEEDED);
            }
            BackendOutcome::CaseUploaded(Err(err)) => {
                warn!("case upload failed: {err}");
                self.state.set_upload_notice(NoticeKind::Error, UPLOAD_FAILED);
            }
            BackendOutcome::Solved(Ok(solution)) => {
                info!(chars = solution.len(), "ia solution received");
                self.state.ia_solution = solution;
            }
            BackendOutcome::Solved(Err(err)) => {
                warn!("solve request failed: {err}");
                self.state.push_notice(NoticeKind::Error, SOLVE_FAILED);
            }
            BackendOutcome::Compared(Ok(comparison)) => {
                info!(chars = comparison.len(), "comparison received");
                self.state.comparison = comparison;
            }
            BackendOutcome::Compared(Err(err)) => {
                warn!("compare request failed: {err}");
                self.state.push_notice(NoticeKind::Error, COMPARE_FAILED);
            }
        }
    }

    /// Writes the case study alone to `caso_de_estudio.pdf`.
    pub fn download_case_pdf(&mut self) -> Option<PathBuf> {
        if self.state.case_study.trim().is_empty() {
            self.state.push_notice(NoticeKind::Error, NOTHING_TO_EXPORT);
            return None;
        }
        let written = report::render_case_pdf(&self.state.case_study).and_then(|bytes| {
            report::write_pdf(&self.export_dir, CASE_PDF_FILENAME, &bytes)
        });
        self.finish_export(written)
    }

    /// Writes the four-section report to `reporte_completo.pdf`. Nothing is
    /// generated unless every section has text.
    pub fn download_full_report_pdf(&mut self) -> Option<PathBuf> {
        let content = ReportContent {
            case_study: &self.state.case_study,
            user_answer: &self.state.manual_input,
            ia_solution: &self.state.ia_solution,
            comparison: &self.state.comparison,
        };
        if !content.missing_sections().is_empty() {
            self.state.push_notice(NoticeKind::Error, REPORT_INCOMPLETE);
            return None;
        }
        let written = report::render_full_report_pdf(&content).and_then(|bytes| {
            report::write_pdf(&self.export_dir, REPORT_PDF_FILENAME, &bytes)
        });
        self.finish_export(written)
    }

    fn finish_export(&mut self, written: Result<PathBuf, report::ReportError>) -> Option<PathBuf> {
        match written {
            Ok(path) => {
                info!(path = %path.display(), "pdf exported");
                self.state.push_notice(
                    NoticeKind::Success,
                    format!("PDF guardado en {}", path.display()),
                );
                Some(path)
            }
            Err(err) => {
                warn!("pdf export failed: {err}");
                self.state.push_notice(NoticeKind::Error, EXPORT_FAILED);
                None
            }
        }
    }
}

/// A [`CaseController`] paired with a backend, exposing each network action
/// as a single awaitable call.
pub struct CaseSession<B: CaseBackend> {
    backend: B,
    controller: CaseController,
}

impl<B: CaseBackend> CaseSession<B> {
    pub fn new(backend: B, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            controller: CaseController::new(export_dir),
        }
    }

    pub fn state(&self) -> &ViewState {
        self.controller.state()
    }

    pub fn controller(&mut self) -> &mut CaseController {
        &mut self.controller
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn run(&mut self, request: Option<BackendRequest>) {
        if let Some(request) = request {
            let outcome = execute(&self.backend, request).await;
            self.controller.complete(outcome);
        }
    }

    pub async fn generate_case(&mut self) {
        let request = self.controller.begin_generate_case();
        self.run(request).await;
    }

    pub async fn upload_case(&mut self, path: impl Into<PathBuf>) {
        let request = self.controller.begin_upload_case(path);
        self.run(request).await;
    }

    pub async fn request_solution(&mut self) {
        let request = self.controller.begin_request_solution();
        self.run(request).await;
    }

    pub async fn compare_answers(&mut self) {
        let request = self.controller.begin_compare_answers();
        self.run(request).await;
    }

    pub fn set_manual_input(&mut self, text: impl Into<String>) {
        self.controller.set_manual_input(text);
    }

    pub fn download_case_pdf(&mut self) -> Option<PathBuf> {
        self.controller.download_case_pdf()
    }

    pub fn download_full_report_pdf(&mut self) -> Option<PathBuf> {
        self.controller.download_full_report_pdf()
    }

    pub fn reset(&mut self) {
        self.controller.reset();
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
