//! Events sent from the backend worker to the UI thread.

use client_core::BackendOutcome;

#[derive(Debug)]
pub enum UiEvent {
    WorkerReady { backend_url: String },
    WorkerFailed(String),
    Completed { id: u64, outcome: BackendOutcome },
}

/// Short status line for a worker startup failure.
pub fn classify_worker_failure(message: &str) -> String {
    let lower = message.to_ascii_lowercase();
    if lower.contains("invalid backend url") {
        format!("Backend URL inválida; revisa la configuración: {message}")
    } else if lower.contains("failed to build") {
        "No se pudo iniciar el proceso de red; reinicia la aplicación.".to_string()
    } else {
        format!("Error del proceso de red: {message}")
    }
}
