use super::*;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct ServerState {
    json_bodies: Arc<Mutex<Vec<Value>>>,
    uploads: Arc<Mutex<Vec<(String, String, Vec<u8>)>>>,
}

async fn handle_case() -> Json<Value> {
    Json(json!({ "case_study": "Una startup recolecta datos biométricos." }))
}

async fn handle_legacy_case() -> Json<Value> {
    Json(json!({ "case": "Caso en formato anterior" }))
}

async fn handle_solve(State(state): State<ServerState>, Json(body): Json<Value>) -> Json<Value> {
    let case = body["case"].as_str().unwrap_or_default().to_string();
    state.json_bodies.lock().await.push(body);
    Json(json!({ "ia_solution": format!("Solución para: {case}") }))
}

async fn handle_compare(
    State(state): State<ServerState>,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.json_bodies.lock().await.push(body);
    Json(json!({ "comparison": "La respuesta cubre el consentimiento." }))
}

async fn handle_upload(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, StatusCode> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
        let text = String::from_utf8_lossy(&bytes).into_owned();
        state
            .uploads
            .lock()
            .await
            .push((filename, content_type, bytes.to_vec()));
        return Ok(Json(json!({ "uploaded_case": text })));
    }
    Err(StatusCode::BAD_REQUEST)
}

async fn handle_rejected() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "detail": "Formato de archivo no soportado" })),
    )
}

async fn handle_malformed() -> Json<Value> {
    Json(json!({ "solution": "campo inesperado" }))
}

async fn handle_unavailable() -> (StatusCode, &'static str) {
    (StatusCode::SERVICE_UNAVAILABLE, "backend warming up")
}

async fn spawn_backend(app: Router<ServerState>) -> anyhow::Result<(String, ServerState)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = ServerState::default();
    let app = app.with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

fn happy_routes() -> Router<ServerState> {
    Router::new()
        .route("/case", get(handle_case))
        .route("/solve", post(handle_solve))
        .route("/compare", post(handle_compare))
        .route("/upload_case", post(handle_upload))
}

#[tokio::test]
async fn generate_case_reads_case_study_field() {
    let (server_url, _) = spawn_backend(happy_routes()).await.expect("spawn server");
    let backend = HttpCaseBackend::new(&server_url).expect("backend");

    let case = backend.generate_case().await.expect("case");
    assert_eq!(case, "Una startup recolecta datos biométricos.");
}

#[tokio::test]
async fn generate_case_accepts_legacy_field_and_trailing_slash() {
    let app = Router::new().route("/case", get(handle_legacy_case));
    let (server_url, _) = spawn_backend(app).await.expect("spawn server");
    let backend = HttpCaseBackend::new(&format!("{server_url}/")).expect("backend");

    let case = backend.generate_case().await.expect("case");
    assert_eq!(case, "Caso en formato anterior");
}

#[tokio::test]
async fn solve_posts_case_under_canonical_field() {
    let (server_url, state) = spawn_backend(happy_routes()).await.expect("spawn server");
    let backend = HttpCaseBackend::new(&server_url).expect("backend");

    let solution = backend.solve("Caso A").await.expect("solution");

    assert_eq!(solution, "Solución para: Caso A");
    assert_eq!(
        state.json_bodies.lock().await.as_slice(),
        &[json!({ "case": "Caso A" })]
    );
}

#[tokio::test]
async fn compare_posts_all_three_texts() {
    let (server_url, state) = spawn_backend(happy_routes()).await.expect("spawn server");
    let backend = HttpCaseBackend::new(&server_url).expect("backend");

    let verdict = backend
        .compare(CompareRequest {
            case_study: "Caso A".to_string(),
            user_solution: "Mi respuesta".to_string(),
            ia_solution: "Sol A".to_string(),
        })
        .await
        .expect("comparison");

    assert_eq!(verdict, "La respuesta cubre el consentimiento.");
    assert_eq!(
        state.json_bodies.lock().await.as_slice(),
        &[json!({
            "case": "Caso A",
            "user_solution": "Mi respuesta",
            "ia_solution": "Sol A",
        })]
    );
}

#[tokio::test]
async fn upload_sends_document_as_multipart_file_field() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("caso.txt");
    std::fs::write(&path, "Texto del caso subido").expect("write document");

    let (server_url, state) = spawn_backend(happy_routes()).await.expect("spawn server");
    let backend = HttpCaseBackend::new(&server_url).expect("backend");

    let upload = CaseUpload::from_path(&path).await.expect("read upload");
    assert_eq!(upload.filename, "caso.txt");
    assert_eq!(upload.mime_type, "text/plain");

    let extracted = backend.upload_case(upload).await.expect("upload");
    assert_eq!(extracted, "Texto del caso subido");

    let uploads = state.uploads.lock().await;
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].0, "caso.txt");
    assert_eq!(uploads[0].1, "text/plain");
    assert_eq!(uploads[0].2, b"Texto del caso subido".to_vec());
}

#[tokio::test]
async fn rejection_detail_is_kept_in_status_error() {
    let app = Router::new().route("/upload_case", post(handle_rejected));
    let (server_url, _) = spawn_backend(app).await.expect("spawn server");
    let backend = HttpCaseBackend::new(&server_url).expect("backend");

    let err = backend
        .upload_case(CaseUpload {
            filename: "caso.exe".to_string(),
            mime_type: "application/octet-stream".to_string(),
            bytes: vec![0, 1, 2],
        })
        .await
        .expect_err("rejected upload");

    match err {
        BackendError::Status {
            endpoint,
            status,
            detail,
        } => {
            assert_eq!(endpoint, "/upload_case");
            assert_eq!(status, 422);
            assert_eq!(detail, "Formato de archivo no soportado");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn plain_text_error_body_is_used_as_detail() {
    let app = Router::new().route("/case", get(handle_unavailable));
    let (server_url, _) = spawn_backend(app).await.expect("spawn server");
    let backend = HttpCaseBackend::new(&server_url).expect("backend");

    let err = backend.generate_case().await.expect_err("unavailable");
    assert!(matches!(
        err,
        BackendError::Status { status: 503, ref detail, .. } if detail == "backend warming up"
    ));
}

#[tokio::test]
async fn missing_response_field_is_malformed() {
    let app = Router::new().route("/solve", post(handle_malformed));
    let (server_url, _) = spawn_backend(app).await.expect("spawn server");
    let backend = HttpCaseBackend::new(&server_url).expect("backend");

    let err = backend.solve("Caso A").await.expect_err("malformed");
    assert!(matches!(
        err,
        BackendError::MalformedResponse {
            endpoint: "/solve",
            ..
        }
    ));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let backend = HttpCaseBackend::new(&format!("http://{addr}")).expect("backend");
    let err = backend.generate_case().await.expect_err("refused");
    assert!(matches!(err, BackendError::Transport { endpoint: "/case", .. }));
}

#[test]
fn rejects_unparseable_base_url() {
    assert!(matches!(
        HttpCaseBackend::new("not a url"),
        Err(BackendError::InvalidUrl { .. })
    ));
}

#[test]
fn builds_from_settings() {
    let settings = Settings {
        backend_url: "http://127.0.0.1:8000".to_string(),
        export_dir: std::env::temp_dir(),
        request_timeout: Some(Duration::from_secs(5)),
    };
    let backend = HttpCaseBackend::from_settings(&settings).expect("backend");
    assert_eq!(backend.base_url().as_str(), "http://127.0.0.1:8000/");
    assert_eq!(backend.endpoint(CASE_PATH), "http://127.0.0.1:8000/case");
}

#[tokio::test]
async fn session_drives_http_backend_end_to_end() {
    let (server_url, _) = spawn_backend(happy_routes()).await.expect("spawn server");
    let export_dir = tempfile::tempdir().expect("tempdir");
    let mut session = CaseSession::new(
        HttpCaseBackend::new(&server_url).expect("backend"),
        export_dir.path(),
    );

    session.generate_case().await;
    session.request_solution().await;
    session.set_manual_input("Falta una evaluación de impacto.");
    session.compare_answers().await;

    let state = session.state();
    assert_eq!(state.case_study(), "Una startup recolecta datos biométricos.");
    assert_eq!(
        state.ia_solution(),
        "Solución para: Una startup recolecta datos biométricos."
    );
    assert_eq!(state.comparison(), "La respuesta cubre el consentimiento.");
    assert!(session.download_full_report_pdf().is_some());
}
