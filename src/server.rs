// Web surface: axum router and the handlers behind the three views

use crate::filter::{distinct_marques, filter_by_marques};
use crate::models::{ClientType, Intake, Marque, RepairRecord, now_local};
use crate::stats::{summary, value_counts};
use crate::store::{RecordStore, StoreError};
use crate::views;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info};

/// Upload ceiling for the intake form. Phone photos routinely exceed
/// axum's 2MB default; this matches the 200MB the original UI accepted.
const MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,
}

/// Handler-level failures. Storage errors abort the request with a
/// user-visible message; nothing is retried.
#[derive(Debug)]
pub enum AppError {
    Storage(StoreError),
    BadRequest(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Storage(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Storage(err) => {
                error!(error = %err, "storage failure while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Erreur de stockage : {err}"),
                )
                    .into_response()
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
        }
    }
}

pub fn router(store: Arc<RecordStore>) -> Router {
    let evidence = ServeDir::new(store.evidence_dir().to_path_buf());
    Router::new()
        .route("/", get(|| async { Redirect::to("/nouvelle") }))
        .route("/nouvelle", get(nouvelle_form).post(submit_intervention))
        .route("/journal", get(journal))
        .route("/dashboard", get(dashboard))
        .route("/health", get(health))
        .nest_service("/evidence", evidence)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { store })
}

/// Bind and serve until the process is terminated.
pub async fn serve(store: Arc<RecordStore>, listen: &str) -> eyre::Result<()> {
    let app = router(store);
    let listener = tokio::net::TcpListener::bind(listen).await?;
    info!("Deen LAB manager listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "deenlab",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Local::now().to_rfc3339(),
    }))
}

#[derive(Deserialize)]
struct NouvelleParams {
    saved: Option<u8>,
}

async fn nouvelle_form(Query(params): Query<NouvelleParams>) -> Html<String> {
    Html(views::nouvelle_page(params.saved == Some(1)))
}

async fn journal(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Html<String>, AppError> {
    let table = state.store.load()?;
    let selection = parse_marque_selection(&params);
    let available = distinct_marques(&table);
    let rows = filter_by_marques(&table, &selection);
    Ok(Html(views::journal_page(&available, &selection, &rows)))
}

async fn dashboard(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let table = state.store.load()?;
    let marque_counts = value_counts(&table, |r| r.appareil_marque.to_string());
    let client_counts = value_counts(&table, |r| r.client_type.to_string());
    Ok(Html(views::dashboard_page(
        summary(&table).as_ref(),
        &marque_counts,
        &client_counts,
    )))
}

/// Form submission: save the evidence blob first (if any), then append the
/// new record and persist the whole table. Both writes share one creation
/// instant so the evidence filename and the record ID agree.
async fn submit_intervention(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut photo: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("formulaire illisible : {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "photo" {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("fichier illisible : {e}")))?;
            if !filename.is_empty() && !bytes.is_empty() {
                photo = Some((filename, bytes.to_vec()));
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(format!("champ illisible : {e}")))?;
            fields.insert(name, value);
        }
    }

    let now = now_local();
    let intake = intake_from_fields(&mut fields)?;
    let mut record = RepairRecord::new(intake, now);

    if let Some((filename, bytes)) = photo {
        record.image_path = state.store.save_evidence(&bytes, &filename, now)?;
    }

    let table = RecordStore::append(state.store.load()?, record);
    state.store.persist(&table)?;

    Ok(Redirect::to("/nouvelle?saved=1"))
}

/// Marque values ticked in the journal filter form; unknown values are
/// impossible through the UI and rejected here.
fn parse_marque_selection(params: &[(String, String)]) -> Vec<Marque> {
    params
        .iter()
        .filter(|(k, _)| k == "marque")
        .filter_map(|(_, v)| Marque::parse(v))
        .collect()
}

fn intake_from_fields(fields: &mut HashMap<String, String>) -> Result<Intake, AppError> {
    let client_type = fields
        .get("client_type")
        .and_then(|v| ClientType::parse(v))
        .ok_or_else(|| AppError::BadRequest("type de client invalide".to_string()))?;
    let appareil_marque = fields
        .get("marque")
        .and_then(|v| Marque::parse(v))
        .ok_or_else(|| AppError::BadRequest("marque invalide".to_string()))?;

    Ok(Intake {
        client_nom: fields.remove("client_nom").unwrap_or_default(),
        client_type,
        appareil_marque,
        appareil_modele: fields.remove("modele").unwrap_or_default(),
        probleme: fields.remove("probleme").unwrap_or_default(),
        diagnostic: fields.remove("diagnostic").unwrap_or_default(),
        prix_devis: parse_fcfa(fields.get("prix_devis"))?,
        prix_final: parse_fcfa(fields.get("prix_final"))?,
    })
}

/// Non-negative FCFA amount; an absent or blank field means 0, matching the
/// number widget's default.
fn parse_fcfa(value: Option<&String>) -> Result<u32, AppError> {
    match value.map(|v| v.trim()).filter(|v| !v.is_empty()) {
        None => Ok(0),
        Some(v) => v
            .parse::<u32>()
            .map_err(|_| AppError::BadRequest(format!("montant invalide : {v}"))),
    }
}
