//! REST API handlers.

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use santri_core::formats::read_rows;
use santri_core::{
    EXPORT_FILENAME, ImportReport, Ingestor, PDF_CONTENT_TYPE, Student, StudentFilter, StudentId,
    StudentInput, StudentQuery, StudentStats, XLSX_CONTENT_TYPE, export_students, pdf_filename,
    render_student_pdf,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::AppState;
use super::error::ApiError;

// ===== Request / response bodies =====

/// Query string of `GET /api/students`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub search: Option<String>,
    pub kelas: Option<String>,
    pub desa: Option<String>,
    pub age_range: Option<String>,
    pub jenis_kelamin: Option<String>,
}

impl ListParams {
    fn into_query(self) -> StudentQuery {
        let filter = StudentFilter {
            kelas: self.kelas,
            desa: self.desa,
            age_range: self.age_range,
            jenis_kelamin: self.jenis_kelamin,
        };
        StudentQuery::from_params(self.search.as_deref(), filter)
    }
}

/// Simple `{ message }` response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Ids are numeric; anything else cannot name a record.
fn parse_id(raw: &str) -> Result<StudentId, ApiError> {
    raw.parse().map(StudentId).map_err(|_| ApiError::NotFound)
}

fn attachment(content_type: &str, filename: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

// ===== Handlers =====

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn list_students(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Student>> {
    let query = params.into_query();
    let unrecognized = match &query {
        StudentQuery::Filter(filter) => filter.age_range().filter(|range| !range.is_recognized()),
        _ => None,
    };
    if let Some(range) = unrecognized {
        debug!(age_range = ?range, "unrecognized age range matches every record");
    }

    let store = state.store.read().await;
    let students: Vec<Student> = query.execute(&store).into_iter().cloned().collect();
    debug!(count = students.len(), "listed students");
    Json(students)
}

pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Student>, ApiError> {
    let id = parse_id(&id)?;
    let store = state.store.read().await;
    store.get(id).cloned().map(Json).ok_or(ApiError::NotFound)
}

pub async fn create_student(
    State(state): State<AppState>,
    payload: Result<Json<StudentInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Student>), ApiError> {
    let Json(input) = payload?;
    let profile = input.validate_new()?;

    let mut store = state.store.write().await;
    let student = store.create_at(profile, state.today()).clone();
    info!(id = %student.id, nis = %student.nis, "created student");
    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StudentInput>, JsonRejection>,
) -> Result<Json<Student>, ApiError> {
    let Json(input) = payload?;
    let patch = input.validate_patch()?;
    let id = parse_id(&id)?;

    let mut store = state.store.write().await;
    let student = store
        .update_at(id, patch, state.today())
        .cloned()
        .ok_or(ApiError::NotFound)?;
    info!(id = %student.id, "updated student");
    Ok(Json(student))
}

pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;
    let mut store = state.store.write().await;
    if !store.delete(id) {
        return Err(ApiError::NotFound);
    }
    info!(id = %id, "deleted student");
    Ok(Json(MessageResponse {
        message: "Student deleted successfully".to_string(),
    }))
}

pub async fn dashboard_stats(State(state): State<AppState>) -> Json<StudentStats> {
    let store = state.store.read().await;
    Json(StudentStats::compute(store.list()))
}

pub async fn export_excel(State(state): State<AppState>) -> Result<Response, ApiError> {
    let store = state.store.read().await;
    let bytes =
        export_students(store.list()).map_err(|e| ApiError::internal("Failed to export data", e))?;
    info!(records = store.len(), bytes = bytes.len(), "exported workbook");
    Ok(attachment(XLSX_CONTENT_TYPE, EXPORT_FILENAME, bytes))
}

pub async fn import_excel(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ImportReport>, ApiError> {
    let Ok(mut multipart) = multipart else {
        return Err(ApiError::BadRequest("No file uploaded"));
    };

    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            upload = Some(field.bytes().await?);
            break;
        }
    }
    let bytes = upload.ok_or(ApiError::BadRequest("No file uploaded"))?;

    let rows = read_rows(&bytes).map_err(ApiError::import)?;
    let mut store = state.store.write().await;
    let report = Ingestor::ingest_rows(&mut store, rows, state.today());
    info!(
        imported = report.imported,
        rejected = report.errors.len(),
        "imported workbook"
    );
    Ok(Json(report))
}

pub async fn student_pdf(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;
    let store = state.store.read().await;
    let student = store.get(id).ok_or(ApiError::NotFound)?;
    let bytes = render_student_pdf(student);
    debug!(id = %id, bytes = bytes.len(), "rendered student form");
    Ok(attachment(PDF_CONTENT_TYPE, &pdf_filename(student), bytes))
}
