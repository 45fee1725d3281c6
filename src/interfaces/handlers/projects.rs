use actix_web::{http::header, web, HttpResponse};
use chrono::Utc;

use crate::{
    entities::project::ProjectListResponse,
    errors::{AppError, MOCK_HEADER},
    AppState,
};

pub async fn list_projects(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let projects = state.project_catalog.list().await.map_err(|e| {
        tracing::error!("Error reading projects: {}", e);
        AppError::from(e)
    })?;

    let body = ProjectListResponse {
        total: projects.len(),
        projects,
        mock: true,
        timestamp: Utc::now().to_rfc3339(),
    };

    Ok(HttpResponse::Ok()
        .insert_header((MOCK_HEADER, "true"))
        .insert_header((header::CACHE_CONTROL, "public, max-age=300"))
        .json(body))
}
