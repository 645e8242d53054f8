use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{OptionsView, SessionView};
use crate::services::DashboardService;

pub async fn options(State(service): State<DashboardService>) -> Json<OptionsView> {
    Json(service.options())
}

pub async fn create(
    State(service): State<DashboardService>,
) -> Result<(StatusCode, Json<SessionView>)> {
    let session = service.create_session().await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn delete(
    State(service): State<DashboardService>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    service.delete_session(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
