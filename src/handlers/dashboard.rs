use axum::{
    extract::{FromRequestParts, Path, Query, State},
    http::{header, request::Parts},
    response::{IntoResponse, Json, Response},
};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{ChartView, DashboardQuery, DashboardView, MapPoint, MetricsView};
use crate::services::DashboardService;

/// Selection parameters; malformed values are answered with `AppError::InvalidSelection`.
pub struct SelectionQuery(pub DashboardQuery);

impl<S> FromRequestParts<S> for SelectionQuery
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        let Query(query) = Query::<DashboardQuery>::try_from_uri(&parts.uri)?;
        Ok(SelectionQuery(query))
    }
}

pub async fn dashboard(
    State(service): State<DashboardService>,
    Path(id): Path<Uuid>,
    SelectionQuery(query): SelectionQuery,
) -> Result<Json<DashboardView>> {
    Ok(Json(service.dashboard(id, query).await?))
}

pub async fn map(
    State(service): State<DashboardService>,
    Path(id): Path<Uuid>,
    SelectionQuery(query): SelectionQuery,
) -> Result<Json<Vec<MapPoint>>> {
    Ok(Json(service.map(id, query).await?))
}

pub async fn chart(
    State(service): State<DashboardService>,
    Path(id): Path<Uuid>,
    SelectionQuery(query): SelectionQuery,
) -> Result<Json<ChartView>> {
    Ok(Json(service.chart(id, query).await?))
}

pub async fn summary(
    State(service): State<DashboardService>,
    Path(id): Path<Uuid>,
    SelectionQuery(query): SelectionQuery,
) -> Result<Json<MetricsView>> {
    Ok(Json(service.summary(id, query).await?))
}

pub async fn export(
    State(service): State<DashboardService>,
    Path(id): Path<Uuid>,
    SelectionQuery(query): SelectionQuery,
) -> Result<Response> {
    let csv = service.export(id, query).await?;
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", csv.filename),
        ),
    ];
    Ok((headers, csv.body).into_response())
}
