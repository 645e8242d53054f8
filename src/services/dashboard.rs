use crate::config::Config;
use crate::error::{AppError, Result};
use crate::export;
use crate::models::{
    ChartPoint, ChartView, DashboardContent, DashboardQuery, DashboardView, MapPoint,
    MetricsView, OptionsView, Period, Selection, SessionView,
};
use crate::pipeline::{self, PipelineOutput};
use crate::sessions::{Session, SessionStore};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Runs the dashboard pipeline for a session:
/// `generate -> filter(selection) -> aggregate(period) -> present`.
#[derive(Clone)]
pub struct DashboardService {
    config: Arc<Config>,
    sessions: SessionStore,
}

/// A CSV export of the filtered slice.
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub filename: String,
    pub body: String,
}

impl DashboardService {
    pub fn new(config: Config) -> Self {
        let sessions = SessionStore::new(&config.session);
        Self {
            config: Arc::new(config),
            sessions,
        }
    }

    pub fn options(&self) -> OptionsView {
        OptionsView {
            years: self.config.dataset.supported_years(),
            periods: Period::ALL.to_vec(),
            default_year: self.config.dataset.initial_year(),
        }
    }

    pub async fn create_session(&self) -> Result<SessionView> {
        let handle = self.sessions.create(&self.config.dataset).await?;
        let session = handle.lock().await;

        Ok(SessionView {
            session_id: session.id,
            entities: session.data.locations().ids().map(str::to_string).collect(),
            years: self.config.dataset.supported_years(),
            periods: Period::ALL.to_vec(),
            selection: session.selection.clone(),
            period: session.period,
        })
    }

    pub async fn delete_session(&self, id: Uuid) -> Result<()> {
        self.sessions.remove(id).await
    }

    /// Full page state. A selection without data renders the no-data state.
    pub async fn dashboard(&self, id: Uuid, query: DashboardQuery) -> Result<DashboardView> {
        let handle = self.sessions.get(id).await?;
        let mut session = handle.lock().await;
        self.apply_query(&mut session, &query)?;

        let selection = session.selection.clone();
        let period = session.period;
        let title = format!("Monitor: {} ({})", selection.entity, selection.year);

        let content = match run_pipeline(&mut session) {
            Ok(output) => DashboardContent::Ready {
                metrics: MetricsView::from(&output.summary),
                map: map_points(&session),
                chart: output.buckets.iter().map(ChartPoint::from).collect(),
            },
            Err(AppError::NoDataForSelection { entity, year }) => DashboardContent::NoData {
                message: format!("No data available for {entity} in {year}."),
            },
            Err(e) => return Err(e),
        };

        Ok(DashboardView {
            title,
            selection,
            period,
            content,
        })
    }

    pub async fn map(&self, id: Uuid, query: DashboardQuery) -> Result<Vec<MapPoint>> {
        let handle = self.sessions.get(id).await?;
        let mut session = handle.lock().await;
        self.apply_query(&mut session, &query)?;
        Ok(map_points(&session))
    }

    pub async fn chart(&self, id: Uuid, query: DashboardQuery) -> Result<ChartView> {
        let handle = self.sessions.get(id).await?;
        let mut session = handle.lock().await;
        self.apply_query(&mut session, &query)?;

        let output = run_pipeline(&mut session)?;
        Ok(ChartView {
            selection: session.selection.clone(),
            period: session.period,
            points: output.buckets.iter().map(ChartPoint::from).collect(),
        })
    }

    pub async fn summary(&self, id: Uuid, query: DashboardQuery) -> Result<MetricsView> {
        let handle = self.sessions.get(id).await?;
        let mut session = handle.lock().await;
        self.apply_query(&mut session, &query)?;

        let output = run_pipeline(&mut session)?;
        Ok(MetricsView::from(&output.summary))
    }

    pub async fn export(&self, id: Uuid, query: DashboardQuery) -> Result<CsvExport> {
        let handle = self.sessions.get(id).await?;
        let mut session = handle.lock().await;
        self.apply_query(&mut session, &query)?;

        let output = run_pipeline(&mut session)?;
        let body = export::to_csv_string(&output.slice.readings, query.include_id.unwrap_or(false))?;
        let Selection { entity, year } = &session.selection;

        Ok(CsvExport {
            filename: format!("{entity}_{year}.csv"),
            body,
        })
    }

    /// Validate the requested selection and store it on the session.
    ///
    /// Nothing is stored when any part is invalid.
    fn apply_query(&self, session: &mut Session, query: &DashboardQuery) -> Result<()> {
        let entity = match &query.entity {
            Some(entity) if session.data.locations().get(entity).is_none() => {
                return Err(AppError::InvalidSelection(format!(
                    "unknown connection point '{entity}'"
                )));
            }
            Some(entity) => entity.clone(),
            None => session.selection.entity.clone(),
        };

        let year = match query.year {
            Some(year) if !self.config.dataset.supported_years().contains(&year) => {
                return Err(AppError::InvalidSelection(format!(
                    "year {year} is outside the supported range"
                )));
            }
            Some(year) => year,
            None => session.selection.year,
        };

        session.selection = Selection::new(entity, year);
        if let Some(period) = query.period {
            session.period = period;
        }

        debug!(
            session_id = %session.id,
            entity = %session.selection.entity,
            year = session.selection.year,
            period = %session.period,
            "Selection applied"
        );
        Ok(())
    }
}

fn run_pipeline(session: &mut Session) -> Result<PipelineOutput> {
    let series = session.data.series(&session.selection.entity);
    pipeline::run(&series, &session.selection, session.period)
}

fn map_points(session: &Session) -> Vec<MapPoint> {
    session
        .data
        .locations()
        .all()
        .iter()
        .map(|loc| MapPoint {
            id: loc.id.clone(),
            lat: loc.lat,
            lon: loc.lon,
            selected: loc.id == session.selection.entity,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatasetConfig;

    fn service(simulated_entities: Option<usize>) -> DashboardService {
        DashboardService::new(Config {
            dataset: DatasetConfig {
                location_count: 20,
                simulated_entities,
                location_seed: Some(11),
                ..DatasetConfig::default()
            },
            ..Config::default()
        })
    }

    fn query(entity: &str, year: i32, period: Period) -> DashboardQuery {
        DashboardQuery {
            entity: Some(entity.into()),
            year: Some(year),
            period: Some(period),
            include_id: None,
        }
    }

    #[tokio::test]
    async fn test_dashboard_ready() {
        let svc = service(None);
        let id = svc.create_session().await.unwrap().session_id;

        let view = svc
            .dashboard(id, query("RTM-007", 2024, Period::Month))
            .await
            .unwrap();

        assert_eq!(view.title, "Monitor: RTM-007 (2024)");
        match view.content {
            DashboardContent::Ready { metrics, map, chart } => {
                assert_eq!(chart.len(), 12);
                assert_eq!(map.len(), 20);
                assert_eq!(map.iter().filter(|p| p.selected).count(), 1);
                assert!(map.iter().any(|p| p.selected && p.id == "RTM-007"));
                assert!((73.2..=549.0).contains(&metrics.annual_total.value));
            }
            DashboardContent::NoData { .. } => panic!("expected data"),
        }
    }

    #[tokio::test]
    async fn test_dashboard_no_data_state() {
        let svc = service(Some(5));
        let id = svc.create_session().await.unwrap().session_id;

        let view = svc
            .dashboard(id, query("RTM-006", 2026, Period::Day))
            .await
            .unwrap();

        match view.content {
            DashboardContent::NoData { message } => {
                assert_eq!(message, "No data available for RTM-006 in 2026.")
            }
            DashboardContent::Ready { .. } => panic!("expected no data"),
        }
        assert!(matches!(
            svc.summary(id, DashboardQuery::default()).await,
            Err(AppError::NoDataForSelection { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_selection_keeps_previous() {
        let svc = service(None);
        let id = svc.create_session().await.unwrap().session_id;
        svc.chart(id, query("RTM-002", 2022, Period::Week)).await.unwrap();

        let bad_year = query("RTM-003", 2030, Period::Day);
        assert!(matches!(
            svc.chart(id, bad_year).await,
            Err(AppError::InvalidSelection(_))
        ));
        let bad_entity = query("RTM-999", 2022, Period::Day);
        assert!(matches!(
            svc.chart(id, bad_entity).await,
            Err(AppError::InvalidSelection(_))
        ));

        let chart = svc.chart(id, DashboardQuery::default()).await.unwrap();
        assert_eq!(chart.selection, Selection::new("RTM-002", 2022));
        assert_eq!(chart.period, Period::Week);
    }

    #[tokio::test]
    async fn test_repeated_queries_are_reproducible() {
        let svc = service(None);
        let a = svc.create_session().await.unwrap().session_id;
        let b = svc.create_session().await.unwrap().session_id;

        let first = svc.summary(a, query("RTM-010", 2023, Period::Day)).await.unwrap();
        let again = svc.summary(a, query("RTM-010", 2023, Period::Day)).await.unwrap();
        let other_session = svc.summary(b, query("RTM-010", 2023, Period::Day)).await.unwrap();

        assert_eq!(first, again);
        assert_eq!(first, other_session);
    }

    #[tokio::test]
    async fn test_export_filename_and_rows() {
        let svc = service(None);
        let id = svc.create_session().await.unwrap().session_id;

        let mut q = query("RTM-004", 2025, Period::Month);
        q.include_id = Some(true);
        let csv = svc.export(id, q).await.unwrap();

        assert_eq!(csv.filename, "RTM-004_2025.csv");
        let rows = export::read_csv(csv.body.as_bytes()).unwrap();
        assert_eq!(rows.len(), 365);
        assert!(rows.iter().all(|r| r.connection_id.as_deref() == Some("RTM-004")));
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let svc = service(None);
        assert!(matches!(
            svc.map(Uuid::new_v4(), DashboardQuery::default()).await,
            Err(AppError::SessionNotFound(_))
        ));
    }
}
