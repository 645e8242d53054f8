pub mod dashboard;
pub mod location;
pub mod reading;
pub mod selection;

pub use dashboard::{
    ChartPoint, ChartView, DashboardContent, DashboardQuery, DashboardView, MapPoint, Metric,
    MetricsView, OptionsView, SessionView,
};
pub use location::Location;
pub use reading::Reading;
pub use selection::{Period, Selection};
