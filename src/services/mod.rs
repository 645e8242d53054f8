pub mod dashboard;

pub use dashboard::{CsvExport, DashboardService};
