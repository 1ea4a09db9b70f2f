// [libs/domain/summary-projector/src/lib.rs]
//! Per-project aggregated metrics from device records: the config-summary
//! table, drift detection, dashboard rollups, and CSV export.

pub mod csv_export;
pub mod dashboard;
pub mod drift;
pub mod project;
pub mod types;

pub use csv_export::write_csv;
pub use dashboard::rollup;
pub use drift::detect_drift;
pub use project::project_row;
pub use types::{DashboardMetrics, DeviceStatus, HealthRollup, InterfaceCounts, RoleRollup, SummaryRow};
