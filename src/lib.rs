pub mod cache;
pub mod errors;
pub mod format;
pub mod models;
pub mod registry;
pub mod resolve;
pub mod status;
pub mod targets;

pub use crate::errors::{AppError, AppResult};
pub use crate::format::{format_target_display, format_value};
pub use crate::models::{
    DataSourceStatus, Direction, FormatKind, MetricRecord, MetricTargetEntry, PersonMetric,
    PersonTarget, ResolvedMetrics, SourceKind, StatusResult, StatusTier, TargetConfig,
};
pub use crate::resolve::{MetricResolver, MetricSource};
pub use crate::status::{classify, classify_record};
pub use crate::targets::TargetStore;

/// Install the process-wide tracing subscriber. `RUST_LOG` overrides the
/// default `info` filter. Safe to call once from the host's bootstrap.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
