use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

impl Direction {
    pub fn is_higher_better(self) -> bool {
        matches!(self, Self::HigherIsBetter)
    }
}

impl Default for Direction {
    fn default() -> Self {
        Self::HigherIsBetter
    }
}

/// Display format of a metric value. The pipeline-gap composite carries the
/// coverage ratio it renders alongside the gap amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatKind {
    Currency,
    Percent,
    Multiplier,
    Number,
    Days,
    Hours,
    PipelineGap { coverage: f64 },
}

impl FormatKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Currency => "currency",
            Self::Percent => "percent",
            Self::Multiplier => "multiplier",
            Self::Number => "number",
            Self::Days => "days",
            Self::Hours => "hours",
            Self::PipelineGap { .. } => "pipeline_gap",
        }
    }

    /// Parse the format name used by the targets file.
    pub fn from_name(raw: &str) -> Option<Self> {
        match raw {
            "currency" => Some(Self::Currency),
            "percent" => Some(Self::Percent),
            "multiplier" => Some(Self::Multiplier),
            "number" => Some(Self::Number),
            "days" => Some(Self::Days),
            "hours" => Some(Self::Hours),
            "pipeline_gap" => Some(Self::PipelineGap { coverage: 0.0 }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusTier {
    OnTrack,
    AtRisk,
    OffTrack,
    Neutral,
}

impl StatusTier {
    /// CSS status class consumed by the rendering layer.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OnTrack => "success",
            Self::AtRisk => "warning",
            Self::OffTrack => "danger",
            Self::Neutral => "neutral",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::OnTrack => "#22c55e",
            Self::AtRisk => "#eab308",
            Self::OffTrack => "#ef4444",
            Self::Neutral => "#6b7280",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResult {
    pub tier: StatusTier,
    pub label: &'static str,
}

/// The unit the rest of the dashboard consumes: one metric's actual, target,
/// and display configuration. `actual: None` means the source has no data yet,
/// which is distinct from an actual of zero; `target: None` means no target is
/// configured, while a target of zero is valid (e.g. zero overdue invoices).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRecord {
    pub key: String,
    pub actual: Option<f64>,
    pub target: Option<f64>,
    pub direction: Direction,
    pub format: FormatKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_override: Option<StatusResult>,
}

/// Per-metric target descriptor persisted in the targets file; `display` is
/// the pre-formatted string shown in tooltips and settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricTargetEntry {
    pub value: f64,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PersonTarget {
    pub target: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Persisted target configuration. Field names match the on-disk JSON schema,
/// and every section defaults so partial or legacy files still parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    #[serde(default)]
    pub company: BTreeMap<String, f64>,
    #[serde(default)]
    pub metric_targets: BTreeMap<String, MetricTargetEntry>,
    #[serde(default)]
    pub people: BTreeMap<String, PersonTarget>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_by: Option<String>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        let company = [
            ("revenue_target", 10_000_000.0),
            ("take_rate_target", 0.45),
            ("nrr_target", 1.10),
            ("supply_nrr_target", 1.10),
            ("customer_count_target", 75.0),
            ("pipeline_target", 3.0),
            ("logo_retention_target", 0.50),
            ("time_to_fulfill_target", 60.0),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();

        Self {
            company,
            metric_targets: BTreeMap::new(),
            people: BTreeMap::new(),
            last_updated: None,
            updated_by: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    Live,
    LiveCached,
    Fallback,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::LiveCached => "live (cached)",
            Self::Fallback => "fallback",
        }
    }

    pub fn is_live(self) -> bool {
        !matches!(self, Self::Fallback)
    }
}

/// Where the last batch of actuals came from, for the UI badge.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceStatus {
    pub is_live: bool,
    pub source: SourceKind,
    pub last_updated: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl Default for DataSourceStatus {
    fn default() -> Self {
        Self {
            is_live: false,
            source: SourceKind::Fallback,
            last_updated: None,
            error: None,
        }
    }
}

/// One resolved per-person row: the registry base data merged with any
/// configured person target.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonMetric {
    pub name: String,
    pub department: String,
    pub record: MetricRecord,
}

/// Immutable snapshot handed to a render pass: every requested record plus the
/// source descriptor that produced the actuals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMetrics {
    pub records: BTreeMap<String, MetricRecord>,
    pub source: DataSourceStatus,
}
