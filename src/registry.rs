use crate::models::{Direction, FormatKind, StatusResult, StatusTier};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// Static display configuration for one company metric. Direction and format
/// are fixed per key; actuals and targets are merged in at resolution time.
pub struct MetricDefinition {
    pub key: &'static str,
    pub direction: Direction,
    pub format: FormatKind,
    /// Key into the company section of the targets file, when the metric's
    /// target is managed there.
    pub company_target_key: Option<&'static str>,
    pub default_target: Option<f64>,
    pub fallback_actual: Option<f64>,
    pub status_override: Option<StatusResult>,
}

const NEEDS_PRD: StatusResult = StatusResult {
    tier: StatusTier::Neutral,
    label: "Needs PRD",
};

static COMPANY_METRICS: &[MetricDefinition] = &[
    MetricDefinition {
        key: "Revenue YTD",
        direction: Direction::HigherIsBetter,
        format: FormatKind::Currency,
        company_target_key: Some("revenue_target"),
        default_target: Some(10_000_000.0),
        fallback_actual: Some(7_930_000.0),
        status_override: None,
    },
    MetricDefinition {
        key: "Take Rate %",
        direction: Direction::HigherIsBetter,
        format: FormatKind::Percent,
        company_target_key: Some("take_rate_target"),
        default_target: Some(0.45),
        fallback_actual: Some(0.42),
        status_override: None,
    },
    MetricDefinition {
        key: "Demand NRR",
        direction: Direction::HigherIsBetter,
        format: FormatKind::Percent,
        company_target_key: Some("nrr_target"),
        default_target: Some(1.10),
        fallback_actual: Some(1.07),
        status_override: None,
    },
    MetricDefinition {
        key: "Supply NRR",
        direction: Direction::HigherIsBetter,
        format: FormatKind::Percent,
        company_target_key: Some("supply_nrr_target"),
        default_target: Some(1.10),
        fallback_actual: Some(0.67),
        status_override: None,
    },
    MetricDefinition {
        key: "Pipeline Coverage",
        direction: Direction::HigherIsBetter,
        format: FormatKind::Multiplier,
        company_target_key: Some("pipeline_target"),
        default_target: Some(3.0),
        fallback_actual: Some(2.8),
        status_override: None,
    },
    // Gap to the coverage target: actual is computed from the pipeline
    // detail values, target is always zero (no gap), and lower is better
    // (negative = surplus).
    MetricDefinition {
        key: "Weighted Pipeline Coverage Gap",
        direction: Direction::LowerIsBetter,
        format: FormatKind::PipelineGap { coverage: 0.0 },
        company_target_key: None,
        default_target: Some(0.0),
        fallback_actual: None,
        status_override: None,
    },
    MetricDefinition {
        key: "Logo Retention",
        direction: Direction::HigherIsBetter,
        format: FormatKind::Percent,
        company_target_key: Some("logo_retention_target"),
        default_target: Some(0.50),
        fallback_actual: Some(0.37),
        status_override: None,
    },
    MetricDefinition {
        key: "Customer Count",
        direction: Direction::HigherIsBetter,
        format: FormatKind::Number,
        company_target_key: Some("customer_count_target"),
        default_target: Some(75.0),
        fallback_actual: Some(51.0),
        status_override: None,
    },
    MetricDefinition {
        key: "Days to Fulfill",
        direction: Direction::LowerIsBetter,
        format: FormatKind::Days,
        company_target_key: Some("time_to_fulfill_target"),
        default_target: Some(60.0),
        fallback_actual: Some(69.0),
        status_override: None,
    },
    MetricDefinition {
        key: "Sellable Inventory",
        direction: Direction::HigherIsBetter,
        format: FormatKind::Number,
        company_target_key: None,
        default_target: None,
        fallback_actual: None,
        status_override: Some(NEEDS_PRD),
    },
];

static METRIC_INDEX: Lazy<BTreeMap<&'static str, &'static MetricDefinition>> = Lazy::new(|| {
    COMPANY_METRICS
        .iter()
        .map(|def| (def.key, def))
        .collect()
});

pub fn metric_definition(key: &str) -> Option<&'static MetricDefinition> {
    METRIC_INDEX.get(key).copied()
}

pub fn metric_keys() -> impl Iterator<Item = &'static str> {
    COMPANY_METRICS.iter().map(|def| def.key)
}

/// Pipeline detail values used to compute the coverage gap when the source
/// does not provide them.
pub const FALLBACK_PIPELINE_REMAINING: f64 = 2_500_000.0;
pub const FALLBACK_PIPELINE_WEIGHTED: f64 = 0.0;

/// Base data for the per-person scorecard. Actuals are the fallback values
/// served when the warehouse is unreachable; targets may be overridden per
/// person through the targets file.
pub struct PersonRow {
    pub name: &'static str,
    pub department: &'static str,
    pub metric_name: &'static str,
    pub fallback_actual: Option<f64>,
    pub default_target: f64,
    pub format: FormatKind,
    pub direction: Direction,
}

pub static PERSON_METRICS: &[PersonRow] = &[
    PersonRow {
        name: "Jack",
        department: "CEO / Biz Dev",
        metric_name: "Revenue vs Target",
        fallback_actual: Some(7_930_000.0),
        default_target: 10_000_000.0,
        format: FormatKind::Currency,
        direction: Direction::HigherIsBetter,
    },
    PersonRow {
        name: "Deuce",
        department: "COO / Ops",
        metric_name: "Take Rate %",
        fallback_actual: Some(0.49),
        default_target: 0.50,
        format: FormatKind::Percent,
        direction: Direction::HigherIsBetter,
    },
    PersonRow {
        name: "Ian Hong",
        department: "Supply",
        metric_name: "New Unique Inventory",
        fallback_actual: Some(12.0),
        default_target: 16.0,
        format: FormatKind::Number,
        direction: Direction::HigherIsBetter,
    },
    PersonRow {
        name: "Ashton",
        department: "Supply AM",
        metric_name: "NRR Top Supply Users",
        fallback_actual: Some(0.95),
        default_target: 1.10,
        format: FormatKind::Percent,
        direction: Direction::HigherIsBetter,
    },
    PersonRow {
        name: "Andy Cooper",
        department: "Demand Sales",
        metric_name: "NRR",
        fallback_actual: Some(1.07),
        default_target: 1.10,
        format: FormatKind::Percent,
        direction: Direction::HigherIsBetter,
    },
    PersonRow {
        name: "Danny Sears",
        department: "Demand Sales",
        metric_name: "Pipeline Coverage",
        fallback_actual: Some(2.8),
        default_target: 3.0,
        format: FormatKind::Multiplier,
        direction: Direction::HigherIsBetter,
    },
    PersonRow {
        name: "Katie",
        department: "Demand Sales",
        metric_name: "Pipeline Coverage",
        fallback_actual: Some(3.2),
        default_target: 3.0,
        format: FormatKind::Multiplier,
        direction: Direction::HigherIsBetter,
    },
    PersonRow {
        name: "Char Short",
        department: "Demand AM",
        metric_name: "Contract Spend %",
        fallback_actual: Some(0.89),
        default_target: 0.95,
        format: FormatKind::Percent,
        direction: Direction::HigherIsBetter,
    },
    PersonRow {
        name: "Victoria",
        department: "Demand AM",
        metric_name: "Days to Fulfill",
        fallback_actual: Some(69.0),
        default_target: 60.0,
        format: FormatKind::Days,
        direction: Direction::LowerIsBetter,
    },
    PersonRow {
        name: "Claire",
        department: "Demand AM",
        metric_name: "NPS Score",
        fallback_actual: Some(0.71),
        default_target: 0.75,
        format: FormatKind::Percent,
        direction: Direction::HigherIsBetter,
    },
    PersonRow {
        name: "Francisco",
        department: "Demand AM",
        metric_name: "Offer Acceptance %",
        fallback_actual: Some(0.88),
        default_target: 0.90,
        format: FormatKind::Percent,
        direction: Direction::HigherIsBetter,
    },
    PersonRow {
        name: "Marketing",
        department: "Marketing",
        metric_name: "Mktg-Influenced Pipeline",
        fallback_actual: Some(2_400_000.0),
        default_target: 0.0,
        format: FormatKind::Currency,
        direction: Direction::HigherIsBetter,
    },
    PersonRow {
        name: "Accounting",
        department: "Accounting",
        metric_name: "Invoice Collection %",
        fallback_actual: Some(0.93),
        default_target: 0.95,
        format: FormatKind::Percent,
        direction: Direction::HigherIsBetter,
    },
    PersonRow {
        name: "VP Engineering",
        department: "Engineering",
        metric_name: "Features Fully Scoped",
        fallback_actual: None,
        default_target: 5.0,
        format: FormatKind::Number,
        direction: Direction::HigherIsBetter,
    },
    PersonRow {
        name: "Dev 1",
        department: "Engineering",
        metric_name: "BizSup Completed",
        fallback_actual: None,
        default_target: 10.0,
        format: FormatKind::Number,
        direction: Direction::HigherIsBetter,
    },
    PersonRow {
        name: "Dev 2",
        department: "Engineering",
        metric_name: "PRDs Generated",
        fallback_actual: None,
        default_target: 3.0,
        format: FormatKind::Number,
        direction: Direction::HigherIsBetter,
    },
    PersonRow {
        name: "Dev 3",
        department: "Engineering",
        metric_name: "FSDs Generated",
        fallback_actual: None,
        default_target: 2.0,
        format: FormatKind::Number,
        direction: Direction::HigherIsBetter,
    },
];

// ─── Metric documentation ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct MetricTooltip {
    pub definition: &'static str,
    pub importance: &'static str,
    pub calculation: &'static str,
}

const UNKNOWN_TOOLTIP: MetricTooltip = MetricTooltip {
    definition: "Metric definition not yet documented.",
    importance: "—",
    calculation: "—",
};

static TOOLTIPS: &[(&str, MetricTooltip)] = &[
    (
        "Revenue YTD",
        MetricTooltip {
            definition: "Total recognized revenue from all sources year-to-date.",
            importance: "Primary measure of business growth and ability to fund operations.",
            calculation: "Sum of all invoiced revenue from Aug 1 to current date.",
        },
    ),
    (
        "Take Rate %",
        MetricTooltip {
            definition: "Percentage of GMV kept as net revenue after paying organizers.",
            importance: "Profitability signal. Proves the business model works.",
            calculation: "Net Revenue / GMV = (GMV - Payouts - Discounts + Credits) / GMV",
        },
    ),
    (
        "Demand NRR",
        MetricTooltip {
            definition: "Net Revenue Retention - revenue from existing customers vs. prior period.",
            importance: "Shows if we're growing or shrinking within existing accounts.",
            calculation: "(Starting MRR + Expansion - Contraction - Churn) / Starting MRR",
        },
    ),
    (
        "Supply NRR",
        MetricTooltip {
            definition: "Net Revenue Retention for supply partners - payouts to prior year suppliers in current year.",
            importance: "Shows if key supply relationships are growing or shrinking.",
            calculation: "(Prior year suppliers' current year payouts) / (Their prior year payouts)",
        },
    ),
    (
        "Pipeline Coverage",
        MetricTooltip {
            definition: "Ratio of weighted pipeline to remaining quota.",
            importance: "Predicts likelihood of hitting targets. 3x+ is healthy.",
            calculation: "Weighted Pipeline Value / Remaining Quota for Period",
        },
    ),
    (
        "Weighted Pipeline Coverage Gap",
        MetricTooltip {
            definition: "Weighted pipeline shortfall against the coverage target for the remaining quota.",
            importance: "Positive gap means pipeline generation must accelerate to stay on plan.",
            calculation: "(Coverage Target x Remaining Quota) - Weighted Pipeline",
        },
    ),
    (
        "Logo Retention",
        MetricTooltip {
            definition: "Percentage of customers retained year-over-year.",
            importance: "High churn signals product-market fit or service issues.",
            calculation: "Customers retained / Total customers at period start",
        },
    ),
    (
        "Customer Count",
        MetricTooltip {
            definition: "Number of active customers with revenue in the current fiscal year.",
            importance: "Measures customer base health and growth trajectory.",
            calculation: "Count of customers with Net Revenue > $0 in current year",
        },
    ),
    (
        "Days to Fulfill",
        MetricTooltip {
            definition: "Days from Closed Won date until contract spend reaches 100% of the contract value.",
            importance: "Faster fulfillment improves cash flow and renewal likelihood.",
            calculation: "Closed Won Date -> days until invoiced spend covers the contract amount.",
        },
    ),
    (
        "Sellable Inventory",
        MetricTooltip {
            definition: "Venues and events available for brand activation campaigns.",
            importance: "Drives supply capacity and revenue potential.",
            calculation: "Count of venues meeting 'sellable' criteria (PRD needed)",
        },
    ),
];

pub fn metric_tooltip(key: &str) -> MetricTooltip {
    TOOLTIPS
        .iter()
        .find(|(tooltip_key, _)| *tooltip_key == key)
        .map(|(_, tooltip)| *tooltip)
        .unwrap_or(UNKNOWN_TOOLTIP)
}
