use crate::cache::TtlCache;
use crate::errors::{AppError, AppResult};
use crate::models::{
    DataSourceStatus, FormatKind, MetricRecord, PersonMetric, ResolvedMetrics, SourceKind,
    TargetConfig,
};
use crate::registry;
use crate::targets::TargetStore;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Warehouse batches are expensive, so they live considerably longer than the
/// target-file cache.
pub const DEFAULT_SOURCE_TTL: Duration = Duration::from_secs(60);

/// One batch of actuals keyed by metric name. A key absent from the batch
/// means the source has no data for it yet.
pub type MetricBatch = HashMap<String, f64>;

/// Batch keys for the pipeline detail values that feed the coverage gap.
pub const PIPELINE_REMAINING_KEY: &str = "Pipeline Remaining";
pub const PIPELINE_WEIGHTED_KEY: &str = "Weighted Pipeline";

/// The external metric-value source (the warehouse query layer). May fail;
/// the resolver degrades to fallback actuals and never propagates the error.
/// Bounding the call's latency is the implementor's contract.
pub trait MetricSource: Send + Sync {
    fn fetch(&self) -> anyhow::Result<MetricBatch>;
}

/// Merges live actuals, fallback actuals, and configured targets into the
/// records a page renders. One `snapshot()` call is one immutable view for
/// the duration of a render pass.
pub struct MetricResolver {
    source: Option<Arc<dyn MetricSource>>,
    batch_cache: TtlCache<MetricBatch>,
    targets: Arc<TargetStore>,
    status: Mutex<DataSourceStatus>,
}

impl MetricResolver {
    pub fn new(targets: Arc<TargetStore>) -> Self {
        Self {
            source: None,
            batch_cache: TtlCache::new(DEFAULT_SOURCE_TTL),
            targets,
            status: Mutex::new(DataSourceStatus::default()),
        }
    }

    pub fn with_source(targets: Arc<TargetStore>, source: Arc<dyn MetricSource>) -> Self {
        Self::with_source_ttl(targets, source, DEFAULT_SOURCE_TTL)
    }

    pub fn with_source_ttl(
        targets: Arc<TargetStore>,
        source: Arc<dyn MetricSource>,
        ttl: Duration,
    ) -> Self {
        Self {
            source: Some(source),
            batch_cache: TtlCache::new(ttl),
            targets,
            status: Mutex::new(DataSourceStatus::default()),
        }
    }

    pub fn targets(&self) -> &TargetStore {
        &self.targets
    }

    /// Resolve records for the requested keys. Total: every requested key
    /// gets a record, falling back to registry actuals and default targets
    /// when the source or the configuration has nothing for it.
    pub fn resolve(&self, keys: &[&str]) -> BTreeMap<String, MetricRecord> {
        let batch = self.current_batch();
        let config = self.targets.load();
        keys.iter()
            .map(|key| {
                (
                    (*key).to_string(),
                    self.record_for(key, batch.as_ref(), &config),
                )
            })
            .collect()
    }

    /// Records plus the source descriptor that produced them, as one
    /// immutable snapshot for a render pass.
    pub fn snapshot(&self, keys: &[&str]) -> ResolvedMetrics {
        let records = self.resolve(keys);
        ResolvedMetrics {
            records,
            source: self.source_status(),
        }
    }

    /// Snapshot of every company metric in the registry.
    pub fn company_snapshot(&self) -> ResolvedMetrics {
        let keys: Vec<&str> = registry::metric_keys().collect();
        self.snapshot(&keys)
    }

    /// Per-person scorecard rows: registry base data merged with any person
    /// targets configured in the store.
    pub fn person_metrics(&self) -> Vec<PersonMetric> {
        let config = self.targets.load();
        registry::PERSON_METRICS
            .iter()
            .map(|person| {
                let target = config
                    .people
                    .get(person.name)
                    .map(|entry| entry.target)
                    .unwrap_or(person.default_target);
                PersonMetric {
                    name: person.name.to_string(),
                    department: person.department.to_string(),
                    record: MetricRecord {
                        key: person.metric_name.to_string(),
                        actual: person.fallback_actual,
                        target: Some(target),
                        direction: person.direction,
                        format: person.format,
                        status_override: None,
                    },
                }
            })
            .collect()
    }

    pub fn source_status(&self) -> DataSourceStatus {
        self.status.lock().expect("status lock").clone()
    }

    /// Drop the cached batch so the next resolve refetches from the source.
    pub fn refresh(&self) {
        self.batch_cache.invalidate();
    }

    /// Operator-initiated refetch. Unlike `resolve`, a source failure here is
    /// surfaced to the caller so the settings surface can show it.
    pub fn force_refresh(&self) -> AppResult<MetricBatch> {
        self.batch_cache.invalidate();
        let source = self
            .source
            .as_deref()
            .ok_or_else(|| AppError::Source("no metric source configured".to_string()))?;
        match source.fetch() {
            Ok(batch) => {
                self.batch_cache.put(batch.clone());
                self.set_status(SourceKind::Live, None);
                Ok(batch)
            }
            Err(error) => {
                self.set_status(SourceKind::Fallback, Some(error.to_string()));
                Err(error.into())
            }
        }
    }

    fn current_batch(&self) -> Option<MetricBatch> {
        if let Some(batch) = self.batch_cache.get() {
            self.set_status(SourceKind::LiveCached, None);
            return Some(batch);
        }

        match self.source.as_deref() {
            None => {
                self.set_status(
                    SourceKind::Fallback,
                    Some("no metric source configured".to_string()),
                );
                None
            }
            Some(source) => match source.fetch() {
                Ok(batch) => {
                    self.batch_cache.put(batch.clone());
                    self.set_status(SourceKind::Live, None);
                    Some(batch)
                }
                Err(error) => {
                    tracing::warn!(
                        error = %error,
                        "metric source fetch failed, serving fallback actuals"
                    );
                    self.set_status(SourceKind::Fallback, Some(error.to_string()));
                    None
                }
            },
        }
    }

    fn set_status(&self, source: SourceKind, error: Option<String>) {
        let mut status = self.status.lock().expect("status lock");
        *status = DataSourceStatus {
            is_live: source.is_live(),
            source,
            last_updated: Some(Utc::now()),
            error,
        };
    }

    fn record_for(
        &self,
        key: &str,
        batch: Option<&MetricBatch>,
        config: &TargetConfig,
    ) -> MetricRecord {
        let definition = registry::metric_definition(key);
        let direction = definition.map(|def| def.direction).unwrap_or_default();
        let mut format = definition.map(|def| def.format).unwrap_or(FormatKind::Number);
        let target = target_for(key, config);
        let mut actual = batch
            .and_then(|batch| batch.get(key).copied())
            .or_else(|| definition.and_then(|def| def.fallback_actual));

        if matches!(format, FormatKind::PipelineGap { .. }) {
            let coverage = batch
                .and_then(|batch| batch.get("Pipeline Coverage").copied())
                .or_else(|| {
                    registry::metric_definition("Pipeline Coverage")
                        .and_then(|def| def.fallback_actual)
                })
                .unwrap_or(0.0);
            format = FormatKind::PipelineGap { coverage };

            // The gap is derived, not sourced: coverage target times the
            // remaining quota, minus the weighted pipeline already built.
            if actual.is_none() {
                let remaining = batch
                    .and_then(|batch| batch.get(PIPELINE_REMAINING_KEY).copied())
                    .unwrap_or(registry::FALLBACK_PIPELINE_REMAINING);
                let weighted = batch
                    .and_then(|batch| batch.get(PIPELINE_WEIGHTED_KEY).copied())
                    .unwrap_or(registry::FALLBACK_PIPELINE_WEIGHTED);
                let coverage_target = target_for("Pipeline Coverage", config).unwrap_or(3.0);
                actual = Some(coverage_target * remaining - weighted);
            }
        }

        MetricRecord {
            key: key.to_string(),
            actual,
            target,
            direction,
            format,
            status_override: definition.and_then(|def| def.status_override),
        }
    }
}

/// Target lookup order: per-metric descriptor, then the company section via
/// the registry's company key, then the registry default.
fn target_for(key: &str, config: &TargetConfig) -> Option<f64> {
    if let Some(entry) = config.metric_targets.get(key) {
        return Some(entry.value);
    }
    let definition = registry::metric_definition(key)?;
    definition
        .company_target_key
        .and_then(|company_key| config.company.get(company_key).copied())
        .or(definition.default_target)
}
