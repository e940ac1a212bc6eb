use kpi_dashboard::resolve::MetricBatch;
use kpi_dashboard::{
    classify_record, format_value, MetricResolver, MetricSource, SourceKind, StatusTier,
    TargetStore,
};
use std::collections::HashMap;
use std::sync::Arc;

struct WarehouseStub {
    batch: MetricBatch,
}

impl WarehouseStub {
    fn new(entries: &[(&str, f64)]) -> Arc<Self> {
        Arc::new(Self {
            batch: entries
                .iter()
                .map(|(key, value)| (key.to_string(), *value))
                .collect(),
        })
    }
}

impl MetricSource for WarehouseStub {
    fn fetch(&self) -> anyhow::Result<MetricBatch> {
        Ok(self.batch.clone())
    }
}

struct OfflineWarehouse;

impl MetricSource for OfflineWarehouse {
    fn fetch(&self) -> anyhow::Result<MetricBatch> {
        anyhow::bail!("connection refused")
    }
}

fn temp_store() -> (tempfile::TempDir, Arc<TargetStore>) {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = Arc::new(TargetStore::new(dir.path().join("targets.json")));
    (dir, store)
}

#[test]
fn live_render_pass_produces_display_strings_and_statuses() {
    let (_dir, store) = temp_store();
    let source = WarehouseStub::new(&[
        ("Revenue YTD", 10_200_000.0),
        ("Take Rate %", 0.40),
        ("Days to Fulfill", 52.0),
    ]);
    let resolver = MetricResolver::with_source(store, source);

    let snapshot = resolver.snapshot(&["Revenue YTD", "Take Rate %", "Days to Fulfill"]);
    assert!(snapshot.source.is_live);
    assert_eq!(snapshot.source.source, SourceKind::Live);

    let revenue = &snapshot.records["Revenue YTD"];
    assert_eq!(format_value(revenue.actual, revenue.format), "$10.20M");
    assert_eq!(classify_record(revenue).tier, StatusTier::OnTrack);

    // 0.40 against the default 0.45 target: ratio ~0.89 -> At Risk.
    let take_rate = &snapshot.records["Take Rate %"];
    assert_eq!(format_value(take_rate.actual, take_rate.format), "40%");
    assert_eq!(classify_record(take_rate).tier, StatusTier::AtRisk);

    // Lower-is-better: 52 days against a 60-day ceiling is on track.
    let fulfill = &snapshot.records["Days to Fulfill"];
    assert_eq!(format_value(fulfill.actual, fulfill.format), "52 days");
    assert_eq!(classify_record(fulfill).tier, StatusTier::OnTrack);
}

#[test]
fn offline_warehouse_degrades_to_fallback_for_every_requested_key() {
    let (_dir, store) = temp_store();
    let resolver = MetricResolver::with_source(store, Arc::new(OfflineWarehouse));

    let snapshot = resolver.company_snapshot();
    assert!(!snapshot.source.is_live);
    assert_eq!(snapshot.source.source, SourceKind::Fallback);
    assert!(snapshot
        .source
        .error
        .as_deref()
        .is_some_and(|error| error.contains("connection refused")));

    // Every company metric still resolves to a record.
    assert!(snapshot.records.len() >= 10);
    for record in snapshot.records.values() {
        let result = classify_record(record);
        assert!(matches!(
            result.tier,
            StatusTier::OnTrack | StatusTier::AtRisk | StatusTier::OffTrack | StatusTier::Neutral
        ));
    }

    // Known fallbacks shine through.
    assert_eq!(snapshot.records["Revenue YTD"].actual, Some(7_930_000.0));
    assert_eq!(
        classify_record(&snapshot.records["Sellable Inventory"]).label,
        "Needs PRD"
    );
}

#[test]
fn target_edits_reach_the_next_snapshot_immediately() {
    let (_dir, store) = temp_store();
    let resolver = MetricResolver::new(store.clone());

    let before = resolver.snapshot(&["Customer Count"]);
    assert_eq!(before.records["Customer Count"].target, Some(75.0));

    store
        .update_company_target("customer_count_target", 100.0, "admin")
        .expect("update target");

    let after = resolver.snapshot(&["Customer Count"]);
    assert_eq!(after.records["Customer Count"].target, Some(100.0));
    // 51 of 100: below the 0.85 threshold now.
    assert_eq!(
        classify_record(&after.records["Customer Count"]).tier,
        StatusTier::OffTrack
    );
}

#[test]
fn person_scorecard_merges_configured_targets() {
    let (_dir, store) = temp_store();
    store
        .update_person_target("Danny Sears", 4.0, "admin")
        .expect("person update");
    let resolver = MetricResolver::new(store);

    let people = resolver.person_metrics();
    assert_eq!(people.len(), 17);

    let danny = people
        .iter()
        .find(|person| person.name == "Danny Sears")
        .expect("danny row");
    assert_eq!(danny.record.target, Some(4.0));
    // 2.8x against 4.0x: ratio 0.7 -> Off Track.
    assert_eq!(classify_record(&danny.record).tier, StatusTier::OffTrack);

    // Engineering rows have no actuals yet and stay neutral.
    let vp = people
        .iter()
        .find(|person| person.name == "VP Engineering")
        .expect("vp row");
    assert_eq!(classify_record(&vp.record).label, "No Data");
    assert_eq!(format_value(vp.record.actual, vp.record.format), "—");
}

#[test]
fn batch_values_are_not_confused_across_keys() {
    let (_dir, store) = temp_store();
    let mut entries: HashMap<String, f64> = HashMap::new();
    entries.insert("Customer Count".to_string(), 63.0);
    let source = Arc::new(WarehouseStub { batch: entries });
    let resolver = MetricResolver::with_source(store, source);

    let records = resolver.resolve(&["Customer Count", "Logo Retention"]);
    assert_eq!(records["Customer Count"].actual, Some(63.0));
    assert_eq!(records["Logo Retention"].actual, Some(0.37));
}
