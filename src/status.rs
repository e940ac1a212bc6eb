use crate::models::{Direction, MetricRecord, StatusResult, StatusTier};

pub const ON_TRACK_THRESHOLD: f64 = 1.0;
pub const AT_RISK_THRESHOLD: f64 = 0.85;

const ON_TRACK: StatusResult = StatusResult {
    tier: StatusTier::OnTrack,
    label: "On Track",
};
const AT_RISK: StatusResult = StatusResult {
    tier: StatusTier::AtRisk,
    label: "At Risk",
};
const OFF_TRACK: StatusResult = StatusResult {
    tier: StatusTier::OffTrack,
    label: "Off Track",
};
const NO_DATA: StatusResult = StatusResult {
    tier: StatusTier::Neutral,
    label: "No Data",
};
const NO_TARGET: StatusResult = StatusResult {
    tier: StatusTier::Neutral,
    label: "No Target",
};

/// Classify an actual against its target. Total over all finite inputs:
/// missing data degrades to Neutral and the zero-target / zero-actual edge
/// cases resolve through explicit branches rather than division.
pub fn classify(actual: Option<f64>, target: Option<f64>, direction: Direction) -> StatusResult {
    let Some(actual) = actual else {
        return NO_DATA;
    };
    let Some(target) = target else {
        return NO_TARGET;
    };

    // A target of 0 is valid (e.g. zero overdue invoices, zero pipeline gap),
    // but only when lower is better: "must not exceed zero" is attainable,
    // while a positive-is-good metric has no meaningful ratio against 0.
    if target == 0.0 {
        if direction.is_higher_better() {
            return NO_TARGET;
        }
        return if actual <= 0.0 { ON_TRACK } else { OFF_TRACK };
    }

    let ratio = if direction.is_higher_better() {
        actual / target
    } else {
        // Zero actual against a positive "lower is better" target is
        // unambiguously good; the ratio would divide by zero.
        if actual == 0.0 {
            return ON_TRACK;
        }
        target / actual
    };

    if ratio >= ON_TRACK_THRESHOLD {
        ON_TRACK
    } else if ratio >= AT_RISK_THRESHOLD {
        AT_RISK
    } else {
        OFF_TRACK
    }
}

/// Classify a resolved record, honoring its override when one is pinned
/// (e.g. "Needs PRD" for metrics with no data pipeline yet).
pub fn classify_record(record: &MetricRecord) -> StatusResult {
    if let Some(overridden) = record.status_override {
        return overridden;
    }
    classify(record.actual, record.target, record.direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FormatKind;

    fn tier(actual: Option<f64>, target: Option<f64>, direction: Direction) -> StatusTier {
        classify(actual, target, direction).tier
    }

    #[test]
    fn missing_actual_wins_over_everything() {
        for direction in [Direction::HigherIsBetter, Direction::LowerIsBetter] {
            let result = classify(None, Some(100.0), direction);
            assert_eq!(result.tier, StatusTier::Neutral);
            assert_eq!(result.label, "No Data");
        }
    }

    #[test]
    fn missing_target_is_neutral() {
        let result = classify(Some(50.0), None, Direction::HigherIsBetter);
        assert_eq!(result.tier, StatusTier::Neutral);
        assert_eq!(result.label, "No Target");
    }

    #[test]
    fn threshold_boundaries_higher_is_better() {
        let target = 200.0;
        assert_eq!(tier(Some(target), Some(target), Direction::HigherIsBetter), StatusTier::OnTrack);
        assert_eq!(tier(Some(0.85 * target), Some(target), Direction::HigherIsBetter), StatusTier::AtRisk);
        assert_eq!(tier(Some(0.849_999 * target), Some(target), Direction::HigherIsBetter), StatusTier::OffTrack);
    }

    #[test]
    fn zero_target_asymmetry() {
        assert_eq!(tier(Some(0.0), Some(0.0), Direction::LowerIsBetter), StatusTier::OnTrack);
        assert_eq!(tier(Some(-3.0), Some(0.0), Direction::LowerIsBetter), StatusTier::OnTrack);
        assert_eq!(tier(Some(5.0), Some(0.0), Direction::LowerIsBetter), StatusTier::OffTrack);

        let higher = classify(Some(5.0), Some(0.0), Direction::HigherIsBetter);
        assert_eq!(higher.tier, StatusTier::Neutral);
        assert_eq!(higher.label, "No Target");
    }

    #[test]
    fn zero_actual_lower_is_better_is_on_track() {
        assert_eq!(tier(Some(0.0), Some(100.0), Direction::LowerIsBetter), StatusTier::OnTrack);
        assert_eq!(tier(Some(0.0), Some(0.001), Direction::LowerIsBetter), StatusTier::OnTrack);
    }

    #[test]
    fn lower_is_better_uses_inverted_ratio() {
        // 60-day target, 69 days actual: 60/69 ~ 0.87 -> At Risk.
        assert_eq!(tier(Some(69.0), Some(60.0), Direction::LowerIsBetter), StatusTier::AtRisk);
        assert_eq!(tier(Some(50.0), Some(60.0), Direction::LowerIsBetter), StatusTier::OnTrack);
        assert_eq!(tier(Some(120.0), Some(60.0), Direction::LowerIsBetter), StatusTier::OffTrack);
    }

    #[test]
    fn totality_over_hostile_inputs() {
        let cases = [
            (Some(f64::MAX), Some(1.0)),
            (Some(-1.0), Some(-1.0)),
            (Some(0.0), Some(-5.0)),
            (Some(1e-300), Some(1e300)),
            (None, None),
        ];
        for (actual, target) in cases {
            for direction in [Direction::HigherIsBetter, Direction::LowerIsBetter] {
                let result = classify(actual, target, direction);
                assert!(matches!(
                    result.tier,
                    StatusTier::OnTrack | StatusTier::AtRisk | StatusTier::OffTrack | StatusTier::Neutral
                ));
            }
        }
    }

    #[test]
    fn record_override_takes_precedence() {
        let record = MetricRecord {
            key: "Sellable Inventory".to_string(),
            actual: Some(10.0),
            target: Some(10.0),
            direction: Direction::HigherIsBetter,
            format: FormatKind::Number,
            status_override: Some(StatusResult {
                tier: StatusTier::Neutral,
                label: "Needs PRD",
            }),
        };
        let result = classify_record(&record);
        assert_eq!(result.tier, StatusTier::Neutral);
        assert_eq!(result.label, "Needs PRD");
    }

    #[test]
    fn record_without_override_classifies_normally() {
        let record = MetricRecord {
            key: "Revenue YTD".to_string(),
            actual: Some(7_930_000.0),
            target: Some(10_000_000.0),
            direction: Direction::HigherIsBetter,
            format: FormatKind::Currency,
            status_override: None,
        };
        assert_eq!(classify_record(&record).tier, StatusTier::OffTrack);
    }
}
