use crate::models::FormatKind;

const MILLION: f64 = 1_000_000.0;
const THOUSAND: f64 = 1_000.0;

/// Placeholder for metrics with no value yet. Never an empty string.
pub const NO_VALUE: &str = "—";

/// Format a metric value for card display. Total and locale-independent:
/// fixed US-style output, absent values render as the em-dash placeholder.
pub fn format_value(value: Option<f64>, kind: FormatKind) -> String {
    let Some(value) = value else {
        return NO_VALUE.to_string();
    };

    match kind {
        FormatKind::Currency => {
            if value >= MILLION {
                format!("${:.2}M", value / MILLION)
            } else if value >= THOUSAND {
                format!("${:.0}K", value / THOUSAND)
            } else {
                format!("${value:.0}")
            }
        }
        FormatKind::Percent => format!("{:.0}%", value * 100.0),
        FormatKind::Multiplier => format!("{value:.1}x"),
        FormatKind::Number => group_thousands(value),
        FormatKind::Days => format!("{value:.0} days"),
        FormatKind::Hours => format!("{value:.1}hrs"),
        FormatKind::PipelineGap { coverage } => {
            // Gap amount in millions with the coverage ratio, e.g. "$4.2M (3.8x)".
            format!("${:.1}M ({:.1}x)", value.abs() / MILLION, coverage)
        }
    }
}

/// Compact variant used for target values in settings and exports.
pub fn format_target_display(value: Option<f64>, kind: FormatKind) -> String {
    let Some(value) = value else {
        return NO_VALUE.to_string();
    };

    match kind {
        FormatKind::Currency | FormatKind::PipelineGap { .. } => {
            if value >= MILLION {
                format!("${:.1}M", value / MILLION)
            } else if value >= THOUSAND {
                format!("${:.0}K", value / THOUSAND)
            } else {
                format!("${value:.0}")
            }
        }
        FormatKind::Percent => format!("{:.0}%", value * 100.0),
        FormatKind::Multiplier => format!("{value:.1}x"),
        FormatKind::Days => format!("{value:.0} days"),
        FormatKind::Hours => format!("{value:.0} hrs"),
        FormatKind::Number => format!("{value:.0}"),
    }
}

pub fn format_percent(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(value) => format!("{:.decimals$}%", value * 100.0),
        None => NO_VALUE.to_string(),
    }
}

fn group_thousands(value: f64) -> String {
    let rounded = format!("{value:.0}");
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}")
}
