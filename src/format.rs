//! Value formatters for tooltip readouts and axis tick labels.
//!
//! [`ValueFormatter::Identity`] is the default and renders the plain number.
//! The other variants cover fixed decimals, scientific notation, wall-clock
//! time and arbitrary closures supplied by the host.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// DecimalFormatter
// ─────────────────────────────────────────────────────────────────────────────

/// Fixed decimal notation: `123.456`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecimalFormatter {
    /// Digits after the decimal point.
    pub decimal_places: usize,
    /// Optional unit suffix appended after the number (e.g. `"mV"`).
    pub unit: Option<String>,
}

impl DecimalFormatter {
    pub fn format(&self, value: f64) -> String {
        with_unit(format!("{:.*}", self.decimal_places, value), &self.unit)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ScientificFormatter
// ─────────────────────────────────────────────────────────────────────────────

/// Scientific notation: `1.23e5`, no leading `+` and no zero-padded exponent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScientificFormatter {
    /// Digits after the decimal point in the mantissa.
    pub digits: usize,
    pub unit: Option<String>,
}

impl Default for ScientificFormatter {
    fn default() -> Self {
        Self {
            digits: 2,
            unit: None,
        }
    }
}

impl ScientificFormatter {
    pub fn format(&self, value: f64) -> String {
        with_unit(format_scientific(value, self.digits), &self.unit)
    }
}

/// Render `value` as compact scientific notation like `1.23e5` or `-4.00e-2`.
fn format_scientific(value: f64, digits: usize) -> String {
    if value == 0.0 {
        return format!("{:.*}", digits, 0.0_f64);
    }
    if !value.is_finite() {
        return format!("{}", value);
    }
    let mut exp = value.abs().log10().floor() as i32;
    let mut mantissa = format!("{:.*}", digits, value / 10f64.powi(exp));
    // Rounding can carry the mantissa to 10 (9.999 -> "10.00").
    if mantissa
        .trim_start_matches('-')
        .parse::<f64>()
        .is_ok_and(|m| m >= 10.0)
    {
        exp += 1;
        mantissa = format!("{:.*}", digits, value / 10f64.powi(exp));
    }
    if exp == 0 {
        mantissa
    } else {
        format!("{}e{}", mantissa, exp)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TimeOfDayFormatter
// ─────────────────────────────────────────────────────────────────────────────

/// Wall-clock formatter for x values counted from the UNIX epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeOfDayFormatter {
    /// `chrono` format string.
    pub pattern: String,
    /// How many x units make one second (1000 for milliseconds).
    pub units_per_second: f64,
    /// Render in UTC instead of the local timezone.
    pub utc: bool,
}

impl Default for TimeOfDayFormatter {
    fn default() -> Self {
        Self {
            pattern: "%H:%M:%S%.3f".to_string(),
            units_per_second: 1.0,
            utc: true,
        }
    }
}

impl TimeOfDayFormatter {
    pub fn format(&self, value: f64) -> String {
        let ups = if self.units_per_second > 0.0 {
            self.units_per_second
        } else {
            1.0
        };
        let secs_f = value / ups;
        if !secs_f.is_finite() {
            return format!("{}", value);
        }
        let secs = secs_f.floor();
        let nanos = ((secs_f - secs) * 1e9).round().min(999_999_999.0) as u32;
        match chrono::DateTime::from_timestamp(secs as i64, nanos) {
            Some(dt) if self.utc => dt.format(&self.pattern).to_string(),
            Some(dt) => dt
                .with_timezone(&chrono::Local)
                .format(&self.pattern)
                .to_string(),
            None => format!("{}", value),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ValueFormatter
// ─────────────────────────────────────────────────────────────────────────────

/// Host-supplied formatting closure.
#[derive(Clone)]
pub struct CustomFormatter(pub Arc<dyn Fn(f64) -> String + Send + Sync>);

impl std::fmt::Debug for CustomFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CustomFormatter(..)")
    }
}

/// Selects how a domain value is turned into text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueFormatter {
    /// Plain `Display` of the number.
    #[default]
    Identity,
    Decimal(DecimalFormatter),
    Scientific(ScientificFormatter),
    TimeOfDay(TimeOfDayFormatter),
    /// Closure supplied at runtime; never read from configuration files.
    #[serde(skip)]
    Custom(CustomFormatter),
}

impl ValueFormatter {
    pub fn custom(f: impl Fn(f64) -> String + Send + Sync + 'static) -> Self {
        ValueFormatter::Custom(CustomFormatter(Arc::new(f)))
    }

    pub fn decimal(decimal_places: usize) -> Self {
        ValueFormatter::Decimal(DecimalFormatter {
            decimal_places,
            unit: None,
        })
    }

    pub fn format(&self, value: f64) -> String {
        match self {
            ValueFormatter::Identity => format!("{}", value),
            ValueFormatter::Decimal(df) => df.format(value),
            ValueFormatter::Scientific(sf) => sf.format(value),
            ValueFormatter::TimeOfDay(tf) => tf.format(value),
            ValueFormatter::Custom(cf) => (cf.0)(value),
        }
    }
}

fn with_unit(s: String, unit: &Option<String>) -> String {
    match unit {
        Some(u) => format!("{} {}", s, u),
        None => s,
    }
}
