//! Display formatting for dimension names and tick values

use std::fmt;

use serde::Serialize;

/// SI prefixes from largest to smallest
const SI_PREFIXES: [(f64, &str); 9] = [
    (1e12, "T"),
    (1e9, "G"),
    (1e6, "M"),
    (1e3, "k"),
    (1.0, ""),
    (1e-3, "m"),
    (1e-6, "µ"),
    (1e-9, "n"),
    (1e-12, "p"),
];

/// Dotted display form of a name (`qubit1__readout` -> `qubit1.readout`)
pub fn pretty_name(name: &str) -> String {
    name.replace("__", ".")
}

/// Axis title: all name segments but the last plain, the last emphasized,
/// followed by the coordinate unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AxisLabel {
    pub prefix: String,
    pub emphasized: String,
    pub unit: String,
}

impl AxisLabel {
    pub fn new(name: &str, unit: &str) -> Self {
        let dotted = pretty_name(name);
        let (prefix, emphasized) = match dotted.rsplit_once('.') {
            Some((prefix, last)) => (prefix.to_string(), last.to_string()),
            None => (String::new(), dotted),
        };
        Self {
            prefix,
            emphasized,
            unit: unit.to_string(),
        }
    }
}

/// Plain-text rendering, emphasis marked with `*`
impl fmt::Display for AxisLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.prefix.is_empty() {
            write!(f, "{}.", self.prefix)?;
        }
        write!(f, "*{}*", self.emphasized)?;
        if !self.unit.is_empty() {
            write!(f, " ({})", self.unit)?;
        }
        Ok(())
    }
}

/// Format a tick value with its unit, scaled to an SI prefix
/// (`1.5e9, "Hz"` -> `1.5 GHz`). Unitless values are printed as-is.
pub fn format_tick(value: f64, unit: &str) -> String {
    if unit.is_empty() {
        return trim_number(value);
    }
    if value == 0.0 || !value.is_finite() {
        return format!("{} {unit}", trim_number(value));
    }
    let abs = value.abs();
    let (scale, prefix) = SI_PREFIXES
        .iter()
        .find(|(scale, _)| abs >= *scale)
        .copied()
        .unwrap_or(SI_PREFIXES[SI_PREFIXES.len() - 1]);
    format!("{} {prefix}{unit}", trim_number(value / scale))
}

/// Up to four decimals, trailing zeros removed
fn trim_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let text = format!("{value:.4}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
