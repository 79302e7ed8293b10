use std::fmt;

use crate::error::{PlannerError, Result};

pub const WARNING_THRESHOLD: f64 = 70.0;
pub const CRITICAL_THRESHOLD: f64 = 90.0;

pub const MEDIUM_PRESSURE_THRESHOLD: f64 = 50.0;
pub const HIGH_PRESSURE_THRESHOLD: f64 = 80.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Normal,
    Warning,
    Critical,
}

impl Severity {
    pub fn token(&self) -> &'static str {
        match self {
            Severity::Normal => "normal",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pressure {
    Low,
    Medium,
    High,
}

impl Pressure {
    pub fn token(&self) -> &'static str {
        match self {
            Pressure::Low => "low",
            Pressure::Medium => "medium",
            Pressure::High => "high",
        }
    }
}

impl fmt::Display for Pressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

pub fn usage_percentage(used_gb: f64, capacity_gb: f64) -> Result<f64> {
    if !capacity_gb.is_finite() || capacity_gb <= 0.0 {
        return Err(PlannerError::InvalidCapacity(capacity_gb));
    }

    Ok(used_gb / capacity_gb * 100.0)
}

/// Maps the used share of the capacity to a severity tier. Both thresholds
/// are exclusive: exactly 70% is still normal, exactly 90% is a warning.
pub fn classify(used_gb: f64, capacity_gb: f64) -> Result<Severity> {
    let percentage = usage_percentage(used_gb, capacity_gb)?;

    if percentage > CRITICAL_THRESHOLD {
        Ok(Severity::Critical)
    } else if percentage > WARNING_THRESHOLD {
        Ok(Severity::Warning)
    } else {
        Ok(Severity::Normal)
    }
}

pub fn classify_pressure(percentage: f64) -> Pressure {
    if percentage > HIGH_PRESSURE_THRESHOLD {
        Pressure::High
    } else if percentage > MEDIUM_PRESSURE_THRESHOLD {
        Pressure::Medium
    } else {
        Pressure::Low
    }
}
