use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::error::{PlannerError, Result};

pub const MB_PER_GB: f64 = 1024.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    MB,
    GB,
}

impl Unit {
    pub fn label(&self) -> &'static str {
        match self {
            Unit::MB => "MB",
            Unit::GB => "GB",
        }
    }
}

impl FromStr for Unit {
    type Err = PlannerError;

    fn from_str(unit: &str) -> Result<Unit> {
        match unit.trim().to_uppercase().as_str() {
            "MB" => Ok(Unit::MB),
            "GB" => Ok(Unit::GB),
            _ => Err(PlannerError::UnsupportedUnit(unit.trim().to_string())),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A size as written in the planner data, e.g. `350 MB` or `1.5 GB`.
///
/// The magnitude is always finite and non-negative; anything else is
/// rejected when the value is built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeValue {
    magnitude: f64,
    unit: Unit,
}

impl SizeValue {
    pub fn new(magnitude: f64, unit: Unit) -> Result<SizeValue> {
        if !magnitude.is_finite() || magnitude < 0.0 {
            return Err(PlannerError::InvalidSize(format!(
                "magnitude must be a finite, non-negative number, got {}",
                magnitude
            )));
        }

        Ok(SizeValue { magnitude, unit })
    }

    pub fn from_parts(magnitude: f64, unit: &str) -> Result<SizeValue> {
        SizeValue::new(magnitude, unit.parse()?)
    }

    pub fn gigabytes(magnitude: f64) -> Result<SizeValue> {
        SizeValue::new(magnitude, Unit::GB)
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Gets the size in gigabytes.
    pub fn to_canonical(&self) -> f64 {
        match self.unit {
            Unit::MB => self.magnitude / MB_PER_GB,
            Unit::GB => self.magnitude,
        }
    }
}

impl FromStr for SizeValue {
    type Err = PlannerError;

    fn from_str(size: &str) -> Result<SizeValue> {
        lazy_static! {
            static ref REGEX_SIZE: Regex =
                Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)\s*([A-Za-z]+)\s*$")
                    .unwrap();
        }

        let captures = match REGEX_SIZE.captures(size) {
            Some(captures) => captures,
            None => {
                return Err(PlannerError::InvalidSize(format!(
                    "'{}' is not of the form '<number> <unit>'",
                    size
                )));
            }
        };

        let unit = captures[2].parse::<Unit>()?;
        let magnitude = captures[1]
            .parse::<f64>()
            .map_err(|_| PlannerError::InvalidSize(format!("'{}' has no valid number", size)))?;

        SizeValue::new(magnitude, unit)
    }
}

impl fmt::Display for SizeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.magnitude, self.unit)
    }
}

/// Parses a size string like `350 MB` and converts it to gigabytes.
pub fn to_canonical(size: &str) -> Result<f64> {
    Ok(size.parse::<SizeValue>()?.to_canonical())
}
