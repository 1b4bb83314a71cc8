//! Semantic time-duration values.
use std::ops::Mul;
use streamv_utils::Id;

/// A named time unit with its scale factor in seconds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Unit {
    name: Id,
    scale: f64,
}

impl Unit {
    pub fn new<S: Into<Id>>(name: S, scale: f64) -> Self {
        Unit {
            name: name.into(),
            scale,
        }
    }

    pub fn second() -> Self {
        Unit::new("s", 1.0)
    }

    pub fn millisecond() -> Self {
        Unit::new("ms", 0.001)
    }

    pub fn minute() -> Self {
        Unit::new("m", 60.0)
    }

    pub fn hour() -> Self {
        Unit::new("h", 3600.0)
    }

    pub fn name(&self) -> &Id {
        &self.name
    }

    /// Seconds in one step of this unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A duration: a magnitude paired with a [`Unit`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Period {
    value: f64,
    unit: Unit,
}

impl Period {
    pub fn new(value: f64, unit: Unit) -> Self {
        Period { value, unit }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn to_seconds(&self) -> f64 {
        self.value * self.unit.scale()
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

/// Construct a [`Period`] from a magnitude:
/// ```
/// use streamv_frontend::Unit;
/// let p = 10.0 * Unit::second();
/// assert_eq!(p.to_seconds(), 10.0);
/// ```
impl Mul<Unit> for f64 {
    type Output = Period;

    fn mul(self, unit: Unit) -> Period {
        Period::new(self, unit)
    }
}

/// Integer magnitudes work too: `10 * Unit::minute()`.
impl Mul<Unit> for i64 {
    type Output = Period;

    fn mul(self, unit: Unit) -> Period {
        Period::new(self as f64, unit)
    }
}
