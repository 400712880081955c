//! Boundary-value probe generation.
//!
//! Given a length or value constraint, these functions produce the minimal
//! set of probe values that proves the boundary is enforced: one unit on each
//! side of every edge. They are pure and never touch an entity.

use std::fmt::Display;

use num_traits::{Num, PrimInt};

use crate::error::ConfigError;

/// Whether a probe is expected to pass validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    Valid,
    Invalid,
}

/// Which edge of a constraint a probe exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    BelowMin,
    AtMin,
    AtMax,
    AboveMax,
    Exact,
    NonNumeric,
}

/// A single probe value tagged with its expected outcome
#[derive(Debug, Clone, PartialEq)]
pub struct Probe<T> {
    pub value: T,
    pub expect: Expect,
    pub edge: Edge,
}

impl<T> Probe<T> {
    fn valid(value: T, edge: Edge) -> Self {
        Self {
            value,
            expect: Expect::Valid,
            edge,
        }
    }

    fn invalid(value: T, edge: Edge) -> Self {
        Self {
            value,
            expect: Expect::Invalid,
            edge,
        }
    }

    /// Check whether the probe should be rejected
    pub fn is_invalid(&self) -> bool {
        self.expect == Expect::Invalid
    }
}

/// Probes for a closed length range
#[derive(Debug, Clone, PartialEq)]
pub struct LengthRangeProbes {
    /// `min - 1` characters; absent when `min == 0`
    pub too_short: Option<Probe<String>>,
    /// `min` characters; absent when `min == 0`
    pub at_min: Option<Probe<String>>,
    /// `max + 1` characters
    pub too_long: Probe<String>,
    /// `max` characters; absent when `min == max` since `at_min` covers it
    pub at_max: Option<Probe<String>>,
}

impl LengthRangeProbes {
    /// All probes in declaration order
    pub fn probes(&self) -> Vec<&Probe<String>> {
        let mut probes = Vec::with_capacity(4);
        probes.extend(self.too_short.as_ref());
        probes.extend(self.at_min.as_ref());
        probes.push(&self.too_long);
        probes.extend(self.at_max.as_ref());
        probes
    }
}

/// Probes for a one-sided minimum length
#[derive(Debug, Clone, PartialEq)]
pub struct MinimumLengthProbes {
    /// `min - 1` characters; absent when `min == 0`
    pub too_short: Option<Probe<String>>,
    pub at_min: Probe<String>,
}

impl MinimumLengthProbes {
    /// All probes in declaration order
    pub fn probes(&self) -> Vec<&Probe<String>> {
        let mut probes = Vec::with_capacity(2);
        probes.extend(self.too_short.as_ref());
        probes.push(&self.at_min);
        probes
    }
}

/// Probes for an exact length
#[derive(Debug, Clone, PartialEq)]
pub struct ExactLengthProbes {
    pub too_short: Probe<String>,
    pub too_long: Probe<String>,
    pub exact: Probe<String>,
}

impl ExactLengthProbes {
    /// All probes in declaration order
    pub fn probes(&self) -> Vec<&Probe<String>> {
        vec![&self.too_short, &self.too_long, &self.exact]
    }
}

/// Probes for a closed value range
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRangeProbes<T> {
    pub below_min: Probe<T>,
    pub at_min: Probe<T>,
    pub above_max: Probe<T>,
    pub at_max: Probe<T>,
}

impl<T> ValueRangeProbes<T> {
    /// All probes in declaration order
    pub fn probes(&self) -> Vec<&Probe<T>> {
        vec![&self.below_min, &self.at_min, &self.above_max, &self.at_max]
    }
}

fn filled(filler: char, len: usize) -> String {
    std::iter::repeat_n(filler, len).collect()
}

fn successor_len(len: usize) -> Result<usize, ConfigError> {
    len.checked_add(1).ok_or_else(|| ConfigError::UnboundedProbe {
        bound: len.to_string(),
        direction: "successor",
    })
}

/// Probes for a length range `min..=max`
pub fn length_range_probes(
    min: usize,
    max: usize,
    filler: char,
) -> Result<LengthRangeProbes, ConfigError> {
    if min > max {
        return Err(ConfigError::InvalidRange {
            min: min.to_string(),
            max: max.to_string(),
        });
    }

    let (too_short, at_min) = if min > 0 {
        (
            Some(Probe::invalid(filled(filler, min - 1), Edge::BelowMin)),
            Some(Probe::valid(filled(filler, min), Edge::AtMin)),
        )
    } else {
        (None, None)
    };

    let too_long = Probe::invalid(filled(filler, successor_len(max)?), Edge::AboveMax);
    let at_max = (min != max).then(|| Probe::valid(filled(filler, max), Edge::AtMax));

    Ok(LengthRangeProbes {
        too_short,
        at_min,
        too_long,
        at_max,
    })
}

/// Probes for a minimum length
pub fn minimum_length_probes(min: usize, filler: char) -> MinimumLengthProbes {
    MinimumLengthProbes {
        too_short: (min > 0).then(|| Probe::invalid(filled(filler, min - 1), Edge::BelowMin)),
        at_min: Probe::valid(filled(filler, min), Edge::AtMin),
    }
}

/// Probes for an exact length
pub fn exact_length_probes(len: usize, filler: char) -> Result<ExactLengthProbes, ConfigError> {
    if len == 0 {
        return Err(ConfigError::InvalidLength(len));
    }
    Ok(ExactLengthProbes {
        too_short: Probe::invalid(filled(filler, len - 1), Edge::BelowMin),
        too_long: Probe::invalid(filled(filler, successor_len(len)?), Edge::AboveMax),
        exact: Probe::valid(filled(filler, len), Edge::Exact),
    })
}

/// Probes for an integer range `min..=max`
pub fn value_range_probes<T>(min: T, max: T) -> Result<ValueRangeProbes<T>, ConfigError>
where
    T: PrimInt + Display,
{
    if min > max {
        return Err(ConfigError::InvalidRange {
            min: min.to_string(),
            max: max.to_string(),
        });
    }

    let below = min
        .checked_sub(&T::one())
        .ok_or_else(|| ConfigError::UnboundedProbe {
            bound: min.to_string(),
            direction: "predecessor",
        })?;
    let above = max
        .checked_add(&T::one())
        .ok_or_else(|| ConfigError::UnboundedProbe {
            bound: max.to_string(),
            direction: "successor",
        })?;

    Ok(ValueRangeProbes {
        below_min: Probe::invalid(below, Edge::BelowMin),
        at_min: Probe::valid(min, Edge::AtMin),
        above_max: Probe::invalid(above, Edge::AboveMax),
        at_max: Probe::valid(max, Edge::AtMax),
    })
}

/// Probes for a range whose unit is given explicitly, e.g. a decimal range
/// stepping by `0.01`
pub fn stepped_value_range_probes<T>(
    min: T,
    max: T,
    step: T,
) -> Result<ValueRangeProbes<T>, ConfigError>
where
    T: Num + PartialOrd + Copy + Display,
{
    if !(step > T::zero()) {
        return Err(ConfigError::InvalidStep(step.to_string()));
    }
    if min > max {
        return Err(ConfigError::InvalidRange {
            min: min.to_string(),
            max: max.to_string(),
        });
    }

    Ok(ValueRangeProbes {
        below_min: Probe::invalid(min - step, Edge::BelowMin),
        at_min: Probe::valid(min, Edge::AtMin),
        above_max: Probe::invalid(max + step, Edge::AboveMax),
        at_max: Probe::valid(max, Edge::AtMax),
    })
}

/// The probe assigned to attributes that only accept numbers
pub fn numeric_only_probe(literal: &str) -> Probe<String> {
    Probe::invalid(literal.to_string(), Edge::NonNumeric)
}
