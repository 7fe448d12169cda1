//! Design points and objective conventions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{PcxError, PcxResult};

/// How the primary objective of a frontier is expressed.
///
/// A single frontier never mixes the two: loss is minimized, efficiency is
/// maximized. Component-level searches produce [`Convention::Loss`] frontiers
/// (absolute watts); stage and system frontiers use [`Convention::Efficiency`]
/// so that series composition becomes additive in fractional loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Convention {
    /// Absolute power loss in watts, minimized
    Loss,
    /// Efficiency in [0, 1], maximized
    Efficiency,
}

impl Convention {
    /// `true` when primary value `a` is at least as good as `b`.
    #[inline]
    pub fn better_or_equal(self, a: f64, b: f64) -> bool {
        match self {
            Convention::Loss => a <= b,
            Convention::Efficiency => a >= b,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Convention::Loss => "loss",
            Convention::Efficiency => "efficiency",
        }
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Convention {
    type Err = PcxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "loss" => Ok(Convention::Loss),
            "efficiency" | "eff" => Ok(Convention::Efficiency),
            other => Err(PcxError::Parse(format!("unknown convention '{other}'"))),
        }
    }
}

/// One of the three objectives of a design point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    /// Loss or efficiency, depending on the frontier convention
    Primary,
    Volume,
    Cost,
}

/// An immutable record of three objective values plus an opaque
/// configuration tag.
///
/// The tag is an ordered list of strings (device names, counts, topology,
/// frequency, ...). It is never interpreted by the frontier; when points
/// combine their tags are concatenated verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesignPoint {
    primary: f64,
    volume: f64,
    cost: f64,
    tag: Vec<String>,
}

impl DesignPoint {
    /// Create a point, rejecting non-finite or negative objective values.
    pub fn new(primary: f64, volume: f64, cost: f64, tag: Vec<String>) -> PcxResult<Self> {
        for (name, value) in [("primary", primary), ("volume", volume), ("cost", cost)] {
            if !value.is_finite() {
                return Err(PcxError::Validation(format!(
                    "{name} objective is not finite ({value})"
                )));
            }
            if value < 0.0 {
                return Err(PcxError::Validation(format!(
                    "{name} objective is negative ({value})"
                )));
            }
        }
        Ok(Self {
            primary,
            volume,
            cost,
            tag,
        })
    }

    /// Create an efficiency-convention point; efficiency must lie in [0, 1].
    pub fn efficiency(efficiency: f64, volume: f64, cost: f64, tag: Vec<String>) -> PcxResult<Self> {
        if !(0.0..=1.0).contains(&efficiency) {
            return Err(PcxError::Validation(format!(
                "efficiency {efficiency} outside [0, 1]"
            )));
        }
        Self::new(efficiency, volume, cost, tag)
    }

    /// Loss (W) or efficiency, depending on the owning frontier's convention.
    #[inline]
    pub fn primary(&self) -> f64 {
        self.primary
    }

    #[inline]
    pub fn volume(&self) -> f64 {
        self.volume
    }

    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn tag(&self) -> &[String] {
        &self.tag
    }

    pub fn objective(&self, objective: Objective) -> f64 {
        match objective {
            Objective::Primary => self.primary,
            Objective::Volume => self.volume,
            Objective::Cost => self.cost,
        }
    }

    /// `(primary, volume, cost)`
    pub fn objectives(&self) -> (f64, f64, f64) {
        (self.primary, self.volume, self.cost)
    }

    /// Prepend fields to the tag, keeping the existing fields after them.
    pub fn with_tag_prefix<I, S>(mut self, prefix: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tag: Vec<String> = prefix.into_iter().map(Into::into).collect();
        tag.append(&mut self.tag);
        self.tag = tag;
        self
    }
}

impl fmt::Display for DesignPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.6}, vol={:.4}, cost={:.2}) [{}]",
            self.primary,
            self.volume,
            self.cost,
            self.tag.join(" ")
        )
    }
}
