//! Declarative Guidance Rules
//!
//! ## Overview
//!
//! Agronomic guidance is a list of `(condition, message)` pairs. Conditions
//! are plain data ([`Condition`]), so rule tables are `static` arrays and a
//! single interpreter ([`evaluate`]) serves both the nutrient interaction
//! analyzer and the crop recommendation engine. Adding a crop or a rule
//! means adding a table row, not a branch.
//!
//! ## Three-Valued Evaluation
//!
//! A condition evaluates to `Some(true)`, `Some(false)` or `None`. `None`
//! means the condition needs a measurement the growing environment cannot
//! provide (or an optimum the context does not have). A rule whose condition
//! is `None` is skipped silently. An unavailable nutrient is unknown, not
//! deficient.
//!
//! | Combinator | Result |
//! |---|---|
//! | `All` | `false` if any child is false, else `None` if any child is unknown, else `true` |
//! | `Any` | `true` if any child is true, else `None` if any child is unknown, else `false` |
//!
//! So `pH > 7 OR K > 300` still fires in hydroponics when the pH alone is
//! high.
//!
//! ## Example
//!
//! ```rust
//! use soilsense_core::rules::{Condition, Rule, RuleContext, Guidance, evaluate};
//! use soilsense_core::reading::{CompensatedReading, Measurement, SensorReading};
//! use soilsense_core::soil::SoilType;
//!
//! static RULES: &[Rule] = &[
//!     Rule::new(Condition::Above(Measurement::Ph, 7.5), "Alkaline soil: acidify"),
//!     Rule::new(Condition::Below(Measurement::Ph, 6.0), "Acidic soil: apply lime"),
//! ];
//!
//! let reading = SensorReading::new(20.0, 30.0, 1000.0, 7.8, 100.0, 40.0, 150.0, 0);
//! let compensated = CompensatedReading::from_reading(&reading);
//! let ctx = RuleContext::new(&compensated, SoilType::Loam);
//!
//! let mut out = Guidance::new();
//! evaluate(RULES, &ctx, &mut out);
//! assert_eq!(out.as_slice(), &["Alkaline soil: acidify"]);
//! ```

use core::fmt;

use heapless::Vec;

use crate::{
    constants::buffers::MAX_GUIDANCE_LINES,
    crop::OptimalRange,
    reading::{CompensatedReading, Measurement},
    soil::SoilType,
};

/// Predicate over a reading and its context
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    /// Value strictly below a threshold
    Below(Measurement, f32),
    /// Value strictly above a threshold
    Above(Measurement, f32),
    /// Value more than `tolerance` below the crop optimum
    BelowOptimal(Measurement, f32),
    /// Value more than `tolerance` above the crop optimum
    AboveOptimal(Measurement, f32),
    /// `numerator / denominator` strictly above a threshold
    RatioAbove(Measurement, Measurement, f32),
    /// Soil is one of the listed types
    SoilIs(&'static [SoilType]),
    /// Every child holds
    All(&'static [Condition]),
    /// At least one child holds
    Any(&'static [Condition]),
}

impl Condition {
    /// Three-valued evaluation, `None` when a needed value is unavailable
    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<bool> {
        match *self {
            Condition::Below(m, threshold) => ctx.value(m).map(|v| v < threshold),
            Condition::Above(m, threshold) => ctx.value(m).map(|v| v > threshold),
            Condition::BelowOptimal(m, tolerance) => {
                let optimum = ctx.optimal?.get(m);
                ctx.value(m).map(|v| v < optimum - tolerance)
            }
            Condition::AboveOptimal(m, tolerance) => {
                let optimum = ctx.optimal?.get(m);
                ctx.value(m).map(|v| v > optimum + tolerance)
            }
            Condition::RatioAbove(numerator, denominator, threshold) => {
                let n = ctx.value(numerator)?;
                let d = ctx.value(denominator)?;
                Some(d > 0.0 && n / d > threshold)
            }
            Condition::SoilIs(soils) => Some(soils.contains(&ctx.soil)),
            Condition::All(children) => {
                let mut unknown = false;
                for child in children {
                    match child.evaluate(ctx) {
                        Some(false) => return Some(false),
                        None => unknown = true,
                        Some(true) => {}
                    }
                }
                if unknown { None } else { Some(true) }
            }
            Condition::Any(children) => {
                let mut unknown = false;
                for child in children {
                    match child.evaluate(ctx) {
                        Some(true) => return Some(true),
                        None => unknown = true,
                        Some(false) => {}
                    }
                }
                if unknown { None } else { Some(false) }
            }
        }
    }
}

/// A condition and the guidance it produces
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    /// When the rule fires
    pub when: Condition,
    /// Guidance text
    pub message: &'static str,
}

impl Rule {
    /// Build a rule
    pub const fn new(when: Condition, message: &'static str) -> Self {
        Self { when, message }
    }
}

/// Everything a condition may look at
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Final reading
    pub reading: &'a CompensatedReading,
    /// Soil in use
    pub soil: SoilType,
    /// Crop optimum, if a crop is configured
    pub optimal: Option<&'a OptimalRange>,
}

impl<'a> RuleContext<'a> {
    /// Context without crop optimum
    pub fn new(reading: &'a CompensatedReading, soil: SoilType) -> Self {
        Self { reading, soil, optimal: None }
    }

    /// Attach a crop optimum
    pub fn with_optimal(mut self, optimal: &'a OptimalRange) -> Self {
        self.optimal = Some(optimal);
        self
    }

    fn value(&self, m: Measurement) -> Option<f32> {
        self.reading.get(m)
    }
}

/// Ordered guidance lines with fixed capacity
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Guidance {
    lines: Vec<&'static str, MAX_GUIDANCE_LINES>,
    truncated: bool,
}

impl Guidance {
    /// Empty list
    pub const fn new() -> Self {
        Self { lines: Vec::new(), truncated: false }
    }

    /// Append a line; returns false and marks truncation when full
    pub fn push(&mut self, line: &'static str) -> bool {
        if self.lines.push(line).is_err() {
            if !self.truncated {
                log_warn!("guidance list full, dropping further lines");
            }
            self.truncated = true;
            return false;
        }
        true
    }

    /// Lines in rule-declaration order
    pub fn as_slice(&self) -> &[&'static str] {
        &self.lines
    }

    /// Iterate lines
    pub fn iter(&self) -> impl Iterator<Item = &&'static str> {
        self.lines.iter()
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when no line was produced
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// True if lines were dropped for lack of capacity
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// True if an identical line is present
    pub fn contains(&self, line: &str) -> bool {
        self.lines.iter().any(|l| *l == line)
    }
}

/// Newline-separated text
impl fmt::Display for Guidance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

/// Evaluate rules in order, appending every firing message
///
/// No early exit: every rule is evaluated. Returns the number of rules that
/// fired.
pub fn evaluate(rules: &[Rule], ctx: &RuleContext<'_>, out: &mut Guidance) -> usize {
    let mut fired = 0;
    for rule in rules {
        if rule.when.evaluate(ctx) == Some(true) {
            out.push(rule.message);
            fired += 1;
        }
    }
    fired
}
