//! Core traits shared by the pipeline stages
//!
//! The stages are concrete types wired in a fixed order, so the shared
//! abstractions are value sanity and stage naming.

/// Trait for values that can be checked for physical sanity
pub trait Validatable {
    /// Check if the value is usable (not NaN, not infinite)
    fn is_valid(&self) -> bool;
}

impl Validatable for f32 {
    fn is_valid(&self) -> bool {
        self.is_finite()
    }
}

impl Validatable for f64 {
    fn is_valid(&self) -> bool {
        self.is_finite()
    }
}

/// A named pipeline stage
///
/// Used for log lines and diagnostics; every engine reports a stable name.
pub trait Stage {
    /// Stable stage name
    fn name(&self) -> &'static str;
}
