//! Shared test utilities for the discharge map workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Byte encoders for the flat binary grids of a CaMa map
//! - Synthetic CaMa map directories written to temp dirs
//! - Discharge time series, vector text and shapefile generators
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{SyntheticMap, MapFixture};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Assert two numbers agree within `epsilon` (default `1e-9`).
///
/// Both sides are widened to `f64`, so `f32` grid values can be compared
/// against literal expectations directly.
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(field.value(0, 0).unwrap(), 2.0);
/// assert_approx_eq!(width_pt, 0.8, 1e-12);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr) => {
        $crate::assert_approx_eq!($left, $right, 1e-9)
    };
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let (left, right, epsilon) = ($left as f64, $right as f64, $epsilon as f64);
        if !((left - right).abs() <= epsilon) {
            panic!(
                "values differ: {} vs {} (|diff| {} > {})",
                left,
                right,
                (left - right).abs(),
                epsilon
            );
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_mixed_precision() {
        assert_approx_eq!(0.1f32, 0.1, 1e-7);
        assert_approx_eq!(-9999.0f32, -9999.0);
    }

    #[test]
    #[should_panic(expected = "values differ")]
    fn test_nan_never_matches() {
        assert_approx_eq!(f64::NAN, f64::NAN);
    }
}
