//! Parallel iteration abstraction.
//!
//! Provides conditional parallel/sequential iteration based on the
//! `parallel` feature flag. With the feature enabled, batch fitting spreads
//! independent curves across threads via rayon; without it, the same code
//! runs sequentially. A single fit is always sequential, since each pass of
//! the reweighting loop depends on the previous one's solution.

/// Macro for conditionally parallel reference iteration over slices.
///
/// When the `parallel` feature is enabled, uses `par_iter()`.
/// Otherwise, uses `iter()` for sequential execution.
///
/// # Examples
///
/// ```ignore
/// use crate::slice_maybe_parallel;
///
/// let fits: Vec<_> = slice_maybe_parallel!(curves)
///     .map(|y| fit_one(y))
///     .collect();
/// ```
#[macro_export]
macro_rules! slice_maybe_parallel {
    ($expr:expr) => {{
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            $expr.par_iter()
        }
        #[cfg(not(feature = "parallel"))]
        {
            $expr.iter()
        }
    }};
}

// Re-export at module level
pub use slice_maybe_parallel;
