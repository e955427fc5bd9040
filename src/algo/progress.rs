//! Progress reporting for long-running algorithms.
//!
//! This module provides a simple progress callback mechanism that algorithms
//! can use to report their progress to callers.
//!
//! # Example
//!
//! ```
//! use mend::algo::fill::{fill_holes_with_progress, FillOptions};
//! use mend::algo::progress::Progress;
//! use mend::mesh::CornerTable;
//!
//! let progress = Progress::new(|current, total, message| {
//!     println!("[{}/{}] {}", current, total, message);
//! });
//!
//! let mesh = CornerTable::<u32>::new();
//! let patches = fill_holes_with_progress(&mesh, &FillOptions::default(), &progress).unwrap();
//! assert!(patches.is_empty());
//! ```

/// A progress callback that receives updates during long-running operations.
///
/// The callback receives:
/// - `current`: Number of steps completed
/// - `total`: Total number of steps
/// - `message`: Description of the current operation
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_report() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = Progress::new(move |current, total, message| {
            sink.lock().unwrap().push((current, total, message.to_string()));
        });

        progress.report(1, 3, "Filling holes");
        progress.report(3, 3, "Filling holes");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], (3, 3, "Filling holes".to_string()));
    }

    #[test]
    fn test_none_is_silent() {
        let progress = Progress::default();
        progress.report(0, 1, "ignored");
        assert_eq!(format!("{:?}", progress), "Progress { .. }");
    }
}
