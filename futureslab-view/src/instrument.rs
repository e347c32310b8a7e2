//! Start/end logging around display operations.
//!
//! ```
//! use futureslab_view::instrument::LogScope;
//!
//! fn display_something() {
//!     let _scope = LogScope::new("display_something");
//!     // START logged here, END with elapsed time logged on drop
//! }
//! ```

use std::fmt::Display;
use std::time::{Duration, Instant};

/// Logs `START` when created and `END` with the elapsed time when dropped.
pub struct LogScope {
    name: &'static str,
    start: Instant,
}

impl LogScope {
    pub fn new(name: &'static str) -> Self {
        log::debug!("START {name}");
        Self {
            name,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for LogScope {
    fn drop(&mut self) {
        log::debug!(
            "END {} ({:.3}ms)",
            self.name,
            self.start.elapsed().as_secs_f64() * 1000.0
        );
    }
}

/// Run `f` inside a `LogScope`, logging its error (if any) before returning it.
pub fn log_start_end<T, E, F>(name: &'static str, f: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
    E: Display,
{
    let _scope = LogScope::new(name);
    let result = f();
    if let Err(e) = &result {
        log::error!("{name} failed: {e}");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_measures_elapsed_time() {
        let scope = LogScope::new("test_scope");
        std::thread::sleep(Duration::from_millis(5));
        assert!(scope.elapsed() >= Duration::from_millis(5));
    }

    #[test]
    fn passes_results_through() {
        let ok: Result<u32, String> = log_start_end("ok_op", || Ok(42));
        assert_eq!(ok, Ok(42));

        let err: Result<u32, String> = log_start_end("failing_op", || Err("boom".into()));
        assert_eq!(err, Err("boom".to_string()));
    }
}
