//! The error boundary every event handler runs inside.
//!
//! A failing handler is logged with its name and swallowed. Other handlers
//! for the same event, and every later event, still run.

use anyhow::Result;
use tracing::error;

/// Run `handler`, logging and discarding any error. Returns whether it succeeded.
pub fn guard<F>(name: &str, handler: F) -> bool
where
    F: FnOnce() -> Result<()>,
{
    match handler() {
        Ok(()) => true,
        Err(e) => {
            error!(handler = name, "Error in event handler: {:#}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Context};

    #[test]
    fn test_guard_success() {
        let mut ran = false;
        assert!(guard("ok", || {
            ran = true;
            Ok(())
        }));
        assert!(ran);
    }

    #[test]
    fn test_guard_swallows_error() {
        let result: Result<()> = Err(anyhow!("boom"));
        assert!(!guard("failing", || result.context("while clicking")));
    }

    #[test]
    fn test_guard_continues_after_failure() {
        let mut count = 0;
        for fails in [true, false, true, false] {
            guard("mixed", || {
                count += 1;
                if fails {
                    Err(anyhow!("fail"))
                } else {
                    Ok(())
                }
            });
        }
        assert_eq!(count, 4);
    }
}
