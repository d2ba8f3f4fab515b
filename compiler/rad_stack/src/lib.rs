//! Stack safety for recursive parsing and evaluation.
//!
//! Two separate concerns live here:
//!
//! - [`ensure_sufficient_stack`] grows the native stack on demand so deeply
//!   nested expressions do not overflow the host thread.
//! - [`DepthLimit`] counts script-level recursion (user function calls) so a
//!   runaway script ends in a diagnostic rather than exhausting memory.
//!
//! On `wasm32` the stack helper is a passthrough.

/// Grow when less than this remains.
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment.
const STACK_SEGMENT: usize = 1024 * 1024;

/// Run `f`, first growing the stack if fewer than 100KB remain.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Returned by [`DepthLimit::enter`] when the limit would be exceeded.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DepthExceeded {
    pub limit: usize,
}

/// Recursion counter with a fixed ceiling.
///
/// ```
/// use rad_stack::DepthLimit;
///
/// let mut depth = DepthLimit::new(2);
/// assert!(depth.enter().is_ok());
/// assert!(depth.enter().is_ok());
/// assert!(depth.enter().is_err());
/// depth.exit();
/// assert_eq!(depth.current(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct DepthLimit {
    current: usize,
    limit: usize,
}

impl DepthLimit {
    pub const fn new(limit: usize) -> Self {
        DepthLimit { current: 0, limit }
    }

    /// Count one level deeper.
    ///
    /// # Errors
    ///
    /// Fails without changing the depth when already at the limit.
    pub fn enter(&mut self) -> Result<(), DepthExceeded> {
        if self.current >= self.limit {
            return Err(DepthExceeded { limit: self.limit });
        }
        self.current += 1;
        Ok(())
    }

    pub fn exit(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
