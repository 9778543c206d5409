//! Stack growth for recursive value formatting.
//!
//! The argument formatter bounds recursion with an explicit depth counter,
//! but the counter is configurable and a large limit on a nested capture can
//! still exceed the default thread stack. Recursive steps are wrapped in
//! [`ensure_sufficient_stack`] so that the configured limit, not the host
//! stack size, is what ends the walk.
//!
//! On native targets the stack is grown with `stacker`; on WASM the closure is
//! called directly.

/// Remaining stack below which a new segment is allocated (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
