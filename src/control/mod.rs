//! Request flow control: shared cancellation and per-site debounce.

pub mod cancel;
pub mod debounce;

pub use cancel::CancelSignal;
pub use debounce::{CallSite, DebounceGate, Ticket};
