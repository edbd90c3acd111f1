//! Encoding sinks.
//!
//! Sinks consume finished strip frames in order and are used by `StripeSession::render_into`.

/// Animated GIF output.
pub mod gif;
/// Generic animation sink trait and built-in sinks.
pub mod sink;
