//! Pure animation primitives for the Reel timeline engine.
//!
//! Everything here is a function of elapsed ticks and static
//! configuration: piecewise-linear [`InterpolationWindow`]s, closed-form
//! [`spring_value`], composable [`LocalClock`]s, and text/accent reveal
//! helpers. Nothing carries state between ticks, so any tick can be
//! evaluated in any order.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod interpolate;
pub mod reveal;
pub mod spring;
pub mod timeline;

pub use interpolate::{interpolate, Extrapolate, Extrapolation, InterpolationWindow};
pub use reveal::{blink, pulse, typewriter, typewriter_len};
pub use spring::{spring_value, SpringConfig};
pub use timeline::{fade_in_out, ramp, LocalClock};
