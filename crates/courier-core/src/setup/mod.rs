//! Scenario Setup
//!
//! The demo level layout and the stand-in physics that drives it headless.

pub mod demo;
pub mod driver;

pub use demo::{build_demo, DemoLayout};
pub use driver::Driver;
