//! `huebridge` simulates a smart-light bridge controller.
//!
//! A [`bridge::Bridge`] owns a fixed set of simulated lights, gates every mutation behind a
//! one-time pairing step and re-renders the status of all lights after each change. The
//! [`effects`] module drives timed sequences of mutations (Morse blinking, disco colors) through
//! the bridge.
//!
//! # License
//!
//! This source code is released under the [MIT-License](https://opensource.org/licenses/MIT)

#[macro_use]
extern crate tracing;

pub mod bridge;
pub mod cli;
pub mod clock;
pub mod color;
pub mod effects;
pub mod methods;
pub mod models;
pub mod registry;
pub mod status;
