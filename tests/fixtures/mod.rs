//! Test Fixtures Module
//!
//! - Audio fixtures (programmatically generated)
//! - Relay fixtures: fake upstreams, configuration and request helpers

// Each test binary uses a different subset of the fixtures
#![allow(dead_code)]

pub mod audio_fixtures;
pub mod relay;

pub use audio_fixtures::*;
pub use relay::*;
