//! Test module for nbfc-core
//!
//! This module contains tests for:
//! - The per-fan Manual/Auto state machine
//! - Status reconciliation and the display values it produces
//! - The panel's user and remote entry points, including echo suppression
//! - Background dispatch and polling against a scripted transport
//! - Configuration loading and defaults

// Test modules use exact float comparisons
#![allow(clippy::float_cmp)]

mod fan_tests;
