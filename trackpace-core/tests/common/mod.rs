//! Shared fixtures for the integration tests
//!
//! - [`mocks`] - Recording implementations of the board, link and alarm
//! - [`scenarios`] - Tracker setups and canned downlinks

#![allow(dead_code)]

pub mod mocks;
pub mod scenarios;

pub use mocks::{MockAlarm, MockBoard, MockLink, MockSatellite, MockScanner, SentFrame};
pub use scenarios::{fire_after, fire_armed, tracker, vessel_message, TestTracker, NEW_YEAR_2024};
