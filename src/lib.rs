//! Multi-day event schedule built from concurrently loaded block resources.
//!
//! Block resources are fetched together by the [`aggregate`] module and merged
//! into one ordered list. The [`schedule`] module projects that list onto a
//! day's ordered block numbers, and [`state`] ties the two together behind the
//! load and day-selection triggers used by the CLI and the HTTP [`api`].

pub mod aggregate;
pub mod api;
pub mod config;
pub mod models;
pub mod render;
pub mod schedule;
pub mod state;
