//! Delivery route optimizer.
//!
//! Compares a delivery route visiting stops in the order given against the
//! order chosen by an external directions provider, and reports distance,
//! driving time, fuel cost and savings.
//!
//! Provider responses are cached on disk so repeated runs over the same
//! stops cost nothing.

pub mod cache;
pub mod config;
pub mod directions;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod report;
pub mod viewer;
