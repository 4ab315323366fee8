//! State module for tracking crawl progress
//!
//! Defines the lifecycle each crawl target moves through, from admission to
//! the frontier until its worker releases it.

mod target_state;

pub use target_state::TargetState;
