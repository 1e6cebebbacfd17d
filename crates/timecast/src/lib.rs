//! # timecast
//!
//! Bucketed time-series modeling for rust services.
//! Models learn from sliding windows over fixed-width time buckets and
//! predict or forecast values aligned back to bucket timestamps.

pub use timecast_facade::*;
