//! Background Tasks Module
//!
//! Contains deferred work scheduled by the driver.
//!
//! # Tasks
//! - Expiry: one-shot timers that delete a key once its TTL elapses

mod expiry;

pub use expiry::spawn_expiry;
