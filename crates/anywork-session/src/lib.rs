//! Session and auth state management for AnyWork clients.
//!
//! This crate provides:
//! - The session controller and its auth state machine
//! - Navigation hooks for logout and auth-guard redirects
//! - Watch-channel broadcasting of auth transitions

pub mod controller;
pub mod navigator;

pub use controller::{AuthAttempt, AuthState, SessionController};
pub use navigator::{Navigator, NoopNavigator, RecordingNavigator};
