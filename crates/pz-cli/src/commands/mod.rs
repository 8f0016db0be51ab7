//! Command implementations for the pz CLI.

pub mod auth;
pub mod config;
pub mod paste;
pub mod secrets;
