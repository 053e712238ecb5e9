//! Common utilities and types shared across RP Portal components.

#![warn(clippy::pedantic)]

/// Module for common error types
pub mod error;

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for JWT utilities (unverified decoding, claims, constants)
pub mod jwt;

/// Module for reading and writing the stored session token
pub mod session;
