//! Deferred Hash Service Library
//!
//! This library crate defines the core modules of the service. It serves as
//! the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! The system is composed of two subsystems:
//!
//! - **`service`**: The asynchronous task-processing engine. It allocates
//!   task identifiers, runs each accepted submission on a detached deferred
//!   path, stores completed results, and coordinates the drain-then-terminate
//!   shutdown sequence.
//! - **`hashing`**: The one-way transformation applied to submitted values
//!   (SHA-512, Base64-encoded). Injected into the service as a closure so the
//!   engine itself stays transformation-agnostic.

pub mod hashing;
pub mod service;
