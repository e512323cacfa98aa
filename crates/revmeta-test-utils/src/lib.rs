//! Shared test utilities for the revision metadata mirror workspace.
//!
//! This crate provides standardised fixtures so crate test suites do not
//! each rebuild the same host wiring. It is a dev-dependency only and is never
//! published.
//!
//! # Modules
//!
//! - [`site`]: [`TestSite`](site::TestSite), an in-memory host with the
//!   mirror attached to its lifecycle bus
//! - [`config`]: temporary mirror configuration files

pub mod config;
pub mod site;

pub use site::TestSite;
