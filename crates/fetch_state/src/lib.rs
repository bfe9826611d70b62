//! Crate for tracking the state of a remote resource.
//!
//! This crate provides a [`FetchController`] that retrieves a resource through
//! a pluggable [`Retriever`], exposes `data`, `loading` and `error` to
//! observers, re-fetches when the resource identifier changes, and drops the
//! results of attempts that were superseded or that finished after the
//! controller was detached.

pub mod controller;
pub use controller::{FetchController, FetchOptions};

pub mod errors;
pub use errors::{Error, FetchError};

pub mod retriever;
pub use retriever::{HttpRetriever, HttpRetrieverConfig, Response, Retriever};

pub mod state;
pub use state::FetchState;
