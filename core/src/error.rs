//! Error type for request-building preconditions.
//!
//! # Design
//! Transfer outcomes are never `Err`: `execute` reports every transport
//! failure through the returned `Response`, so it stays total. The only
//! fallible operations are the multipart builders, which require
//! `make_form` to have been called first; that is a call-ordering mistake
//! and gets its own variant so callers see it immediately instead of
//! silently losing parts.

use thiserror::Error;

/// Errors returned by `Request` configuration methods.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// `add_file` or `add_field` was called before `make_form`.
    #[error("multipart form not initialized: call make_form before adding parts")]
    FormNotInitialized,
}
