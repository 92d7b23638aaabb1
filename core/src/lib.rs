//! Synchronous HTTP request façade over libcurl.
//!
//! # Overview
//! Construct a [`Request`] with a method and URL, optionally attach
//! headers, a body, proxy settings, a TLS-verification toggle, or
//! multipart form fields, then call [`Request::execute`] to run the
//! blocking transfer and get back a [`Response`] (status code, body text,
//! error flag, diagnostic string).
//!
//! # Design
//! - All of the hard parts (sockets, TLS, redirects, connection reuse)
//!   live in the engine, `curl`; this crate only configures handles and
//!   invokes one blocking perform per call.
//! - `execute` is total: transport failures come back as a `Response`
//!   carrying a reserved status code below 100, never as a panic or `Err`.
//!   Server-side 4xx/5xx are ordinary responses.
//! - Engine global state is initialized exactly once, before the first
//!   transfer, behind a `std::sync::Once`.
//! - Every resource (handle, headers, form parts) is an owned value and is
//!   released when the `Request` drops.

pub mod error;
mod init;
pub mod method;
pub mod request;
pub mod response;

pub use error::Error;
pub use method::Method;
pub use request::Request;
pub use response::{Response, CLIENT_ERROR_MAX, STATUS_ENGINE_INIT_FAILED, STATUS_TRANSFER_FAILED};
