//! Core components for signing AWS API requests.
//!
//! This crate provides the protocol independent building blocks used by
//! the signer crates:
//!
//! - [`Endpoint`]: a parsed `protocol://hostname:port` target.
//! - [`SignableRequest`] / [`SignedRequest`]: the request description that
//!   goes into a signer and the dispatch-ready result that comes out.
//! - [`Error`] / [`ErrorKind`]: the error type shared by all signers.
//! - [`Env`]: environment access for configuration loaders.
//!
//! ## Example
//!
//! ```
//! use awsign_core::{Body, SignableRequest};
//! use http::Method;
//!
//! let req = SignableRequest::new(Method::POST, "sqs.us-east-1.amazonaws.com", "/")
//!     .with_query("Action", "ListQueues")
//!     .with_body("");
//!
//! assert_eq!(req.endpoint.host(), "sqs.us-east-1.amazonaws.com");
//! assert_eq!(req.body, Body::from(""));
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: SHA-256 and HMAC-SHA256 primitives
//! - [`time`]: Time formatting used by signature scopes
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod endpoint;
pub use endpoint::Endpoint;
mod env;
pub use env::Env;
pub use env::OsEnv;
pub use env::StaticEnv;
mod error;
pub use error::{Error, ErrorKind, Result};
mod request;
pub use request::{Body, QueryValue, SignableRequest, SignedRequest};
