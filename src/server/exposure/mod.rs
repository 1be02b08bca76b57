//! API exposure
//!
//! An exposure consumes a `ServerHost` and produces a Router for one
//! protocol. Only REST is provided.

pub mod rest;

pub use rest::RestExposure;
