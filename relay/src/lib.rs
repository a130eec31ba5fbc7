//! tracerelay - replay captured trace files into an OTLP collector
//!
//! Reads span capture files (concatenated JSON records), reconstructs
//! typed spans, and re-exports the whole batch over OTLP/gRPC.

pub mod app;
pub mod core;
pub mod domain;
pub mod export;
pub mod pipeline;
pub mod stream;
pub mod utils;
