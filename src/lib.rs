//! Lifecycle tracking for electronic-signature requests.
//!
//! Requests are created in `Draft`, sent to a signer, resent, cancelled and
//! queried through [`service::SignatureService`]. Every operation validates its
//! input, runs one handler and answers with an [`outcome::Outcome`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod outcome;
pub mod pipeline;
pub mod repository;
pub mod request;
pub mod service;
pub mod sled_store;
pub mod types;
pub mod validation;
