//! Boundary between the public analysis API and the scoring service.
//!
//! The peer speaks its own JSON contract (`{url, html}` in, `{verdict,
//! phishing_probability, analyzed_features}` out).  Those shapes live in
//! [`adapter`] and never leak past this module.

pub mod adapter;
pub mod client;

pub use adapter::{PeerRequest, PeerResponse, translate, translate_back};
pub use client::{HttpScoringPeer, ScoringError, ScoringPeer};
