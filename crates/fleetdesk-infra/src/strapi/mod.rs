//! Strapi REST conventions: query strings, response envelopes, error bodies

mod client;
pub mod envelope;
pub mod error;
mod query;

pub use client::{LoginResponse, StrapiClient};
pub use query::{FilterOp, StrapiQuery};
