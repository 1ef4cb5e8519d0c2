//! Fleet domain: records mirrored from the backend and the logic derived from them

pub mod model;
pub mod repository;
pub mod service;
pub mod time;
