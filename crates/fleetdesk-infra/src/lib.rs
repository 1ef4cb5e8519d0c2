//! Infrastructure layer: talking to the Strapi backend

pub mod repository;
pub mod strapi;

pub use repository::{StrapiResourceRepository, StrapiVehicleRepository};
pub use strapi::{FilterOp, LoginResponse, StrapiClient, StrapiQuery};
