//! Strapi-backed implementations of the domain repository traits

mod resource_repo;
mod vehicle_repo;

pub use resource_repo::StrapiResourceRepository;
pub use vehicle_repo::StrapiVehicleRepository;
