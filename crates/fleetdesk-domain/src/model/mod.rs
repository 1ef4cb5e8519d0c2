//! Domain model types

pub mod city;
pub mod driver;
pub mod logs;
pub mod master;
pub mod page;
pub mod relation;
pub mod resource;
pub mod trip;
pub mod vehicle;

pub use city::City;
pub use driver::Driver;
pub use logs::{FuelLog, GarageLog, TollLog, TyreLog};
pub use master::{FuelStation, Garage, LoadProvider, Staff};
pub use page::{ListQuery, Pagination, RecordPage};
pub use relation::{RecordId, Relation};
pub use resource::Resource;
pub use trip::{Trip, TripStatus};
pub use vehicle::{Vehicle, VehicleStatus};
