//! Catalogue of backend collections

use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    City, Driver, FuelLog, FuelStation, Garage, GarageLog, LoadProvider, Staff, TollLog, Trip,
    TyreLog, Vehicle,
};

/// Every collection the console manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    Cities,
    Drivers,
    Vehicles,
    Trips,
    Garages,
    FuelStations,
    LoadProviders,
    Staff,
    GarageLogs,
    FuelLogs,
    TollLogs,
    TyreLogs,
}

impl Resource {
    pub const ALL: [Resource; 12] = [
        Resource::Cities,
        Resource::Drivers,
        Resource::Vehicles,
        Resource::Trips,
        Resource::Garages,
        Resource::FuelStations,
        Resource::LoadProviders,
        Resource::Staff,
        Resource::GarageLogs,
        Resource::FuelLogs,
        Resource::TollLogs,
        Resource::TyreLogs,
    ];

    /// REST collection segment under `/api/`
    pub fn collection_path(&self) -> &'static str {
        match self {
            Resource::Cities => "cities",
            Resource::Drivers => "drivers",
            Resource::Vehicles => "vehicles",
            Resource::Trips => "trips",
            Resource::Garages => "garages",
            Resource::FuelStations => "fuel-stations",
            Resource::LoadProviders => "load-providers",
            Resource::Staff => "staffs",
            Resource::GarageLogs => "garage-logs",
            Resource::FuelLogs => "fuel-logs",
            Resource::TollLogs => "toll-logs",
            Resource::TyreLogs => "tyre-logs",
        }
    }

    /// Field matched by free-text search
    pub fn search_field(&self) -> &'static str {
        match self {
            Resource::Vehicles => "vehicleNumber",
            Resource::Trips => "tripNumber",
            Resource::GarageLogs | Resource::FuelLogs => "invoiceNumber",
            Resource::TollLogs => "tollPlazaName",
            Resource::TyreLogs => "tyreNumber",
            _ => "name",
        }
    }

    /// Human-readable singular name
    pub fn label(&self) -> &'static str {
        match self {
            Resource::Cities => "City",
            Resource::Drivers => "Driver",
            Resource::Vehicles => "Vehicle",
            Resource::Trips => "Trip",
            Resource::Garages => "Garage",
            Resource::FuelStations => "Fuel station",
            Resource::LoadProviders => "Load provider",
            Resource::Staff => "Staff member",
            Resource::GarageLogs => "Garage log",
            Resource::FuelLogs => "Fuel log",
            Resource::TollLogs => "Toll log",
            Resource::TyreLogs => "Tyre log",
        }
    }

    /// Columns worth showing in a table listing, as (field, header)
    pub fn summary_fields(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Resource::Cities => &[("name", "Name"), ("code", "Code"), ("state", "State")],
            Resource::Drivers => &[
                ("name", "Name"),
                ("contactNumber", "Contact"),
                ("licenseNumber", "Licence"),
            ],
            Resource::Vehicles => &[
                ("vehicleNumber", "Number"),
                ("model", "Model"),
                ("currentStatus", "Status"),
            ],
            Resource::Trips => &[
                ("tripNumber", "Trip"),
                ("startPoint", "From"),
                ("endPoint", "To"),
                ("status", "Status"),
            ],
            Resource::Staff => &[("name", "Name"), ("role", "Role"), ("isActive", "Active")],
            Resource::Garages | Resource::FuelStations | Resource::LoadProviders => &[
                ("name", "Name"),
                ("contactNumber", "Contact"),
                ("isActive", "Active"),
            ],
            Resource::GarageLogs | Resource::FuelLogs => &[
                ("invoiceNumber", "Invoice"),
                ("amount", "Amount"),
                ("date", "Date"),
            ],
            Resource::TollLogs => &[
                ("tollPlazaName", "Toll plaza"),
                ("amount", "Amount"),
                ("date", "Date"),
            ],
            Resource::TyreLogs => &[
                ("tyreNumber", "Tyre"),
                ("position", "Position"),
                ("amount", "Amount"),
            ],
        }
    }
}

impl Resource {
    /// Check that a create or update body decodes as this collection's record.
    ///
    /// Every field is optional, so partial update bodies pass; a field of the
    /// wrong type does not.
    pub fn check_body(&self, body: &Value) -> Result<(), serde_json::Error> {
        match self {
            Resource::Cities => check::<City>(body),
            Resource::Drivers => check::<Driver>(body),
            Resource::Vehicles => check::<Vehicle>(body),
            Resource::Trips => check::<Trip>(body),
            Resource::Garages => check::<Garage>(body),
            Resource::FuelStations => check::<FuelStation>(body),
            Resource::LoadProviders => check::<LoadProvider>(body),
            Resource::Staff => check::<Staff>(body),
            Resource::GarageLogs => check::<GarageLog>(body),
            Resource::FuelLogs => check::<FuelLog>(body),
            Resource::TollLogs => check::<TollLog>(body),
            Resource::TyreLogs => check::<TyreLog>(body),
        }
    }
}

fn check<T: DeserializeOwned>(body: &Value) -> Result<(), serde_json::Error> {
    T::deserialize(body).map(|_| ())
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.collection_path())
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        let found = Resource::ALL.iter().copied().find(|r| {
            r.collection_path() == normalized
                || (*r == Resource::Staff && normalized == "staff")
                || (*r == Resource::Cities && normalized == "city")
                || r.collection_path().trim_end_matches('s') == normalized
        });
        found.ok_or_else(|| {
            let names: Vec<&str> = Resource::ALL.iter().map(|r| r.collection_path()).collect();
            format!("unknown resource '{}' (expected one of: {})", s, names.join(", "))
        })
    }
}
