//! City records

use serde::{Deserialize, Serialize};

use super::relation::{nullable_vec, Relation};
use super::{FuelStation, Garage, LoadProvider};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub garages: Vec<Relation<Garage>>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub fuel_stations: Vec<Relation<FuelStation>>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub load_providers: Vec<Relation<LoadProvider>>,
}
