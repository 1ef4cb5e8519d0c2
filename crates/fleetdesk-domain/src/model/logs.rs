//! Expense and maintenance logs tied to a vehicle

use serde::{Deserialize, Serialize};

use super::relation::{lenient_decimal, Relation};
use super::{FuelStation, Garage, Vehicle};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GarageLog {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub amount: Option<f64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub vehicle: Option<Relation<Box<Vehicle>>>,
    #[serde(default)]
    pub garage: Option<Relation<Garage>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelLog {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub litres: Option<f64>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub odometer: Option<f64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub vehicle: Option<Relation<Box<Vehicle>>>,
    #[serde(default)]
    pub fuel_station: Option<Relation<FuelStation>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TollLog {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub toll_plaza_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub amount: Option<f64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub vehicle: Option<Relation<Box<Vehicle>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TyreLog {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub tyre_number: Option<String>,
    /// Wheel position, e.g. "front-left"
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub amount: Option<f64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub vehicle: Option<Relation<Box<Vehicle>>>,
}
