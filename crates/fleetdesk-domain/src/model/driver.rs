//! Driver records

use serde::{Deserialize, Serialize};

use super::relation::{nullable_vec, Relation};
use super::Trip;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub emergency_contact: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Aadhaar identity number
    #[serde(default)]
    pub aadhar_number: Option<String>,
    #[serde(default)]
    pub pan_number: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub trips: Vec<Relation<Trip>>,
}
