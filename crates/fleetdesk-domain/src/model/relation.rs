//! Relation fields that arrive either as bare ids or as populated records,
//! plus the lenient field decoders the models share

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Identifier of a record: numeric primary key or document id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Numeric(i64),
    Document(String),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Numeric(id) => write!(f, "{}", id),
            RecordId::Document(id) => write!(f, "{}", id),
        }
    }
}

/// A related record. Unpopulated relations only carry the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Relation<T> {
    Id(RecordId),
    Populated(T),
}

impl<T> Relation<T> {
    /// The populated record, if the backend inlined it
    pub fn populated(&self) -> Option<&T> {
        match self {
            Relation::Populated(record) => Some(record),
            Relation::Id(_) => None,
        }
    }
}

/// Accept `null` where a list is expected
pub(crate) fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept a number or a numeric string, as decimal columns may arrive.
/// Any other value decodes as `None`.
pub(crate) fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Trip;

    #[test]
    fn test_numeric_and_document_ids() {
        let rels: Vec<Relation<Trip>> =
            serde_json::from_str(r#"[12, "k3j2h1", {"tripNumber": "T-1"}]"#).unwrap();
        assert_eq!(rels[0], Relation::Id(RecordId::Numeric(12)));
        assert_eq!(rels[1], Relation::Id(RecordId::Document("k3j2h1".to_string())));
        let trip = rels[2].populated().unwrap();
        assert_eq!(trip.trip_number.as_deref(), Some("T-1"));
    }

    #[test]
    fn test_record_id_display() {
        assert_eq!(RecordId::Numeric(4).to_string(), "4");
        assert_eq!(RecordId::Document("abc".to_string()).to_string(), "abc");
    }

    #[test]
    fn test_decimals_accept_numeric_strings() {
        use crate::model::{FuelLog, Vehicle};

        let vehicle: Vehicle =
            serde_json::from_str(r#"{"vehicleNumber": "MH12", "capacity": "12.50"}"#).unwrap();
        assert_eq!(vehicle.capacity, Some(12.5));

        let log: FuelLog =
            serde_json::from_str(r#"{"litres": 40, "amount": "n/a", "odometer": null}"#).unwrap();
        assert_eq!(log.litres, Some(40.0));
        assert_eq!(log.amount, None);
        assert_eq!(log.odometer, None);
    }
}
