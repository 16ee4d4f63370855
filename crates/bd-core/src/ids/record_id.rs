use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::id_macro::impl_id;

/// Identifier of a backend record.
///
/// Backends emit ids as JSON numbers (`"id": 7`) or strings (`"id": "7"`,
/// UUIDs); both forms deserialize into the same value so patch-by-id lookups
/// compare equal regardless of the wire representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl_id!(RecordId);

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Numeric ids go back out as numbers so request bodies match the backend's shape
        match self.0.parse::<i64>() {
            Ok(n) => serializer.serialize_i64(n),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Int(i64),
            Text(String),
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Int(n) => RecordId::from(n),
            Wire::Text(s) => RecordId(s),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_string_ids_compare_equal() {
        let from_number: RecordId = serde_json::from_str("7").unwrap();
        let from_string: RecordId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number, RecordId::from(7i64));
    }

    #[test]
    fn numeric_ids_serialize_as_numbers() {
        let id = RecordId::from(42i64);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");

        let uuid = RecordId::from("0191c6a4-6f1e-7d3b-9a1e-2b3c4d5e6f70");
        assert_eq!(
            serde_json::to_string(&uuid).unwrap(),
            "\"0191c6a4-6f1e-7d3b-9a1e-2b3c4d5e6f70\""
        );
    }
}
