use serde::de::DeserializeOwned;
use serde_json::Value;

use super::probe::Envelope;
use crate::error::ListQueryError;

/// Decode a singular record from `{ data: {...} }` or a bare object.
pub fn extract_record<T: DeserializeOwned>(raw: &Value) -> Result<T, ListQueryError> {
    let envelope = Envelope::open(raw);
    T::deserialize(envelope.body).map_err(|e| ListQueryError::decode("record", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Group {
        id: u64,
        name: String,
    }

    #[test]
    fn unwraps_data_envelope() {
        let raw = json!({ "success": true, "message": "Saved", "data": { "id": 3, "name": "Cash" } });
        let group: Group = extract_record(&raw).unwrap();
        assert_eq!(group, Group { id: 3, name: "Cash".to_string() });
    }

    #[test]
    fn accepts_bare_record() {
        let group: Group = extract_record(&json!({ "id": 4, "name": "Bank" })).unwrap();
        assert_eq!(group.id, 4);
    }

    #[test]
    fn reports_decode_failures() {
        let err = extract_record::<Group>(&json!({ "data": { "id": "x" } })).unwrap_err();
        assert!(matches!(err, ListQueryError::Decode { ref what, .. } if what == "record"));
    }
}
