//! BSON encoding that matches what the driver writes for `insert_one`.
//!
//! The driver serializes documents with bson's raw serializer, which is not
//! human-readable, so a `uuid::Uuid` lands as Binary. `bson::to_document` and
//! `bson::to_bson` are human-readable and would store the same `Uuid` as a
//! String. Anything built by hand (`$setOnInsert` bodies, `_id` filters) goes
//! through these helpers so one field never has two stored types.

use mongodb::bson::{self, Bson, Document, SerializerOptions};
use serde::Serialize;

fn stored_options() -> SerializerOptions {
    SerializerOptions::builder().human_readable(false).build()
}

/// Encode `value` as a document shaped like an inserted one.
pub fn to_stored_document<T: Serialize + ?Sized>(value: &T) -> bson::ser::Result<Document> {
    bson::to_document_with_options(value, stored_options())
}

/// Encode a single value, e.g. a `Uuid` filter, the way it is stored.
pub fn to_stored_bson<T: Serialize + ?Sized>(value: &T) -> bson::ser::Result<Bson> {
    bson::to_bson_with_options(value, stored_options())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::spec::BinarySubtype;
    use serde::Deserialize;
    use uuid::Uuid;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        #[serde(rename = "_id")]
        id: Uuid,
        owner: Option<Uuid>,
        label: String,
    }

    fn row() -> Row {
        Row {
            id: Uuid::now_v7(),
            owner: Some(Uuid::now_v7()),
            label: "oats".to_string(),
        }
    }

    #[test]
    fn test_uuid_is_stored_as_binary() {
        let id = Uuid::now_v7();
        match to_stored_bson(&id).unwrap() {
            Bson::Binary(binary) => {
                assert_eq!(binary.subtype, BinarySubtype::Generic);
                assert_eq!(binary.bytes, id.as_bytes().to_vec());
            }
            other => panic!("expected binary, got {other:?}"),
        }
    }

    #[test]
    fn test_document_matches_driver_insert_encoding() {
        let row = row();
        let inserted: Document = bson::from_slice(&bson::to_vec(&row).unwrap()).unwrap();

        assert_eq!(to_stored_document(&row).unwrap(), inserted);
    }

    #[test]
    fn test_stored_document_reads_back() {
        let row = row();
        let mut bytes = Vec::new();
        to_stored_document(&row).unwrap().to_writer(&mut bytes).unwrap();

        let decoded: Row = bson::from_slice(&bytes).unwrap();
        assert_eq!(decoded, row);
    }
}
