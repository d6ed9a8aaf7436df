//! Grouping algorithms: reshape a chronologically unordered sequence of raw
//! measurements into a [`Dataset`].

use crate::dataset::Dataset;
use crate::types::Measurement;

/// Groups records by their own fixed attributes.
///
/// Every record contributes each of its named attribute values to the column
/// of that name at the record's timestamp (e.g. vaccination records fan out
/// into `"partial"`, `"full"`, `"booster"` columns). Records sharing a
/// timestamp sum into the same row; records with an unset timestamp are
/// skipped. Output is deterministic regardless of input order because row and
/// column listings are sorted.
pub fn group_by_attributes<M: Measurement>(records: &[M]) -> Dataset {
    let mut dataset = Dataset::new();
    for record in records {
        let timestamp = record.timestamp();
        if timestamp == 0 {
            continue;
        }
        let names = record.attribute_names();
        let values = record.attribute_values();
        for (name, value) in names.iter().zip(values) {
            dataset.add(timestamp, name, value);
        }
    }
    dataset
}

/// Groups records by the value of a runtime-selected field.
///
/// Every record contributes its total value to the column named by its
/// `field` value, producing one column per distinct field value observed
/// (e.g. one column per region). Rows are the sum of all records sharing a
/// timestamp and field value; records with an unset timestamp are skipped.
pub fn group_by_field<M: Measurement>(records: &[M], field: &str) -> Dataset {
    let mut dataset = Dataset::new();
    for record in records {
        let timestamp = record.timestamp();
        if timestamp == 0 {
            continue;
        }
        dataset.add(timestamp, &record.group_field_value(field), record.total_value());
    }
    dataset
}
