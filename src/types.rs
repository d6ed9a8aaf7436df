use std::sync::Arc;

/// Timestamp type (nanoseconds since epoch). `0` means unset or unbounded,
/// depending on context.
pub type Timestamp = u64;

/// Value type.
pub type Value = f64;

/// One raw upstream record: a sample instant plus either a single total value
/// or several named attribute values, and optional group fields (e.g. region,
/// province, age group) used for column selection.
///
/// The HTTP clients that deserialize the upstream feeds implement this trait
/// on their response DTOs; the grouping algorithms consume it without knowing
/// the concrete record shape.
pub trait Measurement: Send + Sync {
    /// The sample instant. Records with a zero timestamp are skipped by the
    /// grouping algorithms.
    fn timestamp(&self) -> Timestamp;

    /// Value of the named group field (e.g. `"region"` -> `"Flanders"`).
    /// Unknown fields yield an empty string.
    fn group_field_value(&self, field: &str) -> String;

    /// The record's single aggregate value, used by field grouping.
    fn total_value(&self) -> Value;

    /// Names of the record's fixed attributes (e.g. `"partial"`, `"full"`,
    /// `"booster"`), parallel to [`Measurement::attribute_values`].
    fn attribute_names(&self) -> Vec<String>;

    /// Values parallel to [`Measurement::attribute_names`].
    fn attribute_values(&self) -> Vec<Value>;
}

impl<M: Measurement + ?Sized> Measurement for &M {
    fn timestamp(&self) -> Timestamp {
        (**self).timestamp()
    }
    fn group_field_value(&self, field: &str) -> String {
        (**self).group_field_value(field)
    }
    fn total_value(&self) -> Value {
        (**self).total_value()
    }
    fn attribute_names(&self) -> Vec<String> {
        (**self).attribute_names()
    }
    fn attribute_values(&self) -> Vec<Value> {
        (**self).attribute_values()
    }
}

impl<M: Measurement + ?Sized> Measurement for Box<M> {
    fn timestamp(&self) -> Timestamp {
        (**self).timestamp()
    }
    fn group_field_value(&self, field: &str) -> String {
        (**self).group_field_value(field)
    }
    fn total_value(&self) -> Value {
        (**self).total_value()
    }
    fn attribute_names(&self) -> Vec<String> {
        (**self).attribute_names()
    }
    fn attribute_values(&self) -> Vec<Value> {
        (**self).attribute_values()
    }
}

impl<M: Measurement + ?Sized> Measurement for Arc<M> {
    fn timestamp(&self) -> Timestamp {
        (**self).timestamp()
    }
    fn group_field_value(&self, field: &str) -> String {
        (**self).group_field_value(field)
    }
    fn total_value(&self) -> Value {
        (**self).total_value()
    }
    fn attribute_names(&self) -> Vec<String> {
        (**self).attribute_names()
    }
    fn attribute_values(&self) -> Vec<Value> {
        (**self).attribute_values()
    }
}
