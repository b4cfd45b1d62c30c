//! Best-effort typing of report objects.
//!
//! Every object record types the keys it knows about and keeps the rest in
//! its `extra` map. A known key whose value doesn't fit its field (a string
//! `pid`, an explicit `null`) is kept in `extra` too, verbatim, instead of
//! failing the whole report. Serializing a record therefore always yields
//! the object it was decoded from.

use serde_json::{Map, Value};
use tracing::debug;

/// An object record with a flattened `extra` map.
///
/// Implemented through [`lenient_records!`], which also gives the record a
/// `Deserialize` impl going through [`from_map`].
pub(crate) trait Record: Default {
    /// Type `fields` with the derived impl, failing on the first mistyped key.
    fn strict(fields: &Value) -> Result<Self, serde_json::Error>;

    fn extra_mut(&mut self) -> &mut Map<String, Value>;
}

/// Implements `Serialize`, `Deserialize` and [`Record`] for records that
/// derive their serde impls with `#[serde(remote = "Self")]`.
///
/// `@deserialize` skips `Serialize`, for records that serialize themselves.
macro_rules! lenient_records {
    ($($record:ident),* $(,)?) => {$(
        impl serde::Serialize for $record {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                $record::serialize(self, serializer)
            }
        }

        lenient_records!(@deserialize $record);
    )*};
    (@deserialize $record:ident) => {
        impl<'de> serde::Deserialize<'de> for $record {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let fields =
                    <serde_json::Map<String, serde_json::Value> as serde::Deserialize>::deserialize(
                        deserializer,
                    )?;
                Ok($crate::lenient::from_map(fields))
            }
        }

        impl $crate::lenient::Record for $record {
            fn strict(fields: &serde_json::Value) -> Result<Self, serde_json::Error> {
                $record::deserialize(fields)
            }

            fn extra_mut(&mut self) -> &mut serde_json::Map<String, serde_json::Value> {
                &mut self.extra
            }
        }
    };
}

pub(crate) use lenient_records;

/// Type `fields` as a `T`. Never fails: whatever doesn't fit goes to `extra`.
pub(crate) fn from_map<T: Record>(fields: Map<String, Value>) -> T {
    // A typed field would turn an explicit null into an absent key.
    let (mut untyped, fields): (Map<String, Value>, Map<String, Value>) = fields
        .into_iter()
        .partition(|(key, value)| value.is_null() && is_field::<T>(key));

    let fields = Value::Object(fields);
    let mut record = match T::strict(&fields) {
        Ok(record) => record,
        Err(err) => {
            debug!(
                "{}: {err}, keeping mistyped keys as-is",
                std::any::type_name::<T>()
            );
            field_by_field(fields, &mut untyped)
        }
    };
    record.extra_mut().extend(untyped);
    record
}

/// Type each key of `fields` on its own, moving the ones that don't fit to
/// `untyped`.
fn field_by_field<T: Record>(fields: Value, untyped: &mut Map<String, Value>) -> T {
    let Value::Object(fields) = fields else {
        return T::default();
    };
    let (typed, mistyped): (Map<String, Value>, Map<String, Value>) = fields
        .into_iter()
        .partition(|(key, value)| fits::<T>(key, value.clone()));
    untyped.extend(mistyped);

    // Fields are typed independently, so keys that fit alone fit together.
    let typed = Value::Object(typed);
    match T::strict(&typed) {
        Ok(record) => record,
        Err(err) => {
            debug!("{}: {err}, keeping all keys as-is", std::any::type_name::<T>());
            if let Value::Object(typed) = typed {
                untyped.extend(typed);
            }
            T::default()
        }
    }
}

fn single<T: Record>(key: &str, value: Value) -> Result<T, serde_json::Error> {
    let mut fields = Map::new();
    fields.insert(key.to_owned(), value);
    T::strict(&Value::Object(fields))
}

/// Whether `value` types cleanly as `key` of a `T`.
fn fits<T: Record>(key: &str, value: Value) -> bool {
    single::<T>(key, value).is_ok()
}

/// Whether `key` is a typed field of `T`, rather than something `extra` picks up.
fn is_field<T: Record>(key: &str) -> bool {
    match single::<T>(key, Value::Null) {
        Ok(mut record) => !record.extra_mut().contains_key(key),
        Err(_) => true,
    }
}
