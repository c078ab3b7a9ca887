//
//  moysklad-cli
//  api/model/field.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Three-state optional attribute.
//!
//! MoySklad distinguishes an attribute that is not sent at all (left
//! untouched on update) from one that is sent as `null` (cleared). A plain
//! `Option<T>` cannot express both, so every optional entity attribute is a
//! [`Field<T>`]:
//!
//! | State | JSON on the wire |
//! |-------|------------------|
//! | `Field::Absent` | key omitted |
//! | `Field::Null` | `"key": null` |
//! | `Field::Value(v)` | `"key": v` |
//!
//! Struct fields must be declared with
//! `#[serde(default, skip_serializing_if = "Field::is_absent")]` for the
//! absent state to survive a round trip.
//!
//! ```rust
//! use moysklad::api::model::Field;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Default)]
//! struct Patch {
//!     #[serde(default, skip_serializing_if = "Field::is_absent")]
//!     code: Field<String>,
//!     #[serde(default, skip_serializing_if = "Field::is_absent")]
//!     description: Field<String>,
//! }
//!
//! let patch = Patch { code: Field::Null, ..Default::default() };
//! assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"code":null}"#);
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An attribute that may be absent, explicitly null, or set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Field<T> {
    /// Not present in the payload.
    Absent,
    /// Present with an explicit `null`.
    Null,
    /// Present with a value.
    Value(T),
}

impl<T> Field<T> {
    /// Returns `true` if the attribute is not present.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns `true` if the attribute is an explicit `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the attribute holds a value.
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Borrows the value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Mutably borrows the value, if any.
    pub fn value_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Converts into an `Option`, merging absent and null.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Stores a value.
    pub fn set(&mut self, value: T) {
        *self = Self::Value(value);
    }

    /// Marks the attribute as explicitly null.
    pub fn clear(&mut self) {
        *self = Self::Null;
    }

    /// Converts `&Field<T>` to `Field<&T>`.
    pub fn as_ref(&self) -> Field<&T> {
        match self {
            Self::Absent => Field::Absent,
            Self::Null => Field::Null,
            Self::Value(v) => Field::Value(v),
        }
    }

    /// Maps the contained value, preserving absent and null.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Field<U> {
        match self {
            Self::Absent => Field::Absent,
            Self::Null => Field::Null,
            Self::Value(v) => Field::Value(f(v)),
        }
    }
}

// Written out so that `T` needs no `Default` bound.
impl<T> Default for Field<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Only reached when the containing struct forgot `skip_serializing_if`.
            Self::Absent | Self::Null => serializer.serialize_none(),
            Self::Value(v) => serializer.serialize_some(v),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Self::Value(v),
            None => Self::Null,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Default, Serialize, Deserialize)]
    struct Sample {
        #[serde(default, skip_serializing_if = "Field::is_absent")]
        name: Field<String>,
        #[serde(default, skip_serializing_if = "Field::is_absent")]
        archived: Field<bool>,
        #[serde(default, skip_serializing_if = "Field::is_absent")]
        price: Field<f64>,
    }

    #[test]
    fn test_absent_is_omitted() {
        let sample = Sample::default();
        assert_eq!(serde_json::to_string(&sample).unwrap(), "{}");
    }

    #[test]
    fn test_zero_values_are_emitted() {
        let sample = Sample {
            name: Field::Value(String::new()),
            archived: Field::Value(false),
            price: Field::Value(0.0),
        };
        assert_eq!(
            serde_json::to_string(&sample).unwrap(),
            r#"{"name":"","archived":false,"price":0.0}"#
        );
    }

    #[test]
    fn test_null_is_emitted() {
        let sample = Sample {
            archived: Field::Null,
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&sample).unwrap(), r#"{"archived":null}"#);
    }

    #[test]
    fn test_decode_distinguishes_all_states() {
        let sample: Sample = serde_json::from_str(r#"{"name":null,"archived":true}"#).unwrap();
        assert_eq!(sample.name, Field::Null);
        assert_eq!(sample.archived, Field::Value(true));
        assert_eq!(sample.price, Field::Absent);
    }

    #[test]
    fn test_presence_survives_round_trip() {
        let original = Sample {
            name: Field::Value("Widget".into()),
            archived: Field::Null,
            price: Field::Absent,
        };
        let json = serde_json::to_string(&original).unwrap();
        let decoded: Sample = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_helpers() {
        let mut field: Field<u32> = Field::Absent;
        assert!(field.is_absent());
        field.set(3);
        assert_eq!(field.value(), Some(&3));
        assert_eq!(field.clone().map(|v| v * 2), Field::Value(6));
        field.clear();
        assert!(field.is_null());
        assert_eq!(field.into_option(), None);
    }
}
