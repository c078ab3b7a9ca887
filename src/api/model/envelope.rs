//
//  moysklad-cli
//  api/model/envelope.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Polymorphic retail operation envelope.
//!
//! A retail shift lists its documents as one array mixing sales, returns and
//! cash drawer movements. [`RetailOperation`] decodes only the `meta` header
//! of each element and keeps the rest as raw JSON; the typed document is
//! decoded on demand once the caller has looked at [`RetailOperation::kind`].
//!
//! Envelopes must be decoded from JSON text or bytes (`serde_json::from_str`,
//! `serde_json::from_slice`), not from an already parsed `serde_json::Value`.
//!
//! # Example
//!
//! ```rust
//! use moysklad::api::model::{MetaType, RetailOperation};
//!
//! let json = r#"{
//!     "meta": {"href": "https://api.moysklad.ru/api/remap/1.2/entity/retaildemand/d1", "type": "retaildemand"},
//!     "sum": 15000.0
//! }"#;
//!
//! let operation: RetailOperation = serde_json::from_str(json).unwrap();
//! assert_eq!(operation.kind(), MetaType::RetailDemand);
//! assert!(operation.as_retail_demand().unwrap().is_some());
//! assert!(operation.as_retail_sales_return().unwrap().is_none());
//! ```

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;

use super::{
    Entity, Meta, MetaType, RetailDemand, RetailDrawerCashIn, RetailDrawerCashOut,
    RetailSalesReturn, RetailShift, UnknownMetaType,
};

/// A document of not-yet-inspected kind, produced during a retail shift.
///
/// The header is validated when the envelope is decoded: a missing `meta`,
/// a missing or malformed `href`, or an unknown `type` fails decoding. The
/// payload is kept byte for byte and never mutated.
///
/// Envelopes deliberately do not implement `PartialEq`; compare
/// [`meta`](Self::meta) or [`raw`](Self::raw) instead.
#[derive(Debug, Clone)]
pub struct RetailOperation {
    meta: Meta,
    raw: Box<RawValue>,
}

#[derive(Deserialize)]
struct Header {
    meta: Meta,
}

impl RetailOperation {
    /// Decodes an envelope from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Kind named by the header.
    pub fn kind(&self) -> MetaType {
        self.meta.kind.clone()
    }

    /// The metadata header.
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// The payload exactly as received.
    pub fn raw(&self) -> &[u8] {
        self.raw.get().as_bytes()
    }

    /// The payload exactly as received, as text.
    pub fn raw_str(&self) -> &str {
        self.raw.get()
    }

    /// Decodes the payload as `E` when the header kind is `E::KIND`.
    ///
    /// Returns `Ok(None)` on a kind mismatch. A matching kind whose payload
    /// does not decode as `E` is an error.
    pub fn cast<E: Entity>(&self) -> Result<Option<E>, serde_json::Error> {
        if self.meta.kind != E::KIND {
            return Ok(None);
        }
        serde_json::from_str(self.raw.get()).map(Some)
    }

    /// The payload as a retail sale.
    pub fn as_retail_demand(&self) -> Result<Option<RetailDemand>, serde_json::Error> {
        self.cast()
    }

    /// The payload as a retail return.
    pub fn as_retail_sales_return(&self) -> Result<Option<RetailSalesReturn>, serde_json::Error> {
        self.cast()
    }

    /// The payload as a cash deposit.
    pub fn as_retail_drawer_cash_in(
        &self,
    ) -> Result<Option<RetailDrawerCashIn>, serde_json::Error> {
        self.cast()
    }

    /// The payload as a cash withdrawal.
    pub fn as_retail_drawer_cash_out(
        &self,
    ) -> Result<Option<RetailDrawerCashOut>, serde_json::Error> {
        self.cast()
    }

    /// The payload as a retail shift.
    pub fn as_retail_shift(&self) -> Result<Option<RetailShift>, serde_json::Error> {
        self.cast()
    }
}

impl<'de> Deserialize<'de> for RetailOperation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        let header: Header = serde_json::from_str(raw.get()).map_err(D::Error::custom)?;
        if let MetaType::Unknown(name) = &header.meta.kind {
            return Err(D::Error::custom(UnknownMetaType(name.clone())));
        }
        Ok(Self {
            meta: header.meta,
            raw,
        })
    }
}

impl Serialize for RetailOperation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::model::Field;

    const CASH_IN: &str = r#"{"meta":{"href":"https://api.moysklad.ru/api/remap/1.2/entity/retaildrawercashin/c1","type":"retaildrawercashin"},"sum":50000.0,"description":"float"}"#;

    #[test]
    fn test_only_matching_accessor_yields_value() {
        let op: RetailOperation = serde_json::from_str(CASH_IN).unwrap();
        assert_eq!(op.kind(), MetaType::RetailDrawerCashIn);

        let cash_in = op.as_retail_drawer_cash_in().unwrap().unwrap();
        assert_eq!(cash_in.sum, Field::Value(50000.0));

        assert!(op.as_retail_demand().unwrap().is_none());
        assert!(op.as_retail_sales_return().unwrap().is_none());
        assert!(op.as_retail_drawer_cash_out().unwrap().is_none());
        assert!(op.as_retail_shift().unwrap().is_none());
    }

    #[test]
    fn test_raw_is_verbatim() {
        let op = RetailOperation::from_slice(CASH_IN.as_bytes()).unwrap();
        assert_eq!(op.raw(), CASH_IN.as_bytes());
        assert_eq!(serde_json::to_string(&op).unwrap(), CASH_IN);
    }

    #[test]
    fn test_malformed_header_fails() {
        let missing_meta = r#"{"sum": 1}"#;
        let bad_href = r#"{"meta": {"href": "not a url", "type": "retaildemand"}}"#;
        let unknown_type = r#"{"meta": {"href": "https://h/x", "type": "spaceship"}}"#;
        let missing_type = r#"{"meta": {"href": "https://h/x"}}"#;

        for json in [missing_meta, bad_href, unknown_type, missing_type] {
            assert!(serde_json::from_str::<RetailOperation>(json).is_err(), "{json}");
        }
    }

    #[test]
    fn test_unknown_header_kind_names_the_kind() {
        let json = r#"{"meta": {"href": "https://h/entity/supplyposition/1", "type": "supplyposition"}}"#;
        let err = serde_json::from_str::<RetailOperation>(json).unwrap_err();
        assert!(err.to_string().contains("unknown entity type 'supplyposition'"));
    }

    #[test]
    fn test_demand_with_position_collection_casts() {
        let json = r#"{
            "meta": {"href": "https://api.moysklad.ru/api/remap/1.2/entity/retaildemand/d1", "type": "retaildemand"},
            "sum": 30000.0,
            "positions": {
                "meta": {
                    "href": "https://api.moysklad.ru/api/remap/1.2/entity/retaildemand/d1/positions",
                    "type": "retaildemandposition",
                    "size": 2
                }
            }
        }"#;
        let op: RetailOperation = serde_json::from_str(json).unwrap();
        let demand = op.as_retail_demand().unwrap().unwrap();
        assert_eq!(demand.sum, Field::Value(30000.0));
        assert!(demand.positions.is_set());
    }

    #[test]
    fn test_matching_kind_with_bad_payload_is_error() {
        let json = r#"{"meta":{"href":"https://h/entity/retaildemand/d1","type":"retaildemand"},"sum":"lots"}"#;
        let op: RetailOperation = serde_json::from_str(json).unwrap();
        assert!(op.as_retail_demand().is_err());
        assert!(op.as_retail_shift().unwrap().is_none());
    }

    #[test]
    fn test_shift_operations_keep_mixed_kinds() {
        let json = format!(
            r#"{{
                "meta": {{"href": "https://api.moysklad.ru/api/remap/1.2/entity/retailshift/s1", "type": "retailshift"}},
                "operations": [
                    {CASH_IN},
                    {{"meta": {{"href": "https://api.moysklad.ru/api/remap/1.2/entity/retaildemand/d1", "type": "retaildemand"}}}}
                ]
            }}"#
        );
        let shift: RetailShift = serde_json::from_str(&json).unwrap();
        let kinds: Vec<MetaType> = shift
            .operations
            .value()
            .unwrap()
            .iter()
            .map(RetailOperation::kind)
            .collect();
        assert_eq!(kinds, vec![MetaType::RetailDrawerCashIn, MetaType::RetailDemand]);
    }
}
