//
//  moysklad-cli
//  api/model/meta.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Metadata headers.
//!
//! Every MoySklad resource carries a `meta` object naming its kind (`type`)
//! and canonical location (`href`). References between entities are just
//! this header wrapped in `{"meta": ...}`, and polymorphic payloads are
//! dispatched on `meta.type`.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::Url;

/// Metadata header of a resource or collection.
///
/// `href` and `type` are mandatory; decoding fails without them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// Canonical URL of the resource.
    pub href: Url,

    /// Kind discriminator.
    #[serde(rename = "type")]
    pub kind: MetaType,

    /// URL of the kind's metadata (custom attributes, states).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_href: Option<String>,

    /// Media type of the resource, normally `application/json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    /// Web UI link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid_href: Option<String>,

    /// Download link, for files and images.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_href: Option<String>,

    /// Collection size, on list metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Page limit, on list metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,

    /// Page offset, on list metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,

    /// Next page link, on list metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_href: Option<String>,

    /// Previous page link, on list metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_href: Option<String>,
}

impl Meta {
    /// Builds a minimal header for a resource of `kind` at `href`.
    pub fn new(kind: MetaType, href: Url) -> Self {
        Self {
            href,
            kind,
            metadata_href: None,
            media_type: Some("application/json".to_string()),
            uuid_href: None,
            download_href: None,
            size: None,
            limit: None,
            offset: None,
            next_href: None,
            previous_href: None,
        }
    }

    /// Returns the trailing path segment of `href`, which is the resource id.
    pub fn id(&self) -> Option<&str> {
        self.href
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|s| !s.is_empty())
    }
}

/// A bare `{"meta": ...}` reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaWrapper {
    /// The referenced resource's header.
    pub meta: Meta,
}

impl From<Meta> for MetaWrapper {
    fn from(meta: Meta) -> Self {
        Self { meta }
    }
}

macro_rules! meta_types {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Resource kinds.
        ///
        /// Nested headers may name kinds this client has no variant for
        /// (position collections, rarely used documents); those decode as
        /// [`MetaType::Unknown`]. Parsing with [`FromStr`] accepts known
        /// kinds only.
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum MetaType {
            $(
                #[doc = concat!("`", $name, "`")]
                $variant,
            )*
            /// A kind name this client does not know, kept verbatim.
            Unknown(String),
        }

        impl MetaType {
            /// Every known kind.
            pub const ALL: &'static [MetaType] = &[$(MetaType::$variant),*];

            /// Returns the wire name of the kind.
            pub fn as_str(&self) -> &str {
                match self {
                    $(MetaType::$variant => $name,)*
                    MetaType::Unknown(name) => name,
                }
            }

            /// Maps a wire name to its kind, keeping unknown names.
            pub fn from_name(name: &str) -> Self {
                match name {
                    $($name => MetaType::$variant,)*
                    other => MetaType::Unknown(other.to_string()),
                }
            }
        }
    };
}

meta_types! {
    Assortment => "assortment",
    Attributemetadata => "attributemetadata",
    Bundle => "bundle",
    CashIn => "cashin",
    CashOut => "cashout",
    Consignment => "consignment",
    Counterparty => "counterparty",
    Country => "country",
    Currency => "currency",
    CustomEntity => "customentity",
    CustomerOrder => "customerorder",
    Demand => "demand",
    Enter => "enter",
    Employee => "employee",
    Group => "group",
    Image => "image",
    Inventory => "inventory",
    InvoiceIn => "invoicein",
    InvoiceOut => "invoiceout",
    Loss => "loss",
    Move => "move",
    Organization => "organization",
    PaymentIn => "paymentin",
    PaymentOut => "paymentout",
    PriceType => "pricetype",
    Product => "product",
    ProductFolder => "productfolder",
    Project => "project",
    PurchaseOrder => "purchaseorder",
    PurchaseReturn => "purchasereturn",
    Region => "region",
    RetailDemand => "retaildemand",
    RetailDemandPosition => "retaildemandposition",
    RetailDrawerCashIn => "retaildrawercashin",
    RetailDrawerCashOut => "retaildrawercashout",
    RetailSalesReturn => "retailsalesreturn",
    RetailSalesReturnPosition => "retailsalesreturnposition",
    RetailShift => "retailshift",
    RetailStore => "retailstore",
    SalesReturn => "salesreturn",
    Service => "service",
    Slot => "slot",
    State => "state",
    Store => "store",
    Supply => "supply",
    StoreZone => "storezone",
    Task => "task",
    TaskNote => "tasknote",
    Uom => "uom",
    Variant => "variant",
}

/// Error returned when a `type` string names no known kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entity type '{0}'")]
pub struct UnknownMetaType(pub String);

impl MetaType {
    /// Returns `false` for [`MetaType::Unknown`].
    pub fn is_known(&self) -> bool {
        !matches!(self, MetaType::Unknown(_))
    }
}

impl FromStr for MetaType {
    type Err = UnknownMetaType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match MetaType::from_name(s) {
            MetaType::Unknown(name) => Err(UnknownMetaType(name)),
            kind => Ok(kind),
        }
    }
}

impl fmt::Display for MetaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MetaType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MetaType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(MetaType::from_name(&name))
    }
}

/// A MoySklad timestamp, `YYYY-MM-DD HH:MM:SS[.fff]` in the account time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Moment(pub NaiveDateTime);

impl Moment {
    /// Wire format used when serializing.
    pub const FORMAT: &'static str = "%Y-%m-%d %H:%M:%S%.3f";

    /// Parses either the millisecond or the second precision form.
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").map(Self)
    }
}

impl From<NaiveDateTime> for Moment {
    fn from(value: NaiveDateTime) -> Self {
        Self(value)
    }
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl Serialize for Moment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Moment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Moment::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_decodes_and_extracts_id() {
        let json = r#"{
            "href": "https://api.moysklad.ru/api/remap/1.2/entity/product/7944ef04-f831-11e5-7a69-971500188b19",
            "metadataHref": "https://api.moysklad.ru/api/remap/1.2/entity/product/metadata",
            "type": "product",
            "mediaType": "application/json"
        }"#;
        let meta: Meta = serde_json::from_str(json).unwrap();
        assert_eq!(meta.kind, MetaType::Product);
        assert_eq!(meta.id(), Some("7944ef04-f831-11e5-7a69-971500188b19"));
    }

    #[test]
    fn test_unknown_type_is_kept() {
        let json = r#"{"href": "https://api.moysklad.ru/api/remap/1.2/entity/x/1", "type": "spaceship"}"#;
        let meta = serde_json::from_str::<Meta>(json).unwrap();
        assert_eq!(meta.kind, MetaType::Unknown("spaceship".to_string()));
        assert!(!meta.kind.is_known());
        assert_eq!(serde_json::to_value(&meta).unwrap()["type"], "spaceship");
    }

    #[test]
    fn test_from_str_accepts_known_kinds_only() {
        assert_eq!("supply".parse::<MetaType>(), Ok(MetaType::Supply));
        assert_eq!(
            "spaceship".parse::<MetaType>(),
            Err(UnknownMetaType("spaceship".to_string()))
        );
    }

    #[test]
    fn test_missing_href_is_rejected() {
        assert!(serde_json::from_str::<Meta>(r#"{"type": "product"}"#).is_err());
    }

    #[test]
    fn test_meta_type_round_trip_names() {
        for kind in MetaType::ALL {
            assert_eq!(kind.as_str().parse::<MetaType>().unwrap(), *kind);
        }
        assert_eq!(MetaType::StoreZone.to_string(), "storezone");
    }

    #[test]
    fn test_moment_formats() {
        let moment = Moment::parse("2024-03-01 09:15:00").unwrap();
        assert_eq!(moment.to_string(), "2024-03-01 09:15:00.000");

        let precise: Moment = serde_json::from_str(r#""2024-03-01 09:15:00.250""#).unwrap();
        assert!(precise > moment);
        assert_eq!(
            serde_json::to_string(&precise).unwrap(),
            r#""2024-03-01 09:15:00.250""#
        );
    }
}
