//
//  moysklad-cli
//  api/model/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Entity Model
//!
//! Data-transfer types mirroring MoySklad JSON resources.
//!
//! ## Conventions
//!
//! - Every attribute is a [`Field<T>`]: absent, explicit `null`, or a value.
//!   Unset attributes are omitted from outbound JSON.
//! - Every entity carries a [`Meta`] header whose `type` names the entity's
//!   own kind ([`Entity::KIND`]).
//! - Attributes are changed through chaining setters: `set_<attr>` stores a
//!   value, `clear_<attr>` sends an explicit `null`.
//! - Reference attributes (a country inside an address, the owner of a
//!   product) hold only the referenced entity's metadata header. Their
//!   setters copy the header, never the full referenced entity.
//!
//! ## Example
//!
//! ```rust
//! use moysklad::api::model::{Entity, Product, Field};
//!
//! let mut product = Product::default();
//! product
//!     .set_name("Espresso beans 1kg")
//!     .set_article("ESP-1000")
//!     .clear_description();
//!
//! let json = serde_json::to_value(&product).unwrap();
//! assert_eq!(json["name"], "Espresso beans 1kg");
//! assert!(json["description"].is_null());
//! assert!(json.get("code").is_none());
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Declares an entity struct, its [`Entity`] impl and its chaining setters.
///
/// `fields` are plain attributes; `refs` are references to other entities,
/// boxed so that self-referencing kinds (an employee owned by an employee)
/// have a finite size.
macro_rules! entity {
    (
        $(#[$doc:meta])*
        pub struct $name:ident($kind:ident) {
            fields {
                $(
                    $(#[$fdoc:meta])*
                    $field:ident : $fty:ty => $set:ident / $clear:ident,
                )*
            }
            refs {
                $(
                    $(#[$rdoc:meta])*
                    $rfield:ident : $rty:ty => $rset:ident / $rclear:ident,
                )*
            }
        }
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            /// Metadata header; names this entity's kind and location.
            #[serde(default, skip_serializing_if = "Field::is_absent")]
            pub meta: Field<Meta>,

            /// Resource id (UUID).
            #[serde(default, skip_serializing_if = "Field::is_absent")]
            pub id: Field<String>,

            /// Id of the account owning the resource.
            #[serde(default, skip_serializing_if = "Field::is_absent")]
            pub account_id: Field<String>,

            $(
                $(#[$fdoc])*
                #[serde(default, skip_serializing_if = "Field::is_absent")]
                pub $field: Field<$fty>,
            )*

            $(
                $(#[$rdoc])*
                #[serde(default, skip_serializing_if = "Field::is_absent")]
                pub $rfield: Field<Box<$rty>>,
            )*
        }

        impl $crate::api::model::Entity for $name {
            const KIND: $crate::api::model::MetaType = $crate::api::model::MetaType::$kind;

            fn meta(&self) -> Option<&Meta> {
                self.meta.value()
            }

            fn from_meta(meta: Meta) -> Self {
                Self {
                    meta: Field::Value(meta),
                    ..Default::default()
                }
            }
        }

        impl $name {
            $(
                #[doc = concat!("Sets `", stringify!($field), "`.")]
                pub fn $set(&mut self, value: impl Into<$fty>) -> &mut Self {
                    self.$field = Field::Value(value.into());
                    self
                }

                #[doc = concat!("Sends `", stringify!($field), "` as an explicit `null`.")]
                pub fn $clear(&mut self) -> &mut Self {
                    self.$field = Field::Null;
                    self
                }
            )*

            $(
                #[doc = concat!(
                    "Points `", stringify!($rfield),
                    "` at `value`, copying only its metadata header."
                )]
                pub fn $rset(&mut self, value: &$rty) -> &mut Self {
                    use $crate::api::model::Entity as _;
                    self.$rfield = match value.to_reference() {
                        Some(reference) => Field::Value(Box::new(reference)),
                        None => Field::Absent,
                    };
                    self
                }

                #[doc = concat!("Sends `", stringify!($rfield), "` as an explicit `null`.")]
                pub fn $rclear(&mut self) -> &mut Self {
                    self.$rfield = Field::Null;
                    self
                }
            )*
        }
    };
}

mod agent;
mod context;
mod directory;
mod envelope;
mod field;
mod meta;
mod product;
mod retail;
mod store;
mod task;

pub use agent::*;
pub use context::*;
pub use directory::*;
pub use envelope::*;
pub use field::*;
pub use meta::*;
pub use product::*;
pub use retail::*;
pub use store::*;
pub use task::*;

/// A MoySklad resource kind with its own metadata header.
///
/// Implemented by every entity struct; the request layer uses it to derive
/// collection paths and the envelope uses it to gate casts.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The `meta.type` value of this kind.
    const KIND: MetaType;

    /// Collection path relative to the API root, e.g. `entity/product`.
    ///
    /// Kinds that only exist below a parent (store zones, slots) are reached
    /// through dedicated client constructors instead.
    fn path() -> String {
        format!("entity/{}", Self::KIND.as_str())
    }

    /// Returns the metadata header, if populated.
    fn meta(&self) -> Option<&Meta>;

    /// Builds an otherwise empty entity carrying only `meta`.
    fn from_meta(meta: Meta) -> Self;

    /// Returns a header-only copy suitable for embedding as a reference.
    fn to_reference(&self) -> Option<Self>
    where
        Self: Sized,
    {
        self.meta().cloned().map(Self::from_meta)
    }

    /// Returns `false` if the header names a kind other than [`Self::KIND`].
    fn has_own_kind(&self) -> bool {
        self.meta().map_or(true, |m| m.kind == Self::KIND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn country_meta() -> Meta {
        Meta::new(
            MetaType::Country,
            Url::parse("https://api.moysklad.ru/api/remap/1.2/entity/country/9df7c2c3-7782-4c5c-a8ed-1102af611608")
                .unwrap(),
        )
    }

    #[test]
    fn test_default_path() {
        assert_eq!(Product::path(), "entity/product");
        assert_eq!(RetailDrawerCashIn::path(), "entity/retaildrawercashin");
    }

    #[test]
    fn test_reference_copies_only_meta() {
        let mut country = Country::from_meta(country_meta());
        country.set_name("Россия").set_code("643");

        let reference = country.to_reference().unwrap();
        assert_eq!(reference.meta(), Some(&country_meta()));
        assert!(reference.name.is_absent());
        assert!(reference.code.is_absent());
    }

    #[test]
    fn test_reference_without_meta_is_none() {
        let mut country = Country::default();
        country.set_name("Nowhere");
        assert!(country.to_reference().is_none());
    }

    #[test]
    fn test_has_own_kind() {
        assert!(Country::default().has_own_kind());
        assert!(Country::from_meta(country_meta()).has_own_kind());
        assert!(!Currency::from_meta(country_meta()).has_own_kind());
    }
}
