//
//  moysklad-cli
//  api/model/directory.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Reference directories: countries, currencies, regions, units of measure,
//! employee groups, and the postal address value embedded in counterparties,
//! organizations and stores.

use serde::{Deserialize, Serialize};

use super::{Entity, Field, Meta, Moment};

entity! {
    /// A country from the system or account directory.
    pub struct Country(Country) {
        fields {
            /// Short name.
            name: String => set_name / clear_name,
            /// Free-form description.
            description: String => set_description / clear_description,
            /// ISO 3166 numeric code.
            code: String => set_code / clear_code,
            /// External system code.
            external_code: String => set_external_code / clear_external_code,
            /// Last update.
            updated: Moment => set_updated / clear_updated,
            /// Visible to all employees.
            shared: bool => set_shared / clear_shared,
        }
        refs {
            /// Owning employee.
            owner: super::Employee => set_owner / clear_owner,
            /// Owning department.
            group: Group => set_group / clear_group,
        }
    }
}

entity! {
    /// A currency the account trades in.
    pub struct Currency(Currency) {
        fields {
            /// Short name, e.g. `руб`.
            name: String => set_name / clear_name,
            /// Full name.
            full_name: String => set_full_name / clear_full_name,
            /// ISO 4217 numeric code.
            code: String => set_code / clear_code,
            /// ISO 4217 letter code.
            iso_code: String => set_iso_code / clear_iso_code,
            /// Rate relative to the accounting currency.
            rate: f64 => set_rate / clear_rate,
            /// Rate multiplier.
            multiplicity: i64 => set_multiplicity / clear_multiplicity,
            /// Rate is fetched automatically.
            indirect: bool => set_indirect / clear_indirect,
            /// Rate update policy (`auto` or `manual`).
            rate_update_type: String => set_rate_update_type / clear_rate_update_type,
            /// Accounting currency flag.
            default: bool => set_default / clear_default,
            /// Archived flag.
            archived: bool => set_archived / clear_archived,
            /// Created by the system.
            system: bool => set_system / clear_system,
        }
        refs {}
    }
}

entity! {
    /// A federal region, used in addresses.
    pub struct Region(Region) {
        fields {
            /// Region name.
            name: String => set_name / clear_name,
            /// Region code.
            code: String => set_code / clear_code,
            /// External system code.
            external_code: String => set_external_code / clear_external_code,
            /// Last update.
            updated: Moment => set_updated / clear_updated,
        }
        refs {}
    }
}

entity! {
    /// A unit of measure.
    pub struct Uom(Uom) {
        fields {
            /// Short name, e.g. `шт`.
            name: String => set_name / clear_name,
            /// Full name.
            description: String => set_description / clear_description,
            /// OKEI code.
            code: String => set_code / clear_code,
            /// External system code.
            external_code: String => set_external_code / clear_external_code,
            /// Last update.
            updated: Moment => set_updated / clear_updated,
        }
        refs {}
    }
}

entity! {
    /// A department (employee group).
    pub struct Group(Group) {
        fields {
            /// Department name.
            name: String => set_name / clear_name,
            /// Position in the department tree.
            index: i64 => set_index / clear_index,
        }
        refs {}
    }
}

/// A structured postal address.
///
/// Not an entity: it has no header of its own and is always embedded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Postal code.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub postal_code: Field<String>,

    /// Country reference.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub country: Field<Country>,

    /// Region reference.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub region: Field<Region>,

    /// City.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub city: Field<String>,

    /// Street.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub street: Field<String>,

    /// House.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub house: Field<String>,

    /// Apartment.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub apartment: Field<String>,

    /// Anything that does not fit the other parts.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub add_info: Field<String>,

    /// Comment.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub comment: Field<String>,
}

impl Address {
    /// Points the address at `country`, copying only its header.
    pub fn set_country(&mut self, country: &Country) -> &mut Self {
        self.country = match country.to_reference() {
            Some(reference) => Field::Value(reference),
            None => Field::Absent,
        };
        self
    }

    /// Points the address at `region`, copying only its header.
    pub fn set_region(&mut self, region: &Region) -> &mut Self {
        self.region = match region.to_reference() {
            Some(reference) => Field::Value(reference),
            None => Field::Absent,
        };
        self
    }

    pub fn set_postal_code(&mut self, value: impl Into<String>) -> &mut Self {
        self.postal_code = Field::Value(value.into());
        self
    }

    pub fn set_city(&mut self, value: impl Into<String>) -> &mut Self {
        self.city = Field::Value(value.into());
        self
    }

    pub fn set_street(&mut self, value: impl Into<String>) -> &mut Self {
        self.street = Field::Value(value.into());
        self
    }

    pub fn set_house(&mut self, value: impl Into<String>) -> &mut Self {
        self.house = Field::Value(value.into());
        self
    }

    pub fn set_apartment(&mut self, value: impl Into<String>) -> &mut Self {
        self.apartment = Field::Value(value.into());
        self
    }

    pub fn set_add_info(&mut self, value: impl Into<String>) -> &mut Self {
        self.add_info = Field::Value(value.into());
        self
    }

    pub fn set_comment(&mut self, value: impl Into<String>) -> &mut Self {
        self.comment = Field::Value(value.into());
        self
    }

    /// Sends the comment as an explicit `null`.
    pub fn clear_comment(&mut self) -> &mut Self {
        self.comment = Field::Null;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::model::MetaType;
    use url::Url;

    #[test]
    fn test_address_embeds_country_header_only() {
        let href = "https://api.moysklad.ru/api/remap/1.2/entity/country/9df7c2c3-7782-4c5c-a8ed-1102af611608";
        let mut country = Country::from_meta(Meta::new(MetaType::Country, Url::parse(href).unwrap()));
        country.set_name("Россия").set_description("Российская Федерация");

        let mut address = Address::default();
        address.set_city("Москва").set_country(&country);

        let json = serde_json::to_value(&address).unwrap();
        assert_eq!(json["city"], "Москва");
        assert_eq!(json["country"]["meta"]["href"], href);
        assert!(json["country"].get("name").is_none());
        assert!(json["country"].get("description").is_none());
    }

    #[test]
    fn test_currency_decodes() {
        let json = r#"{
            "meta": {"href": "https://api.moysklad.ru/api/remap/1.2/entity/currency/1", "type": "currency"},
            "id": "1",
            "name": "руб",
            "fullName": "Российский рубль",
            "code": "643",
            "isoCode": "RUB",
            "rate": 1,
            "default": true
        }"#;
        let currency: Currency = serde_json::from_str(json).unwrap();
        assert_eq!(currency.iso_code.value().map(String::as_str), Some("RUB"));
        assert_eq!(currency.rate, Field::Value(1.0));
        assert_eq!(currency.default, Field::Value(true));
        assert!(currency.archived.is_absent());
    }
}
