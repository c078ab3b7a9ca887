//
//  moysklad-cli
//  api/model/store.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Warehouses and their addressable storage: zones and slots.
//!
//! Zones and slots only exist below a store and are reached through
//! [`MoySkladClient::store_zones`](crate::api::MoySkladClient::store_zones)
//! and [`MoySkladClient::store_slots`](crate::api::MoySkladClient::store_slots).

use super::{Address, Employee, Field, Group, Meta, Moment};

entity! {
    /// A warehouse.
    pub struct Store(Store) {
        fields {
            /// Store name.
            name: String => set_name / clear_name,
            /// Description.
            description: String => set_description / clear_description,
            /// Code.
            code: String => set_code / clear_code,
            /// External system code.
            external_code: String => set_external_code / clear_external_code,
            /// Address as free text.
            address: String => set_address / clear_address,
            /// Address, structured.
            address_full: Address => set_address_full / clear_address_full,
            /// Path of parent stores, computed by the server.
            path_name: String => set_path_name / clear_path_name,
            /// Archived flag.
            archived: bool => set_archived / clear_archived,
            /// Visible to all employees.
            shared: bool => set_shared / clear_shared,
            /// Last update.
            updated: Moment => set_updated / clear_updated,
        }
        refs {
            /// Owning employee.
            owner: Employee => set_owner / clear_owner,
            /// Owning department.
            group: Group => set_group / clear_group,
            /// Parent store.
            parent: Store => set_parent / clear_parent,
        }
    }
}

entity! {
    /// A zone of a warehouse.
    pub struct StoreZone(StoreZone) {
        fields {
            /// Zone name.
            name: String => set_name / clear_name,
            /// External system code.
            external_code: String => set_external_code / clear_external_code,
            /// Last update.
            updated: Moment => set_updated / clear_updated,
        }
        refs {}
    }
}

entity! {
    /// A storage slot (bin) of a warehouse.
    pub struct Slot(Slot) {
        fields {
            /// Slot name.
            name: String => set_name / clear_name,
            /// Barcode printed on the slot.
            barcode: String => set_barcode / clear_barcode,
            /// External system code.
            external_code: String => set_external_code / clear_external_code,
            /// Last update.
            updated: Moment => set_updated / clear_updated,
        }
        refs {
            /// Zone the slot belongs to.
            zone: StoreZone => set_zone / clear_zone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::model::{Entity, MetaType};
    use url::Url;

    #[test]
    fn test_slot_zone_reference() {
        let mut zone = StoreZone::from_meta(Meta::new(
            MetaType::StoreZone,
            Url::parse("https://api.moysklad.ru/api/remap/1.2/entity/store/s1/zones/z1").unwrap(),
        ));
        zone.set_name("Cold room");

        let mut slot = Slot::default();
        slot.set_name("A-01-03").set_zone(&zone);

        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json["zone"]["meta"]["type"], "storezone");
        assert!(json["zone"].get("name").is_none());
    }

    #[test]
    fn test_clear_parent_sends_null() {
        let mut store = Store::default();
        store.clear_parent();
        assert_eq!(serde_json::to_string(&store).unwrap(), r#"{"parent":null}"#);
    }
}
