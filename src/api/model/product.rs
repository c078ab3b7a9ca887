//
//  moysklad-cli
//  api/model/product.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Goods and their folders.

use serde::{Deserialize, Serialize};

use super::{Counterparty, Country, Currency, Employee, Field, Group, Meta, Moment, Uom};

entity! {
    /// A stock-keeping product.
    pub struct Product(Product) {
        fields {
            /// Product name.
            name: String => set_name / clear_name,
            /// Description.
            description: String => set_description / clear_description,
            /// Code, unique per account.
            code: String => set_code / clear_code,
            /// External system code.
            external_code: String => set_external_code / clear_external_code,
            /// Article (SKU).
            article: String => set_article / clear_article,
            /// Folder path, computed by the server.
            path_name: String => set_path_name / clear_path_name,
            /// VAT rate in percent.
            vat: i64 => set_vat / clear_vat,
            /// VAT applies.
            vat_enabled: bool => set_vat_enabled / clear_vat_enabled,
            /// VAT is inherited from the folder.
            use_parent_vat: bool => set_use_parent_vat / clear_use_parent_vat,
            /// Weight.
            weight: f64 => set_weight / clear_weight,
            /// Volume.
            volume: f64 => set_volume / clear_volume,
            /// Minimum price.
            min_price: Price => set_min_price / clear_min_price,
            /// Purchase price.
            buy_price: Price => set_buy_price / clear_buy_price,
            /// Sale prices, one per price type.
            sale_prices: Vec<SalePrice> => set_sale_prices / clear_sale_prices,
            /// Barcodes, each a one-key object such as `{"ean13": "..."}`.
            barcodes: Vec<serde_json::Map<String, serde_json::Value>> => set_barcodes / clear_barcodes,
            /// Payment item category for fiscal receipts.
            payment_item_type: String => set_payment_item_type / clear_payment_item_type,
            /// Marking type (`NOT_TRACKED`, `SHOES`, ...).
            tracking_type: String => set_tracking_type / clear_tracking_type,
            /// Number of variants.
            variants_count: i64 => set_variants_count / clear_variants_count,
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
            /// Parent folder.
            product_folder: ProductFolder => set_product_folder / clear_product_folder,
            /// Unit of measure.
            uom: Uom => set_uom / clear_uom,
            /// Country of origin.
            country: Country => set_country / clear_country,
            /// Supplier.
            supplier: Counterparty => set_supplier / clear_supplier,
        }
    }
}

entity! {
    /// A product group.
    pub struct ProductFolder(ProductFolder) {
        fields {
            /// Folder name.
            name: String => set_name / clear_name,
            /// Description.
            description: String => set_description / clear_description,
            /// Code.
            code: String => set_code / clear_code,
            /// External system code.
            external_code: String => set_external_code / clear_external_code,
            /// Path of the parent folders, computed by the server.
            path_name: String => set_path_name / clear_path_name,
            /// VAT rate in percent.
            vat: i64 => set_vat / clear_vat,
            /// VAT applies.
            vat_enabled: bool => set_vat_enabled / clear_vat_enabled,
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
            /// Parent folder.
            product_folder: ProductFolder => set_product_folder / clear_product_folder,
        }
    }
}

/// A money amount in kopecks with its currency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in kopecks.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub value: Field<f64>,

    /// Currency reference.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub currency: Field<Meta>,
}

impl Price {
    /// A price of `value` kopecks in the accounting currency.
    pub fn new(value: f64) -> Self {
        Self {
            value: Field::Value(value),
            currency: Field::Absent,
        }
    }

    /// Sets the currency to `currency`'s header.
    pub fn with_currency(mut self, currency: &Currency) -> Self {
        use super::Entity;

        if let Some(meta) = currency.meta() {
            self.currency = Field::Value(meta.clone());
        }
        self
    }
}

/// One sale price of a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalePrice {
    /// Amount in kopecks.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub value: Field<f64>,

    /// Currency reference.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub currency: Field<super::MetaWrapper>,

    /// Price type reference.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub price_type: Field<serde_json::Value>,
}
