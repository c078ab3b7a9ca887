//
//  moysklad-cli
//  api/model/retail.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Point-of-sale documents.
//!
//! A [`RetailStore`] is a till; a [`RetailShift`] is one opening of that
//! till. During a shift the till produces sales ([`RetailDemand`]),
//! returns ([`RetailSalesReturn`]) and cash drawer movements
//! ([`RetailDrawerCashIn`], [`RetailDrawerCashOut`]). The shift lists them
//! together as [`RetailOperation`] envelopes, since the kinds are mixed.

use serde::{Deserialize, Serialize};

use crate::api::common::EntityList;

use super::{
    Counterparty, Currency, Employee, Field, Group, Meta, MetaWrapper, Moment, Organization,
    RetailOperation, Store,
};

entity! {
    /// A point of sale (till).
    pub struct RetailStore(RetailStore) {
        fields {
            /// Till name.
            name: String => set_name / clear_name,
            /// Description.
            description: String => set_description / clear_description,
            /// Address as free text.
            address: String => set_address / clear_address,
            /// Till is active.
            active: bool => set_active / clear_active,
            /// Till is connected to the cloud.
            authorized: bool => set_authorized / clear_authorized,
            /// Sales are blocked when stock runs out.
            control_shipping_stock: bool => set_control_shipping_stock / clear_control_shipping_stock,
            /// Discounts may be applied manually.
            discount_enable: bool => set_discount_enable / clear_discount_enable,
            /// Maximum manual discount, percent.
            discount_max_percent: f64 => set_discount_max_percent / clear_discount_max_percent,
            /// Fiscal receipts are printed.
            send_marks_for_check: bool => set_send_marks_for_check / clear_send_marks_for_check,
            /// External system code.
            external_code: String => set_external_code / clear_external_code,
            /// Archived flag.
            archived: bool => set_archived / clear_archived,
            /// Visible to all employees.
            shared: bool => set_shared / clear_shared,
            /// Last update.
            updated: Moment => set_updated / clear_updated,
        }
        refs {
            /// Legal entity the till sells for.
            organization: Organization => set_organization / clear_organization,
            /// Store the till ships from.
            store: Store => set_store / clear_store,
            /// Default customer for anonymous sales.
            default_customer: Counterparty => set_default_customer / clear_default_customer,
            /// Owning employee.
            owner: Employee => set_owner / clear_owner,
            /// Owning department.
            group: Group => set_group / clear_group,
        }
    }
}

entity! {
    /// One opening of a till, from open to close.
    pub struct RetailShift(RetailShift) {
        fields {
            /// Shift number.
            name: String => set_name / clear_name,
            /// Description.
            description: String => set_description / clear_description,
            /// Opening time.
            moment: Moment => set_moment / clear_moment,
            /// Closing time; absent while the shift is open.
            close_date: Moment => set_close_date / clear_close_date,
            /// Cash taken during the shift, kopecks.
            proceeds_cash: f64 => set_proceeds_cash / clear_proceeds_cash,
            /// Non-cash taken during the shift, kopecks.
            proceeds_no_cash: f64 => set_proceeds_no_cash / clear_proceeds_no_cash,
            /// Cash received, kopecks.
            received_cash: f64 => set_received_cash / clear_received_cash,
            /// Non-cash received, kopecks.
            received_no_cash: f64 => set_received_no_cash / clear_received_no_cash,
            /// VAT applies.
            vat_enabled: bool => set_vat_enabled / clear_vat_enabled,
            /// Prices include VAT.
            vat_included: bool => set_vat_included / clear_vat_included,
            /// VAT total, kopecks.
            vat_sum: f64 => set_vat_sum / clear_vat_sum,
            /// Documents produced during the shift, of mixed kinds.
            operations: Vec<RetailOperation> => set_operations / clear_operations,
            /// External system code.
            external_code: String => set_external_code / clear_external_code,
            /// Creation time.
            created: Moment => set_created / clear_created,
            /// Last update.
            updated: Moment => set_updated / clear_updated,
        }
        refs {
            /// Till the shift was opened on.
            retail_store: RetailStore => set_retail_store / clear_retail_store,
            /// Legal entity.
            organization: Organization => set_organization / clear_organization,
            /// Store.
            store: Store => set_store / clear_store,
            /// Owning employee.
            owner: Employee => set_owner / clear_owner,
            /// Owning department.
            group: Group => set_group / clear_group,
        }
    }
}

entity! {
    /// A retail sale.
    pub struct RetailDemand(RetailDemand) {
        fields {
            /// Document number.
            name: String => set_name / clear_name,
            /// Description.
            description: String => set_description / clear_description,
            /// Document time.
            moment: Moment => set_moment / clear_moment,
            /// Posted to stock and money registers.
            applicable: bool => set_applicable / clear_applicable,
            /// Receipt was printed by a fiscal register.
            fiscal: bool => set_fiscal / clear_fiscal,
            /// Total, kopecks.
            sum: f64 => set_sum / clear_sum,
            /// Paid in cash, kopecks.
            cash_sum: f64 => set_cash_sum / clear_cash_sum,
            /// Paid by card, kopecks.
            no_cash_sum: f64 => set_no_cash_sum / clear_no_cash_sum,
            /// Paid by QR code, kopecks.
            qr_sum: f64 => set_qr_sum / clear_qr_sum,
            /// Paid from a prepayment in cash, kopecks.
            prepayment_cash_sum: f64 => set_prepayment_cash_sum / clear_prepayment_cash_sum,
            /// Paid from a prepayment by card, kopecks.
            prepayment_no_cash_sum: f64 => set_prepayment_no_cash_sum / clear_prepayment_no_cash_sum,
            /// VAT applies.
            vat_enabled: bool => set_vat_enabled / clear_vat_enabled,
            /// Prices include VAT.
            vat_included: bool => set_vat_included / clear_vat_included,
            /// VAT total, kopecks.
            vat_sum: f64 => set_vat_sum / clear_vat_sum,
            /// Currency and rate of the document.
            rate: Rate => set_rate / clear_rate,
            /// Line items.
            positions: Positions => set_positions / clear_positions,
            /// External system code.
            external_code: String => set_external_code / clear_external_code,
            /// Visible to all employees.
            shared: bool => set_shared / clear_shared,
            /// Creation time.
            created: Moment => set_created / clear_created,
            /// Last update.
            updated: Moment => set_updated / clear_updated,
        }
        refs {
            /// Shift the sale belongs to.
            retail_shift: RetailShift => set_retail_shift / clear_retail_shift,
            /// Till.
            retail_store: RetailStore => set_retail_store / clear_retail_store,
            /// Selling legal entity.
            organization: Organization => set_organization / clear_organization,
            /// Customer.
            agent: Counterparty => set_agent / clear_agent,
            /// Store the goods leave.
            store: Store => set_store / clear_store,
            /// Owning employee.
            owner: Employee => set_owner / clear_owner,
            /// Owning department.
            group: Group => set_group / clear_group,
        }
    }
}

entity! {
    /// A retail return.
    pub struct RetailSalesReturn(RetailSalesReturn) {
        fields {
            /// Document number.
            name: String => set_name / clear_name,
            /// Description.
            description: String => set_description / clear_description,
            /// Document time.
            moment: Moment => set_moment / clear_moment,
            /// Posted to stock and money registers.
            applicable: bool => set_applicable / clear_applicable,
            /// Total, kopecks.
            sum: f64 => set_sum / clear_sum,
            /// Refunded in cash, kopecks.
            cash_sum: f64 => set_cash_sum / clear_cash_sum,
            /// Refunded to card, kopecks.
            no_cash_sum: f64 => set_no_cash_sum / clear_no_cash_sum,
            /// Refunded by QR code, kopecks.
            qr_sum: f64 => set_qr_sum / clear_qr_sum,
            /// VAT applies.
            vat_enabled: bool => set_vat_enabled / clear_vat_enabled,
            /// Prices include VAT.
            vat_included: bool => set_vat_included / clear_vat_included,
            /// VAT total, kopecks.
            vat_sum: f64 => set_vat_sum / clear_vat_sum,
            /// Currency and rate of the document.
            rate: Rate => set_rate / clear_rate,
            /// Line items.
            positions: Positions => set_positions / clear_positions,
            /// External system code.
            external_code: String => set_external_code / clear_external_code,
            /// Creation time.
            created: Moment => set_created / clear_created,
            /// Last update.
            updated: Moment => set_updated / clear_updated,
        }
        refs {
            /// Sale being returned.
            demand: RetailDemand => set_demand / clear_demand,
            /// Shift the return belongs to.
            retail_shift: RetailShift => set_retail_shift / clear_retail_shift,
            /// Till.
            retail_store: RetailStore => set_retail_store / clear_retail_store,
            /// Legal entity.
            organization: Organization => set_organization / clear_organization,
            /// Customer.
            agent: Counterparty => set_agent / clear_agent,
            /// Store the goods return to.
            store: Store => set_store / clear_store,
            /// Owning employee.
            owner: Employee => set_owner / clear_owner,
            /// Owning department.
            group: Group => set_group / clear_group,
        }
    }
}

entity! {
    /// Cash put into the till drawer.
    pub struct RetailDrawerCashIn(RetailDrawerCashIn) {
        fields {
            /// Document number.
            name: String => set_name / clear_name,
            /// Description.
            description: String => set_description / clear_description,
            /// Document time.
            moment: Moment => set_moment / clear_moment,
            /// Posted to money registers.
            applicable: bool => set_applicable / clear_applicable,
            /// Amount, kopecks.
            sum: f64 => set_sum / clear_sum,
            /// Currency and rate of the document.
            rate: Rate => set_rate / clear_rate,
            /// External system code.
            external_code: String => set_external_code / clear_external_code,
            /// Creation time.
            created: Moment => set_created / clear_created,
            /// Last update.
            updated: Moment => set_updated / clear_updated,
        }
        refs {
            /// Shift the movement belongs to.
            retail_shift: RetailShift => set_retail_shift / clear_retail_shift,
            /// Legal entity.
            organization: Organization => set_organization / clear_organization,
            /// Counterparty handing over the cash.
            agent: Counterparty => set_agent / clear_agent,
            /// Owning employee.
            owner: Employee => set_owner / clear_owner,
            /// Owning department.
            group: Group => set_group / clear_group,
        }
    }
}

entity! {
    /// Cash taken out of the till drawer.
    pub struct RetailDrawerCashOut(RetailDrawerCashOut) {
        fields {
            /// Document number.
            name: String => set_name / clear_name,
            /// Description.
            description: String => set_description / clear_description,
            /// Document time.
            moment: Moment => set_moment / clear_moment,
            /// Posted to money registers.
            applicable: bool => set_applicable / clear_applicable,
            /// Amount, kopecks.
            sum: f64 => set_sum / clear_sum,
            /// Currency and rate of the document.
            rate: Rate => set_rate / clear_rate,
            /// External system code.
            external_code: String => set_external_code / clear_external_code,
            /// Creation time.
            created: Moment => set_created / clear_created,
            /// Last update.
            updated: Moment => set_updated / clear_updated,
        }
        refs {
            /// Shift the movement belongs to.
            retail_shift: RetailShift => set_retail_shift / clear_retail_shift,
            /// Legal entity.
            organization: Organization => set_organization / clear_organization,
            /// Counterparty receiving the cash.
            agent: Counterparty => set_agent / clear_agent,
            /// Owning employee.
            owner: Employee => set_owner / clear_owner,
            /// Owning department.
            group: Group => set_group / clear_group,
        }
    }
}

/// Document currency and exchange rate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rate {
    /// Currency reference.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub currency: Field<Box<Currency>>,

    /// Exchange rate to the accounting currency.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub value: Field<f64>,
}

/// A line item of a retail document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Position metadata, present on positions read from the server.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub meta: Field<Meta>,

    /// Position id.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub id: Field<String>,

    /// Quantity.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub quantity: Field<f64>,

    /// Unit price, kopecks.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub price: Field<f64>,

    /// Discount, percent.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub discount: Field<f64>,

    /// VAT rate, percent.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub vat: Field<i64>,

    /// VAT applies.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub vat_enabled: Field<bool>,

    /// Sold item: a product, service, bundle or variant.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub assortment: Field<MetaWrapper>,
}

impl Position {
    /// A line of `quantity` units of `assortment` at `price` kopecks.
    pub fn new(assortment: Meta, quantity: f64, price: f64) -> Self {
        Self {
            quantity: Field::Value(quantity),
            price: Field::Value(price),
            assortment: Field::Value(MetaWrapper::from(assortment)),
            ..Default::default()
        }
    }

    /// Line total after discount, kopecks.
    pub fn total(&self) -> Option<f64> {
        let quantity = self.quantity.value()?;
        let price = self.price.value()?;
        let discount = self.discount.value().copied().unwrap_or(0.0);
        Some(quantity * price * (1.0 - discount / 100.0))
    }
}

/// Line items of a document.
///
/// Read back as a collection reference (`{"meta": ..., "rows": [...]}`,
/// rows only when expanded) but written as a plain array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Positions {
    /// Inline array, as sent on create.
    Rows(Vec<Position>),
    /// Collection reference, as returned by the server.
    Page(EntityList<Position>),
}

impl Positions {
    /// Rows carried inline. Empty for an unexpanded collection reference.
    pub fn rows(&self) -> &[Position] {
        match self {
            Self::Rows(rows) => rows,
            Self::Page(page) => &page.rows,
        }
    }
}

impl From<Vec<Position>> for Positions {
    fn from(rows: Vec<Position>) -> Self {
        Self::Rows(rows)
    }
}
