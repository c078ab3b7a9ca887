//
//  moysklad-cli
//  api/model/agent.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Parties: employees, the account's own legal entities, and counterparties.

use super::{Address, Field, Group, Meta, Moment};

entity! {
    /// An employee of the account.
    pub struct Employee(Employee) {
        fields {
            /// Display name (`Lastname F. M.`), computed by the server.
            name: String => set_name / clear_name,
            /// First name.
            first_name: String => set_first_name / clear_first_name,
            /// Middle name.
            middle_name: String => set_middle_name / clear_middle_name,
            /// Last name.
            last_name: String => set_last_name / clear_last_name,
            /// Full name.
            full_name: String => set_full_name / clear_full_name,
            /// Short name.
            short_fio: String => set_short_fio / clear_short_fio,
            /// Login (`user@account`).
            uid: String => set_uid / clear_uid,
            /// E-mail.
            email: String => set_email / clear_email,
            /// Phone.
            phone: String => set_phone / clear_phone,
            /// Job title.
            position: String => set_position / clear_position,
            /// Tax id.
            inn: String => set_inn / clear_inn,
            /// Description.
            description: String => set_description / clear_description,
            /// Code.
            code: String => set_code / clear_code,
            /// External system code.
            external_code: String => set_external_code / clear_external_code,
            /// Archived flag.
            archived: bool => set_archived / clear_archived,
            /// Visible to all employees.
            shared: bool => set_shared / clear_shared,
            /// Creation time.
            created: Moment => set_created / clear_created,
            /// Last update.
            updated: Moment => set_updated / clear_updated,
        }
        refs {
            /// Owning employee.
            owner: Employee => set_owner / clear_owner,
            /// Department.
            group: Group => set_group / clear_group,
        }
    }
}

entity! {
    /// One of the account's own legal entities.
    pub struct Organization(Organization) {
        fields {
            /// Short name.
            name: String => set_name / clear_name,
            /// Full legal name.
            legal_title: String => set_legal_title / clear_legal_title,
            /// Legal address as free text.
            legal_address: String => set_legal_address / clear_legal_address,
            /// Legal address, structured.
            legal_address_full: Address => set_legal_address_full / clear_legal_address_full,
            /// Actual address as free text.
            actual_address: String => set_actual_address / clear_actual_address,
            /// Tax id.
            inn: String => set_inn / clear_inn,
            /// Tax registration reason code.
            kpp: String => set_kpp / clear_kpp,
            /// State registration number.
            ogrn: String => set_ogrn / clear_ogrn,
            /// Legal form: `legal`, `entrepreneur` or `individual`.
            company_type: String => set_company_type / clear_company_type,
            /// EGAIS integration enabled.
            is_egais_enable: bool => set_is_egais_enable / clear_is_egais_enable,
            /// E-mail.
            email: String => set_email / clear_email,
            /// Phone.
            phone: String => set_phone / clear_phone,
            /// Description.
            description: String => set_description / clear_description,
            /// Code.
            code: String => set_code / clear_code,
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
            /// Owning employee.
            owner: Employee => set_owner / clear_owner,
            /// Owning department.
            group: Group => set_group / clear_group,
        }
    }
}

entity! {
    /// A customer or supplier.
    pub struct Counterparty(Counterparty) {
        fields {
            /// Short name.
            name: String => set_name / clear_name,
            /// Full legal name.
            legal_title: String => set_legal_title / clear_legal_title,
            /// Legal address, structured.
            legal_address_full: Address => set_legal_address_full / clear_legal_address_full,
            /// Actual address, structured.
            actual_address_full: Address => set_actual_address_full / clear_actual_address_full,
            /// Tax id.
            inn: String => set_inn / clear_inn,
            /// Tax registration reason code.
            kpp: String => set_kpp / clear_kpp,
            /// Legal form: `legal`, `entrepreneur` or `individual`.
            company_type: String => set_company_type / clear_company_type,
            /// E-mail.
            email: String => set_email / clear_email,
            /// Phone.
            phone: String => set_phone / clear_phone,
            /// Tags.
            tags: Vec<String> => set_tags / clear_tags,
            /// Discount card number.
            discount_card_number: String => set_discount_card_number / clear_discount_card_number,
            /// Accumulated sales, in kopecks.
            sales_amount: f64 => set_sales_amount / clear_sales_amount,
            /// Description.
            description: String => set_description / clear_description,
            /// Code.
            code: String => set_code / clear_code,
            /// External system code.
            external_code: String => set_external_code / clear_external_code,
            /// Archived flag.
            archived: bool => set_archived / clear_archived,
            /// Visible to all employees.
            shared: bool => set_shared / clear_shared,
            /// Creation time.
            created: Moment => set_created / clear_created,
            /// Last update.
            updated: Moment => set_updated / clear_updated,
        }
        refs {
            /// Owning employee.
            owner: Employee => set_owner / clear_owner,
            /// Owning department.
            group: Group => set_group / clear_group,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counterparty_clear_is_explicit_null() {
        let mut agent = Counterparty::default();
        agent.set_name("ООО Ромашка").set_tags(vec!["wholesale".to_string()]).clear_phone();

        let json = serde_json::to_value(&agent).unwrap();
        assert_eq!(json["name"], "ООО Ромашка");
        assert_eq!(json["tags"][0], "wholesale");
        assert!(json["phone"].is_null());
        assert!(json.get("email").is_none());
    }

    #[test]
    fn test_employee_decodes_nested_owner() {
        let json = r#"{
            "meta": {"href": "https://api.moysklad.ru/api/remap/1.2/entity/employee/e1", "type": "employee"},
            "id": "e1",
            "name": "Иванов И. И.",
            "owner": {"meta": {"href": "https://api.moysklad.ru/api/remap/1.2/entity/employee/e0", "type": "employee"}},
            "archived": false
        }"#;
        let employee: Employee = serde_json::from_str(json).unwrap();
        let owner = employee.owner.value().unwrap();
        assert_eq!(owner.meta.value().and_then(Meta::id), Some("e0"));
        assert_eq!(employee.archived, Field::Value(false));
    }
}
