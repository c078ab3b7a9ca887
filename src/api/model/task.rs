//
//  moysklad-cli
//  api/model/task.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! User tasks (to-dos assigned to employees).
//!
//! Not to be confused with [`AsyncTask`](crate::api::AsyncTask), which tracks
//! a server-side long-running request.

use serde::{Deserialize, Serialize};

use super::{Counterparty, Employee, Field, Meta, MetaWrapper, Moment};

entity! {
    /// A task assigned to an employee.
    pub struct Task(Task) {
        fields {
            /// Task text.
            description: String => set_description / clear_description,
            /// Deadline.
            due_to_date: Moment => set_due_to_date / clear_due_to_date,
            /// Completion flag.
            done: bool => set_done / clear_done,
            /// Completion time.
            completed: Moment => set_completed / clear_completed,
            /// Creation time.
            created: Moment => set_created / clear_created,
            /// Last update.
            updated: Moment => set_updated / clear_updated,
            /// Document the task is attached to; may be of any document kind.
            operation: MetaWrapper => set_operation / clear_operation,
            /// Comments thread.
            notes: TaskNotes => set_notes / clear_notes,
        }
        refs {
            /// Employee responsible for the task.
            assignee: Employee => set_assignee / clear_assignee,
            /// Employee who created the task.
            author: Employee => set_author / clear_author,
            /// Employee who completed the task.
            implementer: Employee => set_implementer / clear_implementer,
            /// Counterparty the task concerns.
            agent: Counterparty => set_agent / clear_agent,
        }
    }
}

/// Collection reference to a task's notes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskNotes {
    /// List metadata; `size` is the number of notes.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub meta: Field<Meta>,
}

impl Task {
    /// Returns `true` once the task has been marked done.
    pub fn is_done(&self) -> bool {
        matches!(self.done, Field::Value(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::model::MetaType;
    use chrono::NaiveDate;

    #[test]
    fn test_task_due_date_serializes_as_moment() {
        let due = NaiveDate::from_ymd_opt(2024, 5, 20)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap();

        let mut task = Task::default();
        task.set_description("Count the cold room").set_due_to_date(due);

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["dueToDate"], "2024-05-20 18:00:00.000");
        assert!(!task.is_done());
    }

    #[test]
    fn test_task_decodes_operation_reference() {
        let json = r#"{
            "meta": {"href": "https://api.moysklad.ru/api/remap/1.2/entity/task/t1", "type": "task"},
            "description": "Check receipt",
            "done": true,
            "operation": {"meta": {"href": "https://api.moysklad.ru/api/remap/1.2/entity/retaildemand/r1", "type": "retaildemand"}}
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(task.is_done());
        assert_eq!(
            task.operation.value().unwrap().meta.kind,
            MetaType::RetailDemand
        );
    }

    #[test]
    fn test_task_on_unlisted_document_kind() {
        let json = r#"{
            "meta": {"href": "https://api.moysklad.ru/api/remap/1.2/entity/task/t2", "type": "task"},
            "operation": {"meta": {"href": "https://api.moysklad.ru/api/remap/1.2/entity/processingorder/o1", "type": "processingorder"}}
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(
            task.operation.value().unwrap().meta.kind,
            MetaType::Unknown("processingorder".to_string())
        );
    }
}
