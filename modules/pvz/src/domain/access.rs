//! Role requirements per ledger operation.
//!
//! The domain service itself is role-agnostic; callers at the boundary pass
//! the authenticated role explicitly and check it here first.

use thiserror::Error;

use crate::contract::model::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreatePoint,
    ListPoints,
    ListPointsExtended,
    OpenReception,
    CloseLastReception,
    AddProduct,
    RemoveLastProduct,
}

impl Operation {
    /// `None` means any caller may run the operation.
    pub fn required_role(self) -> Option<Role> {
        match self {
            Operation::CreatePoint => Some(Role::Moderator),
            Operation::OpenReception
            | Operation::CloseLastReception
            | Operation::AddProduct
            | Operation::RemoveLastProduct => Some(Role::Employee),
            Operation::ListPoints | Operation::ListPointsExtended => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::CreatePoint => "create_point",
            Operation::ListPoints => "list_points",
            Operation::ListPointsExtended => "list_points_extended",
            Operation::OpenReception => "open_reception",
            Operation::CloseLastReception => "close_last_reception",
            Operation::AddProduct => "add_product",
            Operation::RemoveLastProduct => "remove_last_product",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{operation} requires role '{required}', caller has '{actual}'")]
pub struct AccessDenied {
    pub operation: &'static str,
    pub required: Role,
    pub actual: Role,
}

pub fn authorize(operation: Operation, caller: Role) -> Result<(), AccessDenied> {
    match operation.required_role() {
        Some(required) if required != caller => Err(AccessDenied {
            operation: operation.name(),
            required,
            actual: caller,
        }),
        _ => Ok(()),
    }
}
