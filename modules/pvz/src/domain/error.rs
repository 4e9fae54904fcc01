use thiserror::Error;
use uuid::Uuid;

/// How a domain error should be treated at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The requested end state already holds; callers may treat it as success.
    Benign,
    /// A named business rule rejected the request.
    Client,
    /// The store failed; details were logged and are not exposed.
    Internal,
}

/// Domain-specific errors using thiserror
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("City not found: '{city}'")]
    CityNotFound { city: String },

    #[error("Point not found: {id}")]
    PointNotFound { id: Uuid },

    #[error("Point {point_id} already has a reception in progress")]
    ReceptionAlreadyOpened { point_id: Uuid },

    #[error("Point {point_id} has no reception in progress")]
    ActiveReceptionNotFound { point_id: Uuid },

    #[error("Reception {reception_id} has no products")]
    ProductNotFound { reception_id: Uuid },

    #[error("Product {product_id} was already deleted")]
    ProductAlreadyDeleted { product_id: Uuid },

    #[error("Reception cannot move from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },

    #[error("Storage unavailable during {operation}")]
    Unavailable { operation: &'static str },
}

impl DomainError {
    pub fn city_not_found(city: impl Into<String>) -> Self {
        Self::CityNotFound { city: city.into() }
    }

    pub fn point_not_found(id: Uuid) -> Self {
        Self::PointNotFound { id }
    }

    pub fn reception_already_opened(point_id: Uuid) -> Self {
        Self::ReceptionAlreadyOpened { point_id }
    }

    pub fn active_reception_not_found(point_id: Uuid) -> Self {
        Self::ActiveReceptionNotFound { point_id }
    }

    pub fn product_not_found(reception_id: Uuid) -> Self {
        Self::ProductNotFound { reception_id }
    }

    pub fn product_already_deleted(product_id: Uuid) -> Self {
        Self::ProductAlreadyDeleted { product_id }
    }

    pub fn invalid_transition(from: impl ToString, to: impl ToString) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn unavailable(operation: &'static str) -> Self {
        Self::Unavailable { operation }
    }

    pub fn disposition(&self) -> Disposition {
        match self {
            Self::ProductAlreadyDeleted { .. } => Disposition::Benign,
            Self::Unavailable { .. } => Disposition::Internal,
            _ => Disposition::Client,
        }
    }
}
