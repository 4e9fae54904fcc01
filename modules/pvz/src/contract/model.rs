use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cities where pickup points may be opened. The set is closed; the storage
/// layer keeps the same catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    #[serde(rename = "Москва")]
    Moscow,
    #[serde(rename = "Санкт-Петербург")]
    SaintPetersburg,
    #[serde(rename = "Казань")]
    Kazan,
}

impl City {
    pub const ALL: [City; 3] = [City::Moscow, City::SaintPetersburg, City::Kazan];

    pub fn as_str(self) -> &'static str {
        match self {
            City::Moscow => "Москва",
            City::SaintPetersburg => "Санкт-Петербург",
            City::Kazan => "Казань",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a wire name does not belong to a closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl FromStr for City {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        City::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("city", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub id: Uuid,
    pub city: City,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReceptionStatus {
    #[serde(rename = "in_progress")]
    InProgress,
    #[serde(rename = "close")]
    Closed,
}

impl ReceptionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReceptionStatus::InProgress => "in_progress",
            ReceptionStatus::Closed => "close",
        }
    }
}

impl fmt::Display for ReceptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReceptionStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(ReceptionStatus::InProgress),
            "close" => Ok(ReceptionStatus::Closed),
            other => Err(UnknownVariant::new("reception status", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reception {
    pub id: Uuid,
    pub point_id: Uuid,
    pub status: ReceptionStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    #[serde(rename = "электроника")]
    Electronics,
    #[serde(rename = "одежда")]
    Clothes,
    #[serde(rename = "обувь")]
    Shoes,
}

impl ProductType {
    pub const ALL: [ProductType; 3] = [
        ProductType::Electronics,
        ProductType::Clothes,
        ProductType::Shoes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProductType::Electronics => "электроника",
            ProductType::Clothes => "одежда",
            ProductType::Shoes => "обувь",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("product type", s))
    }
}

/// A product registered during a reception.
///
/// `seq` is assigned by the store and strictly increases with insertion
/// order. It breaks ties between products that share a timestamp and is
/// never exposed on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub reception_id: Uuid,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub seq: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Moderator,
    Employee,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Moderator => "moderator",
            Role::Employee => "employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "moderator" => Ok(Role::Moderator),
            "employee" => Ok(Role::Employee),
            other => Err(UnknownVariant::new("role", other)),
        }
    }
}

/// Account record owned by the authentication collaborator. Only `role` is
/// consumed by the access gates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
}

/// Inclusive date range applied to reception creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

impl ReportFilter {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.date_from.is_none_or(|from| at >= from) && self.date_to.is_none_or(|to| at <= to)
    }
}

/// Raw report request as supplied by a caller. Page and limit are
/// normalised by the service; zero and negative values fall back to defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportQuery {
    pub filter: ReportFilter,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceptionReport {
    pub reception: Reception,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointReport {
    pub point: Point,
    pub receptions: Vec<ReceptionReport>,
}

/// Result of removing the latest product. A concurrent caller may have
/// removed the same product first; that race is reported as `AlreadyDeleted`
/// rather than as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted,
    AlreadyDeleted,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn wire_names_round_trip_through_from_str() {
        for city in City::ALL {
            assert_eq!(city.as_str().parse::<City>().unwrap(), city);
        }
        assert_eq!("close".parse::<ReceptionStatus>().unwrap(), ReceptionStatus::Closed);
        assert_eq!("обувь".parse::<ProductType>().unwrap(), ProductType::Shoes);
        assert_eq!("employee".parse::<Role>().unwrap(), Role::Employee);
    }

    #[test]
    fn unknown_city_is_rejected() {
        let err = "Новосибирск".parse::<City>().unwrap_err();
        assert_eq!(err.kind, "city");
        assert_eq!(err.value, "Новосибирск");
    }

    #[test]
    fn product_serializes_type_and_hides_seq() {
        let product = Product {
            id: Uuid::nil(),
            reception_id: Uuid::nil(),
            product_type: ProductType::Electronics,
            created_at: Utc.with_ymd_and_hms(2025, 4, 1, 12, 0, 0).unwrap(),
            seq: 42,
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["type"], "электроника");
        assert!(json.get("receptionId").is_some());
        assert!(json.get("seq").is_none());
    }

    #[test]
    fn report_filter_bounds_are_inclusive() {
        let from = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2025, 4, 30, 0, 0, 0).unwrap();
        let filter = ReportFilter {
            date_from: Some(from),
            date_to: Some(to),
        };
        assert!(filter.contains(from));
        assert!(filter.contains(to));
        assert!(!filter.contains(to + chrono::Duration::microseconds(1)));
        assert!(ReportFilter::default().contains(from));
    }
}
