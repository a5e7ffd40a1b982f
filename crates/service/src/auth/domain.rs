use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registration input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub business_name: String,
}

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Domain vendor (business view, no credential material)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthVendor {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub business_name: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

/// Vendor row plus its stored password hash, for credential checks only.
#[derive(Debug, Clone)]
pub struct VendorRecord {
    pub vendor: AuthVendor,
    pub password_hash: String,
}

/// Partial profile update. Only name and business_name are mutable; a field
/// left as `None` is untouched, so "no fields supplied" is distinguishable
/// and testable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VendorUpdate {
    pub name: Option<String>,
    pub business_name: Option<String>,
}

impl VendorUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.business_name.is_none()
    }
}

/// Login result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub vendor: AuthVendor,
    pub token: String,
}

/// Validated bearer token claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub vendor_id: Uuid,
    pub email: String,
}
