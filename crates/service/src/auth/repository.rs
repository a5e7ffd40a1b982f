use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{AuthVendor, VendorRecord, VendorUpdate};
use super::errors::AuthError;

/// Repository abstraction for vendor persistence.
#[async_trait]
pub trait VendorRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<VendorRecord>, AuthError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthVendor>, AuthError>;

    /// Insert a new vendor; the email unique constraint maps to `Conflict`.
    async fn insert(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        business_name: &str,
    ) -> Result<AuthVendor, AuthError>;

    async fn update_profile(&self, id: Uuid, update: VendorUpdate) -> Result<AuthVendor, AuthError>;
}

/// Simple in-memory mock repository for tests
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockVendorRepository {
        vendors: Mutex<HashMap<Uuid, VendorRecord>>, // key: vendor id
    }

    #[async_trait]
    impl VendorRepository for MockVendorRepository {
        async fn find_by_email(&self, email: &str) -> Result<Option<VendorRecord>, AuthError> {
            let vendors = self.vendors.lock().unwrap();
            Ok(vendors.values().find(|r| r.vendor.email == email).cloned())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthVendor>, AuthError> {
            let vendors = self.vendors.lock().unwrap();
            Ok(vendors.get(&id).map(|r| r.vendor.clone()))
        }

        async fn insert(
            &self,
            name: &str,
            email: &str,
            password_hash: &str,
            business_name: &str,
        ) -> Result<AuthVendor, AuthError> {
            let mut vendors = self.vendors.lock().unwrap();
            if vendors.values().any(|r| r.vendor.email == email) {
                return Err(AuthError::Conflict);
            }
            let now = Utc::now().into();
            let vendor = AuthVendor {
                id: Uuid::new_v4(),
                email: email.to_string(),
                name: name.to_string(),
                business_name: business_name.to_string(),
                created_at: now,
                updated_at: now,
            };
            vendors.insert(
                vendor.id,
                VendorRecord { vendor: vendor.clone(), password_hash: password_hash.to_string() },
            );
            Ok(vendor)
        }

        async fn update_profile(
            &self,
            id: Uuid,
            update: VendorUpdate,
        ) -> Result<AuthVendor, AuthError> {
            let mut vendors = self.vendors.lock().unwrap();
            let record = vendors.get_mut(&id).ok_or(AuthError::NotFound)?;
            if let Some(name) = update.name {
                record.vendor.name = name;
            }
            if let Some(business_name) = update.business_name {
                record.vendor.business_name = business_name;
            }
            record.vendor.updated_at = Utc::now().into();
            Ok(record.vendor.clone())
        }
    }
}
