use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use crate::auth::domain::{AuthVendor, VendorRecord, VendorUpdate};
use crate::auth::errors::AuthError;
use crate::auth::repository::VendorRepository;

pub struct SeaOrmVendorRepository {
    pub db: DatabaseConnection,
}

fn to_domain(m: models::vendor::Model) -> AuthVendor {
    AuthVendor {
        id: m.id,
        email: m.email,
        name: m.name,
        business_name: m.business_name,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

#[async_trait::async_trait]
impl VendorRepository for SeaOrmVendorRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<VendorRecord>, AuthError> {
        let res = models::vendor::find_by_email(&self.db, email)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(|m| {
            let password_hash = m.password_hash.clone();
            VendorRecord { vendor: to_domain(m), password_hash }
        }))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthVendor>, AuthError> {
        let res = models::vendor::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(to_domain))
    }

    async fn insert(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        business_name: &str,
    ) -> Result<AuthVendor, AuthError> {
        let created = models::vendor::create(&self.db, name, email, password_hash, business_name)
            .await
            .map_err(|e| match e {
                models::errors::ModelError::Conflict(_) => AuthError::Conflict,
                models::errors::ModelError::Validation(m) => AuthError::Validation(m),
                models::errors::ModelError::NotFound(_) => AuthError::NotFound,
                models::errors::ModelError::Db(m) => AuthError::Repository(m),
            })?;
        Ok(to_domain(created))
    }

    async fn update_profile(&self, id: Uuid, update: VendorUpdate) -> Result<AuthVendor, AuthError> {
        let updated =
            models::vendor::update_profile(&self.db, id, update.name, update.business_name)
                .await
                .map_err(|e| match e {
                    models::errors::ModelError::Validation(m) => AuthError::Validation(m),
                    models::errors::ModelError::NotFound(_) => AuthError::NotFound,
                    other => AuthError::Repository(other.to_string()),
                })?;
        Ok(to_domain(updated))
    }
}
