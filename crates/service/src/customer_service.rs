//! Customer lifecycle: registration with enrollment artifact, reads,
//! partial updates, and deletion.
//!
//! Registration runs inside a transaction so a failed artifact write never
//! leaves a customer without a payload reference.

use std::sync::Arc;

use sea_orm::{DatabaseConnection, EntityTrait, TransactionTrait};
use serde::{Deserialize, Deserializer};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::authz::owned_by;
use crate::enrollment::EnrollmentStore;
use crate::errors::ServiceError;

/// Partial update payload. `email` and `phone` use a double `Option` so an
/// absent field means "leave alone" while an explicit `null` clears it.
#[derive(Debug, Default, Deserialize)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
}

fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

impl CustomerUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

pub struct CustomerService {
    db: DatabaseConnection,
    enrollment: Arc<dyn EnrollmentStore>,
}

impl CustomerService {
    pub fn new(db: DatabaseConnection, enrollment: Arc<dyn EnrollmentStore>) -> Self {
        Self { db, enrollment }
    }

    /// Create the customer and its enrollment artifact atomically. The
    /// artifact is written outside the transaction, so a commit failure
    /// cleans it up again.
    #[instrument(skip(self, email, phone), fields(vendor_id = %actor))]
    pub async fn register(
        &self,
        actor: Uuid,
        name: &str,
        email: Option<String>,
        phone: Option<String>,
    ) -> Result<models::customer::Model, ServiceError> {
        let txn = self.db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))?;
        let created = models::customer::create(&txn, actor, name, email, phone).await?;

        let reference = match self.enrollment.store(created.id, actor).await {
            Ok(r) => r,
            Err(e) => {
                let _ = txn.rollback().await;
                return Err(ServiceError::Enrollment(e.to_string()));
            }
        };
        let stored = match models::customer::set_qr_payload(&txn, created.id, &reference).await {
            Ok(m) => m,
            Err(e) => {
                let _ = txn.rollback().await;
                self.discard_artifact(&reference).await;
                return Err(e.into());
            }
        };
        if let Err(e) = txn.commit().await {
            self.discard_artifact(&reference).await;
            return Err(ServiceError::Db(e.to_string()));
        }
        info!(customer_id = %stored.id, "customer_registered");
        Ok(stored)
    }

    pub async fn get(
        &self,
        actor: Uuid,
        customer_id: Uuid,
    ) -> Result<models::customer::Model, ServiceError> {
        let customer = models::customer::Entity::find_by_id(customer_id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .ok_or_else(|| ServiceError::not_found("customer"))?;
        if !owned_by(actor, &customer) {
            return Err(ServiceError::Forbidden(
                "not authorized to access this customer".into(),
            ));
        }
        Ok(customer)
    }

    pub async fn list(&self, actor: Uuid) -> Result<Vec<models::customer::Model>, ServiceError> {
        Ok(models::customer::list_by_vendor(&self.db, actor).await?)
    }

    #[instrument(skip(self, update), fields(vendor_id = %actor, customer_id = %customer_id))]
    pub async fn update(
        &self,
        actor: Uuid,
        customer_id: Uuid,
        update: CustomerUpdate,
    ) -> Result<models::customer::Model, ServiceError> {
        let current = self.get(actor, customer_id).await?;
        if update.is_empty() {
            return Ok(current);
        }
        let updated = models::customer::update_fields(
            &self.db,
            customer_id,
            update.name,
            update.email,
            update.phone,
        )
        .await?;
        Ok(updated)
    }

    /// Delete the customer; loyalty cards go with it (cascading foreign
    /// key), and the enrollment artifact is removed best-effort.
    #[instrument(skip(self), fields(vendor_id = %actor, customer_id = %customer_id))]
    pub async fn delete(&self, actor: Uuid, customer_id: Uuid) -> Result<(), ServiceError> {
        let customer = self.get(actor, customer_id).await?;
        models::customer::hard_delete(&self.db, customer_id).await?;
        if let Some(reference) = customer.qr_payload {
            self.discard_artifact(&reference).await;
        }
        info!("customer_deleted");
        Ok(())
    }

    async fn discard_artifact(&self, reference: &str) {
        if let Err(e) = self.enrollment.remove(reference).await {
            warn!(reference, error = %e, "enrollment artifact cleanup failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_leave_everything_alone() {
        let u: CustomerUpdate = serde_json::from_str("{}").unwrap();
        assert!(u.is_empty());
        assert!(u.name.is_none());
        assert!(u.email.is_none());
        assert!(u.phone.is_none());
    }

    #[test]
    fn explicit_null_clears_contact_fields() {
        let u: CustomerUpdate =
            serde_json::from_str(r#"{"email": null, "phone": null}"#).unwrap();
        assert!(!u.is_empty());
        assert_eq!(u.email, Some(None));
        assert_eq!(u.phone, Some(None));
    }

    #[test]
    fn present_values_replace() {
        let u: CustomerUpdate =
            serde_json::from_str(r#"{"name": "Ada", "email": "ada@example.com"}"#).unwrap();
        assert_eq!(u.name.as_deref(), Some("Ada"));
        assert_eq!(u.email, Some(Some("ada@example.com".to_string())));
        assert!(u.phone.is_none());
    }
}
