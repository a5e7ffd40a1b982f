use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use crate::loyalty::domain::Card;
use crate::loyalty::errors::CardError;
use crate::loyalty::repository::CardRepository;

pub struct SeaOrmCardRepository {
    pub db: DatabaseConnection,
}

fn map_model_err(e: models::errors::ModelError) -> CardError {
    match e {
        models::errors::ModelError::Validation(m) => CardError::InvalidInput(m),
        models::errors::ModelError::Conflict(m) => CardError::Conflict(m),
        models::errors::ModelError::NotFound(entity) => CardError::NotFound(entity),
        models::errors::ModelError::Db(m) => CardError::Repository(m),
    }
}

#[async_trait::async_trait]
impl CardRepository for SeaOrmCardRepository {
    async fn customer_owner(&self, customer_id: Uuid) -> Result<Option<Uuid>, CardError> {
        let res = models::customer::Entity::find_by_id(customer_id)
            .one(&self.db)
            .await
            .map_err(|e| CardError::Repository(e.to_string()))?;
        Ok(res.map(|c| c.vendor_id))
    }

    async fn insert(
        &self,
        vendor_id: Uuid,
        customer_id: Uuid,
        reward_threshold: i32,
    ) -> Result<Card, CardError> {
        let created =
            models::loyalty_card::create(&self.db, vendor_id, customer_id, reward_threshold)
                .await
                .map_err(map_model_err)?;
        Ok(created.into())
    }

    async fn find(&self, card_id: Uuid) -> Result<Option<Card>, CardError> {
        let res = models::loyalty_card::Entity::find_by_id(card_id)
            .one(&self.db)
            .await
            .map_err(|e| CardError::Repository(e.to_string()))?;
        Ok(res.map(Into::into))
    }

    async fn list_by_vendor(&self, vendor_id: Uuid) -> Result<Vec<Card>, CardError> {
        let rows = models::loyalty_card::list_by_vendor(&self.db, vendor_id)
            .await
            .map_err(map_model_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn punch_if_unclaimed(&self, card_id: Uuid, vendor_id: Uuid) -> Result<u64, CardError> {
        models::loyalty_card::punch_if_unclaimed(&self.db, card_id, vendor_id)
            .await
            .map_err(map_model_err)
    }

    async fn redeem_if_eligible(&self, card_id: Uuid, vendor_id: Uuid) -> Result<u64, CardError> {
        models::loyalty_card::redeem_if_eligible(&self.db, card_id, vendor_id)
            .await
            .map_err(map_model_err)
    }
}
