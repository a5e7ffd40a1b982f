use async_trait::async_trait;
use uuid::Uuid;

use super::domain::Card;
use super::errors::CardError;

/// Repository abstraction for card persistence.
///
/// `punch_if_unclaimed` and `redeem_if_eligible` carry their state-machine
/// guard inside the store operation itself (a conditional update) and report
/// how many rows matched; the service re-reads to classify a miss.
#[async_trait]
pub trait CardRepository: Send + Sync {
    /// Owning vendor of a customer, if the customer exists.
    async fn customer_owner(&self, customer_id: Uuid) -> Result<Option<Uuid>, CardError>;

    /// Insert a fresh card; the `(vendor_id, customer_id)` uniqueness
    /// constraint maps to `Conflict`.
    async fn insert(
        &self,
        vendor_id: Uuid,
        customer_id: Uuid,
        reward_threshold: i32,
    ) -> Result<Card, CardError>;

    async fn find(&self, card_id: Uuid) -> Result<Option<Card>, CardError>;

    /// Cards of one vendor, newest first.
    async fn list_by_vendor(&self, vendor_id: Uuid) -> Result<Vec<Card>, CardError>;

    async fn punch_if_unclaimed(&self, card_id: Uuid, vendor_id: Uuid) -> Result<u64, CardError>;

    async fn redeem_if_eligible(&self, card_id: Uuid, vendor_id: Uuid) -> Result<u64, CardError>;
}

/// In-memory mock repository for state-machine tests. Applies the same
/// conditional-update semantics as the SQL implementation, under one lock.
pub mod mock {
    use super::*;
    use chrono::{Duration, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockCardRepository {
        customers: Mutex<HashMap<Uuid, Uuid>>, // customer id -> owning vendor
        cards: Mutex<HashMap<Uuid, Card>>,
        seq: Mutex<i64>,
    }

    impl MockCardRepository {
        pub fn add_customer(&self, vendor_id: Uuid) -> Uuid {
            let id = Uuid::new_v4();
            self.customers.lock().unwrap().insert(id, vendor_id);
            id
        }
    }

    #[async_trait]
    impl CardRepository for MockCardRepository {
        async fn customer_owner(&self, customer_id: Uuid) -> Result<Option<Uuid>, CardError> {
            Ok(self.customers.lock().unwrap().get(&customer_id).copied())
        }

        async fn insert(
            &self,
            vendor_id: Uuid,
            customer_id: Uuid,
            reward_threshold: i32,
        ) -> Result<Card, CardError> {
            let mut cards = self.cards.lock().unwrap();
            if cards
                .values()
                .any(|c| c.vendor_id == vendor_id && c.customer_id == customer_id)
            {
                return Err(CardError::Conflict("card already exists for this customer".into()));
            }
            // Distinct timestamps so newest-first ordering is deterministic
            let mut seq = self.seq.lock().unwrap();
            *seq += 1;
            let now = (Utc::now() + Duration::milliseconds(*seq)).into();
            let card = Card {
                id: Uuid::new_v4(),
                vendor_id,
                customer_id,
                punches: 0,
                reward_threshold,
                reward_claimed: false,
                created_at: now,
                updated_at: now,
            };
            cards.insert(card.id, card.clone());
            Ok(card)
        }

        async fn find(&self, card_id: Uuid) -> Result<Option<Card>, CardError> {
            Ok(self.cards.lock().unwrap().get(&card_id).cloned())
        }

        async fn list_by_vendor(&self, vendor_id: Uuid) -> Result<Vec<Card>, CardError> {
            let cards = self.cards.lock().unwrap();
            let mut out: Vec<Card> =
                cards.values().filter(|c| c.vendor_id == vendor_id).cloned().collect();
            out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(out)
        }

        async fn punch_if_unclaimed(
            &self,
            card_id: Uuid,
            vendor_id: Uuid,
        ) -> Result<u64, CardError> {
            let mut cards = self.cards.lock().unwrap();
            match cards.get_mut(&card_id) {
                Some(c) if c.vendor_id == vendor_id && !c.reward_claimed => {
                    c.punches += 1;
                    c.updated_at = Utc::now().into();
                    Ok(1)
                }
                _ => Ok(0),
            }
        }

        async fn redeem_if_eligible(
            &self,
            card_id: Uuid,
            vendor_id: Uuid,
        ) -> Result<u64, CardError> {
            let mut cards = self.cards.lock().unwrap();
            match cards.get_mut(&card_id) {
                Some(c)
                    if c.vendor_id == vendor_id
                        && !c.reward_claimed
                        && c.punches >= c.reward_threshold =>
                {
                    c.reward_claimed = true;
                    c.updated_at = Utc::now().into();
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }
}
