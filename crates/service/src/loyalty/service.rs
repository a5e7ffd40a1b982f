use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::authz::owned_by;

use super::domain::Card;
use super::errors::CardError;
use super::repository::CardRepository;

/// Card engine service. Ownership is checked before any transition is
/// attempted, and "card not found" stays distinguishable from "card owned
/// by a different vendor".
pub struct CardService<R: CardRepository> {
    repo: Arc<R>,
}

impl<R: CardRepository> CardService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Create a card for one of the vendor's own customers, starting at
    /// zero punches, unclaimed.
    #[instrument(skip(self), fields(vendor_id = %actor, customer_id = %customer_id))]
    pub async fn create(
        &self,
        actor: Uuid,
        customer_id: Uuid,
        reward_threshold: i32,
    ) -> Result<Card, CardError> {
        if reward_threshold <= 0 {
            return Err(CardError::InvalidInput("reward_threshold must be positive".into()));
        }
        match self.repo.customer_owner(customer_id).await? {
            None => return Err(CardError::NotFound("customer")),
            Some(owner) if owner != actor => {
                return Err(CardError::Forbidden(
                    "not authorized to issue a card for this customer".into(),
                ))
            }
            Some(_) => {}
        }
        let card = self.repo.insert(actor, customer_id, reward_threshold).await?;
        info!(card_id = %card.id, "card_created");
        Ok(card)
    }

    pub async fn get(&self, actor: Uuid, card_id: Uuid) -> Result<Card, CardError> {
        let card = self.repo.find(card_id).await?.ok_or(CardError::NotFound("loyalty card"))?;
        if !owned_by(actor, &card) {
            return Err(CardError::Forbidden("not authorized to access this loyalty card".into()));
        }
        Ok(card)
    }

    /// List the vendor's cards, newest first. The optional filter must equal
    /// the caller's own id; any other value is a cross-tenant attempt.
    pub async fn list(&self, actor: Uuid, vendor_filter: Option<Uuid>) -> Result<Vec<Card>, CardError> {
        if let Some(filter) = vendor_filter {
            if filter != actor {
                return Err(CardError::Forbidden(
                    "not authorized to view this vendor's cards".into(),
                ));
            }
        }
        self.repo.list_by_vendor(actor).await
    }

    /// `Active -> Active(punches+1)`, or `Active -> Eligible` when the
    /// increment reaches the threshold. Never auto-redeems.
    #[instrument(skip(self), fields(vendor_id = %actor, card_id = %card_id))]
    pub async fn punch(&self, actor: Uuid, card_id: Uuid) -> Result<Card, CardError> {
        let card = self.get(actor, card_id).await?;
        if card.reward_claimed {
            return Err(CardError::Conflict(
                "reward already claimed, cannot add more punches".into(),
            ));
        }
        let rows = self.repo.punch_if_unclaimed(card_id, actor).await?;
        if rows == 0 {
            // The conditional update lost a race; re-read to classify.
            return Err(self.classify_miss(actor, card_id).await);
        }
        let updated = self.get(actor, card_id).await?;
        info!(punches = updated.punches, "card_punched");
        Ok(updated)
    }

    /// `Eligible -> Redeemed`. Idempotent-by-rejection: a repeat always
    /// fails instead of silently succeeding.
    #[instrument(skip(self), fields(vendor_id = %actor, card_id = %card_id))]
    pub async fn redeem(&self, actor: Uuid, card_id: Uuid) -> Result<Card, CardError> {
        let card = self.get(actor, card_id).await?;
        if card.reward_claimed {
            return Err(CardError::Conflict("reward already claimed for this card".into()));
        }
        if card.punches < card.reward_threshold {
            return Err(CardError::InsufficientPunches);
        }
        let rows = self.repo.redeem_if_eligible(card_id, actor).await?;
        if rows == 0 {
            return Err(self.classify_miss(actor, card_id).await);
        }
        let updated = self.get(actor, card_id).await?;
        info!("card_redeemed");
        Ok(updated)
    }

    /// A conditional update that matched nothing after the pre-checks
    /// passed means another request changed the card in between.
    async fn classify_miss(&self, actor: Uuid, card_id: Uuid) -> CardError {
        match self.get(actor, card_id).await {
            Ok(card) if card.reward_claimed => {
                CardError::Conflict("reward already claimed for this card".into())
            }
            Ok(_) => CardError::Conflict("card changed concurrently, retry".into()),
            Err(e) => e,
        }
    }
}
