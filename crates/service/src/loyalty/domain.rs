use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Card lifecycle. `Redeemed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    /// Collecting punches, below threshold.
    Active,
    /// Threshold reached, reward not yet claimed.
    Eligible,
    /// Reward claimed; no further transitions.
    Redeemed,
}

/// Domain loyalty card (business view).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub customer_id: Uuid,
    pub punches: i32,
    pub reward_threshold: i32,
    pub reward_claimed: bool,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl Card {
    pub fn state(&self) -> CardState {
        if self.reward_claimed {
            CardState::Redeemed
        } else if self.punches >= self.reward_threshold {
            CardState::Eligible
        } else {
            CardState::Active
        }
    }
}

impl From<models::loyalty_card::Model> for Card {
    fn from(m: models::loyalty_card::Model) -> Self {
        Self {
            id: m.id,
            vendor_id: m.vendor_id,
            customer_id: m.customer_id,
            punches: m.punches,
            reward_threshold: m.reward_threshold,
            reward_claimed: m.reward_claimed,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
