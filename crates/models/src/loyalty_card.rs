use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{entity::prelude::*, ConnectionTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::{customer, vendor};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "loyalty_card")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub customer_id: Uuid,
    pub punches: i32,
    pub reward_threshold: i32,
    pub reward_claimed: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Vendor,
    Customer,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Vendor => Entity::belongs_to(vendor::Entity)
                .from(Column::VendorId)
                .to(vendor::Column::Id)
                .into(),
            Relation::Customer => Entity::belongs_to(customer::Entity)
                .from(Column::CustomerId)
                .to(customer::Column::Id)
                .into(),
        }
    }
}

impl Related<vendor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendor.def()
    }
}

impl Related<customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Insert a fresh card in its initial state (zero punches, unclaimed).
/// The `(vendor_id, customer_id)` unique index is the authority on card
/// uniqueness; a violation surfaces as `Conflict`.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    vendor_id: Uuid,
    customer_id: Uuid,
    reward_threshold: i32,
) -> Result<Model, ModelError> {
    if reward_threshold <= 0 {
        return Err(ModelError::Validation("reward_threshold must be positive".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        vendor_id: Set(vendor_id),
        customer_id: Set(customer_id),
        punches: Set(0),
        reward_threshold: Set(reward_threshold),
        reward_claimed: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            ModelError::Conflict("card already exists for this customer".into())
        }
        _ => ModelError::Db(e.to_string()),
    })
}

pub async fn list_by_vendor<C: ConnectionTrait>(
    db: &C,
    vendor_id: Uuid,
) -> Result<Vec<Model>, ModelError> {
    Entity::find()
        .filter(Column::VendorId.eq(vendor_id))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

/// Atomically increment `punches` for an unclaimed card owned by the given
/// vendor. A single conditional UPDATE, so two concurrent punches cannot
/// both read N and write N+1. Returns the number of rows updated (0 or 1).
pub async fn punch_if_unclaimed<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    vendor_id: Uuid,
) -> Result<u64, ModelError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let res = Entity::update_many()
        .col_expr(Column::Punches, Expr::col(Column::Punches).add(1))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::Id.eq(id))
        .filter(Column::VendorId.eq(vendor_id))
        .filter(Column::RewardClaimed.eq(false))
        .exec(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected)
}

/// Atomically flip `reward_claimed` for a card that is owned by the vendor,
/// unclaimed, and at or past its threshold. The guard lives in the UPDATE
/// itself so a punch racing a redeem cannot produce a double claim.
pub async fn redeem_if_eligible<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    vendor_id: Uuid,
) -> Result<u64, ModelError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let res = Entity::update_many()
        .col_expr(Column::RewardClaimed, Expr::value(true))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::Id.eq(id))
        .filter(Column::VendorId.eq(vendor_id))
        .filter(Column::RewardClaimed.eq(false))
        .filter(Expr::col(Column::Punches).gte(Expr::col(Column::RewardThreshold)))
        .exec(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected)
}
