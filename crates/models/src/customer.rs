use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::vendor;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub qr_payload: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Vendor,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Vendor => Entity::belongs_to(vendor::Entity)
                .from(Column::VendorId)
                .to(vendor::Column::Id)
                .into(),
        }
    }
}

impl Related<vendor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    vendor_id: Uuid,
    name: &str,
    email: Option<String>,
    phone: Option<String>,
) -> Result<Model, ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("name required".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        vendor_id: Set(vendor_id),
        name: Set(name.to_string()),
        email: Set(email),
        phone: Set(phone),
        qr_payload: Set(None),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

/// Attach the enrollment artifact reference after creation.
pub async fn set_qr_payload<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    payload: &str,
) -> Result<Model, ModelError> {
    let found = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?
        .ok_or(ModelError::NotFound("customer"))?;
    let mut am: ActiveModel = found.into();
    am.qr_payload = Set(Some(payload.to_string()));
    am.update(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn list_by_vendor<C: ConnectionTrait>(
    db: &C,
    vendor_id: Uuid,
) -> Result<Vec<Model>, ModelError> {
    Entity::find()
        .filter(Column::VendorId.eq(vendor_id))
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

/// Partial update. `name` replaces when present; `email` and `phone`
/// distinguish "leave alone" (outer `None`) from "clear" (`Some(None)`).
pub async fn update_fields<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    name: Option<String>,
    email: Option<Option<String>>,
    phone: Option<Option<String>>,
) -> Result<Model, ModelError> {
    let found = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?
        .ok_or(ModelError::NotFound("customer"))?;
    let mut am: ActiveModel = found.into();
    if let Some(name) = name {
        if name.trim().is_empty() {
            return Err(ModelError::Validation("name required".into()));
        }
        am.name = Set(name);
    }
    if let Some(email) = email {
        am.email = Set(email);
    }
    if let Some(phone) = phone {
        am.phone = Set(phone);
    }
    am.update(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn hard_delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<(), ModelError> {
    Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(())
}
