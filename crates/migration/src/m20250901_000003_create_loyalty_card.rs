//! Create `loyalty_card` table with FKs to `vendor` and `customer`.
//!
//! Deleting a customer cascades to its cards so no orphaned card can
//! reference a missing customer.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LoyaltyCard::Table)
                    .if_not_exists()
                    .col(uuid(LoyaltyCard::Id).primary_key())
                    .col(uuid(LoyaltyCard::VendorId).not_null())
                    .col(uuid(LoyaltyCard::CustomerId).not_null())
                    .col(integer(LoyaltyCard::Punches).not_null())
                    .col(integer(LoyaltyCard::RewardThreshold).not_null())
                    .col(boolean(LoyaltyCard::RewardClaimed).not_null())
                    .col(timestamp_with_time_zone(LoyaltyCard::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(LoyaltyCard::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_card_vendor")
                            .from(LoyaltyCard::Table, LoyaltyCard::VendorId)
                            .to(Vendor::Table, Vendor::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_card_customer")
                            .from(LoyaltyCard::Table, LoyaltyCard::CustomerId)
                            .to(Customer::Table, Customer::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(LoyaltyCard::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum LoyaltyCard { Table, Id, VendorId, CustomerId, Punches, RewardThreshold, RewardClaimed, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Vendor { Table, Id }

#[derive(DeriveIden)]
enum Customer { Table, Id }
