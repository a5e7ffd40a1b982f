use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Customers: index on vendor_id for tenant-scoped listing
        manager
            .create_index(
                Index::create()
                    .name("idx_customer_vendor")
                    .table(Customer::Table)
                    .col(Customer::VendorId)
                    .to_owned(),
            )
            .await?;

        // LoyaltyCard: composite unique (vendor_id, customer_id).
        // One live card per pair; a concurrent create races into a
        // unique-violation which the service maps to a conflict.
        manager
            .create_index(
                Index::create()
                    .name("uniq_card_vendor_customer")
                    .table(LoyaltyCard::Table)
                    .col(LoyaltyCard::VendorId)
                    .col(LoyaltyCard::CustomerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // LoyaltyCard: index on vendor_id and created_at for ordered listing
        manager
            .create_index(
                Index::create()
                    .name("idx_card_vendor")
                    .table(LoyaltyCard::Table)
                    .col(LoyaltyCard::VendorId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_card_created_at")
                    .table(LoyaltyCard::Table)
                    .col(LoyaltyCard::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_customer_vendor").table(Customer::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_card_vendor_customer").table(LoyaltyCard::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_card_vendor").table(LoyaltyCard::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_card_created_at").table(LoyaltyCard::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Customer { Table, VendorId }

#[derive(DeriveIden)]
enum LoyaltyCard { Table, VendorId, CustomerId, CreatedAt }
