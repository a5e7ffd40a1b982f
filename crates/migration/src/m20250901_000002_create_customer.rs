//! Create `customer` table with FK to `vendor`.
//!
//! `qr_payload` is nullable: it is attached after the enrollment artifact
//! has been written.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customer::Table)
                    .if_not_exists()
                    .col(uuid(Customer::Id).primary_key())
                    .col(uuid(Customer::VendorId).not_null())
                    .col(string_len(Customer::Name, 128).not_null())
                    .col(ColumnDef::new(Customer::Email).string_len(255).null())
                    .col(ColumnDef::new(Customer::Phone).string_len(32).null())
                    .col(ColumnDef::new(Customer::QrPayload).string().null())
                    .col(timestamp_with_time_zone(Customer::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_vendor")
                            .from(Customer::Table, Customer::VendorId)
                            .to(Vendor::Table, Vendor::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Customer::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Customer { Table, Id, VendorId, Name, Email, Phone, QrPayload, CreatedAt }

#[derive(DeriveIden)]
enum Vendor { Table, Id }
