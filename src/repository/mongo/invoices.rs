use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::{Collection, Database};

use super::{collect_all, find_by, natural_order, set_fields, INVOICE_COLLECTION};
use crate::domain::{Invoice, InvoiceChanges};
use crate::error::AppError;
use crate::repository::InvoiceRepository;

pub struct MongoInvoices {
    collection: Collection<Invoice>,
}

impl MongoInvoices {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(INVOICE_COLLECTION),
        }
    }
}

#[async_trait]
impl InvoiceRepository for MongoInvoices {
    async fn insert(&self, invoice: &Invoice) -> Result<(), AppError> {
        self.collection.insert_one(invoice, None).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Invoice>, AppError> {
        collect_all(&self.collection, doc! {}, natural_order()).await
    }

    async fn find(&self, invoice_id: &str) -> Result<Option<Invoice>, AppError> {
        find_by(&self.collection, "invoiceId", invoice_id).await
    }

    async fn update(
        &self,
        invoice_id: &str,
        changes: &InvoiceChanges,
    ) -> Result<Option<Invoice>, AppError> {
        set_fields(&self.collection, "invoiceId", invoice_id, changes).await
    }
}
