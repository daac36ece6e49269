//! Student payment invoices

use super::models::{Invoice, InvoiceEnvelope};
use crate::error::Result;
use crate::http::{ApiRequest, HttpClient};
use crate::types::ApiScope;
use std::sync::Arc;

/// Invoice lookups on the user API
#[derive(Debug, Clone)]
pub struct PaymentApi {
    client: Arc<HttpClient>,
}

impl PaymentApi {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Invoice for a completed (or pending) payment
    pub async fn get_invoice(&self, payment_id: &str) -> Result<Invoice> {
        let request =
            ApiRequest::get(format!("/payments/{payment_id}/invoice")).scope(ApiScope::User);
        let envelope: InvoiceEnvelope = self.client.send_json(request).await?;
        Ok(envelope.invoice)
    }
}
