//! Request lifecycle tracking.
//!
//! A [`TranslationRequest`] follows one job from draft through quoting,
//! ordering and translation to the final import. The record is in-memory;
//! persisting it between transitions is the embedding application's job.
//! The one hard rule lives in [`TranslationRequest::import_response`]: the
//! raw provider response is archived on the order before any parsing is
//! attempted, so a failed import always leaves the untouched snapshot plus
//! the raw response behind for manual reconciliation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::TranslationsConf;
use crate::content::{ContentTree, ItemId};
use crate::error::{Result, TranslationsError};
use crate::exchange::capability::CapabilityRegistry;
use crate::exchange::export::{TranslationGroup, flatten};
use crate::exchange::import::merge;
use crate::exchange::wire::ProviderPayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    Draft,
    Open,
    PendingQuote,
    PendingApproval,
    ReadyForSubmission,
    InTranslation,
    ImportStarted,
    ImportFailed,
    Imported,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    Open,
    Pending,
    Failed,
    Done,
}

/// One pricing option received from a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub delivery_date: Option<DateTime<Utc>>,
    pub price_currency: String,
    pub price_amount: f64,
    /// Opaque options echoed back to the provider when ordering
    #[serde(default)]
    pub provider_options: Value,
    pub date_received: DateTime<Utc>,
}

/// The order placed with a provider once a quote is approved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationOrder {
    pub state: OrderState,
    pub date_created: DateTime<Utc>,
    pub date_translated: Option<DateTime<Utc>>,
    /// What was sent to the provider
    #[serde(default)]
    pub request_content: Value,
    /// Raw provider response, archived verbatim before any parsing
    #[serde(default)]
    pub response_content: Option<String>,
    /// Opaque provider bookkeeping (order ids and the like)
    #[serde(default)]
    pub provider_details: Value,
}

impl TranslationOrder {
    pub fn new(request_content: Value) -> Self {
        Self {
            state: OrderState::Open,
            date_created: Utc::now(),
            date_translated: None,
            request_content,
            response_content: None,
            provider_details: Value::Null,
        }
    }
}

/// One translation job from draft to import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub state: RequestState,
    pub provider_backend: String,
    pub source_language: String,
    pub target_language: String,

    /// Export snapshot: one source tree per item
    pub items: Vec<(ItemId, ContentTree)>,

    pub quotes: Vec<Quote>,
    pub selected_quote: Option<usize>,
    pub order: Option<TranslationOrder>,

    pub date_created: DateTime<Utc>,
    pub date_submitted: Option<DateTime<Utc>>,
    pub date_received: Option<DateTime<Utc>>,
    pub date_imported: Option<DateTime<Utc>>,
}

impl TranslationRequest {
    pub fn new(
        provider_backend: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Result<Self> {
        let source_language = source_language.into();
        let target_language = target_language.into();
        crate::provider::validate_language(&source_language)?;
        crate::provider::validate_language(&target_language)?;

        Ok(Self {
            state: RequestState::Draft,
            provider_backend: provider_backend.into(),
            source_language,
            target_language,
            items: Vec::new(),
            quotes: Vec::new(),
            selected_quote: None,
            order: None,
            date_created: Utc::now(),
            date_submitted: None,
            date_received: None,
            date_imported: None,
        })
    }

    fn set_state(&mut self, state: RequestState) {
        tracing::info!(from = ?self.state, to = ?state, "request state change");
        self.state = state;
    }

    /// Snapshot the source trees read from the CMS. Draft → Open.
    pub fn record_export(&mut self, items: Vec<(ItemId, ContentTree)>) {
        self.items = items;
        self.set_state(RequestState::Open);
    }

    /// Flatten the snapshot into the outbound provider payload
    pub fn export_payload(
        &self,
        registry: &CapabilityRegistry,
        conf: &TranslationsConf,
    ) -> Result<ProviderPayload> {
        let groups = flatten(&self.items, registry, conf)?;
        ProviderPayload::from_groups(&self.source_language, &self.target_language, &groups)
    }

    /// Mark the request as waiting for the provider's quote
    pub fn request_quote(&mut self) {
        self.set_state(RequestState::PendingQuote);
    }

    /// Record the quotes a provider answered with.
    /// PendingQuote → PendingApproval.
    pub fn quotes_received(&mut self, quotes: Vec<Quote>) {
        self.quotes = quotes;
        self.date_received = Some(Utc::now());
        self.set_state(RequestState::PendingApproval);
    }

    /// Approve one of the received quotes. PendingApproval →
    /// ReadyForSubmission.
    pub fn select_quote(&mut self, index: usize) -> Result<()> {
        if index >= self.quotes.len() {
            return Err(TranslationsError::InvalidState {
                action: "select a quote that was never received",
                state: self.state,
            });
        }
        self.selected_quote = Some(index);
        self.set_state(RequestState::ReadyForSubmission);
        Ok(())
    }

    /// Attach the placed order. ReadyForSubmission → InTranslation.
    pub fn order_submitted(&mut self, mut order: TranslationOrder) {
        order.state = OrderState::Pending;
        self.order = Some(order);
        self.date_submitted = Some(Utc::now());
        self.set_state(RequestState::InTranslation);
    }

    pub fn cancel(&mut self) {
        self.set_state(RequestState::Cancelled);
    }

    /// The snapshot items in submission batches of `bulk_batch_size`
    pub fn submission_batches<'a>(
        &'a self,
        conf: &TranslationsConf,
    ) -> impl Iterator<Item = &'a [(ItemId, ContentTree)]> {
        self.items.chunks(conf.bulk_batch_size.max(1))
    }

    /// Ingest the provider's callback response and merge it into the
    /// snapshot.
    ///
    /// The raw body is archived on the order first. Any parse or merge
    /// failure flips the request to ImportFailed and leaves the snapshot
    /// untouched; success yields the merged trees for the content-writing
    /// layer and the request ends up Imported.
    pub fn import_response(
        &mut self,
        raw: &str,
        registry: &CapabilityRegistry,
        conf: &TranslationsConf,
    ) -> Result<Vec<(ItemId, ContentTree)>> {
        if self.order.is_none() {
            return Err(TranslationsError::InvalidState {
                action: "import a response without an order",
                state: self.state,
            });
        }

        self.set_state(RequestState::ImportStarted);
        if let Some(order) = self.order.as_mut() {
            order.response_content = Some(raw.to_owned());
        }

        let groups = match self.parse_response(raw) {
            Ok(groups) => groups,
            Err(error) => {
                tracing::warn!(%error, "provider response rejected, archiving for reconciliation");
                self.fail_import();
                return Err(error);
            }
        };

        match merge(&self.items, &groups, registry, conf) {
            Ok(trees) => {
                self.complete_import();
                Ok(trees)
            }
            Err(error) => {
                tracing::warn!(%error, "merge failed, archiving for reconciliation");
                self.fail_import();
                Err(error)
            }
        }
    }

    fn parse_response(&self, raw: &str) -> Result<Vec<TranslationGroup>> {
        let payload: ProviderPayload = serde_json::from_str(raw)?;
        payload.into_groups()
    }

    fn fail_import(&mut self) {
        if let Some(order) = self.order.as_mut() {
            order.state = OrderState::Failed;
        }
        self.set_state(RequestState::ImportFailed);
    }

    fn complete_import(&mut self) {
        let now = Utc::now();
        if let Some(order) = self.order.as_mut() {
            order.state = OrderState::Done;
            order.date_translated = Some(now);
        }
        self.date_imported = Some(now);
        self.set_state(RequestState::Imported);
    }
}
