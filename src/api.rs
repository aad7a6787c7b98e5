//! HTTP surface used by the admin UI.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use validator::Validate;

use crate::config::Config;
use crate::domain::aggregates::{OrderError, Seller, WtbOrder, WtbOrderSubmission};
use crate::domain::events::DomainEvent;
use crate::domain::pricing::{self, BulkPricing, BulkPricingError, PricingInput, PricingResult, VatTreatment};
use crate::domain::value_objects::{CountryCode, Money, Sku, VatRate};
use crate::domain::vat_rates;
use crate::AdminError;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub nats: Option<async_nats::Client>,
}

impl AppState {
    pub fn new(config: Config, nats: Option<async_nats::Client>) -> Self {
        Self { config: Arc::new(config), nats }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "sneakerask-admin"})) }))
        .route("/api/v1/pricing", post(compute_pricing))
        .route("/api/v1/pricing/bulk", post(compute_bulk_pricing))
        .route("/api/v1/pricing/suggest-payout", post(suggest_payout))
        .route("/api/v1/vat-rates", get(list_vat_rates))
        .route("/api/v1/vat-rates/:country", get(get_vat_rate))
        .route("/api/v1/wtb-orders", post(create_wtb_order))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, error, field, line) = match &self {
            AdminError::Validation(e) | AdminError::Order(OrderError::Pricing(e)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.code(), Some(e.field()), None)
            }
            AdminError::BulkPricing(e) => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.source.code(), Some(e.source.field()), Some(e.index))
            }
            AdminError::Order(_) => (StatusCode::CONFLICT, "invalid_order_state", None, None),
            AdminError::Seller(_) | AdminError::Sku(_) | AdminError::Country(_) | AdminError::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, "bad_request", None, None)
            }
            AdminError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", None, None),
        };
        if status.is_client_error() {
            tracing::debug!(%status, error, %message, "request rejected");
        }
        (status, Json(ErrorBody { error, message, field, line })).into_response()
    }
}

impl From<validator::ValidationErrors> for AdminError {
    fn from(e: validator::ValidationErrors) -> Self { AdminError::InvalidRequest(e.to_string()) }
}

// =============================================================================
// Pricing
// =============================================================================

/// Pricing form as the UI submits it: amounts and rates are raw text.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PricingRequest {
    #[validate(length(min = 1, max = 32))]
    pub listed_price: String,
    #[validate(length(min = 1, max = 32))]
    pub seller_payout: String,
    pub treatment: VatTreatment,
    #[serde(default)]
    pub refund_included: bool,
    /// Explicit buyer rate; takes precedence over `buyer_country`.
    pub buyer_country_vat_rate: Option<String>,
    pub buyer_country: Option<String>,
}

impl PricingRequest {
    pub fn to_input(&self) -> crate::Result<PricingInput> {
        let buyer_country_vat_rate = match (&self.buyer_country_vat_rate, &self.buyer_country) {
            (Some(rate), _) => Some(VatRate::parse("buyer_country_vat_rate", rate)?),
            (None, Some(country)) => vat_rates::standard_rate(&CountryCode::new(country)?),
            (None, None) => None,
        };
        Ok(PricingInput {
            listed_price: Money::parse("listed_price", &self.listed_price)?,
            treatment: self.treatment,
            refund_included: self.refund_included,
            seller_payout: Money::parse("seller_payout", &self.seller_payout)?,
            buyer_country_vat_rate,
        })
    }
}

async fn compute_pricing(Json(r): Json<PricingRequest>) -> crate::Result<Json<PricingResult>> {
    r.validate()?;
    let result = pricing::compute_pricing(&r.to_input()?)?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize, Validate)]
pub struct BulkPricingRequest {
    #[validate(length(min = 1, max = 200))]
    pub items: Vec<PricingRequest>,
}

async fn compute_bulk_pricing(Json(r): Json<BulkPricingRequest>) -> crate::Result<Json<BulkPricing>> {
    r.validate()?;
    let mut inputs = Vec::with_capacity(r.items.len());
    for (index, item) in r.items.iter().enumerate() {
        item.validate()?;
        let input = item.to_input().map_err(|e| match e {
            AdminError::Validation(source) => AdminError::BulkPricing(BulkPricingError { index, source }),
            other => other,
        })?;
        inputs.push(input);
    }
    let bulk = pricing::compute_bulk_pricing(&inputs)?;
    tracing::info!(lines = bulk.lines.len(), profit_total = %bulk.profit_total, "bulk pricing computed");
    Ok(Json(bulk))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SuggestPayoutRequest {
    #[validate(length(min = 1, max = 32))]
    pub listed_price: String,
    /// Seller's own rate; the configured default applies when absent.
    pub seller_vat_rate: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestPayoutResponse {
    pub suggested_payout: Money,
    pub seller_vat_rate: VatRate,
}

async fn suggest_payout(State(s): State<AppState>, Json(r): Json<SuggestPayoutRequest>) -> crate::Result<Json<SuggestPayoutResponse>> {
    r.validate()?;
    let seller_vat_rate = match &r.seller_vat_rate {
        Some(rate) => VatRate::parse("seller_vat_rate", rate)?,
        None => s.config.default_seller_vat_rate,
    };
    let suggested_payout = pricing::suggest_payout(Money::parse("listed_price", &r.listed_price)?, seller_vat_rate)?;
    Ok(Json(SuggestPayoutResponse { suggested_payout, seller_vat_rate }))
}

// =============================================================================
// VAT reference data
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct VatRateEntry {
    pub country: String,
    pub rate: VatRate,
}

async fn list_vat_rates() -> Json<Vec<VatRateEntry>> {
    Json(vat_rates::all().iter().map(|(country, rate)| VatRateEntry { country: country.to_string(), rate: *rate }).collect())
}

async fn get_vat_rate(Path(country): Path<String>) -> crate::Result<Json<VatRateEntry>> {
    let code = CountryCode::new(&country)?;
    let rate = vat_rates::standard_rate(&code).ok_or_else(|| AdminError::NotFound(format!("VAT rate for {code}")))?;
    Ok(Json(VatRateEntry { country: code.to_string(), rate }))
}

// =============================================================================
// WTB orders
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct CreateWtbOrderRequest {
    #[validate(length(min = 1, max = 64))]
    pub customer_order_ref: String,
    pub sku: String,
    #[validate(length(min = 1, max = 32))]
    pub listed_price: String,
    pub buyer_country: String,
    #[validate(length(min = 1, max = 120))]
    pub seller_name: String,
    pub seller_country: String,
    pub seller_treatment: VatTreatment,
    pub seller_vat_rate: Option<String>,
    /// Falls back to the seller's suggested payout when absent.
    pub seller_payout: Option<String>,
    #[serde(default)]
    pub refund_included: bool,
    /// Overrides the buyer country's standard rate.
    pub buyer_country_vat_rate: Option<String>,
}

async fn create_wtb_order(State(s): State<AppState>, Json(r): Json<CreateWtbOrderRequest>) -> crate::Result<(StatusCode, Json<WtbOrderSubmission>)> {
    r.validate()?;
    let listed_price = Money::parse("listed_price", &r.listed_price)?;

    let mut seller = Seller::create(&r.seller_name, CountryCode::new(&r.seller_country)?, r.seller_treatment)?;
    if let Some(rate) = &r.seller_vat_rate {
        seller = seller.with_vat_rate(VatRate::parse("seller_vat_rate", rate)?);
    }
    let payout = match &r.seller_payout {
        Some(payout) => Money::parse("seller_payout", payout)?,
        None => seller.suggested_payout(listed_price, s.config.default_seller_vat_rate)?,
    };

    let mut order = WtbOrder::create(&r.customer_order_ref, Sku::new(&r.sku)?, listed_price, CountryCode::new(&r.buyer_country)?)?;
    order.assign_seller(&seller, payout)?;
    match &r.buyer_country_vat_rate {
        Some(rate) => order.price_with_rate(r.refund_included, Some(VatRate::parse("buyer_country_vat_rate", rate)?))?,
        None => order.price(r.refund_included)?,
    };
    let submission = order.submit()?;
    tracing::info!(
        order_id = %submission.order_id,
        seller_id = %submission.seller_id,
        profit = %submission.profit_margin_net,
        "WTB order submitted"
    );

    publish_events(&s, order.take_events()).await;
    Ok((StatusCode::CREATED, Json(submission)))
}

async fn publish_events(s: &AppState, events: Vec<DomainEvent>) {
    let Some(nats) = &s.nats else { return };
    for event in events {
        let subject = format!("{}.{}", s.config.nats_subject_prefix, event.subject());
        let payload = match serde_json::to_vec(&event) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(%subject, error = %e, "failed to encode domain event");
                continue;
            }
        };
        if let Err(e) = nats.publish(subject.clone(), payload.into()).await {
            tracing::warn!(%subject, error = %e, "failed to publish domain event");
        }
    }
}
