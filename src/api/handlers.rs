//! API Handlers
//!
//! HTTP request handlers for each cart endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap},
    Json,
};

use crate::auth::{AuthResponse, SessionStore};
use crate::error::{LedgerError, Result};
use crate::ledger::{CartLedger, ProductId};
use crate::models::{
    AddItemRequest, CartResponse, CheckoutResponse, CountResponse, HealthResponse,
    SessionResponse, TotalsResponse, UpdateQuantityRequest,
};
use crate::store::MemoryStore;

/// Application state shared across all handlers.
///
/// The ledger and the session store write to the same key-value store.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe cart ledger
    pub ledger: Arc<RwLock<CartLedger<MemoryStore>>>,
    /// Stored auth session
    pub sessions: SessionStore<MemoryStore>,
}

impl AppState {
    /// Creates a new AppState around `ledger`, keeping sessions in the ledger's store.
    pub fn new(ledger: CartLedger<MemoryStore>) -> Self {
        let sessions = SessionStore::new(ledger.store().clone());
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
            sessions,
        }
    }

    /// Creates a new AppState from configuration with an empty store.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(CartLedger::from_config(MemoryStore::new(), config))
    }
}

fn cart_response(ledger: &CartLedger<MemoryStore>) -> Result<CartResponse> {
    let items = ledger.items();
    let totals = crate::ledger::compute_totals(&items, ledger.pricing())?;

    Ok(CartResponse {
        state: ledger.state(),
        item_count: items.iter().map(|item| u64::from(item.quantity)).sum(),
        items,
        totals: TotalsResponse::new(totals, ledger.pricing()),
    })
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Handler for GET /cart
pub async fn get_cart_handler(State(state): State<AppState>) -> Result<Json<CartResponse>> {
    let ledger = state.ledger.read().await;
    Ok(Json(cart_response(&ledger)?))
}

/// Handler for POST /cart/items
///
/// Adds a product, incrementing an existing line for the same product.
pub async fn add_item_handler(
    State(state): State<AppState>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<CartResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(LedgerError::InvalidRequest(error_msg));
    }

    let mut ledger = state.ledger.write().await;
    ledger.add_item(req.product, req.quantity)?;

    Ok(Json(cart_response(&ledger)?))
}

/// Handler for PATCH /cart/items/:id
///
/// Quantities below 1 leave the cart unchanged.
pub async fn update_quantity_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<UpdateQuantityRequest>,
) -> Result<Json<CartResponse>> {
    let mut ledger = state.ledger.write().await;
    ledger.update_quantity(ProductId(id), req.quantity)?;

    Ok(Json(cart_response(&ledger)?))
}

/// Handler for DELETE /cart/items/:id
///
/// Idempotent: removing an absent product succeeds.
pub async fn remove_item_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<CartResponse>> {
    let mut ledger = state.ledger.write().await;
    ledger.remove_item(ProductId(id))?;

    Ok(Json(cart_response(&ledger)?))
}

/// Handler for GET /cart/totals
pub async fn totals_handler(State(state): State<AppState>) -> Result<Json<TotalsResponse>> {
    let ledger = state.ledger.read().await;
    Ok(Json(TotalsResponse::new(ledger.totals()?, ledger.pricing())))
}

/// Handler for GET /cart/count
pub async fn count_handler(State(state): State<AppState>) -> Json<CountResponse> {
    let ledger = state.ledger.read().await;
    Json(CountResponse {
        count: ledger.item_count(),
    })
}

/// Handler for POST /cart/checkout
///
/// The bearer token must match the stored session.
pub async fn checkout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CheckoutResponse>> {
    let session = match (bearer_token(&headers), state.sessions.session()) {
        (Some(token), Some(session)) if session.token == token => Some(session),
        _ => None,
    };

    let mut ledger = state.ledger.write().await;
    let confirmation = ledger.checkout(session.as_ref())?;

    Ok(Json(CheckoutResponse::new(confirmation)))
}

/// Handler for PUT /session
///
/// Stores the response of a successful register or login call.
pub async fn put_session_handler(
    State(state): State<AppState>,
    Json(auth): Json<AuthResponse>,
) -> Result<Json<SessionResponse>> {
    let session = state
        .sessions
        .save(&auth)?
        .ok_or_else(|| LedgerError::InvalidRequest("Auth response carries no token".to_string()))?;

    Ok(Json(SessionResponse {
        authenticated: true,
        user: Some(session.user),
    }))
}

/// Handler for DELETE /session
pub async fn delete_session_handler(State(state): State<AppState>) -> Json<SessionResponse> {
    state.sessions.logout();
    Json(SessionResponse {
        authenticated: false,
        user: None,
    })
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::ledger::Product;
    use axum::http::HeaderValue;
    use rust_decimal_macros::dec;

    fn test_state() -> AppState {
        AppState::new(CartLedger::new(MemoryStore::new()))
    }

    fn add_request(id: u64, price: rust_decimal::Decimal) -> AddItemRequest {
        AddItemRequest {
            product: Product::new(id, format!("product-{id}"), price, 10),
            quantity: 1,
        }
    }

    fn login(state: &AppState) {
        state
            .sessions
            .save(&AuthResponse {
                token: Some("jwt".to_string()),
                token_type: Some("Bearer".to_string()),
                user_id: 1,
                name: "Asha".to_string(),
                email: "asha@example.com".to_string(),
                role: Role::User,
                message: None,
            })
            .unwrap();
    }

    #[tokio::test]
    async fn test_add_and_get_cart() {
        let state = test_state();

        let result = add_item_handler(State(state.clone()), Json(add_request(1, dec!(600)))).await;
        assert!(result.is_ok());

        let response = get_cart_handler(State(state)).await.unwrap();
        assert_eq!(response.item_count, 1);
        assert_eq!(response.totals.exact.total, dec!(758));
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let state = test_state();
        add_item_handler(State(state.clone()), Json(add_request(1, dec!(100))))
            .await
            .unwrap();

        let response = update_quantity_handler(
            State(state.clone()),
            Path(1),
            Json(UpdateQuantityRequest { quantity: 4 }),
        )
        .await
        .unwrap();
        assert_eq!(response.item_count, 4);

        let response = remove_item_handler(State(state), Path(1)).await.unwrap();
        assert!(response.items.is_empty());
    }

    #[tokio::test]
    async fn test_add_invalid_request() {
        let state = test_state();
        let mut req = add_request(1, dec!(10));
        req.product.name = String::new();

        let result = add_item_handler(State(state), Json(req)).await;
        assert!(matches!(result, Err(LedgerError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_add_out_of_range_leaves_cart_readable() {
        let state = test_state();
        let req = AddItemRequest {
            product: Product::new(1, "Gold", dec!(100000000000000000000000000), 0),
            quantity: 4_000_000_000,
        };

        let result = add_item_handler(State(state.clone()), Json(req)).await;
        assert!(matches!(result, Err(LedgerError::AmountOverflow)));

        let response = get_cart_handler(State(state.clone())).await.unwrap();
        assert!(response.items.is_empty());
        assert!(totals_handler(State(state)).await.is_ok());
    }

    #[tokio::test]
    async fn test_checkout_without_token() {
        let state = test_state();
        login(&state);
        add_item_handler(State(state.clone()), Json(add_request(1, dec!(100))))
            .await
            .unwrap();

        let result = checkout_handler(State(state.clone()), HeaderMap::new()).await;
        assert!(matches!(result, Err(LedgerError::Unauthenticated)));
        assert_eq!(count_handler(State(state)).await.count, 1);
    }

    #[tokio::test]
    async fn test_checkout_with_matching_token() {
        let state = test_state();
        login(&state);
        add_item_handler(State(state.clone()), Json(add_request(1, dec!(100))))
            .await
            .unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer jwt"));

        let response = checkout_handler(State(state.clone()), headers).await.unwrap();
        assert_eq!(response.confirmation.item_count, 1);
        assert_eq!(count_handler(State(state)).await.count, 0);
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers), Some("abc"));
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
