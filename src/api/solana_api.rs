//! Solana 代币查询 API

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    app_state::AppState,
    domain::{TokenBalance, TokenSupply},
    error::{GatewayError, Query},
    service::query_service,
};

/// GET /solana/token-supply
pub async fn get_token_supply(
    State(st): State<Arc<AppState>>,
) -> Result<Json<TokenSupply>, GatewayError> {
    let supply = query_service::token_supply(&st)
        .await
        .map_err(|e| GatewayError::upstream(Query::TokenSupply, e))?;

    crate::metrics::count_ok(Query::TokenSupply.endpoint());
    Ok(Json(supply))
}

/// GET /solana/token-balance/:address
pub async fn get_token_balance(
    State(st): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Json<TokenBalance>, GatewayError> {
    let balance = query_service::token_balance(&st, &address)
        .await
        .map_err(|e| GatewayError::upstream(Query::TokenBalance, e))?;

    crate::metrics::count_ok(Query::TokenBalance.endpoint());
    Ok(Json(balance))
}
