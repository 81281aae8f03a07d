//! EVM 质押查询 API

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    app_state::AppState,
    domain::StakingPosition,
    error::{GatewayError, Query},
    service::query_service,
};

/// GET /staking-info/:address
///
/// 地址不做格式校验，原样交给合约调用。
pub async fn get_staking_info(
    State(st): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Json<StakingPosition>, GatewayError> {
    let position = query_service::staking_position(&st, &address)
        .await
        .map_err(|e| GatewayError::upstream(Query::StakingInfo, e))?;

    crate::metrics::count_ok(Query::StakingInfo.endpoint());
    Ok(Json(position))
}
