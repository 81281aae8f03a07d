//! ChainLens 主入口

use std::sync::Arc;

use anyhow::Result;
use chainlens::{api, app_state::AppState, config::Config, infrastructure::logging};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. 加载环境变量（.env 可选）
    dotenvy::dotenv().ok();

    // 2. 加载配置（环境变量 + 可选 CONFIG_PATH 文件）
    let config = Config::load()?;

    // 3. 初始化日志
    logging::init_logging(&config.logging).map_err(|e| anyhow::anyhow!(e))?;

    // 4. 构建链客户端；配置缺失直接退出
    let state = match AppState::initialize(&config) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!(error = %e, "startup configuration invalid");
            return Err(e.into());
        }
    };

    // 5. 启动 HTTP 服务
    let app = api::routes(state);
    let addr = (config.server.host.as_str(), config.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server running on port {}", config.server.port);

    axum::serve(listener, app).await?;
    Ok(())
}
