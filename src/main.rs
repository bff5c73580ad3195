use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use vnpay_checkout::config::{AppConfig, VnpayConfig};
use vnpay_checkout::http::routes::router;
use vnpay_checkout::repo::orders_repo::OrdersRepo;
use vnpay_checkout::repo::outbox_repo::OutboxRepo;
use vnpay_checkout::service::outbox_relay::OutboxRelay;
use vnpay_checkout::service::vnpay_service::VnpayService;
use vnpay_checkout::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();
    let vnpay_cfg = VnpayConfig::from_env()?;
    tracing::info!("vnpay merchant {} -> {}", vnpay_cfg.tmn_code, vnpay_cfg.pay_url);

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let redis_client = redis::Client::open(cfg.redis_url.clone())?;

    let relay = OutboxRelay {
        outbox_repo: OutboxRepo { pool: pool.clone() },
        redis_client: redis_client.clone(),
        stream_key: cfg.stream_key.clone(),
    };
    tokio::spawn(relay.run());

    let state = AppState {
        vnpay_service: VnpayService {
            config: vnpay_cfg,
            orders: Arc::new(OrdersRepo { pool: pool.clone() }),
        },
        pool,
        redis_client,
    };

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}
