pub mod config;
pub mod domain {
    pub mod events;
    pub mod order;
    pub mod payment;
}
pub mod http {
    pub mod client_ip;
    pub mod handlers {
        pub mod ops;
        pub mod vnpay;
    }
    pub mod routes;
}
pub mod repo {
    pub mod orders_repo;
    pub mod outbox_repo;
}
pub mod service {
    pub mod outbox_relay;
    pub mod vnpay_service;
}
pub mod vnpay;

#[derive(Clone)]
pub struct AppState {
    pub vnpay_service: service::vnpay_service::VnpayService,
    pub pool: sqlx::PgPool,
    pub redis_client: redis::Client,
}
