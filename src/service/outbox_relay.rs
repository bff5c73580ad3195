use crate::repo::outbox_repo::{ClaimedEvent, OutboxRepo};
use anyhow::Result;
use chrono::{Duration, Utc};

const BATCH_SIZE: i64 = 100;
const STREAM_MAXLEN: i64 = 100_000;
const MAX_BACKOFF_SECS: i64 = 300;

#[derive(Clone)]
pub struct OutboxRelay {
    pub outbox_repo: OutboxRepo,
    pub redis_client: redis::Client,
    pub stream_key: String,
}

impl OutboxRelay {
    pub async fn run(self) {
        loop {
            if let Err(err) = self.tick().await {
                tracing::error!("order outbox relay error: {}", err);
            }
            tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        }
    }

    pub async fn tick(&self) -> Result<()> {
        let batch = self.outbox_repo.claim_due(BATCH_SIZE).await?;
        if batch.is_empty() {
            return Ok(());
        }

        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        for item in batch {
            match self.publish(&mut conn, &item).await {
                Ok(()) => {
                    self.outbox_repo.mark_published(item.id).await?;
                    tracing::debug!("published {} for order {}", item.event_type, item.order_number);
                }
                Err(e) => {
                    let attempts = item.attempts + 1;
                    let retry_at = Utc::now() + retry_backoff(attempts);
                    self.outbox_repo.release_for_retry(&item, retry_at).await?;
                    tracing::warn!(
                        "publishing {} for order {} failed (attempt {}): {}",
                        item.event_type,
                        item.order_number,
                        attempts,
                        e
                    );
                }
            }
        }

        Ok(())
    }

    async fn publish(&self, conn: &mut redis::aio::MultiplexedConnection, item: &ClaimedEvent) -> Result<()> {
        let _: String = redis::cmd("XADD")
            .arg(&self.stream_key)
            .arg("MAXLEN")
            .arg("~")
            .arg(STREAM_MAXLEN)
            .arg("*")
            .arg("type")
            .arg(&item.event_type)
            .arg("order")
            .arg(&item.order_number)
            .arg("event")
            .arg(&item.payload)
            .query_async(conn)
            .await?;
        Ok(())
    }
}

pub fn retry_backoff(attempts: i32) -> Duration {
    let exp = attempts.clamp(0, 9) as u32;
    Duration::seconds(i64::min(MAX_BACKOFF_SECS, 2_i64.pow(exp)))
}
