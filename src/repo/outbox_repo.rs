use crate::domain::events::OrderPaidEvent;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Row, Transaction};

// A claimed row, payload already rendered as the JSON text that goes on the stream.
#[derive(Debug, Clone)]
pub struct ClaimedEvent {
    pub id: i64,
    pub order_number: String,
    pub event_type: String,
    pub payload: String,
    pub attempts: i32,
}

#[derive(Clone)]
pub struct OutboxRepo {
    pub pool: PgPool,
}

impl OutboxRepo {
    // Runs inside the transaction that marks the order paid. UNIQUE(order_number, event_type)
    // turns a second confirmation into a no-op.
    pub async fn enqueue_paid(tx: &mut Transaction<'_, Postgres>, event: &OrderPaidEvent) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO order_events_outbox (order_number, event_type, payload_json)
            VALUES ($1, $2, $3)
            ON CONFLICT (order_number, event_type) DO NOTHING
            "#,
        )
        .bind(&event.order_number)
        .bind(event.event_type())
        .bind(serde_json::to_value(event)?)
        .execute(tx.as_mut())
        .await?;

        Ok(())
    }

    pub async fn claim_due(&self, limit: i64) -> Result<Vec<ClaimedEvent>> {
        let rows = sqlx::query(
            r#"
            UPDATE order_events_outbox
            SET status = 'PROCESSING', updated_at = now()
            WHERE id IN (
                SELECT id FROM order_events_outbox
                WHERE status = 'PENDING' AND next_attempt_at <= now()
                ORDER BY id
                LIMIT $1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING id, order_number, event_type, payload_json::text AS payload, attempts
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut claimed: Vec<ClaimedEvent> = rows
            .iter()
            .map(|r| ClaimedEvent {
                id: r.get("id"),
                order_number: r.get("order_number"),
                event_type: r.get("event_type"),
                payload: r.get("payload"),
                attempts: r.get("attempts"),
            })
            .collect();
        // RETURNING does not keep the subquery order.
        claimed.sort_by_key(|e| e.id);
        Ok(claimed)
    }

    pub async fn mark_published(&self, id: i64) -> Result<()> {
        sqlx::query(
            "UPDATE order_events_outbox SET status = 'PUBLISHED', published_at = now(), updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn release_for_retry(&self, event: &ClaimedEvent, retry_at: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE order_events_outbox
            SET status = 'PENDING', attempts = attempts + 1, next_attempt_at = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(event.id)
        .bind(retry_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
