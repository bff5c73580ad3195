use crate::domain::events::OrderPaidEvent;
use crate::domain::order::{GatewayPayment, Order};
use crate::domain::payment::PaymentStatus;
use crate::repo::outbox_repo::OutboxRepo;
use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

pub const VNPAY_METHOD: &str = "vnpay";

// Transitions only apply to orders that are not paid or refunded. When the
// return redirect and the IPN race, exactly one confirm_paid reports true.
#[async_trait::async_trait]
pub trait OrderStore: Send + Sync {
    async fn find_by_order_number(&self, order_number: &str) -> Result<Option<Order>>;
    async fn mark_awaiting_vnpay(&self, order_number: &str) -> Result<()>;
    async fn confirm_paid(&self, order_number: &str, payment: &GatewayPayment) -> Result<bool>;
    async fn mark_failed(&self, order_number: &str, reason: &str) -> Result<bool>;
}

#[derive(Clone)]
pub struct OrdersRepo {
    pub pool: PgPool,
}

fn order_from_row(r: &PgRow) -> Order {
    let status: String = r.get("payment_status");
    Order {
        order_number: r.get("order_number"),
        total_amount: r.get("total_amount"),
        payment_method: r.get("payment_method"),
        payment_status: PaymentStatus::parse(&status),
        paid_at: r.get("paid_at"),
        vnpay_transaction_no: r.get("vnpay_transaction_no"),
        vnpay_bank_code: r.get("vnpay_bank_code"),
        vnpay_pay_date: r.get("vnpay_pay_date"),
        payment_fail_reason: r.get("payment_fail_reason"),
    }
}

#[async_trait::async_trait]
impl OrderStore for OrdersRepo {
    async fn find_by_order_number(&self, order_number: &str) -> Result<Option<Order>> {
        let row = sqlx::query(
            r#"
            SELECT order_number, total_amount, payment_method, payment_status, paid_at,
                   vnpay_transaction_no, vnpay_bank_code, vnpay_pay_date, payment_fail_reason
            FROM orders
            WHERE order_number = $1
            "#,
        )
        .bind(order_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(order_from_row))
    }

    async fn mark_awaiting_vnpay(&self, order_number: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE orders
            SET payment_method = $2, payment_status = 'pending', updated_at = now()
            WHERE order_number = $1 AND payment_status NOT IN ('paid', 'refunded')
            "#,
        )
        .bind(order_number)
        .bind(VNPAY_METHOD)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn confirm_paid(&self, order_number: &str, payment: &GatewayPayment) -> Result<bool> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(
            r#"
            UPDATE orders
            SET payment_status = 'paid',
                paid_at = now(),
                vnpay_transaction_no = $2,
                vnpay_bank_code = $3,
                vnpay_pay_date = $4,
                payment_fail_reason = NULL,
                updated_at = now()
            WHERE order_number = $1 AND payment_status NOT IN ('paid', 'refunded')
            RETURNING total_amount, payment_method
            "#,
        )
        .bind(order_number)
        .bind(payment.transaction_no.as_deref())
        .bind(payment.bank_code.as_deref())
        .bind(payment.pay_date.as_deref())
        .fetch_optional(tx.as_mut())
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(false);
        };

        let payment_method: String = row.get("payment_method");
        let event = OrderPaidEvent::new(order_number, row.get("total_amount"), &payment_method, payment);
        OutboxRepo::enqueue_paid(&mut tx, &event).await?;
        tx.commit().await?;

        Ok(true)
    }

    async fn mark_failed(&self, order_number: &str, reason: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET payment_status = 'failed', payment_fail_reason = $2, updated_at = now()
            WHERE order_number = $1 AND payment_status NOT IN ('paid', 'refunded')
            "#,
        )
        .bind(order_number)
        .bind(reason)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
