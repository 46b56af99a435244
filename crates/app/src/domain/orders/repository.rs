//! Orders Repository

use dukkan::{
    carts::CartLine,
    orders::{OrderStatus, OrderTotals},
    payments::{PaymentMethod, PaymentStatus},
    shipping::ShippingType,
};
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, types::Json};

use crate::{
    auth::UserUuid,
    database::{amount_to_db, try_get_amount, try_get_parsed},
    domain::{
        addresses::models::AddressFields,
        orders::models::{Order, OrderUuid, PaymentDetails, PaymentUpdate},
    },
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("sql/lock_order.sql");
const LOCK_ORDER_BY_INVOICE_SQL: &str = include_str!("sql/lock_order_by_invoice.sql");
const SET_INVOICE_SQL: &str = include_str!("sql/set_invoice.sql");
const UPDATE_STATUS_SQL: &str = include_str!("sql/update_status.sql");
const UPDATE_PAYMENT_SQL: &str = include_str!("sql/update_payment.sql");

/// Everything frozen onto a new order row.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OrderDraft<'a> {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub lines: &'a [CartLine],
    pub address: &'a AddressFields,
    pub payment_method: PaymentMethod,
    pub totals: &'a OrderTotals,
    pub coupon_code: Option<&'a str>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        draft: OrderDraft<'_>,
    ) -> Result<Order, sqlx::Error> {
        let totals = draft.totals;

        query_as::<Postgres, Order>(CREATE_ORDER_SQL)
            .bind(draft.uuid)
            .bind(draft.user_uuid)
            .bind(Json(draft.lines))
            .bind(Json(draft.address))
            .bind(draft.payment_method.as_str())
            .bind(PaymentStatus::Pending.as_str())
            .bind(totals.shipping_type.map(|shipping_type| shipping_type.as_str()))
            .bind(amount_to_db(totals.shipping_cost, "shipping_cost")?)
            .bind(draft.coupon_code)
            .bind(totals.coupon_message())
            .bind(amount_to_db(totals.discount_value, "discount_value")?)
            .bind(amount_to_db(totals.subtotal, "subtotal")?)
            .bind(amount_to_db(totals.total, "total")?)
            .bind(totals.has_free_shipping)
            .bind(OrderStatus::Pending.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(LIST_ORDERS_SQL)
            .bind(user)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order)
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch an order and hold its row lock until the transaction ends.
    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(LOCK_ORDER_SQL)
            .bind(order)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn lock_order_by_invoice(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        invoice_id: &str,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(LOCK_ORDER_BY_INVOICE_SQL)
            .bind(invoice_id)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_invoice(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        invoice_id: &str,
        payment_url: &str,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(SET_INVOICE_SQL)
            .bind(order)
            .bind(invoice_id)
            .bind(payment_url)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(UPDATE_STATUS_SQL)
            .bind(order)
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    /// Write a payment transition. Unset reference fields keep their value.
    pub(crate) async fn update_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        update: &PaymentUpdate,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(UPDATE_PAYMENT_SQL)
            .bind(order)
            .bind(update.payment_status.as_str())
            .bind(update.order_status.as_str())
            .bind(update.transaction_id.as_deref())
            .bind(update.paid_at.map(SqlxTimestamp::from))
            .bind(update.refund_id.as_deref())
            .bind(update.refunded_at.map(SqlxTimestamp::from))
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let Json(lines) = row.try_get::<Json<Vec<CartLine>>, _>("items")?;
        let Json(address) = row.try_get::<Json<AddressFields>, _>("address")?;

        let shipping_type = row
            .try_get::<Option<String>, _>("shipping_type")?
            .map(|raw| {
                raw.parse::<ShippingType>().map_err(|e| sqlx::Error::ColumnDecode {
                    index: "shipping_type".to_owned(),
                    source: Box::new(e),
                })
            })
            .transpose()?;

        Ok(Self {
            uuid: row.try_get("uuid")?,
            user_uuid: row.try_get("user_uuid")?,
            lines,
            address,
            payment_method: try_get_parsed(row, "payment_method")?,
            payment: PaymentDetails {
                status: try_get_parsed(row, "payment_status")?,
                invoice_id: row.try_get("invoice_id")?,
                payment_url: row.try_get("payment_url")?,
                transaction_id: row.try_get("transaction_id")?,
                paid_at: row
                    .try_get::<Option<SqlxTimestamp>, _>("paid_at")?
                    .map(SqlxTimestamp::to_jiff),
                refund_id: row.try_get("refund_id")?,
                refunded_at: row
                    .try_get::<Option<SqlxTimestamp>, _>("refunded_at")?
                    .map(SqlxTimestamp::to_jiff),
            },
            shipping_type,
            shipping_cost: try_get_amount(row, "shipping_cost")?,
            coupon_code: row.try_get("coupon_code")?,
            coupon_message: row.try_get("coupon_message")?,
            discount_value: try_get_amount(row, "discount_value")?,
            subtotal: try_get_amount(row, "subtotal")?,
            total: try_get_amount(row, "total")?,
            has_free_shipping: row.try_get("has_free_shipping")?,
            status: try_get_parsed(row, "status")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
