//! Orders service.

use std::sync::Arc;

use async_trait::async_trait;
use dukkan::{
    carts::CartLine,
    orders::{OrderStatus, OrderTotals, OrderTotalsInput, change_order_status, compute_order_totals},
    shipping::ShippingType,
};
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::{
    auth::{Principal, UserUuid},
    database::Db,
    domain::{
        addresses::repository::PgAddressesRepository,
        carts::store::CartStore,
        notifications::{NotificationDispatcher, models::NewNotification},
        offers::repository::PgOffersRepository,
        orders::{
            errors::OrdersServiceError,
            models::{CheckoutRequest, Order, OrderUuid, TotalsRequest},
            repository::{OrderDraft, PgOrdersRepository},
        },
        payments::{ExecutePayment, PaymentGateway, RedirectUrls},
        pricing::PricingInputs,
        products::repository::PgProductsRepository,
        shipping::repository::PgShippingRepository,
    },
};

/// Repriced cart plus the inputs used to price it.
struct PricedCart {
    lines: Vec<CartLine>,
    inputs: PricingInputs,
}

/// Shipping and coupon choices for one totals computation.
struct TotalsChoice<'a> {
    city: &'a str,
    shipping_type: Option<ShippingType>,
    coupon_code: Option<&'a str>,
}

#[derive(Clone)]
pub struct PgOrdersService {
    db: Db,
    store: CartStore,
    addresses: PgAddressesRepository,
    offers: PgOffersRepository,
    orders: PgOrdersRepository,
    products: PgProductsRepository,
    shipping: PgShippingRepository,
    gateway: Arc<dyn PaymentGateway>,
    redirects: RedirectUrls,
    dispatcher: NotificationDispatcher,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(
        db: Db,
        gateway: Arc<dyn PaymentGateway>,
        redirects: RedirectUrls,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            db,
            store: CartStore::new(),
            addresses: PgAddressesRepository::new(),
            offers: PgOffersRepository::new(),
            orders: PgOrdersRepository::new(),
            products: PgProductsRepository::new(),
            shipping: PgShippingRepository::new(),
            gateway,
            redirects,
            dispatcher,
        }
    }

    /// Lock and reprice the user's cart without saving it.
    async fn price_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        now: Timestamp,
    ) -> Result<PricedCart, OrdersServiceError> {
        let lines = self
            .store
            .lock(tx, user)
            .await?
            .map(|locked| locked.lines)
            .unwrap_or_default();

        let inputs = self.store.pricing(tx, &lines, None, now).await?;
        let refreshed = CartStore::reprice(lines, &inputs, now)?;

        Ok(PricedCart {
            lines: refreshed.lines,
            inputs,
        })
    }

    async fn order_totals(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: &PricedCart,
        choice: &TotalsChoice<'_>,
        now: Timestamp,
    ) -> Result<OrderTotals, OrdersServiceError> {
        let shipping_options = self.shipping.list_options(tx, choice.city).await?;

        let coupon = match choice.coupon_code {
            Some(code) => self.offers.find_by_coupon_code(tx, code).await?,
            None => None,
        };

        let totals = compute_order_totals(&OrderTotalsInput {
            lines: &cart.lines,
            coupon_code: choice.coupon_code,
            coupon: coupon.as_ref(),
            cart_offers: &cart.inputs.offers,
            shipping_options: &shipping_options,
            shipping_type: choice.shipping_type,
            now,
        })?;

        Ok(totals)
    }

    /// Take every line out of stock, failing on the first shortfall.
    async fn reserve_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: &PricedCart,
    ) -> Result<(), OrdersServiceError> {
        for line in &cart.lines {
            let reserved = self
                .products
                .decrement_stock(tx, line.product_uuid, line.quantity)
                .await?;

            if !reserved {
                let available = cart
                    .inputs
                    .catalog
                    .get(&line.product_uuid)
                    .map_or(0, |product| product.stock);

                return Err(OrdersServiceError::InsufficientStock {
                    requested: line.quantity,
                    available,
                });
            }
        }

        Ok(())
    }
}

/// Reject a supplied coupon that did not apply.
fn ensure_coupon_applied(totals: &OrderTotals) -> Result<(), OrdersServiceError> {
    match &totals.coupon {
        Some(outcome) if !outcome.is_applied() => {
            Err(OrdersServiceError::CouponRejected(outcome.message()))
        }
        Some(_) | None => Ok(()),
    }
}

fn ensure_can_view(principal: Principal, order: &Order) -> Result<(), OrdersServiceError> {
    if principal.is_admin() || order.user_uuid == principal.user_uuid {
        Ok(())
    } else {
        Err(OrdersServiceError::Forbidden)
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.checkout",
        skip(self, request),
        fields(user_uuid = %user, payment_method = %request.payment_method),
        err
    )]
    async fn checkout(
        &self,
        user: UserUuid,
        request: CheckoutRequest,
        now: Timestamp,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self.price_cart(&mut tx, user, now).await?;

        if cart.lines.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        let address = self
            .addresses
            .get_address(&mut tx, user, request.address_uuid)
            .await
            .map_err(|error| match error {
                sqlx::Error::RowNotFound => OrdersServiceError::AddressNotFound,
                other => other.into(),
            })?;

        let choice = TotalsChoice {
            city: &address.fields.city,
            shipping_type: request.shipping_type,
            coupon_code: request.coupon_code.as_deref(),
        };

        let totals = self.order_totals(&mut tx, &cart, &choice, now).await?;

        ensure_coupon_applied(&totals)?;

        self.reserve_stock(&mut tx, &cart).await?;

        let mut order = self
            .orders
            .create_order(
                &mut tx,
                OrderDraft {
                    uuid: OrderUuid::new(),
                    user_uuid: user,
                    lines: &cart.lines,
                    address: &address.fields,
                    payment_method: request.payment_method,
                    totals: &totals,
                    coupon_code: choice.coupon_code,
                },
            )
            .await?;

        if request.payment_method.uses_gateway() {
            let executed = self
                .gateway
                .execute(&ExecutePayment {
                    amount: order.total,
                    customer_reference: order.uuid.to_string(),
                    user_reference: user.to_string(),
                    callback_url: self.redirects.callback_url.clone(),
                    error_url: self.redirects.error_url.clone(),
                })
                .await?;

            order = self
                .orders
                .set_invoice(&mut tx, order.uuid, &executed.invoice_id, &executed.payment_url)
                .await?;
        }

        self.store.delete(&mut tx, user).await?;

        tx.commit().await?;

        info!(
            order_uuid = %order.uuid,
            total = order.total,
            lines = order.lines.len(),
            "placed order"
        );

        self.dispatcher
            .send(NewNotification::order_status(user, order.uuid, order.status))
            .await;

        Ok(order)
    }

    async fn preview_totals(
        &self,
        user: UserUuid,
        request: TotalsRequest,
        now: Timestamp,
    ) -> Result<OrderTotals, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self.price_cart(&mut tx, user, now).await?;

        let choice = TotalsChoice {
            city: &request.city,
            shipping_type: request.shipping_type,
            coupon_code: request.coupon_code.as_deref(),
        };

        let totals = self.order_totals(&mut tx, &cart, &choice, now).await?;

        tx.rollback().await?;

        Ok(totals)
    }

    async fn list_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self.orders.list_orders(&mut tx, user).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn get_order(
        &self,
        principal: Principal,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.orders.get_order(&mut tx, order).await?;

        tx.commit().await?;

        ensure_can_view(principal, &order)?;

        Ok(order)
    }

    #[tracing::instrument(
        name = "orders.service.change_status",
        skip(self),
        fields(order_uuid = %order, status = %status),
        err
    )]
    async fn change_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.orders.lock_order(&mut tx, order).await?;

        let next = change_order_status(current.status, status)?;

        let updated = self.orders.update_status(&mut tx, order, next).await?;

        tx.commit().await?;

        info!(from = %current.status, to = %next, "changed order status");

        self.dispatcher
            .send(NewNotification::order_status(
                updated.user_uuid,
                updated.uuid,
                updated.status,
            ))
            .await;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Turn the user's cart into an order with frozen totals. Card orders
    /// also open a gateway invoice before anything is committed.
    ///
    /// # Errors
    ///
    /// Returns an error when the cart is empty, the address is unknown, a
    /// supplied coupon does not apply, stock ran out, the gateway fails, or
    /// storage fails.
    async fn checkout(
        &self,
        user: UserUuid,
        request: CheckoutRequest,
        now: Timestamp,
    ) -> Result<Order, OrdersServiceError>;

    /// Compute what checking out would cost, without persisting anything.
    ///
    /// # Errors
    ///
    /// Returns an error when pricing or storage fails.
    async fn preview_totals(
        &self,
        user: UserUuid,
        request: TotalsRequest,
        now: Timestamp,
    ) -> Result<OrderTotals, OrdersServiceError>;

    /// The user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error when storage fails.
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError>;

    /// One order, visible to its owner and to admins.
    ///
    /// # Errors
    ///
    /// Returns [`OrdersServiceError::Forbidden`] for other users' orders.
    async fn get_order(
        &self,
        principal: Principal,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError>;

    /// Admin status change, validated against the order status table.
    ///
    /// # Errors
    ///
    /// Returns an error when the transition is not allowed.
    async fn change_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError>;
}
