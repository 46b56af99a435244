//! Test helpers.

use std::sync::Arc;

use dukkan::{
    carts::{CartLine, CartTotals, LineAttributes},
    orders::OrderStatus,
    payments::PaymentMethod,
};
use dukkan_app::{
    auth::{MockAuthService, Principal, Role, UserUuid},
    context::AppContext,
    domain::{
        addresses::{MockAddressesService, models::AddressFields},
        carts::{MockCartsService, models::Cart},
        catalog::MockCatalogService,
        notifications::{InMemoryPresenceRegistry, MockNotificationsService},
        offers::MockOffersService,
        orders::{
            MockOrdersService,
            models::{Order, OrderUuid, PaymentDetails},
        },
        payments::MockPaymentsService,
        products::{
            MockProductsService,
            models::{Product, ProductUuid},
        },
        shipping::MockShippingService,
    },
};
use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

pub(crate) const CUSTOMER: Principal = Principal {
    user_uuid: TEST_USER_UUID,
    role: Role::Customer,
};

pub(crate) const ADMIN: Principal = Principal {
    user_uuid: TEST_USER_UUID,
    role: Role::Admin,
};

/// Context where every service panics when called. Tests swap in the mock
/// they configure.
pub(crate) fn app_context() -> AppContext {
    AppContext {
        auth: Arc::new(MockAuthService::new()),
        products: Arc::new(MockProductsService::new()),
        catalog: Arc::new(MockCatalogService::new()),
        offers: Arc::new(MockOffersService::new()),
        carts: Arc::new(MockCartsService::new()),
        orders: Arc::new(MockOrdersService::new()),
        payments: Arc::new(MockPaymentsService::new()),
        shipping: Arc::new(MockShippingService::new()),
        addresses: Arc::new(MockAddressesService::new()),
        notifications: Arc::new(MockNotificationsService::new()),
        presence: Arc::new(InMemoryPresenceRegistry::new()),
    }
}

#[salvo::handler]
async fn inject_customer(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(CUSTOMER);
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(ADMIN);
    ctrl.call_next(req, depot, res).await;
}

/// Unauthenticated service over `route`.
pub(crate) fn service_with(app: AppContext, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(State::from_app_context(app)))
            .push(route),
    )
}

/// Service over `route` with a customer already authenticated.
pub(crate) fn customer_service(app: AppContext, route: Router) -> Service {
    service_with(app, Router::new().hoop(inject_customer).push(route))
}

/// Service over `route` with an admin already authenticated.
pub(crate) fn admin_service(app: AppContext, route: Router) -> Service {
    service_with(app, Router::new().hoop(inject_admin).push(route))
}

pub(crate) fn make_product(uuid: ProductUuid) -> Product {
    Product {
        uuid,
        name: "Oud candle".to_owned(),
        description: None,
        price: 10_000,
        quantity: 5,
        category_uuid: Uuid::nil(),
        subcategory_uuid: Uuid::nil(),
        sub_subcategory_uuid: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn make_line(quantity: u32, price: u64) -> CartLine {
    let mut line = CartLine::new(
        Uuid::now_v7(),
        Uuid::now_v7(),
        LineAttributes::default(),
        quantity,
    );

    line.price = price;
    line.price_after_offer = price;
    line.line_total = price * u64::from(quantity);

    line
}

pub(crate) fn make_cart(lines: Vec<CartLine>) -> Cart {
    let total: u64 = lines.iter().map(|line| line.line_total).sum();

    Cart {
        uuid: Uuid::now_v7().into(),
        user_uuid: TEST_USER_UUID,
        lines,
        pruned: Vec::new(),
        totals: CartTotals {
            total_cart_price: total,
            total_price_after_discount: total,
            has_free_shipping: false,
        },
        applied_offers: Vec::new(),
        version: 1,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_order(uuid: OrderUuid) -> Order {
    let line = make_line(2, 5_000);

    Order {
        uuid,
        user_uuid: TEST_USER_UUID,
        subtotal: line.line_total,
        total: line.line_total,
        lines: vec![line],
        address: AddressFields {
            city: "Hawalli".to_owned(),
            area: "Salmiya".to_owned(),
            block: "10".to_owned(),
            street: "Salem Al Mubarak".to_owned(),
            building: "7".to_owned(),
            phone: "+96550000000".to_owned(),
            ..AddressFields::default()
        },
        payment_method: PaymentMethod::Cod,
        payment: PaymentDetails::pending(),
        shipping_type: None,
        shipping_cost: 0,
        coupon_code: None,
        coupon_message: None,
        discount_value: 0,
        has_free_shipping: false,
        status: OrderStatus::Pending,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
