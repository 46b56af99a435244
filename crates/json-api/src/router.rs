//! App Router

use salvo::Router;

use crate::{
    addresses, auth, carts, catalog, notifications, offers, orders, payments, products, shipping,
};

/// Routes the payment gateway calls. No bearer token is involved; callbacks
/// re-read the status from the gateway and webhooks carry a signature.
pub(crate) fn gateway_router() -> Router {
    Router::with_path("payments")
        .push(Router::with_path("callback").get(payments::callback::success))
        .push(Router::with_path("error").get(payments::callback::failure))
        .push(Router::with_path("webhook").post(payments::webhook::handler))
}

/// Routes behind bearer authentication.
pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .post(products::create::handler)
                .push(
                    Router::with_path("{product}")
                        .get(products::get::handler)
                        .put(products::update::handler),
                ),
        )
        .push(
            Router::with_path("catalog").get(catalog::index::handler).push(
                Router::with_path("{kind}")
                    .post(catalog::create::handler)
                    .push(Router::with_path("{uuid}").delete(catalog::delete::handler)),
            ),
        )
        .push(
            Router::with_path("offers")
                .get(offers::index::handler)
                .post(offers::create::handler)
                .push(
                    Router::with_path("{offer}")
                        .put(offers::update::handler)
                        .delete(offers::delete::handler),
                ),
        )
        .push(
            Router::with_path("cart")
                .get(carts::get::handler)
                .delete(carts::clear::handler)
                .push(Router::with_path("totals").post(carts::totals::handler))
                .push(
                    Router::with_path("items")
                        .post(carts::items::create::handler)
                        .push(
                            Router::with_path("{item}")
                                .put(carts::items::update::handler)
                                .delete(carts::items::delete::handler),
                        ),
                ),
        )
        .push(Router::with_path("checkout").post(orders::checkout::handler))
        .push(
            Router::with_path("orders").get(orders::index::handler).push(
                Router::with_path("{order}")
                    .get(orders::get::handler)
                    .push(Router::with_path("status").put(orders::status::handler))
                    .push(Router::with_path("refund").post(orders::refund::handler)),
            ),
        )
        .push(Router::with_path("payments/methods").get(payments::methods::handler))
        .push(
            Router::with_path("shipping/{city}")
                .get(shipping::get::handler)
                .put(shipping::set::handler),
        )
        .push(
            Router::with_path("addresses")
                .get(addresses::index::handler)
                .post(addresses::create::handler),
        )
        .push(
            Router::with_path("notifications")
                .get(notifications::index::handler)
                .push(Router::with_path("stream").get(notifications::stream::handler))
                .push(
                    Router::with_path("{notification}/read").put(notifications::read::handler),
                ),
        )
}
