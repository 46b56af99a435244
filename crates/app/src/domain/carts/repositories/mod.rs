//! Carts Repositories

mod carts;
mod items;

pub(crate) use carts::{CartRow, PgCartsRepository};
pub(crate) use items::PgCartItemsRepository;
