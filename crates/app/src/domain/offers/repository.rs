//! Offers Repository

use dukkan::offers::{Offer, OfferKind, OfferTarget};
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, types::Json,
};
use uuid::Uuid;

use crate::{database::try_get_parsed, domain::offers::models::OfferDetails};

const LIST_OFFERS_SQL: &str = include_str!("sql/list_offers.sql");
const GET_OFFER_SQL: &str = include_str!("sql/get_offer.sql");
const CREATE_OFFER_SQL: &str = include_str!("sql/create_offer.sql");
const UPDATE_OFFER_SQL: &str = include_str!("sql/update_offer.sql");
const DELETE_OFFER_SQL: &str = include_str!("sql/delete_offer.sql");
const PRICING_CANDIDATES_SQL: &str = include_str!("sql/pricing_candidates.sql");
const FIND_BY_COUPON_CODE_SQL: &str = include_str!("sql/find_by_coupon_code.sql");

/// Row wrapper so the core [`Offer`] can be decoded here.
struct OfferRow(Offer);

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOffersRepository;

impl PgOffersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_offers(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Offer>, sqlx::Error> {
        let rows = query_as::<Postgres, OfferRow>(LIST_OFFERS_SQL)
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows.into_iter().map(|row| row.0).collect())
    }

    pub(crate) async fn get_offer(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        offer: Uuid,
    ) -> Result<Offer, sqlx::Error> {
        query_as::<Postgres, OfferRow>(GET_OFFER_SQL)
            .bind(offer)
            .fetch_one(&mut **tx)
            .await
            .map(|row| row.0)
    }

    pub(crate) async fn create_offer(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        offer: Uuid,
        details: &OfferDetails,
    ) -> Result<Offer, sqlx::Error> {
        query_as::<Postgres, OfferRow>(CREATE_OFFER_SQL)
            .bind(offer)
            .bind(&details.name)
            .bind(Json(&details.kind))
            .bind(details.coupon_code.as_deref())
            .bind(details.target.target_type.as_str())
            .bind(&details.target.uuids)
            .bind(SqlxTimestamp::from(details.starts_at))
            .bind(SqlxTimestamp::from(details.ends_at))
            .bind(details.is_active)
            .bind(details.priority)
            .fetch_one(&mut **tx)
            .await
            .map(|row| row.0)
    }

    pub(crate) async fn update_offer(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        offer: Uuid,
        details: &OfferDetails,
    ) -> Result<Offer, sqlx::Error> {
        query_as::<Postgres, OfferRow>(UPDATE_OFFER_SQL)
            .bind(offer)
            .bind(&details.name)
            .bind(Json(&details.kind))
            .bind(details.coupon_code.as_deref())
            .bind(details.target.target_type.as_str())
            .bind(&details.target.uuids)
            .bind(SqlxTimestamp::from(details.starts_at))
            .bind(SqlxTimestamp::from(details.ends_at))
            .bind(details.is_active)
            .bind(details.priority)
            .fetch_one(&mut **tx)
            .await
            .map(|row| row.0)
    }

    pub(crate) async fn delete_offer(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        offer: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_OFFER_SQL)
            .bind(offer)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Automatic offers that can price lines with the given target UUIDs,
    /// plus every cart and order level offer. Offers that have not started
    /// yet are included so they can be shown as upcoming.
    pub(crate) async fn pricing_candidates(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        targets: &[Uuid],
        now: Timestamp,
    ) -> Result<Vec<Offer>, sqlx::Error> {
        let rows = query_as::<Postgres, OfferRow>(PRICING_CANDIDATES_SQL)
            .bind(targets)
            .bind(SqlxTimestamp::from(now))
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows.into_iter().map(|row| row.0).collect())
    }

    pub(crate) async fn find_by_coupon_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<Offer>, sqlx::Error> {
        query_as::<Postgres, OfferRow>(FIND_BY_COUPON_CODE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
            .map(|row| row.map(|row| row.0))
    }
}

impl<'r> FromRow<'r, PgRow> for OfferRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let Json(kind) = row.try_get::<Json<OfferKind>, _>("kind")?;

        Ok(Self(Offer {
            uuid: row.try_get("uuid")?,
            name: row.try_get("name")?,
            kind,
            coupon_code: row.try_get("coupon_code")?,
            target: OfferTarget {
                target_type: try_get_parsed(row, "target_type")?,
                uuids: row.try_get("target_uuids")?,
            },
            starts_at: row.try_get::<SqlxTimestamp, _>("starts_at")?.to_jiff(),
            ends_at: row.try_get::<SqlxTimestamp, _>("ends_at")?.to_jiff(),
            is_active: row.try_get("is_active")?,
            priority: row.try_get("priority")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        }))
    }
}
