//! Notifications Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    auth::UserUuid,
    database::try_get_parsed,
    domain::notifications::models::{NewNotification, Notification, NotificationUuid},
};

const CREATE_NOTIFICATION_SQL: &str = include_str!("sql/create_notification.sql");
const LIST_NOTIFICATIONS_SQL: &str = include_str!("sql/list_notifications.sql");
const MARK_READ_SQL: &str = include_str!("sql/mark_read.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgNotificationsRepository;

impl PgNotificationsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_notification(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        notification: &NewNotification,
    ) -> Result<Notification, sqlx::Error> {
        query_as::<Postgres, Notification>(CREATE_NOTIFICATION_SQL)
            .bind(NotificationUuid::new())
            .bind(notification.user_uuid)
            .bind(&notification.title)
            .bind(&notification.body)
            .bind(notification.kind.as_str())
            .bind(notification.order_uuid)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_notifications(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        limit: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        query_as::<Postgres, Notification>(LIST_NOTIFICATIONS_SQL)
            .bind(user)
            .bind(limit)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn mark_read(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        notification: NotificationUuid,
    ) -> Result<Notification, sqlx::Error> {
        query_as::<Postgres, Notification>(MARK_READ_SQL)
            .bind(notification)
            .bind(user)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Notification {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            user_uuid: row.try_get("user_uuid")?,
            title: row.try_get("title")?,
            body: row.try_get("body")?,
            kind: try_get_parsed(row, "kind")?,
            order_uuid: row.try_get("order_uuid")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            read_at: row
                .try_get::<Option<SqlxTimestamp>, _>("read_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
