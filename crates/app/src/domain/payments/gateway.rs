//! Payment gateway client
//!
//! JSON over HTTPS with a bearer API key. Amounts are sent in major units
//! with three decimals.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use dukkan::{
    money::{AmountError, CURRENCY, from_fils},
    payments::GatewayStatus,
};
use mockall::automock;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// Gateway connection settings.
#[derive(Clone)]
pub struct GatewaySettings {
    pub base_url: String,
    pub api_key: Zeroizing<String>,
    pub timeout: Duration,
}

impl fmt::Debug for GatewaySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewaySettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"**redacted**")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("payment gateway timed out")]
    Timeout,

    #[error("payment gateway rejected the request: {0}")]
    Rejected(String),

    #[error("payment gateway unreachable")]
    Transport(#[source] reqwest::Error),

    #[error("payment gateway response could not be decoded")]
    Decode(#[source] reqwest::Error),

    #[error("amount cannot be sent to the gateway")]
    InvalidAmount(#[source] AmountError),
}

impl From<reqwest::Error> for GatewayError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::Decode(error)
        } else {
            Self::Transport(error)
        }
    }
}

/// A way to pay offered by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayPaymentMethod {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub service_charge: Decimal,
    pub total_amount: Decimal,
    pub currency: String,
}

/// Where the hosted payment page sends the customer afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectUrls {
    pub callback_url: String,
    pub error_url: String,
}

/// Request to open a hosted payment page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutePayment {
    pub amount: u64,
    pub customer_reference: String,
    pub user_reference: String,
    pub callback_url: String,
    pub error_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutedPayment {
    pub invoice_id: String,
    pub payment_url: String,
}

/// How to look a payment up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentKey {
    PaymentId(String),
    InvoiceId(String),
}

/// Authoritative payment state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayPayment {
    pub invoice_id: String,
    pub status: GatewayStatus,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundRequest {
    pub invoice_id: String,
    pub amount: u64,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundReceipt {
    pub refund_id: String,
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Payment methods available for an amount.
    async fn initiate(&self, amount: u64) -> Result<Vec<GatewayPaymentMethod>, GatewayError>;

    /// Create an invoice and hosted payment page.
    async fn execute(&self, request: &ExecutePayment) -> Result<ExecutedPayment, GatewayError>;

    /// Current state of a payment.
    async fn get_status(&self, key: &PaymentKey) -> Result<GatewayPayment, GatewayError>;

    /// Refund a captured payment.
    async fn refund(&self, request: &RefundRequest) -> Result<RefundReceipt, GatewayError>;
}

/// Fils to major units, e.g. `10500` to `10.500`.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidAmount`] for amounts beyond `i64`.
pub fn to_major_units(fils: u64) -> Result<Decimal, GatewayError> {
    let money = from_fils(fils).map_err(GatewayError::InvalidAmount)?;

    Ok(*money.amount())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Envelope<T> {
    is_success: bool,
    message: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateBody {
    invoice_amount: Decimal,
    currency_iso: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateData {
    payment_methods: Vec<MethodData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct MethodData {
    payment_method_id: i64,
    payment_method_code: String,
    payment_method_en: String,
    service_charge: Decimal,
    total_amount: Decimal,
    currency_iso: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ExecuteBody<'a> {
    invoice_value: Decimal,
    customer_reference: &'a str,
    user_defined_field: &'a str,
    #[serde(rename = "CallBackUrl")]
    callback_url: &'a str,
    error_url: &'a str,
    display_currency_iso: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ExecuteData {
    invoice_id: i64,
    #[serde(rename = "PaymentURL")]
    payment_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct StatusBody<'a> {
    key: &'a str,
    key_type: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StatusData {
    invoice_id: i64,
    invoice_status: String,
    #[serde(default)]
    invoice_transactions: Vec<TransactionData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TransactionData {
    transaction_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct RefundBody<'a> {
    key: &'a str,
    key_type: &'static str,
    refund_charge_on_customer: bool,
    service_charge_on_customer: bool,
    amount: Decimal,
    comment: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RefundData {
    refund_id: i64,
}

fn invoice_status(raw: &str) -> GatewayStatus {
    match raw {
        "Paid" => GatewayStatus::Paid,
        "Pending" => GatewayStatus::Pending,
        _ => GatewayStatus::Failed,
    }
}

/// [`PaymentGateway`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPaymentGateway {
    client: Client,
    settings: GatewaySettings,
}

impl HttpPaymentGateway {
    /// Build a client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn new(settings: GatewaySettings) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(GatewayError::Transport)?;

        Ok(Self { client, settings })
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}/{path}", self.settings.base_url.trim_end_matches('/'));

        debug!(%url, "calling payment gateway");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.settings.api_key.as_str())
            .json(body)
            .send()
            .await?;

        let status = response.status();

        let envelope = match response.json::<Envelope<T>>().await {
            Ok(envelope) => envelope,
            Err(error) if status.is_success() => return Err(GatewayError::from(error)),
            Err(_) => return Err(rejected(status, None)),
        };

        if !status.is_success() || !envelope.is_success {
            warn!(%status, message = ?envelope.message, "payment gateway rejected request");

            return Err(rejected(status, envelope.message));
        }

        envelope
            .data
            .ok_or_else(|| GatewayError::Rejected("response carried no data".to_owned()))
    }
}

fn rejected(status: StatusCode, message: Option<String>) -> GatewayError {
    GatewayError::Rejected(message.unwrap_or_else(|| format!("http status {status}")))
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn initiate(&self, amount: u64) -> Result<Vec<GatewayPaymentMethod>, GatewayError> {
        let data: InitiateData = self
            .post(
                "v2/InitiatePayment",
                &InitiateBody {
                    invoice_amount: to_major_units(amount)?,
                    currency_iso: CURRENCY.iso_alpha_code,
                },
            )
            .await?;

        Ok(data
            .payment_methods
            .into_iter()
            .map(|method| GatewayPaymentMethod {
                id: method.payment_method_id,
                code: method.payment_method_code,
                name: method.payment_method_en,
                service_charge: method.service_charge,
                total_amount: method.total_amount,
                currency: method.currency_iso,
            })
            .collect())
    }

    async fn execute(&self, request: &ExecutePayment) -> Result<ExecutedPayment, GatewayError> {
        let data: ExecuteData = self
            .post(
                "v2/ExecutePayment",
                &ExecuteBody {
                    invoice_value: to_major_units(request.amount)?,
                    customer_reference: &request.customer_reference,
                    user_defined_field: &request.user_reference,
                    callback_url: &request.callback_url,
                    error_url: &request.error_url,
                    display_currency_iso: CURRENCY.iso_alpha_code,
                },
            )
            .await?;

        Ok(ExecutedPayment {
            invoice_id: data.invoice_id.to_string(),
            payment_url: data.payment_url,
        })
    }

    async fn get_status(&self, key: &PaymentKey) -> Result<GatewayPayment, GatewayError> {
        let (key, key_type) = match key {
            PaymentKey::PaymentId(id) => (id.as_str(), "PaymentId"),
            PaymentKey::InvoiceId(id) => (id.as_str(), "InvoiceId"),
        };

        let data: StatusData = self
            .post("v2/GetPaymentStatus", &StatusBody { key, key_type })
            .await?;

        Ok(GatewayPayment {
            invoice_id: data.invoice_id.to_string(),
            status: invoice_status(&data.invoice_status),
            transaction_id: data
                .invoice_transactions
                .into_iter()
                .rev()
                .find_map(|transaction| transaction.transaction_id),
        })
    }

    async fn refund(&self, request: &RefundRequest) -> Result<RefundReceipt, GatewayError> {
        let data: RefundData = self
            .post(
                "v2/MakeRefund",
                &RefundBody {
                    key: &request.invoice_id,
                    key_type: "InvoiceId",
                    refund_charge_on_customer: false,
                    service_charge_on_customer: false,
                    amount: to_major_units(request.amount)?,
                    comment: &request.comment,
                },
            )
            .await?;

        Ok(RefundReceipt {
            refund_id: data.refund_id.to_string(),
        })
    }
}
