//! Gateway webhooks
//!
//! The gateway signs each delivery with HMAC-SHA256 over the raw body and
//! sends the base64 digest in the `X-Signature` header.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use dukkan::payments::GatewayStatus;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;

/// Header carrying the signature.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Event name for payment status changes.
const STATUS_CHANGED_EVENT: &str = "TransactionsStatusChanged";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WebhookError {
    #[error("webhook signature is missing or malformed")]
    MalformedSignature,

    #[error("webhook signature does not match")]
    SignatureMismatch,

    #[error("webhook payload is invalid")]
    InvalidPayload,
}

/// Check `signature` against the body.
///
/// # Errors
///
/// Returns an error when the signature cannot be decoded or does not match.
pub fn verify_signature(secret: &[u8], body: &[u8], signature: &str) -> Result<(), WebhookError> {
    let expected = STANDARD
        .decode(signature.trim())
        .map_err(|_source| WebhookError::MalformedSignature)?;

    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret).map_err(|_source| WebhookError::MalformedSignature)?;

    mac.update(body);

    mac.verify_slice(&expected)
        .map_err(|_source| WebhookError::SignatureMismatch)
}

/// Sign a body the way the gateway does.
#[must_use]
pub fn sign(secret: &[u8], body: &[u8]) -> String {
    match Hmac::<Sha256>::new_from_slice(secret) {
        Ok(mut mac) => {
            mac.update(body);
            STANDARD.encode(mac.finalize().into_bytes())
        }
        Err(_) => String::new(),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Envelope {
    event: String,
    data: Option<EventData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct EventData {
    invoice_id: i64,
    transaction_status: String,
    payment_id: Option<String>,
}

/// A payment status change reported by webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentEvent {
    pub invoice_id: String,
    pub status: GatewayStatus,
    pub transaction_id: Option<String>,
}

/// Parse a verified body. Events other than status changes yield `None`.
///
/// # Errors
///
/// Returns [`WebhookError::InvalidPayload`] when the body is not a valid event.
pub fn parse_event(body: &[u8]) -> Result<Option<PaymentEvent>, WebhookError> {
    let envelope: Envelope =
        serde_json::from_slice(body).map_err(|_source| WebhookError::InvalidPayload)?;

    if envelope.event != STATUS_CHANGED_EVENT {
        return Ok(None);
    }

    let data = envelope.data.ok_or(WebhookError::InvalidPayload)?;

    Ok(Some(PaymentEvent {
        invoice_id: data.invoice_id.to_string(),
        status: transaction_status(&data.transaction_status),
        transaction_id: data.payment_id,
    }))
}

fn transaction_status(raw: &str) -> GatewayStatus {
    match raw.to_ascii_uppercase().as_str() {
        "SUCCESS" | "PAID" => GatewayStatus::Paid,
        "FAILED" | "CANCELED" | "CANCELLED" | "EXPIRED" => GatewayStatus::Failed,
        _ => GatewayStatus::Pending,
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const SECRET: &[u8] = b"whsec_test";

    const BODY: &[u8] = br#"{"Event":"TransactionsStatusChanged","Data":{
        "InvoiceId":4711,"TransactionStatus":"SUCCESS","PaymentId":"07071234"}}"#;

    #[test]
    fn accepts_matching_signature() {
        let signature = sign(SECRET, BODY);

        assert_eq!(verify_signature(SECRET, BODY, &signature), Ok(()));
    }

    #[test]
    fn rejects_tampered_body() {
        let signature = sign(SECRET, BODY);

        assert_eq!(
            verify_signature(SECRET, b"{}", &signature),
            Err(WebhookError::SignatureMismatch)
        );
    }

    #[test]
    fn rejects_non_base64_signature() {
        assert_eq!(
            verify_signature(SECRET, BODY, "not base64!"),
            Err(WebhookError::MalformedSignature)
        );
    }

    #[test]
    fn parses_status_change() -> TestResult {
        let event = parse_event(BODY)?;

        assert_eq!(
            event,
            Some(PaymentEvent {
                invoice_id: "4711".to_owned(),
                status: GatewayStatus::Paid,
                transaction_id: Some("07071234".to_owned()),
            })
        );

        Ok(())
    }

    #[test]
    fn ignores_other_events() -> TestResult {
        let event = parse_event(br#"{"Event":"RefundStatusChanged","Data":null}"#)?;

        assert!(event.is_none());

        Ok(())
    }

    #[test]
    fn cancelled_counts_as_failed() {
        assert_eq!(transaction_status("Canceled"), GatewayStatus::Failed);
        assert_eq!(transaction_status("authorize"), GatewayStatus::Pending);
    }
}
