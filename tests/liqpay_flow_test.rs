//! End-to-end flows through the public gateway API
//!
//! The direct gateway runs against a recording transport, so these tests need no network.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use liqpay_gateway::payments::signature;
use liqpay_gateway::{
    CardDetails, CheckoutRequest, DirectGateway, ExpressGateway, GatewayError, GatewayResult,
    InboundNotification, LiqPayConfig, PaymentGateway, PurchaseRequest, Transport,
};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use sha1::{Digest, Sha1};

struct RecordingTransport {
    calls: Mutex<Vec<(String, HashMap<String, String>)>>,
    reply: Result<String, u16>,
}

impl RecordingTransport {
    fn replying(body: Value) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply: Ok(body.to_string()),
        })
    }

    fn replying_raw(body: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply: Ok(body.to_string()),
        })
    }

    fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply: Err(status),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn last_call(&self) -> (String, HashMap<String, String>) {
        self.calls.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> GatewayResult<String> {
        let fields = form
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.calls.lock().unwrap().push((url.to_string(), fields));

        match &self.reply {
            Ok(body) => Ok(body.clone()),
            Err(status) => Err(GatewayError::transport(
                format!("HTTP {}", status),
                Some(*status),
            )),
        }
    }
}

fn config(test_mode: bool) -> LiqPayConfig {
    LiqPayConfig::new("PUB", "SECRET").with_test_mode(test_mode)
}

fn card() -> CardDetails {
    CardDetails::new("4111111111111111", 12, 2040, "123").with_phone("380950000001")
}

fn purchase() -> PurchaseRequest {
    PurchaseRequest::new()
        .card(card())
        .amount(dec!(10.00))
        .currency("usd")
        .description("Order #1")
        .transaction_id("order-1")
        .client_ip("10.0.0.1")
}

fn decode_json(encoded: &str) -> Value {
    serde_json::from_slice(&STANDARD.decode(encoded).unwrap()).unwrap()
}

#[tokio::test]
async fn test_checkout_end_to_end() {
    let gateway = ExpressGateway::new(config(true)).unwrap();

    let response = gateway
        .purchase(
            CheckoutRequest::new()
                .amount(dec!(10.00))
                .currency("usd")
                .description("x")
                .transaction_id("123456")
                .language("ru")
                .return_url("https://a")
                .notify_url("https://b"),
        )
        .await
        .unwrap();

    assert!(response.is_successful());
    assert_eq!(response.checkout_url(), "https://www.liqpay.ua/api/3/checkout");

    assert_eq!(
        decode_json(response.encoded_data()),
        json!({
            "version": 3,
            "public_key": "PUB",
            "action": "pay",
            "amount": "10.00",
            "currency": "USD",
            "description": "x",
            "order_id": "123456",
            "language": "ru",
            "result_url": "https://a",
            "server_url": "https://b",
            "sandbox": 1
        })
    );

    let mut hasher = Sha1::new();
    hasher.update(format!("SECRET{}SECRET", response.encoded_data()).as_bytes());
    assert_eq!(response.signature(), STANDARD.encode(hasher.finalize()));
}

#[tokio::test]
async fn test_checkout_missing_notify_url() {
    let gateway = ExpressGateway::new(config(false)).unwrap();
    let err = gateway
        .purchase(
            CheckoutRequest::new()
                .amount(dec!(10.00))
                .currency("USD")
                .description("x")
                .transaction_id("123456")
                .language("en")
                .return_url("https://a"),
        )
        .await
        .unwrap_err();

    assert_eq!(err.violated_fields(), vec!["notifyUrl"]);
}

#[tokio::test]
async fn test_direct_purchase_success() {
    let transport = RecordingTransport::replying(json!({
        "status": "success",
        "payment_id": 165629,
        "order_id": "order-1",
        "amount": 10.0
    }));
    let gateway = DirectGateway::new(config(false), transport.clone()).unwrap();

    let response = gateway.purchase(purchase()).await.unwrap();

    assert!(response.is_successful());
    assert!(response.is_authentic());
    assert_eq!(response.transaction_reference(), Some("165629"));
    assert_eq!(transport.call_count(), 1);

    let (url, form) = transport.last_call();
    assert_eq!(url, "https://www.liqpay.ua/api/payment/pay");
    assert_eq!(
        form["signature"],
        signature::sign("SECRET", &form["data"]).unwrap()
    );

    let sent = decode_json(&form["data"]);
    assert_eq!(sent["public_key"], json!("PUB"));
    assert_eq!(sent["purchase"]["currency"], json!("USD"));
    assert_eq!(sent["purchase"]["order_id"], json!("order-1"));
    assert!(sent["purchase"].get("sandbox").is_none());
    assert!(sent["purchase"].get("server_url").is_none());
}

#[tokio::test]
async fn test_direct_purchase_in_sandbox_with_notify_url() {
    let transport = RecordingTransport::replying(json!({"status": "sandbox", "payment_id": 1}));
    let gateway = DirectGateway::new(config(true), transport.clone()).unwrap();

    let response = gateway
        .purchase(purchase().notify_url("https://shop.example/notify"))
        .await
        .unwrap();
    assert!(response.is_successful());
    assert!(response.is_test_mode());

    let (_, form) = transport.last_call();
    let sent = decode_json(&form["data"]);
    assert_eq!(sent["purchase"]["sandbox"], json!(1));
    assert_eq!(
        sent["purchase"]["server_url"],
        json!("https://shop.example/notify")
    );
}

#[tokio::test]
async fn test_direct_purchase_3ds_redirect() {
    let transport = RecordingTransport::replying(json!({
        "status": "3ds_verify",
        "payment_id": 5,
        "redirect_to": "https://www.liqpay.ua/3ds/abc"
    }));
    let gateway = DirectGateway::new(config(false), transport).unwrap();

    let response = gateway.purchase(purchase()).await.unwrap();
    assert!(response.is_redirect());
    assert!(response.is_pending());
    assert!(!response.is_successful());
    assert_eq!(response.redirect_url(), Some("https://www.liqpay.ua/3ds/abc"));
    assert_eq!(response.redirect_method(), "GET");
}

#[tokio::test]
async fn test_missing_card_never_reaches_transport() {
    let transport = RecordingTransport::replying(json!({"status": "success"}));
    let gateway = DirectGateway::new(config(false), transport.clone()).unwrap();

    let mut request = purchase();
    request.card = None;
    let err = gateway.purchase(request).await.unwrap_err();

    assert_eq!(err.violated_fields(), vec!["card"]);
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_expired_card_never_reaches_transport() {
    let transport = RecordingTransport::replying(json!({"status": "success"}));
    let gateway = DirectGateway::new(config(false), transport.clone()).unwrap();

    let err = gateway
        .purchase(purchase().card(CardDetails::new("4111111111111111", 1, 2000, "123")))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_transport_error_is_not_retried() {
    let transport = RecordingTransport::failing(503);
    let gateway = DirectGateway::new(config(false), transport.clone()).unwrap();

    let err = gateway.purchase(purchase()).await.unwrap_err();

    assert!(matches!(
        err,
        GatewayError::Transport {
            status: Some(503),
            ..
        }
    ));
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_unparsable_response_body() {
    let transport = RecordingTransport::replying_raw("<html>bad gateway</html>");
    let gateway = DirectGateway::new(config(false), transport).unwrap();

    let err = gateway.purchase(purchase()).await.unwrap_err();
    assert!(matches!(err, GatewayError::MalformedPayload { .. }));
}

#[tokio::test]
async fn test_processor_error_is_cancelled() {
    let transport = RecordingTransport::replying(json!({
        "status": "error",
        "err_code": "card_exp",
        "err_description": "Card expired"
    }));
    let gateway = DirectGateway::new(config(false), transport).unwrap();

    let response = gateway.purchase(purchase()).await.unwrap();
    assert!(response.is_cancelled());
    assert_eq!(response.code(), Some("card_exp"));
    assert_eq!(response.message(), Some("Card expired"));
}

#[tokio::test]
async fn test_unsupported_operations_have_no_side_effects() {
    let transport = RecordingTransport::replying(json!({"status": "success"}));
    let gateway = DirectGateway::new(config(false), transport.clone()).unwrap();

    assert!(gateway.authorize().unwrap_err().is_unsupported());
    assert!(gateway.refund().unwrap_err().is_unsupported());
    assert!(gateway.void().unwrap_err().is_unsupported());
    assert_eq!(
        gateway.capture().unwrap_err().to_string(),
        "Method \"capture\" not supported by gateway"
    );
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_callback_through_direct_gateway() {
    let transport = RecordingTransport::replying(json!({}));
    let gateway = DirectGateway::new(config(true), transport.clone()).unwrap();

    let data = signature::encode(&json!({
        "status": "sandbox",
        "payment_id": 99,
        "order_id": "order-1"
    }))
    .unwrap();
    let sig = signature::sign("SECRET", &data).unwrap();

    let response = gateway
        .complete_purchase(&InboundNotification::new(data.clone(), sig))
        .unwrap()
        .require_authentic()
        .unwrap();
    assert!(response.is_successful());
    assert_eq!(response.transaction_id(), Some("order-1"));

    let forged = gateway
        .complete_purchase(&InboundNotification::new(data, "AAAA"))
        .unwrap();
    assert!(!forged.is_authentic());
    assert!(matches!(
        forged.require_authentic(),
        Err(GatewayError::AuthenticityFailure)
    ));
    assert_eq!(transport.call_count(), 0);
}
