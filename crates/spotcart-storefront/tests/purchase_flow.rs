//! End-to-end purchase flow tests: a `Popup` driven through `PurchaseFlow`
//! against a local `wiremock` storefront.

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use spotcart_core::{
    CrossSellRule, Popup, PopupEvent, Product, PurchaseOutcome, PurchaseState, RulesFile, SlotKey,
};
use spotcart_storefront::{
    CartCollaborator, CrossSellResult, PurchaseFlow, SectionRef, StorefrontClient,
};

/// Cart collaborator that records every rendered response.
#[derive(Default)]
struct RecordingCart {
    sections: Option<Vec<&'static str>>,
    rendered: Mutex<Vec<Value>>,
}

impl RecordingCart {
    fn with_sections(ids: &[&'static str]) -> Self {
        Self {
            sections: Some(ids.to_vec()),
            rendered: Mutex::new(Vec::new()),
        }
    }

    fn rendered(&self) -> Vec<Value> {
        self.rendered.lock().unwrap().clone()
    }
}

impl CartCollaborator for RecordingCart {
    fn sections_to_render(&self) -> Option<Vec<SectionRef>> {
        self.sections
            .as_ref()
            .map(|ids| ids.iter().map(|id| SectionRef::new(*id)).collect())
    }

    fn render_contents(&self, response: &Value) {
        self.rendered.lock().unwrap().push(response.clone());
    }
}

fn flow(server: &MockServer) -> PurchaseFlow {
    let client = StorefrontClient::new(&server.uri(), 5, "spotcart-test/0.1")
        .expect("failed to build test StorefrontClient");
    PurchaseFlow::new(client, RulesFile::default())
}

fn jacket(color: &str, size: &str) -> Product {
    serde_json::from_value(json!({
        "title": "Parka",
        "price": 20000,
        "options": ["Size", "Color"],
        "variants": [
            { "id": 11, "price": 20000, "available": true, "option1": "Small", "option2": color },
            { "id": 12, "price": 21000, "available": true, "option1": size, "option2": color }
        ]
    }))
    .unwrap()
}

fn scarf() -> Product {
    serde_json::from_value(json!({
        "title": "Scarf",
        "price": 3000,
        "options": ["Color"],
        "variants": [{ "id": 21, "price": 3000, "available": true, "option1": "Black" }]
    }))
    .unwrap()
}

/// Popup opened on `product` with the size dropdown (slot 1) set to `size`.
fn popup_with_size(product: Product, size: &str) -> Popup {
    let mut popup = Popup::default();
    popup.open(product);
    popup.handle(PopupEvent::DropdownChanged {
        slot: SlotKey::from_index(0),
        value: size.to_owned(),
    });
    popup
}

async fn mount_add_ok(server: &MockServer, variant_id: u64) {
    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .and(body_json(json!({ "id": variant_id, "quantity": 1 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": variant_id })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_cross_sell(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/products/soft-winter-jacket.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "title": "Soft Winter Jacket",
            "options": ["Size"],
            "variants": [
                { "id": 900, "price": 15000, "available": false, "option1": "S" },
                { "id": 901, "price": 15000, "available": true, "option1": "M" }
            ]
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .and(body_json(json!({ "items": [{ "id": 901, "quantity": 1 }] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn nothing_is_sent_without_a_resolved_variant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut popup = Popup::default();
    popup.open(jacket("Black", "Medium"));

    assert!(flow(&server).activate_purchase(&mut popup).await.is_none());
    assert!(popup.is_open());
    assert_eq!(popup.purchase_state(), PurchaseState::Idle);
}

#[tokio::test]
async fn success_closes_popup_and_renders_cart() {
    let server = MockServer::start().await;
    mount_add_ok(&server, 12).await;
    mount_cross_sell(&server, 0).await;

    let cart = Arc::new(RecordingCart::default());
    let flow = flow(&server).with_cart(Arc::clone(&cart) as Arc<dyn CartCollaborator>);
    let mut popup = popup_with_size(jacket("Olive", "Medium"), "Medium");

    let report = flow.activate_purchase(&mut popup).await.expect("purchase should start");
    assert_eq!(report.outcome, PurchaseOutcome::Added);
    assert_eq!(report.cross_sell, Some(CrossSellResult::NotApplicable));
    assert!(!popup.is_open());
    assert_eq!(popup.purchase_state(), PurchaseState::Idle);
    assert_eq!(cart.rendered(), vec![json!({ "id": 12 })]);
}

#[tokio::test]
async fn request_includes_sections_when_cart_reports_them() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .and(body_json(json!({
            "id": 12,
            "quantity": 1,
            "sections": ["cart-notification-product", "cart-icon-bubble"],
            "sections_url": "/collections/outerwear"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 12 })))
        .expect(1)
        .mount(&server)
        .await;

    let cart = Arc::new(RecordingCart::with_sections(&[
        "cart-notification-product",
        "cart-icon-bubble",
    ]));
    let flow = flow(&server)
        .with_cart(cart as Arc<dyn CartCollaborator>)
        .with_page_path("/collections/outerwear");
    let mut popup = popup_with_size(jacket("Olive", "Medium"), "Medium");

    let report = flow.activate_purchase(&mut popup).await.unwrap();
    assert_eq!(report.outcome, PurchaseOutcome::Added);
}

#[tokio::test]
async fn rejection_keeps_popup_open_with_notice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "status": 422,
            "message": "Cart Error",
            "description": "All 1 Parka - Medium / Black are in your cart."
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let cart = Arc::new(RecordingCart::default());
    let flow = flow(&server).with_cart(Arc::clone(&cart) as Arc<dyn CartCollaborator>);
    let mut popup = popup_with_size(jacket("Black", "Medium"), "Medium");
    let before = popup.selection().cloned();

    let report = flow.activate_purchase(&mut popup).await.unwrap();
    assert!(matches!(report.outcome, PurchaseOutcome::Rejected { .. }));
    assert!(report.cross_sell.is_none());
    assert!(popup.is_open());
    assert_eq!(popup.selection().cloned(), before);
    assert_eq!(
        popup.notice(),
        Some("All 1 Parka - Medium / Black are in your cart.")
    );
    assert!(!popup.view().unwrap().purchase.disabled);
    assert!(cart.rendered().is_empty());
}

#[tokio::test]
async fn cross_sell_fires_once_for_black_medium() {
    let server = MockServer::start().await;
    mount_add_ok(&server, 12).await;
    mount_cross_sell(&server, 1).await;

    let mut popup = popup_with_size(jacket("Black", "Medium"), "Medium");
    let report = flow(&server).activate_purchase(&mut popup).await.unwrap();

    assert_eq!(
        report.cross_sell,
        Some(CrossSellResult::Added {
            handle: "soft-winter-jacket".into(),
            variant_id: 901
        })
    );
}

#[tokio::test]
async fn cross_sell_matches_any_case() {
    let server = MockServer::start().await;
    mount_add_ok(&server, 12).await;
    mount_cross_sell(&server, 1).await;

    let mut popup = popup_with_size(jacket("BLACK", "medium"), "medium");
    let report = flow(&server).activate_purchase(&mut popup).await.unwrap();
    assert!(matches!(
        report.cross_sell,
        Some(CrossSellResult::Added { variant_id: 901, .. })
    ));
}

#[tokio::test]
async fn no_cross_sell_for_other_combinations() {
    let server = MockServer::start().await;
    mount_add_ok(&server, 12).await;
    mount_cross_sell(&server, 0).await;

    let mut popup = popup_with_size(jacket("Black", "Large"), "Large");
    let report = flow(&server).activate_purchase(&mut popup).await.unwrap();
    assert_eq!(report.cross_sell, Some(CrossSellResult::NotApplicable));
}

#[tokio::test]
async fn no_cross_sell_without_a_size_option() {
    let server = MockServer::start().await;
    mount_add_ok(&server, 21).await;
    mount_cross_sell(&server, 0).await;

    let mut popup = Popup::default();
    popup.open(scarf());
    let report = flow(&server).activate_purchase(&mut popup).await.unwrap();
    assert_eq!(report.outcome, PurchaseOutcome::Added);
    assert_eq!(report.cross_sell, Some(CrossSellResult::NotApplicable));
}

#[tokio::test]
async fn cross_sell_failure_is_swallowed() {
    let server = MockServer::start().await;
    mount_add_ok(&server, 12).await;
    Mock::given(method("GET"))
        .and(path("/products/soft-winter-jacket.js"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut popup = popup_with_size(jacket("Black", "Medium"), "Medium");
    let report = flow(&server).activate_purchase(&mut popup).await.unwrap();

    assert_eq!(report.outcome, PurchaseOutcome::Added);
    assert_eq!(
        report.cross_sell,
        Some(CrossSellResult::Failed {
            handle: "soft-winter-jacket".into()
        })
    );
    assert!(!popup.is_open());
}

#[tokio::test]
async fn cross_sell_skips_add_when_nothing_is_available() {
    let server = MockServer::start().await;
    mount_add_ok(&server, 12).await;
    Mock::given(method("GET"))
        .and(path("/products/soft-winter-jacket.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "title": "Soft Winter Jacket",
            "variants": [{ "id": 900, "price": 15000, "available": false }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut popup = popup_with_size(jacket("Black", "Medium"), "Medium");
    let report = flow(&server).activate_purchase(&mut popup).await.unwrap();
    assert_eq!(
        report.cross_sell,
        Some(CrossSellResult::Unavailable {
            handle: "soft-winter-jacket".into()
        })
    );
}

#[tokio::test]
async fn custom_rules_replace_the_default() {
    let server = MockServer::start().await;
    mount_add_ok(&server, 12).await;
    mount_cross_sell(&server, 0).await;
    Mock::given(method("GET"))
        .and(path("/products/rain-hat.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "title": "Rain Hat",
            "variants": [{ "id": 700, "price": 2500, "available": true }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .and(body_json(json!({ "items": [{ "id": 700, "quantity": 1 }] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = StorefrontClient::new(&server.uri(), 5, "spotcart-test/0.1").unwrap();
    let rules = RulesFile {
        cross_sell: vec![CrossSellRule {
            handle: "rain-hat".into(),
            color: "olive".into(),
            size: "medium".into(),
        }],
    };
    let flow = PurchaseFlow::new(client, rules);
    let mut popup = popup_with_size(jacket("Olive", "Medium"), "Medium");

    let report = flow.activate_purchase(&mut popup).await.unwrap();
    assert!(matches!(
        report.cross_sell,
        Some(CrossSellResult::Added { variant_id: 700, .. })
    ));
}

#[tokio::test]
async fn outcome_for_a_closed_session_refreshes_cart_but_not_the_new_popup() {
    let server = MockServer::start().await;
    mount_add_ok(&server, 12).await;
    mount_cross_sell(&server, 0).await;

    let cart = Arc::new(RecordingCart::default());
    let flow = flow(&server).with_cart(Arc::clone(&cart) as Arc<dyn CartCollaborator>);
    let mut popup = popup_with_size(jacket("Olive", "Medium"), "Medium");

    let ticket = popup.begin_purchase().expect("resolved");
    popup.close();
    popup.open(scarf());

    let submission = flow.submit(&ticket).await.expect("add should succeed");
    popup.finish_purchase(&ticket, PurchaseOutcome::Added);

    assert_eq!(submission.response, json!({ "id": 12 }));
    assert_eq!(cart.rendered().len(), 1);
    assert!(popup.is_open());
    assert_eq!(popup.view().unwrap().title, "Scarf");
}
