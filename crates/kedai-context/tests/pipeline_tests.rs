// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order pipeline against the in-memory shipping fixture.

use std::sync::Arc;

use kedai_context::{MissingField, NO_CONTEXT, OrderPipeline};
use kedai_core::{Intent, IntentRecord, OrderFields};
use kedai_shipping::QuoteService;
use kedai_test_utils::mock_shipping::{CILEGON_ID, region};
use kedai_test_utils::{MockShipping, ShippingCall};

fn budi_order(count: Option<i64>) -> IntentRecord {
    IntentRecord {
        intent: Intent::Order,
        order: OrderFields {
            name: Some("Budi".into()),
            full_address: Some("Jl. Mawar, kec. Cibeber, kota Cilegon, prov. Banten".into()),
            district: Some("Cibeber".into()),
            city: Some("Cilegon".into()),
            province: Some("Banten".into()),
            item_count: count,
        },
    }
}

fn pipeline(shipping: &Arc<MockShipping>) -> OrderPipeline {
    OrderPipeline::new(QuoteService::new(shipping.clone(), 1477, "jne:jnt"), 150)
}

#[tokio::test]
async fn complete_order_keeps_intent_and_quotes() {
    let shipping = Arc::new(MockShipping::fixture());
    let outcome = pipeline(&shipping).run(&budi_order(Some(3))).await;

    assert_eq!(outcome.intent, Intent::Order);
    assert!(outcome.missing.is_empty());
    assert!(outcome.context.contains("HASIL CEK ONGKIR"));
    assert!(outcome.context.contains("Total Berat: 0.45 kg"));
    assert!(outcome.context.contains("\"service\": \"REG\""));
    assert!(outcome.context.contains("\"cost\": 11000"));
    assert!(outcome.context.contains("Jumlah: 3 pcs"));
    assert_eq!(outcome.quote.unwrap().rates.len(), 2);
    assert_eq!(shipping.last_cost_request().unwrap().weight.grams(), 450);
}

#[tokio::test]
async fn unknown_district_becomes_missing_data() {
    let shipping = Arc::new(
        MockShipping::fixture()
            .with_districts(CILEGON_ID, vec![region(1433, "CIWANDAN"), region(1434, "CITANGKIL")]),
    );
    let outcome = pipeline(&shipping).run(&budi_order(Some(3))).await;

    assert_eq!(outcome.intent, Intent::Chat);
    assert_eq!(outcome.missing, vec![MissingField::District]);
    assert!(outcome.context.contains("INFO ORDER TIDAK LENGKAP"));
    assert!(outcome.context.contains("- Kecamatan\n"));
    assert!(outcome.context.contains("\"Cibeber\""));
    assert!(outcome.quote.is_none());
    assert_eq!(shipping.calls(ShippingCall::Cost), 0);
}

#[tokio::test]
async fn chat_passes_through() {
    let shipping = Arc::new(MockShipping::fixture());
    let outcome = pipeline(&shipping).run(&IntentRecord::chat()).await;

    assert_eq!(outcome.intent, Intent::Chat);
    assert_eq!(outcome.context, NO_CONTEXT);
    assert!(outcome.missing.is_empty());
    assert_eq!(shipping.calls(ShippingCall::Provinces), 0);
}

#[tokio::test]
async fn invalid_item_count_is_incomplete_without_lookups() {
    let shipping = Arc::new(MockShipping::fixture());
    for count in [Some(0), Some(-1), None] {
        let outcome = pipeline(&shipping).run(&budi_order(count)).await;
        assert_eq!(outcome.intent, Intent::Chat);
        assert_eq!(outcome.missing, vec![MissingField::ItemCount]);
        assert!(outcome.context.contains("Jumlah Barang (harus angka, minimal 1)"));
    }
    assert_eq!(shipping.calls(ShippingCall::Provinces), 0);
}

#[tokio::test]
async fn rate_outage_degrades_but_keeps_order() {
    let shipping = Arc::new(MockShipping::fixture());
    shipping.fail(ShippingCall::Cost);
    let outcome = pipeline(&shipping).run(&budi_order(Some(2))).await;

    assert_eq!(outcome.intent, Intent::Chat);
    assert!(outcome.missing.is_empty());
    assert!(outcome.context.contains("GANGGUAN SISTEM ONGKIR"));
    assert!(outcome.context.contains("Nama: Budi"));
    assert!(outcome.context.contains("Jumlah: 2"));
}

#[tokio::test]
async fn input_record_is_not_mutated() {
    let shipping = Arc::new(MockShipping::fixture());
    let record = budi_order(Some(0));
    let before = record.clone();
    let _ = pipeline(&shipping).run(&record).await;
    assert_eq!(record, before);
}
