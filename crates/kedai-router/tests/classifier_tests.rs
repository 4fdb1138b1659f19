// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use kedai_core::{Intent, IntentRecord};
use kedai_router::IntentClassifier;
use kedai_test_utils::MockProvider;

#[tokio::test]
async fn classify_uses_configured_model_and_prompt() {
    let provider = Arc::new(MockProvider::with_responses(vec![
        r#"{"intent":"Order_Pesanan","nama":"Budi","alamat_lengkap":"Jl. Mawar","kecamatan":null,"kabupaten_kota":"Cilegon","provinsi":null,"jumlah_barang":"2"}"#.into(),
    ]));
    let classifier = IntentClassifier::new(provider.clone(), "classifier-model");

    let record = classifier.classify("nama: Budi\nalamat: Jl. Mawar, Cilegon\njumlah barang: 2").await;
    assert_eq!(record.intent, Intent::Order);
    assert_eq!(record.order.item_count, Some(2));
    assert_eq!(record.order.district, None);

    let requests = provider.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "classifier-model");
    assert!(requests[0].prompt.contains("jumlah barang: 2"));
}

#[tokio::test]
async fn provider_failure_yields_chat() {
    let provider = Arc::new(MockProvider::new());
    provider.add_failure("quota").await;
    let classifier = IntentClassifier::new(provider, "m");
    assert_eq!(classifier.classify("halo").await, IntentRecord::chat());
}

#[tokio::test]
async fn unparseable_answer_yields_chat() {
    let provider = Arc::new(MockProvider::with_responses(vec!["Halo Kak!".into()]));
    let classifier = IntentClassifier::new(provider, "m");
    assert_eq!(classifier.classify("halo").await, IntentRecord::chat());
}
