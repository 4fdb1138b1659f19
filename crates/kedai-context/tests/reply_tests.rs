// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply generation with a real SQLite store and a scripted model.

use std::sync::Arc;

use kedai_config::model::AgentConfig;
use kedai_context::{FALLBACK_REPLY, NO_HISTORY, Persona, ProductKnowledge, ReplyGenerator};
use kedai_core::{ConversationStore, IncomingOutcome, NewIncoming};
use kedai_test_utils::{MockProvider, TestHarness};

fn generator(provider: &Arc<MockProvider>, harness: &TestHarness) -> ReplyGenerator {
    ReplyGenerator::new(
        provider.clone(),
        harness.store.clone(),
        Arc::new(ProductKnowledge::from_text("Serum Waiteu 30ml Rp 89.000").unwrap()),
        Persona::from_config(&AgentConfig::default()),
        "reply-model",
        10,
    )
}

async fn incoming(harness: &TestHarness, conv: i64, contact: i64, wamid: &str, text: &str) -> i64 {
    match harness
        .store
        .record_incoming(NewIncoming {
            conversation_id: conv,
            contact_id: contact,
            wa_message_id: wamid.into(),
            text: text.into(),
            timestamp: None,
        })
        .await
        .unwrap()
    {
        IncomingOutcome::Created(m) => m.id,
        IncomingOutcome::Duplicate => panic!("unexpected duplicate"),
    }
}

#[tokio::test]
async fn first_message_sees_empty_history() {
    let harness = TestHarness::new().await.unwrap();
    let provider = Arc::new(MockProvider::with_responses(vec!["Halo Kak!".into()]));
    let contact = harness.store.upsert_contact("628111", Some("Ani")).await.unwrap();
    let conv = harness.store.open_conversation(contact.id).await.unwrap();
    let first = incoming(&harness, conv.id, contact.id, "wamid.1", "Halo, ready ga?").await;

    let reply = generator(&provider, &harness)
        .generate(conv.id, Some(first), "Tidak ada informasi tambahan.", "Halo, ready ga?")
        .await;

    assert_eq!(reply, "Halo Kak!");
    let prompt = provider.last_prompt().await.unwrap();
    assert!(prompt.contains(&format!("(Gunakan sebagai konteks) ---\n{NO_HISTORY}")));
    assert!(prompt.contains("Tidak ada informasi tambahan."));
    assert_eq!(provider.requests().await[0].model, "reply-model");
}

#[tokio::test]
async fn second_message_history_contains_first() {
    let harness = TestHarness::new().await.unwrap();
    let provider = Arc::new(MockProvider::new());
    let contact = harness.store.upsert_contact("628111", Some("Ani")).await.unwrap();
    let conv = harness.store.open_conversation(contact.id).await.unwrap();

    incoming(&harness, conv.id, contact.id, "wamid.1", "Halo").await;
    let second = incoming(&harness, conv.id, contact.id, "wamid.2", "Harga serum?").await;

    generator(&provider, &harness)
        .generate(conv.id, Some(second), "Tidak ada informasi tambahan.", "Harga serum?")
        .await;

    let prompt = provider.last_prompt().await.unwrap();
    assert!(prompt.contains("Pelanggan: Halo\n---"));
    assert!(!prompt.contains("Pelanggan: Harga serum?"));
}

#[tokio::test]
async fn model_failure_returns_fallback() {
    let harness = TestHarness::new().await.unwrap();
    let provider = Arc::new(MockProvider::new());
    provider.add_failure("503").await;
    let contact = harness.store.upsert_contact("628111", None).await.unwrap();
    let conv = harness.store.open_conversation(contact.id).await.unwrap();

    let reply = generator(&provider, &harness).generate(conv.id, None, "x", "y").await;
    assert_eq!(reply, FALLBACK_REPLY);
}

#[tokio::test]
async fn history_limit_keeps_most_recent() {
    let harness = TestHarness::new().await.unwrap();
    let provider = Arc::new(MockProvider::new());
    let contact = harness.store.upsert_contact("628111", None).await.unwrap();
    let conv = harness.store.open_conversation(contact.id).await.unwrap();
    for i in 0..12 {
        incoming(&harness, conv.id, contact.id, &format!("wamid.{i}"), &format!("pesan {i}")).await;
    }

    generator(&provider, &harness).generate(conv.id, None, "x", "y").await;
    let prompt = provider.last_prompt().await.unwrap();
    assert!(!prompt.contains("Pelanggan: pesan 1\n"));
    assert!(prompt.contains("Pelanggan: pesan 2\n"));
    assert!(prompt.contains("Pelanggan: pesan 11\n---"));
}
