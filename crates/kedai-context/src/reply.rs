// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply generation: persona prompt, product knowledge, dynamic context and
//! recent conversation history in one language-model call.

use std::sync::Arc;

use kedai_config::model::AgentConfig;
use kedai_core::{ConversationStore, Direction, Message, ProviderAdapter, ProviderRequest};
use tracing::{debug, warn};

use crate::knowledge::ProductKnowledge;

/// History marker for a first-time conversation.
pub const NO_HISTORY: &str = "Belum ada riwayat percakapan.";

/// History marker when the store could not be read.
pub const HISTORY_UNAVAILABLE: &str = "Gagal memuat riwayat percakapan.";

/// Sent when the model fails or answers with nothing.
pub const FALLBACK_REPLY: &str = "Mohon maaf Kak, sepertinya sedang ada kendala teknis di pihak saya. Boleh coba bertanya lagi sesaat lagi?";

/// Bot persona shown to customers.
#[derive(Debug, Clone)]
pub struct Persona {
    pub bot_name: String,
    pub brand_name: String,
}

impl Persona {
    pub fn from_config(config: &AgentConfig) -> Self {
        Self {
            bot_name: config.bot_name.clone(),
            brand_name: config.brand_name.clone(),
        }
    }
}

/// Renders messages oldest-first as `Pelanggan:` / `Anda:` lines.
pub fn format_history(messages: &[Message]) -> String {
    if messages.is_empty() {
        return NO_HISTORY.to_string();
    }
    messages
        .iter()
        .map(|m| {
            let text = m
                .text
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or("[Media/File]");
            match m.direction {
                Direction::Incoming => format!("Pelanggan: {text}"),
                Direction::Outgoing => format!("Anda: {text}"),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The complete reply prompt.
pub fn build_prompt(
    persona: &Persona,
    knowledge: &str,
    context: &str,
    history: &str,
    question: &str,
) -> String {
    let bot = &persona.bot_name;
    let brand = &persona.brand_name;
    format!(
        r#"Anda adalah "{bot}", seorang product specialist dari brand "{brand}" yang sangat ramah, sabar, dan membantu.
Tugas utama Anda adalah melayani pertanyaan pelanggan dengan baik dan akurat.

ATURAN WAJIB:
1. Sumber Pengetahuan: Jawaban Anda HARUS dan HANYA berasal dari informasi yang ada di dalam "KONTEKS DOKUMEN PRODUK" dan "KONTEKS DINAMIS". Jangan pernah menggunakan pengetahuan di luar itu atau membuat asumsi.
2. Gaya Bahasa: Gunakan bahasa Indonesia yang luwes, hangat, dan mudah dimengerti, seolah-olah Anda sedang mengobrol dengan pelanggan di toko. Sapa pelanggan dengan panggilan "Kak".
3. Struktur Jawaban:
   - Jawab pertanyaan pelanggan secara LENGKAP dan JELAS, dengan detail relevan dari dokumen produk.
   - Jika informasi yang ditanyakan tidak ada, sampaikan permohonan maaf dengan sopan. Contoh: "Mohon maaf Kak, untuk informasi spesifik mengenai [topik pertanyaan], sepertinya saya tidak dapat menemukannya."
   - JANGAN PERNAH menyebutkan bahwa Anda mendapatkan informasi dari sebuah dokumen, konteks, atau sumber eksternal. Jawablah secara langsung.
   - Akhiri jawaban dengan ramah dan tawarkan bantuan lebih lanjut.
   - Untuk menebalkan teks, gunakan satu tanda asterik (*) di awal dan akhir frasa. Tidak perlu dua asterik.
4. SAPAAN AWAL: Jika "RIWAYAT PERCAKAPAN SEBELUMNYA" berisi teks "{NO_HISTORY}", ini adalah pesan PERTAMA dari pelanggan. WAJIB awali jawaban dengan sapaan perkenalan (Contoh: "Halo Kak! Selamat datang di {bot}. Ada yang bisa saya bantu?"), lalu jawab pertanyaan pelanggan jika ada.
5. INTERAKSI LANJUTAN: Jika "RIWAYAT PERCAKAPAN SEBELUMNYA" SUDAH BERISI obrolan, JANGAN gunakan sapaan perkenalan lagi. Langsung jawab pertanyaan pelanggan.

--- KONTEKS DOKUMEN PRODUK ---
{knowledge}
---

--- KONTEKS DINAMIS (BERDASARKAN INTENT & DATA ORDER) ---
{context}

--- RIWAYAT PERCAKAPAN SEBELUMNYA (Gunakan sebagai konteks) ---
{history}
---

Pertanyaan Pelanggan (BARU): "{question}"

Jawaban Anda:
"#
    )
}

/// Generates customer replies. Never fails; falls back to [`FALLBACK_REPLY`].
pub struct ReplyGenerator {
    provider: Arc<dyn ProviderAdapter>,
    store: Arc<dyn ConversationStore>,
    knowledge: Arc<ProductKnowledge>,
    persona: Persona,
    model: String,
    history_limit: usize,
}

impl ReplyGenerator {
    pub fn new(
        provider: Arc<dyn ProviderAdapter>,
        store: Arc<dyn ConversationStore>,
        knowledge: Arc<ProductKnowledge>,
        persona: Persona,
        model: impl Into<String>,
        history_limit: usize,
    ) -> Self {
        Self {
            provider,
            store,
            knowledge,
            persona,
            model: model.into(),
            history_limit,
        }
    }

    /// History of `conversation_id` without the message being answered.
    async fn history(&self, conversation_id: i64, answering: Option<i64>) -> String {
        match self
            .store
            .recent_messages(conversation_id, answering, self.history_limit)
            .await
        {
            Ok(messages) => format_history(&messages),
            Err(e) => {
                warn!(conversation_id, error = %e, "failed to load conversation history");
                HISTORY_UNAVAILABLE.to_string()
            }
        }
    }

    pub async fn generate(
        &self,
        conversation_id: i64,
        answering: Option<i64>,
        context: &str,
        question: &str,
    ) -> String {
        let history = self.history(conversation_id, answering).await;
        let prompt = build_prompt(&self.persona, self.knowledge.text(), context, &history, question);
        debug!(conversation_id, prompt_len = prompt.len(), "reply prompt assembled");

        let request = ProviderRequest {
            model: self.model.clone(),
            prompt,
        };
        match self.provider.complete(request).await {
            Ok(response) if !response.content.trim().is_empty() => response.content.trim().to_string(),
            Ok(_) => {
                warn!(conversation_id, "model returned an empty reply");
                FALLBACK_REPLY.to_string()
            }
            Err(e) => {
                warn!(conversation_id, error = %e, "reply generation failed");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}
