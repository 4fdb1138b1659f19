// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order pipeline: completeness check, shipping quote and dynamic context.
//!
//! Only a complete ORDER keeps its intent. Incomplete orders, unrecognised
//! regions and rate-service outages are downgraded to CHAT with a context
//! block that tells the reply model what to say instead.

use std::fmt::Write as _;

use kedai_core::{Intent, IntentRecord, OrderFields, ParcelWeight, RegionLevel, ShippingQuote};
use kedai_shipping::{QuoteError, QuoteService};
use tracing::{info, warn};

/// Context used when nothing order-related applies.
pub const NO_CONTEXT: &str = "Tidak ada informasi tambahan.";

/// An order field the customer still has to provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Name,
    District,
    City,
    Province,
    ItemCount,
}

impl MissingField {
    /// Customer-facing label.
    pub fn label(self) -> &'static str {
        match self {
            MissingField::Name => "Nama Lengkap",
            MissingField::District => "Kecamatan",
            MissingField::City => "Kabupaten/Kota",
            MissingField::Province => "Provinsi",
            MissingField::ItemCount => "Jumlah Barang (harus angka, minimal 1)",
        }
    }

    fn for_level(level: RegionLevel) -> Self {
        match level {
            RegionLevel::Province => MissingField::Province,
            RegionLevel::City => MissingField::City,
            RegionLevel::District => MissingField::District,
        }
    }
}

/// Result of running one [`IntentRecord`] through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    pub intent: Intent,
    pub context: String,
    pub missing: Vec<MissingField>,
    pub quote: Option<ShippingQuote>,
}

impl PipelineOutcome {
    fn chat(context: String, missing: Vec<MissingField>) -> Self {
        Self {
            intent: Intent::Chat,
            context,
            missing,
            quote: None,
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Fields missing from an order, in customer-facing order.
pub fn missing_fields(order: &OrderFields) -> Vec<MissingField> {
    let mut missing = Vec::new();
    if present(&order.name).is_none() {
        missing.push(MissingField::Name);
    }
    if present(&order.district).is_none() {
        missing.push(MissingField::District);
    }
    if present(&order.city).is_none() {
        missing.push(MissingField::City);
    }
    if present(&order.province).is_none() {
        missing.push(MissingField::Province);
    }
    if !order.item_count.is_some_and(|n| n >= 1) {
        missing.push(MissingField::ItemCount);
    }
    missing
}

/// Turns classifier output into reply context, quoting complete orders.
pub struct OrderPipeline {
    quotes: QuoteService,
    unit_weight_grams: u32,
}

impl OrderPipeline {
    pub fn new(quotes: QuoteService, unit_weight_grams: u32) -> Self {
        Self {
            quotes,
            unit_weight_grams,
        }
    }

    pub async fn run(&self, record: &IntentRecord) -> PipelineOutcome {
        if record.intent != Intent::Order {
            return PipelineOutcome::chat(NO_CONTEXT.to_string(), Vec::new());
        }

        let order = &record.order;
        let missing = missing_fields(order);
        if !missing.is_empty() {
            info!(missing = ?missing, "order incomplete");
            return PipelineOutcome::chat(incomplete_block(&missing, None), missing);
        }

        let (Some(province), Some(city), Some(district), Some(count)) = (
            present(&order.province),
            present(&order.city),
            present(&order.district),
            order.item_count,
        ) else {
            return PipelineOutcome::chat(NO_CONTEXT.to_string(), Vec::new());
        };

        let items = u32::try_from(count).unwrap_or(u32::MAX);
        let weight = ParcelWeight::for_items(items, self.unit_weight_grams);

        match self.quotes.quote(province, city, district, weight).await {
            Ok(quote) => {
                info!(items, grams = weight.grams(), "order complete, shipping quoted");
                PipelineOutcome {
                    intent: Intent::Order,
                    context: quote_block(order, items, &quote),
                    missing: Vec::new(),
                    quote: Some(quote),
                }
            }
            Err(QuoteError::RegionNotFound { level, query }) => {
                warn!(%level, query = %query, "order region not recognised");
                let missing = vec![MissingField::for_level(level)];
                let note = format!(
                    "{} \"{query}\" tidak dikenali oleh sistem ongkir. Minta pelanggan memeriksa ejaannya atau menuliskannya lebih lengkap.",
                    MissingField::for_level(level).label()
                );
                PipelineOutcome::chat(incomplete_block(&missing, Some(&note)), missing)
            }
            Err(QuoteError::RateServiceUnavailable { reason }) => {
                warn!(reason = %reason, "shipping rate service unavailable");
                PipelineOutcome::chat(degraded_block(order, items), Vec::new())
            }
        }
    }
}

fn incomplete_block(missing: &[MissingField], note: Option<&str>) -> String {
    let mut block = String::from(
        "--- INFO ORDER TIDAK LENGKAP ---\n\
         TUGAS ANDA: Beri tahu pelanggan data apa yang kurang dengan ramah.\n\
         Pelanggan mencoba order, tapi data berikut tidak ada atau tidak valid:\n",
    );
    for field in missing {
        let _ = writeln!(block, "- {}", field.label());
    }
    if let Some(note) = note {
        let _ = writeln!(block, "Catatan: {note}");
    }
    block.push_str("---");
    block
}

/// Weight in kilograms without trailing zeros, e.g. `0.45`.
fn format_kg(weight: ParcelWeight) -> String {
    format!("{}", weight.kilograms())
}

fn quote_block(order: &OrderFields, items: u32, quote: &ShippingQuote) -> String {
    let rates = serde_json::to_string_pretty(&quote.rates).unwrap_or_else(|_| "[]".to_string());
    format!(
        "--- HASIL CEK ONGKIR (UNTUK ORDER) ---\n\
         TUGAS ANDA: Konfirmasi total biaya (produk + ongkir) dan minta persetujuan.\n\
         \n\
         Data Order Pelanggan:\n\
         - Nama: {name}\n\
         - Alamat: {address}\n\
         - Tujuan: {district}, {city}, {province}\n\
         - Jumlah: {items} pcs\n\
         - Total Berat: {kg} kg\n\
         \n\
         Hasil Perhitungan Ongkir:\n\
         {rates}\n\
         ---",
        name = present(&order.name).unwrap_or("-"),
        address = present(&order.full_address).unwrap_or("-"),
        district = quote.district.name,
        city = quote.city.name,
        province = quote.province.name,
        kg = format_kg(quote.weight),
    )
}

fn degraded_block(order: &OrderFields, items: u32) -> String {
    format!(
        "--- GANGGUAN SISTEM ONGKIR ---\n\
         TUGAS ANDA: Mohon maaf, sistem cek ongkir sedang gangguan.\n\
         Data order sudah dicatat (Nama: {name}, Jumlah: {items}, Alamat: {address}), tapi ongkir akan diinfo manual.\n\
         ---",
        name = present(&order.name).unwrap_or("-"),
        address = present(&order.full_address).unwrap_or("-"),
    )
}
