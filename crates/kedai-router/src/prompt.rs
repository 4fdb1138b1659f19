// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extraction prompt sent to the classifier model.

/// Instructions and few-shot examples. The customer message is appended by
/// [`extraction_prompt`].
const INSTRUCTIONS: &str = r#"Anda adalah sistem NLU (Natural Language Understanding) untuk toko online.
Tugas Anda adalah mem-parsing pesan pelanggan dan mengklasifikasikannya.

Ada dua INTENT:
1. "Order_Pesanan": Jika pesan pelanggan *terlihat* seperti order dan menggunakan format "nama:", "alamat:", dan "jumlah barang:".
2. "Chat_Biasa": Untuk SEMUA pesan lainnya.

Jika intent "Order_Pesanan" (meskipun tidak lengkap), ekstrak data berikut.
Jika "Chat_Biasa", set semua data ke null.

FORMAT OUTPUT HARUS JSON:
{
  "intent": "...",
  "nama": "...",
  "alamat_lengkap": "...",
  "kecamatan": "...",
  "kabupaten_kota": "...",
  "provinsi": "...",
  "jumlah_barang": ...
}

ATURAN EKSTRAKSI (PENTING):
- "alamat_lengkap": Ambil *seluruh* string setelah "alamat:".
- "kecamatan", "kabupaten_kota", "provinsi": Lihat di dalam string "alamat_lengkap" dan ekstrak nilainya. Cari kata kunci "kec.", "kab.", "kota", "prov.".
- "jumlah_barang": HARUS berupa ANGKA (integer) dari "jumlah barang:".
- Jika ada field yang tidak ditemukan, nilainya HARUS null.

Contoh 1 (Lengkap):
Pesan: "nama: Budi Santoso\nalamat: Jl. Mawar no 5, kec. Cibeber, kota Cilegon, prov. Banten\njumlah barang: 3"
Output: {
  "intent": "Order_Pesanan",
  "nama": "Budi Santoso",
  "alamat_lengkap": "Jl. Mawar no 5, kec. Cibeber, kota Cilegon, prov. Banten",
  "kecamatan": "Cibeber",
  "kabupaten_kota": "Cilegon",
  "provinsi": "Banten",
  "jumlah_barang": 3
}

Contoh 2 (Tidak Lengkap):
Pesan: "Saya mau order.\nnama: Budi Santoso\nalamat: Jl. Mawar no 5, Cilegon"
Output: {
  "intent": "Order_Pesanan",
  "nama": "Budi Santoso",
  "alamat_lengkap": "Jl. Mawar no 5, Cilegon",
  "kecamatan": null,
  "kabupaten_kota": "Cilegon",
  "provinsi": null,
  "jumlah_barang": null
}

Contoh 3 (Chat Biasa):
Pesan: "Halo, produknya ready?"
Output: {
  "intent": "Chat_Biasa",
  "nama": null,
  "alamat_lengkap": null,
  "kecamatan": null,
  "kabupaten_kota": null,
  "provinsi": null,
  "jumlah_barang": null
}"#;

/// Full extraction prompt for one customer message.
pub fn extraction_prompt(message: &str) -> String {
    format!("{INSTRUCTIONS}\n\n---\nPesan Pelanggan (BARU): \"{message}\"\nOutput (HANYA JSON):\n")
}
