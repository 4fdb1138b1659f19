// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shipping support for the Kedai order assistant.
//!
//! - [`rajaongkir`]: HTTP client for the RajaOngkir region and cost API
//! - [`resolver`]: fuzzy multi-level region resolution
//! - [`quote`]: destination resolution plus rate lookup

pub mod normalize;
pub mod quote;
pub mod rajaongkir;
pub mod resolver;

pub use quote::{QuoteError, QuoteService};
pub use rajaongkir::RajaOngkirClient;
pub use resolver::{MATCH_THRESHOLD, RegionResolver, ResolveError};
