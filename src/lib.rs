// Bech32 Info Library
// Written by
//   The bech32-info developers
//
// To the extent possible under law, the author(s) have dedicated all
// copyright and related and neighboring rights to this software to
// the public domain worldwide. This software is distributed without
// any warranty.
//
// You should have received a copy of the CC0 Public Domain Dedication
// along with this software.
// If not, see <http://creativecommons.org/publicdomain/zero/1.0/>.
//

//! # Bech32 Info Library
//!
//! Decoding of bech32 and bech32m strings and classification of the payloads
//! they carry: segwit addresses, lightning invoices, LNURLs, LNPBP
//! identifiers and data, and RGB identifiers, contracts and assets.
//! Deflate-compressed payloads are inflated.
//!
//! [`analyze`] never fails; every problem with its input is reported in the
//! returned [`InfoReport`].
//!
//! ```
//! use bech32_info::{analyze, ParseStatus, PayloadCategory};
//!
//! let report = analyze("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4");
//! assert_eq!(report.status(), ParseStatus::Ok);
//! assert_eq!(report.category(), PayloadCategory::BcAddress);
//! ```
//!

// Coding conventions
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![deny(missing_docs)]

pub extern crate bitcoin;

pub mod category;
pub mod checksum;
pub mod codec;
pub mod config;
pub mod detail;
pub mod encode;
pub mod id;
pub mod raw;
mod report;
pub mod rgb20;

// export everything at the top level so it can be used as `bech32_info::InfoReport` etc.
pub use crate::category::{classify, PayloadCategory, PayloadLayout};
pub use crate::checksum::Variant;
pub use crate::config::Config;
pub use crate::detail::{decode_detail, Bolt11Summary, PayloadDetail, SegwitAddress};
pub use crate::id::{ContractId, LnpbpId, ParseIdError, SchemaId};
pub use crate::raw::RawEncoding;
pub use crate::report::{
    analyze, analyze_with, InfoReport, ParseStatus, UnknownStatusCode, WireReport,
    INVALID_DETAIL_JSON_MESSAGE, SUCCESS_MESSAGE,
};
pub use crate::rgb20::Rgb20Asset;
