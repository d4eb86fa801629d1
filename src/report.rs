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

//! # Reports
//!
//! [`analyze`] runs a string through decoding, classification and detail
//! decoding and packages the outcome into an [`InfoReport`]. Failures at any
//! stage are represented in the report rather than returned as errors.
//!
//! A report can be flattened into a [`WireReport`], a JSON object whose
//! `details` field holds either a diagnostic or, for structured categories,
//! the JSON of the decoded record. [`WireReport::interpret`] reverses this
//! on the consumer side.

use std::{error, fmt};

use log::{debug, trace};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::category::{classify, PayloadCategory, PayloadLayout};
use crate::checksum::Variant;
use crate::codec;
use crate::config::Config;
use crate::detail::{decode_detail, PayloadDetail};
use crate::rgb20::Rgb20Asset;

/// Diagnostic of a successful parse.
pub const SUCCESS_MESSAGE: &str = "Bech32 parsed successfully";

/// Diagnostic of a report whose structured details could not be read back.
pub const INVALID_DETAIL_JSON_MESSAGE: &str =
    "Unable to recognize details from the provided JSON data";

/// Outcome of parsing a string.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParseStatus {
    /// Everything was decoded.
    Ok,
    /// The human-readable part is missing, invalid or the string mixes case.
    HrpError,
    /// Neither checksum matched.
    ChecksumError,
    /// The data part is too long, too short or holds invalid symbols.
    EncodingError,
    /// The payload does not fit its category.
    PayloadError,
    /// The payload is recognized but uses a variant which is not supported.
    UnsupportedError,
    /// The decoded details could not be serialized.
    InternalError,
    /// The structured details of a wire report are not valid JSON.
    InvalidDetailJson,
}

impl ParseStatus {
    /// Numeric code of the status on the wire.
    pub fn code(self) -> u16 {
        match self {
            ParseStatus::Ok => 0,
            ParseStatus::HrpError => 1,
            ParseStatus::ChecksumError => 2,
            ParseStatus::EncodingError => 3,
            ParseStatus::PayloadError => 4,
            ParseStatus::UnsupportedError => 5,
            ParseStatus::InternalError => 6,
            ParseStatus::InvalidDetailJson => 0xFFFF,
        }
    }

    /// The status with the given wire code.
    pub fn from_code(code: u16) -> Option<ParseStatus> {
        Some(match code {
            0 => ParseStatus::Ok,
            1 => ParseStatus::HrpError,
            2 => ParseStatus::ChecksumError,
            3 => ParseStatus::EncodingError,
            4 => ParseStatus::PayloadError,
            5 => ParseStatus::UnsupportedError,
            6 => ParseStatus::InternalError,
            0xFFFF => ParseStatus::InvalidDetailJson,
            _ => return None,
        })
    }

    /// Whether the string was fully decoded.
    pub fn is_ok(self) -> bool {
        self == ParseStatus::Ok
    }

    /// Whether a checksum variant is known for a report with this status.
    fn has_variant(self) -> bool {
        !matches!(
            self,
            ParseStatus::HrpError | ParseStatus::ChecksumError | ParseStatus::EncodingError
        )
    }
}

impl<'a> From<&'a codec::Error> for ParseStatus {
    fn from(e: &'a codec::Error) -> ParseStatus {
        match *e {
            codec::Error::MissingSeparator
            | codec::Error::EmptyHrp
            | codec::Error::HrpTooLong(_)
            | codec::Error::InvalidHrpChar(_)
            | codec::Error::MixedCase
            | codec::Error::Hrp(_) => ParseStatus::HrpError,
            codec::Error::InvalidChecksum => ParseStatus::ChecksumError,
            codec::Error::TooLong(_)
            | codec::Error::DataTooShort(_)
            | codec::Error::InvalidChar(_)
            | codec::Error::InvalidPadding
            | codec::Error::InvalidSymbol(_)
            | codec::Error::Parse(_) => ParseStatus::EncodingError,
        }
    }
}

impl fmt::Display for ParseStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            ParseStatus::Ok => "ok",
            ParseStatus::HrpError => "hrp_error",
            ParseStatus::ChecksumError => "checksum_error",
            ParseStatus::EncodingError => "encoding_error",
            ParseStatus::PayloadError => "payload_error",
            ParseStatus::UnsupportedError => "unsupported_error",
            ParseStatus::InternalError => "internal_error",
            ParseStatus::InvalidDetailJson => "invalid_detail_json",
        })
    }
}

/// A status code no [`ParseStatus`] has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownStatusCode(pub u16);

impl fmt::Display for UnknownStatusCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown status code {}", self.0)
    }
}

impl error::Error for UnknownStatusCode {}

impl Serialize for ParseStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.code())
    }
}

impl<'de> Deserialize<'de> for ParseStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;
        let code = u16::deserialize(deserializer)?;
        ParseStatus::from_code(code).ok_or_else(|| D::Error::custom(UnknownStatusCode(code)))
    }
}

/// Everything known about a parsed string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoReport {
    status: ParseStatus,
    variant: Option<Variant>,
    category: PayloadCategory,
    detail: Option<PayloadDetail>,
    diagnostic: String,
}

impl InfoReport {
    fn success(variant: Variant, category: PayloadCategory, detail: PayloadDetail) -> InfoReport {
        InfoReport {
            status: ParseStatus::Ok,
            variant: Some(variant),
            category,
            detail: Some(detail),
            diagnostic: SUCCESS_MESSAGE.to_owned(),
        }
    }

    fn failure<E: fmt::Display>(status: ParseStatus, variant: Option<Variant>, cause: E) -> InfoReport {
        InfoReport {
            status,
            variant,
            category: PayloadCategory::Unknown,
            detail: None,
            diagnostic: cause.to_string(),
        }
    }

    /// The outcome of the parse.
    pub fn status(&self) -> ParseStatus {
        self.status
    }

    /// Whether the string was fully decoded.
    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }

    /// The checksum which validated, if decoding got that far.
    pub fn variant(&self) -> Option<Variant> {
        self.variant
    }

    /// Whether the string uses a bech32m checksum.
    pub fn is_bech32m(&self) -> bool {
        self.variant.map_or(false, Variant::is_bech32m)
    }

    /// The category of the payload; unknown on any failure.
    pub fn category(&self) -> PayloadCategory {
        self.category
    }

    /// The decoded payload, present only on success.
    pub fn detail(&self) -> Option<&PayloadDetail> {
        self.detail.as_ref()
    }

    /// The success message, or the cause of the failure.
    pub fn diagnostic(&self) -> &str {
        &self.diagnostic
    }

    /// Flattens the report into its wire form.
    pub fn to_wire(&self) -> WireReport {
        let bech32m = self.is_bech32m();
        let details = match self.detail {
            Some(PayloadDetail::Rgb20Asset(ref asset)) if self.is_ok() => {
                match serde_json::to_string(asset) {
                    Ok(json) => json,
                    // Asset records hold only strings and integers; a serializer
                    // failure is still reported as a status rather than a panic.
                    Err(e) => {
                        debug!("failed to serialize asset details: {}", e);
                        return WireReport {
                            status: ParseStatus::InternalError,
                            bech32m,
                            category: PayloadCategory::Unknown,
                            details: e.to_string(),
                        };
                    }
                }
            }
            _ => self.diagnostic.clone(),
        };
        WireReport { status: self.status, bech32m, category: self.category, details }
    }

    /// The JSON text of the wire form.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.to_wire()).expect("wire reports hold only strings and numbers")
    }
}

impl fmt::Display for InfoReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.category.name())?;
        if let Some(variant) = self.variant {
            write!(f, " ({})", variant)?;
        }
        write!(f, ": {}", self.diagnostic)
    }
}

/// Analyzes `s` with the default limits.
pub fn analyze(s: &str) -> InfoReport {
    analyze_with(s, &Config::DEFAULT)
}

/// Analyzes `s`: decodes it, classifies its payload and decodes the
/// category-specific details.
pub fn analyze_with(s: &str, config: &Config) -> InfoReport {
    trace!("analyzing string of {} bytes", s.len());

    let decoded = match codec::decode_symbols(s, config) {
        Ok(decoded) => decoded,
        Err(e) => {
            debug!("bech32 decoding failed: {}", e);
            return InfoReport::failure(ParseStatus::from(&e), None, e);
        }
    };
    let variant = decoded.variant;
    trace!("decoded hrp `{}` with {} data symbols ({})", decoded.hrp, decoded.data.len(), variant);

    let payload = match PayloadLayout::for_hrp(&decoded.hrp).extract(&decoded.data) {
        Ok(payload) => payload,
        Err(e) => {
            debug!("payload extraction failed: {}", e);
            return InfoReport::failure(ParseStatus::from(&e), Some(variant), e);
        }
    };

    let category = classify(&decoded.hrp, &payload);
    trace!("classified {} payload bytes as {}", payload.len(), category.as_str());

    let detail = decode_detail(category, &decoded.hrp, &payload).and_then(|detail| {
        if let PayloadDetail::Address(ref address) = detail {
            address.check_encoding(variant, s.chars().count())?;
        }
        Ok(detail)
    });
    match detail {
        Ok(detail) => {
            trace!("decoded {} details", category.as_str());
            InfoReport::success(variant, category, detail)
        }
        Err(e) => {
            debug!("failed to decode {} details: {}", category.as_str(), e);
            let status = if e.is_unsupported() {
                ParseStatus::UnsupportedError
            } else {
                ParseStatus::PayloadError
            };
            InfoReport::failure(status, Some(variant), e)
        }
    }
}

/// The flat, JSON-friendly form of an [`InfoReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireReport {
    /// Status code.
    pub status: ParseStatus,
    /// Whether the checksum is bech32m.
    pub bech32m: bool,
    /// Category tag.
    pub category: PayloadCategory,
    /// The diagnostic, or the JSON record of a structured category.
    pub details: String,
}

impl WireReport {
    /// Parses the JSON text of a wire report.
    pub fn from_json(json: &str) -> Result<WireReport, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Rebuilds a report, decoding the `details` of structured categories.
    ///
    /// Details of other categories are not carried on the wire, so the
    /// report has none. Details which do not hold a valid record give a
    /// report with [`ParseStatus::InvalidDetailJson`].
    pub fn interpret(&self) -> InfoReport {
        // A padding failure is an encoding error raised after the checksum
        // validated, so it still carries the variant.
        let variant = if self.bech32m {
            Some(Variant::Bech32m)
        } else if self.status.has_variant()
            || self.details == codec::Error::InvalidPadding.to_string()
        {
            Some(Variant::Bech32)
        } else {
            None
        };

        if !(self.status.is_ok() && self.category.is_structured()) {
            return InfoReport {
                status: self.status,
                variant,
                category: self.category,
                detail: None,
                diagnostic: self.details.clone(),
            };
        }

        let asset = serde_json::from_str::<Rgb20Asset>(&self.details)
            .map_err(|e| e.to_string())
            .and_then(|asset| asset.validate().map(|_| asset).map_err(|e| e.to_string()));
        match asset {
            Ok(asset) => InfoReport {
                status: self.status,
                variant,
                category: self.category,
                detail: Some(PayloadDetail::Rgb20Asset(asset)),
                diagnostic: SUCCESS_MESSAGE.to_owned(),
            },
            Err(e) => {
                debug!("unable to read {} details: {}", self.category.as_str(), e);
                InfoReport::failure(ParseStatus::InvalidDetailJson, variant, INVALID_DETAIL_JSON_MESSAGE)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::rgb20::test::sample;

    #[test]
    fn status_codes() {
        let all = [
            ParseStatus::Ok,
            ParseStatus::HrpError,
            ParseStatus::ChecksumError,
            ParseStatus::EncodingError,
            ParseStatus::PayloadError,
            ParseStatus::UnsupportedError,
            ParseStatus::InternalError,
            ParseStatus::InvalidDetailJson,
        ];
        for status in all.iter() {
            assert_eq!(ParseStatus::from_code(status.code()), Some(*status));
        }
        assert_eq!(ParseStatus::InvalidDetailJson.code(), 0xFFFF);
        assert_eq!(ParseStatus::from_code(7), None);

        use serde_test::{assert_de_tokens_error, assert_tokens, Token};
        assert_tokens(&ParseStatus::ChecksumError, &[Token::U16(2)]);
        assert_de_tokens_error::<ParseStatus>(&[Token::U16(8)], "unknown status code 8");
    }

    #[test]
    fn segwit_address() {
        let report = analyze("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4");
        assert_eq!(report.status(), ParseStatus::Ok);
        assert_eq!(report.variant(), Some(Variant::Bech32));
        assert_eq!(report.category(), PayloadCategory::BcAddress);
        assert_eq!(report.diagnostic(), SUCCESS_MESSAGE);
        match report.detail() {
            Some(PayloadDetail::Address(addr)) => {
                assert_eq!(addr.network, bitcoin::Network::Bitcoin);
                assert_eq!(addr.kind(), "p2wpkh");
            }
            x => panic!("unexpected detail {:?}", x),
        }

        // upper case is fine as long as it is uniform
        let report = analyze("BC1QW508D6QEJXTDG4Y5R3ZARVARY0C5XW7KV8F3T4");
        assert!(report.is_ok());

        let report = analyze(
            "bc1pw508d6qejxtdg4y5r3zarvary0c5xw7kw508d6qejxtdg4y5r3zarvary0c5xw7kt5nd6y",
        );
        assert!(report.is_ok());
        assert!(report.is_bech32m());
    }

    #[test]
    fn segwit_wrong_checksum_variant() {
        // v1 program with a bech32 checksum
        let report = analyze("bc1p0xlxvlhemja6c4dqv22uapctqupfhlxm9h8z3k2e72q4k9hcz7vqh2y7hd");
        assert_eq!(report.status(), ParseStatus::PayloadError);
        assert_eq!(report.variant(), Some(Variant::Bech32));
        assert_eq!(report.category(), PayloadCategory::Unknown);
        assert!(report.detail().is_none());

        // v0 program with a bech32m checksum
        let report = analyze("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kemeawh");
        assert_eq!(report.status(), ParseStatus::PayloadError);
        assert!(report.is_bech32m());
    }

    #[test]
    fn decode_failures() {
        let report = analyze("");
        assert_eq!(report.status(), ParseStatus::HrpError);
        assert_eq!(report.variant(), None);
        assert_eq!(report.category(), PayloadCategory::Unknown);
        assert!(!report.diagnostic().is_empty());

        assert_eq!(analyze("Bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4").status(), ParseStatus::HrpError);
        assert_eq!(analyze("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t5").status(), ParseStatus::ChecksumError);
        assert_eq!(analyze("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3tb").status(), ParseStatus::EncodingError);
        assert_eq!(analyze("bc1qw5").status(), ParseStatus::EncodingError);

        let wide_hrp = format!("{}1qqqqqq", "é".repeat(42));
        let report = analyze(&wide_hrp);
        assert_eq!(report.status(), ParseStatus::HrpError);
        assert_eq!(report.diagnostic(), "invalid character 'é' in human-readable part");
    }

    #[test]
    fn length_limits() {
        let long = codec::encode("data", &[0u8; 100], Variant::Bech32m).unwrap();
        assert!(analyze(&long).is_ok());
        assert_eq!(analyze_with(&long, &Config::BIP173).status(), ParseStatus::EncodingError);
        assert!(analyze_with(&long, &Config::UNBOUNDED).is_ok());
    }

    #[test]
    fn padding_keeps_variant() {
        // one symbol cannot make a byte, and leaves non-zero padding
        let s = codec::encode_symbols("id", &[1], Variant::Bech32).unwrap();
        let report = analyze(&s);
        assert_eq!(report.status(), ParseStatus::EncodingError);
        assert_eq!(report.variant(), Some(Variant::Bech32));
        assert_eq!(report.to_wire().interpret(), report);

        let s = codec::encode_symbols("id", &[1], Variant::Bech32m).unwrap();
        let report = analyze(&s);
        assert_eq!(report.status(), ParseStatus::EncodingError);
        assert_eq!(report.variant(), Some(Variant::Bech32m));
        let wire = WireReport::from_json(&report.to_json()).unwrap();
        assert!(wire.bech32m);
        assert_eq!(wire.interpret(), report);
    }

    #[test]
    fn rgb20_asset() {
        let asset = sample();
        let report = analyze(&asset.to_string());
        assert!(report.is_ok(), "{}", report);
        assert!(report.is_bech32m());
        assert_eq!(report.category(), PayloadCategory::Rgb20Asset);
        assert_eq!(report.detail(), Some(&PayloadDetail::Rgb20Asset(asset.clone())));

        let wire = report.to_wire();
        assert_eq!(wire.status, ParseStatus::Ok);
        assert!(wire.bech32m);
        assert_eq!(serde_json::from_str::<Rgb20Asset>(&wire.details).unwrap(), asset);
    }

    #[test]
    fn truncated_rgb20_asset() {
        let payload = sample().to_payload();
        let s = codec::encode("rgb20", &payload[..payload.len() - 3], Variant::Bech32m).unwrap();
        let report = analyze(&s);
        assert_eq!(report.status(), ParseStatus::PayloadError);
        assert_eq!(report.category(), PayloadCategory::Unknown);
        assert_eq!(report.variant(), Some(Variant::Bech32m));
        assert!(!report.diagnostic().is_empty());
        assert!(report.detail().is_none());
    }

    #[test]
    fn compressed_rgb20_asset() {
        let asset = sample();
        let report = analyze(&asset.to_compressed_string().unwrap());
        assert!(report.is_ok(), "{}", report);
        assert_eq!(report.category(), PayloadCategory::Rgb20Asset);
        assert_eq!(report.detail(), Some(&PayloadDetail::Rgb20Asset(asset)));
    }

    #[test]
    fn unknown_raw_encoding() {
        let mut payload = sample().to_payload();
        payload[0] = 2;
        let s = codec::encode("rgb20", &payload, Variant::Bech32m).unwrap();
        let report = analyze(&s);
        assert_eq!(report.status(), ParseStatus::UnsupportedError);
        assert_eq!(report.category(), PayloadCategory::Unknown);
        assert_eq!(report.variant(), Some(Variant::Bech32m));
    }

    #[test]
    fn unknown_hrp() {
        let s = codec::encode("xyz", b"hello", Variant::Bech32).unwrap();
        let report = analyze(&s);
        assert!(report.is_ok());
        assert_eq!(report.category(), PayloadCategory::Unknown);
        assert_eq!(report.detail(), Some(&PayloadDetail::None));
    }

    #[test]
    fn wire_form() {
        let report = analyze("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4");
        let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": 0,
                "bech32m": false,
                "category": "bc_address",
                "details": SUCCESS_MESSAGE,
            })
        );

        let report = analyze("a1lqfn3q");
        let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
        assert_eq!(json["status"], 2);
        assert_eq!(json["category"], "unknown");
    }

    #[test]
    fn interpret_wire() {
        let report = analyze(&sample().to_string());
        let wire = WireReport::from_json(&report.to_json()).unwrap();
        assert_eq!(wire.interpret(), report);

        let report = analyze("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4");
        let back = report.to_wire().interpret();
        assert_eq!(back.status(), ParseStatus::Ok);
        assert_eq!(back.category(), PayloadCategory::BcAddress);
        assert_eq!(back.variant(), Some(Variant::Bech32));
        assert!(back.detail().is_none());

        let report = analyze("");
        let back = report.to_wire().interpret();
        assert_eq!(back, report);
    }

    #[test]
    fn invalid_detail_json() {
        let mut wire = analyze(&sample().to_string()).to_wire();
        wire.details.truncate(wire.details.len() / 2);
        let report = wire.interpret();
        assert_eq!(report.status(), ParseStatus::InvalidDetailJson);
        assert_eq!(report.category(), PayloadCategory::Unknown);
        assert_eq!(report.diagnostic(), INVALID_DETAIL_JSON_MESSAGE);
        assert_eq!(report.to_wire().status.code(), 0xFFFF);

        // well-formed JSON, but not a valid record
        let mut asset = sample();
        asset.precision = 30;
        let mut wire = analyze(&sample().to_string()).to_wire();
        wire.details = serde_json::to_string(&asset).unwrap();
        assert_eq!(wire.interpret().status(), ParseStatus::InvalidDetailJson);
    }
}
