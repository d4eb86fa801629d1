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

//! # Payload details
//!
//! Category-specific interpretation of a decoded payload. Only RGB20 asset
//! records are decoded into a full structure; other categories get their
//! framing checked (lengths, versions, headers) and keep the payload as
//! opaque bytes, inflated when it is compressed.

use std::convert::TryFrom;
use std::{error, fmt, str};

use bitcoin::hex::DisplayHex;
use bitcoin::{Network, WitnessVersion};
use serde::{Serialize, Serializer};

use crate::category::{self, PayloadCategory, HRP_LNPBP_ZDATA};
use crate::checksum::Variant;
use crate::config::SEGWIT_MAX_LENGTH;
use crate::id::{ContractId, LnpbpId, ParseIdError, SchemaId};
use crate::raw::{self, RawEncoding};
use crate::rgb20::{self, Rgb20Asset};

/// Number of symbols holding the BOLT11 timestamp.
const BOLT11_TIMESTAMP_SYMBOLS: usize = 7;

/// Number of symbols holding the BOLT11 recoverable signature (65 bytes).
const BOLT11_SIGNATURE_SYMBOLS: usize = 104;

/// Millisatoshis in one bitcoin.
const MSAT_PER_BTC: u64 = 100_000_000_000;

/// A payload did not match the framing its category requires.
#[derive(Debug)]
pub enum Error {
    /// A URL payload is not UTF-8.
    InvalidUrl(str::Utf8Error),
    /// A segwit payload has no witness version.
    MissingWitnessVersion,
    /// Script version must be 0 to 16 inclusive
    InvalidWitnessVersion(u8),
    /// The witness program must be between 2 and 40 bytes in length.
    InvalidWitnessProgramLength(usize),
    /// A v0 witness program must be either of length 20 or 32.
    InvalidSegwitV0ProgramLength(usize),
    /// A v1+ witness program must use bech32m not bech32
    InvalidWitnessEncoding,
    /// A v0 witness program must use bech32 not bech32m
    InvalidSegwitV0Encoding,
    /// A segwit address longer than 90 characters.
    AddressTooLong(usize),
    /// A BOLT11 HRP with a malformed amount.
    InvalidAmount(String),
    /// A BOLT11 data part too short for the timestamp and signature.
    InvoiceTooShort(usize),
    /// An identifier of the wrong length.
    Id(ParseIdError),
    /// Raw data with a missing or unknown header, or a corrupt compressed
    /// stream.
    Raw(raw::Error),
    /// An RGB20 asset record failed to decode.
    Rgb20(rgb20::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InvalidUrl(ref e) => write!(f, "URL is not valid UTF-8: {}", e),
            Error::MissingWitnessVersion => write!(f, "missing witness version"),
            Error::InvalidWitnessVersion(ref wver) => {
                write!(f, "invalid witness script version: {}", wver)
            }
            Error::InvalidWitnessProgramLength(ref len) => {
                write!(f, "the witness program must be between 2 and 40 bytes in length, not {}", len)
            }
            Error::InvalidSegwitV0ProgramLength(ref len) => {
                write!(f, "a v0 witness program must be length 20 or 32, not {}", len)
            }
            Error::InvalidWitnessEncoding => {
                write!(f, "v1+ witness program must use bech32m not bech32")
            }
            Error::InvalidSegwitV0Encoding => {
                write!(f, "v0 witness program must use bech32 not bech32m")
            }
            Error::AddressTooLong(len) => {
                write!(f, "segwit address must be at most 90 characters, not {}", len)
            }
            Error::InvalidAmount(ref a) => write!(f, "invalid invoice amount `{}`", a),
            Error::InvoiceTooShort(len) => {
                write!(f, "invoice data part of {} symbols is too short", len)
            }
            Error::Id(ref e) => write!(f, "{}", e),
            Error::Raw(ref e) => write!(f, "{}", e),
            Error::Rgb20(ref e) => write!(f, "{}", e),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::InvalidUrl(ref e) => Some(e),
            Error::Id(ref e) => Some(e),
            Error::Raw(ref e) => Some(e),
            Error::Rgb20(ref e) => Some(e),
            _ => None,
        }
    }
}

impl Error {
    /// Whether the payload was recognized but uses a variant which is not
    /// implemented, as opposed to being malformed.
    pub fn is_unsupported(&self) -> bool {
        match *self {
            Error::Raw(ref e) | Error::Rgb20(rgb20::Error::Raw(ref e)) => e.is_unsupported(),
            _ => false,
        }
    }
}

#[doc(hidden)]
impl From<ParseIdError> for Error {
    fn from(e: ParseIdError) -> Error {
        Error::Id(e)
    }
}

#[doc(hidden)]
impl From<raw::Error> for Error {
    fn from(e: raw::Error) -> Error {
        Error::Raw(e)
    }
}

#[doc(hidden)]
impl From<rgb20::Error> for Error {
    fn from(e: rgb20::Error) -> Error {
        Error::Rgb20(e)
    }
}

fn serialize_hex<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&data.as_hex())
}

/// A segwit output described by a `bc`, `tb` or `bcrt` string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SegwitAddress {
    /// The network the HRP belongs to.
    pub network: Network,
    /// The segwit version.
    pub version: u8,
    /// The segwit program.
    #[serde(serialize_with = "serialize_hex")]
    pub program: Vec<u8>,
}

impl SegwitAddress {
    /// Parses a `[version, program..]` payload.
    pub fn from_payload(network: Network, payload: &[u8]) -> Result<SegwitAddress, Error> {
        let (version, program) = payload.split_first().ok_or(Error::MissingWitnessVersion)?;
        let witver =
            WitnessVersion::try_from(*version).map_err(|_| Error::InvalidWitnessVersion(*version))?;
        if program.len() < 2 || program.len() > 40 {
            return Err(Error::InvalidWitnessProgramLength(program.len()));
        }
        // Specific segwit v0 check. These addresses can never spend funds sent
        // to them.
        if witver == WitnessVersion::V0 && (program.len() != 20 && program.len() != 32) {
            return Err(Error::InvalidSegwitV0ProgramLength(program.len()));
        }
        Ok(SegwitAddress { network, version: witver.to_num(), program: program.to_vec() })
    }

    /// The witness version of the address, if `version` is in range.
    pub fn witness_version(&self) -> Option<WitnessVersion> {
        WitnessVersion::try_from(self.version).ok()
    }

    /// Checks the BIP-350 checksum rule and the BIP-173 length limit.
    pub fn check_encoding(&self, variant: Variant, len: usize) -> Result<(), Error> {
        match (self.version, variant) {
            (0, Variant::Bech32m) => return Err(Error::InvalidSegwitV0Encoding),
            (v, Variant::Bech32) if v > 0 => return Err(Error::InvalidWitnessEncoding),
            _ => {}
        }
        if len > SEGWIT_MAX_LENGTH {
            return Err(Error::AddressTooLong(len));
        }
        Ok(())
    }

    /// The standard output type the program corresponds to.
    pub fn kind(&self) -> &'static str {
        match (self.version, self.program.len()) {
            (0, 20) => "p2wpkh",
            (0, 32) => "p2wsh",
            (1, 32) => "p2tr",
            _ => "witness program",
        }
    }
}

/// What the human-readable part and framing of a BOLT11 invoice tell.
///
/// Tagged fields and the signature are not interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Bolt11Summary {
    /// The network of the invoice currency.
    pub network: Network,
    /// Requested amount, if any.
    pub amount_msat: Option<u64>,
    /// Invoice creation time, in seconds since the unix epoch.
    pub timestamp: u64,
}

impl Bolt11Summary {
    /// Parses the HRP and the 5-bit data part of an invoice.
    pub fn from_parts(hrp: &str, symbols: &[u8]) -> Result<Bolt11Summary, Error> {
        let (network, amount) =
            category::bolt11_currency(hrp).ok_or_else(|| Error::InvalidAmount(hrp.to_owned()))?;
        let amount_msat = parse_amount_msat(amount)?;
        if symbols.len() < BOLT11_TIMESTAMP_SYMBOLS + BOLT11_SIGNATURE_SYMBOLS {
            return Err(Error::InvoiceTooShort(symbols.len()));
        }
        let timestamp = symbols[..BOLT11_TIMESTAMP_SYMBOLS]
            .iter()
            .fold(0u64, |acc, s| acc << 5 | u64::from(*s));
        Ok(Bolt11Summary { network, amount_msat, timestamp })
    }
}

/// Converts a BOLT11 amount (digits and an optional multiplier) into
/// millisatoshis.
fn parse_amount_msat(amount: &str) -> Result<Option<u64>, Error> {
    if amount.is_empty() {
        return Ok(None);
    }
    let invalid = || Error::InvalidAmount(amount.to_owned());

    let (digits, multiplier) = match amount.char_indices().last() {
        Some((i, c)) if "munp".contains(c) => (&amount[..i], Some(c)),
        _ => (amount, None),
    };
    if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let value: u64 = digits.parse().map_err(|_| invalid())?;
    let msat = match multiplier {
        None => value.checked_mul(MSAT_PER_BTC),
        Some('m') => value.checked_mul(MSAT_PER_BTC / 1_000),
        Some('u') => value.checked_mul(MSAT_PER_BTC / 1_000_000),
        Some('n') => value.checked_mul(MSAT_PER_BTC / 1_000_000_000),
        // a pico-bitcoin is a tenth of a millisatoshi
        Some(_) if value % 10 == 0 => Some(value / 10),
        Some(_) => None,
    };
    msat.map(Some).ok_or_else(invalid)
}

/// The decoded content of a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PayloadDetail {
    /// Nothing is known about the payload.
    None,
    /// A URL.
    Url(String),
    /// A segwit address.
    Address(SegwitAddress),
    /// A lightning invoice.
    Invoice(Bolt11Summary),
    /// An LNPBP-39 identifier.
    LnpbpId(LnpbpId),
    /// An RGB schema id.
    SchemaId(SchemaId),
    /// An RGB contract id.
    ContractId(ContractId),
    /// Opaque bytes, inflated if they were compressed.
    Data(#[serde(serialize_with = "serialize_hex")] Vec<u8>),
    /// RGB raw data, inflated but otherwise left undecoded.
    RawData {
        /// The header of the data.
        encoding: RawEncoding,
        /// The bytes following the header, inflated if compressed.
        #[serde(serialize_with = "serialize_hex")]
        data: Vec<u8>,
    },
    /// An RGB20 asset record.
    Rgb20Asset(Rgb20Asset),
}

/// Decodes `payload` according to `category`.
///
/// `hrp` is needed for the categories which carry information in it
/// (network of an address, amount of an invoice). The payload is laid out
/// as [`crate::category::PayloadLayout::for_hrp`] selects.
pub fn decode_detail(
    category: PayloadCategory,
    hrp: &str,
    payload: &[u8],
) -> Result<PayloadDetail, Error> {
    Ok(match category {
        PayloadCategory::Unknown => PayloadDetail::None,
        PayloadCategory::Url => {
            PayloadDetail::Url(str::from_utf8(payload).map_err(Error::InvalidUrl)?.to_owned())
        }
        PayloadCategory::BcAddress => {
            let network = category::segwit_network(hrp).unwrap_or(Network::Bitcoin);
            PayloadDetail::Address(SegwitAddress::from_payload(network, payload)?)
        }
        PayloadCategory::Bolt11Invoice => {
            PayloadDetail::Invoice(Bolt11Summary::from_parts(hrp, payload)?)
        }
        PayloadCategory::LnpbpId => PayloadDetail::LnpbpId(LnpbpId::from_slice(payload)?),
        PayloadCategory::RgbSchemaId => PayloadDetail::SchemaId(SchemaId::from_slice(payload)?),
        PayloadCategory::RgbContractId => {
            PayloadDetail::ContractId(ContractId::from_slice(payload)?)
        }
        PayloadCategory::LnpbpData | PayloadCategory::LnpbpInvoice => {
            PayloadDetail::Data(payload.to_vec())
        }
        // `z` strings hold a bare deflate stream, `data` ones a header first
        PayloadCategory::LnpbpZData if hrp == HRP_LNPBP_ZDATA => {
            PayloadDetail::Data(raw::inflate(payload)?)
        }
        PayloadCategory::LnpbpZData => PayloadDetail::Data(raw::decode(payload)?.1),
        PayloadCategory::RgbSchema | PayloadCategory::RgbGenesis | PayloadCategory::RgbConsignment => {
            let (encoding, data) = raw::decode(payload)?;
            PayloadDetail::RawData { encoding, data }
        }
        PayloadCategory::Rgb20Asset => PayloadDetail::Rgb20Asset(Rgb20Asset::from_payload(payload)?),
    })
}
