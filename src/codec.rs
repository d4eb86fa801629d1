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


//! # Bech32 codec
//!
//! Parsing and producing bech32 and bech32m strings: the human-readable
//! part, the separator, the base-32 data part and its checksum. Decoding
//! accepts either checksum variant and reports which one matched.
//!
//! Character checks, HRP parsing and the checksum arithmetic are done by the
//! `bech32` primitives; this module orders the checks, applies the length
//! limit and regroups the data part.

use std::convert::TryFrom;
use std::{error, fmt};

use bech32::primitives::decode::{CharError, UncheckedHrpstring, UncheckedHrpstringError};
use bech32::primitives::gf32::Fe32;
use bech32::primitives::hrp;
use bech32::primitives::iter::{ByteIterExt, Fe32IterExt};
use bech32::Hrp;

use crate::checksum::{self, Variant, CHECKSUM_LENGTH};
use crate::config::Config;

/// Human-readable part and data part separator
pub const SEP: char = '1';

/// Maximum length of the human-readable part.
pub const MAX_HRP_LENGTH: usize = 83;

/// Bech32 parsing and encoding error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The string is longer than the configured maximum.
    TooLong(usize),
    /// No separator character was found.
    MissingSeparator,
    /// The human-readable part is empty.
    EmptyHrp,
    /// The human-readable part is longer than 83 characters.
    HrpTooLong(usize),
    /// The human-readable part contains a character outside ASCII 33..=126.
    InvalidHrpChar(char),
    /// The data part is too short to hold a checksum.
    DataTooShort(usize),
    /// The data part contains a character outside the bech32 alphabet.
    InvalidChar(char),
    /// The string mixes upper and lower case characters.
    MixedCase,
    /// Neither the bech32 nor the bech32m checksum matched.
    InvalidChecksum,
    /// Regrouping into bytes left too many or non-zero padding bits.
    InvalidPadding,
    /// A value passed for encoding does not fit into 5 bits.
    InvalidSymbol(u8),
    /// Any other human-readable part error from the bech32 parser.
    Hrp(hrp::Error),
    /// Any other character error from the bech32 parser.
    Parse(UncheckedHrpstringError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::TooLong(len) => write!(f, "string of {} characters exceeds the length limit", len),
            Error::MissingSeparator => write!(f, "missing human-readable part separator"),
            Error::EmptyHrp => write!(f, "empty human-readable part"),
            Error::HrpTooLong(len) => {
                write!(f, "human-readable part must be at most 83 characters, not {}", len)
            }
            Error::InvalidHrpChar(c) => {
                write!(f, "invalid character {:?} in human-readable part", c)
            }
            Error::DataTooShort(len) => {
                write!(f, "data part of {} characters is too short to hold a checksum", len)
            }
            Error::InvalidChar(c) => write!(f, "invalid character {:?} in data part", c),
            Error::MixedCase => write!(f, "mixed-case strings are not allowed"),
            Error::InvalidChecksum => write!(f, "invalid bech32 or bech32m checksum"),
            Error::InvalidPadding => write!(f, "invalid padding bits in the data part"),
            Error::InvalidSymbol(v) => write!(f, "value {} does not fit into 5 bits", v),
            Error::Hrp(ref e) => write!(f, "invalid human-readable part: {}", e),
            Error::Parse(ref e) => write!(f, "invalid bech32 string: {}", e),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Hrp(ref e) => Some(e),
            Error::Parse(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<hrp::Error> for Error {
    fn from(e: hrp::Error) -> Error {
        match e {
            hrp::Error::Empty => Error::EmptyHrp,
            hrp::Error::TooLong(len) => Error::HrpTooLong(len),
            hrp::Error::NonAsciiChar(c) => Error::InvalidHrpChar(c),
            hrp::Error::InvalidAsciiByte(b) => Error::InvalidHrpChar(char::from(b)),
            hrp::Error::MixedCase => Error::MixedCase,
            e => Error::Hrp(e),
        }
    }
}

impl From<CharError> for Error {
    fn from(e: CharError) -> Error {
        match e {
            CharError::MissingSeparator => Error::MissingSeparator,
            CharError::NothingAfterSeparator => Error::DataTooShort(0),
            CharError::InvalidChar(c) => Error::InvalidChar(c),
            CharError::MixedCase => Error::MixedCase,
            e => Error::Parse(UncheckedHrpstringError::Char(e)),
        }
    }
}

impl From<UncheckedHrpstringError> for Error {
    fn from(e: UncheckedHrpstringError) -> Error {
        match e {
            UncheckedHrpstringError::Char(e) => Error::from(e),
            UncheckedHrpstringError::Hrp(e) => Error::from(e),
            e => Error::Parse(e),
        }
    }
}

/// A checksum-verified string split into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decoded {
    /// The human-readable part, folded to lower case.
    pub hrp: String,
    /// The 5-bit data symbols with the checksum removed.
    pub data: Vec<u8>,
    /// The checksum variant which validated.
    pub variant: Variant,
}

impl Decoded {
    /// Regroups all data symbols into bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        from_base32(&self.data)
    }
}

/// Decode a bech32 or bech32m string into the lower-case HRP, the payload
/// bytes and the checksum variant that matched.
pub fn decode(s: &str) -> Result<(String, Vec<u8>, Variant), Error> {
    let decoded = decode_symbols(s, &Config::DEFAULT)?;
    let payload = decoded.to_bytes()?;
    Ok((decoded.hrp, payload, decoded.variant))
}

/// Decode a string into its HRP and 5-bit data symbols, without regrouping
/// the data into bytes.
pub fn decode_symbols(s: &str, config: &Config) -> Result<Decoded, Error> {
    // Ensure overall length is within bounds
    let len = s.chars().count();
    if len > config.max_length {
        return Err(Error::TooLong(len));
    }

    // The last separator splits the HRP from the data, the HRP itself may
    // contain '1'. HRP characters are checked before its length so that a
    // non-ASCII HRP is not reported by its byte count.
    let sep = s.rfind(SEP);
    if let Some(sep) = sep {
        check_hrp_chars(&s[..sep])?;
    }

    let unchecked = UncheckedHrpstring::new(s)?;
    // `new` succeeded, so the separator exists and everything after it is
    // in the bech32 alphabet.
    let raw_data = sep.map(|sep| &s[sep + 1..]).unwrap_or_default();
    if raw_data.len() < CHECKSUM_LENGTH {
        return Err(Error::DataTooShort(raw_data.len()));
    }

    let variant = checksum::verify_checksum(&unchecked).ok_or(Error::InvalidChecksum)?;

    let mut data = Vec::with_capacity(raw_data.len() - CHECKSUM_LENGTH);
    for c in raw_data[..raw_data.len() - CHECKSUM_LENGTH].chars() {
        let fe = Fe32::from_char(c).map_err(|_| Error::InvalidChar(c))?;
        data.push(fe.to_u8());
    }
    Ok(Decoded { hrp: unchecked.hrp().to_lowercase(), data, variant })
}

/// Encode payload bytes under `hrp` with the given checksum variant.
pub fn encode(hrp: &str, payload: &[u8], variant: Variant) -> Result<String, Error> {
    encode_symbols(hrp, &to_base32(payload), variant)
}

/// Encode 5-bit data symbols under `hrp` with the given checksum variant.
///
/// The result is always lower case.
pub fn encode_symbols(hrp: &str, data: &[u8], variant: Variant) -> Result<String, Error> {
    check_hrp_chars(hrp)?;
    // Case is checked on the HRP as given, the string is built from its
    // lower-case form.
    let hrp = Hrp::parse(hrp).and_then(|hrp| Hrp::parse(&hrp.to_lowercase()))?;
    let fes = to_fes(data)?;
    Ok(checksum::checksummed_string(&hrp, &fes, variant))
}

fn check_hrp_chars(hrp: &str) -> Result<(), Error> {
    // Valid subset of ASCII
    match hrp.chars().find(|c| !(c.is_ascii() && (33..=126).contains(&(*c as u8)))) {
        Some(c) => Err(Error::InvalidHrpChar(c)),
        None => Ok(()),
    }
}

fn to_fes(data: &[u8]) -> Result<Vec<Fe32>, Error> {
    data.iter().map(|v| Fe32::try_from(*v).map_err(|_| Error::InvalidSymbol(*v))).collect()
}

/// Regroups bytes into 5-bit symbols, zero-padding the last one.
pub fn to_base32(data: &[u8]) -> Vec<u8> {
    data.iter().copied().bytes_to_fes().map(Fe32::to_u8).collect()
}

/// Regroups 5-bit symbols into bytes.
///
/// Fails if a symbol does not fit 5 bits, or if the trailing padding is
/// longer than 4 bits or not all zero.
pub fn from_base32(data: &[u8]) -> Result<Vec<u8>, Error> {
    let fes = to_fes(data)?;

    let padding_len = fes.len() * 5 % 8;
    if padding_len > 4 {
        return Err(Error::InvalidPadding);
    }
    // At most 4 padding bits, all held by the last symbol.
    if let Some(last) = fes.last() {
        let padding_mask = (1u8 << padding_len) - 1;
        if last.to_u8() & padding_mask != 0 {
            return Err(Error::InvalidPadding);
        }
    }
    Ok(fes.into_iter().fes_to_bytes().collect())
}
