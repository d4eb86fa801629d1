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

//! RGB20 asset records.
//!
//! An `rgb20` string carries a one-byte raw data header followed by the
//! strictly-encoded asset record, stored plain or deflate-compressed.

use std::str::FromStr;
use std::{error, fmt};

use bitcoin::io::{BufRead, Write};
use bitcoin::Network;
use serde::{Deserialize, Serialize};

use crate::category::HRP_RGB20_ASSET;
use crate::checksum::Variant;
use crate::codec;
use crate::encode::{self, Decodable, Encodable};
use crate::id::ContractId;
use crate::raw::{self, RawEncoding};

/// The maximum decimal precision of an asset.
pub const MAX_PRECISION: u8 = 18;

/// The maximum ticker string length.
pub const MAX_TICKER_LENGTH: usize = 8;

/// The maximum asset name length.
pub const MAX_NAME_LENGTH: usize = 40;

/// The maximum description length, in bytes.
pub const MAX_DESCRIPTION_LENGTH: usize = 256;

/// An RGB20 record error.
#[derive(Debug)]
pub enum Error {
    /// The string is not valid bech32.
    Bech32(codec::Error),
    /// The string does not use the `rgb20` HRP.
    WrongHrp(String),
    /// The raw data header or the compressed stream is invalid.
    Raw(raw::Error),
    /// The record bytes could not be decoded.
    Encoding(encode::Error),
    /// The record's content is invalid.
    InvalidRecord(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Bech32(ref e) => write!(f, "bech32 error: {}", e),
            Error::WrongHrp(ref hrp) => write!(f, "expected HRP `rgb20`, found `{}`", hrp),
            Error::Raw(ref e) => write!(f, "asset record: {}", e),
            Error::Encoding(ref e) => write!(f, "malformed asset record: {}", e),
            Error::InvalidRecord(ref e) => write!(f, "invalid asset record: {}", e),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Bech32(ref e) => Some(e),
            Error::Raw(ref e) => Some(e),
            Error::Encoding(ref e) => Some(e),
            _ => None,
        }
    }
}

#[doc(hidden)]
impl From<encode::Error> for Error {
    fn from(e: encode::Error) -> Error {
        Error::Encoding(e)
    }
}

#[doc(hidden)]
impl From<raw::Error> for Error {
    fn from(e: raw::Error) -> Error {
        Error::Raw(e)
    }
}

#[doc(hidden)]
impl From<codec::Error> for Error {
    fn from(e: codec::Error) -> Error {
        Error::Bech32(e)
    }
}

/// Metadata of an RGB20 fungible asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb20Asset {
    /// Id of the contract issuing the asset.
    #[serde(rename = "id")]
    pub contract_id: ContractId,
    /// The ticker of the asset.
    pub ticker: String,
    /// The name of the asset.
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The chain the asset is issued on.
    pub chain: Network,
    /// Number of decimal digits of the asset values.
    #[serde(rename = "decimal_precision")]
    pub precision: u8,
    /// Circulating supply known to the issuer, in atomic units.
    pub known_circulating: u64,
    /// Maximum supply which may ever be issued, in atomic units.
    pub max_cap: u64,
    /// Issue date, in seconds since the unix epoch.
    pub date: i64,
}

/// Check a ticker value.
#[inline]
fn check_ticker(t: &str) -> Result<(), Error> {
    if t.is_empty() {
        return Err(Error::InvalidRecord("empty ticker"));
    }
    if t.len() > MAX_TICKER_LENGTH {
        return Err(Error::InvalidRecord("ticker too long"));
    }
    if !t.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()) {
        return Err(Error::InvalidRecord("ticker must be upper-case ASCII letters and digits"));
    }
    Ok(())
}

/// Check a name value.
#[inline]
fn check_name(n: &str) -> Result<(), Error> {
    if n.is_empty() {
        return Err(Error::InvalidRecord("empty name"));
    }
    if n.chars().count() > MAX_NAME_LENGTH {
        return Err(Error::InvalidRecord("name too long"));
    }
    Ok(())
}

impl Rgb20Asset {
    /// Checks the record's fields against the RGB20 limits.
    pub fn validate(&self) -> Result<(), Error> {
        check_ticker(&self.ticker)?;
        check_name(&self.name)?;
        if let Some(ref d) = self.description {
            if d.len() > MAX_DESCRIPTION_LENGTH {
                return Err(Error::InvalidRecord("description too long"));
            }
        }
        if self.precision > MAX_PRECISION {
            return Err(Error::InvalidRecord("invalid precision"));
        }
        if self.known_circulating > self.max_cap {
            return Err(Error::InvalidRecord("circulating supply exceeds the cap"));
        }
        Ok(())
    }

    /// Parses a raw `rgb20` payload: header byte followed by the record,
    /// inflating it first if compressed.
    pub fn from_payload(payload: &[u8]) -> Result<Rgb20Asset, Error> {
        let (_, record) = raw::decode(payload)?;
        let asset: Rgb20Asset = encode::deserialize(&record)?;
        asset.validate()?;
        Ok(asset)
    }

    /// The raw `rgb20` payload of this record, uncompressed.
    pub fn to_payload(&self) -> Vec<u8> {
        self.to_payload_with(RawEncoding::Plain)
    }

    /// The raw `rgb20` payload of this record in the given encoding.
    pub fn to_payload_with(&self, encoding: RawEncoding) -> Vec<u8> {
        raw::encode(encoding, &encode::serialize(self))
    }

    /// The bech32m string of the deflate-compressed record.
    pub fn to_compressed_string(&self) -> Result<String, codec::Error> {
        codec::encode(HRP_RGB20_ASSET, &self.to_payload_with(RawEncoding::Deflate), Variant::Bech32m)
    }
}

impl fmt::Display for Rgb20Asset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = codec::encode(HRP_RGB20_ASSET, &self.to_payload(), Variant::Bech32m)
            .map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

impl FromStr for Rgb20Asset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hrp, payload, _) = codec::decode(s)?;
        if hrp != HRP_RGB20_ASSET {
            return Err(Error::WrongHrp(hrp));
        }
        Rgb20Asset::from_payload(&payload)
    }
}

impl Encodable for Rgb20Asset {
    fn strict_encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, encode::Error> {
        let mut len = self.contract_id.strict_encode(w)?;
        len += self.ticker.strict_encode(w)?;
        len += self.name.strict_encode(w)?;
        len += self.description.strict_encode(w)?;
        len += self.chain.strict_encode(w)?;
        len += self.precision.strict_encode(w)?;
        len += self.known_circulating.strict_encode(w)?;
        len += self.max_cap.strict_encode(w)?;
        len += self.date.strict_encode(w)?;
        Ok(len)
    }
}

impl Decodable for Rgb20Asset {
    fn strict_decode<R: BufRead + ?Sized>(r: &mut R) -> Result<Self, encode::Error> {
        Ok(Rgb20Asset {
            contract_id: Decodable::strict_decode(r)?,
            ticker: Decodable::strict_decode(r)?,
            name: Decodable::strict_decode(r)?,
            description: Decodable::strict_decode(r)?,
            chain: Decodable::strict_decode(r)?,
            precision: Decodable::strict_decode(r)?,
            known_circulating: Decodable::strict_decode(r)?,
            max_cap: Decodable::strict_decode(r)?,
            date: Decodable::strict_decode(r)?,
        })
    }
}
