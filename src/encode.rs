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

//! Strictly-encoded payload records
//!
//! Structured payloads are serialized as a deterministic little-endian
//! sequence of fields. Integers, byte arrays and strings follow Bitcoin
//! consensus rules (strings and vectors carry a `VarInt` length prefix),
//! optional values are prefixed with a `0`/`1` tag byte.
//!

use std::{error, fmt};

use bitcoin::consensus::encode as btcenc;
use bitcoin::io::{self, BufRead, Cursor, Write};
use bitcoin::Network;

/// Encoding error
#[derive(Debug)]
pub enum Error {
    /// An I/O error
    Io(io::Error),
    /// A Bitcoin encoding error.
    Bitcoin(btcenc::Error),
    /// Parsing error
    ParseFailed(&'static str),
    /// An option tag other than 0 or 1.
    InvalidOptionTag(u8),
    /// A chain tag we don't know a network for.
    UnknownChain(u8),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Io(ref e) => write!(f, "I/O error: {}", e),
            Error::Bitcoin(ref e) => write!(f, "{}", e),
            Error::ParseFailed(ref e) => write!(f, "parse failed: {}", e),
            Error::InvalidOptionTag(t) => write!(f, "invalid option tag: 0x{:02x}", t),
            Error::UnknownChain(t) => write!(f, "unknown chain tag: {}", t),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Bitcoin(ref e) => Some(e),
            _ => None,
        }
    }
}

#[doc(hidden)]
impl From<btcenc::Error> for Error {
    fn from(e: btcenc::Error) -> Error {
        Error::Bitcoin(e)
    }
}

#[doc(hidden)]
impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Io(error)
    }
}

/// Data which can be strictly encoded
pub trait Encodable {
    /// Encode an object with a well-defined format, should only ever error if
    /// the underlying `Write` errors. Returns the number of bytes written on
    /// success
    fn strict_encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, Error>;
}

/// Data which can be strictly decoded
pub trait Decodable: Sized {
    /// Decode an object with a well-defined format
    fn strict_decode<R: BufRead + ?Sized>(r: &mut R) -> Result<Self, Error>;
}

/// Encode an object into a vector
pub fn serialize<T: Encodable + ?Sized>(data: &T) -> Vec<u8> {
    let mut encoder = Vec::new();
    data.strict_encode(&mut encoder).expect("in-memory writers don't error");
    encoder
}

/// Deserialize an object from a slice, will error if said deserialization
/// doesn't consume the entire slice.
pub fn deserialize<T: Decodable>(data: &[u8]) -> Result<T, Error> {
    let (rv, consumed) = deserialize_partial(data)?;

    // Fail if data are not consumed entirely.
    if consumed == data.len() {
        Ok(rv)
    } else {
        Err(Error::ParseFailed("data not consumed entirely when explicitly deserializing"))
    }
}

/// Deserialize an object from a slice, but will not report an error if said
/// deserialization doesn't consume the entire slice.
pub fn deserialize_partial<T: Decodable>(data: &[u8]) -> Result<(T, usize), Error> {
    let mut decoder = Cursor::new(data);
    let rv = Decodable::strict_decode(&mut decoder)?;
    let consumed = decoder.position() as usize;

    Ok((rv, consumed))
}

/// Implement strict encoding traits for Bitcoin encodable types.
macro_rules! impl_upstream {
    ($type: ty) => {
        impl Encodable for $type {
            fn strict_encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, Error> {
                Ok(btcenc::Encodable::consensus_encode(self, w)?)
            }
        }

        impl Decodable for $type {
            fn strict_decode<R: BufRead + ?Sized>(r: &mut R) -> Result<Self, Error> {
                Ok(btcenc::Decodable::consensus_decode(r)?)
            }
        }
    };
}
impl_upstream!(u8);
impl_upstream!(u16);
impl_upstream!(u32);
impl_upstream!(u64);
impl_upstream!(i64);
impl_upstream!([u8; 32]);
impl_upstream!(Vec<u8>);
impl_upstream!(String);

impl<T: Encodable> Encodable for Option<T> {
    fn strict_encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, Error> {
        match *self {
            None => 0u8.strict_encode(w),
            Some(ref inner) => Ok(1u8.strict_encode(w)? + inner.strict_encode(w)?),
        }
    }
}

impl<T: Decodable> Decodable for Option<T> {
    fn strict_decode<R: BufRead + ?Sized>(r: &mut R) -> Result<Self, Error> {
        match u8::strict_decode(r)? {
            0 => Ok(None),
            1 => Ok(Some(T::strict_decode(r)?)),
            tag => Err(Error::InvalidOptionTag(tag)),
        }
    }
}

/// Chains are encoded as a single tag byte.
impl Encodable for Network {
    fn strict_encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, Error> {
        let tag: u8 = match *self {
            Network::Bitcoin => 0,
            Network::Testnet => 1,
            Network::Signet => 2,
            Network::Regtest => 3,
            #[allow(unreachable_patterns)]
            _ => return Err(Error::ParseFailed("network has no chain tag")),
        };
        tag.strict_encode(w)
    }
}

impl Decodable for Network {
    fn strict_decode<R: BufRead + ?Sized>(r: &mut R) -> Result<Self, Error> {
        match u8::strict_decode(r)? {
            0 => Ok(Network::Bitcoin),
            1 => Ok(Network::Testnet),
            2 => Ok(Network::Signet),
            3 => Ok(Network::Regtest),
            tag => Err(Error::UnknownChain(tag)),
        }
    }
}
