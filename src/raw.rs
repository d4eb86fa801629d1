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


//! # Raw data encodings
//!
//! RGB raw data, RGB20 records and LNPBP data start with a header byte
//! telling whether the bytes that follow are stored as they are or
//! deflate-compressed ([RFC 1951], no zlib or gzip framing).
//!
//! [RFC 1951]: <https://www.rfc-editor.org/rfc/rfc1951>

use std::io::{self, Read, Write};
use std::{error, fmt};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use serde::Serialize;

use crate::category::{RAW_DATA_ENCODING_DEFLATE, RAW_DATA_ENCODING_PLAIN};

/// Upper bound on the size of inflated data.
pub const MAX_INFLATED_LENGTH: usize = 1 << 20;

/// A raw data error.
#[derive(Debug)]
pub enum Error {
    /// The data is missing its encoding header.
    Empty,
    /// The encoding header is not one this crate knows.
    UnknownEncoding(u8),
    /// The compressed stream is corrupt.
    Inflate(io::Error),
    /// The data inflates past [`MAX_INFLATED_LENGTH`].
    TooLarge,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Empty => write!(f, "raw data is missing its encoding header"),
            Error::UnknownEncoding(v) => write!(f, "unknown raw data encoding: {}", v),
            Error::Inflate(ref e) => write!(f, "invalid compressed data: {}", e),
            Error::TooLarge => {
                write!(f, "compressed data inflates past {} bytes", MAX_INFLATED_LENGTH)
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Inflate(ref e) => Some(e),
            _ => None,
        }
    }
}

impl Error {
    /// Whether the header names an encoding which is not implemented, as
    /// opposed to the data being malformed.
    pub fn is_unsupported(&self) -> bool {
        matches!(*self, Error::UnknownEncoding(_))
    }
}

/// The header byte of raw data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RawEncoding {
    /// Uncompressed.
    Plain,
    /// Deflate-compressed.
    Deflate,
}

impl RawEncoding {
    /// The header byte announcing this encoding.
    pub fn header(self) -> u8 {
        match self {
            RawEncoding::Plain => RAW_DATA_ENCODING_PLAIN,
            RawEncoding::Deflate => RAW_DATA_ENCODING_DEFLATE,
        }
    }

    /// Splits the header byte off `payload`.
    pub fn split(payload: &[u8]) -> Result<(RawEncoding, &[u8]), Error> {
        match payload.split_first() {
            None => Err(Error::Empty),
            Some((&RAW_DATA_ENCODING_PLAIN, data)) => Ok((RawEncoding::Plain, data)),
            Some((&RAW_DATA_ENCODING_DEFLATE, data)) => Ok((RawEncoding::Deflate, data)),
            Some((v, _)) => Err(Error::UnknownEncoding(*v)),
        }
    }
}

/// Reads the header of `payload` and returns the data it announces,
/// inflated if it was compressed.
pub fn decode(payload: &[u8]) -> Result<(RawEncoding, Vec<u8>), Error> {
    let (encoding, data) = RawEncoding::split(payload)?;
    let data = match encoding {
        RawEncoding::Plain => data.to_vec(),
        RawEncoding::Deflate => inflate(data)?,
    };
    Ok((encoding, data))
}

/// Prefixes `data` with the header of `encoding`, compressing it if asked.
pub fn encode(encoding: RawEncoding, data: &[u8]) -> Vec<u8> {
    let mut payload = vec![encoding.header()];
    match encoding {
        RawEncoding::Plain => payload.extend_from_slice(data),
        RawEncoding::Deflate => payload.extend(deflate(data)),
    }
    payload
}

/// Inflates a bare deflate stream.
pub fn inflate(data: &[u8]) -> Result<Vec<u8>, Error> {
    let mut inflated = Vec::new();
    DeflateDecoder::new(data)
        .take(MAX_INFLATED_LENGTH as u64 + 1)
        .read_to_end(&mut inflated)
        .map_err(Error::Inflate)?;
    if inflated.len() > MAX_INFLATED_LENGTH {
        return Err(Error::TooLarge);
    }
    Ok(inflated)
}

/// Compresses `data` into a bare deflate stream at the best compression
/// level.
pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data).expect("in-memory writers don't error");
    encoder.finish().expect("in-memory writers don't error")
}
