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

//! # Identifiers
//!
//! 32-byte identifiers which are displayed and parsed as bech32 strings
//! under a fixed HRP.

use std::str::FromStr;
use std::{error, fmt};

use bitcoin::hex::DisplayHex;
use bitcoin::io::{BufRead, Write};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::checksum::Variant;
use crate::codec;
use crate::encode::{self, Decodable, Encodable};

/// Length of every identifier, in bytes.
pub const ID_LENGTH: usize = 32;

/// An error parsing an identifier from its bech32 form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseIdError {
    /// The string is not valid bech32.
    Codec(codec::Error),
    /// The string uses an HRP of another identifier type.
    WrongHrp {
        /// HRP the identifier type requires.
        expected: &'static str,
        /// HRP found in the string.
        found: String,
    },
    /// The payload is not 32 bytes long.
    InvalidLength(usize),
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ParseIdError::Codec(ref e) => write!(f, "bech32 error: {}", e),
            ParseIdError::WrongHrp { expected, ref found } => {
                write!(f, "expected HRP `{}`, found `{}`", expected, found)
            }
            ParseIdError::InvalidLength(len) => {
                write!(f, "identifier must be 32 bytes long, not {}", len)
            }
        }
    }
}

impl error::Error for ParseIdError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            ParseIdError::Codec(ref e) => Some(e),
            _ => None,
        }
    }
}

#[doc(hidden)]
impl From<codec::Error> for ParseIdError {
    fn from(e: codec::Error) -> ParseIdError {
        ParseIdError::Codec(e)
    }
}

macro_rules! bech32_id {
    ($name:ident, $hrp:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name([u8; ID_LENGTH]);

        impl $name {
            /// HRP the identifier is encoded under.
            pub const HRP: &'static str = $hrp;

            /// Wraps raw identifier bytes.
            pub fn from_byte_array(bytes: [u8; ID_LENGTH]) -> Self {
                $name(bytes)
            }

            /// Copies an identifier out of a slice which must be 32 bytes long.
            pub fn from_slice(slice: &[u8]) -> Result<Self, ParseIdError> {
                if slice.len() != ID_LENGTH {
                    return Err(ParseIdError::InvalidLength(slice.len()));
                }
                let mut bytes = [0u8; ID_LENGTH];
                bytes.copy_from_slice(slice);
                Ok($name(bytes))
            }

            /// Returns the raw identifier bytes.
            pub fn to_byte_array(self) -> [u8; ID_LENGTH] {
                self.0
            }

            /// Returns the raw identifier bytes.
            pub fn as_bytes(&self) -> &[u8; ID_LENGTH] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                let s = codec::encode(Self::HRP, &self.0, Variant::Bech32).map_err(|_| fmt::Error)?;
                f.write_str(&s)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0.as_hex())
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let (hrp, payload, _) = codec::decode(s)?;
                if hrp != Self::HRP {
                    return Err(ParseIdError::WrongHrp { expected: Self::HRP, found: hrp });
                }
                $name::from_slice(&payload)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                use serde::de::Error;
                String::deserialize(deserializer)
                    .and_then(|s| $name::from_str(&s).map_err(|e| D::Error::custom(e.to_string())))
            }
        }

        impl Encodable for $name {
            fn strict_encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, encode::Error> {
                self.0.strict_encode(w)
            }
        }

        impl Decodable for $name {
            fn strict_decode<R: BufRead + ?Sized>(r: &mut R) -> Result<Self, encode::Error> {
                Ok($name(<[u8; ID_LENGTH]>::strict_decode(r)?))
            }
        }
    };
}

bech32_id!(LnpbpId, "id", "LNPBP-39 identifier, displayed under HRP `id`.");
bech32_id!(SchemaId, "sch", "RGB schema identifier, displayed under HRP `sch`.");
bech32_id!(ContractId, "rgb", "RGB contract identifier, displayed under HRP `rgb`.");
