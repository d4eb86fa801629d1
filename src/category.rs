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

//! # Payload categories
//!
//! Every successfully decoded string is assigned exactly one category from a
//! closed set. The category is picked from the human-readable part and, where
//! the HRP alone is ambiguous, from header bytes of the payload. Strings
//! matching no rule are [`PayloadCategory::Unknown`]; classification itself
//! never fails.

use std::str::FromStr;
use std::{error, fmt};

use bitcoin::Network;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec;
use crate::id::{ContractId, LnpbpId, SchemaId};

/// HRP of bech32-encoded URLs (LNURL).
pub const HRP_LNURL: &str = "lnurl";
/// HRP for LNPBP-39 identifiers.
pub const HRP_LNPBP_ID: &str = LnpbpId::HRP;
/// HRP for LNPBP-39 binary data.
pub const HRP_LNPBP_DATA: &str = "data";
/// HRP for LNPBP-39 compressed binary data.
pub const HRP_LNPBP_ZDATA: &str = "z";
/// HRP for LNPBP-38 invoices.
pub const HRP_LNPBP_INVOICE: &str = "i";
/// HRP for RGB schema ids.
pub const HRP_RGB_SCHEMA_ID: &str = SchemaId::HRP;
/// HRP for RGB contract ids.
pub const HRP_RGB_CONTRACT_ID: &str = ContractId::HRP;
/// HRP for raw RGB schema data.
pub const HRP_RGB_SCHEMA: &str = "schema";
/// HRP for raw RGB contract genesis data.
pub const HRP_RGB_GENESIS: &str = "genesis";
/// HRP for raw RGB consignment data.
pub const HRP_RGB_CONSIGNMENT: &str = "consignment";
/// HRP for RGB20 asset records.
pub const HRP_RGB20_ASSET: &str = "rgb20";

/// Segwit address HRPs and the networks they belong to.
pub const SEGWIT_HRPS: [(&str, Network); 3] =
    [("bc", Network::Bitcoin), ("tb", Network::Testnet), ("bcrt", Network::Regtest)];

/// BOLT11 currency prefixes, longest first so `bcrt` is not taken for `bc`.
pub const BOLT11_CURRENCIES: [(&str, Network); 4] = [
    ("bcrt", Network::Regtest),
    ("tbs", Network::Signet),
    ("bc", Network::Bitcoin),
    ("tb", Network::Testnet),
];

/// Raw data header byte of plain (uncompressed) data.
pub const RAW_DATA_ENCODING_PLAIN: u8 = 0;
/// Raw data header byte of deflate-compressed data.
pub const RAW_DATA_ENCODING_DEFLATE: u8 = 1;

/// The kind of payload a bech32 string carries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PayloadCategory {
    /// No rule matched.
    Unknown,
    /// A bech32-encoded URL (LNURL).
    Url,
    /// A segwit Bitcoin address.
    BcAddress,
    /// A lightning BOLT11 invoice.
    Bolt11Invoice,
    /// An LNPBP-39 identifier.
    LnpbpId,
    /// LNPBP-39 binary data.
    LnpbpData,
    /// LNPBP-39 compressed binary data.
    LnpbpZData,
    /// An LNPBP-38 invoice.
    LnpbpInvoice,
    /// An RGB schema id.
    RgbSchemaId,
    /// An RGB contract id.
    RgbContractId,
    /// Raw RGB schema data.
    RgbSchema,
    /// Raw RGB contract genesis data.
    RgbGenesis,
    /// Raw RGB consignment data.
    RgbConsignment,
    /// An RGB20 fungible asset record.
    Rgb20Asset,
}

impl PayloadCategory {
    /// Every category, in code order.
    pub const ALL: [PayloadCategory; 14] = [
        PayloadCategory::Unknown,
        PayloadCategory::Url,
        PayloadCategory::BcAddress,
        PayloadCategory::Bolt11Invoice,
        PayloadCategory::LnpbpId,
        PayloadCategory::LnpbpData,
        PayloadCategory::LnpbpZData,
        PayloadCategory::LnpbpInvoice,
        PayloadCategory::RgbSchemaId,
        PayloadCategory::RgbContractId,
        PayloadCategory::RgbSchema,
        PayloadCategory::RgbGenesis,
        PayloadCategory::RgbConsignment,
        PayloadCategory::Rgb20Asset,
    ];

    /// Stable numeric code. The high byte groups the protocol family.
    pub fn code(self) -> u16 {
        match self {
            PayloadCategory::Unknown => 0x0000,
            PayloadCategory::Url => 0x0001,
            PayloadCategory::BcAddress => 0x0100,
            PayloadCategory::Bolt11Invoice => 0x0101,
            PayloadCategory::LnpbpId => 0x0200,
            PayloadCategory::LnpbpData => 0x0201,
            PayloadCategory::LnpbpZData => 0x0202,
            PayloadCategory::LnpbpInvoice => 0x0210,
            PayloadCategory::RgbSchemaId => 0x0300,
            PayloadCategory::RgbContractId => 0x0301,
            PayloadCategory::RgbSchema => 0x0310,
            PayloadCategory::RgbGenesis => 0x0311,
            PayloadCategory::RgbConsignment => 0x0320,
            PayloadCategory::Rgb20Asset => 0x0330,
        }
    }

    /// Looks up a category by its numeric code.
    pub fn from_code(code: u16) -> Option<PayloadCategory> {
        PayloadCategory::ALL.iter().copied().find(|c| c.code() == code)
    }

    /// The string tag used in serialized reports.
    pub fn as_str(self) -> &'static str {
        match self {
            PayloadCategory::Unknown => "unknown",
            PayloadCategory::Url => "url",
            PayloadCategory::BcAddress => "bc_address",
            PayloadCategory::Bolt11Invoice => "bolt11_invoice",
            PayloadCategory::LnpbpId => "lnpbp_id",
            PayloadCategory::LnpbpData => "lnpbp_data",
            PayloadCategory::LnpbpZData => "lnpbp_zdata",
            PayloadCategory::LnpbpInvoice => "lnpbp_invoice",
            PayloadCategory::RgbSchemaId => "rgb_schema_id",
            PayloadCategory::RgbContractId => "rgb_contract_id",
            PayloadCategory::RgbSchema => "rgb_schema",
            PayloadCategory::RgbGenesis => "rgb_genesis",
            PayloadCategory::RgbConsignment => "rgb_consignment",
            PayloadCategory::Rgb20Asset => "rgb20_asset",
        }
    }

    /// A short human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            PayloadCategory::Unknown => "Unknown",
            PayloadCategory::Url => "URL",
            PayloadCategory::BcAddress => "Bitcoin address",
            PayloadCategory::Bolt11Invoice => "LN BOLT11 invoice",
            PayloadCategory::LnpbpId => "LNPBP-39 id",
            PayloadCategory::LnpbpData => "LNPBP-39 data",
            PayloadCategory::LnpbpZData => "LNPBP-39 compressed data",
            PayloadCategory::LnpbpInvoice => "LNPBP-38 invoice",
            PayloadCategory::RgbSchemaId => "RGB Schema Id",
            PayloadCategory::RgbContractId => "RGB Contract Id",
            PayloadCategory::RgbSchema => "RGB Schema",
            PayloadCategory::RgbGenesis => "RGB Genesis",
            PayloadCategory::RgbConsignment => "RGB Consignment",
            PayloadCategory::Rgb20Asset => "RGB20 Asset",
        }
    }

    /// Whether the serialized report carries a structured JSON record for
    /// this category.
    pub fn is_structured(self) -> bool {
        self == PayloadCategory::Rgb20Asset
    }
}

impl Default for PayloadCategory {
    fn default() -> Self {
        PayloadCategory::Unknown
    }
}

impl fmt::Display for PayloadCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An unrecognized category tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategoryTag(pub String);

impl fmt::Display for UnknownCategoryTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown payload category tag `{}`", self.0)
    }
}

impl error::Error for UnknownCategoryTag {}

impl FromStr for PayloadCategory {
    type Err = UnknownCategoryTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PayloadCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategoryTag(s.to_owned()))
    }
}

impl Serialize for PayloadCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PayloadCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;
        String::deserialize(deserializer)
            .and_then(|s| PayloadCategory::from_str(&s).map_err(D::Error::custom))
    }
}

/// How the data symbols of a string map to payload bytes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PayloadLayout {
    /// All symbols regrouped into bytes.
    Bytes,
    /// The first symbol is a segwit version, emitted as its own byte, the
    /// rest is regrouped into the witness program.
    Witness,
    /// Symbols are kept as they are, one per byte; for formats whose data
    /// part is not byte-aligned.
    Symbols,
}

impl PayloadLayout {
    /// Selects the layout used by strings under `hrp`.
    pub fn for_hrp(hrp: &str) -> PayloadLayout {
        let hrp = hrp.to_ascii_lowercase();
        if segwit_network(&hrp).is_some() {
            PayloadLayout::Witness
        } else if bolt11_currency(&hrp).is_some() {
            PayloadLayout::Symbols
        } else {
            PayloadLayout::Bytes
        }
    }

    /// Turns 5-bit data symbols into payload bytes.
    pub fn extract(self, symbols: &[u8]) -> Result<Vec<u8>, codec::Error> {
        match self {
            PayloadLayout::Bytes => codec::from_base32(symbols),
            PayloadLayout::Witness => match symbols.split_first() {
                None => Ok(Vec::new()),
                Some((version, program)) => {
                    let program = codec::from_base32(program)?;
                    let mut payload = Vec::with_capacity(program.len() + 1);
                    payload.push(*version);
                    payload.extend_from_slice(&program);
                    Ok(payload)
                }
            },
            PayloadLayout::Symbols => Ok(symbols.to_vec()),
        }
    }
}

/// The network of a segwit address HRP.
pub fn segwit_network(hrp: &str) -> Option<Network> {
    SEGWIT_HRPS.iter().find(|(h, _)| *h == hrp).map(|(_, net)| *net)
}

/// Splits a BOLT11 HRP into its network and the (possibly empty) amount
/// part following the currency prefix.
pub fn bolt11_currency(hrp: &str) -> Option<(Network, &str)> {
    let rest = hrp.strip_prefix("ln")?;
    BOLT11_CURRENCIES.iter().find_map(|(currency, net)| {
        let amount = rest.strip_prefix(currency)?;
        if amount.is_empty() || amount.starts_with(|c: char| c.is_ascii_digit()) {
            Some((*net, amount))
        } else {
            None
        }
    })
}

/// Picks the category of a decoded string.
///
/// Total over all inputs: anything not matching a known HRP is
/// [`PayloadCategory::Unknown`].
pub fn classify(hrp: &str, payload: &[u8]) -> PayloadCategory {
    let hrp = hrp.to_ascii_lowercase();
    match hrp.as_str() {
        HRP_LNURL => PayloadCategory::Url,
        h if segwit_network(h).is_some() => PayloadCategory::BcAddress,
        h if bolt11_currency(h).is_some() => PayloadCategory::Bolt11Invoice,
        HRP_LNPBP_ID => PayloadCategory::LnpbpId,
        // LNPBP-39 data may announce compression in its header byte
        HRP_LNPBP_DATA if payload.first() == Some(&RAW_DATA_ENCODING_DEFLATE) => {
            PayloadCategory::LnpbpZData
        }
        HRP_LNPBP_DATA => PayloadCategory::LnpbpData,
        HRP_LNPBP_ZDATA => PayloadCategory::LnpbpZData,
        HRP_LNPBP_INVOICE => PayloadCategory::LnpbpInvoice,
        HRP_RGB_SCHEMA_ID => PayloadCategory::RgbSchemaId,
        HRP_RGB_CONTRACT_ID => PayloadCategory::RgbContractId,
        HRP_RGB_SCHEMA => PayloadCategory::RgbSchema,
        HRP_RGB_GENESIS => PayloadCategory::RgbGenesis,
        HRP_RGB_CONSIGNMENT => PayloadCategory::RgbConsignment,
        HRP_RGB20_ASSET => PayloadCategory::Rgb20Asset,
        _ => PayloadCategory::Unknown,
    }
}
