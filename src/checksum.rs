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


//! # Checksums
//!
//! The BCH checksum shared by bech32 ([BIP-173]) and bech32m ([BIP-350]).
//! Both variants use the same generator and differ only in the residue a
//! valid string must produce. The arithmetic is done by
//! `bech32::primitives::checksum`; this module maps it onto [`Variant`].
//!
//! [BIP-173]: <https://github.com/bitcoin/bips/blob/master/bip-0173.mediawiki>
//! [BIP-350]: <https://github.com/bitcoin/bips/blob/master/bip-0350.mediawiki>

use std::fmt;

use bech32::primitives::decode::UncheckedHrpstring;
use bech32::primitives::gf32::Fe32;
use bech32::primitives::iter::Fe32IterExt;
use bech32::{Bech32, Bech32m, Checksum, Hrp};
use serde::{Deserialize, Serialize};

/// Number of 5-bit symbols occupied by the checksum.
pub const CHECKSUM_LENGTH: usize = <Bech32 as Checksum>::CHECKSUM_LENGTH;

/// The checksum variant a string was (or is to be) encoded with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Original BIP-173 checksum.
    Bech32,
    /// BIP-350 checksum.
    Bech32m,
}

impl Variant {
    /// Whether this is the bech32m variant.
    pub fn is_bech32m(self) -> bool {
        self == Variant::Bech32m
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Variant::Bech32 => f.write_str("bech32"),
            Variant::Bech32m => f.write_str("bech32m"),
        }
    }
}

/// Checks the trailing checksum of an already character-checked string.
///
/// Returns the variant whose target residue matched, trying bech32 first,
/// or `None` if the string carries neither checksum.
pub fn verify_checksum(unchecked: &UncheckedHrpstring) -> Option<Variant> {
    if unchecked.has_valid_checksum::<Bech32>() {
        Some(Variant::Bech32)
    } else if unchecked.has_valid_checksum::<Bech32m>() {
        Some(Variant::Bech32m)
    } else {
        None
    }
}

/// Renders `hrp`, the separator, `data` and the checksum of `variant`, all
/// in lower case.
pub fn checksummed_string(hrp: &Hrp, data: &[Fe32], variant: Variant) -> String {
    let fes = data.iter().copied();
    match variant {
        Variant::Bech32 => fes.with_checksum::<Bech32>(hrp).chars().collect(),
        Variant::Bech32m => fes.with_checksum::<Bech32m>(hrp).chars().collect(),
    }
}
