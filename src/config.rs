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

//! # Decoder parameters
//!

use bech32::Checksum;

/// Maximum length of a segwit address string, as set by BIP-173.
pub const SEGWIT_MAX_LENGTH: usize = 90;

/// The parameters used while decoding a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Config {
    /// Maximum accepted length of the whole string, in characters.
    pub max_length: usize,
}

impl Config {
    /// Limits strings to the length the checksum guarantees error detection
    /// for.
    pub const DEFAULT: Config = Config {
        max_length: <bech32::Bech32 as Checksum>::CODE_LENGTH,
    };

    /// The original BIP-173 limit, suitable when only addresses are expected.
    pub const BIP173: Config = Config {
        max_length: SEGWIT_MAX_LENGTH,
    };

    /// No practical limit. Large RGB consignments need this.
    pub const UNBOUNDED: Config = Config {
        max_length: usize::MAX,
    };
}

impl Default for Config {
    fn default() -> Self {
        Config::DEFAULT
    }
}
