//! Mining RPC shapes.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Length of a block hash in hex characters.
const BLOCK_HASH_HEX_LEN: usize = 64;

/// A block hash as the node reports it: 64 hex characters.
///
/// The value is kept in its textual form; only its syntax is checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlockHash(String);

/// A string that is not a valid block hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid block hash '{0}': expected {BLOCK_HASH_HEX_LEN} hex characters")]
pub struct InvalidBlockHash(pub String);

impl BlockHash {
    /// The hash as hex text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BlockHash {
    type Error = InvalidBlockHash;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.len() == BLOCK_HASH_HEX_LEN && value.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(value))
        } else {
            Err(InvalidBlockHash(value))
        }
    }
}

impl FromStr for BlockHash {
    type Err = InvalidBlockHash;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_string())
    }
}

impl From<BlockHash> for String {
    fn from(hash: BlockHash) -> Self {
        hash.0
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of `getmininginfo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetMiningInfoResult {
    /// Height of the best chain
    pub blocks: i64,
    /// Size of the last generated block
    #[serde(rename = "currentblocksize", default)]
    pub current_block_size: u64,
    /// Transactions in the last generated block
    #[serde(rename = "currentblocktx", default)]
    pub current_block_tx: u64,
    /// Current proof-of-work difficulty
    pub difficulty: f64,
    /// Current stake difficulty
    #[serde(rename = "stakedifficulty")]
    pub stake_difficulty: i64,
    /// Node warnings
    #[serde(default)]
    pub errors: String,
    /// Whether the node is generating
    pub generate: bool,
    /// Processor limit for generation
    #[serde(rename = "genproclimit")]
    pub gen_proc_limit: i32,
    /// Local hash rate while generating
    #[serde(rename = "hashespersec")]
    pub hashes_per_sec: i64,
    /// Estimated network hash rate
    #[serde(rename = "networkhashps")]
    pub network_hash_ps: i64,
    /// Transactions in the mempool
    #[serde(rename = "pooledtx")]
    pub pooled_tx: u64,
    /// Whether the node runs on a test network
    #[serde(rename = "testnet")]
    pub test_net: bool,
}

/// Result of `getwork` without arguments: data to work on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetWorkResult {
    /// Hex-encoded block header to solve
    pub data: String,
    /// Hex-encoded target
    pub target: String,
}

/// Options for `submitblock`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitBlockOptions {
    /// Work identifier from a previous template request
    #[serde(rename = "workid", skip_serializing_if = "Option::is_none")]
    pub work_id: Option<String>,
}

/// Something that can produce the serialized bytes of a block.
///
/// The conversion may fail (for example when the block is assembled lazily),
/// in which case `submitblock` fails before anything is sent.
pub trait BlockEncode {
    /// The conversion error.
    type Error: std::error::Error;

    /// Returns the block's wire bytes.
    fn encode_block(&self) -> Result<Vec<u8>, Self::Error>;

    /// Returns the block's wire bytes as lowercase hex.
    fn encode_block_hex(&self) -> Result<String, Self::Error> {
        self.encode_block().map(hex::encode)
    }
}

impl BlockEncode for [u8] {
    type Error = Infallible;

    fn encode_block(&self) -> Result<Vec<u8>, Self::Error> {
        Ok(self.to_vec())
    }
}

impl BlockEncode for Vec<u8> {
    type Error = Infallible;

    fn encode_block(&self) -> Result<Vec<u8>, Self::Error> {
        Ok(self.clone())
    }
}
