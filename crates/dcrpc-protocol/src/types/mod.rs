//! Result and option shapes for the call-site catalogue.

mod mining;

pub use mining::{
    BlockEncode, BlockHash, GetMiningInfoResult, GetWorkResult, InvalidBlockHash,
    SubmitBlockOptions,
};
