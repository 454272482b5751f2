//! Mining operations
//!
//! Thin call-sites over [`Client::send`]: each one builds a command, picks the
//! decoder for its result shape and hands both to the dispatcher.

use dcrpc_protocol::types::{
    BlockEncode, BlockHash, GetMiningInfoResult, GetWorkResult, SubmitBlockOptions,
};
use dcrpc_protocol::{Command, ProtocolError};
use dcrpc_transport_traits::Transport;

use super::super::core::Client;
use crate::context::CallContext;
use crate::decode::{AcceptanceDecoder, IgnoreResult, JsonDecoder};
use crate::error::ClientResult;
use crate::future::ResponseFuture;

/// Pending result of [`Client::generate_async`].
pub type FutureGenerateResult = ResponseFuture<JsonDecoder<Vec<BlockHash>>>;
/// Pending result of [`Client::get_generate_async`].
pub type FutureGetGenerateResult = ResponseFuture<JsonDecoder<bool>>;
/// Pending result of [`Client::set_generate_async`].
pub type FutureSetGenerateResult = ResponseFuture<IgnoreResult>;
/// Pending result of [`Client::get_hashes_per_sec_async`].
pub type FutureGetHashesPerSecResult = ResponseFuture<JsonDecoder<i64>>;
/// Pending result of [`Client::get_mining_info_async`].
pub type FutureGetMiningInfoResult = ResponseFuture<JsonDecoder<GetMiningInfoResult>>;
/// Pending result of the `getnetworkhashps` family.
pub type FutureGetNetworkHashPs = ResponseFuture<JsonDecoder<i64>>;
/// Pending result of [`Client::get_work_async`].
pub type FutureGetWork = ResponseFuture<JsonDecoder<GetWorkResult>>;
/// Pending result of [`Client::get_work_submit_async`].
pub type FutureGetWorkSubmit = ResponseFuture<JsonDecoder<bool>>;
/// Pending result of [`Client::submit_block_async`].
pub type FutureSubmitBlockResult = ResponseFuture<AcceptanceDecoder>;
/// Pending result of [`Client::regen_template_async`].
pub type FutureRegenTemplateResult = ResponseFuture<IgnoreResult>;

impl<T: Transport + 'static> Client<T> {
    /// Asks the node to mine `num_blocks` blocks immediately.
    ///
    /// Only meaningful on simulation and regression networks.
    pub fn generate_async(&self, ctx: &CallContext, num_blocks: u32) -> FutureGenerateResult {
        let command = Command::builder("generate").param(&num_blocks).build();
        self.dispatch(ctx, command, JsonDecoder::new())
    }

    /// Mines `num_blocks` blocks and returns their hashes.
    pub async fn generate(
        &self,
        ctx: &CallContext,
        num_blocks: u32,
    ) -> ClientResult<Vec<BlockHash>> {
        self.generate_async(ctx, num_blocks).receive().await
    }

    /// Dispatches `getgenerate`.
    pub fn get_generate_async(&self, ctx: &CallContext) -> FutureGetGenerateResult {
        self.send(ctx, Command::new("getgenerate"), JsonDecoder::new())
    }

    /// Returns `true` if the node is set to generate blocks.
    pub async fn get_generate(&self, ctx: &CallContext) -> ClientResult<bool> {
        self.get_generate_async(ctx).receive().await
    }

    /// Dispatches `setgenerate`.
    pub fn set_generate_async(
        &self,
        ctx: &CallContext,
        enable: bool,
        num_cpus: i32,
    ) -> FutureSetGenerateResult {
        let command = Command::builder("setgenerate")
            .param(&enable)
            .param(&num_cpus)
            .build();
        self.dispatch(ctx, command, IgnoreResult)
    }

    /// Turns generation on or off, using up to `num_cpus` processors
    /// (`-1` for no limit).
    pub async fn set_generate(
        &self,
        ctx: &CallContext,
        enable: bool,
        num_cpus: i32,
    ) -> ClientResult<()> {
        self.set_generate_async(ctx, enable, num_cpus).receive().await
    }

    /// Dispatches `gethashespersec`.
    pub fn get_hashes_per_sec_async(&self, ctx: &CallContext) -> FutureGetHashesPerSecResult {
        self.send(ctx, Command::new("gethashespersec"), JsonDecoder::new())
    }

    /// Returns the node's recent hash rate while generating, or zero.
    pub async fn get_hashes_per_sec(&self, ctx: &CallContext) -> ClientResult<i64> {
        self.get_hashes_per_sec_async(ctx).receive().await
    }

    /// Dispatches `getmininginfo`.
    pub fn get_mining_info_async(&self, ctx: &CallContext) -> FutureGetMiningInfoResult {
        self.send(ctx, Command::new("getmininginfo"), JsonDecoder::new())
    }

    /// Returns mining-related state of the node.
    pub async fn get_mining_info(&self, ctx: &CallContext) -> ClientResult<GetMiningInfoResult> {
        self.get_mining_info_async(ctx).receive().await
    }

    /// Dispatches `getnetworkhashps` with the node's defaults.
    pub fn get_network_hash_ps_async(&self, ctx: &CallContext) -> FutureGetNetworkHashPs {
        self.network_hash_ps(ctx, None, None)
    }

    /// Estimated network hash rate over the node's default window, ending at
    /// the best block.
    pub async fn get_network_hash_ps(&self, ctx: &CallContext) -> ClientResult<i64> {
        self.get_network_hash_ps_async(ctx).receive().await
    }

    /// Dispatches `getnetworkhashps` over the last `blocks` blocks.
    pub fn get_network_hash_ps2_async(
        &self,
        ctx: &CallContext,
        blocks: i32,
    ) -> FutureGetNetworkHashPs {
        self.network_hash_ps(ctx, Some(blocks), None)
    }

    /// Estimated network hash rate over the last `blocks` blocks.
    ///
    /// `-1` means since the last difficulty change.
    pub async fn get_network_hash_ps2(&self, ctx: &CallContext, blocks: i32) -> ClientResult<i64> {
        self.get_network_hash_ps2_async(ctx, blocks).receive().await
    }

    /// Dispatches `getnetworkhashps` over `blocks` blocks ending at `height`.
    pub fn get_network_hash_ps3_async(
        &self,
        ctx: &CallContext,
        blocks: i32,
        height: i32,
    ) -> FutureGetNetworkHashPs {
        self.network_hash_ps(ctx, Some(blocks), Some(height))
    }

    /// Estimated network hash rate over `blocks` blocks ending at `height`.
    pub async fn get_network_hash_ps3(
        &self,
        ctx: &CallContext,
        blocks: i32,
        height: i32,
    ) -> ClientResult<i64> {
        self.get_network_hash_ps3_async(ctx, blocks, height)
            .receive()
            .await
    }

    fn network_hash_ps(
        &self,
        ctx: &CallContext,
        blocks: Option<i32>,
        height: Option<i32>,
    ) -> FutureGetNetworkHashPs {
        let command = Command::builder("getnetworkhashps")
            .optional_param(blocks.as_ref())
            .optional_param(height.as_ref())
            .build();
        self.dispatch(ctx, command, JsonDecoder::new())
    }

    /// Dispatches `getwork` without arguments.
    pub fn get_work_async(&self, ctx: &CallContext) -> FutureGetWork {
        self.send(ctx, Command::new("getwork"), JsonDecoder::new())
    }

    /// Returns hashing data to work on.
    pub async fn get_work(&self, ctx: &CallContext) -> ClientResult<GetWorkResult> {
        self.get_work_async(ctx).receive().await
    }

    /// Dispatches `getwork` with solved data.
    pub fn get_work_submit_async(&self, ctx: &CallContext, data: &str) -> FutureGetWorkSubmit {
        let command = Command::builder("getwork").param(data).build();
        self.dispatch(ctx, command, JsonDecoder::new())
    }

    /// Submits solved block data; returns whether the node accepted it.
    pub async fn get_work_submit(&self, ctx: &CallContext, data: &str) -> ClientResult<bool> {
        self.get_work_submit_async(ctx, data).receive().await
    }

    /// Dispatches `submitblock`.
    ///
    /// The block is sent hex-encoded; a missing block is sent as an empty
    /// string. If the block cannot be serialized nothing is sent and the
    /// returned future already holds the error.
    pub fn submit_block_async<B: BlockEncode + ?Sized>(
        &self,
        ctx: &CallContext,
        block: Option<&B>,
        options: Option<&SubmitBlockOptions>,
    ) -> FutureSubmitBlockResult {
        let block_hex = match block.map(|b| b.encode_block_hex()).transpose() {
            Ok(hex) => hex.unwrap_or_default(),
            Err(e) => {
                let error = ProtocolError::InvalidParameter {
                    method: "submitblock".to_string(),
                    index: 0,
                    reason: e.to_string(),
                };
                return self.dispatch(ctx, Err(error), AcceptanceDecoder);
            }
        };

        let command = Command::builder("submitblock")
            .param(&block_hex)
            .optional_param(options)
            .build();
        self.dispatch(ctx, command, AcceptanceDecoder)
    }

    /// Submits a block to the network.
    ///
    /// Succeeds when the node answers `null`. A rejection string from the
    /// node becomes [`ClientError::Application`](crate::ClientError::Application)
    /// with exactly that string as its reason.
    pub async fn submit_block<B: BlockEncode + ?Sized>(
        &self,
        ctx: &CallContext,
        block: Option<&B>,
        options: Option<&SubmitBlockOptions>,
    ) -> ClientResult<()> {
        self.submit_block_async(ctx, block, options).receive().await
    }

    /// Dispatches `regentemplate`.
    pub fn regen_template_async(&self, ctx: &CallContext) -> FutureRegenTemplateResult {
        self.send(ctx, Command::new("regentemplate"), IgnoreResult)
    }

    /// Asks the node to regenerate its block template.
    pub async fn regen_template(&self, ctx: &CallContext) -> ClientResult<()> {
        self.regen_template_async(ctx).receive().await
    }
}
