//! Wire shape and result decoding of the mining call-sites.

use std::io;

use dcrpc_client::{BlockEncode, CallContext, Client, ClientError, SubmitBlockOptions};
use dcrpc_protocol::{JsonRpcRequest, ProtocolError};
use dcrpc_transport_traits::{ChannelTransport, RemoteEndpoint};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

const HASH: &str = "000000000000000012a2b5c1d0c1e6c5e1d6e6b37fbd4ec0a5f3c6b05d6b8f2a";

/// Answers the next request with `result` and hands the request back.
async fn serve(remote: &mut RemoteEndpoint, result: Value) -> JsonRpcRequest {
    let message = remote.next_request().await.expect("connection open");
    let request: JsonRpcRequest = serde_json::from_slice(&message.payload).unwrap();
    remote
        .respond_json(&json!({"result": result, "error": null, "id": request.id}))
        .unwrap();
    request
}

fn setup() -> (Client<ChannelTransport>, RemoteEndpoint, CallContext) {
    let (transport, remote) = ChannelTransport::pair();
    (Client::new(transport), remote, CallContext::new())
}

#[derive(Debug)]
struct TruncatedBlock;

impl BlockEncode for TruncatedBlock {
    type Error = io::Error;

    fn encode_block(&self) -> Result<Vec<u8>, Self::Error> {
        Err(io::Error::new(io::ErrorKind::UnexpectedEof, "block truncated"))
    }
}

#[tokio::test]
async fn test_generate() {
    let (client, mut remote, ctx) = setup();

    let (hashes, request) =
        tokio::join!(client.generate(&ctx, 2), serve(&mut remote, json!([HASH, HASH])));

    assert_eq!(request.method, "generate");
    assert_eq!(request.params, vec![json!(2)]);
    let hashes = hashes.unwrap();
    assert_eq!(hashes.len(), 2);
    assert_eq!(hashes[0].as_str(), HASH);
}

#[tokio::test]
async fn test_generate_rejects_malformed_hash() {
    let (client, mut remote, ctx) = setup();

    let (hashes, _) = tokio::join!(
        client.generate(&ctx, 1),
        serve(&mut remote, json!(["not-a-hash"]))
    );

    assert!(matches!(
        hashes,
        Err(ClientError::Protocol(ProtocolError::ShapeMismatch { .. }))
    ));
}

#[tokio::test]
async fn test_get_and_set_generate() {
    let (client, mut remote, ctx) = setup();

    let (generating, request) =
        tokio::join!(client.get_generate(&ctx), serve(&mut remote, json!(true)));
    assert_eq!(request.method, "getgenerate");
    assert!(request.params.is_empty());
    assert_eq!(generating, Ok(true));

    let (set, request) = tokio::join!(
        client.set_generate(&ctx, true, -1),
        serve(&mut remote, Value::Null)
    );
    assert_eq!(request.method, "setgenerate");
    assert_eq!(request.params, vec![json!(true), json!(-1)]);
    assert_eq!(set, Ok(()));
}

#[tokio::test]
async fn test_get_hashes_per_sec() {
    let (client, mut remote, ctx) = setup();

    let (rate, request) = tokio::join!(
        client.get_hashes_per_sec(&ctx),
        serve(&mut remote, json!(4_200_000))
    );

    assert_eq!(request.method, "gethashespersec");
    assert_eq!(rate, Ok(4_200_000));
}

#[tokio::test]
async fn test_get_mining_info() {
    let (client, mut remote, ctx) = setup();
    let info = json!({
        "blocks": 812_345,
        "currentblocksize": 18_342,
        "currentblocktx": 27,
        "difficulty": 1.5e10,
        "stakedifficulty": 21_900_000_000_i64,
        "errors": "",
        "generate": false,
        "genproclimit": -1,
        "hashespersec": 0,
        "networkhashps": 412_000_000_000_000_i64,
        "pooledtx": 14,
        "testnet": false,
    });

    let (result, request) =
        tokio::join!(client.get_mining_info(&ctx), serve(&mut remote, info));

    assert_eq!(request.method, "getmininginfo");
    let info = result.unwrap();
    assert_eq!(info.blocks, 812_345);
    assert_eq!(info.current_block_tx, 27);
    assert_eq!(info.stake_difficulty, 21_900_000_000);
    assert_eq!(info.gen_proc_limit, -1);
    assert_eq!(info.network_hash_ps, 412_000_000_000_000);
    assert!(!info.test_net);
}

#[tokio::test]
async fn test_network_hash_ps_variants_omit_trailing_defaults() {
    let (client, mut remote, ctx) = setup();

    let (rate, request) = tokio::join!(
        client.get_network_hash_ps(&ctx),
        serve(&mut remote, json!(1_000))
    );
    assert_eq!(request.method, "getnetworkhashps");
    assert!(request.params.is_empty());
    assert_eq!(rate, Ok(1_000));

    let (rate, request) = tokio::join!(
        client.get_network_hash_ps2(&ctx, 120),
        serve(&mut remote, json!(2_000))
    );
    assert_eq!(request.params, vec![json!(120)]);
    assert_eq!(rate, Ok(2_000));

    let (rate, request) = tokio::join!(
        client.get_network_hash_ps3(&ctx, -1, 500_000),
        serve(&mut remote, json!(3_000))
    );
    assert_eq!(request.params, vec![json!(-1), json!(500_000)]);
    assert_eq!(rate, Ok(3_000));
}

#[tokio::test]
async fn test_get_work_and_submit() {
    let (client, mut remote, ctx) = setup();

    let (work, request) = tokio::join!(
        client.get_work(&ctx),
        serve(&mut remote, json!({"data": "0700ab", "target": "00ffff"}))
    );
    assert_eq!(request.method, "getwork");
    assert!(request.params.is_empty());
    let work = work.unwrap();
    assert_eq!(work.data, "0700ab");
    assert_eq!(work.target, "00ffff");

    let (accepted, request) = tokio::join!(
        client.get_work_submit(&ctx, "0700ab01"),
        serve(&mut remote, json!(true))
    );
    assert_eq!(request.method, "getwork");
    assert_eq!(request.params, vec![json!("0700ab01")]);
    assert_eq!(accepted, Ok(true));
}

#[tokio::test]
async fn test_submit_block_accepted() {
    let (client, mut remote, ctx) = setup();
    let block: Vec<u8> = vec![0x0a, 0x0b, 0xff];
    let options = SubmitBlockOptions {
        work_id: Some("w1".to_string()),
    };

    let (result, request) = tokio::join!(
        client.submit_block(&ctx, Some(&block), Some(&options)),
        serve(&mut remote, Value::Null)
    );

    assert_eq!(request.method, "submitblock");
    assert_eq!(request.params, vec![json!("0a0bff"), json!({"workid": "w1"})]);
    assert_eq!(result, Ok(()));
}

#[tokio::test]
async fn test_submit_block_rejection_string_is_application_error() {
    let (client, mut remote, ctx) = setup();
    let block: Vec<u8> = vec![0x01];

    let (result, request) = tokio::join!(
        client.submit_block(&ctx, Some(&block), None),
        serve(&mut remote, json!("rejected: duplicate block"))
    );

    assert_eq!(request.params, vec![json!("01")]);
    let err = result.unwrap_err();
    assert_eq!(err, ClientError::application(None, "rejected: duplicate block"));
    assert_eq!(err.to_string(), "rejected: duplicate block");
}

#[tokio::test]
async fn test_submit_block_without_block_sends_empty_string() {
    let (client, mut remote, ctx) = setup();

    let (result, request) = tokio::join!(
        client.submit_block::<[u8]>(&ctx, None, None),
        serve(&mut remote, Value::Null)
    );

    assert_eq!(request.params, vec![json!("")]);
    assert_eq!(result, Ok(()));
}

#[tokio::test]
async fn test_submit_block_unexpected_result_is_protocol_error() {
    let (client, mut remote, ctx) = setup();
    let block: Vec<u8> = vec![0x01];

    let (result, _) = tokio::join!(
        client.submit_block(&ctx, Some(&block), None),
        serve(&mut remote, json!(7))
    );

    let err = result.unwrap_err();
    assert_eq!(err.payload(), Some(&json!(7)));
}

#[tokio::test]
async fn test_submit_block_encode_failure_sends_nothing() {
    let (client, mut remote, ctx) = setup();

    let mut future = client.submit_block_async(&ctx, Some(&TruncatedBlock), None);
    assert!(future.is_ready());
    assert_eq!(future.request_id(), None);

    match future.receive().await {
        Err(ClientError::Protocol(ProtocolError::InvalidParameter {
            method,
            index,
            reason,
        })) => {
            assert_eq!(method, "submitblock");
            assert_eq!(index, 0);
            assert!(reason.contains("block truncated"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    assert!(remote.try_next_request().is_none());
    let metrics = client.metrics();
    assert_eq!(metrics.requests_sent, 0);
    assert_eq!(metrics.requests_rejected, 1);
}

#[tokio::test]
async fn test_regen_template() {
    let (client, mut remote, ctx) = setup();

    let (result, request) =
        tokio::join!(client.regen_template(&ctx), serve(&mut remote, Value::Null));

    assert_eq!(request.method, "regentemplate");
    assert!(request.params.is_empty());
    assert_eq!(result, Ok(()));
}

#[tokio::test]
async fn test_dispatch_then_collect_in_any_order() {
    let (client, mut remote, ctx) = setup();

    let mut info = client.get_network_hash_ps_async(&ctx);
    let mut generating = client.get_generate_async(&ctx);

    // Both requests are on the wire before either result is read.
    let first = remote.try_next_request().expect("first dispatched");
    let second = remote.try_next_request().expect("second dispatched");
    remote
        .respond_json(&json!({"result": false, "error": null, "id": second.id}))
        .unwrap();
    remote
        .respond_json(&json!({"result": 77, "error": null, "id": first.id}))
        .unwrap();

    assert_eq!(generating.receive().await, Ok(false));
    assert_eq!(info.receive().await, Ok(77));
}
