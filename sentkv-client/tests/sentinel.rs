use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use sentkv_client::{ClientConfig, ClientError, Reply, SentinelClient};

/// One scripted request/response pair: the exact argv the server must see,
/// and the raw reply bytes it sends back.
struct Exchange {
    request: &'static [&'static [u8]],
    response: &'static [u8],
}

async fn read_request(reader: &mut BufReader<TcpStream>, line: &mut Vec<u8>) -> Vec<Vec<u8>> {
    let frame = sentkv_common::read_reply(reader, line).await.expect("request frame");
    let Reply::MultiBulk(Some(items)) = frame else {
        panic!("expected array request, got {frame:?}");
    };
    items
        .into_iter()
        .map(|item| match item {
            Reply::Bulk(Some(data)) => data,
            other => panic!("expected bulk argument, got {other:?}"),
        })
        .collect()
}

async fn serve(stream: TcpStream, exchanges: Vec<Exchange>) {
    let mut reader = BufReader::new(stream);
    let mut line = Vec::new();
    for exchange in exchanges {
        let args = read_request(&mut reader, &mut line).await;
        let expected: Vec<Vec<u8>> = exchange.request.iter().map(|part| part.to_vec()).collect();
        assert_eq!(args, expected);
        reader
            .get_mut()
            .write_all(exchange.response)
            .await
            .expect("respond");
    }
}

async fn spawn_server(exchanges: Vec<Exchange>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr").to_string();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        serve(stream, exchanges).await;
    });

    addr
}

fn config_for(addr: &str) -> ClientConfig {
    let (host, port) = addr.rsplit_once(':').expect("addr");
    ClientConfig {
        host: host.to_string(),
        port: port.parse().expect("port"),
        max_idle: 1,
        max_total: 1,
        connect_timeout: Some(Duration::from_secs(1)),
        read_timeout: Some(Duration::from_secs(1)),
        write_timeout: Some(Duration::from_secs(1)),
    }
}

#[tokio::test]
async fn ping_round_trip() {
    let addr = spawn_server(vec![Exchange {
        request: &[b"PING"],
        response: b"+PONG\r\n",
    }])
    .await;

    let client = SentinelClient::new(&config_for(&addr));
    assert_eq!(client.ping().await.expect("ping"), "PONG");
}

#[tokio::test]
async fn masters_decodes_hash_records() {
    let addr = spawn_server(vec![Exchange {
        request: &[b"SENTINEL", b"MASTERS"],
        response: b"*1\r\n*10\r\n\
            $4\r\nname\r\n$5\r\nalpha\r\n\
            $2\r\nip\r\n$9\r\n127.0.0.1\r\n\
            $4\r\nport\r\n$4\r\n6379\r\n\
            $5\r\nflags\r\n$6\r\nmaster\r\n\
            $6\r\nquorum\r\n$1\r\n2\r\n",
    }])
    .await;

    let client = SentinelClient::new(&config_for(&addr));
    let masters = client.masters().await.expect("masters");
    assert_eq!(masters.len(), 1);
    let master = &masters[0];
    assert_eq!(master.name, "alpha");
    assert_eq!(master.ip, "127.0.0.1");
    assert_eq!(master.port, 6379);
    assert_eq!(master.flags, "master");
    assert_eq!(master.quorum, 2);
    // Fields the server did not send keep their defaults.
    assert_eq!(master.run_id, "");
    assert_eq!(master.num_slaves, 0);
}

#[tokio::test]
async fn master_addr_for_known_and_unknown_names() {
    let addr = spawn_server(vec![
        Exchange {
            request: &[b"SENTINEL", b"GET-MASTER-ADDR-BY-NAME", b"alpha"],
            response: b"*2\r\n$9\r\n127.0.0.1\r\n$4\r\n6379\r\n",
        },
        Exchange {
            request: &[b"SENTINEL", b"GET-MASTER-ADDR-BY-NAME", b"ghost"],
            response: b"*-1\r\n",
        },
    ])
    .await;

    let client = SentinelClient::new(&config_for(&addr));
    assert_eq!(
        client.get_master_addr_by_name("alpha").await.expect("alpha"),
        Some(("127.0.0.1".to_string(), 6379))
    );
    assert_eq!(
        client.get_master_addr_by_name("ghost").await.expect("ghost"),
        None
    );
}

#[tokio::test]
async fn is_master_down_by_addr_reads_the_verdict() {
    let addr = spawn_server(vec![Exchange {
        request: &[
            b"SENTINEL",
            b"IS-MASTER-DOWN-BY-ADDR",
            b"127.0.0.1",
            b"6379",
            b"7",
            b"abcdef0123",
        ],
        response: b"*3\r\n:1\r\n$10\r\nabcdef0123\r\n:7\r\n",
    }])
    .await;

    let client = SentinelClient::new(&config_for(&addr));
    let state = client
        .is_master_down_by_addr("127.0.0.1", 6379, 7, "abcdef0123")
        .await
        .expect("state");
    assert!(state.is_down);
    assert_eq!(state.leader, "abcdef0123");
    assert_eq!(state.vote_epoch, 7);
}

#[tokio::test]
async fn admin_commands_round_trip() {
    let addr = spawn_server(vec![
        Exchange {
            request: &[b"SENTINEL", b"MONITOR", b"alpha", b"6379", b"2"],
            response: b"+OK\r\n",
        },
        Exchange {
            request: &[b"SENTINEL", b"SET", b"alpha", b"down-after-milliseconds", b"5000"],
            response: b"+OK\r\n",
        },
        Exchange {
            request: &[b"SENTINEL", b"RESET", b"alpha*"],
            response: b":1\r\n",
        },
        Exchange {
            request: &[b"SENTINEL", b"FAILOVER", b"alpha"],
            response: b"+OK\r\n",
        },
        Exchange {
            request: &[b"SENTINEL", b"REMOVE", b"alpha"],
            response: b"+OK\r\n",
        },
    ])
    .await;

    let client = SentinelClient::new(&config_for(&addr));
    assert_eq!(client.monitor("alpha", 6379, 2).await.expect("monitor"), "OK");
    assert_eq!(
        client
            .set("alpha", "down-after-milliseconds", "5000")
            .await
            .expect("set"),
        "OK"
    );
    assert_eq!(client.reset("alpha*").await.expect("reset"), 1);
    assert_eq!(client.failover("alpha").await.expect("failover"), "OK");
    assert_eq!(client.remove("alpha").await.expect("remove"), "OK");
}

#[tokio::test]
async fn escape_hatch_returns_the_raw_reply() {
    let addr = spawn_server(vec![Exchange {
        request: &[b"SENTINEL", b"CKQUORUM", b"alpha"],
        response: b"+OK 3 usable Sentinels. Quorum and failover authorization can be reached\r\n",
    }])
    .await;

    let client = SentinelClient::new(&config_for(&addr));
    let reply = client
        .call("SENTINEL", &["CKQUORUM", "alpha"])
        .await
        .expect("call");
    assert!(matches!(reply, Reply::Status(text) if text.starts_with("OK 3 usable")));
}

#[tokio::test]
async fn server_error_reply_surfaces_as_server_error() {
    let addr = spawn_server(vec![Exchange {
        request: &[b"SENTINEL", b"FAILOVER", b"ghost"],
        response: b"-ERR No such master with that name\r\n",
    }])
    .await;

    let client = SentinelClient::new(&config_for(&addr));
    let err = client.failover("ghost").await.expect_err("failover");
    match err {
        ClientError::Server(message) => assert!(message.contains("No such master")),
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn protocol_mismatch_surfaces_as_protocol_error() {
    // An integer where the addr pair should be: shape mismatch, not data.
    let addr = spawn_server(vec![Exchange {
        request: &[b"SENTINEL", b"GET-MASTER-ADDR-BY-NAME", b"alpha"],
        response: b":1\r\n",
    }])
    .await;

    let client = SentinelClient::new(&config_for(&addr));
    let err = client
        .get_master_addr_by_name("alpha")
        .await
        .expect_err("mismatch");
    assert!(matches!(err, ClientError::Protocol(_)));
}

#[tokio::test]
async fn argument_validation_fires_before_any_io() {
    // Nothing is listening here; an argument error must fire first.
    let config = ClientConfig {
        host: "127.0.0.1".to_string(),
        port: 1,
        ..ClientConfig::default()
    };
    let client = SentinelClient::new(&config);

    let err = client.master("").await.expect_err("empty name");
    assert!(matches!(err, ClientError::Argument(_)));

    let err = client.monitor("alpha", 6379, 0).await.expect_err("quorum");
    assert!(matches!(err, ClientError::Argument(_)));
}

#[tokio::test]
async fn reconnects_after_a_transport_reset() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr").to_string();

    tokio::spawn(async move {
        // First connection: swallow the request, then drop the socket.
        let (mut stream, _) = listener.accept().await.expect("accept");
        let mut buf = BytesMut::with_capacity(256);
        stream.read_buf(&mut buf).await.expect("read");
        drop(stream);

        // Second connection: behave normally.
        let (stream, _) = listener.accept().await.expect("accept");
        serve(
            stream,
            vec![Exchange {
                request: &[b"PING"],
                response: b"+PONG\r\n",
            }],
        )
        .await;
    });

    let client = SentinelClient::new(&config_for(&addr));

    let err = client.ping().await.expect_err("dead socket");
    assert!(matches!(err, ClientError::Connection(_)));

    // The failed connection was discarded; this call dials a fresh one.
    assert_eq!(client.ping().await.expect("reconnected"), "PONG");
}

#[tokio::test]
async fn pooled_connections_do_not_crosstalk() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr").to_string();

    tokio::spawn(async move {
        for _ in 0..2 {
            let (stream, _) = listener.accept().await.expect("accept");
            tokio::spawn(async move {
                let mut reader = BufReader::new(stream);
                let mut line = Vec::new();
                let args = read_request(&mut reader, &mut line).await;
                let response: &[u8] = if args[2] == b"alpha" {
                    // Delay the first reply so a shared socket would cross wires.
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    b"*2\r\n$8\r\n10.0.0.1\r\n$4\r\n6379\r\n"
                } else {
                    b"*2\r\n$8\r\n10.0.0.2\r\n$4\r\n6380\r\n"
                };
                reader.get_mut().write_all(response).await.expect("respond");
            });
        }
    });

    let mut config = config_for(&addr);
    config.max_idle = 2;
    config.max_total = 2;
    let client = SentinelClient::new(&config);

    let (alpha, beta) = tokio::join!(
        client.get_master_addr_by_name("alpha"),
        client.get_master_addr_by_name("beta"),
    );
    assert_eq!(alpha.expect("alpha"), Some(("10.0.0.1".to_string(), 6379)));
    assert_eq!(beta.expect("beta"), Some(("10.0.0.2".to_string(), 6380)));
}
