use std::time::Duration;

use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use sentkv_client::{CacheClient, ClientConfig, KeyTtl, Reply};

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

async fn spawn_server(exchanges: Vec<Exchange>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr").to_string();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut reader = BufReader::new(stream);
        let mut line = Vec::new();
        for exchange in exchanges {
            let args = read_request(&mut reader, &mut line).await;
            let expected: Vec<Vec<u8>> =
                exchange.request.iter().map(|part| part.to_vec()).collect();
            assert_eq!(args, expected);
            reader
                .get_mut()
                .write_all(exchange.response)
                .await
                .expect("respond");
        }
    });

    addr
}

fn client_for(addr: &str) -> CacheClient {
    let (host, port) = addr.rsplit_once(':').expect("addr");
    let config = ClientConfig {
        host: host.to_string(),
        port: port.parse().expect("port"),
        max_idle: 1,
        max_total: 1,
        connect_timeout: Some(Duration::from_secs(1)),
        read_timeout: Some(Duration::from_secs(1)),
        write_timeout: Some(Duration::from_secs(1)),
    };
    CacheClient::new(&config)
}

#[tokio::test]
async fn set_get_roundtrip() {
    let addr = spawn_server(vec![
        Exchange {
            request: &[b"SET", b"key", b"value"],
            response: b"+OK\r\n",
        },
        Exchange {
            request: &[b"GET", b"key"],
            response: b"$5\r\nvalue\r\n",
        },
    ])
    .await;

    let client = client_for(&addr);
    client.set(b"key", b"value").await.expect("set");
    let value = client.get(b"key").await.expect("get");
    assert_eq!(value, Some(b"value".to_vec()));
}

#[tokio::test]
async fn get_distinguishes_missing_from_empty() {
    let addr = spawn_server(vec![
        Exchange {
            request: &[b"GET", b"missing"],
            response: b"$-1\r\n",
        },
        Exchange {
            request: &[b"GET", b"empty"],
            response: b"$0\r\n\r\n",
        },
    ])
    .await;

    let client = client_for(&addr);
    assert_eq!(client.get(b"missing").await.expect("missing"), None);
    assert_eq!(client.get(b"empty").await.expect("empty"), Some(Vec::new()));
}

#[tokio::test]
async fn set_with_ttl_encodes_the_expiration() {
    let addr = spawn_server(vec![Exchange {
        request: &[b"SET", b"key", b"value", b"EX", b"30"],
        response: b"+OK\r\n",
    }])
    .await;

    let client = client_for(&addr);
    client
        .set_with_ttl(b"key", b"value", Duration::from_secs(30))
        .await
        .expect("set with ttl");
}

#[tokio::test]
async fn ttl_and_delete() {
    let addr = spawn_server(vec![
        Exchange {
            request: &[b"TTL", b"key"],
            response: b":5\r\n",
        },
        Exchange {
            request: &[b"TTL", b"eternal"],
            response: b":-1\r\n",
        },
        Exchange {
            request: &[b"TTL", b"missing"],
            response: b":-2\r\n",
        },
        Exchange {
            request: &[b"DEL", b"key"],
            response: b":1\r\n",
        },
    ])
    .await;

    let client = client_for(&addr);
    assert_eq!(
        client.ttl(b"key").await.expect("ttl"),
        KeyTtl::ExpiresIn(Duration::from_secs(5))
    );
    assert_eq!(client.ttl(b"eternal").await.expect("ttl"), KeyTtl::NoExpiry);
    assert_eq!(client.ttl(b"missing").await.expect("ttl"), KeyTtl::Missing);
    assert!(client.delete(b"key").await.expect("delete"));
}

#[tokio::test]
async fn expire_is_false_when_the_key_is_missing() {
    let addr = spawn_server(vec![Exchange {
        request: &[b"EXPIRE", b"ghost", b"30"],
        response: b":0\r\n",
    }])
    .await;

    let client = client_for(&addr);
    assert!(!client
        .expire(b"ghost", Duration::from_secs(30))
        .await
        .expect("expire"));
}

#[tokio::test]
async fn hgetall_keeps_server_field_order() {
    let addr = spawn_server(vec![Exchange {
        request: &[b"HGETALL", b"session"],
        response: b"*4\r\n$4\r\nuser\r\n$5\r\nalice\r\n$4\r\nrole\r\n$5\r\nadmin\r\n",
    }])
    .await;

    let client = client_for(&addr);
    assert_eq!(
        client.hgetall(b"session").await.expect("hgetall"),
        vec![
            ("user".to_string(), "alice".to_string()),
            ("role".to_string(), "admin".to_string()),
        ]
    );
}

#[tokio::test]
async fn info_returns_bulk_text() {
    let addr = spawn_server(vec![Exchange {
        request: &[b"INFO"],
        response: b"$23\r\n# Server\r\nrole:master\r\n\r\n",
    }])
    .await;

    let client = client_for(&addr);
    let info = client.info().await.expect("info");
    assert_eq!(info, b"# Server\r\nrole:master\r\n".to_vec());
}
