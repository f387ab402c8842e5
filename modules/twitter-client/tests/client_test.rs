//! `TwitterClient` against a local HTTP listener serving canned responses,
//! one connection per response.

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use twitter_client::{TwitterClient, TwitterError};

const TOKEN: &str = r#"{"token_type":"bearer","access_token":"test-token"}"#;

struct Reply {
    status: &'static str,
    headers: Vec<(String, String)>,
    body: String,
}

fn ok(body: impl Into<String>) -> Reply {
    Reply {
        status: "200 OK",
        headers: Vec::new(),
        body: body.into(),
    }
}

fn status(status: &'static str, body: &str) -> Reply {
    Reply {
        status,
        headers: Vec::new(),
        body: body.to_string(),
    }
}

fn ids_page(ids: std::ops::RangeInclusive<u64>, next_cursor: i64) -> Reply {
    let ids: Vec<u64> = ids.collect();
    ok(serde_json::json!({
        "ids": ids,
        "next_cursor": next_cursor,
        "previous_cursor": 0,
    })
    .to_string())
}

/// Serve `replies` in order, one per connection. Returns the base URL and the
/// request lines received.
async fn serve(replies: Vec<Reply>) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();

    tokio::spawn(async move {
        for reply in replies {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            log.lock().unwrap().push(request);

            let mut head = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n",
                reply.status,
                reply.body.len()
            );
            for (name, value) in &reply.headers {
                head.push_str(&format!("{}: {}\r\n", name, value));
            }
            head.push_str("\r\n");
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(reply.body.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        }
    });

    (base_url, seen)
}

async fn connect(base_url: &str) -> TwitterClient {
    TwitterClient::connect_to(base_url, "key", "secret")
        .await
        .unwrap()
}

/// Read one request (headers plus any `Content-Length` body) and return its request line.
async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let body_len = text[..end]
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                break;
            }
        }
    }
    let text = String::from_utf8_lossy(&buf);
    text.lines().next().unwrap_or_default().to_string()
}

#[tokio::test]
async fn followers_stop_at_limit_inside_second_page() {
    let (base_url, seen) = serve(vec![
        ok(TOKEN),
        ids_page(1..=5000, 42),
        ids_page(5001..=10000, 43),
    ])
    .await;
    let client = connect(&base_url).await;

    let ids = client.followers_ids("massgov", 7000).await.unwrap();
    assert_eq!(ids.len(), 7000);
    assert_eq!(ids[0], 1);
    assert_eq!(ids[6999], 7000);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert!(seen[0].starts_with("POST /oauth2/token"));
    assert!(seen[1].contains("cursor=-1"));
    assert!(seen[2].contains("cursor=42"));
}

#[tokio::test]
async fn friends_stop_at_zero_cursor() {
    let (base_url, seen) = serve(vec![ok(TOKEN), ids_page(7..=9, 0)]).await;
    let client = connect(&base_url).await;

    let ids = client.friends_ids(12, 100).await.unwrap();
    assert_eq!(ids, vec![7, 8, 9]);
    assert!(seen.lock().unwrap()[1].contains("user_id=12"));
}

#[tokio::test]
async fn unknown_user_is_none() {
    let missing = status("404 Not Found", r#"{"errors":[{"code":50}]}"#);
    let (base_url, _) = serve(vec![ok(TOKEN), missing]).await;
    let client = connect(&base_url).await;

    assert!(client.user(99).await.unwrap().is_none());
}

#[tokio::test]
async fn server_error_is_api_error() {
    let failure = status("500 Internal Server Error", "oops");
    let (base_url, _) = serve(vec![ok(TOKEN), failure]).await;
    let client = connect(&base_url).await;

    match client.user(99).await {
        Err(TwitterError::Api { status, .. }) => assert_eq!(status, 500),
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_user_body_is_parse_error() {
    let truncated = ok(r#"{"id": "not a number"#);
    let (base_url, _) = serve(vec![ok(TOKEN), truncated]).await;
    let client = connect(&base_url).await;

    assert!(matches!(client.user(5).await, Err(TwitterError::Parse(_))));
}

#[tokio::test]
async fn malformed_ids_page_is_parse_error() {
    let (base_url, _) = serve(vec![ok(TOKEN), ok("<html>")]).await;
    let client = connect(&base_url).await;

    assert!(matches!(
        client.friends_ids(5, 10).await,
        Err(TwitterError::Parse(_))
    ));
}

#[tokio::test]
async fn rate_limited_request_is_retried() {
    let mut limited = status("429 Too Many Requests", r#"{"errors":[{"code":88}]}"#);
    // A reset already in the past waits the one-second floor.
    limited
        .headers
        .push(("x-rate-limit-reset".to_string(), "1".to_string()));
    let user = serde_json::json!({
        "id": 5,
        "screen_name": "BostonGlobe",
        "name": "Boston Globe",
        "followers_count": 900,
    });
    let (base_url, seen) = serve(vec![ok(TOKEN), limited, ok(user.to_string())]).await;
    let client = connect(&base_url).await;

    let found = client.user(5).await.unwrap().unwrap();
    assert_eq!(found.screen_name, "BostonGlobe");
    assert_eq!(found.followers_count, 900);
    assert_eq!(seen.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn rejected_credentials_are_auth_error() {
    let (base_url, _) = serve(vec![status("403 Forbidden", "bad credentials")]).await;

    assert!(matches!(
        TwitterClient::connect_to(&base_url, "key", "wrong").await,
        Err(TwitterError::Auth(_))
    ));
}
