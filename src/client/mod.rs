//! HTTP client for the HopCache API
//!
//! Translates the cache operations into HTTP requests against a configured
//! host and translates replies back into typed results or errors. The client
//! holds no state between calls beyond its configuration and the pooled
//! connector, so callers may issue any number of operations concurrently.

pub mod response;

use crate::codec;
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::value::CacheValue;
use reqwest::{Client, Method};
use response::{in_band_error, Ack};
use serde_json::Value;
use std::time::Duration;

/// HTTP client for a remote HopCache service
///
/// Construct with an explicit [`Config`] (or [`CacheClient::with_host`] for
/// defaults); there is no ambient host state. Every operation is a single
/// request/response exchange — the client performs no retries and caches
/// nothing locally.
#[derive(Debug, Clone)]
pub struct CacheClient {
    http: Client,
    host: String,
}

impl CacheClient {
    /// Create a client from an explicit configuration
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidConfig`] for an unusable configuration
    /// and [`ClientError::Internal`] if the HTTP connector cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let http = Client::builder()
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|err| ClientError::Internal(format!("failed to create HTTP client: {err}")))?;

        Ok(Self {
            http,
            host: config.host.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client for a host, using default settings for everything else
    pub fn with_host(host: impl Into<String>) -> Result<Self> {
        let config = Config {
            host: host.into(),
            ..Config::default()
        };
        Self::new(&config)
    }

    /// The configured host this client talks to
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Fetch the value stored under `key`
    ///
    /// # Errors
    ///
    /// [`ClientError::NotFound`] when the service holds no entry for the
    /// key, [`ClientError::Transport`] on network failure, and
    /// [`ClientError::Decode`] when the reply is not a well-formed record.
    pub async fn get(&self, key: &str) -> Result<CacheValue> {
        validate_key(key)?;
        let query = format!("/get?key={}", urlencoding::encode(key));

        let reply = match self.request_json(Method::GET, &query).await {
            Err(ClientError::Service { status: 404, .. }) => {
                return Err(ClientError::NotFound {
                    key: key.to_string(),
                })
            }
            other => other?,
        };

        match reply {
            // the service encodes an absent entry as a null body
            Value::Null => Err(ClientError::NotFound {
                key: key.to_string(),
            }),
            Value::Object(fields) => Ok(CacheValue::from(fields)),
            other => Err(ClientError::Decode(format!(
                "expected a record reply, got: {other}"
            ))),
        }
    }

    /// Store `value` under `key`, creating or overwriting the entry
    ///
    /// The value is encoded before any network I/O, so an unrepresentable
    /// value fails with [`ClientError::Encode`] without touching the wire.
    pub async fn set(&self, key: &str, value: &CacheValue) -> Result<Ack> {
        validate_key(key)?;
        let encoded = codec::encode(value)?;
        let query = format!(
            "/set?key={}&value={}",
            urlencoding::encode(key),
            urlencoding::encode(&encoded)
        );
        let reply = self.request_json(Method::POST, &query).await?;
        ack_from(reply)
    }

    /// Remove the entry under `key`, if present
    ///
    /// Deleting an absent key is not an error; the service acks either way.
    pub async fn delete(&self, key: &str) -> Result<Ack> {
        validate_key(key)?;
        let query = format!("/delete?key={}", urlencoding::encode(key));
        let reply = self.request_json(Method::DELETE, &query).await?;
        ack_from(reply)
    }

    /// Whether the service holds an entry under `key`
    pub async fn exists(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        let query = format!("/exists?key={}", urlencoding::encode(key));
        let reply = self.request_json(Method::GET, &query).await?;
        reply
            .as_bool()
            .ok_or_else(|| ClientError::Decode(format!("expected a boolean reply, got: {reply}")))
    }

    /// List every key currently held by the service
    pub async fn keys(&self) -> Result<Vec<String>> {
        let reply = self.request_json(Method::GET, "/keys").await?;
        serde_json::from_value(reply).map_err(Into::into)
    }

    /// List every value currently held by the service
    pub async fn values(&self) -> Result<Vec<CacheValue>> {
        let reply = self.request_json(Method::GET, "/values").await?;
        serde_json::from_value(reply).map_err(Into::into)
    }

    /// Number of entries currently held by the service
    pub async fn length(&self) -> Result<usize> {
        let reply = self.request_json(Method::GET, "/length").await?;
        let count = reply
            .as_u64()
            .ok_or_else(|| ClientError::Decode(format!("expected a numeric reply, got: {reply}")))?;
        usize::try_from(count).map_err(|err| ClientError::Decode(err.to_string()))
    }

    /// Flush every entry from the cache
    pub async fn clean(&self) -> Result<Ack> {
        let reply = self.request_json(Method::POST, "/clean").await?;
        ack_from(reply)
    }

    /// Human-readable report on the cache state
    pub async fn info(&self) -> Result<String> {
        let reply = self.request_json(Method::GET, "/info").await?;
        reply
            .as_str()
            .map(ToString::to_string)
            .ok_or_else(|| ClientError::Decode(format!("expected a report string, got: {reply}")))
    }

    /// Issue a request and parse the reply body, mapping non-2xx statuses
    /// and in-band `{"error"}` replies to [`ClientError::Service`]
    async fn request_json(&self, method: Method, path_and_query: &str) -> Result<Value> {
        let url = format!("{}{}", self.host, path_and_query);
        let response = self.http.request(method, &url).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            } else {
                body.trim().to_string()
            };
            return Err(ClientError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let reply: Value = serde_json::from_str(&body)?;
        if let Some(message) = in_band_error(&reply) {
            return Err(ClientError::Service {
                status: status.as_u16(),
                message,
            });
        }
        Ok(reply)
    }
}

/// Keys are opaque but must be non-empty; refused before any request
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(ClientError::InvalidKey("key must be non-empty".to_string()));
    }
    Ok(())
}

/// Interpret a reply as a success acknowledgement
fn ack_from(reply: Value) -> Result<Ack> {
    match serde_json::from_value::<Ack>(reply) {
        Ok(ack) if ack.success => Ok(ack),
        _ => Err(ClientError::Decode(
            "reply is not an acknowledgement".to_string(),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::Mutex;

    /// Entries are kept in wire form, exactly as the service stores them
    type Store = Arc<Mutex<HashMap<String, String>>>;

    fn record(fields: Value) -> CacheValue {
        CacheValue::try_from(fields).unwrap()
    }

    fn find_head_end(buf: &[u8]) -> Option<usize> {
        buf.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4)
    }

    fn reason(status: u16) -> &'static str {
        match status {
            200 => "OK",
            404 => "Not Found",
            500 => "Internal Server Error",
            _ => "Unknown",
        }
    }

    /// Spawn an in-process stand-in for the HopCache service: a listener
    /// speaking just enough HTTP/1.1, implementing the service's reply
    /// conventions over a shared map
    async fn spawn_service() -> (String, Store) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let store: Store = Arc::new(Mutex::new(HashMap::new()));

        let state = Arc::clone(&store);
        let _accept = tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    break;
                };
                let state = Arc::clone(&state);
                let _conn = tokio::spawn(serve_connection(socket, state));
            }
        });

        (format!("http://{addr}"), store)
    }

    async fn serve_connection(mut socket: TcpStream, store: Store) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 2048];
        loop {
            let head = loop {
                if let Some(end) = find_head_end(&buf) {
                    break buf.drain(..end).collect::<Vec<u8>>();
                }
                match socket.read(&mut chunk).await {
                    Ok(0) | Err(_) => return,
                    Ok(n) => buf.extend_from_slice(&chunk[..n]),
                }
            };

            let head = String::from_utf8_lossy(&head).to_string();
            let request_line = head.lines().next().unwrap_or_default().to_string();
            let (status, body) = route(&request_line, &store).await;

            let reply = format!(
                "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
                reason(status),
                body.len()
            );
            if socket.write_all(reply.as_bytes()).await.is_err() {
                return;
            }
        }
    }

    async fn route(request_line: &str, store: &Store) -> (u16, String) {
        let mut parts = request_line.split_whitespace();
        let method = parts.next().unwrap_or_default().to_string();
        let target = parts.next().unwrap_or_default();
        let (path, query) = target.split_once('?').unwrap_or((target, ""));

        let params: HashMap<String, String> = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| {
                (
                    k.to_string(),
                    urlencoding::decode(v)
                        .map(|c| c.into_owned())
                        .unwrap_or_default(),
                )
            })
            .collect();

        match (method.as_str(), path) {
            ("GET", "/get") => match params.get("key") {
                None => (200, r#"{"error":"invalid key"}"#.to_string()),
                Some(key) => match store.lock().await.get(key) {
                    Some(encoded) => {
                        let json = BASE64.decode(encoded).unwrap();
                        (200, String::from_utf8(json).unwrap())
                    }
                    None => (200, "null".to_string()),
                },
            },
            ("POST", "/set") => match (params.get("key"), params.get("value")) {
                (Some(key), Some(value)) => {
                    let _ = store.lock().await.insert(key.clone(), value.clone());
                    (200, r#"{"success": true}"#.to_string())
                }
                _ => (200, r#"{"error":"invalid value"}"#.to_string()),
            },
            ("DELETE", "/delete") => match params.get("key") {
                None => (200, r#"{"error":"invalid key"}"#.to_string()),
                Some(key) => {
                    let _ = store.lock().await.remove(key);
                    (200, r#"{"success": true}"#.to_string())
                }
            },
            ("GET", "/exists") => match params.get("key") {
                None => (200, r#"{"error":"invalid key"}"#.to_string()),
                Some(key) => (200, store.lock().await.contains_key(key).to_string()),
            },
            ("GET", "/keys") => {
                let keys: Vec<String> = store.lock().await.keys().cloned().collect();
                (200, json!(keys).to_string())
            }
            ("GET", "/values") => {
                let values: Vec<Value> = store
                    .lock()
                    .await
                    .values()
                    .map(|encoded| {
                        serde_json::from_slice(&BASE64.decode(encoded).unwrap()).unwrap()
                    })
                    .collect();
                (200, json!(values).to_string())
            }
            ("GET", "/length") => (200, store.lock().await.len().to_string()),
            ("POST", "/clean") => {
                store.lock().await.clear();
                (200, r#"{"success": true}"#.to_string())
            }
            ("GET", "/info") => {
                let report = format!(
                    "Cache Info:\n-----------\nNumber of keys: {}\n",
                    store.lock().await.len()
                );
                (200, json!(report).to_string())
            }
            _ => (404, r#"{"error":"not found"}"#.to_string()),
        }
    }

    /// Spawn a listener that answers every request with one canned reply
    async fn spawn_canned(status: u16, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let _accept = tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let _conn = tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 2048];
                    loop {
                        match socket.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => buf.extend_from_slice(&chunk[..n]),
                        }
                        if let Some(end) = find_head_end(&buf) {
                            buf.drain(..end).for_each(drop);
                            let reply = format!(
                                "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
                                reason(status),
                                body.len()
                            );
                            if socket.write_all(reply.as_bytes()).await.is_err() {
                                return;
                            }
                        }
                    }
                });
            }
        });

        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_set_then_get_returns_equal_value() {
        let (host, _store) = spawn_service().await;
        let client = CacheClient::with_host(host).unwrap();

        let value = record(json!({"name": "Ada", "age": 36, "tags": ["math"]}));
        let ack = client.set("user:1", &value).await.unwrap();
        assert!(ack.success);

        let fetched = client.get("user:1").await.unwrap();
        assert_eq!(fetched, value);
    }

    #[tokio::test]
    async fn test_get_absent_key_is_not_found() {
        let (host, _store) = spawn_service().await;
        let client = CacheClient::with_host(host).unwrap();

        let err = client.get("missing").await.unwrap_err();
        assert!(
            matches!(err, ClientError::NotFound { ref key } if key == "missing"),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn test_delete_absent_key_acks() {
        let (host, _store) = spawn_service().await;
        let client = CacheClient::with_host(host).unwrap();

        let ack = client.delete("never-set").await.unwrap();
        assert!(ack.success);
    }

    #[tokio::test]
    async fn test_entry_lifecycle() {
        let (host, _store) = spawn_service().await;
        let client = CacheClient::with_host(host).unwrap();

        let value = record(json!({"name": "Ada"}));
        assert!(client.set("user:1", &value).await.unwrap().success);
        assert_eq!(client.get("user:1").await.unwrap(), value);
        assert!(client.delete("user:1").await.unwrap().success);

        let err = client.get("user:1").await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_empty_key_rejected_without_network() {
        // nothing listens here; a rejected key must never reach the wire
        let client = CacheClient::with_host("http://127.0.0.1:9").unwrap();

        let err = client.get("").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidKey(_)), "got {err:?}");

        let err = client.set("", &CacheValue::new()).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidKey(_)), "got {err:?}");

        let err = client.delete("").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidKey(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // grab a port that nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = CacheClient::with_host(format!("http://{addr}")).unwrap();
        let err = client.get("x").await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_non_success_status_is_service_error() {
        let host = spawn_canned(500, r#"{"error":"boom"}"#).await;
        let client = CacheClient::with_host(host).unwrap();

        let err = client.get("x").await.unwrap_err();
        assert!(
            matches!(err, ClientError::Service { status: 500, .. }),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn test_in_band_rejection_is_service_error() {
        let host = spawn_canned(200, r#"{"error":"invalid key"}"#).await;
        let client = CacheClient::with_host(host).unwrap();

        let err = client.set("k", &CacheValue::new()).await.unwrap_err();
        assert!(
            matches!(err, ClientError::Service { status: 200, ref message } if message == "invalid key"),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let host = spawn_canned(200, "definitely not json").await;
        let client = CacheClient::with_host(host).unwrap();

        let err = client.get("x").await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_scalar_reply_to_get_is_decode_error() {
        let host = spawn_canned(200, "42").await;
        let client = CacheClient::with_host(host).unwrap();

        let err = client.get("x").await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_inventory_operations() {
        let (host, _store) = spawn_service().await;
        let client = CacheClient::with_host(host).unwrap();

        assert_eq!(client.length().await.unwrap(), 0);
        assert!(!client.exists("user:1").await.unwrap());

        let ada = record(json!({"name": "Ada"}));
        let alan = record(json!({"name": "Alan"}));
        assert!(client.set("user:1", &ada).await.unwrap().success);
        assert!(client.set("user:2", &alan).await.unwrap().success);

        assert!(client.exists("user:1").await.unwrap());
        assert_eq!(client.length().await.unwrap(), 2);

        let mut keys = client.keys().await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["user:1".to_string(), "user:2".to_string()]);

        let values = client.values().await.unwrap();
        assert_eq!(values.len(), 2);
        assert!(values.contains(&ada));

        let report = client.info().await.unwrap();
        assert!(report.contains("Number of keys: 2"));

        assert!(client.clean().await.unwrap().success);
        assert_eq!(client.length().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_gets_share_one_client() {
        let (host, _store) = spawn_service().await;
        let client = CacheClient::with_host(host).unwrap();

        for i in 0..4 {
            let value = record(json!({ "n": i }));
            assert!(client.set(&format!("k:{i}"), &value).await.unwrap().success);
        }

        let keys: Vec<String> = (0..4).map(|i| format!("k:{i}")).collect();
        let fetched = futures::future::try_join_all(keys.iter().map(|key| client.get(key)))
            .await
            .unwrap();

        for (i, value) in fetched.iter().enumerate() {
            assert_eq!(value.get("n"), Some(&json!(i)));
        }
    }

    #[tokio::test]
    async fn test_keys_survive_url_metacharacters() {
        let (host, _store) = spawn_service().await;
        let client = CacheClient::with_host(host).unwrap();

        let key = "user a/b&c=d+e";
        let value = record(json!({"ok": true}));
        assert!(client.set(key, &value).await.unwrap().success);
        assert_eq!(client.get(key).await.unwrap(), value);
    }
}
