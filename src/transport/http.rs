//! Publishing through a broker's HTTP API.
//!
//! Brokers such as EMQX accept `POST /api/v5/publish` with a JSON body and
//! forward it to MQTT subscribers. This keeps the client free of a long-lived
//! broker connection: each publish is one request.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::Transport;
use crate::config::BrokerConfig;
use crate::error::{PipelineError, PipelineResult};

/// Request body understood by the publish endpoint.
#[derive(Debug, Serialize)]
struct PublishRequest<'a> {
    topic: &'a str,
    payload: &'a str,
    qos: u8,
    clientid: &'a str,
    encoding: &'static str,
}

/// Transport posting every payload to an HTTP publish endpoint.
pub struct HttpBridgeTransport {
    client: reqwest::Client,
    config: BrokerConfig,
}

impl HttpBridgeTransport {
    /// Build a transport for `config`.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Config`] when the broker settings do not validate, or
    /// [`PipelineError::External`] when the HTTP client cannot be built.
    pub fn new(config: BrokerConfig) -> PipelineResult<Self> {
        config
            .validate()
            .map_err(|reason| PipelineError::config("broker", config.url.clone(), reason))?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| PipelineError::external("reqwest", e))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for HttpBridgeTransport {
    async fn publish(&self, topic: &str, payload: &str) -> PipelineResult<()> {
        let body = PublishRequest {
            topic,
            payload,
            qos: self.config.qos,
            clientid: &self.config.client_id,
            encoding: "plain",
        };

        let mut request = self.client.post(&self.config.url).json(&body);
        if let Some(user) = &self.config.username {
            request = request.basic_auth(user, self.config.password.as_deref());
        }

        let fail = |e: reqwest::Error| {
            PipelineError::transport("publish")
                .with_address(self.config.url.clone())
                .with_source(e)
        };
        let response = request.send().await.map_err(fail)?;
        let status = response.status();
        response.error_for_status().map_err(fail)?;

        debug!(%status, bytes = payload.len(), "published over HTTP bridge");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("http({})", self.config.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Accept one request, answer with `status_line`, return the raw request.
    async fn serve_once(listener: TcpListener, status_line: &'static str) -> String {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            raw.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&raw).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if raw.len() >= header_end + 4 + content_length {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }
        let reply = format!("{}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n", status_line);
        socket.write_all(reply.as_bytes()).await.unwrap();
        String::from_utf8_lossy(&raw).to_string()
    }

    fn config_for(addr: std::net::SocketAddr) -> BrokerConfig {
        BrokerConfig {
            url: format!("http://{}/api/v5/publish", addr),
            username: Some("user".to_string()),
            password: Some("password".to_string()),
            ..BrokerConfig::default()
        }
    }

    #[tokio::test]
    async fn posts_json_body_with_basic_auth() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(serve_once(listener, "HTTP/1.1 200 OK"));

        let transport = HttpBridgeTransport::new(config_for(addr)).unwrap();
        transport.publish("display", "0:16$").await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/v5/publish"));
        assert!(request.to_ascii_lowercase().contains("authorization: basic "));
        let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
        let json: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(json["topic"], "display");
        assert_eq!(json["payload"], "0:16$");
        assert_eq!(json["clientid"], "messagebox");
        assert_eq!(json["qos"], 0);
    }

    #[tokio::test]
    async fn non_success_status_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(serve_once(listener, "HTTP/1.1 401 Unauthorized"));

        let transport = HttpBridgeTransport::new(config_for(addr)).unwrap();
        let err = transport.publish("", "hi$&#").await.unwrap_err();
        server.await.unwrap();

        assert_eq!(err.category(), "transport");
        assert!(err.to_string().contains(&addr.to_string()));
    }

    #[test]
    fn invalid_broker_config_is_rejected() {
        let config = BrokerConfig {
            url: "broker.emqx.io:1883".to_string(),
            ..BrokerConfig::default()
        };
        let err = HttpBridgeTransport::new(config).err().unwrap();
        assert_eq!(err.category(), "config");
    }
}
