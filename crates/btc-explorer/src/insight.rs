use async_trait::async_trait;
use chain_btc::network::BtcNetwork;
use chain_btc::utxo::Utxo;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::ExplorerError;
use crate::types::{BroadcastResponse, InsightUtxo, RawTxResponse};
use crate::Explorer;

/// Thin client for an Insight explorer bound to one base URL.
#[derive(Debug, Clone)]
pub struct InsightClient {
    client: Client,
    base_url: Url,
}

impl InsightClient {
    /// Create a client for `base_url`, e.g. `https://test-insight.bitpay.com/api/`.
    pub fn new(base_url: &str) -> Result<Self, ExplorerError> {
        Self::with_client(Client::new(), base_url)
    }

    /// Client for the default explorer of `network`.
    pub fn for_network(network: BtcNetwork) -> Result<Self, ExplorerError> {
        Self::new(network.default_explorer_url())
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ExplorerError> {
        // Url::join drops the last segment unless the base ends with '/'.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url =
            Url::parse(&normalized).map_err(|e| ExplorerError::InvalidUrl(format!("{base_url}: {e}")))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ExplorerError> {
        self.base_url
            .join(path)
            .map_err(|e| ExplorerError::InvalidUrl(format!("{path}: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ExplorerError> {
        let url = self.endpoint(path)?;
        debug!(%url, "explorer GET");
        let response = self.client.get(url).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ExplorerError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ExplorerError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json().await?)
}

#[async_trait]
impl Explorer for InsightClient {
    async fn utxos(&self, address: &str) -> Result<Vec<Utxo>, ExplorerError> {
        let entries: Vec<InsightUtxo> = self.get_json(&format!("addr/{address}/utxo")).await?;
        info!(address, count = entries.len(), "fetched utxos");
        entries.into_iter().map(Utxo::try_from).collect()
    }

    async fn raw_transaction(&self, txid: &str) -> Result<String, ExplorerError> {
        let body: RawTxResponse = self.get_json(&format!("rawtx/{txid}")).await?;
        Ok(body.rawtx)
    }

    async fn broadcast(&self, raw_hex: &str) -> Result<String, ExplorerError> {
        let url = self.endpoint("tx/send")?;
        debug!(%url, bytes = raw_hex.len() / 2, "explorer POST");
        let response = self
            .client
            .post(url)
            .form(&[("rawtx", raw_hex)])
            .send()
            .await?;
        let body: BroadcastResponse = decode(response).await?;
        info!(txid = %body.txid, "broadcast accepted");
        Ok(body.txid)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::net::SocketAddr;

    use axum::extract::{Form, Path};
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;

    const TXID: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

    async fn utxo_handler(Path(address): Path<String>) -> Json<Value> {
        Json(json!([
            {
                "address": address,
                "txid": TXID,
                "vout": 0,
                "scriptPubKey": "76a91400112233445566778899aabbccddeeff0011223388ac",
                "amount": 0.001,
                "satoshis": 100000,
                "height": 100,
                "confirmations": 3
            },
            {
                "address": address,
                "txid": TXID,
                "vout": 2,
                "scriptPubKey": "76a91400112233445566778899aabbccddeeff0011223388ac",
                "amount": 0.0005,
                "satoshis": 50000,
                "confirmations": 0
            }
        ]))
    }

    async fn rawtx_handler(Path(txid): Path<String>) -> Json<Value> {
        Json(json!({ "rawtx": format!("raw-{txid}") }))
    }

    async fn send_handler(Form(form): Form<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
        match form.get("rawtx") {
            Some(raw) if raw == "deadbeef" => (StatusCode::OK, Json(json!({ "txid": TXID }))),
            _ => (StatusCode::BAD_REQUEST, Json(json!("Missing parameter (expect 'rawtx')"))),
        }
    }

    async fn spawn_insight() -> SocketAddr {
        let app = Router::new()
            .route("/api/addr/:address/utxo", get(utxo_handler))
            .route("/api/rawtx/:txid", get(rawtx_handler))
            .route("/api/tx/send", post(send_handler));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = InsightClient::new("https://test-insight.bitpay.com/api").unwrap();
        assert_eq!(client.base_url().as_str(), "https://test-insight.bitpay.com/api/");
        assert_eq!(
            client.endpoint("addr/abc/utxo").unwrap().as_str(),
            "https://test-insight.bitpay.com/api/addr/abc/utxo"
        );
    }

    #[test]
    fn testnet_client_uses_insight_testnet() {
        let client = InsightClient::for_network(BtcNetwork::Testnet).unwrap();
        assert_eq!(client.base_url().host_str(), Some("test-insight.bitpay.com"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            InsightClient::new("not a url"),
            Err(ExplorerError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn fetches_utxos() {
        let addr = spawn_insight().await;
        let client = InsightClient::new(&format!("http://{addr}/api/")).unwrap();

        let utxos = client.utxos("mt7r5FKWoKXPtAdkuCYm3AyoQk4vyxUdYA").await.unwrap();
        assert_eq!(utxos.len(), 2);
        assert_eq!(utxos[0].txid, TXID);
        assert_eq!(utxos[0].amount_sat, 100_000);
        assert_eq!(utxos[1].vout, 2);
    }

    #[tokio::test]
    async fn fetches_raw_transaction() {
        let addr = spawn_insight().await;
        let client = InsightClient::new(&format!("http://{addr}/api")).unwrap();

        let raw = client.raw_transaction(TXID).await.unwrap();
        assert_eq!(raw, format!("raw-{TXID}"));
    }

    #[tokio::test]
    async fn broadcast_posts_form_encoded_rawtx() {
        let addr = spawn_insight().await;
        let client = InsightClient::new(&format!("http://{addr}/api/")).unwrap();

        let txid = client.broadcast("deadbeef").await.unwrap();
        assert_eq!(txid, TXID);
    }

    #[tokio::test]
    async fn broadcast_rejection_surfaces_status() {
        let addr = spawn_insight().await;
        let client = InsightClient::new(&format!("http://{addr}/api/")).unwrap();

        let err = client.broadcast("00").await.unwrap_err();
        match err {
            ExplorerError::Status { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("rawtx"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn unknown_route_is_a_status_error() {
        let addr = spawn_insight().await;
        let client = InsightClient::new(&format!("http://{addr}/other/")).unwrap();

        let err = client.raw_transaction(TXID).await.unwrap_err();
        assert!(matches!(err, ExplorerError::Status { status: 404, .. }));
    }
}
