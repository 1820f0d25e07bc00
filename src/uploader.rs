use crate::{
    config::SolanaNet,
    metadata::NftMetadata,
    utils::{clone_keypair, execute, submit_transaction},
    Error, Result,
};
use bundlr_sdk::{error::BundlrError, tags::Tag, Bundlr, Ed25519Signer};
use serde::Deserialize;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    pubkey::Pubkey, signature::Keypair, signer::Signer, system_instruction,
};
use std::{path::Path, sync::Arc, time::Duration};
use tracing::info;

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);
// tx fee plus some offset on top of the raw payload size
const SIZE_HEADROOM: u64 = 10_000;

pub struct BundlrSigner {
    keypair: Keypair,
}

impl BundlrSigner {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }
}

impl bundlr_sdk::Signer for BundlrSigner {
    const SIG_TYPE: u16 = Ed25519Signer::SIG_TYPE;
    const SIG_LENGTH: u16 = Ed25519Signer::SIG_LENGTH;
    const PUB_LENGTH: u16 = Ed25519Signer::PUB_LENGTH;

    fn sign(&self, msg: bytes::Bytes) -> std::result::Result<bytes::Bytes, BundlrError> {
        let sig = self.keypair.sign_message(&msg);
        Ok(<[u8; 64]>::from(sig).to_vec().into())
    }

    fn pub_key(&self) -> bytes::Bytes {
        self.keypair.pubkey().to_bytes().to_vec().into()
    }
}

/// Uploads raw bytes to Arweave through a Bundlr node, paying with the
/// fee payer's SOL. One remote durable write per call, no local retries.
///
/// The 60-second timeout applies to the node's REST endpoints (price,
/// balance, funding). The `Bundlr` client used for the upload itself
/// builds its own HTTP client and exposes no timeout knob.
pub struct Uploader {
    client: Arc<RpcClient>,
    http: reqwest::Client,
    fee_payer: Keypair,
    node_url: String,
}

impl Uploader {
    pub fn new(client: Arc<RpcClient>, cluster: SolanaNet, fee_payer: Keypair) -> Result<Self> {
        let node_url = cluster.bundlr_url()?.to_owned();
        let http = reqwest::Client::builder().timeout(UPLOAD_TIMEOUT).build()?;

        Ok(Self {
            client,
            http,
            fee_payer,
            node_url,
        })
    }

    /// Upload a local file. The file is read before any network call is
    /// made, so a missing file fails without touching the node.
    pub async fn upload_file(&self, path: &Path, name: &str) -> Result<String> {
        let data = tokio::fs::read(path).await?;
        let content_type = mime_guess::from_path(name)
            .first()
            .ok_or(Error::MimeTypeNotFound)?
            .to_string();

        self.lazy_fund(data.len() as u64).await?;
        self.upload(data.into(), content_type).await
    }

    pub async fn upload_metadata(&self, metadata: &NftMetadata) -> Result<String> {
        let data = serde_json::to_vec(metadata)?;

        self.lazy_fund(data.len() as u64).await?;
        self.upload(data.into(), "application/json".to_owned()).await
    }

    async fn lazy_fund(&self, size: u64) -> Result<()> {
        let needed_balance = self.get_price(size + SIZE_HEADROOM).await?;
        let needed_balance = needed_balance + needed_balance / 10;

        let current_balance = self.get_node_balance().await?;

        if current_balance < needed_balance {
            self.fund(needed_balance - current_balance).await?;
        }

        Ok(())
    }

    async fn get_price(&self, size: u64) -> Result<u64> {
        let resp = self
            .http
            .get(format!("{}/price/solana/{}", &self.node_url, size))
            .send()
            .await?;
        let text = resp.text().await?;
        text.parse::<u64>()
            .map_err(|_| Error::BundlrApiInvalidResponse(text))
    }

    async fn get_node_balance(&self) -> Result<u64> {
        #[serde_with::serde_as]
        #[derive(Deserialize)]
        struct Resp {
            #[serde_as(as = "serde_with::DisplayFromStr")]
            balance: u64,
        }

        let resp = self
            .http
            .get(format!(
                "{}/account/balance/solana/?address={}",
                &self.node_url,
                self.fee_payer.pubkey()
            ))
            .send()
            .await?;

        if resp.status().is_success() {
            let resp = resp.json::<Resp>().await?;
            Ok(resp.balance)
        } else {
            let text = resp.text().await?;
            Err(Error::BundlrApiInvalidResponse(text))
        }
    }

    async fn fund(&self, amount: u64) -> Result<()> {
        #[derive(Deserialize)]
        struct Addresses {
            solana: String,
        }

        #[derive(Deserialize)]
        struct Info {
            addresses: Addresses,
        }

        let info: Info = self
            .http
            .get(format!("{}/info", &self.node_url))
            .send()
            .await?
            .json()
            .await?;

        let recipient = info
            .addresses
            .solana
            .parse::<Pubkey>()
            .map_err(Error::custom)?;

        info!("funding bundlr node with {} lamports", amount);

        let instruction =
            system_instruction::transfer(&self.fee_payer.pubkey(), &recipient, amount);
        let (mut tx, recent_blockhash) =
            execute(&self.client, &self.fee_payer.pubkey(), &[instruction], 0).await?;

        tx.try_sign(&[&self.fee_payer], recent_blockhash)?;

        let signature = submit_transaction(&self.client, tx).await?;

        let resp = self
            .http
            .post(format!("{}/account/balance/solana", &self.node_url))
            .json(&serde_json::json!({
                "tx_id": signature.to_string(),
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Error::BundlrTxRegisterFailed(signature.to_string()));
        }

        Ok(())
    }

    async fn upload(&self, data: bytes::Bytes, content_type: String) -> Result<String> {
        let bundlr = Bundlr::new(
            self.node_url.clone(),
            "solana".to_string(),
            "sol".to_string(),
            BundlrSigner::new(clone_keypair(&self.fee_payer)),
        );

        let (bundlr, tx) = tokio::task::spawn_blocking(move || {
            let tx = bundlr.create_transaction_with_tags(
                data.to_vec(),
                vec![Tag::new("Content-Type".into(), content_type)],
            );
            (bundlr, tx)
        })
        .await
        .map_err(|_| {
            Error::custom(anyhow::anyhow!(
                "failed to create and sign bundlr transaction"
            ))
        })?;

        let resp: BundlrResponse = serde_json::from_value(bundlr.send_transaction(tx).await?)?;

        Ok(format!("https://arweave.net/{}", resp.id))
    }
}

#[derive(Deserialize)]
struct BundlrResponse {
    id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uploader(cluster: SolanaNet) -> Result<Uploader> {
        let client = Arc::new(RpcClient::new("http://127.0.0.1:0".to_owned()));
        Uploader::new(client, cluster, Keypair::new())
    }

    #[tokio::test]
    async fn missing_file_fails_before_any_network_call() {
        let uploader = uploader(SolanaNet::Devnet).unwrap();
        let err = uploader
            .upload_file(Path::new("no/such/file.png"), "file.png")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound));
    }

    #[test]
    fn testnet_uploader_is_rejected() {
        assert!(matches!(
            uploader(SolanaNet::Testnet),
            Err(Error::BundlrNotAvailableOnTestnet)
        ));
    }

    #[test]
    fn unknown_extension_has_no_mime_type() {
        assert!(mime_guess::from_path("file.unknown-ext").first().is_none());
    }
}
