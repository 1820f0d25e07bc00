use crate::{Error, Result};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    native_token::LAMPORTS_PER_SOL,
    signature::{read_keypair_file, write_keypair_file, Keypair},
    signer::Signer,
};
use std::{path::Path, time::Duration};
use tracing::info;

const MINIMUM_BALANCE: u64 = LAMPORTS_PER_SOL;
const AIRDROP_AMOUNT: u64 = 2 * LAMPORTS_PER_SOL;
const CONFIRM_POLLS: usize = 60;
const CONFIRM_INTERVAL: Duration = Duration::from_millis(500);

/// Load the signing keypair, generating and persisting one on first run,
/// and make sure the account can pay network fees.
pub async fn initialize_keypair(client: &RpcClient, path: &Path) -> Result<Keypair> {
    let keypair = load_or_create_keypair(path)?;
    ensure_balance(client, &keypair).await?;
    Ok(keypair)
}

pub fn load_or_create_keypair(path: &Path) -> Result<Keypair> {
    if path.exists() {
        read_keypair_file(path).map_err(|e| Error::KeypairFile(e.to_string()))
    } else {
        let keypair = Keypair::new();
        write_keypair_file(&keypair, path).map_err(|e| Error::KeypairFile(e.to_string()))?;
        info!("generated new keypair {}", keypair.pubkey());
        Ok(keypair)
    }
}

async fn ensure_balance(client: &RpcClient, keypair: &Keypair) -> Result<()> {
    let balance = client.get_balance(&keypair.pubkey()).await?;
    if balance >= MINIMUM_BALANCE {
        return Ok(());
    }

    info!(
        "balance {} below {} lamports, requesting airdrop",
        balance, MINIMUM_BALANCE
    );
    let signature = client
        .request_airdrop(&keypair.pubkey(), AIRDROP_AMOUNT)
        .await?;

    for _ in 0..CONFIRM_POLLS {
        if client.confirm_transaction(&signature).await? {
            return Ok(());
        }
        tokio::time::sleep(CONFIRM_INTERVAL).await;
    }
    Err(Error::AirdropTimeout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet.json");
        let created = load_or_create_keypair(&path).unwrap();
        let loaded = load_or_create_keypair(&path).unwrap();
        assert_eq!(created.pubkey(), loaded.pubkey());
        assert_eq!(created.to_bytes(), loaded.to_bytes());
    }

    #[test]
    fn unwritable_path_fails() {
        let err = load_or_create_keypair(Path::new("/no/such/dir/wallet.json")).unwrap_err();
        assert!(matches!(err, Error::KeypairFile(_)));
    }
}
