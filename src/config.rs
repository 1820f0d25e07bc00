use crate::{Error, Result};
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum SolanaNet {
    #[serde(rename = "devnet")]
    Devnet,
    #[serde(rename = "testnet")]
    Testnet,
    #[serde(rename = "mainnet-beta")]
    Mainnet,
}

impl Default for SolanaNet {
    fn default() -> Self {
        SolanaNet::Devnet
    }
}

impl SolanaNet {
    pub fn url(&self) -> &'static str {
        match self {
            SolanaNet::Devnet => "https://api.devnet.solana.com",
            SolanaNet::Testnet => "https://api.testnet.solana.com",
            SolanaNet::Mainnet => "https://api.mainnet-beta.solana.com",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SolanaNet::Devnet => "devnet",
            SolanaNet::Testnet => "testnet",
            SolanaNet::Mainnet => "mainnet-beta",
        }
    }

    pub fn bundlr_url(&self) -> Result<&'static str> {
        match self {
            SolanaNet::Mainnet => Ok("https://node1.bundlr.network"),
            SolanaNet::Devnet => Ok("https://devnet.bundlr.network"),
            SolanaNet::Testnet => Err(Error::BundlrNotAvailableOnTestnet),
        }
    }

    pub fn explorer_url(&self, address: &Pubkey) -> String {
        match self {
            SolanaNet::Mainnet => format!("https://explorer.solana.com/address/{}", address),
            net => format!(
                "https://explorer.solana.com/address/{}?cluster={}",
                address,
                net.as_str()
            ),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default)]
    pub cluster: SolanaNet,
    #[serde(default = "Config::default_keypair")]
    pub keypair: PathBuf,
    /// Reuse an already uploaded metadata document instead of uploading.
    #[serde(default)]
    pub metadata_uri: Option<String>,
    pub token: TokenConfig,
    #[serde(default)]
    pub image: Option<ImageConfig>,
    #[serde(default)]
    pub update: Option<UpdateConfig>,
}

impl Config {
    pub fn default_keypair() -> PathBuf {
        PathBuf::from("wallet.json")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|error| Error::ConfigRead {
            path: path.to_owned(),
            error,
        })?;
        Ok(toml::from_str(&text)?)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub description: String,
    pub seller_fee_basis_points: u16,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ImageConfig {
    pub path: PathBuf,
    /// Display name; defaults to the file name of `path`.
    #[serde(default)]
    pub name: Option<String>,
}

impl ImageConfig {
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self
                .path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }
}

#[serde_with::serde_as]
#[derive(Deserialize, Debug, Clone)]
pub struct UpdateConfig {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub mint: Pubkey,
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"
cluster = "devnet"
keypair = "wallet.json"
metadata_uri = "https://arweave.net/02cbkIszPXeA6MXFoz0P9BsSmlMoH3PhMIo-V-AUwjY"

[token]
name = "Unicorn"
symbol = "BLD"
description = "A beautiful unicorn emoji!"
seller_fee_basis_points = 500

[image]
path = "assets/unicorn.png"
name = "unicorn.png"

[update]
mint = "6AeGM7H6c1Li3XkhJdm6RyQQJ1u7EszfLYt8Rz2EXHGE"
"#;

    #[test]
    fn parse_full_config() {
        let config: Config = toml::from_str(EXAMPLE).unwrap();
        assert_eq!(config.cluster, SolanaNet::Devnet);
        assert_eq!(config.token.name, "Unicorn");
        assert_eq!(config.token.symbol, "BLD");
        assert_eq!(config.token.seller_fee_basis_points, 500);
        assert_eq!(
            config.update.unwrap().mint.to_string(),
            "6AeGM7H6c1Li3XkhJdm6RyQQJ1u7EszfLYt8Rz2EXHGE"
        );
        assert_eq!(config.image.unwrap().display_name(), "unicorn.png");
    }

    #[test]
    fn parse_minimal_config() {
        let config: Config = toml::from_str(
            r#"
[token]
name = "Unicorn"
symbol = "BLD"
seller_fee_basis_points = 500
"#,
        )
        .unwrap();
        assert_eq!(config.cluster, SolanaNet::Devnet);
        assert_eq!(config.keypair, PathBuf::from("wallet.json"));
        assert!(config.metadata_uri.is_none());
        assert!(config.update.is_none());
        assert_eq!(config.token.description, "");
    }

    #[test]
    fn invalid_mint_address_is_rejected() {
        let result = toml::from_str::<Config>(
            r#"
[token]
name = "Unicorn"
symbol = "BLD"
seller_fee_basis_points = 500

[update]
mint = "not a pubkey"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn display_name_falls_back_to_file_name() {
        let image = ImageConfig {
            path: PathBuf::from("assets/unicorn.png"),
            name: None,
        };
        assert_eq!(image.display_name(), "unicorn.png");
    }

    #[test]
    fn explorer_url_includes_cluster() {
        let address = Pubkey::new_unique();
        assert!(SolanaNet::Devnet
            .explorer_url(&address)
            .ends_with("?cluster=devnet"));
        assert!(!SolanaNet::Mainnet.explorer_url(&address).contains('?'));
    }

    #[test]
    fn testnet_has_no_bundlr_node() {
        assert!(matches!(
            SolanaNet::Testnet.bundlr_url(),
            Err(Error::BundlrNotAvailableOnTestnet)
        ));
    }
}
