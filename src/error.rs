use std::path::PathBuf;
use std::result::Result as StdResult;
use thiserror::Error as ThisError;

pub type Result<T> = StdResult<T, Error>;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Any(#[from] anyhow::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    SolanaClient(#[from] solana_client::client_error::ClientError),
    #[error(transparent)]
    Signer(#[from] solana_sdk::signer::SignerError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Bundlr(#[from] bundlr_sdk::error::BundlrError),
    #[error("failed to read config {}: {error}", path.display())]
    ConfigRead {
        path: PathBuf,
        error: std::io::Error,
    },
    #[error(transparent)]
    ConfigParse(#[from] toml::de::Error),
    #[error("bundlr isn't available on solana testnet")]
    BundlrNotAvailableOnTestnet,
    #[error("bundlr api returned an invalid response: {0}")]
    BundlrApiInvalidResponse(String),
    #[error("failed to register funding tx to bundlr. tx_id={0};")]
    BundlrTxRegisterFailed(String),
    #[error("mime type not found")]
    MimeTypeNotFound,
    #[error("failed to read or write keypair file: {0}")]
    KeypairFile(String),
    #[error("insufficient solana balance, needed={needed}; have={balance};")]
    InsufficientSolanaBalance { needed: u64, balance: u64 },
    #[error("no token metadata found for mint {0}")]
    TokenNotFound(solana_sdk::pubkey::Pubkey),
    #[error("time-out waiting for airdrop confirmation")]
    AirdropTimeout,
    #[error("update mode requires an [update] section with a mint address")]
    MissingUpdateTarget,
    #[error("either an [image] section or metadata_uri is required")]
    MissingImage,
}

impl Error {
    pub fn custom<E: Into<anyhow::Error>>(e: E) -> Self {
        Error::Any(e.into())
    }
}
