use clap::{Parser, Subcommand};
use nft_minter::{
    config::Config, identity, metadata::NftMetadata, mint, update, uploader::Uploader,
    utils::clone_keypair, Error, Result,
};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, signature::Keypair, signer::Signer};
use std::{path::PathBuf, sync::Arc};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "nft-minter", about = "Mint and update Metaplex NFTs on Solana")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "nft.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload the image and metadata, then mint a new token
    Mint,
    /// Replace the metadata of an existing token
    Update,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(error) = run(Args::parse()).await {
        tracing::error!("{error}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = Config::load(&args.config)?;

    let client = Arc::new(RpcClient::new_with_commitment(
        config.cluster.url().to_owned(),
        CommitmentConfig::confirmed(),
    ));

    let payer = identity::initialize_keypair(&client, &config.keypair).await?;
    info!("public key: {}", payer.pubkey());

    match args.command {
        Commands::Mint => {
            let uri = resolve_metadata_uri(&config, &client, &payer).await?;
            let nft = mint::mint_nft(&client, &payer, &config.token, uri).await?;
            info!("metadata account: {}", nft.metadata);
            info!("transaction: {}", nft.signature);
            info!("token mint: {}", config.cluster.explorer_url(&nft.mint));
        }
        Commands::Update => {
            let target = config.update.as_ref().ok_or(Error::MissingUpdateTarget)?;
            let uri = resolve_metadata_uri(&config, &client, &payer).await?;
            let signature =
                update::update_nft(&client, &payer, target.mint, &config.token, uri).await?;
            info!("transaction: {}", signature);
            info!("token mint: {}", config.cluster.explorer_url(&target.mint));
        }
    }

    info!("finished successfully");
    Ok(())
}

async fn resolve_metadata_uri(
    config: &Config,
    client: &Arc<RpcClient>,
    payer: &Keypair,
) -> Result<String> {
    if let Some(uri) = &config.metadata_uri {
        return Ok(uri.clone());
    }

    let image = config.image.as_ref().ok_or(Error::MissingImage)?;
    let uploader = Uploader::new(client.clone(), config.cluster, clone_keypair(payer))?;

    let image_uri = uploader
        .upload_file(&image.path, &image.display_name())
        .await?;
    info!("image uri: {}", image_uri);

    let metadata = NftMetadata::new(&config.token, image_uri);
    let metadata_uri = uploader.upload_metadata(&metadata).await?;
    info!("metadata uri: {}", metadata_uri);

    Ok(metadata_uri)
}
