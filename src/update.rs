use crate::{
    config::TokenConfig,
    utils::{execute, submit_transaction},
    Error, Result,
};
use mpl_token_metadata::{
    accounts::Metadata,
    instructions::{UpdateV1, UpdateV1InstructionArgs},
    types::{
        CollectionDetailsToggle, CollectionToggle, Creator, Data, RuleSetToggle, UsesToggle,
    },
};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    system_program, sysvar,
};
use tracing::info;

/// Replace the descriptive fields and metadata URI of an existing token.
/// The mint address itself is never touched; existing creators are kept.
pub async fn update_nft(
    client: &RpcClient,
    payer: &Keypair,
    mint: Pubkey,
    token: &TokenConfig,
    uri: String,
) -> Result<Signature> {
    let (metadata_account, _) = Metadata::find_pda(&mint);

    let response = client
        .get_account_with_commitment(&metadata_account, CommitmentConfig::confirmed())
        .await?;

    let account = match response.value {
        Some(account) => account,
        None => return Err(Error::TokenNotFound(mint)),
    };

    let metadata = Metadata::safe_deserialize(&account.data)?;
    info!(
        "updating {} (current name {:?})",
        mint,
        metadata.name.trim_end_matches('\0')
    );

    let instruction =
        build_update_instruction(&payer.pubkey(), &mint, token, uri, metadata.creators);

    let (mut tx, recent_blockhash) =
        execute(client, &payer.pubkey(), &[instruction], 0).await?;

    tx.try_sign(&[payer], recent_blockhash)?;

    submit_transaction(client, tx).await
}

pub fn build_update_instruction(
    authority: &Pubkey,
    mint: &Pubkey,
    token: &TokenConfig,
    uri: String,
    creators: Option<Vec<Creator>>,
) -> Instruction {
    let (metadata_account, _) = Metadata::find_pda(mint);

    UpdateV1 {
        authority: *authority,
        delegate_record: None,
        token: None,
        mint: *mint,
        metadata: metadata_account,
        edition: None,
        payer: *authority,
        system_program: system_program::id(),
        sysvar_instructions: sysvar::instructions::id(),
        authorization_rules_program: None,
        authorization_rules: None,
    }
    .instruction(UpdateV1InstructionArgs {
        new_update_authority: None,
        data: Some(Data {
            name: token.name.clone(),
            symbol: token.symbol.clone(),
            uri,
            seller_fee_basis_points: token.seller_fee_basis_points,
            creators,
        }),
        primary_sale_happened: None,
        is_mutable: None,
        collection: CollectionToggle::None,
        collection_details: CollectionDetailsToggle::None,
        uses: UsesToggle::None,
        rule_set: RuleSetToggle::None,
        authorization_data: None,
    })
}
