use crate::{
    config::TokenConfig,
    metadata::format_basis_points,
    utils::{execute, submit_transaction},
    Result,
};
use mpl_token_metadata::{
    accounts::{MasterEdition, Metadata, TokenRecord},
    instructions::{CreateV1, CreateV1InstructionArgs, MintV1, MintV1InstructionArgs},
    types::{PrintSupply, TokenStandard},
};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    system_program, sysvar,
};
use tracing::info;

#[derive(Debug)]
pub struct MintedNft {
    pub mint: Pubkey,
    pub metadata: Pubkey,
    pub signature: Signature,
}

/// Create a new NFT and mint its single token to the payer. Each call
/// generates a fresh mint keypair, so re-running produces a distinct token.
pub async fn mint_nft(
    client: &RpcClient,
    payer: &Keypair,
    token: &TokenConfig,
    uri: String,
) -> Result<MintedNft> {
    let mint = Keypair::new();
    let (metadata_account, _) = Metadata::find_pda(&mint.pubkey());

    info!(
        "minting \"{}\" ({}) with royalty {}",
        token.name,
        token.symbol,
        format_basis_points(token.seller_fee_basis_points)
    );

    let instructions = build_mint_instructions(&payer.pubkey(), &mint.pubkey(), token, uri);

    let minimum_balance_for_rent_exemption = client
        .get_minimum_balance_for_rent_exemption(std::mem::size_of::<
            mpl_token_metadata::accounts::MasterEdition,
        >())
        .await?;

    let (mut tx, recent_blockhash) = execute(
        client,
        &payer.pubkey(),
        &instructions,
        minimum_balance_for_rent_exemption,
    )
    .await?;

    tx.try_sign(&[payer, &mint], recent_blockhash)?;

    let signature = submit_transaction(client, tx).await?;

    Ok(MintedNft {
        mint: mint.pubkey(),
        metadata: metadata_account,
        signature,
    })
}

pub fn build_mint_instructions(
    payer: &Pubkey,
    mint: &Pubkey,
    token: &TokenConfig,
    uri: String,
) -> Vec<Instruction> {
    let (metadata_account, _) = Metadata::find_pda(mint);
    let (master_edition_account, _) = MasterEdition::find_pda(mint);

    let create_ix = CreateV1 {
        metadata: metadata_account,
        master_edition: Some(master_edition_account),
        mint: (*mint, true),
        authority: *payer,
        payer: *payer,
        update_authority: (*payer, true),
        system_program: system_program::id(),
        sysvar_instructions: sysvar::instructions::id(),
        spl_token_program: spl_token::id(),
    }
    .instruction(CreateV1InstructionArgs {
        name: token.name.clone(),
        symbol: token.symbol.clone(),
        uri,
        seller_fee_basis_points: token.seller_fee_basis_points,
        creators: None,
        primary_sale_happened: false,
        is_mutable: true,
        token_standard: TokenStandard::NonFungible,
        collection: None,
        uses: None,
        collection_details: None,
        rule_set: None,
        decimals: None,
        print_supply: Some(PrintSupply::Zero),
    });

    // mint the single token into the payer's associated token account
    let token_account = spl_associated_token_account::get_associated_token_address(payer, mint);
    let (token_record, _) = TokenRecord::find_pda(mint, &token_account);

    let mint_ix = MintV1 {
        token: token_account,
        token_owner: Some(*payer),
        metadata: metadata_account,
        master_edition: Some(master_edition_account),
        token_record: Some(token_record),
        mint: *mint,
        authority: *payer,
        delegate_record: None,
        payer: *payer,
        system_program: system_program::id(),
        sysvar_instructions: sysvar::instructions::id(),
        spl_token_program: spl_token::id(),
        spl_ata_program: spl_associated_token_account::id(),
        authorization_rules_program: None,
        authorization_rules: None,
    }
    .instruction(MintV1InstructionArgs {
        amount: 1,
        authorization_data: None,
    });

    vec![create_ix, mint_ix]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> TokenConfig {
        TokenConfig {
            name: "Unicorn".to_owned(),
            symbol: "BLD".to_owned(),
            description: String::new(),
            seller_fee_basis_points: 500,
        }
    }

    #[test]
    fn instructions_target_token_metadata_program() {
        let payer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let instructions =
            build_mint_instructions(&payer, &mint, &token(), "https://arweave.net/abc".to_owned());

        assert_eq!(instructions.len(), 2);
        for ix in &instructions {
            assert_eq!(ix.program_id, mpl_token_metadata::ID);
        }
    }

    #[test]
    fn mint_account_signs_the_create_instruction() {
        let payer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let instructions =
            build_mint_instructions(&payer, &mint, &token(), "https://arweave.net/abc".to_owned());

        let create = &instructions[0];
        assert!(create
            .accounts
            .iter()
            .any(|meta| meta.pubkey == mint && meta.is_signer));
    }

    #[test]
    fn distinct_mints_derive_distinct_metadata_accounts() {
        let (a, _) = Metadata::find_pda(&Pubkey::new_unique());
        let (b, _) = Metadata::find_pda(&Pubkey::new_unique());
        assert_ne!(a, b);
    }
}
