use log::info;
use mpl_token_metadata::accounts::{MasterEdition, Metadata, TokenRecord};
use mpl_token_metadata::instructions::{CreateV1Builder, MintV1Builder, TransferV1Builder};
use mpl_token_metadata::types::{Creator, PrintSupply, TokenStandard};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;
use solana_sdk::transaction::Transaction;
use spl_associated_token_account::get_associated_token_address;

use crate::error::{ArtError, Result};
use crate::nft_config::MintConfig;
use crate::state::AppState;

const EXPLORER_BASE: &str = "https://explorer.solana.com";
const EXPLORER_CLUSTER: &str = "devnet";

/// Terminal output of a successful pipeline run. Serialized into the 200
/// response body, never persisted.
#[derive(Serialize, Debug)]
pub struct MintedAsset {
    pub mint_address: String,
    pub metadata_uri: String,
    pub mint_signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_signature: Option<String>,
    pub explorer_url: String,
}

fn explorer_address_url(address: &Pubkey) -> String {
    format!(
        "{}/address/{}?cluster={}",
        EXPLORER_BASE, address, EXPLORER_CLUSTER
    )
}

fn to_creators(config: &MintConfig, wallet: &Pubkey) -> Vec<Creator> {
    config
        .creators
        .iter()
        .map(|creator| Creator {
            address: creator.address,
            // Only the signing wallet can be marked verified at create time.
            verified: creator.address == *wallet,
            share: creator.share,
        })
        .collect()
}

/// Stage 5: create and mint a programmable NFT referencing the metadata
/// URI, then transfer it to the recipient when one was supplied. Both
/// transactions wait for confirmation; a confirmation error is fatal for
/// the request and nothing is rolled back.
pub async fn mint_asset(
    state: &AppState,
    config: &MintConfig,
    metadata_uri: &str,
    recipient: Option<Pubkey>,
) -> Result<MintedAsset> {
    info!("Step 3 - Minting NFT");

    let payer = &state.wallet;
    let mint = Keypair::new();

    let (metadata_pda, _) = Metadata::find_pda(&mint.pubkey());
    let (edition_pda, _) = MasterEdition::find_pda(&mint.pubkey());
    let token = get_associated_token_address(&payer.pubkey(), &mint.pubkey());
    let (token_record, _) = TokenRecord::find_pda(&mint.pubkey(), &token);

    let create_ix = CreateV1Builder::new()
        .metadata(metadata_pda)
        .master_edition(Some(edition_pda))
        .mint(mint.pubkey(), true)
        .authority(payer.pubkey())
        .payer(payer.pubkey())
        .update_authority(payer.pubkey(), true)
        .is_mutable(false)
        .primary_sale_happened(false)
        .name(config.name.clone())
        .symbol(config.symbol.clone())
        .uri(metadata_uri.to_string())
        .seller_fee_basis_points(config.seller_fee_basis_points)
        .creators(to_creators(config, &payer.pubkey()))
        .token_standard(TokenStandard::ProgrammableNonFungible)
        .print_supply(PrintSupply::Zero)
        .instruction();

    let mint_ix = MintV1Builder::new()
        .token(token)
        .token_owner(Some(payer.pubkey()))
        .metadata(metadata_pda)
        .master_edition(Some(edition_pda))
        .token_record(Some(token_record))
        .mint(mint.pubkey())
        .authority(payer.pubkey())
        .payer(payer.pubkey())
        .amount(1)
        .instruction();

    let blockhash = state
        .rpc
        .get_latest_blockhash()
        .await
        .map_err(|e| ArtError::Chain(e.to_string()))?;
    let transaction = Transaction::new_signed_with_payer(
        &[create_ix, mint_ix],
        Some(&payer.pubkey()),
        &[payer, &mint],
        blockhash,
    );

    let mint_signature = state
        .rpc
        .send_and_confirm_transaction(&transaction)
        .await
        .map_err(|e| ArtError::Chain(e.to_string()))?;

    let explorer_url = explorer_address_url(&mint.pubkey());
    info!("Minted NFT: {}", explorer_url);

    let transfer_signature = match recipient {
        Some(recipient) => {
            let signature = transfer_asset(
                state,
                &mint.pubkey(),
                &token,
                &metadata_pda,
                &edition_pda,
                &token_record,
                recipient,
            )
            .await?;
            Some(signature.to_string())
        }
        None => None,
    };

    Ok(MintedAsset {
        mint_address: mint.pubkey().to_string(),
        metadata_uri: metadata_uri.to_string(),
        mint_signature: mint_signature.to_string(),
        transfer_signature,
        explorer_url,
    })
}

async fn transfer_asset(
    state: &AppState,
    mint: &Pubkey,
    token: &Pubkey,
    metadata_pda: &Pubkey,
    edition_pda: &Pubkey,
    token_record: &Pubkey,
    recipient: Pubkey,
) -> Result<Signature> {
    info!("Step 4 - Transferring NFT to {}", recipient);

    let payer = &state.wallet;
    let destination_token = get_associated_token_address(&recipient, mint);
    let (destination_token_record, _) = TokenRecord::find_pda(mint, &destination_token);

    let transfer_ix = TransferV1Builder::new()
        .token(*token)
        .token_owner(payer.pubkey())
        .destination_token(destination_token)
        .destination_owner(recipient)
        .mint(*mint)
        .metadata(*metadata_pda)
        .edition(Some(*edition_pda))
        .token_record(Some(*token_record))
        .destination_token_record(Some(destination_token_record))
        .authority(payer.pubkey())
        .payer(payer.pubkey())
        .amount(1)
        .instruction();

    let blockhash = state
        .rpc
        .get_latest_blockhash()
        .await
        .map_err(|e| ArtError::Chain(e.to_string()))?;
    let transaction = Transaction::new_signed_with_payer(
        &[transfer_ix],
        Some(&payer.pubkey()),
        &[payer],
        blockhash,
    );

    let signature = state
        .rpc
        .send_and_confirm_transaction(&transaction)
        .await
        .map_err(|e| ArtError::Chain(e.to_string()))?;

    info!("Transfer confirmed: {}", signature);

    Ok(signature)
}
