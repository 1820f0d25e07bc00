use crate::config::TokenConfig;
use serde::{Deserialize, Serialize};

/// Off-chain metadata document, uploaded to Arweave and referenced
/// on-chain by URI.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NftMetadata {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub seller_fee_basis_points: u16,
    pub image: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<NftMetadataAttribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<NftMetadataProperties>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NftMetadataAttribute {
    pub trait_type: String,
    pub value: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NftMetadataProperties {
    pub files: Option<Vec<NftMetadataFile>>,
    pub category: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NftMetadataFile {
    pub uri: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl NftMetadata {
    pub fn new(token: &TokenConfig, image_uri: String) -> Self {
        Self {
            name: token.name.clone(),
            symbol: token.symbol.clone(),
            description: token.description.clone(),
            seller_fee_basis_points: token.seller_fee_basis_points,
            image: image_uri,
            attributes: Vec::new(),
            properties: None,
        }
    }
}

/// Render royalty basis points as a percentage, e.g. 500 -> "5.00%".
pub fn format_basis_points(bps: u16) -> String {
    format!("{}.{:02}%", bps / 100, bps % 100)
}
