//! Built-in catalog of connectable data-source platforms.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Broad grouping of a platform. Only `Ads` platforms expose multiple
/// selectable sub-accounts after authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PlatformCategory {
    Storefront,
    Ads,
    Email,
    Sms,
}

impl PlatformCategory {
    /// Whether connections of this category carry a "select ad accounts"
    /// step between authorization and sync configuration.
    pub fn has_account_selection(self) -> bool {
        matches!(self, Self::Ads)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AuthType {
    Oauth2,
    ApiKey,
}

/// A connectable data-source definition. Immutable; selected once at
/// wizard initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub id: String,
    pub display_name: String,
    pub auth_type: AuthType,
    pub category: PlatformCategory,
}

impl Platform {
    pub fn new(
        id: &str,
        display_name: &str,
        auth_type: AuthType,
        category: PlatformCategory,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            auth_type,
            category,
        }
    }

    pub fn has_account_selection(&self) -> bool {
        self.category.has_account_selection()
    }
}

/// The platforms the backend knows how to ingest.
pub fn catalog() -> Vec<Platform> {
    use AuthType::Oauth2;
    use PlatformCategory::{Ads, Email, Sms, Storefront};

    vec![
        Platform::new("shopify", "Shopify", Oauth2, Storefront),
        Platform::new("google_ads", "Google Ads", Oauth2, Ads),
        Platform::new("meta_ads", "Meta Ads", Oauth2, Ads),
        Platform::new("tiktok_ads", "TikTok Ads", Oauth2, Ads),
        Platform::new("klaviyo", "Klaviyo", Oauth2, Email),
        Platform::new("postscript", "Postscript", Oauth2, Sms),
    ]
}

/// Look up a platform definition by identifier.
pub fn find(id: &str) -> Option<Platform> {
    let normalized = id.trim().to_ascii_lowercase();
    catalog().into_iter().find(|p| p.id == normalized)
}
