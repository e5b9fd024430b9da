pub mod client;
pub mod resilience;
pub mod social;
pub mod vault;
pub mod wallet;

pub use client::{SocialSource, VaultSource, WalletSource};
pub use resilience::{retry_with_backoff, RetryConfig};
pub use social::SocialApiClient;
pub use vault::VaultApiClient;
pub use wallet::WalletApiClient;

#[cfg(test)]
pub use client::{MockSocialSource, MockVaultSource, MockWalletSource};
