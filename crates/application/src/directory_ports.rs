mod credentials;
mod directory;

pub use credentials::{AccessToken, AccessTokenProvider};
pub use directory::{DirectoryClientFactory, DirectoryService};
