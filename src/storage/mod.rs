pub mod sqlite;
pub mod store;
pub mod token_store;

pub use sqlite::SqliteScoreStore;
pub use store::ScoreStore;
pub use token_store::{InMemoryTokenStore, TokenStore};

#[cfg(test)]
pub use store::MockScoreStore;
