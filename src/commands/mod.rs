//! CLI command implementations.

pub mod lookup;
pub mod search;
pub mod sign;

pub use lookup::LookupCommand;
pub use search::SearchCommand;
pub use sign::SignCommand;
