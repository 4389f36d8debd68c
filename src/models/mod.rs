pub mod agent;
pub mod chain;
pub mod metadata;
pub mod scores;

pub use agent::*;
pub use chain::*;
pub use metadata::*;
pub use scores::*;
