pub mod identity;
pub mod reputation;
pub mod transport;
pub mod validation;

pub use identity::IdentityRegistry;
pub use reputation::ReputationRegistry;
pub use transport::{ChainTransport, EthersTransport, TransportError};
pub use validation::ValidationRegistry;
