pub mod decode;
pub mod error;
pub mod reputation;
pub mod source;

pub use decode::decode;
pub use error::{DecodeError, FetchError, ReputationError, SpotError};
pub use reputation::{Credentials, ReputationClient, ReputationReport};
pub use source::{ArchiveSource, resource_id};
