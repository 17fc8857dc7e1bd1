pub mod aggregate;
pub mod ident;

pub use aggregate::{Name, Topic, TopicId};
pub use ident::{TopicIdent, TopicLookup, DIRECT_ID_TYPE};
