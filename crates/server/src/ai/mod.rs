//! Assistant pipeline on top of a hosted text-generation service

pub mod assistant;
pub mod client;
pub mod composer;
pub mod extract;

pub use assistant::{Assistant, StructuredReply};
pub use client::{ChatClient, Message, TextGenerator};
pub use composer::Reply;
pub use extract::ResolverStrategy;
