//! Content-generation pipeline
//!
//! Each step formats a prompt, calls the text generator and turns the raw
//! answer into a typed result. [`BlogWriter`] chains them into a full post.

pub mod parse;
pub mod prompts;
pub mod types;
pub mod writer;

#[cfg(test)]
pub(crate) mod testing;

pub use types::{BlogContent, BlogContentItem, BlogPost, GenerationRequest, Heading, MetaTag};
pub use writer::BlogWriter;
