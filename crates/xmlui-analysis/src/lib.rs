//! Editor-facing analysis for XMLUI markup.
//!
//! Thin adapters between the parser and a language server: a parse cache
//! keyed by document version, completion context detection and hover text.
//! Protocol types stay with the caller; everything here works on byte
//! offsets and plain data.

pub mod cache;
pub mod completion;
pub mod hover;

pub use cache::{CachedDocument, DocumentCache};
pub use completion::{
    completion_context, completion_items, CandidateKind, CompletionCandidate, CompletionContext,
    Vocabulary,
};
pub use hover::{hover, HoverResult};
