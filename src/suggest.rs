//! Prefix-based completion suggestions.
//!
//! Completion inputs are analyzed into keys and stored in a persistent
//! [`CompletionTrie`](trie::CompletionTrie). A
//! [`CompletionSuggest`](completion::CompletionSuggest) walks the trie along
//! the analyzed prefix and ranks every entry below it.

pub mod completion;
pub mod trie;
