//! Persistent completion trie.
//!
//! Nodes are shared between snapshots through [`Arc`]. Inserting or removing
//! an entry copies only the nodes on the path to the key, and removal prunes
//! nodes that no longer lead to any entry.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// A suggestion stored at the end of a key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuggestEntry {
    /// Document the input belongs to.
    pub doc_id: String,
    /// Original input text, as written.
    pub text: String,
    /// Ranking weight.
    pub weight: u32,
    /// Sequence number of the write that produced the entry.
    pub seq: u64,
}

impl SuggestEntry {
    /// Ranking order: weight descending, then insertion order, then text.
    pub fn rank(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| self.seq.cmp(&other.seq))
            .then_with(|| self.text.cmp(&other.text))
            .then_with(|| self.doc_id.cmp(&other.doc_id))
    }
}

#[derive(Clone, Debug, Default)]
struct TrieNode {
    entries: Vec<SuggestEntry>,
    children: BTreeMap<char, Arc<TrieNode>>,
}

impl TrieNode {
    fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.children.is_empty()
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a SuggestEntry>) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.extend(node.entries.iter());
            stack.extend(node.children.values().map(|child| child.as_ref()));
        }
    }
}

/// A prefix tree of completion entries.
///
/// # Examples
///
/// ```
/// use pilum::suggest::trie::{CompletionTrie, SuggestEntry};
///
/// let mut trie = CompletionTrie::new();
/// trie.insert("advil", SuggestEntry {
///     doc_id: "1".to_string(),
///     text: "Advil".to_string(),
///     weight: 0,
///     seq: 0,
/// });
///
/// let hits = trie.prefix_search("ad", 5);
/// assert_eq!(hits[0].text, "Advil");
/// assert!(trie.prefix_search("mo", 5).is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CompletionTrie {
    root: Arc<TrieNode>,
    len: usize,
}

impl CompletionTrie {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in the trie.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the trie holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert an entry at `key`.
    pub fn insert(&mut self, key: &str, entry: SuggestEntry) {
        let mut node = &mut self.root;
        for c in key.chars() {
            node = Arc::make_mut(node).children.entry(c).or_default();
        }
        Arc::make_mut(node).entries.push(entry);
        self.len += 1;
    }

    /// Remove every entry of `doc_id` stored at `key`.
    ///
    /// Returns the number of removed entries. Nodes are only copied when the
    /// key actually holds an entry of the document.
    pub fn remove(&mut self, key: &str, doc_id: &str) -> usize {
        let present = self
            .find(key)
            .is_some_and(|node| node.entries.iter().any(|e| e.doc_id == doc_id));
        if !present {
            return 0;
        }

        let path: Vec<char> = key.chars().collect();
        let removed = remove_at(&mut self.root, &path, doc_id);
        self.len -= removed;
        removed
    }

    /// Find the best entries whose key starts with `prefix`.
    ///
    /// Entries are ranked by [`SuggestEntry::rank`] and deduplicated by text,
    /// keeping the best-ranked entry for each text.
    pub fn prefix_search(&self, prefix: &str, limit: usize) -> Vec<&SuggestEntry> {
        let Some(node) = self.find(prefix) else {
            return Vec::new();
        };

        let mut entries = Vec::new();
        node.collect(&mut entries);
        entries.sort_by(|a, b| a.rank(b));

        let mut seen = HashSet::new();
        entries
            .into_iter()
            .filter(|entry| seen.insert(entry.text.as_str()))
            .take(limit)
            .collect()
    }

    fn find(&self, key: &str) -> Option<&TrieNode> {
        let mut node = self.root.as_ref();
        for c in key.chars() {
            node = node.children.get(&c)?;
        }
        Some(node)
    }
}

fn remove_at(node: &mut Arc<TrieNode>, path: &[char], doc_id: &str) -> usize {
    let node = Arc::make_mut(node);
    match path.split_first() {
        None => {
            let before = node.entries.len();
            node.entries.retain(|entry| entry.doc_id != doc_id);
            before - node.entries.len()
        }
        Some((c, rest)) => {
            let Some(child) = node.children.get_mut(c) else {
                return 0;
            };
            let removed = remove_at(child, rest, doc_id);
            if child.is_empty() {
                node.children.remove(c);
            }
            removed
        }
    }
}
