use std::collections::HashMap;
use std::sync::RwLock;

/// A thread-safe Trie for MQTT-style topic pattern matching.
///
/// Supports wildcards:
/// - `+` matches exactly one topic level
/// - `#` matches any number of remaining topic levels (must be last segment)
///
/// Patterns and topics use `/` as the level separator.
///
/// # Examples
///
/// ```ignore
/// let trie = Trie::new();
/// trie.insert("changes/items", 1);
/// trie.insert("changes/+", 2);
/// trie.insert("#", 3);
///
/// // "changes/items" matches exact, single-level wildcard, and root wildcard
/// let results = trie.match_topic("changes/items"); // [1, 2, 3]
/// ```
pub struct Trie<T> {
    root: RwLock<TrieNode<T>>,
}

struct TrieNode<T> {
    /// Exact-match children, keyed by segment string.
    children: HashMap<String, TrieNode<T>>,
    /// `+` wildcard child — matches exactly one level.
    single: Option<Box<TrieNode<T>>>,
    /// `#` wildcard child — matches any remaining levels.
    multi: Option<Box<TrieNode<T>>>,
    /// Values stored at this node (when pattern terminates here).
    values: Vec<T>,
}

impl<T> Default for TrieNode<T> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            single: None,
            multi: None,
            values: Vec::new(),
        }
    }
}

impl<T: Clone> Trie<T> {
    /// Create a new empty Trie.
    pub fn new() -> Self {
        Self {
            root: RwLock::new(TrieNode::default()),
        }
    }

    /// Insert a value at the given pattern.
    ///
    /// Pattern examples: `"changes/items"`, `"changes/#"`, `"+/items"`, `"#"`.
    pub fn insert(&self, pattern: &str, value: T) {
        let mut root = self.root.write().unwrap();
        root.insert(pattern, value);
    }

    /// Return all values whose patterns match the given concrete topic path.
    ///
    /// For example, topic `"changes/items"` matches patterns:
    /// - `"changes/items"` (exact)
    /// - `"changes/+"` (single-level wildcard)
    /// - `"changes/#"` (multi-level wildcard)
    /// - `"#"` (match all)
    pub fn match_topic(&self, topic: &str) -> Vec<T> {
        let root = self.root.read().unwrap();
        let mut results = Vec::new();
        root.collect_matches(topic, &mut results);
        results
    }

    /// Remove values matching the predicate from the given pattern.
    ///
    /// Returns `true` if any values were removed.
    pub fn remove<F>(&self, pattern: &str, predicate: F) -> bool
    where
        F: Fn(&T) -> bool,
    {
        let mut root = self.root.write().unwrap();
        root.remove(pattern, &predicate)
    }

    /// Check if any values exist at the given pattern (exact pattern, not matching).
    pub fn has_pattern(&self, pattern: &str) -> bool {
        let root = self.root.read().unwrap();
        root.has_pattern(pattern)
    }
}

impl<T> Default for Trie<T>
where
    T: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> TrieNode<T> {
    fn insert(&mut self, pattern: &str, value: T) {
        if pattern.is_empty() {
            self.values.push(value);
            return;
        }

        let (first, rest) = split_first(pattern);

        match first {
            "+" => {
                let child = self
                    .single
                    .get_or_insert_with(|| Box::new(TrieNode::default()));
                child.insert(rest, value);
            }
            "#" => {
                // `#` must be the last segment — store value on the multi child.
                let child = self
                    .multi
                    .get_or_insert_with(|| Box::new(TrieNode::default()));
                child.values.push(value);
            }
            segment => {
                let child = self
                    .children
                    .entry(segment.to_string())
                    .or_insert_with(TrieNode::default);
                child.insert(rest, value);
            }
        }
    }

    fn collect_matches(&self, topic: &str, results: &mut Vec<T>) {
        if topic.is_empty() {
            // Pattern terminates here — collect exact values.
            results.extend(self.values.iter().cloned());
            // `#` at this level also matches zero remaining levels.
            if let Some(ref multi) = self.multi {
                results.extend(multi.values.iter().cloned());
            }
            return;
        }

        let (first, rest) = split_first(topic);

        // Exact segment match.
        if let Some(child) = self.children.get(first) {
            child.collect_matches(rest, results);
        }

        // Single-level wildcard `+` — matches this one segment.
        if let Some(ref single) = self.single {
            single.collect_matches(rest, results);
        }

        // Multi-level wildcard `#` — matches everything from here on.
        if let Some(ref multi) = self.multi {
            results.extend(multi.values.iter().cloned());
        }
    }

    fn remove<F>(&mut self, pattern: &str, predicate: &F) -> bool
    where
        F: Fn(&T) -> bool,
    {
        if pattern.is_empty() {
            let before = self.values.len();
            self.values.retain(|v| !predicate(v));
            return self.values.len() < before;
        }

        let (first, rest) = split_first(pattern);

        match first {
            "+" => {
                if let Some(ref mut child) = self.single {
                    return child.remove(rest, predicate);
                }
            }
            "#" => {
                if let Some(ref mut child) = self.multi {
                    let before = child.values.len();
                    child.values.retain(|v| !predicate(v));
                    return child.values.len() < before;
                }
            }
            segment => {
                if let Some(child) = self.children.get_mut(segment) {
                    return child.remove(rest, predicate);
                }
            }
        }

        false
    }

    fn has_pattern(&self, pattern: &str) -> bool {
        if pattern.is_empty() {
            return !self.values.is_empty();
        }

        let (first, rest) = split_first(pattern);

        match first {
            "+" => self
                .single
                .as_ref()
                .map_or(false, |child| child.has_pattern(rest)),
            "#" => self
                .multi
                .as_ref()
                .map_or(false, |child| !child.values.is_empty()),
            segment => self
                .children
                .get(segment)
                .map_or(false, |child| child.has_pattern(rest)),
        }
    }
}

/// Split a path into (first_segment, rest).
///
/// `"changes/items"` -> `("changes", "items")`
/// `"changes"` -> `("changes", "")`
/// `""` -> `("", "")`
fn split_first(path: &str) -> (&str, &str) {
    match path.find('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => (path, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match() {
        let trie = Trie::new();
        trie.insert("changes/items", 1);

        assert_eq!(trie.match_topic("changes/items"), vec![1]);
        assert!(trie.match_topic("changes/lists").is_empty());
        assert!(trie.match_topic("changes").is_empty());
    }

    #[test]
    fn single_level_wildcard() {
        let trie = Trie::new();
        trie.insert("changes/+", 1);

        assert_eq!(trie.match_topic("changes/items"), vec![1]);
        assert_eq!(trie.match_topic("changes/lists"), vec![1]);
        // `+` matches exactly one level — not zero, not two.
        assert!(trie.match_topic("changes").is_empty());
        assert!(trie.match_topic("changes/items/41").is_empty());
    }

    #[test]
    fn multi_level_wildcard() {
        let trie = Trie::new();
        trie.insert("changes/#", 1);

        assert_eq!(trie.match_topic("changes/items"), vec![1]);
        assert_eq!(trie.match_topic("changes/items/41"), vec![1]);
        // `#` also matches zero remaining levels.
        assert_eq!(trie.match_topic("changes"), vec![1]);
    }

    #[test]
    fn root_wildcard_matches_everything() {
        let trie = Trie::new();
        trie.insert("#", 1);

        assert_eq!(trie.match_topic("changes"), vec![1]);
        assert_eq!(trie.match_topic("lists/3/items/41"), vec![1]);
    }

    #[test]
    fn overlapping_patterns_all_match() {
        let trie = Trie::new();
        trie.insert("changes/items", 1);
        trie.insert("changes/+", 2);
        trie.insert("changes/#", 3);
        trie.insert("#", 4);

        let mut results = trie.match_topic("changes/items");
        results.sort();
        assert_eq!(results, vec![1, 2, 3, 4]);
    }

    #[test]
    fn remove_by_predicate() {
        let trie = Trie::new();
        trie.insert("changes/items", 1);
        trie.insert("changes/items", 2);

        assert!(trie.remove("changes/items", |v| *v == 1));
        assert_eq!(trie.match_topic("changes/items"), vec![2]);
        // Removing a value that isn't there reports false.
        assert!(!trie.remove("changes/items", |v| *v == 1));
    }

    #[test]
    fn remove_from_wildcard_pattern() {
        let trie = Trie::new();
        trie.insert("changes/#", 1);

        assert!(trie.remove("changes/#", |v| *v == 1));
        assert!(trie.match_topic("changes/items").is_empty());
    }

    #[test]
    fn has_pattern_is_exact() {
        let trie = Trie::new();
        trie.insert("changes/+", 1);

        assert!(trie.has_pattern("changes/+"));
        // has_pattern checks the literal pattern, not matches.
        assert!(!trie.has_pattern("changes/items"));
    }
}
