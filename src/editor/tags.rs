/// A key press in a list-entry text input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Enter,
    Other,
}

/// What a key press did to the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyOutcome {
    pub added: bool,
    /// The outer form must not submit for this key press
    pub suppress_submit: bool,
}

/// Ordered list of short strings edited one entry at a time
/// (category keywords, product features).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagList {
    items: Vec<String>,
    unique: bool,
}

impl TagList {
    /// A list that accepts repeated entries
    pub fn new() -> Self {
        Self::default()
    }

    /// A list that ignores entries it already holds
    pub fn unique() -> Self {
        Self {
            items: Vec::new(),
            unique: true,
        }
    }

    /// Seed with existing entries, kept as they are.
    pub fn with_items(mut self, items: Vec<String>) -> Self {
        self.items = items;
        self
    }

    /// Append `raw` trimmed. Blank input, and duplicates on a unique list,
    /// are ignored. Returns whether the list changed.
    pub fn add(&mut self, raw: &str) -> bool {
        let entry = raw.trim();
        if entry.is_empty() {
            return false;
        }
        if self.unique && self.items.iter().any(|item| item == entry) {
            return false;
        }
        self.items.push(entry.to_string());
        true
    }

    /// Remove the entry at `index`. Out-of-range positions do nothing.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Apply a key press from the entry input holding `pending`.
    /// Enter behaves like the add button and clears `pending` on success.
    pub fn handle_key(&mut self, key: KeyInput, pending: &mut String) -> KeyOutcome {
        match key {
            KeyInput::Enter => {
                let added = self.add(pending);
                if added {
                    pending.clear();
                }
                KeyOutcome {
                    added,
                    suppress_submit: true,
                }
            }
            KeyInput::Other => KeyOutcome {
                added: false,
                suppress_submit: false,
            },
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.items.clone()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_entries_are_ignored() {
        let mut list = TagList::new();
        assert!(!list.add(""));
        assert!(!list.add("   \t"));
        assert!(list.is_empty());
    }

    #[test]
    fn entries_are_trimmed_and_ordered() {
        let mut list = TagList::new();
        list.add("  oak ");
        list.add("walnut");
        list.add("oak");
        assert_eq!(list.items(), &["oak", "walnut", "oak"]);
    }

    #[test]
    fn unique_list_skips_duplicates() {
        let mut list = TagList::unique();
        assert!(list.add("sofa"));
        assert!(!list.add(" sofa "));
        assert!(list.add("couch"));
        assert_eq!(list.items(), &["sofa", "couch"]);
    }

    #[test]
    fn remove_targets_position_not_value() {
        let mut list = TagList::new().with_items(vec![
            "teak".into(),
            "steel".into(),
            "teak".into(),
        ]);

        assert_eq!(list.remove(2), Some("teak".to_string()));
        assert_eq!(list.items(), &["teak", "steel"]);

        assert_eq!(list.remove(0), Some("teak".to_string()));
        assert_eq!(list.items(), &["steel"]);

        assert_eq!(list.remove(5), None);
        assert_eq!(list.items(), &["steel"]);
    }

    #[test]
    fn enter_adds_and_blocks_submit() {
        let mut list = TagList::unique();
        let mut pending = " rattan ".to_string();

        let outcome = list.handle_key(KeyInput::Enter, &mut pending);
        assert_eq!(
            outcome,
            KeyOutcome {
                added: true,
                suppress_submit: true
            }
        );
        assert!(pending.is_empty());

        pending.push_str("rattan");
        let repeat = list.handle_key(KeyInput::Enter, &mut pending);
        assert!(!repeat.added);
        assert!(repeat.suppress_submit);
        assert_eq!(pending, "rattan");

        let other = list.handle_key(KeyInput::Other, &mut pending);
        assert!(!other.suppress_submit);
        assert_eq!(list.items(), &["rattan"]);
    }
}
