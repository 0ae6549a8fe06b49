use crate::ast::{Element, NodeId};
use crc32fast::Hasher;
use std::collections::HashSet;

/// Generate a session seed from a session name using CRC32
pub fn get_session_seed(name: &str) -> String {
    let mut buff = String::from(name);
    if !name.starts_with("session://") {
        buff = format!("session://{}", buff);
    }

    let mut hasher = Hasher::new();
    hasher.update(buff.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for tree nodes within an editor session
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String, // Session seed (CRC32)
    count: u32,   // Sequential counter
}

impl IdGenerator {
    pub fn new(session_name: &str) -> Self {
        Self {
            seed: get_session_seed(session_name),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> NodeId {
        self.count += 1;
        NodeId::new(format!("{}-{}", self.seed, self.count))
    }

    /// Get session seed
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Advance the counter past an identifier minted under the same seed
    ///
    /// Used when adopting restored markup so freshly minted IDs can never
    /// collide with ones already present in the tree.
    pub fn observe(&mut self, id: &NodeId) {
        let Some(rest) = id.as_str().strip_prefix(self.seed.as_str()) else {
            return;
        };
        if let Some(count) = rest.strip_prefix('-').and_then(|n| n.parse::<u32>().ok()) {
            self.count = self.count.max(count);
        }
    }

    /// Attach an identifier if the element lacks one. Returns true if assigned.
    pub fn assign_id(&mut self, el: &mut Element) -> bool {
        if el.id.is_some() {
            return false;
        }
        el.id = Some(self.new_id());
        true
    }

    /// Assign identifiers to every descendant that lacks one
    pub fn assign_ids_deep(&mut self, el: &mut Element) -> usize {
        let mut assigned = 0;
        el.for_each_element_mut(&mut |node| {
            if self.assign_id(node) {
                assigned += 1;
            }
        });
        assigned
    }

    /// Replace every identifier in the subtree with a fresh one
    ///
    /// Returns `(old, new)` pairs for nodes that previously had an ID.
    pub fn reassign_ids_deep(&mut self, el: &mut Element) -> Vec<(NodeId, NodeId)> {
        let mut remapped = Vec::new();
        el.for_each_element_mut(&mut |node| {
            let fresh = self.new_id();
            if let Some(old) = node.id.replace(fresh.clone()) {
                remapped.push((old, fresh));
            }
        });
        remapped
    }

    /// Adopt a restored subtree: observe existing IDs, replace duplicates,
    /// fill gaps. Afterwards every element has a unique ID.
    pub fn adopt(&mut self, el: &mut Element) {
        el.for_each_element(&mut |node| {
            if let Some(id) = &node.id {
                self.observe(id);
            }
        });

        let mut seen = HashSet::new();
        el.for_each_element_mut(&mut |node| {
            let unique = match &node.id {
                Some(id) => seen.insert(id.clone()),
                None => false,
            };
            if !unique {
                let fresh = self.new_id();
                seen.insert(fresh.clone());
                node.id = Some(fresh);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_seed_generation() {
        let id1 = get_session_seed("builder");
        let id2 = get_session_seed("builder");

        // Same name always generates same seed
        assert_eq!(id1, id2);

        // Different names generate different seeds
        let id3 = get_session_seed("other");
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = IdGenerator::new("test");

        let id1 = gen.new_id();
        let id2 = gen.new_id();

        assert!(id1.as_str().ends_with("-1"));
        assert!(id2.as_str().ends_with("-2"));
        assert!(id1.as_str().starts_with(gen.seed()));
    }

    #[test]
    fn test_assign_ids_deep_fills_only_missing() {
        let mut gen = IdGenerator::from_seed("s".to_string());
        let mut el = Element::new("ul")
            .with_id(NodeId::new("keep"))
            .with_child(Element::new("li"))
            .with_child(Element::new("li"));

        assert_eq!(gen.assign_ids_deep(&mut el), 2);
        assert_eq!(el.id, Some(NodeId::new("keep")));
        assert_eq!(el.ids().len(), 3);
    }

    #[test]
    fn test_reassign_produces_fresh_ids() {
        let mut gen = IdGenerator::from_seed("s".to_string());
        let mut el = Element::new("div").with_child(Element::new("p"));
        gen.assign_ids_deep(&mut el);
        let before = el.ids();

        let remapped = gen.reassign_ids_deep(&mut el);
        let after = el.ids();

        assert_eq!(remapped.len(), 2);
        assert!(before.iter().all(|id| !after.contains(id)));
    }

    #[test]
    fn test_adopt_observes_and_dedupes() {
        let mut gen = IdGenerator::from_seed("s".to_string());
        let mut el = Element::new("main")
            .with_id(NodeId::new("s-7"))
            .with_child(Element::new("p").with_id(NodeId::new("s-7")))
            .with_child(Element::new("p"));

        gen.adopt(&mut el);

        let ids = el.ids();
        assert_eq!(ids[0], NodeId::new("s-7"));
        assert_eq!(ids[1], NodeId::new("s-8"));
        assert_eq!(ids[2], NodeId::new("s-9"));
        assert_eq!(gen.new_id(), NodeId::new("s-10"));
    }
}
