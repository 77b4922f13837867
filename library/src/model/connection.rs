//! Links between attributes and the table that holds them.

use std::collections::{HashMap, HashSet};

use super::ids::{AttrId, LinkId};

/// A directed edge from an output slot to an input slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub id: LinkId,
    pub source: AttrId,
    pub destination: AttrId,
}

impl Link {
    pub fn new(source: AttrId, destination: AttrId) -> Self {
        Self {
            id: LinkId::new(),
            source,
            destination,
        }
    }

    pub fn touches(&self, attrs: &HashSet<AttrId>) -> bool {
        attrs.contains(&self.source) || attrs.contains(&self.destination)
    }
}

/// Ordered links plus a destination index.
///
/// A destination has at most one incoming link. Inserting a link to a linked
/// destination removes the old link first.
#[derive(Clone, Debug, Default)]
pub struct LinkTable {
    links: Vec<Link>,
    /// destination -> (link, source)
    by_destination: HashMap<AttrId, (LinkId, AttrId)>,
}

impl LinkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `source -> destination`, returning the new link id and the link it replaced.
    pub fn insert(&mut self, source: AttrId, destination: AttrId) -> (LinkId, Option<Link>) {
        let replaced = self
            .by_destination
            .get(&destination)
            .map(|(old, _)| *old)
            .and_then(|old| self.remove(old));

        let link = Link::new(source, destination);
        let id = link.id;
        self.by_destination.insert(destination, (id, source));
        self.links.push(link);
        (id, replaced)
    }

    pub fn remove(&mut self, id: LinkId) -> Option<Link> {
        let position = self.links.iter().position(|l| l.id == id)?;
        let link = self.links.remove(position);
        self.by_destination.remove(&link.destination);
        Some(link)
    }

    pub fn get(&self, id: LinkId) -> Option<&Link> {
        self.links.iter().find(|l| l.id == id)
    }

    /// The link feeding `destination`, if any.
    pub fn incoming(&self, destination: AttrId) -> Option<&Link> {
        let (id, _) = self.by_destination.get(&destination)?;
        self.get(*id)
    }

    /// The source attribute feeding `destination`, if any.
    pub fn incoming_source(&self, destination: AttrId) -> Option<AttrId> {
        self.by_destination
            .get(&destination)
            .map(|(_, source)| *source)
    }

    /// Links whose source or destination is in `attrs`, in table order.
    pub fn touching(&self, attrs: &HashSet<AttrId>) -> Vec<LinkId> {
        self.links
            .iter()
            .filter(|l| l.touches(attrs))
            .map(|l| l.id)
            .collect()
    }

    /// Destinations fed by `source` (fan-out).
    pub fn outgoing(&self, source: AttrId) -> impl Iterator<Item = &Link> + '_ {
        self.links.iter().filter(move |l| l.source == source)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Link> + '_ {
        self.links.iter()
    }

    pub fn contains(&self, id: LinkId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut table = LinkTable::new();
        let (src, dst) = (AttrId::new(), AttrId::new());
        let (id, replaced) = table.insert(src, dst);
        assert!(replaced.is_none());
        assert_eq!(table.incoming_source(dst), Some(src));
        assert_eq!(table.incoming(dst).map(|l| l.id), Some(id));
        assert_eq!(table.incoming_source(src), None);
    }

    #[test]
    fn test_insert_replaces_existing_destination() {
        let mut table = LinkTable::new();
        let (first, second, dst) = (AttrId::new(), AttrId::new(), AttrId::new());
        let (old_id, _) = table.insert(first, dst);
        let (new_id, replaced) = table.insert(second, dst);

        assert_eq!(replaced.map(|l| l.id), Some(old_id));
        assert!(!table.contains(old_id));
        assert!(table.contains(new_id));
        assert_eq!(table.len(), 1);
        assert_eq!(table.incoming_source(dst), Some(second));
    }

    #[test]
    fn test_fan_out_is_allowed() {
        let mut table = LinkTable::new();
        let src = AttrId::new();
        table.insert(src, AttrId::new());
        table.insert(src, AttrId::new());
        assert_eq!(table.outgoing(src).count(), 2);
    }

    #[test]
    fn test_remove_clears_destination() {
        let mut table = LinkTable::new();
        let dst = AttrId::new();
        let (id, _) = table.insert(AttrId::new(), dst);
        assert!(table.remove(id).is_some());
        assert!(table.remove(id).is_none());
        assert_eq!(table.incoming_source(dst), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_touching() {
        let mut table = LinkTable::new();
        let (a, b, c) = (AttrId::new(), AttrId::new(), AttrId::new());
        let (ab, _) = table.insert(a, b);
        let (bc, _) = table.insert(b, c);
        let (ca, _) = table.insert(c, a);

        let only_b: HashSet<AttrId> = [b].into_iter().collect();
        assert_eq!(table.touching(&only_b), vec![ab, bc]);
        let only_a: HashSet<AttrId> = [a].into_iter().collect();
        assert_eq!(table.touching(&only_a), vec![ab, ca]);
    }
}
