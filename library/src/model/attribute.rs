//! Attribute slots and the attribute → owner index.

use std::collections::HashMap;

use super::ids::{AttrId, NodeId};

/// Direction of a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinDirection {
    Input,
    Output,
}

/// An input or output slot on a node.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    pub id: AttrId,
    pub owner: NodeId,
    pub direction: PinDirection,
    /// Pin name within the owner (e.g. "a", "in", "out").
    pub name: &'static str,
    /// Local value read when the slot is an unconnected input.
    pub default: f64,
}

impl Attribute {
    pub fn input(id: AttrId, owner: NodeId, name: &'static str, default: f64) -> Self {
        Self {
            id,
            owner,
            direction: PinDirection::Input,
            name,
            default,
        }
    }

    pub fn output(id: AttrId, owner: NodeId) -> Self {
        Self {
            id,
            owner,
            direction: PinDirection::Output,
            name: "out",
            default: 0.0,
        }
    }

    pub fn is_input(&self) -> bool {
        self.direction == PinDirection::Input
    }
}

/// Maps every live attribute to its slot record.
#[derive(Clone, Debug, Default)]
pub struct AttributeIndex {
    slots: HashMap<AttrId, Attribute>,
}

impl AttributeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, attribute: Attribute) {
        self.slots.insert(attribute.id, attribute);
    }

    pub fn remove(&mut self, id: AttrId) -> Option<Attribute> {
        self.slots.remove(&id)
    }

    pub fn get(&self, id: AttrId) -> Option<&Attribute> {
        self.slots.get(&id)
    }

    pub fn get_mut(&mut self, id: AttrId) -> Option<&mut Attribute> {
        self.slots.get_mut(&id)
    }

    pub fn owner_of(&self, id: AttrId) -> Option<NodeId> {
        self.slots.get(&id).map(|slot| slot.owner)
    }

    pub fn contains(&self, id: AttrId) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_lookup() {
        let mut index = AttributeIndex::new();
        let owner = NodeId::new();
        let input = AttrId::new();
        let output = AttrId::new();
        index.insert(Attribute::input(input, owner, "in", 1.5));
        index.insert(Attribute::output(output, owner));

        assert_eq!(index.owner_of(input), Some(owner));
        assert_eq!(index.owner_of(output), Some(owner));
        assert!(index.get(input).unwrap().is_input());
        assert!(!index.get(output).unwrap().is_input());
        assert_eq!(index.get(input).unwrap().default, 1.5);
    }

    #[test]
    fn test_remove_forgets_owner() {
        let mut index = AttributeIndex::new();
        let attr = AttrId::new();
        index.insert(Attribute::output(attr, NodeId::new()));
        assert!(index.remove(attr).is_some());
        assert_eq!(index.owner_of(attr), None);
        assert!(index.is_empty());
    }
}
