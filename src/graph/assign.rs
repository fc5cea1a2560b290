//! Write resolution: fan out to every match.
//!
//! A positional index or keyword key is a single-slot write. A name updates
//! every direct child carrying that name and then repeats the write inside
//! each remaining direct child, skipping children where nothing matches.
//! Explicit `Keyword` and `Named` segments take only their half of that.

use super::{Address, Arg, Node, Segment, Slot};
use crate::error::GraphError;

impl Node {
    /// Store `value` at `address`.
    ///
    /// For a path, the leading segments are resolved like `get` (first
    /// match) and the final segment is written with fan-out semantics in
    /// the node they lead to.
    pub fn set(&mut self, address: impl Into<Address>, value: impl Into<Arg>) -> Result<(), GraphError> {
        let address = address.into();
        let value = value.into();
        let (last, prefix) = address.split_last();

        let label = self.label();
        let target = if prefix.is_empty() {
            self
        } else {
            let route = self
                .locate_segments(prefix)
                .ok_or_else(|| GraphError::not_found(&address, &label))?;
            match self.follow_mut(&route).as_node_mut() {
                Some(node) => node,
                None => return Err(GraphError::not_found(&address, &label)),
            }
        };

        if target.assign(last, &value) {
            log::trace!("set {} in {}", address, label);
            Ok(())
        } else {
            Err(GraphError::not_found(&address, &label))
        }
    }

    /// Write one segment. Returns whether any slot was updated.
    fn assign(&mut self, segment: &Segment, value: &Arg) -> bool {
        match segment {
            Segment::Index(i) => match self.args.get_mut(*i) {
                Some(slot) => {
                    *slot = value.clone();
                    true
                }
                None => false,
            },
            Segment::Keyword(key) => self.assign_keyword(key, value),
            Segment::Name(name) => {
                self.assign_keyword(name, value) || self.assign_named(name, segment, value)
            }
            Segment::Named(name) => self.assign_named(name, segment, value),
        }
    }

    fn assign_keyword(&mut self, key: &str, value: &Arg) -> bool {
        match self.kwargs.get_mut(key) {
            Some(slot) => {
                *slot = value.clone();
                true
            }
            None => false,
        }
    }

    fn assign_named(&mut self, name: &str, segment: &Segment, value: &Arg) -> bool {
        let replaced: Vec<Slot> = self
            .children()
            .filter(|(_, child)| child.name() == Some(name))
            .map(|(slot, _)| slot)
            .collect();

        for slot in &replaced {
            if let Some(arg) = self.slot_mut(*slot) {
                *arg = value.clone();
            }
        }

        let mut found = !replaced.is_empty();
        for (slot, child) in self.children_mut() {
            if replaced.contains(&slot) {
                continue;
            }
            found |= child.assign(segment, value);
        }
        found
    }
}
