//! Read resolution: first match wins.
//!
//! Order for a name segment: keyword key of this node, then direct children
//! carrying that name, then a recursive search through each direct child.
//! Children are visited positional before keyword, in declaration order.
//! `Keyword` segments stop after the first step; `Named` segments skip it.

use super::{Address, Arg, Node, Segment, Slot};
use crate::error::GraphError;
use crate::value::Value;

/// Chain of slots from a node down to the resolved argument.
pub(crate) type Route = Vec<Slot>;

impl Node {
    /// Resolve `address` to the argument stored there.
    ///
    /// Index and name addressing return whatever occupies the slot, literal
    /// or node. Path addressing descends into each node found along the way.
    pub fn get(&self, address: impl Into<Address>) -> Result<&Arg, GraphError> {
        let address = address.into();
        let route = self.locate(&address)?;
        Ok(self.follow(&route))
    }

    /// Like `get`, but the address must end on a literal.
    pub fn get_value(&self, address: impl Into<Address>) -> Result<&Value, GraphError> {
        let address = address.into();
        match self.get(&address)? {
            Arg::Literal(v) => Ok(v),
            Arg::Child(_) => Err(GraphError::not_found(&address, self.label())),
        }
    }

    /// Like `get`, but the address must end on a node.
    pub fn get_node(&self, address: impl Into<Address>) -> Result<&Node, GraphError> {
        let address = address.into();
        match self.get(&address)? {
            Arg::Child(node) => Ok(node),
            Arg::Literal(_) => Err(GraphError::not_found(&address, self.label())),
        }
    }

    /// Whether `address` resolves anywhere in this tree.
    pub fn contains(&self, address: impl Into<Address>) -> bool {
        self.locate(&address.into()).is_ok()
    }

    /// Route for a full path. Every segment but the last must land on a node.
    pub(crate) fn locate(&self, address: &Address) -> Result<Route, GraphError> {
        self.locate_segments(address.segments())
            .ok_or_else(|| GraphError::not_found(address, self.label()))
    }

    pub(crate) fn locate_segments(&self, segments: &[Segment]) -> Option<Route> {
        let mut route = Route::new();
        let mut current = self;
        for (i, segment) in segments.iter().enumerate() {
            let hop = current.locate_segment(segment)?;
            let arg = current.follow(&hop);
            route.extend(hop);
            if i + 1 < segments.len() {
                current = arg.as_node()?;
            }
        }
        Some(route)
    }

    /// Route for a single segment, applying the tie-break order.
    fn locate_segment(&self, segment: &Segment) -> Option<Route> {
        match segment {
            Segment::Index(i) => (*i < self.args.len()).then(|| vec![Slot::Positional(*i)]),
            Segment::Keyword(key) => self.locate_keyword(key),
            Segment::Name(name) => self
                .locate_keyword(name)
                .or_else(|| self.locate_named(name, segment)),
            Segment::Named(name) => self.locate_named(name, segment),
        }
    }

    fn locate_keyword(&self, key: &str) -> Option<Route> {
        let i = self.kwargs.get_index_of(key)?;
        Some(vec![Slot::Keyword(i)])
    }

    /// Direct children called `name`, then the same `segment` searched
    /// inside each child.
    fn locate_named(&self, name: &str, segment: &Segment) -> Option<Route> {
        if let Some((slot, _)) = self.children().find(|(_, child)| child.name() == Some(name)) {
            return Some(vec![slot]);
        }
        self.children().find_map(|(slot, child)| {
            let mut route = child.locate_segment(segment)?;
            route.insert(0, slot);
            Some(route)
        })
    }

    /// Walk a route produced by `locate`. Routes are only built against
    /// the same, unmodified tree, so every hop exists.
    pub(crate) fn follow(&self, route: &[Slot]) -> &Arg {
        let (last, hops) = match route.split_last() {
            Some(split) => split,
            None => unreachable!("empty route"),
        };
        let mut node = self;
        for slot in hops {
            node = match node.slot(*slot).and_then(Arg::as_node) {
                Some(child) => child,
                None => unreachable!("route hop is not a node"),
            };
        }
        match node.slot(*last) {
            Some(arg) => arg,
            None => unreachable!("route slot out of range"),
        }
    }

    /// Mutable counterpart of `follow`.
    pub(crate) fn follow_mut(&mut self, route: &[Slot]) -> &mut Arg {
        let (last, hops) = match route.split_last() {
            Some(split) => split,
            None => unreachable!("empty route"),
        };
        let mut node = self;
        for slot in hops {
            node = match node.slot_mut(*slot).and_then(Arg::as_node_mut) {
                Some(child) => child,
                None => unreachable!("route hop is not a node"),
            };
        }
        match node.slot_mut(*last) {
            Some(arg) => arg,
            None => unreachable!("route slot out of range"),
        }
    }
}
