//! Parameter sweeps: zipped substitutions over independent clones.

use super::{Address, Arg, Node};
use crate::error::GraphError;
use crate::exec::registry::TUPLE;

/// Ordered mapping from address to the values it takes across a sweep.
///
/// Values are zipped: run `i` applies element `i` of every sequence to the
/// same clone. All sequences must have the same length.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sweep {
    axes: Vec<(Address, Vec<Arg>)>,
}

impl Sweep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the values `address` takes, one per run.
    pub fn vary<I>(mut self, address: impl Into<Address>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.axes
            .push((address.into(), values.into_iter().map(Into::into).collect()));
        self
    }

    pub fn axes(&self) -> &[(Address, Vec<Arg>)] {
        &self.axes
    }

    /// Number of runs, or `LengthMismatch` naming the first axis whose
    /// length differs from the first axis.
    pub fn runs(&self) -> Result<usize, GraphError> {
        let mut axes = self.axes.iter();
        let expected = match axes.next() {
            Some((_, values)) => values.len(),
            None => return Ok(0),
        };
        for (address, values) in axes {
            if values.len() != expected {
                return Err(GraphError::LengthMismatch {
                    address: address.to_string(),
                    expected,
                    found: values.len(),
                });
            }
        }
        Ok(expected)
    }
}

impl<A: Into<Address>> FromIterator<(A, Vec<Arg>)> for Sweep {
    fn from_iter<T: IntoIterator<Item = (A, Vec<Arg>)>>(iter: T) -> Self {
        Sweep {
            axes: iter
                .into_iter()
                .map(|(address, values)| (address.into(), values))
                .collect(),
        }
    }
}

impl Node {
    /// Build one independent clone per run of `sweep`, each with that run's
    /// substitutions applied, gathered under a `tuple` node that computes
    /// the sequence of their results.
    ///
    /// Lengths are checked before any clone exists. Every substitution is
    /// applied to clones only, so `self` is untouched even on failure.
    pub fn scan(&self, sweep: &Sweep, name: Option<&str>) -> Result<Node, GraphError> {
        let runs = sweep.runs()?;
        log::debug!("scan {} over {} runs", self.label(), runs);

        let mut clones = Vec::with_capacity(runs);
        for run in 0..runs {
            let mut clone = self.clone();
            for (address, values) in &sweep.axes {
                clone.set(address, values[run].clone())?;
            }
            clones.push(clone);
        }

        let aggregate = Node::new(TUPLE).with_args(clones);
        Ok(match name {
            Some(name) => aggregate.with_name(name),
            None => aggregate,
        })
    }
}
