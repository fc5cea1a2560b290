//! Addresses: positional indices, names/keyword keys and `/`-separated paths.

use std::fmt;
use std::str::FromStr;

/// One level of an address.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    /// Positional argument index.
    Index(usize),
    /// Keyword key or child name, keyword key first.
    Name(String),
    /// Keyword key only.
    Keyword(String),
    /// Child name only, never a keyword key.
    Named(String),
}

impl Segment {
    fn parse(text: &str) -> Self {
        if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = text.parse() {
                return Segment::Index(index);
            }
        }
        Segment::Name(text.to_string())
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Index(i) => write!(f, "{}", i),
            Segment::Name(name) | Segment::Keyword(name) | Segment::Named(name) => {
                write!(f, "{}", name)
            }
        }
    }
}

/// A non-empty sequence of segments, one per tree level.
///
/// Parsed from text by splitting on `/`. Segments made only of decimal
/// digits are positional indices, everything else is a name. There is no
/// escaping, so names containing `/` cannot be addressed.
///
/// Text never produces `Keyword` or `Named` segments. Build those with
/// `Address::keyword` and `Address::named` when a keyword key and a child
/// name collide, and extend them into paths with `join`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(Vec<Segment>);

impl Address {
    /// The keyword argument `key` of the current node, ignoring child names.
    pub fn keyword(key: impl Into<String>) -> Self {
        Address(vec![Segment::Keyword(key.into())])
    }

    /// Children called `name`, found directly or by recursive search,
    /// ignoring keyword keys.
    pub fn named(name: impl Into<String>) -> Self {
        Address(vec![Segment::Named(name.into())])
    }

    /// This address followed by `rest`.
    pub fn join(mut self, rest: impl Into<Address>) -> Self {
        self.0.extend(rest.into().0);
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Split into the leading path and the final segment.
    pub(crate) fn split_last(&self) -> (&Segment, &[Segment]) {
        match self.0.split_last() {
            Some(split) => split,
            // Construction always yields at least one segment.
            None => unreachable!("empty address"),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl From<usize> for Address {
    fn from(index: usize) -> Self {
        Address(vec![Segment::Index(index)])
    }
}

impl From<&str> for Address {
    fn from(text: &str) -> Self {
        Address(text.split('/').map(Segment::parse).collect())
    }
}

impl From<String> for Address {
    fn from(text: String) -> Self {
        Address::from(text.as_str())
    }
}

impl From<&String> for Address {
    fn from(text: &String) -> Self {
        Address::from(text.as_str())
    }
}

impl From<&Address> for Address {
    fn from(address: &Address) -> Self {
        address.clone()
    }
}

impl FromStr for Address {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Address::from(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path() {
        let address = Address::from("0/y/12");
        assert_eq!(
            address.segments(),
            &[
                Segment::Index(0),
                Segment::Name("y".to_string()),
                Segment::Index(12)
            ]
        );
        assert_eq!(address.to_string(), "0/y/12");
    }

    #[test]
    fn test_single_segments() {
        assert_eq!(Address::from(3).segments(), &[Segment::Index(3)]);
        assert_eq!(
            Address::from("x").segments(),
            &[Segment::Name("x".to_string())]
        );
        assert_eq!(
            Address::from("x1").segments(),
            &[Segment::Name("x1".to_string())]
        );
    }

    #[test]
    fn test_empty_segments_are_names() {
        assert_eq!(
            Address::from("").segments(),
            &[Segment::Name(String::new())]
        );
        assert_eq!(Address::from("a//b").segments().len(), 3);
    }

    #[test]
    fn test_explicit_kinds() {
        let address = Address::named("x").join("0").join(Address::keyword("y"));
        assert_eq!(
            address.segments(),
            &[
                Segment::Named("x".to_string()),
                Segment::Index(0),
                Segment::Keyword("y".to_string())
            ]
        );
        assert_eq!(address.to_string(), "x/0/y");
    }

    #[test]
    fn test_split_last() {
        let address = Address::from("a/b/c");
        let (last, prefix) = address.split_last();
        assert_eq!(last, &Segment::Name("c".to_string()));
        assert_eq!(prefix.len(), 2);
    }
}
