//! Saving and loading node trees as JSON.
//!
//! A node holds only function names and literal values, so the JSON form
//! is complete: a loaded tree computes and hashes exactly like the tree
//! that was saved.
//!
//! ```json
//! {"func": "add", "args": [{"func": "mul", "args": [1, 2]}], "kwargs": {"y": 3}}
//! ```

use std::path::Path;

use crate::error::PersistError;
use crate::graph::Node;

impl Node {
    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Node, PersistError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Write this tree to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Node, PersistError> {
        let text = std::fs::read_to_string(path)?;
        Node::from_json(&text)
    }
}
