//! JSON interchange for workflow snapshots.
//!
//! The document is `{ "nodes": [...], "edges": [...] }` with an optional
//! `name`. It is the only exchanged representation of a workflow, so export
//! followed by import must reproduce the same [`Workflow`].

use crate::{Result, Workflow};
use std::io::Read;
use std::path::Path;

impl Workflow {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a workflow document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let workflow = Self::from_reader(std::io::BufReader::new(file))?;
        tracing::debug!(
            path = %path.display(),
            nodes = workflow.node_count(),
            edges = workflow.edge_count(),
            "Loaded workflow document"
        );
        Ok(workflow)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json_pretty()?)?;
        tracing::debug!(path = %path.display(), "Saved workflow document");
        Ok(())
    }
}
