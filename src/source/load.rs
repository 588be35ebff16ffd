use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use super::demo::demo_document;
use super::document::GraphDocument;

/// Where the viewer pulls its graph from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphSource {
    Demo,
    File(PathBuf),
}

impl GraphSource {
    pub fn from_arg(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Demo, Self::File)
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Demo => "built-in demo".to_owned(),
            Self::File(path) => path.display().to_string(),
        }
    }

    pub fn load(&self) -> Result<GraphDocument> {
        match self {
            Self::Demo => Ok(demo_document()),
            Self::File(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("failed to read graph file {}", path.display()))?;
                let document = GraphDocument::from_json(&raw)
                    .with_context(|| format!("invalid graph file {}", path.display()))?;
                debug!(path = %path.display(), nodes = document.node_count(), "graph file loaded");
                Ok(document)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reports_path() {
        let source = GraphSource::File(PathBuf::from("/nonexistent/graph.json"));
        let error = source.load().expect_err("file does not exist");
        assert!(format!("{error:#}").contains("/nonexistent/graph.json"));
    }

    #[test]
    fn no_path_means_demo() {
        assert_eq!(GraphSource::from_arg(None), GraphSource::Demo);
        assert!(GraphSource::Demo.load().is_ok());
    }
}
