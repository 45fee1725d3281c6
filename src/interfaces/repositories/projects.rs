use std::path::{Path, PathBuf};

use tokio::fs;

use crate::{
    entities::project::{Project, ProjectSeed},
    errors::CatalogError,
};

/// Read-only view of the projects seed file. The file is re-read on every
/// call so edits show up without a restart.
#[derive(Debug, Clone)]
pub struct ProjectCatalog {
    path: PathBuf,
}

impl ProjectCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ProjectCatalog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn list(&self) -> Result<Vec<Project>, CatalogError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CatalogError::Missing(self.path.display().to_string()));
            }
            Err(e) => return Err(CatalogError::Corrupt(e.to_string())),
        };

        let seed: ProjectSeed =
            serde_json::from_str(&raw).map_err(|e| CatalogError::Corrupt(e.to_string()))?;

        Ok(seed.into_projects())
    }
}
