//! The env manager facade

use crate::export::export_map;
use binder::{Binder, EnvBind};
use config::{ManagerSettings, DEFAULT_ENV_FILE};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use types::{EnvironmentAccess, EnvironmentMap, FsSource, ProcessEnv, Result, TextSource};

/// Loads env files, exports them and binds them into structures
pub struct EnvManager {
    files: Vec<PathBuf>,
    overwrite_existing: bool,
    source: Box<dyn TextSource>,
    env: Box<dyn EnvironmentAccess>,
}

impl EnvManager {
    /// Manager over the filesystem and the process environment.
    ///
    /// With no files given, `.env` is used.
    pub fn new<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::with_collaborators(files, FsSource, ProcessEnv)
    }

    /// Manager configured from loaded settings
    pub fn from_settings(settings: &ManagerSettings) -> Self {
        Self::new(settings.files.iter().map(PathBuf::from)).overwrite_existing(settings.overwrite_existing)
    }

    /// Manager reading files from `source` and exporting into `env`
    pub fn with_collaborators<I, P>(
        files: I,
        source: impl TextSource + 'static,
        env: impl EnvironmentAccess + 'static,
    ) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut files: Vec<PathBuf> = files.into_iter().map(Into::into).collect();
        if files.is_empty() {
            files.push(PathBuf::from(DEFAULT_ENV_FILE));
        }

        Self {
            files,
            overwrite_existing: true,
            source: Box::new(source),
            env: Box::new(env),
        }
    }

    /// Whether exporting replaces variables that are already set
    pub fn overwrite_existing(mut self, overwrite: bool) -> Self {
        self.overwrite_existing = overwrite;
        self
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// The external environment used for substitution fallback and export
    pub fn environment(&self) -> &dyn EnvironmentAccess {
        self.env.as_ref()
    }

    /// Parse every file, in order, into one resolved map
    pub fn env_map(&self) -> Result<EnvironmentMap> {
        let mut vars = EnvironmentMap::new();
        for file in &self.files {
            self.parse_file(file, &mut vars)?;
        }
        Ok(vars)
    }

    /// Parse every file and export the result into the external environment
    pub fn load_env(&mut self) -> Result<EnvironmentMap> {
        let vars = self.env_map()?;
        let exported = export_map(&vars, self.env.as_mut(), self.overwrite_existing)?;
        info!(files = self.files.len(), exported, "loaded environment");
        Ok(vars)
    }

    /// Bind `T` from `vars`, falling back to the external environment
    pub fn bind<T: EnvBind>(&self, vars: &EnvironmentMap) -> Result<T> {
        Binder::new(vars, self.env.as_ref()).bind()
    }

    /// Parse every file and bind the result into `T`
    pub fn load_and_bind<T: EnvBind>(&self) -> Result<T> {
        let vars = self.env_map()?;
        self.bind(&vars)
    }

    fn parse_file(&self, file: &Path, vars: &mut EnvironmentMap) -> Result<usize> {
        let label = file.display().to_string();
        debug!(file = label.as_str(), "reading env file");
        let content = self.source.read_text(file)?;
        parser::parse_into(&label, &content, vars, self.env.as_ref())
    }
}

impl std::fmt::Debug for EnvManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvManager")
            .field("files", &self.files)
            .field("overwrite_existing", &self.overwrite_existing)
            .finish_non_exhaustive()
    }
}
