//! Project driver
//!
//! Finds every `.c` file under a source directory, plans and rewrites them
//! together, and lays the result out in an output directory next to the
//! runtime unit.

use crate::config::InstrumentConfig;
use crate::frontend::{CFrontend, StatementSource};
use crate::result::{LinecovError, LinecovResult};
use crate::rewrite::{FilePlan, Instrumentor};
use crate::runtime::{runtime_source, RUNTIME_FILE};
use std::path::{Path, PathBuf};

/// A set of C sources under one root
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl Project {
    /// Recursively collect `*.c` under `dir`, sorted.
    ///
    /// # Errors
    ///
    /// [`LinecovError::SourceDirNotFound`] if `dir` is not a directory,
    /// [`LinecovError::NoSources`] if it holds no C files.
    pub fn discover(dir: &Path) -> LinecovResult<Self> {
        if !dir.is_dir() {
            return Err(LinecovError::SourceDirNotFound {
                path: dir.to_path_buf(),
            });
        }
        let root = dir.canonicalize()?;
        let root_str = root
            .to_str()
            .ok_or_else(|| LinecovError::config(format!("path is not UTF-8: {}", root.display())))?;
        let pattern = format!("{}/**/*.c", glob::Pattern::escape(root_str));

        let mut files = Vec::new();
        for entry in glob::glob(&pattern)? {
            let path = entry.map_err(std::io::Error::from)?;
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        tracing::debug!(root = %root.display(), files = files.len(), "discovered sources");

        if files.is_empty() {
            return Err(LinecovError::NoSources { path: root });
        }
        Ok(Self { root, files })
    }

    /// Drop files under `dir`, typically an output tree nested in the
    /// source tree. Fails with [`LinecovError::NoSources`] if nothing is
    /// left.
    pub fn exclude(mut self, dir: &Path) -> LinecovResult<Self> {
        if let Ok(dir) = dir.canonicalize() {
            self.files.retain(|f| !f.starts_with(&dir));
        }
        if self.files.is_empty() {
            return Err(LinecovError::NoSources { path: self.root });
        }
        Ok(self)
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Instrument with the built-in C front-end
    pub fn instrument(&self, config: &InstrumentConfig) -> LinecovResult<InstrumentedProject> {
        self.instrument_with(&CFrontend, config)
    }

    /// Analyze, plan and rewrite every file
    pub fn instrument_with(
        &self,
        frontend: &impl StatementSource,
        config: &InstrumentConfig,
    ) -> LinecovResult<InstrumentedProject> {
        let mut plans = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let path = file
                .to_str()
                .ok_or_else(|| LinecovError::config(format!("path is not UTF-8: {}", file.display())))?;
            let source = std::fs::read_to_string(file)?;
            plans.push(FilePlan::analyze(frontend, path, source)?);
        }

        let instrumentor = Instrumentor::for_project(&plans)?;
        let files: Vec<InstrumentedFile> = plans
            .into_iter()
            .zip(&self.files)
            .map(|(plan, path)| InstrumentedFile {
                relative: path.strip_prefix(&self.root).unwrap_or(path).to_path_buf(),
                source: instrumentor.rewrite(&plan),
                plan,
            })
            .collect();

        tracing::info!(
            files = files.len(),
            countable = files.iter().map(|f| f.plan.classification.mask.count()).sum::<usize>(),
            constructors = instrumentor.uses_constructors(),
            "instrumented project"
        );
        Ok(InstrumentedProject {
            files,
            runtime: runtime_source(config),
        })
    }
}

/// One rewritten unit
#[derive(Debug, Clone)]
pub struct InstrumentedFile {
    /// Path relative to the project root
    pub relative: PathBuf,
    pub source: String,
    pub plan: FilePlan,
}

/// Rewritten units plus the runtime unit
#[derive(Debug, Clone)]
pub struct InstrumentedProject {
    pub files: Vec<InstrumentedFile>,
    pub runtime: String,
}

impl InstrumentedProject {
    /// Write every unit at its relative path under `out_dir`, and the
    /// runtime at `out_dir/linecov_runtime.c`. Returns the written paths.
    pub fn write(&self, out_dir: &Path) -> LinecovResult<Vec<PathBuf>> {
        std::fs::create_dir_all(out_dir)?;
        let mut written = Vec::with_capacity(self.files.len() + 1);
        for file in &self.files {
            let target = out_dir.join(&file.relative);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&target, &file.source)?;
            written.push(target);
        }
        let runtime = out_dir.join(RUNTIME_FILE);
        std::fs::write(&runtime, &self.runtime)?;
        written.push(runtime);
        Ok(written)
    }

    /// The unit defining `main`, if any
    #[must_use]
    pub fn main_file(&self) -> Option<&InstrumentedFile> {
        self.files.iter().find(|f| f.plan.has_main())
    }
}
