//! Batch export pipeline
//!
//! Reads, maps and renders every configured contract, then writes per-contract and
//! aggregate files. Per-contract failures are logged and skipped; only an empty result or
//! a destination failure aborts the run.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use bindgen_common::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::BindgenConfig;
use crate::deployment::{NetworkConfig, ResolvedAddress};
use crate::emitter::{BindingRenderer, ExportContext, GeneratedBinding, RenderedFile};
use crate::reader::AbiReader;
use crate::typescript::TypeScriptRenderer;

/// Record of the files the last run wrote, relative to the destination directory
pub const MANIFEST_FILE: &str = ".contract-bindgen-manifest.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct Manifest {
    files: Vec<String>,
}

/// A configured contract that produced no output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedContract {
    pub contract_name: String,
    pub reason: String,
}

/// Outcome of one export run
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    /// Contracts with generated bindings, in configured order
    pub exported: Vec<String>,
    pub skipped: Vec<SkippedContract>,
    /// Files written (or, on a dry run, that would have been written)
    pub written_files: Vec<PathBuf>,
}

impl ExportReport {
    pub fn attempted(&self) -> usize {
        self.exported.len() + self.skipped.len()
    }

    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// Drives reader, mapper and renderer over a configured contract list
pub struct BindingExporter<R: BindingRenderer = TypeScriptRenderer> {
    config: BindgenConfig,
    renderer: R,
}

impl BindingExporter<TypeScriptRenderer> {
    /// Exporter producing TypeScript bindings
    pub fn new(config: BindgenConfig) -> Result<Self> {
        Ok(Self::with_renderer(config, TypeScriptRenderer::new()?))
    }
}

impl<R: BindingRenderer> BindingExporter<R> {
    pub fn with_renderer(config: BindgenConfig, renderer: R) -> Self {
        Self { config, renderer }
    }

    pub fn config(&self) -> &BindgenConfig {
        &self.config
    }

    /// Run the whole pipeline
    pub fn export(&self) -> Result<ExportReport> {
        self.config.validate()?;

        let reader = AbiReader::new(&self.config.source_dir);
        let mut report = ExportReport::default();
        let mut bindings = Vec::new();

        for contract_name in &self.config.contract_names {
            let generated = reader
                .read(contract_name)
                .and_then(|artifact| GeneratedBinding::generate(&artifact, &self.renderer, self.config.include_bytecode));

            match generated {
                Ok(binding) => {
                    info!(
                        contract = %contract_name,
                        methods = binding.interface.methods.len(),
                        events = binding.interface.events.len(),
                        "Generated binding"
                    );
                    report.exported.push(contract_name.clone());
                    bindings.push(binding);
                }
                Err(e) if e.is_recoverable() => {
                    warn!(contract = %contract_name, reason = %e, "Skipping contract");
                    report.skipped.push(SkippedContract {
                        contract_name: contract_name.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        if bindings.is_empty() {
            return Err(Error::NoContractsProcessed {
                attempted: report.attempted(),
            });
        }

        let deployment = self.config.resolve_deployment();
        let network = deployment.as_ref().map(|d| d.network.clone()).unwrap_or_default();
        let addresses: Vec<ResolvedAddress> = self
            .config
            .contract_names
            .iter()
            .map(|name| match &deployment {
                Some(record) => record.resolve(name),
                None => ResolvedAddress::placeholder(name),
            })
            .collect();
        let skipped: Vec<String> = report.skipped.iter().map(|s| s.contract_name.clone()).collect();

        let files = self.collect_files(&bindings, &addresses, &network, &skipped)?;
        report.written_files = self.write_files(&files)?;

        let summary = format!(
            "{} of {} contracts exported successfully",
            report.exported.len(),
            report.attempted()
        );
        if report.is_partial() {
            warn!(dest = %self.config.dest_dir.display(), "{}", summary);
        } else {
            info!(dest = %self.config.dest_dir.display(), "{}", summary);
        }

        Ok(report)
    }

    fn collect_files(
        &self,
        bindings: &[GeneratedBinding],
        addresses: &[ResolvedAddress],
        network: &NetworkConfig,
        skipped: &[String],
    ) -> Result<Vec<RenderedFile>> {
        let mut files = Vec::new();

        for binding in bindings {
            files.push(RenderedFile {
                relative_path: self.renderer.abi_path(&binding.contract_name),
                content: binding.abi_json.clone(),
            });
            files.push(RenderedFile {
                relative_path: self.renderer.interface_path(&binding.contract_name),
                content: binding.interface_source.clone(),
            });
        }

        files.extend(self.renderer.render_aggregate(&ExportContext {
            bindings,
            addresses,
            network,
            skipped,
        })?);

        Ok(files)
    }

    /// Writes `files`, then deletes whatever the previous run listed in its manifest but
    /// this run no longer produces. Files the generator never wrote are left alone.
    fn write_files(&self, files: &[RenderedFile]) -> Result<Vec<PathBuf>> {
        let dest = &self.config.dest_dir;
        let manifest_path = dest.join(MANIFEST_FILE);
        let mut paths: Vec<PathBuf> = files.iter().map(|f| dest.join(&f.relative_path)).collect();

        let current: BTreeSet<String> = files.iter().map(|f| manifest_entry(&f.relative_path)).collect();
        let stale: Vec<String> = load_manifest(&manifest_path)
            .files
            .into_iter()
            .filter(|entry| !current.contains(entry))
            .collect();

        if self.config.dry_run {
            for (path, file) in paths.iter().zip(files) {
                info!(path = %path.display(), bytes = file.content.len(), "Dry run, not writing");
            }
            for entry in &stale {
                info!(path = %entry, "Dry run, not removing stale file");
            }
            paths.push(manifest_path);
            return Ok(paths);
        }

        std::fs::create_dir_all(dest).map_err(|e| Error::destination_write(dest, e))?;

        for (path, file) in paths.iter().zip(files) {
            write_file(path, &file.content)?;
        }

        for entry in &stale {
            remove_stale_file(dest, entry)?;
        }

        let manifest = Manifest {
            files: current.into_iter().collect(),
        };
        write_file(&manifest_path, &format!("{}\n", serde_json::to_string_pretty(&manifest)?))?;
        paths.push(manifest_path);

        Ok(paths)
    }
}

/// Convenience entry point producing TypeScript bindings
pub fn export_bindings(config: BindgenConfig) -> Result<ExportReport> {
    BindingExporter::new(config)?.export()
}

/// Forward-slash form so the manifest is identical across platforms
fn manifest_entry(relative_path: &Path) -> String {
    relative_path.to_string_lossy().replace('\\', "/")
}

/// A missing or unreadable manifest means no file is known to be ours
fn load_manifest(path: &Path) -> Manifest {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Manifest::default(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not read manifest, keeping existing files");
            return Manifest::default();
        }
    };
    serde_json::from_str(&content).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "Malformed manifest, keeping existing files");
        Manifest::default()
    })
}

fn remove_stale_file(dest: &Path, entry: &str) -> Result<()> {
    let relative = Path::new(entry);
    if !relative.components().all(|c| matches!(c, Component::Normal(_))) {
        warn!(path = %entry, "Ignoring manifest entry outside the destination");
        return Ok(());
    }

    let path = dest.join(relative);
    if !path.is_file() {
        return Ok(());
    }
    std::fs::remove_file(&path).map_err(|e| Error::destination_write(&path, e))?;
    debug!(path = %path.display(), "Removed stale file");
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::destination_write(parent, e))?;
    }
    std::fs::write(path, content).map_err(|e| Error::destination_write(path, e))?;
    debug!(path = %path.display(), "Wrote file");
    Ok(())
}
