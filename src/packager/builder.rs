//! Format builder seam and the in-tree dir/zip builders.
//!
//! Byte-level construction of the Squirrel, NSIS and MSI formats lives
//! outside this crate; embedders register implementations of
//! [`FormatBuilder`] for those formats. The trivial formats (plain
//! directory copy, zip archive) ship here as the reference implementations.

use crate::packager::error::{Error, Result};
use crate::packager::sign::BoxFuture;
use crate::packager::squirrel::EffectiveDistOptions;
use crate::packager::target::{PackageFormat, PackagingTarget};
use crate::packager::fs;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Everything one builder invocation consumes.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// The (format, arch) pair being built.
    pub target: PackagingTarget,
    /// Fully-resolved distribution options, read-only.
    pub options: EffectiveDistOptions,
    /// Staged application output directory (already signed when signing
    /// was configured).
    pub app_out_dir: PathBuf,
    /// Directory artifacts are written into.
    pub out_dir: PathBuf,
}

/// Asynchronous work a builder dispatched instead of blocking on.
///
/// The pipeline drains these before declaring the owning target done, on
/// failure paths as well, so partial external side effects are not lost.
#[derive(Default)]
pub struct DeferredTasks {
    handles: Vec<JoinHandle<Result<()>>>,
}

impl DeferredTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns `future` onto the runtime and tracks it for the drain.
    pub fn spawn<F>(&mut self, future: F)
    where
        F: std::future::Future<Output = Result<()>> + Send + 'static,
    {
        self.handles.push(tokio::spawn(future));
    }

    /// Number of tasks still tracked.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Awaits every dispatched task, returning the first error after all
    /// tasks have settled.
    pub async fn drain(&mut self) -> Result<()> {
        let mut first_error = None;
        for handle in self.handles.drain(..) {
            let result = match handle.await {
                Ok(result) => result,
                Err(join_error) => Err(Error::TaskJoin(join_error)),
            };
            if let Err(e) = result {
                log::warn!("deferred task failed: {e}");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// One installer format's build step.
///
/// `build` may append asynchronous tasks to `deferred` rather than blocking;
/// the pipeline joins them before the target is reported done.
pub trait FormatBuilder: Send + Sync {
    /// Builds the format from the effective options, returning artifact paths.
    fn build<'a>(
        &'a self,
        request: &'a BuildRequest,
        deferred: &'a mut DeferredTasks,
    ) -> BoxFuture<'a, Result<Vec<PathBuf>>>;
}

/// Maps installer formats to their builders.
#[derive(Clone, Default)]
pub struct BuilderRegistry {
    builders: HashMap<PackageFormat, Arc<dyn FormatBuilder>>,
}

impl BuilderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the in-tree dir and zip builders.
    pub fn with_defaults() -> Self {
        Self::new()
            .register(PackageFormat::Dir, Arc::new(DirBuilder))
            .register(PackageFormat::Zip, Arc::new(ZipBuilder))
    }

    /// Registers (or replaces) the builder for `format`.
    pub fn register(mut self, format: PackageFormat, builder: Arc<dyn FormatBuilder>) -> Self {
        self.builders.insert(format, builder);
        self
    }

    /// Looks up the builder for `format`.
    pub fn get(&self, format: PackageFormat) -> Result<Arc<dyn FormatBuilder>> {
        self.builders
            .get(&format)
            .cloned()
            .ok_or_else(|| Error::BuilderUnavailable(format.name().to_string()))
    }
}

/// Plain directory output: copies the staged application directory into the
/// artifact directory.
pub struct DirBuilder;

impl FormatBuilder for DirBuilder {
    fn build<'a>(
        &'a self,
        request: &'a BuildRequest,
        _deferred: &'a mut DeferredTasks,
    ) -> BoxFuture<'a, Result<Vec<PathBuf>>> {
        Box::pin(async move {
            let dest = request.out_dir.join(format!(
                "{}-{}-{}",
                request.options.product_name, request.options.version, request.target.arch
            ));
            fs::remove_dir_all(&dest).await?;
            fs::copy_dir(&request.app_out_dir, &dest).await?;
            log::info!("created directory output: {}", dest.display());
            Ok(vec![dest])
        })
    }
}

/// Zip archive output of the staged application directory.
pub struct ZipBuilder;

impl FormatBuilder for ZipBuilder {
    fn build<'a>(
        &'a self,
        request: &'a BuildRequest,
        _deferred: &'a mut DeferredTasks,
    ) -> BoxFuture<'a, Result<Vec<PathBuf>>> {
        Box::pin(async move {
            let archive_path = request.out_dir.join(format!(
                "{}-{}-{}-win.zip",
                request.options.product_name, request.options.version, request.target.arch
            ));
            tokio::fs::create_dir_all(&request.out_dir).await?;

            let app_dir = request.app_out_dir.clone();
            let out_path = archive_path.clone();
            // Archive writing is blocking work.
            tokio::task::spawn_blocking(move || write_zip(&app_dir, &out_path))
                .await
                .map_err(|e| Error::GenericError(format!("zip task panicked: {e}")))??;

            log::info!("created zip archive: {}", archive_path.display());
            Ok(vec![archive_path])
        })
    }
}

fn write_zip(app_dir: &Path, out_path: &Path) -> Result<()> {
    use std::io::{Read, Write};

    let file = std::fs::File::create(out_path)?;
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    let mut entries: Vec<_> = walkdir::WalkDir::new(app_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .collect();
    entries.sort_by_key(|e| e.path().to_path_buf());

    let mut buffer = Vec::new();
    for entry in entries {
        let rel_path = entry
            .path()
            .strip_prefix(app_dir)
            .map_err(|e| Error::GenericError(e.to_string()))?;
        // Zip entry names use forward slashes regardless of host separator.
        let entry_name = rel_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        writer
            .start_file(entry_name, options)
            .map_err(|e| Error::GenericError(format!("zip write failed: {e}")))?;

        buffer.clear();
        std::fs::File::open(entry.path())?.read_to_end(&mut buffer)?;
        writer.write_all(&buffer)?;
    }

    writer
        .finish()
        .map_err(|e| Error::GenericError(format!("zip finalize failed: {e}")))?;
    Ok(())
}
