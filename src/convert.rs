//! File-level conversions between Reel shot lists and timeline JSON.
//!
//! The library crates work on strings and in-memory timelines; this module
//! adds the file handling around them: naming the timeline after its input,
//! resolving relative media against the input's directory, and writing every
//! output through a temporary file that replaces the destination only once
//! it is complete.

use std::io::Write;
use std::path::{Path, PathBuf};

use reelforge_probe::Prober;
use reelforge_reel::{
    read_reel, write_document, Converted, Error, ReaderConfig, Result, StudioMetadata,
    WriterConfig,
};
use reelforge_timeline::{Document, Timeline};

/// Options for one conversion run.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub relative_paths: bool,
    pub studio: StudioMetadata,
}

/// Read a Reel file into a timeline named after the file.
pub fn read_reel_file(
    input: &Path,
    options: &ConvertOptions,
    prober: &dyn Prober,
) -> Result<Converted<Timeline>> {
    let text = std::fs::read_to_string(input)?;
    let name = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let config = ReaderConfig::new(name)
        .with_base_dir(absolute_dir(input))
        .with_relative_paths(options.relative_paths)
        .with_studio(options.studio.clone());

    tracing::info!("Reading shot list {:?}", input);
    read_reel(&text, &config, prober)
}

/// Write every timeline of `document` as a Reel file.
///
/// One timeline goes to `output` itself. Several are written to
/// `<stem><index>.<ext>` next to it, counting from zero. Returns the paths
/// written, in document order.
pub fn write_reel_files(
    document: &Document,
    output: &Path,
    options: &ConvertOptions,
) -> Result<Vec<PathBuf>> {
    let config = WriterConfig::new()
        .with_output_dir(absolute_dir(output))
        .with_relative_paths(options.relative_paths);

    let texts = write_document(document, &config)?;
    let outputs: Vec<(PathBuf, String)> = output_paths(output, texts.len())
        .into_iter()
        .zip(texts)
        .collect();
    write_all_atomic(&outputs)?;
    Ok(outputs.into_iter().map(|(path, _)| path).collect())
}

/// Read a timeline JSON file.
pub fn read_document(input: &Path) -> Result<Document> {
    let json = std::fs::read_to_string(input)?;
    Ok(serde_json::from_str(&json)?)
}

/// Write a document as pretty-printed JSON.
pub fn write_document_json(document: &Document, output: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(document)?;
    write_atomic(output, &format!("{json}\n"))
}

/// Destination paths for `count` outputs based on `output`.
pub fn output_paths(output: &Path, count: usize) -> Vec<PathBuf> {
    if count <= 1 {
        return vec![output.to_path_buf()];
    }

    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = output
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_else(|| "reel".to_string());

    (0..count)
        .map(|index| output.with_file_name(format!("{stem}{index}.{ext}")))
        .collect()
}

/// Write `contents` to `path` through a temporary file in the same
/// directory, so a failed write never leaves a partial file behind.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    stage(path, contents)?
        .persist(path)
        .map_err(|e| Error::output_write_failure(path, e.error))?;
    Ok(())
}

/// Write several files, touching none of the destinations unless every
/// temporary file was written.
///
/// Staged files are then renamed into place in order. A failed rename
/// leaves the outputs before it in place.
pub fn write_all_atomic(outputs: &[(PathBuf, String)]) -> Result<()> {
    let staged = outputs
        .iter()
        .map(|(path, contents)| stage(path, contents))
        .collect::<Result<Vec<_>>>()?;

    for ((path, _), file) in outputs.iter().zip(staged) {
        file.persist(path)
            .map_err(|e| Error::output_write_failure(path, e.error))?;
        tracing::info!("Wrote {:?}", path);
    }
    Ok(())
}

fn stage(path: &Path, contents: &str) -> Result<tempfile::NamedTempFile> {
    let fail = |e: std::io::Error| Error::output_write_failure(path, e);

    let mut file = tempfile::NamedTempFile::new_in(parent_dir(path)).map_err(fail)?;
    file.write_all(contents.as_bytes()).map_err(fail)?;
    file.as_file().sync_all().map_err(fail)?;
    Ok(file)
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

fn absolute_dir(path: &Path) -> PathBuf {
    let dir = parent_dir(path);
    std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf())
}
