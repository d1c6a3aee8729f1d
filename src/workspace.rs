//! Writing generated files under an output root.
//!
//! Every file is written to a temporary file next to its destination and then renamed over
//! it, so a reader never observes a partial file. Mergeable files that already exist are
//! reconciled with the [`FileMerger`] first.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::{debug, error, info};

use crate::{
    error::ExportError,
    meta::{BEGIN_MARKER, END_MARKER},
    writer::OutputFile,
};

pub trait Workspace {
    /// Directory the relative paths of output files are resolved against.
    fn output_root(&self) -> &Path;

    /// Absolute path of an output file. Relative paths always use `/`.
    fn resolve(&self, relative: &str) -> PathBuf {
        relative
            .split('/')
            .filter(|s| !s.is_empty())
            .fold(self.output_root().to_path_buf(), |path, segment| path.join(segment))
    }
}

/// Reconciles a regenerated file with the copy that already exists.
pub trait FileMerger {
    fn merge(&self, existing: &str, generated: &str) -> String;
}

/// A workspace rooted at a directory of the local file system.
#[derive(Debug, Clone)]
pub struct FsWorkspace {
    root: PathBuf,
}

impl FsWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Workspace for FsWorkspace {
    fn output_root(&self) -> &Path {
        &self.root
    }
}

/// Keeps the hand-written code between the `BEGIN WRITING YOUR CODE` / `END WRITING YOUR
/// CODE` markers of the existing file. Everything else is regenerated.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkedBlockMerger;

impl FileMerger for MarkedBlockMerger {
    fn merge(&self, existing: &str, generated: &str) -> String {
        let kept = marked_blocks(existing);
        let mut ret = String::with_capacity(generated.len());
        let mut push = |line: &str| {
            ret.push_str(line);
            ret.push('\n');
        };
        let mut lines = generated.lines();
        while let Some(line) = lines.next() {
            push(line);
            if let Some(key) = begin_key(line) {
                let body: Vec<_> = lines
                    .by_ref()
                    .take_while(|l| l.trim() != END_MARKER)
                    .collect();
                let body = match kept.iter().find(|(k, _)| *k == key) {
                    Some((_, hand_written)) => hand_written,
                    None => &body,
                };
                body.iter().for_each(|l| push(*l));
                // take_while consumed the end marker
                let indent = &line[..line.len() - line.trim_start().len()];
                push(&format!("{}{}", indent, END_MARKER));
            }
        }
        ret
    }
}

fn begin_key(line: &str) -> Option<&str> {
    line.trim().strip_prefix(BEGIN_MARKER).map(str::trim)
}

/// Bodies of the marked blocks of a file, keyed by the text after the begin marker.
fn marked_blocks(text: &str) -> Vec<(&str, Vec<&str>)> {
    let mut ret = vec![];
    let mut lines = text.lines();
    while let Some(line) = lines.next() {
        if let Some(key) = begin_key(line) {
            let body = lines
                .by_ref()
                .take_while(|l| l.trim() != END_MARKER)
                .collect();
            ret.push((key, body));
        }
    }
    ret
}

/// Writes one file and returns its absolute path. A file whose contents did not change is
/// left untouched.
pub fn publish_file(
    workspace: &dyn Workspace,
    merger: &dyn FileMerger,
    file: &OutputFile,
) -> Result<PathBuf, ExportError> {
    let path = workspace.resolve(&file.path);
    let publish_error = |source| ExportError::Publish {
        path: path.display().to_string(),
        source,
    };

    let existing = match fs::read_to_string(&path) {
        Ok(text) => Some(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(publish_error(e)),
    };
    let contents = match &existing {
        Some(existing) if file.mergeable => merger.merge(existing, &file.contents),
        _ => file.contents.clone(),
    };
    if existing.as_deref() == Some(contents.as_str()) {
        debug!(path = %path.display(), "unchanged");
        return Ok(path);
    }

    let dir = path.parent().unwrap_or_else(|| workspace.output_root());
    fs::create_dir_all(dir).map_err(publish_error)?;
    let mut temp = NamedTempFile::new_in(dir).map_err(publish_error)?;
    temp.write_all(contents.as_bytes()).map_err(publish_error)?;
    temp.persist(&path).map_err(|e| publish_error(e.error))?;
    info!(path = %path.display(), "published");
    Ok(path)
}

/// Writes every file. A failure is logged and returned in its slot without stopping the
/// remaining files.
pub fn publish(
    workspace: &dyn Workspace,
    merger: &dyn FileMerger,
    files: &[OutputFile],
) -> Vec<Result<PathBuf, ExportError>> {
    files
        .iter()
        .map(|file| {
            let ret = publish_file(workspace, merger, file);
            if let Err(e) = &ret {
                error!(path = %file.path, "{}", e);
            }
            ret
        })
        .collect()
}
