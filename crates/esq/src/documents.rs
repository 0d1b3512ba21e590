//! 📂 Document loading — turning files on disk into [`Document`]s.
//!
//! Two doors in:
//! - [`load_ndjson`]: one JSON document per line, blank lines ignored. The bulk-friendly format.
//! - [`load_path`]: a file or a whole directory tree, each file becoming
//!   `{"title": <file stem>, "content": <file text>}`.
//!
//! ⚠️ Documents are serialized compact. A pretty-printed document would smuggle
//! newlines into the `_bulk` body and the cluster would read half a document as an
//! action line. Nobody wants that conversation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::json;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::common::Document;

/// 🔍 Split an NDJSON buffer into trimmed, non-blank lines. `\r\n` tolerated.
fn split_lines(bytes: &[u8]) -> Result<Vec<Document>> {
    let mut documents = Vec::new();
    let mut start = 0;
    let mut line_number = 0;
    let ends = memchr::memchr_iter(b'\n', bytes).chain(std::iter::once(bytes.len()));
    for end in ends {
        line_number += 1;
        let line = std::str::from_utf8(&bytes[start..end])
            .with_context(|| format!("💀 line {line_number} is not valid UTF-8"))?;
        let line = line.trim();
        if !line.is_empty() {
            documents.push(Document::new(line));
        }
        start = end + 1;
    }
    Ok(documents)
}

/// 📄 Read an NDJSON file: one document per non-blank line, in file order.
pub async fn load_ndjson(path: &Path) -> Result<Vec<Document>> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("💀 Failed to read NDJSON file '{}'", path.display()))?;
    let documents = split_lines(&bytes)
        .with_context(|| format!("💀 Failed to split NDJSON file '{}'", path.display()))?;
    debug!(
        "📄 Loaded {} document(s) from '{}'",
        documents.len(),
        path.display()
    );
    Ok(documents)
}

/// 📝 One file → one `{"title", "content"}` document. Title is the file stem.
async fn file_to_document(path: &Path) -> Result<Document> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("💀 Failed to read '{}'", path.display()))?;
    let title = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Document::new(
        json!({ "title": title, "content": content }).to_string(),
    ))
}

/// 🌳 Every regular file under `root`, symlinks followed, siblings visited in name
/// order, so the same tree always yields the same document order.
///
/// Entries the walk can't get through (permissions, dangling links, loops) are
/// skipped with a warning. One bad apple doesn't cancel the harvest.
fn walk_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("⚠️ Skipping an entry under '{}': {}", root.display(), err);
                continue;
            }
        };
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        } else if !entry.file_type().is_dir() {
            debug!("🔗 Ignoring non-regular entry '{}'", entry.path().display());
        }
    }
    files
}

/// 📂 Load a single file, or every file under a directory, as title/content documents.
///
/// Inside a directory an unreadable file is skipped with a warning; a single file that
/// can't be read is an error, since it was the whole point.
pub async fn load_path(path: &Path) -> Result<Vec<Document>> {
    let metadata = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("💀 Error accessing path '{}'", path.display()))?;

    if !metadata.is_dir() {
        return Ok(vec![file_to_document(path).await?]);
    }

    // -- walkdir is blocking, so the walk gets its own thread; the reads stay on tokio fs
    let root = path.to_path_buf();
    let files = tokio::task::spawn_blocking(move || walk_files(&root))
        .await
        .with_context(|| format!("💀 Directory walk of '{}' fell over", path.display()))?;

    let mut documents = Vec::new();
    for file in files {
        match file_to_document(&file).await {
            Ok(document) => documents.push(document),
            Err(err) => warn!("⚠️ Skipping '{}': {:#}", file.display(), err),
        }
    }
    debug!(
        "📂 Loaded {} document(s) from directory '{}'",
        documents.len(),
        path.display()
    );
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_one_where_blank_lines_and_crlf_do_not_count() {
        let docs = split_lines(b"{\"a\":1}\r\n\n   \n{\"b\":2}\n{\"c\":3}").unwrap();
        let docs: Vec<&str> = docs.iter().map(Document::as_str).collect();
        assert_eq!(docs, vec![r#"{"a":1}"#, r#"{"b":2}"#, r#"{"c":3}"#]);
    }

    #[test]
    fn the_one_where_an_empty_buffer_is_an_empty_pile() {
        assert!(split_lines(b"").unwrap().is_empty());
        assert!(split_lines(b"\n\n").unwrap().is_empty());
    }

    #[test]
    fn the_one_where_invalid_utf8_names_its_line() {
        let err = split_lines(b"{\"ok\":1}\n\xff\xfe\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[tokio::test]
    async fn the_one_where_an_ndjson_file_comes_back_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("docs.ndjson");
        std::fs::write(&file, "{\"n\":1}\n{\"n\":2}\n").unwrap();

        let docs = load_ndjson(&file).await.unwrap();
        assert_eq!(docs, vec![Document::from(r#"{"n":1}"#), Document::from(r#"{"n":2}"#)]);
    }

    #[tokio::test]
    async fn the_one_where_a_directory_tree_becomes_title_content_docs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("b-second.txt"), "second\nline").unwrap();
        std::fs::write(dir.path().join("a-first.md"), "first").unwrap();
        std::fs::write(dir.path().join("nested").join("c-third.txt"), "third").unwrap();

        let docs = load_path(dir.path()).await.unwrap();
        let parsed: Vec<serde_json::Value> = docs
            .iter()
            .map(|doc| serde_json::from_str(doc.as_str()).unwrap())
            .collect();

        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0]["title"], "a-first");
        assert_eq!(parsed[0]["content"], "first");
        assert_eq!(parsed[1]["title"], "b-second");
        assert_eq!(parsed[1]["content"], "second\nline");
        assert_eq!(parsed[2]["title"], "c-third");
        assert!(docs.iter().all(|doc| !doc.as_str().contains('\n')));
    }

    #[tokio::test]
    async fn the_one_where_a_single_file_is_a_single_doc() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("rust.txt");
        std::fs::write(&file, "fearless").unwrap();

        let docs = load_path(&file).await.unwrap();
        assert_eq!(docs, vec![Document::from(r#"{"content":"fearless","title":"rust"}"#)]);
    }

    #[tokio::test]
    async fn the_one_where_a_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_path(&dir.path().join("ghost")).await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn the_one_where_symlinks_are_followed_and_dangling_ones_skipped() {
        let outside = tempfile::tempdir().unwrap();
        let target = outside.path().join("real.txt");
        std::fs::write(&target, "linked").unwrap();

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a-plain.txt"), "plain").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("b-link.txt")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("ghost.txt"), dir.path().join("c-dangling.txt"))
            .unwrap();

        let docs = load_path(dir.path()).await.expect("💀 one broken link sank the whole load");
        let parsed: Vec<serde_json::Value> = docs
            .iter()
            .map(|doc| serde_json::from_str(doc.as_str()).unwrap())
            .collect();

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["title"], "a-plain");
        assert_eq!(parsed[1]["title"], "b-link");
        assert_eq!(parsed[1]["content"], "linked");
    }
}
