//! Anagram finder
//!
//! Thin scan layer over the engine: every line of a text file is indexed by
//! its sorted bytes, so two lines are anagrams exactly when their keys match.
//! A previously dumped index can answer the same question without the text.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::engine::Engine;
use crate::error::{AgrepError, Result};

/// A line whose bytes are a permutation of the pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// 1-based line number
    pub line: u32,
    /// Line text; unknown when answered from an index file
    pub text: Option<String>,
}

/// Bytes of `input` in ascending order
pub fn sorted_key(input: &[u8]) -> Vec<u8> {
    let mut key = input.to_vec();
    key.sort_unstable();
    key
}

/// `path` with its extension replaced by `extension`
pub fn index_path_for(path: &Path, extension: &str) -> PathBuf {
    path.with_extension(extension)
}

/// Find the first anagram of `pattern` in `path`
///
/// A path carrying the configured index extension is treated as a dumped
/// index and answered by lookup. Any other path is scanned as text; with
/// `build_index` the whole file is indexed and dumped next to it, otherwise
/// the scan stops at the first match.
pub fn find_anagram(engine: &mut Engine, pattern: &str, path: &Path, build_index: bool) -> Result<Option<Match>> {
    let extension = engine.config().index_extension.clone();
    if path.extension().is_some_and(|ext| ext == extension.as_str()) {
        return search_index(engine, pattern, path);
    }

    let found = scan_text(engine, pattern, path, build_index)?;

    if build_index {
        let index_path = index_path_for(path, &extension);
        engine.dump_to_file(&index_path)?;
        info!(index = %index_path.display(), "Index file created");
    }

    Ok(found)
}

fn scan_text(engine: &mut Engine, pattern: &str, path: &Path, build_index: bool) -> Result<Option<Match>> {
    let wanted = sorted_key(pattern.as_bytes());
    let reader = BufReader::new(File::open(path)?);

    let mut found = None;
    for (i, line) in reader.split(b'\n').enumerate() {
        let mut line = line?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }

        let line_no = u32::try_from(i + 1).map_err(|_| {
            AgrepError::Format(format!("{} has more lines than fit a 32-bit line number", path.display()))
        })?;

        let key = sorted_key(&line);
        engine.insert(&key, line_no)?;

        if found.is_none() && key == wanted {
            debug!(line = line_no, "Anagram matched");
            found = Some(Match {
                line: line_no,
                text: Some(String::from_utf8_lossy(&line).into_owned()),
            });

            if !build_index {
                break;
            }
        }
    }

    Ok(found)
}

fn search_index(engine: &mut Engine, pattern: &str, path: &Path) -> Result<Option<Match>> {
    engine.load_from_file(path)?;

    let line = engine.lookup_first(sorted_key(pattern.as_bytes()))?;
    Ok(line.map(|line| Match { line, text: None }))
}
