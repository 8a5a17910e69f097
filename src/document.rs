//! Documents and text loading.
//!
//! Only `.txt` and `.tex` files are read. Invalid UTF-8 is replaced, not
//! rejected. A directory is read as one document, its chapter files
//! concatenated with introductions first and conclusions last.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{KweError, Result};
use crate::text::{Token, Tokenizer};

pub const TEXT_EXTENSIONS: &[&str] = &["txt", "tex"];

/// Raw text plus its token sequence. Immutable once built.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    tokens: Vec<Token>,
    sentence_count: usize,
}

impl Document {
    /// Tokenize with the default (markup-aware) tokenizer
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_tokenizer(text, &Tokenizer::default())
    }

    pub fn with_tokenizer(text: impl Into<String>, tokenizer: &Tokenizer) -> Self {
        let text = text.into();
        let tokens = tokenizer.tokenize(&text);
        let sentence_count = tokens.last().map_or(0, |t| t.sentence + 1);
        Self {
            text,
            tokens,
            sentence_count,
        }
    }

    /// Read a file or a directory of chapter files.
    /// A single `.txt` file is tokenized as plain text.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = read_text(path)?;
        let tokenizer = if path.is_file() && has_extension(path, "txt") {
            Tokenizer::plain()
        } else {
            Tokenizer::default()
        };
        Ok(Self::with_tokenizer(text, &tokenizer))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn sentence_count(&self) -> usize {
        self.sentence_count
    }

    /// No word tokens at all
    pub fn is_empty(&self) -> bool {
        !self.tokens.iter().any(Token::is_term)
    }

    /// Iterate over token slices, one per sentence
    pub fn sentences(&self) -> impl Iterator<Item = &[Token]> {
        self.tokens.chunk_by(|a, b| a.sentence == b.sentence)
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// `.txt` or `.tex`, case-insensitive
pub fn has_text_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| TEXT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

fn read_lossy(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| KweError::input(path, e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read all text of a file or directory as one string.
pub fn read_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    if path.is_dir() {
        let mut names: Vec<String> = fs::read_dir(path)
            .map_err(|e| KweError::input(path, e.to_string()))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && has_text_extension(p))
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .collect();
        if names.is_empty() {
            return Err(KweError::input(path, "directory contains no .txt or .tex files"));
        }
        sort_chapters(&mut names);
        debug!(dir = %path.display(), files = names.len(), "reading chapter files");

        let mut fulltext = String::new();
        for name in &names {
            match read_lossy(&path.join(name)) {
                Ok(text) => {
                    fulltext.push_str(&text);
                    fulltext.push_str("\n\n");
                }
                Err(e) => warn!("skipping unreadable file: {e}"),
            }
        }
        if fulltext.trim().is_empty() {
            warn!("no text found in {}", path.display());
        }
        Ok(fulltext)
    } else if path.is_file() {
        if !has_text_extension(path) {
            return Err(KweError::input(path, "only .txt and .tex files are supported"));
        }
        let text = read_lossy(path)?;
        if text.trim().is_empty() {
            warn!("no text found in {}", path.display());
        }
        Ok(text)
    } else {
        Err(KweError::input(path, "no such file or directory"))
    }
}

/// Read a corpus: one document per text file, or per top-level entry of a
/// directory (a subdirectory is one document). Entries are read in
/// parallel; the result keeps sorted path order. Empty entries are dropped.
pub fn read_corpus(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    if path.is_file() {
        let text = read_text(path)?;
        return Ok(if text.trim().is_empty() { Vec::new() } else { vec![text] });
    }
    if !path.is_dir() {
        return Err(KweError::input(path, "no such file or directory"));
    }

    let mut entries: Vec<PathBuf> = fs::read_dir(path)
        .map_err(|e| KweError::input(path, e.to_string()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir() || has_text_extension(p))
        .collect();
    entries.sort();

    let documents = entries
        .par_iter()
        .filter_map(|entry| match read_text(entry) {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => None,
            Err(e) => {
                warn!("skipping corpus entry: {e}");
                None
            }
        })
        .collect();
    Ok(documents)
}

/// Alphabetical, then introduction-like files moved to the front and
/// conclusions to the back. Term position matters to the graph stage.
pub fn sort_chapters(files: &mut Vec<String>) {
    files.sort();
    let is_intro = |f: &str| {
        let f = f.to_lowercase();
        f.contains("intro") || f.contains("einleitung") || f.contains('1')
    };
    let is_conclusion = |f: &str| f.to_lowercase().contains("conclusion");

    let (intros, rest): (Vec<String>, Vec<String>) =
        files.drain(..).partition(|f| is_intro(f));
    let (conclusions, middle): (Vec<String>, Vec<String>) =
        rest.into_iter().partition(|f| is_conclusion(f));
    files.extend(intros);
    files.extend(middle);
    files.extend(conclusions);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_chapters_moves_intro_first_and_conclusion_last() {
        let mut files = vec![
            "conclusion.tex".to_string(),
            "syntax.tex".to_string(),
            "introduction.tex".to_string(),
            "analysis.tex".to_string(),
        ];
        sort_chapters(&mut files);
        assert_eq!(
            files,
            vec!["introduction.tex", "analysis.tex", "syntax.tex", "conclusion.tex"]
        );
    }

    #[test]
    fn read_text_concatenates_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("02.tex"), "Second chapter.").unwrap();
        fs::write(dir.path().join("01-intro.tex"), "First chapter.").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();
        let text = read_text(dir.path()).unwrap();
        let first = text.find("First").unwrap();
        let second = text.find("Second").unwrap();
        assert!(first < second);
        assert!(!text.contains("ignored"));
    }

    #[test]
    fn read_text_rejects_missing_and_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = read_text(dir.path().join("nope.txt")).unwrap_err();
        assert_eq!(missing.kind(), crate::error::ErrorKind::Input);
        let md = dir.path().join("readme.md");
        fs::write(&md, "text").unwrap();
        assert!(read_text(&md).is_err());
        let empty_dir = tempfile::tempdir().unwrap();
        assert!(read_text(empty_dir.path()).is_err());
    }

    #[test]
    fn read_text_replaces_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("latin1.txt");
        fs::write(&p, b"caf\xe9 au lait").unwrap();
        let text = read_text(&p).unwrap();
        assert!(text.starts_with("caf"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn read_corpus_one_document_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "alpha text").unwrap();
        fs::write(dir.path().join("b.txt"), "   ").unwrap();
        let book = dir.path().join("book");
        fs::create_dir(&book).unwrap();
        fs::write(book.join("ch1.tex"), "chapter one").unwrap();
        fs::write(book.join("ch2.tex"), "chapter two").unwrap();
        let docs = read_corpus(dir.path()).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0], "alpha text");
        assert!(docs[1].contains("chapter one") && docs[1].contains("chapter two"));
    }

    #[test]
    fn txt_files_keep_text_after_percent() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("prices.txt");
        fs::write(&p, "Prices rose 50% while vowel harmony spread quickly.\nTone matters.").unwrap();
        let doc = Document::from_path(&p).unwrap();
        let words: Vec<&str> = doc.tokens().iter().map(|t| t.surface.as_str()).collect();
        assert!(words.contains(&"vowel") && words.contains(&"harmony"));

        // a .txt file is never read as LaTeX, even with backslashes in it
        let q = dir.path().join("notes.txt");
        fs::write(&q, "See C:\\temp for 20% of the files").unwrap();
        let doc = Document::from_path(&q).unwrap();
        assert!(doc.tokens().iter().any(|t| t.surface == "files"));

        let tex = dir.path().join("ch.tex");
        fs::write(&tex, "\\section{Tone} Tone matters. % draft note\nVowel harmony.").unwrap();
        let doc = Document::from_path(&tex).unwrap();
        assert!(!doc.tokens().iter().any(|t| t.surface == "draft"));
        assert!(doc.tokens().iter().any(|t| t.surface == "harmony"));
    }

    #[test]
    fn document_counts_sentences() {
        let doc = Document::new("One sentence. Another one here.");
        assert_eq!(doc.sentence_count(), 2);
        assert_eq!(doc.sentences().count(), 2);
        assert!(!doc.is_empty());
        assert!(Document::new("").is_empty());
        assert_eq!(Document::new("").sentence_count(), 0);
    }
}
