//! Character-level tokenizer for C#-style sources
//!
//! Splits a character stream into words, single-character punctuators,
//! quoted literals, comments, and newline markers. Tokens are plain strings;
//! their class is re-derived by inspection wherever a consumer needs it.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A lexical token. Newlines are the single-character token `"\n"`.
pub type Token = String;

#[derive(Debug, Error)]
pub enum LexError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unterminated block comment starting near line {line}")]
    UnterminatedComment { line: usize },
}

/// Tokenizer over an attached source.
///
/// Works a line at a time: each line is reduced front-to-back by extracting
/// the earliest of a line comment, a block comment, or a quoted literal,
/// and splitting the plain text around them into words and punctuators.
/// Block comments may consume further lines; running out of source inside
/// one is fatal for the attached file.
pub struct Tokenizer {
    lines: VecDeque<String>,
    pending: VecDeque<Token>,
    line_count: usize,
    return_comments: bool,
}

impl Tokenizer {
    /// Attaches to an in-memory source.
    pub fn from_source(source: &str) -> Self {
        let lines = source
            .split_inclusive('\n')
            .map(|line| line.replace('\r', ""))
            .collect();
        Self {
            lines,
            pending: VecDeque::new(),
            line_count: 0,
            return_comments: false,
        }
    }

    /// Attaches to a file on disk. An unreadable path is reported as
    /// [`LexError::Io`]; callers skip the file and continue their batch.
    pub fn from_path(path: &Path) -> Result<Self, LexError> {
        let source = fs::read_to_string(path).map_err(|source| LexError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_source(&source))
    }

    /// Selects whether comment tokens are surfaced or silently skipped.
    /// Defaults to skipping.
    pub fn return_comments(mut self, yes: bool) -> Self {
        self.return_comments = yes;
        self
    }

    /// Number of source lines consumed so far.
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Returns the next token, or `Ok(None)` once the source is exhausted.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        loop {
            if let Some(tok) = self.pending.pop_front() {
                if !self.return_comments && is_comment(&tok) {
                    continue;
                }
                return Ok(Some(tok));
            }
            if !self.fill()? {
                return Ok(None);
            }
        }
    }

    /// Tokenizes the next source line into the pending queue. Returns false
    /// once no lines remain.
    fn fill(&mut self) -> Result<bool, LexError> {
        let Some(line) = self.lines.pop_front() else {
            return Ok(false);
        };
        self.line_count += 1;
        let mut rest = normalize_raw_strings(&line);
        while !rest.is_empty() {
            rest = self.extract(rest)?;
        }
        Ok(true)
    }

    /// Extracts the leading construct of `rest` into the pending queue and
    /// returns the unprocessed remainder of the line.
    fn extract(&mut self, rest: String) -> Result<String, LexError> {
        let rest = rest.trim_start_matches([' ', '\t', '\x0c']);
        if rest.is_empty() {
            return Ok(String::new());
        }

        let markers = [
            rest.find("//"),
            rest.find("/*"),
            rest.find('"'),
            rest.find('\''),
        ];
        let earliest = markers.iter().flatten().copied().min();

        match earliest {
            None => {
                self.split_plain(rest);
                Ok(String::new())
            }
            Some(pos) if pos > 0 => {
                self.split_plain(&rest[..pos]);
                Ok(rest[pos..].to_string())
            }
            Some(_) => {
                if rest.starts_with("//") {
                    Ok(self.take_line_comment(rest))
                } else if rest.starts_with("/*") {
                    self.take_block_comment(rest.to_string())
                } else if rest.starts_with('"') {
                    Ok(self.take_quote(rest, '"'))
                } else {
                    Ok(self.take_quote(rest, '\''))
                }
            }
        }
    }

    /// A line comment runs to the end of the line; the newline that follows
    /// it stays in the stream as its own token.
    fn take_line_comment(&mut self, rest: &str) -> String {
        match rest.find('\n') {
            Some(nl) => {
                self.pending.push_back(rest[..nl].to_string());
                rest[nl..].to_string()
            }
            None => {
                self.pending.push_back(rest.to_string());
                String::new()
            }
        }
    }

    /// A block comment keeps consuming lines until its closer. Reaching end
    /// of source first is unrecoverable for this file.
    fn take_block_comment(&mut self, opening: String) -> Result<String, LexError> {
        let start_line = self.line_count;
        let mut comment = opening;
        loop {
            if let Some(pos) = comment[2..].find("*/") {
                let end = pos + 4; // past the opener offset and the closer
                self.pending.push_back(comment[..end].to_string());
                return Ok(comment[end..].to_string());
            }
            let Some(next) = self.lines.pop_front() else {
                return Err(LexError::UnterminatedComment { line: start_line });
            };
            self.line_count += 1;
            comment.push_str(&next);
        }
    }

    /// A quoted literal is one token, quotes included. A quote preceded by
    /// an odd number of backslashes is embedded, not closing, which settles
    /// the `\"` versus `\\"` cases.
    fn take_quote(&mut self, rest: &str, quote: char) -> String {
        let chars: Vec<char> = rest.chars().collect();
        for i in 1..chars.len() {
            if chars[i] == '\n' {
                // no closer on this line: surface what we have
                self.pending.push_back(chars[..i].iter().collect());
                return chars[i..].iter().collect();
            }
            if chars[i] == quote && backslash_run(&chars, i) % 2 == 0 {
                self.pending.push_back(chars[..=i].iter().collect());
                return chars[i + 1..].iter().collect();
            }
        }
        self.pending.push_back(rest.to_string());
        String::new()
    }

    /// Splits comment-free, quote-free text into words, punctuators, and
    /// newline tokens. Underscore counts as a word character.
    fn split_plain(&mut self, chunk: &str) {
        let mut word = String::new();
        for c in chunk.chars() {
            if is_word_char(c) {
                word.push(c);
                continue;
            }
            if !word.is_empty() {
                self.pending.push_back(std::mem::take(&mut word));
            }
            match c {
                ' ' | '\t' | '\x0c' | '\r' => {}
                '\n' => self.pending.push_back("\n".to_string()),
                punct => self.pending.push_back(punct.to_string()),
            }
        }
        if !word.is_empty() {
            self.pending.push_back(word);
        }
    }
}

/// Counts the backslashes immediately preceding `end`.
fn backslash_run(chars: &[char], end: usize) -> usize {
    let mut n = 0;
    while n < end && chars[end - 1 - n] == '\\' {
        n += 1;
    }
    n
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Is this token a line or block comment?
pub fn is_comment(tok: &str) -> bool {
    tok.len() > 1 && (tok.starts_with("//") || tok.starts_with("/*"))
}

/// Rewrites `@"..."` verbatim literals into conventional escaped literals,
/// doubling each backslash, so quote extraction sees a single syntax.
fn normalize_raw_strings(line: &str) -> String {
    if !line.contains("@\"") {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '@' && chars.peek() == Some(&'"') {
            chars.next();
            out.push('"');
            for c in chars.by_ref() {
                if c == '"' {
                    out.push('"');
                    break;
                }
                if c == '\\' {
                    out.push_str("\\\\");
                } else {
                    out.push(c);
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}
