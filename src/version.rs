/*============================================================
  Synavera Project: Syn-Vercheck
  Module: synvercheck_core::version
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Lex apk-style package version strings into tagged tokens
    and fold them into an immutable, orderable Version value.

  Security / Safety Notes:
    Pure parsing; no I/O. Only ASCII input is accepted, so all
    offsets reported in errors are valid char boundaries.

  Dependencies:
    thiserror for parse diagnostics.

  Operational Scope:
    Used by the comparator, the policy engine, and the
    `compare` / `validate` CLI utilities.

  Revision History:
    2026-10-16 COD  Authored version lexer and value type.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Malformed input is an error, never a silent ordering
    - Data-driven suffix precedence table
    - Raw text preserved for deterministic display
============================================================*/

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use thiserror::Error;

use crate::vercmp;

/// Reasons a version string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("Empty version string")]
    Empty,
    #[error("Version `{version}` must start with a digit")]
    LeadingNonDigit { version: String },
    #[error("Version `{version}` carries unknown suffix `{suffix}`")]
    UnknownSuffix { version: String, suffix: String },
    #[error("Version `{version}` carries invalid revision `{revision}`")]
    InvalidRevision { version: String, revision: String },
    #[error("Version `{version}` has unexpected {found} at offset {offset}")]
    Unexpected {
        version: String,
        found: String,
        offset: usize,
    },
    #[error("pkgver `{pkgver}` must not embed a `-r<N>` revision")]
    EmbeddedRevision { pkgver: String },
}

/// Arbitrary-precision non-negative integer kept as a normalised digit string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Numeric(String);

impl Numeric {
    fn from_digits(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            Self::zero()
        } else {
            Numeric(trimmed.to_string())
        }
    }

    pub fn zero() -> Self {
        Numeric("0".to_string())
    }

    pub fn is_zero(&self) -> bool {
        self.0 == "0"
    }
}

impl Ord for Numeric {
    fn cmp(&self, other: &Self) -> Ordering {
        // No leading zeros, so a longer digit string is a larger number.
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Numeric {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Named suffix groups recognised after `_` or a multi-letter run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuffixKind {
    Alpha,
    Beta,
    Pre,
    Rc,
    Cvs,
    Svn,
    Git,
    Hg,
    P,
}

/// Keyword and precedence of each suffix, indexed by discriminant.
/// A plain release ranks 0; negative ranks are pre-releases.
const SUFFIX_TABLE: [(SuffixKind, &str, i8); 9] = [
    (SuffixKind::Alpha, "alpha", -4),
    (SuffixKind::Beta, "beta", -3),
    (SuffixKind::Pre, "pre", -2),
    (SuffixKind::Rc, "rc", -1),
    (SuffixKind::Cvs, "cvs", 1),
    (SuffixKind::Svn, "svn", 2),
    (SuffixKind::Git, "git", 3),
    (SuffixKind::Hg, "hg", 4),
    (SuffixKind::P, "p", 5),
];

/// Rank of a version with no suffix group at a given position.
pub const RELEASE_RANK: i8 = 0;

impl SuffixKind {
    /// Look up a suffix by its exact keyword.
    pub fn from_keyword(word: &str) -> Option<Self> {
        SUFFIX_TABLE
            .iter()
            .find(|(_, keyword, _)| *keyword == word)
            .map(|(kind, _, _)| *kind)
    }

    pub fn rank(self) -> i8 {
        SUFFIX_TABLE[self as usize].2
    }
}

/// Lexical unit of a version string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Numeric(Numeric),
    Letter(char),
    Suffix(SuffixKind, Numeric),
    Revision(u64),
    Build(String),
}

/// One dotted component of the version core, e.g. `0a` in `1.0a`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoreSegment {
    pub number: Numeric,
    pub letter: Option<char>,
}

impl CoreSegment {
    fn is_padding(&self) -> bool {
        self.number.is_zero() && self.letter.is_none()
    }
}

/// A suffix keyword with its counter (`rc2`, `git20240101`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SuffixGroup {
    pub kind: SuffixKind,
    pub counter: Numeric,
}

/// Split a version string into tokens.
pub fn tokenize(raw: &str) -> Result<Vec<Token>, VersionError> {
    Lexer::new(raw).run()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Number,
    Letter,
    Suffix,
    Revision,
    Build,
}

struct Lexer<'a> {
    raw: &'a str,
    bytes: &'a [u8],
    pos: usize,
    tokens: Vec<Token>,
    seen_revision: bool,
    seen_build: bool,
}

impl<'a> Lexer<'a> {
    fn new(raw: &'a str) -> Self {
        Self {
            raw,
            bytes: raw.as_bytes(),
            pos: 0,
            tokens: Vec::new(),
            seen_revision: false,
            seen_build: false,
        }
    }

    fn run(mut self) -> Result<Vec<Token>, VersionError> {
        match self.peek() {
            None => return Err(VersionError::Empty),
            Some(byte) if !byte.is_ascii_digit() => {
                return Err(VersionError::LeadingNonDigit {
                    version: self.raw.to_string(),
                })
            }
            Some(_) => {}
        }

        let mut state = self.numeric()?;
        while let Some(byte) = self.peek() {
            state = match (state, byte) {
                (State::Number | State::Letter, b'.') => {
                    self.pos += 1;
                    self.numeric()?
                }
                (State::Number, b'a'..=b'z') => self.letters()?,
                (State::Number | State::Letter | State::Suffix, b'_') => {
                    self.pos += 1;
                    self.underscore_suffix()?
                }
                (State::Number | State::Letter | State::Suffix | State::Build, b'-') => {
                    self.revision()?
                }
                (State::Number | State::Letter | State::Suffix | State::Revision, b'~') => {
                    self.build()?
                }
                _ => return Err(self.unexpected()),
            };
        }
        Ok(self.tokens)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        &self.raw[start..self.pos]
    }

    fn unexpected(&self) -> VersionError {
        let found = match self.raw[self.pos..].chars().next() {
            Some(ch) => format!("character `{ch}`"),
            None => "end of input".to_string(),
        };
        VersionError::Unexpected {
            version: self.raw.to_string(),
            found,
            offset: self.pos,
        }
    }

    fn numeric(&mut self) -> Result<State, VersionError> {
        let digits = self.take_while(|b| b.is_ascii_digit());
        if digits.is_empty() {
            return Err(self.unexpected());
        }
        self.tokens.push(Token::Numeric(Numeric::from_digits(digits)));
        Ok(State::Number)
    }

    /// Letters glued to a number: one letter is a patch tier, more open a suffix.
    fn letters(&mut self) -> Result<State, VersionError> {
        let run = self.take_while(|b| b.is_ascii_lowercase());
        let mut chars = run.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => {
                self.tokens.push(Token::Letter(letter));
                Ok(State::Letter)
            }
            _ => self.suffix(run),
        }
    }

    fn underscore_suffix(&mut self) -> Result<State, VersionError> {
        let run = self.take_while(|b| b.is_ascii_lowercase());
        if run.is_empty() {
            return Err(self.unexpected());
        }
        self.suffix(run)
    }

    fn suffix(&mut self, keyword: &str) -> Result<State, VersionError> {
        let kind = SuffixKind::from_keyword(keyword).ok_or_else(|| VersionError::UnknownSuffix {
            version: self.raw.to_string(),
            suffix: keyword.to_string(),
        })?;
        let counter = self.take_while(|b| b.is_ascii_digit());
        self.tokens
            .push(Token::Suffix(kind, Numeric::from_digits(counter)));
        Ok(State::Suffix)
    }

    fn revision(&mut self) -> Result<State, VersionError> {
        if self.seen_revision || self.bytes.get(self.pos + 1) != Some(&b'r') {
            return Err(self.unexpected());
        }
        self.pos += 2;
        let start = self.pos;
        let digits = self.take_while(|b| b.is_ascii_digit());
        let invalid = || {
            let tail = &self.raw[start..];
            VersionError::InvalidRevision {
                version: self.raw.to_string(),
                revision: tail.split('~').next().unwrap_or(tail).to_string(),
            }
        };
        if digits.is_empty() || (digits.len() > 1 && digits.starts_with('0')) {
            return Err(invalid());
        }
        let value = digits.parse::<u64>().map_err(|_| invalid())?;
        if self.peek().is_some_and(|b| b != b'~') {
            return Err(invalid());
        }
        self.seen_revision = true;
        self.tokens.push(Token::Revision(value));
        Ok(State::Revision)
    }

    fn build(&mut self) -> Result<State, VersionError> {
        if self.seen_build {
            return Err(self.unexpected());
        }
        self.pos += 1;
        let marker = self.take_while(|b| b.is_ascii_alphanumeric());
        if marker.is_empty() {
            return Err(self.unexpected());
        }
        self.seen_build = true;
        self.tokens.push(Token::Build(marker.to_string()));
        Ok(State::Build)
    }
}

/// Parsed package version. Equality and hashing follow the ordering, so
/// `1.0` and `1` are equal while still displaying as written.
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    core: Vec<CoreSegment>,
    suffixes: Vec<SuffixGroup>,
    revision: u64,
    build: Option<String>,
}

impl Version {
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        let mut core: Vec<CoreSegment> = Vec::new();
        let mut suffixes = Vec::new();
        let mut revision = 0;
        let mut build = None;

        for token in tokenize(raw)? {
            match token {
                Token::Numeric(number) => core.push(CoreSegment {
                    number,
                    letter: None,
                }),
                Token::Letter(letter) => {
                    if let Some(last) = core.last_mut() {
                        last.letter = Some(letter);
                    }
                }
                Token::Suffix(kind, counter) => suffixes.push(SuffixGroup { kind, counter }),
                Token::Revision(value) => revision = value,
                Token::Build(marker) => build = Some(marker),
            }
        }

        while core.last().is_some_and(CoreSegment::is_padding) {
            core.pop();
        }

        Ok(Self {
            raw: raw.to_string(),
            core,
            suffixes,
            revision,
            build,
        })
    }

    /// Build `<pkgver>-r<pkgrel>` from a pre-split recipe pair.
    pub fn from_parts(pkgver: &str, pkgrel: u64) -> Result<Self, VersionError> {
        if pkgver.is_empty() {
            return Err(VersionError::Empty);
        }
        if embeds_revision(pkgver) {
            return Err(VersionError::EmbeddedRevision {
                pkgver: pkgver.to_string(),
            });
        }
        Self::parse(&format!("{pkgver}-r{pkgrel}"))
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Core segments with trailing zero padding removed.
    pub fn core(&self) -> &[CoreSegment] {
        &self.core
    }

    pub fn suffixes(&self) -> &[SuffixGroup] {
        &self.suffixes
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The `~` marker text; never affects ordering.
    pub fn build(&self) -> Option<&str> {
        self.build.as_deref()
    }
}

fn embeds_revision(pkgver: &str) -> bool {
    pkgver
        .match_indices("-r")
        .any(|(idx, _)| pkgver[idx + 2..].starts_with(|c: char| c.is_ascii_digit()))
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        vercmp::compare(self, other)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.core.hash(state);
        self.suffixes.hash(state);
        self.revision.hash(state);
    }
}
