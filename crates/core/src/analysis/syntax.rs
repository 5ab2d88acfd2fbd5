//! Line-level recognition of labels, comments, calls, and returns.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::PipelineError;

static LABEL_PATTERN: OnceLock<Regex> = OnceLock::new();
static INSTRUCTION_PATTERN: OnceLock<Regex> = OnceLock::new();
static IDENTIFIER_PATTERN: OnceLock<Regex> = OnceLock::new();

fn label_pattern() -> &'static Regex {
    LABEL_PATTERN
        .get_or_init(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*):").expect("valid label pattern"))
}

fn instruction_pattern() -> &'static Regex {
    INSTRUCTION_PATTERN.get_or_init(|| {
        Regex::new(r"^([a-z]{3}|[A-Z]{3})(?:\s+(.*))?$").expect("valid instruction pattern")
    })
}

/// True for names usable as labels: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER_PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier pattern"))
        .is_match(name)
}

/// Mnemonics and comment syntax of the disassembly dialect.
///
/// Defaults describe a 6502 listing (`jsr` / `rts`, `;` comments).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsmSyntax {
    pub call_mnemonics: Vec<String>,
    pub return_mnemonics: Vec<String>,
    pub comment_prefix: String,
}

impl Default for AsmSyntax {
    fn default() -> Self {
        Self {
            call_mnemonics: vec!["jsr".to_string()],
            return_mnemonics: vec!["rts".to_string()],
            comment_prefix: ";".to_string(),
        }
    }
}

/// What a single line means to the boundary walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Comment,
    Label(&'a str),
    Return,
    Instruction { mnemonic: &'a str },
    /// Directives, data, assignments: part of the body but not counted.
    Other,
}

/// Compiled form of an [`AsmSyntax`].
#[derive(Debug, Clone)]
pub struct LineMatcher {
    call_pattern: Regex,
    call_mnemonics: HashSet<String>,
    return_mnemonics: HashSet<String>,
    comment_prefix: String,
}

impl LineMatcher {
    pub fn new(syntax: &AsmSyntax) -> Result<Self, PipelineError> {
        if syntax.call_mnemonics.is_empty() {
            return Err(PipelineError::InvalidSyntax("no call mnemonics configured".into()));
        }
        if syntax.return_mnemonics.is_empty() {
            return Err(PipelineError::InvalidSyntax("no return mnemonics configured".into()));
        }
        if syntax.comment_prefix.is_empty() {
            return Err(PipelineError::InvalidSyntax("comment prefix must not be empty".into()));
        }

        let alternation = syntax
            .call_mnemonics
            .iter()
            .map(|m| regex::escape(m.trim()))
            .collect::<Vec<_>>()
            .join("|");
        let call_pattern =
            Regex::new(&format!(r"(?i:\b(?:{alternation}))\s+([A-Za-z_][A-Za-z0-9_]*)"))
                .map_err(|e| PipelineError::InvalidSyntax(e.to_string()))?;

        Ok(Self {
            call_pattern,
            call_mnemonics: syntax.call_mnemonics.iter().map(|m| m.trim().to_lowercase()).collect(),
            return_mnemonics: syntax
                .return_mnemonics
                .iter()
                .map(|m| m.trim().to_lowercase())
                .collect(),
            comment_prefix: syntax.comment_prefix.clone(),
        })
    }

    /// Text before the comment prefix (the whole line when there is none).
    pub fn code_part<'a>(&self, line: &'a str) -> &'a str {
        match line.find(self.comment_prefix.as_str()) {
            Some(idx) => &line[..idx],
            None => line,
        }
    }

    /// Label defined at the very start of a raw line, if any.
    pub fn label_at_line_start<'a>(&self, line: &'a str) -> Option<&'a str> {
        label_pattern().captures(line).and_then(|c| c.get(1)).map(|m| m.as_str())
    }

    /// All call operands in the code part of a line.
    pub fn call_targets<'a>(&self, line: &'a str) -> Vec<&'a str> {
        let code = self.code_part(line);
        self.call_pattern
            .captures_iter(code)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .collect()
    }

    pub fn is_call_mnemonic(&self, mnemonic: &str) -> bool {
        self.call_mnemonics.contains(&mnemonic.to_lowercase())
    }

    pub fn is_return_mnemonic(&self, mnemonic: &str) -> bool {
        self.return_mnemonics.contains(&mnemonic.to_lowercase())
    }

    /// Classify a raw line for the boundary walk. Leading whitespace is ignored,
    /// so indented labels still terminate a body.
    pub fn classify<'a>(&self, line: &'a str) -> LineKind<'a> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return LineKind::Blank;
        }
        if trimmed.starts_with(self.comment_prefix.as_str()) {
            return LineKind::Comment;
        }
        if let Some(name) = self.label_at_line_start(trimmed) {
            return LineKind::Label(name);
        }

        let code = self.code_part(trimmed).trim_end();
        // Configured mnemonics are recognized at any length.
        if let Some(first) = code.split_whitespace().next() {
            if self.is_return_mnemonic(first) {
                return LineKind::Return;
            }
            if self.is_call_mnemonic(first) {
                return LineKind::Instruction { mnemonic: first };
            }
        }

        let Some(caps) = instruction_pattern().captures(code) else {
            return LineKind::Other;
        };
        let Some(mnemonic) = caps.get(1).map(|m| m.as_str()) else {
            return LineKind::Other;
        };
        let operand = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
        if operand.starts_with('=') {
            return LineKind::Other;
        }
        if self.is_return_mnemonic(mnemonic) {
            LineKind::Return
        } else {
            LineKind::Instruction { mnemonic }
        }
    }
}
