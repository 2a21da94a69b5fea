//! Syntax highlighting — the static language table and the per-row scanner.
//!
//! Highlighting is a small state machine re-run over a whole row on every
//! change. The only state that crosses row boundaries is whether a block
//! comment is still open at the end of a row; the document feeds each
//! row's output into the next row's scan and cascades re-scans while that
//! flag keeps changing.
//!
//! Language definitions are compiled in. A definition is selected once
//! per document from the filename — extension equality for patterns
//! starting with `.`, substring containment otherwise, first match wins.

use bitflags::bitflags;

use tedit_term::color::Color;

// ---------------------------------------------------------------------------
// Highlight classes
// ---------------------------------------------------------------------------

/// The syntax class of one render byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Normal,
    /// Single-line comment — runs to the end of the row.
    Comment,
    /// Block comment body or marker.
    MultilineComment,
    /// Primary keyword (`if`, `while`, `return`, ...).
    Keyword,
    /// Secondary keyword — type names (`int`, `u32`, ...).
    Type,
    /// String literal including its quotes and escapes.
    String,
    /// Numeric literal.
    Number,
    /// Search match overlay.
    Match,
}

impl Highlight {
    /// The foreground color this class paints with.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Normal => Color::Default,
            Self::Comment | Self::MultilineComment => Color::Ansi(6),
            Self::Keyword => Color::Ansi(3),
            Self::Type => Color::Ansi(2),
            Self::String => Color::Ansi(5),
            Self::Number => Color::Ansi(1),
            Self::Match => Color::Ansi(4),
        }
    }
}

bitflags! {
    /// Which optional token kinds a language definition highlights.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SyntaxFlags: u8 {
        /// Highlight numeric literals.
        const NUMBERS = 1 << 0;
        /// Highlight string literals.
        const STRINGS = 1 << 1;
    }
}

// ---------------------------------------------------------------------------
// Language definitions
// ---------------------------------------------------------------------------

/// A compiled-in language definition.
#[derive(Debug)]
pub struct SyntaxDef {
    /// Display name, shown in the status bar.
    pub name: &'static str,
    /// Filename patterns: `.ext` for extension equality, anything else
    /// matches by substring containment.
    pub file_match: &'static [&'static str],
    /// Primary keywords.
    pub keywords: &'static [&'static str],
    /// Secondary keywords (type names).
    pub types: &'static [&'static str],
    /// Single-line comment marker.
    pub line_comment: Option<&'static str>,
    /// Block comment start/end markers.
    pub block_comment: Option<(&'static str, &'static str)>,
    /// Optional token kinds to highlight.
    pub flags: SyntaxFlags,
}

/// The static language table. First filename match wins.
pub static SYNTAX_TABLE: &[SyntaxDef] = &[
    SyntaxDef {
        name: "c",
        file_match: &[".c", ".h", ".cpp"],
        keywords: &[
            "switch", "if", "while", "for", "break", "continue", "return", "else",
            "struct", "union", "typedef", "static", "enum", "class", "case",
        ],
        types: &[
            "int", "long", "double", "float", "char", "unsigned", "signed", "void",
        ],
        line_comment: Some("//"),
        block_comment: Some(("/*", "*/")),
        flags: SyntaxFlags::NUMBERS.union(SyntaxFlags::STRINGS),
    },
    SyntaxDef {
        name: "rust",
        file_match: &[".rs"],
        keywords: &[
            "fn", "let", "mut", "if", "else", "match", "loop", "while", "for",
            "return", "break", "continue", "use", "mod", "pub", "struct", "enum",
            "impl", "trait", "where", "const", "static", "unsafe", "move", "ref",
            "as", "in", "type",
        ],
        types: &[
            "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64",
            "u128", "usize", "f32", "f64", "bool", "char", "str", "String", "Vec",
            "Option", "Result", "Self",
        ],
        line_comment: Some("//"),
        block_comment: Some(("/*", "*/")),
        flags: SyntaxFlags::NUMBERS.union(SyntaxFlags::STRINGS),
    },
];

/// Select the language definition for a filename, or `None` to disable
/// highlighting.
#[must_use]
pub fn select(filename: &str) -> Option<&'static SyntaxDef> {
    for def in SYNTAX_TABLE {
        for pat in def.file_match {
            let matched = if pat.starts_with('.') {
                filename.ends_with(pat)
            } else {
                filename.contains(pat)
            };
            if matched {
                return Some(def);
            }
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// Whether a byte separates tokens: whitespace, NUL, or one of a fixed
/// punctuation set. Keyword and number recognition only trigger at
/// separator boundaries.
#[must_use]
pub fn is_separator(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == 0 || b",.()+-/*=~%<>[];".contains(&byte)
}

/// Run the highlight state machine over one row's render text.
///
/// Fills `hl` with one class per render byte. `starts_in_comment` is the
/// open-comment output of the previous row (false for row 0). Returns
/// whether a block comment is still open at the end of this row.
///
/// With no active definition every byte is [`Highlight::Normal`] and the
/// row never opens a comment.
pub fn scan(
    render: &[u8],
    hl: &mut Vec<Highlight>,
    syntax: Option<&SyntaxDef>,
    starts_in_comment: bool,
) -> bool {
    hl.clear();
    hl.resize(render.len(), Highlight::Normal);

    let Some(syntax) = syntax else {
        return false;
    };

    let line_comment = syntax.line_comment.map(str::as_bytes);
    let block_comment = syntax
        .block_comment
        .map(|(start, end)| (start.as_bytes(), end.as_bytes()));

    let mut prev_sep = true;
    let mut in_string: Option<u8> = None;
    let mut in_comment = starts_in_comment;

    let mut i = 0;
    while i < render.len() {
        let c = render[i];
        let prev_hl = if i > 0 { hl[i - 1] } else { Highlight::Normal };

        // Line comment: the rest of the row is one run.
        if let Some(marker) = line_comment {
            if in_string.is_none() && !in_comment && render[i..].starts_with(marker) {
                hl[i..].fill(Highlight::Comment);
                break;
            }
        }

        // Block comments take precedence over everything but strings.
        if let Some((start, end)) = block_comment {
            if in_string.is_none() {
                if in_comment {
                    hl[i] = Highlight::MultilineComment;
                    if render[i..].starts_with(end) {
                        hl[i..i + end.len()].fill(Highlight::MultilineComment);
                        i += end.len();
                        in_comment = false;
                        prev_sep = true;
                    } else {
                        i += 1;
                    }
                    continue;
                }
                if render[i..].starts_with(start) {
                    hl[i..i + start.len()].fill(Highlight::MultilineComment);
                    i += start.len();
                    in_comment = true;
                    continue;
                }
            }
        }

        if syntax.flags.contains(SyntaxFlags::STRINGS) {
            if let Some(quote) = in_string {
                hl[i] = Highlight::String;
                // A backslash escapes the next byte, including the quote.
                if c == b'\\' && i + 1 < render.len() {
                    hl[i + 1] = Highlight::String;
                    i += 2;
                    continue;
                }
                if c == quote {
                    in_string = None;
                }
                i += 1;
                prev_sep = true;
                continue;
            }
            if c == b'"' || c == b'\'' {
                in_string = Some(c);
                hl[i] = Highlight::String;
                i += 1;
                continue;
            }
        }

        if syntax.flags.contains(SyntaxFlags::NUMBERS)
            && ((c.is_ascii_digit() && (prev_sep || prev_hl == Highlight::Number))
                || (c == b'.' && prev_hl == Highlight::Number))
        {
            hl[i] = Highlight::Number;
            i += 1;
            prev_sep = false;
            continue;
        }

        if prev_sep {
            if let Some((len, class)) = match_keyword(syntax, &render[i..]) {
                hl[i..i + len].fill(class);
                i += len;
                prev_sep = false;
                continue;
            }
        }

        prev_sep = is_separator(c);
        i += 1;
    }

    in_comment
}

/// Match the longest keyword at the start of `rest` whose following byte
/// is a separator (or the end of the row).
fn match_keyword(syntax: &SyntaxDef, rest: &[u8]) -> Option<(usize, Highlight)> {
    let mut best: Option<(usize, Highlight)> = None;
    let lists = [
        (syntax.keywords, Highlight::Keyword),
        (syntax.types, Highlight::Type),
    ];
    for (list, class) in lists {
        for kw in list {
            let k = kw.as_bytes();
            if rest.starts_with(k)
                && rest.get(k.len()).is_none_or(|&b| is_separator(b))
                && best.is_none_or(|(best_len, _)| k.len() > best_len)
            {
                best = Some((k.len(), class));
            }
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
