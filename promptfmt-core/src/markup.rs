//! Markup to Markdown normalization
//!
//! The editing surface only ever produces a small, flat vocabulary of tags:
//! `div` line containers, `h1`-`h3`, `b`/`strong`, `i`/`em`, `ul`/`li`, `br`
//! and the `&nbsp;` entity. Converting it does not need a parser; an ordered
//! list of substitutions is enough:
//!
//! | Pass        | Matches                     | Becomes         |
//! |-------------|-----------------------------|-----------------|
//! | `div-open`  | `<div ...>`                 | newline         |
//! | `div-close` | `</div>`                    | (removed)       |
//! | `h1`..`h3`  | `<hN ...>text</hN>`         | `# text` + `\n` |
//! | `b` `strong`| `<b>text</b>`               | `**text**`      |
//! | `i` `em`    | `<i>text</i>`               | `*text*`        |
//! | `ul-open`   | `<ul>`                      | newline         |
//! | `ul-close`  | `</ul>`                     | (removed)       |
//! | `li-open`   | `<li>`                      | `- `            |
//! | `li-close`  | `</li>`                     | newline         |
//! | `nbsp`      | `&nbsp;`                    | space           |
//! | `br`        | `<br>`, `<br/>`, `<br />`   | newline         |
//!
//! After the passes, remaining character references are decoded and the
//! result is trimmed. Captured text never crosses a line terminator (`\n`,
//! `\r`, U+2028, U+2029), so a heading or mark split across lines is left
//! alone. Decoding has to come last: an escaped `&lt;b&gt;` in
//! the text must not turn into a tag that a later pass would match.
//!
//! Anything outside the vocabulary is left in the output as literal text.
//! Blank lines produced by adjacent separators are kept as-is.
//!
//! The transform is one-way. Feeding Markdown back through [`normalize`] is
//! not meaningful and nothing guarantees it is idempotent.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::entities;

/// A single substitution step
#[derive(Debug)]
pub struct Pass {
    /// Stable name, used in logs
    pub name: &'static str,
    pub pattern: Regex,
    /// Replacement template (`$1` refers to the wrapped content)
    pub replacement: &'static str,
}

impl Pass {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self {
            name,
            // Patterns are literals below; a failure here is a programming error
            pattern: Regex::new(pattern).expect("valid markup pattern"),
            replacement,
        }
    }

    /// Apply this pass to `input`, producing a new string
    pub fn apply(&self, input: &str) -> String {
        self.pattern
            .replace_all(input, self.replacement)
            .into_owned()
    }
}

/// Ordered list of substitution passes
#[derive(Debug)]
pub struct Pipeline {
    passes: Vec<Pass>,
}

static STANDARD: Lazy<Pipeline> = Lazy::new(Pipeline::build_standard);

impl Pipeline {
    /// The pipeline used by [`normalize`]
    pub fn standard() -> &'static Pipeline {
        &STANDARD
    }

    fn build_standard() -> Self {
        let passes = vec![
            Pass::new("div-open", r"<div[^>]*>", "\n"),
            Pass::new("div-close", r"</div>", ""),
            Pass::new("h1", r"(?i)<h1[^>]*>([^\r\n\x{2028}\x{2029}]*?)</h1>", "# ${1}\n"),
            Pass::new("h2", r"(?i)<h2[^>]*>([^\r\n\x{2028}\x{2029}]*?)</h2>", "## ${1}\n"),
            Pass::new("h3", r"(?i)<h3[^>]*>([^\r\n\x{2028}\x{2029}]*?)</h3>", "### ${1}\n"),
            Pass::new("b", r"(?i)<b>([^\r\n\x{2028}\x{2029}]*?)</b>", "**${1}**"),
            Pass::new("strong", r"(?i)<strong>([^\r\n\x{2028}\x{2029}]*?)</strong>", "**${1}**"),
            Pass::new("i", r"(?i)<i>([^\r\n\x{2028}\x{2029}]*?)</i>", "*${1}*"),
            Pass::new("em", r"(?i)<em>([^\r\n\x{2028}\x{2029}]*?)</em>", "*${1}*"),
            Pass::new("ul-open", r"(?i)<ul>", "\n"),
            Pass::new("ul-close", r"(?i)</ul>", ""),
            Pass::new("li-open", r"(?i)<li>", "- "),
            Pass::new("li-close", r"(?i)</li>", "\n"),
            Pass::new("nbsp", r"&nbsp;", " "),
            Pass::new("br", r"(?i)<br\s*/?>", "\n"),
        ];
        Self { passes }
    }

    /// Passes in application order
    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }

    /// Run every pass left to right. Each pass sees only the output of the
    /// one before it.
    pub fn apply(&self, markup: &str) -> String {
        self.passes.iter().fold(markup.to_string(), |text, pass| {
            let next = pass.apply(&text);
            if next != text {
                log::trace!("pass {} rewrote {} -> {} bytes", pass.name, text.len(), next.len());
            }
            next
        })
    }
}

/// Convert editing-surface markup into Markdown.
///
/// Best effort: malformed or unknown markup is never an error, it simply
/// passes through. Empty input yields an empty string.
pub fn normalize(markup: &str) -> String {
    let substituted = Pipeline::standard().apply(markup);
    entities::decode(&substituted)
        .trim_matches(is_edge_whitespace)
        .to_string()
}

/// Whitespace stripped from both ends of the result: Unicode white space
/// plus the byte order mark, without U+0085
fn is_edge_whitespace(c: char) -> bool {
    c == '\u{feff}' || (c.is_whitespace() && c != '\u{85}')
}
