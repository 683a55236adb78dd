//! Character reference decoding for residual markup text
//!
//! Text is run through the html5ever tokenizer in the RCDATA state, which is
//! how a `<textarea>` reads its contents: every named and numeric reference
//! resolves (including the legacy Windows-1252 remaps such as `&#150;`),
//! while anything that looks like a tag stays literal text.

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::{RawKind, State};
use html5ever::tokenizer::{
    BufferQueue, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use std::borrow::Cow;
use std::cell::RefCell;

/// Collects the character data emitted by the tokenizer
#[derive(Default)]
struct TextSink {
    text: RefCell<String>,
}

impl TokenSink for TextSink {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::CharacterTokens(chars) => self.text.borrow_mut().push_str(&chars),
            Token::NullCharacterToken => self.text.borrow_mut().push('\u{fffd}'),
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

/// Decode character references (`&amp;`, `&copy;`, `&#39;`, `&#x2014;`, ...) into literal characters.
///
/// Unknown references are copied through verbatim. Decoding is a single
/// pass, so `&amp;lt;` becomes `&lt;` and not `<`.
pub fn decode(text: &str) -> Cow<'_, str> {
    // Without these the tokenizer would hand the input back unchanged
    if !text.contains(['&', '\r', '\0']) {
        return Cow::Borrowed(text);
    }

    let input = BufferQueue::default();
    input.push_back(StrTendril::from_slice(text));

    let tokenizer = Tokenizer::new(
        TextSink::default(),
        TokenizerOpts {
            initial_state: Some(State::RawData(RawKind::Rcdata)),
            ..Default::default()
        },
    );
    let _ = tokenizer.feed(&input);
    tokenizer.end();

    Cow::Owned(tokenizer.sink.text.take())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_borrowed() {
        let decoded = decode("no references here");
        assert!(matches!(decoded, Cow::Borrowed(_)));
        assert_eq!(decoded, "no references here");
    }

    #[test]
    fn test_basic_named_references() {
        assert_eq!(decode("a &lt;b&gt; &amp; &quot;c&quot; &apos;d&apos;"), "a <b> & \"c\" 'd'");
        assert_eq!(decode("x&nbsp;y"), "x\u{a0}y");
    }

    #[test]
    fn test_full_named_reference_table() {
        assert_eq!(decode("&copy; 2024"), "\u{a9} 2024");
        assert_eq!(decode("a &mdash; b"), "a \u{2014} b");
        assert_eq!(decode("caf&eacute; &hellip;"), "caf\u{e9} \u{2026}");
    }

    #[test]
    fn test_numeric_references() {
        assert_eq!(decode("&#39;quoted&#39;"), "'quoted'");
        assert_eq!(decode("&#x2014;&#X41;"), "\u{2014}A");
    }

    #[test]
    fn test_windows_1252_remap() {
        assert_eq!(decode("&#150;"), "\u{2013}");
        assert_eq!(decode("&#x80;"), "\u{20ac}");
    }

    #[test]
    fn test_invalid_code_points_become_replacement() {
        assert_eq!(decode("&#0;"), "\u{fffd}");
        assert_eq!(decode("&#xD800;"), "\u{fffd}");
        assert_eq!(decode("&#x110000;"), "\u{fffd}");
    }

    #[test]
    fn test_unknown_references_pass_through() {
        assert_eq!(decode("fish & chips"), "fish & chips");
        assert_eq!(decode("&bogus;"), "&bogus;");
        assert_eq!(decode("&#;"), "&#;");
        assert_eq!(decode("trailing &"), "trailing &");
    }

    #[test]
    fn test_legacy_reference_without_semicolon() {
        assert_eq!(decode("&amp"), "&");
    }

    #[test]
    fn test_single_pass() {
        assert_eq!(decode("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_tags_stay_literal() {
        assert_eq!(decode("<b>x</b> &lt;"), "<b>x</b> <");
        assert_eq!(decode("</textarea> &amp;"), "</textarea> &");
    }

    #[test]
    fn test_carriage_returns_normalized() {
        assert_eq!(decode("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_multibyte_text_around_references() {
        assert_eq!(decode("héllo &amp; wörld"), "héllo & wörld");
    }
}
