//! Integration tests for promptfmt-core
//!
//! These tests drive a full compose session end-to-end: focusing a field,
//! opening the overlay, formatting through the toolbar and inserting the
//! resulting Markdown.

use promptfmt_core::surface::Position;
use promptfmt_core::{
    normalize, Config, EditCommand, FormatState, KeyChord, MemoryField, Session, TargetField,
    ToolbarButton,
};
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag};

/// Helper to create a session with an open overlay over `text`
fn open_session(text: &str) -> Session<MemoryField> {
    let mut session = Session::new(Config::default());
    assert!(session.focus(MemoryField::text_area(text)));
    assert!(session.handle_shortcut(&KeyChord::alt('a')));
    session
}

fn type_text(session: &mut Session<MemoryField>, text: &str) -> FormatState {
    session.exec(EditCommand::InsertText(text.to_string()))
}

/// Opening tags in a Markdown document, in order
fn start_tags(markdown: &str) -> Vec<String> {
    Parser::new(markdown)
        .filter_map(|event| match event {
            Event::Start(Tag::Heading { level, .. }) => Some(format!("{level:?}")),
            Event::Start(Tag::List(None)) => Some("ul".to_string()),
            Event::Start(Tag::Item) => Some("li".to_string()),
            Event::Start(Tag::Strong) => Some("strong".to_string()),
            Event::Start(Tag::Emphasis) => Some("em".to_string()),
            Event::Start(Tag::Paragraph) => Some("p".to_string()),
            _ => None,
        })
        .collect()
}

#[test]
fn integration_compose_formatted_prompt() {
    let mut session = open_session("");

    session.click(ToolbarButton::H2);
    type_text(&mut session, "Task");
    session.exec(EditCommand::InsertParagraph);

    type_text(&mut session, "Please ");
    session.click(ToolbarButton::Bold);
    type_text(&mut session, "carefully");
    session.click(ToolbarButton::Bold);
    type_text(&mut session, " review:");
    session.exec(EditCommand::InsertParagraph);

    session.click(ToolbarButton::List);
    type_text(&mut session, "the parser\nthe tests");

    let markdown = session.insert().expect("target is set");
    assert_eq!(
        markdown,
        "## Task\n\nPlease **carefully** review:\n- the parser\n- the tests"
    );

    let target = session.target().unwrap();
    assert_eq!(target.value(), markdown);
    assert_eq!(target.input_events(), 1);
    assert!(!session.is_open());
}

#[test]
fn integration_markdown_parses_to_intended_structure() {
    let mut session = open_session("");
    session.click(ToolbarButton::H1);
    type_text(&mut session, "Title");
    session.exec(EditCommand::InsertParagraph);
    session.click(ToolbarButton::Italic);
    type_text(&mut session, "note");
    session.click(ToolbarButton::Italic);
    session.exec(EditCommand::InsertParagraph);
    session.click(ToolbarButton::List);
    type_text(&mut session, "one\ntwo");

    let markdown = session.insert().unwrap();
    assert_eq!(
        start_tags(&markdown),
        vec![
            format!("{:?}", HeadingLevel::H1),
            "p".to_string(),
            "em".to_string(),
            "ul".to_string(),
            "li".to_string(),
            "li".to_string(),
        ]
    );
}

#[test]
fn integration_toolbar_tracks_cursor() {
    let mut session = open_session("plain line\nheading line");

    session.surface_mut().set_caret(Position::new(1, 3));
    let state = session.click(ToolbarButton::H3);
    assert!(state.h3);
    assert_eq!(state.active_ids(), vec!["h3"]);

    session.surface_mut().set_caret(Position::new(0, 2));
    assert_eq!(session.toolbar_state(), FormatState::default());

    session
        .surface_mut()
        .select(Position::new(0, 0), Position::new(0, 5));
    let state = session.click(ToolbarButton::Bold);
    assert_eq!(
        state,
        FormatState {
            bold: true,
            ..Default::default()
        }
    );
}

#[test]
fn integration_existing_text_round_trips_unchanged() {
    let mut session = open_session("first line\nsecond line");
    assert_eq!(session.insert().as_deref(), Some("first line\nsecond line"));
}

#[test]
fn integration_special_characters_survive() {
    let mut session = open_session("");
    type_text(&mut session, "if a < b && c > d { x }");
    assert_eq!(session.insert().as_deref(), Some("if a < b && c > d { x }"));
}

#[test]
fn integration_tab_indent_is_kept() {
    let mut session = open_session("");
    session.handle_tab();
    type_text(&mut session, "indented");
    session.exec(EditCommand::InsertParagraph);
    type_text(&mut session, "flush");

    // Leading whitespace of the whole document is trimmed, inner lines keep theirs
    assert_eq!(session.insert().as_deref(), Some("indented\nflush"));

    let mut session = open_session("top");
    session.exec(EditCommand::InsertParagraph);
    session.handle_tab();
    type_text(&mut session, "nested");
    assert_eq!(session.insert().as_deref(), Some("top\n    nested"));
}

#[test]
fn integration_browser_markup() {
    // Markup as a contenteditable element produces it
    let markup = "Intro text<div><b>Bold</b>&nbsp;and <i>italic</i></div><ul><li>first</li><li>second</li></ul><div><br></div>";
    assert_eq!(
        normalize(markup),
        "Intro text\n**Bold** and *italic*\n- first\n- second"
    );
}
