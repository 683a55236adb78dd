//! Line-oriented editing scripts for `promptfmt replay`
//!
//! ```text
//! # comment
//! h1
//! text Release notes
//! enter
//! bold
//! text important
//! state
//! insert
//! ```

use anyhow::{bail, Context, Result};
use promptfmt_core::surface::{BlockFormat, EditCommand, Position};
use promptfmt_core::{MemoryField, Session, ToolbarButton};
use std::io::Write;

/// One script command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Edit(EditCommand),
    Button(ToolbarButton),
    Tab,
    Caret(Position),
    Select(Position, Position),
    State,
    Insert,
    Close,
}

/// Parse a script; blank lines and `#` comments are skipped
pub fn parse(source: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end();
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        let (name, rest) = match line.trim_start().split_once(' ') {
            Some((name, rest)) => (name, rest),
            None => (line.trim_start(), ""),
        };

        let step = match name {
            "text" => Step::Edit(EditCommand::InsertText(rest.to_string())),
            "enter" => Step::Edit(EditCommand::InsertParagraph),
            "paragraph" => Step::Edit(EditCommand::FormatBlock(BlockFormat::Paragraph)),
            "select-all" => Step::Edit(EditCommand::SelectAll),
            "tab" => Step::Tab,
            "state" => Step::State,
            "insert" => Step::Insert,
            "close" => Step::Close,
            "caret" => match numbers(rest, line_no)?.as_slice() {
                [block, offset] => Step::Caret(Position::new(*block, *offset)),
                _ => bail!("line {line_no}: caret takes <block> <offset>"),
            },
            "select" => match numbers(rest, line_no)?.as_slice() {
                [ab, ao, fb, fo] => Step::Select(Position::new(*ab, *ao), Position::new(*fb, *fo)),
                _ => bail!("line {line_no}: select takes <block> <offset> <block> <offset>"),
            },
            other => match ToolbarButton::from_id(other) {
                Some(button) => Step::Button(button),
                None => bail!("line {line_no}: unknown command '{other}'"),
            },
        };
        steps.push(step);
    }

    Ok(steps)
}

fn numbers(args: &str, line_no: usize) -> Result<Vec<usize>> {
    args.split_whitespace()
        .map(|arg| {
            arg.parse::<usize>()
                .with_context(|| format!("line {line_no}: '{arg}' is not a position"))
        })
        .collect()
}

/// Run `steps` against `session`, reporting `state` and `insert` results to `out`
pub fn run(session: &mut Session<MemoryField>, steps: &[Step], out: &mut impl Write) -> Result<()> {
    for step in steps {
        match step {
            Step::Edit(command) => {
                session.exec(command.clone());
            }
            Step::Button(button) => {
                session.click(*button);
            }
            Step::Tab => {
                session.handle_tab();
            }
            Step::Caret(pos) => session.surface_mut().set_caret(*pos),
            Step::Select(anchor, focus) => session.surface_mut().select(*anchor, *focus),
            Step::State => {
                let active = session.toolbar_state().active_ids();
                if active.is_empty() {
                    writeln!(out, "state: (none)")?;
                } else {
                    writeln!(out, "state: {}", active.join(" "))?;
                }
            }
            Step::Insert => match session.insert() {
                Some(markdown) => writeln!(out, "{markdown}")?,
                None => log::warn!("insert skipped: no target field"),
            },
            Step::Close => session.close(),
        }
    }

    Ok(())
}
