//! In-memory rich-text editing surface
//!
//! The surface holds a flat list of blocks (paragraphs, headings, list items)
//! built from styled text runs, plus a selection. Commands mirror the compose
//! toolbar, and [`RichTextSurface::to_markup`] emits exactly the vocabulary
//! that [`crate::markup::normalize`] understands:
//!
//! - every block sits in its own `<div>` line container, headings nested
//!   inside it as `<h1>`-`<h3>`
//! - consecutive list items are grouped in one `<ul>`
//! - bold and italic runs become `<b>` and `<i>`
//! - `&`, `<` and `>` in text are escaped

use crate::format_state::{Command, CommandState};

/// Heading levels the toolbar can apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Tag name, also used as the block format label
    pub fn tag(self) -> &'static str {
        match self {
            HeadingLevel::H1 => "h1",
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
        }
    }
}

/// Block-level format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockFormat {
    Paragraph,
    Heading(HeadingLevel),
    ListItem,
}

impl BlockFormat {
    /// Label reported by [`CommandState::current_block_format`]
    pub fn label(self) -> &'static str {
        match self {
            BlockFormat::Paragraph => "div",
            BlockFormat::Heading(level) => level.tag(),
            BlockFormat::ListItem => "li",
        }
    }
}

/// Inline styling of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Marks {
    pub bold: bool,
    pub italic: bool,
}

#[derive(Debug, Clone, Copy)]
enum InlineMark {
    Bold,
    Italic,
}

impl InlineMark {
    fn get(self, marks: Marks) -> bool {
        match self {
            InlineMark::Bold => marks.bold,
            InlineMark::Italic => marks.italic,
        }
    }

    fn set(self, marks: &mut Marks, value: bool) {
        match self {
            InlineMark::Bold => marks.bold = value,
            InlineMark::Italic => marks.italic = value,
        }
    }
}

/// Text sharing one set of marks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub marks: Marks,
}

/// A character together with its marks
type Cell = (char, Marks);

/// One line of content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub format: BlockFormat,
    pub runs: Vec<Run>,
}

impl Block {
    pub fn new(format: BlockFormat) -> Self {
        Self {
            format,
            runs: Vec::new(),
        }
    }

    /// Unstyled paragraph holding `text`
    pub fn paragraph(text: &str) -> Self {
        let mut block = Self::new(BlockFormat::Paragraph);
        block.set_cells(text.chars().map(|c| (c, Marks::default())));
        block
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.runs.iter().map(|run| run.text.chars().count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|run| run.text.is_empty())
    }

    /// Unstyled text content
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    fn cells(&self) -> Vec<Cell> {
        self.runs
            .iter()
            .flat_map(|run| run.text.chars().map(move |c| (c, run.marks)))
            .collect()
    }

    /// Rebuild runs, merging neighbours with identical marks
    fn set_cells(&mut self, cells: impl IntoIterator<Item = Cell>) {
        let mut runs: Vec<Run> = Vec::new();
        for (ch, marks) in cells {
            match runs.last_mut() {
                Some(run) if run.marks == marks => run.text.push(ch),
                _ => runs.push(Run {
                    text: ch.to_string(),
                    marks,
                }),
            }
        }
        self.runs = runs;
    }
}

/// A point in the content: block index and character offset within it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub block: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}

/// Selection between an anchor and the moving focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Position,
    pub focus: Position,
}

impl Selection {
    /// Collapsed selection at `pos`
    pub fn caret(pos: Position) -> Self {
        Self {
            anchor: pos,
            focus: pos,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Selection bounds as (start, end)
    pub fn range(&self) -> (Position, Position) {
        (self.anchor.min(self.focus), self.anchor.max(self.focus))
    }
}

/// Editing commands, as issued by the toolbar and keyboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    Bold,
    Italic,
    InsertUnorderedList,
    FormatBlock(BlockFormat),
    InsertText(String),
    InsertParagraph,
    SelectAll,
}

/// Rich-text editing surface backed by plain data
#[derive(Debug, Clone)]
pub struct RichTextSurface {
    /// Never empty
    blocks: Vec<Block>,
    selection: Selection,
    /// Marks applied to text typed at a collapsed caret
    typing: Marks,
}

impl Default for RichTextSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RichTextSurface {
    /// Empty surface with a single paragraph
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::new(BlockFormat::Paragraph)],
            selection: Selection::caret(Position::default()),
            typing: Marks::default(),
        }
    }

    /// Seed the surface with existing field text, one paragraph per line.
    /// The caret is placed at the end.
    pub fn from_plain_text(text: &str) -> Self {
        let blocks = text
            .split('\n')
            .map(|line| Block::paragraph(line.strip_suffix('\r').unwrap_or(line)))
            .collect();

        let mut surface = Self {
            blocks,
            ..Self::new()
        };
        surface.set_caret(surface.end());
        surface
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Unstyled text, blocks joined by newlines
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Position after the last character
    pub fn end(&self) -> Position {
        let block = self.blocks.len() - 1;
        Position::new(block, self.blocks[block].len())
    }

    pub fn set_caret(&mut self, pos: Position) {
        self.select(pos, pos);
    }

    /// Select from `anchor` to `focus`; out-of-range positions are clamped
    pub fn select(&mut self, anchor: Position, focus: Position) {
        self.selection = Selection {
            anchor: self.clamp(anchor),
            focus: self.clamp(focus),
        };
        self.typing = self.marks_before_focus();
    }

    /// Run an editing command against the current selection
    pub fn exec(&mut self, command: EditCommand) {
        log::debug!("surface exec {:?}", command);
        match command {
            EditCommand::Bold => self.toggle_mark(InlineMark::Bold),
            EditCommand::Italic => self.toggle_mark(InlineMark::Italic),
            EditCommand::InsertUnorderedList => self.toggle_list(),
            EditCommand::FormatBlock(format) => self.set_format(format),
            EditCommand::InsertText(text) => self.insert_text(&text),
            EditCommand::InsertParagraph => self.insert_paragraph(),
            EditCommand::SelectAll => self.select(Position::default(), self.end()),
        }
    }

    /// Serialize the content as editing-surface markup
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        let mut in_list = false;

        for block in &self.blocks {
            let is_item = block.format == BlockFormat::ListItem;
            if is_item && !in_list {
                out.push_str("<ul>");
            } else if !is_item && in_list {
                out.push_str("</ul>");
            }
            in_list = is_item;

            let inline = inline_markup(block);
            match block.format {
                BlockFormat::Paragraph => out.push_str(&format!("<div>{inline}</div>")),
                BlockFormat::Heading(level) => {
                    let tag = level.tag();
                    out.push_str(&format!("<div><{tag}>{inline}</{tag}></div>"));
                }
                BlockFormat::ListItem => out.push_str(&format!("<li>{inline}</li>")),
            }
        }

        if in_list {
            out.push_str("</ul>");
        }
        out
    }

    fn clamp(&self, pos: Position) -> Position {
        let block = pos.block.min(self.blocks.len() - 1);
        Position::new(block, pos.offset.min(self.blocks[block].len()))
    }

    /// Marks of the character before the focus (or the first one at offset 0)
    fn marks_before_focus(&self) -> Marks {
        let focus = self.selection.focus;
        self.blocks[focus.block]
            .cells()
            .get(focus.offset.saturating_sub(1))
            .map(|&(_, marks)| marks)
            .unwrap_or_default()
    }

    /// Character span of block `index` covered by `start..end`
    fn span_in(&self, index: usize, start: Position, end: Position) -> (usize, usize) {
        let from = if index == start.block { start.offset } else { 0 };
        let to = if index == end.block {
            end.offset
        } else {
            self.blocks[index].len()
        };
        (from, to)
    }

    fn selected_cells(&self) -> Vec<Cell> {
        let (start, end) = self.selection.range();
        (start.block..=end.block)
            .flat_map(|index| {
                let (from, to) = self.span_in(index, start, end);
                self.blocks[index].cells()[from..to].to_vec()
            })
            .collect()
    }

    fn mark_active(&self, mark: InlineMark) -> bool {
        let cells = self.selected_cells();
        if cells.is_empty() {
            mark.get(self.typing)
        } else {
            cells.iter().all(|&(_, marks)| mark.get(marks))
        }
    }

    fn toggle_mark(&mut self, mark: InlineMark) {
        let value = !self.mark_active(mark);
        mark.set(&mut self.typing, value);

        let (start, end) = self.selection.range();
        for index in start.block..=end.block {
            let (from, to) = self.span_in(index, start, end);
            let block = &mut self.blocks[index];
            let mut cells = block.cells();
            for cell in &mut cells[from..to] {
                mark.set(&mut cell.1, value);
            }
            block.set_cells(cells);
        }
    }

    fn toggle_list(&mut self) {
        let (start, end) = self.selection.range();
        let all_items = self.blocks[start.block..=end.block]
            .iter()
            .all(|block| block.format == BlockFormat::ListItem);

        if all_items {
            self.set_format(BlockFormat::Paragraph);
        } else {
            self.set_format(BlockFormat::ListItem);
        }
    }

    fn set_format(&mut self, format: BlockFormat) {
        let (start, end) = self.selection.range();
        for block in &mut self.blocks[start.block..=end.block] {
            block.format = format;
        }
    }

    fn insert_text(&mut self, text: &str) {
        self.delete_selection();

        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.insert_paragraph();
            }

            let pos = self.selection.focus;
            let typing = self.typing;
            let block = &mut self.blocks[pos.block];
            let mut cells = block.cells();
            let inserted: Vec<Cell> = line
                .chars()
                .filter(|&c| c != '\r')
                .map(|c| (c, typing))
                .collect();
            let count = inserted.len();
            cells.splice(pos.offset..pos.offset, inserted);
            block.set_cells(cells);

            self.selection = Selection::caret(Position::new(pos.block, pos.offset + count));
        }
    }

    fn insert_paragraph(&mut self) {
        self.delete_selection();

        let pos = self.selection.focus;
        let current = &mut self.blocks[pos.block];

        // Enter on an empty list item leaves the list
        if current.format == BlockFormat::ListItem && current.is_empty() {
            current.format = BlockFormat::Paragraph;
            return;
        }

        let mut cells = current.cells();
        let tail = cells.split_off(pos.offset);
        let format = match current.format {
            BlockFormat::Heading(_) if tail.is_empty() => BlockFormat::Paragraph,
            other => other,
        };
        current.set_cells(cells);

        let mut next = Block::new(format);
        next.set_cells(tail);
        self.blocks.insert(pos.block + 1, next);
        self.selection = Selection::caret(Position::new(pos.block + 1, 0));
    }

    fn delete_selection(&mut self) {
        if self.selection.is_collapsed() {
            return;
        }

        let (start, end) = self.selection.range();
        let tail = self.blocks[end.block].cells().split_off(end.offset);
        let mut cells = self.blocks[start.block].cells();
        cells.truncate(start.offset);
        cells.extend(tail);
        self.blocks[start.block].set_cells(cells);
        self.blocks.drain(start.block + 1..=end.block);

        self.selection = Selection::caret(start);
    }
}

impl CommandState for RichTextSurface {
    fn is_active(&self, command: Command) -> bool {
        match command {
            Command::Bold => self.mark_active(InlineMark::Bold),
            Command::Italic => self.mark_active(InlineMark::Italic),
            Command::InsertUnorderedList => {
                self.blocks[self.selection.focus.block].format == BlockFormat::ListItem
            }
        }
    }

    fn current_block_format(&self) -> String {
        self.blocks[self.selection.focus.block]
            .format
            .label()
            .to_string()
    }
}

/// Inline markup of a block, `<br>` placeholder when empty
fn inline_markup(block: &Block) -> String {
    if block.is_empty() {
        return "<br>".to_string();
    }

    let mut out = String::new();
    let mut open = Marks::default();

    for run in &block.runs {
        // Italic nests inside bold, so it closes whenever bold changes
        if open.italic && (!run.marks.italic || open.bold != run.marks.bold) {
            out.push_str("</i>");
            open.italic = false;
        }
        if open.bold != run.marks.bold {
            out.push_str(if open.bold { "</b>" } else { "<b>" });
            open.bold = run.marks.bold;
        }
        if run.marks.italic && !open.italic {
            out.push_str("<i>");
            open.italic = true;
        }
        escape_into(&mut out, &run.text);
    }

    if open.italic {
        out.push_str("</i>");
    }
    if open.bold {
        out.push_str("</b>");
    }
    out
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}
