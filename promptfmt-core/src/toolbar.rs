//! Toolbar buttons of the compose overlay

use crate::format_state::FormatState;
use crate::surface::{BlockFormat, EditCommand, HeadingLevel};

/// A toggle button on the toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolbarButton {
    H1,
    H2,
    H3,
    Bold,
    Italic,
    List,
}

impl ToolbarButton {
    /// Buttons in display order
    pub const ALL: [ToolbarButton; 6] = [
        ToolbarButton::H1,
        ToolbarButton::H2,
        ToolbarButton::H3,
        ToolbarButton::Bold,
        ToolbarButton::Italic,
        ToolbarButton::List,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ToolbarButton::H1 => "h1",
            ToolbarButton::H2 => "h2",
            ToolbarButton::H3 => "h3",
            ToolbarButton::Bold => "bold",
            ToolbarButton::Italic => "italic",
            ToolbarButton::List => "list",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ToolbarButton::H1 => "Heading 1",
            ToolbarButton::H2 => "Heading 2",
            ToolbarButton::H3 => "Heading 3",
            ToolbarButton::Bold => "Bold",
            ToolbarButton::Italic => "Italic",
            ToolbarButton::List => "Bullet List",
        }
    }

    /// Command issued when the button is clicked
    pub fn command(self) -> EditCommand {
        match self {
            ToolbarButton::H1 => EditCommand::FormatBlock(BlockFormat::Heading(HeadingLevel::H1)),
            ToolbarButton::H2 => EditCommand::FormatBlock(BlockFormat::Heading(HeadingLevel::H2)),
            ToolbarButton::H3 => EditCommand::FormatBlock(BlockFormat::Heading(HeadingLevel::H3)),
            ToolbarButton::Bold => EditCommand::Bold,
            ToolbarButton::Italic => EditCommand::Italic,
            ToolbarButton::List => EditCommand::InsertUnorderedList,
        }
    }

    /// Look a button up by its id
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|button| button.id() == id)
    }
}

impl FormatState {
    /// Whether `button` should be drawn as active
    pub fn is_active(&self, button: ToolbarButton) -> bool {
        match button {
            ToolbarButton::H1 => self.h1,
            ToolbarButton::H2 => self.h2,
            ToolbarButton::H3 => self.h3,
            ToolbarButton::Bold => self.bold,
            ToolbarButton::Italic => self.italic,
            ToolbarButton::List => self.list,
        }
    }

    /// Ids of the active buttons, in display order
    pub fn active_ids(&self) -> Vec<&'static str> {
        ToolbarButton::ALL
            .into_iter()
            .filter(|&button| self.is_active(button))
            .map(ToolbarButton::id)
            .collect()
    }
}
