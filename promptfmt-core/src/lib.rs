//! promptfmt core - markup normalization and editor format state
//!
//! This crate contains the logic behind the compose overlay, independent of
//! any particular host:
//! - Markup to Markdown normalization ([`markup::normalize`])
//! - Toolbar format state read from an editing surface ([`format_state::read_state`])
//! - An in-memory rich-text editing surface
//! - Compose session and configuration management

pub mod config;
pub mod entities;
pub mod format_state;
pub mod markup;
pub mod session;
pub mod surface;
pub mod toolbar;

// Re-export commonly used types
pub use config::Config;
pub use format_state::{read_state, Command, CommandState, FormatState};
pub use markup::normalize;
pub use session::{FieldKind, KeyChord, MemoryField, Session, TargetField};
pub use surface::{BlockFormat, EditCommand, HeadingLevel, RichTextSurface};
pub use toolbar::ToolbarButton;
