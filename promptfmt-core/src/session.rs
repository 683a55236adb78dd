//! Compose session
//!
//! A [`Session`] owns everything the host needs between events: the field
//! that will receive the Markdown, whether the compose overlay is showing,
//! and the editing surface behind it. Hosts feed it focus changes, key
//! chords and toolbar clicks; [`Session::insert`] converts the surface and
//! writes the result back to the field.

use crate::config::Config;
use crate::format_state::{read_state, FormatState};
use crate::markup::normalize;
use crate::surface::{EditCommand, RichTextSurface};
use crate::toolbar::ToolbarButton;

/// Kind of page field that received focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    TextArea,
    /// Single-line text input
    TextInput,
    ContentEditable,
    Other,
}

impl FieldKind {
    pub fn is_editable(self) -> bool {
        !matches!(self, FieldKind::Other)
    }
}

/// A field that can receive composed text
pub trait TargetField {
    fn kind(&self) -> FieldKind;

    /// Current text content
    fn value(&self) -> String;

    /// Replace the whole content
    fn set_value(&mut self, value: &str);

    /// Tell listeners the content changed, as if the user had typed it
    fn notify_input(&mut self);
}

/// Target field kept in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryField {
    kind: FieldKind,
    value: String,
    input_events: usize,
}

impl MemoryField {
    pub fn new(kind: FieldKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            input_events: 0,
        }
    }

    pub fn text_area(value: impl Into<String>) -> Self {
        Self::new(FieldKind::TextArea, value)
    }

    /// Number of input notifications received
    pub fn input_events(&self) -> usize {
        self.input_events
    }
}

impl TargetField for MemoryField {
    fn kind(&self) -> FieldKind {
        self.kind
    }

    fn value(&self) -> String {
        self.value.clone()
    }

    fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    fn notify_input(&mut self) {
        self.input_events += 1;
    }
}

/// A key press with its modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub key: char,
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
}

impl KeyChord {
    pub fn plain(key: char) -> Self {
        Self {
            key,
            alt: false,
            ctrl: false,
            shift: false,
        }
    }

    pub fn alt(key: char) -> Self {
        Self {
            alt: true,
            ..Self::plain(key)
        }
    }
}

/// Host-side state of one compose overlay
#[derive(Debug)]
pub struct Session<F: TargetField> {
    config: Config,
    target: Option<F>,
    /// Kind of the field that most recently took focus
    focused: Option<FieldKind>,
    surface: RichTextSurface,
    open: bool,
}

impl<F: TargetField> Session<F> {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            target: None,
            focused: None,
            surface: RichTextSurface::new(),
            open: false,
        }
    }

    pub fn target(&self) -> Option<&F> {
        self.target.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn surface(&self) -> &RichTextSurface {
        &self.surface
    }

    /// Direct access for caret and selection changes
    pub fn surface_mut(&mut self) -> &mut RichTextSurface {
        &mut self.surface
    }

    /// Record `field` as the insertion target if it is editable.
    /// Non-editable fields leave the current target in place.
    pub fn focus(&mut self, field: F) -> bool {
        self.focused = Some(field.kind());
        if !field.kind().is_editable() {
            log::debug!("ignoring focus on non-editable {:?} field", field.kind());
            return false;
        }
        self.target = Some(field);
        true
    }

    /// Open the overlay if `chord` is the configured shortcut and the
    /// focused field is editable
    pub fn handle_shortcut(&mut self, chord: &KeyChord) -> bool {
        if !self.config.shortcut.matches(chord) {
            return false;
        }
        if !self.focused.is_some_and(FieldKind::is_editable) {
            log::debug!("shortcut ignored, focused field is not editable");
            return false;
        }
        self.open()
    }

    /// Show the overlay, seeding the surface with the target's current text.
    /// Does nothing without a target.
    pub fn open(&mut self) -> bool {
        let Some(target) = &self.target else {
            log::debug!("open requested without a target field");
            return false;
        };

        self.surface = RichTextSurface::from_plain_text(&target.value());
        self.open = true;
        log::debug!("overlay opened");
        true
    }

    /// Hide the overlay without writing anything
    pub fn close(&mut self) {
        if self.open {
            log::debug!("overlay closed");
        }
        self.open = false;
    }

    /// Run an editing command and return the refreshed toolbar state
    pub fn exec(&mut self, command: EditCommand) -> FormatState {
        self.surface.exec(command);
        self.toolbar_state()
    }

    pub fn click(&mut self, button: ToolbarButton) -> FormatState {
        self.exec(button.command())
    }

    /// Tab inserts the configured indent instead of moving focus
    pub fn handle_tab(&mut self) -> FormatState {
        let indent = self.config.editor.indent.clone();
        self.exec(EditCommand::InsertText(indent))
    }

    pub fn toolbar_state(&self) -> FormatState {
        read_state(&self.surface)
    }

    /// Convert the surface to Markdown, write it to the target and close the
    /// overlay. Returns the written text, or `None` when there is no target.
    pub fn insert(&mut self) -> Option<String> {
        let markdown = normalize(&self.surface.to_markup());
        let notify = self.config.insert.notify;

        let written = self.target.as_mut().map(|target| {
            target.set_value(&markdown);
            if notify {
                target.notify_input();
            }
            markdown
        });

        self.close();
        written
    }
}
