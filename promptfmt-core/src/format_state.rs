//! Toolbar format state derived from an editing surface

/// Formatting commands whose state can be queried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Bold,
    Italic,
    InsertUnorderedList,
}

/// Command-state queries an editing surface answers for the current selection
pub trait CommandState {
    /// Whether `command` applies at the current selection
    fn is_active(&self, command: Command) -> bool;

    /// Tag-like label of the block containing the selection (e.g. "h2", "div")
    fn current_block_format(&self) -> String;

    /// Whether the surface can answer queries at all.
    /// When this is false, [`read_state`] reports nothing as active.
    fn supports_queries(&self) -> bool {
        true
    }
}

/// Snapshot of which formats apply at the cursor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatState {
    pub bold: bool,
    pub italic: bool,
    pub list: bool,
    pub h1: bool,
    pub h2: bool,
    pub h3: bool,
}

/// Read the format state of `surface` at its current selection.
///
/// Heading flags come from a substring match on the block format label.
pub fn read_state<S: CommandState + ?Sized>(surface: &S) -> FormatState {
    if !surface.supports_queries() {
        return FormatState::default();
    }

    let block = surface.current_block_format();

    FormatState {
        bold: surface.is_active(Command::Bold),
        italic: surface.is_active(Command::Italic),
        list: surface.is_active(Command::InsertUnorderedList),
        h1: block.contains("h1"),
        h2: block.contains("h2"),
        h3: block.contains("h3"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Surface stub that reports a fixed answer set
    struct Fixed {
        active: Vec<Command>,
        block: &'static str,
        available: bool,
    }

    impl CommandState for Fixed {
        fn is_active(&self, command: Command) -> bool {
            self.active.contains(&command)
        }

        fn current_block_format(&self) -> String {
            self.block.to_string()
        }

        fn supports_queries(&self) -> bool {
            self.available
        }
    }

    fn fixed(active: Vec<Command>, block: &'static str) -> Fixed {
        Fixed {
            active,
            block,
            available: true,
        }
    }

    #[test]
    fn test_nothing_active() {
        let state = read_state(&fixed(vec![], "div"));
        assert_eq!(state, FormatState::default());
    }

    #[test]
    fn test_bold_only() {
        let state = read_state(&fixed(vec![Command::Bold], ""));
        assert_eq!(
            state,
            FormatState {
                bold: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_all_inline_commands() {
        let state = read_state(&fixed(
            vec![Command::Bold, Command::Italic, Command::InsertUnorderedList],
            "div",
        ));
        assert!(state.bold);
        assert!(state.italic);
        assert!(state.list);
        assert!(!state.h1 && !state.h2 && !state.h3);
    }

    #[test]
    fn test_heading_from_block_label() {
        assert!(read_state(&fixed(vec![], "h1")).h1);
        assert!(read_state(&fixed(vec![], "h2")).h2);

        let state = read_state(&fixed(vec![], "h3"));
        assert!(state.h3);
        assert!(!state.h1 && !state.h2);
    }

    #[test]
    fn test_heading_match_is_substring() {
        // Some environments wrap the tag name, e.g. "<h2>"
        assert!(read_state(&fixed(vec![], "<h2>")).h2);
    }

    #[test]
    fn test_unavailable_queries_default_to_false() {
        let surface = Fixed {
            active: vec![Command::Bold, Command::Italic],
            block: "h1",
            available: false,
        };
        assert_eq!(read_state(&surface), FormatState::default());
    }

    #[test]
    fn test_trait_object() {
        let surface: Box<dyn CommandState> = Box::new(fixed(vec![Command::Italic], "h2"));
        let state = read_state(surface.as_ref());
        assert!(state.italic);
        assert!(state.h2);
    }
}
