//! Command-line classification.
//!
//! Turns one input line into a [`Command`]. Dispatch lives in the parent
//! module, so every variant can be tested without a registry or scanner.

/// One shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `list [address]`: ports of one host.
    List(Option<String>),
    /// `show`: every known address.
    Show,
    /// `scan [target ...]`: scan targets, or rescan everything when empty.
    Scan(Vec<String>),
    /// `help`: command names.
    Help,
    /// `quit` or `q`.
    Quit,
    /// Anything else, including an empty line. Holds the first token.
    Unknown(String),
}

impl Command {
    /// Classify a line. Tokens are separated by runs of whitespace; extra
    /// arguments to commands that take none are ignored.
    pub fn parse(line: &str) -> Self {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            return Self::Unknown(String::new());
        };

        match name {
            "list" => Self::List(tokens.next().map(str::to_string)),
            "show" => Self::Show,
            "scan" => Self::Scan(tokens.map(str::to_string).collect()),
            "help" => Self::Help,
            "quit" | "q" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        }
    }
}
