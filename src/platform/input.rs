//! Terminal input lines

/// One line of terminal input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Anything that is not a keyword is sent to the engine as an answer
    Answer(String),
    Reset,
    Quit,
    Help,
    ToggleSfx,
    ToggleHaptics,
}

pub fn parse_line(line: &str) -> Input {
    match line.trim().to_ascii_lowercase().as_str() {
        "r" | "reset" | "restart" => Input::Reset,
        "q" | "quit" | "exit" => Input::Quit,
        "?" | "h" | "help" => Input::Help,
        "sfx" | "sound" => Input::ToggleSfx,
        "haptics" | "vibrate" => Input::ToggleHaptics,
        _ => Input::Answer(line.to_string()),
    }
}

pub const HELP: &str = "\
Type the answer of a tile next to [P] (up, down, left or right) and press Enter.
Commands: r = restart, sfx = toggle sound, haptics = toggle haptics, q = quit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        assert_eq!(parse_line("r"), Input::Reset);
        assert_eq!(parse_line("  QUIT \n"), Input::Quit);
        assert_eq!(parse_line("help"), Input::Help);
        assert_eq!(parse_line("sfx"), Input::ToggleSfx);
        assert_eq!(parse_line("Haptics"), Input::ToggleHaptics);
    }

    #[test]
    fn test_everything_else_is_an_answer() {
        assert_eq!(parse_line("12\n"), Input::Answer("12\n".into()));
        assert_eq!(parse_line("rr"), Input::Answer("rr".into()));
        assert_eq!(parse_line(""), Input::Answer(String::new()));
    }
}
