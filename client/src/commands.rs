use rpsroom_common::Choice;

/// Something the user typed at the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Choose(Choice),
    Leave,
    Quit,
}

impl Command {
    pub fn parse(input: &str) -> Option<Command> {
        match input.trim().to_lowercase().as_str() {
            "rock" | "r" => Some(Command::Choose(Choice::Rock)),
            "paper" | "p" => Some(Command::Choose(Choice::Paper)),
            "scissors" | "scissor" | "s" => Some(Command::Choose(Choice::Scissors)),
            "leave" | "l" => Some(Command::Leave),
            "quit" | "q" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choices() {
        assert_eq!(Command::parse("rock"), Some(Command::Choose(Choice::Rock)));
        assert_eq!(Command::parse("  P \n"), Some(Command::Choose(Choice::Paper)));
        assert_eq!(Command::parse("Scissor"), Some(Command::Choose(Choice::Scissors)));
        assert_eq!(Command::parse("s"), Some(Command::Choose(Choice::Scissors)));
    }

    #[test]
    fn test_parse_room_commands() {
        assert_eq!(Command::parse("leave"), Some(Command::Leave));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("lizard"), None);
        assert_eq!(Command::parse(""), None);
    }
}
