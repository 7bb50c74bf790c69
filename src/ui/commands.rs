use crate::domain::Label;

pub const HELP: &str = "\
Type or paste text; each line is added to the draft.
  :scan              analyze the draft
  :show              print the draft
  :text <text>       replace the draft
  :clear             empty the draft
  :cancel            abandon the running scan
  :report <spam|ham> tell the service what the draft really is
  :status            ping the classification service
  :help              this list
  :quit              leave
Start a line with '::' to add a line that begins with ':'.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Append(String),
    Replace(String),
    Clear,
    Show,
    Scan,
    Cancel,
    Report(Label),
    Status,
    Help,
    Quit,
    Invalid(String),
}

pub fn parse_line(line: &str) -> SessionCommand {
    if let Some(escaped) = line.strip_prefix("::") {
        return SessionCommand::Append(format!(":{escaped}"));
    }
    let Some(command) = line.strip_prefix(':') else {
        return SessionCommand::Append(line.to_string());
    };

    let (name, rest) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest),
        None => (command, ""),
    };

    match name.to_ascii_lowercase().as_str() {
        "scan" | "s" => SessionCommand::Scan,
        "show" => SessionCommand::Show,
        "text" => SessionCommand::Replace(rest.to_string()),
        "clear" => SessionCommand::Clear,
        "cancel" => SessionCommand::Cancel,
        "report" => match Label::parse(rest) {
            Some(label) => SessionCommand::Report(label),
            None => SessionCommand::Invalid("usage: :report <spam|ham>".to_string()),
        },
        "status" => SessionCommand::Status,
        "help" | "h" | "?" => SessionCommand::Help,
        "quit" | "q" | "exit" => SessionCommand::Quit,
        other => SessionCommand::Invalid(format!("unknown command :{other} (try :help)")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_draft_text() {
        assert_eq!(
            parse_line("WIN FREE MONEY NOW!!!"),
            SessionCommand::Append("WIN FREE MONEY NOW!!!".into())
        );
        assert_eq!(parse_line(""), SessionCommand::Append(String::new()));
        assert_eq!(
            parse_line(" :scan"),
            SessionCommand::Append(" :scan".into())
        );
    }

    #[test]
    fn double_colon_escapes() {
        assert_eq!(
            parse_line("::) smiley"),
            SessionCommand::Append(":) smiley".into())
        );
    }

    #[test]
    fn commands() {
        assert_eq!(parse_line(":scan"), SessionCommand::Scan);
        assert_eq!(parse_line(":SCAN"), SessionCommand::Scan);
        assert_eq!(parse_line(":q"), SessionCommand::Quit);
        assert_eq!(parse_line(":cancel"), SessionCommand::Cancel);
        assert_eq!(
            parse_line(":text Let's meet at 3pm tomorrow"),
            SessionCommand::Replace("Let's meet at 3pm tomorrow".into())
        );
        assert_eq!(parse_line(":text"), SessionCommand::Replace(String::new()));
    }

    #[test]
    fn report_needs_a_label() {
        assert_eq!(
            parse_line(":report spam"),
            SessionCommand::Report(Label::Spam)
        );
        assert_eq!(parse_line(":report  HAM"), SessionCommand::Report(Label::Ham));
        assert!(matches!(parse_line(":report"), SessionCommand::Invalid(_)));
        assert!(matches!(
            parse_line(":report phishing"),
            SessionCommand::Invalid(_)
        ));
    }

    #[test]
    fn unknown_command() {
        assert_eq!(
            parse_line(":frobnicate now"),
            SessionCommand::Invalid("unknown command :frobnicate (try :help)".into())
        );
    }
}
