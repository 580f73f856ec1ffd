//! Parsing of one line of REPL input

use duochat_application::ChatCommand;
use duochat_domain::Department;

/// What one line of input asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    /// Forward to the controller
    Command(ChatCommand),
    /// Plain text for whichever channel is open
    Text(String),
    Help,
    Quit,
    /// The line could not be used; the message says why
    Invalid(String),
    Empty,
}

/// Parse one input line.
///
/// `/login <name> [department]` takes the department from its last word when
/// that word names one, falling back to `default_department`. Names may
/// contain spaces.
pub fn parse_input(line: &str, default_department: Option<Department>) -> ReplInput {
    let line = line.trim();
    if line.is_empty() {
        return ReplInput::Empty;
    }
    if !line.starts_with('/') {
        return ReplInput::Text(line.to_string());
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "/quit" | "/exit" | "/q" => ReplInput::Quit,
        "/help" | "/h" | "/?" => ReplInput::Help,
        "/human" => ReplInput::Command(ChatCommand::OpenHuman),
        "/assistant" | "/ai" => ReplInput::Command(ChatCommand::OpenAssistant),
        "/close" => ReplInput::Command(ChatCommand::CloseAll),
        "/login" => parse_login(rest, default_department),
        "/lang" => {
            if rest.is_empty() {
                ReplInput::Invalid("Usage: /lang <language tag>".to_string())
            } else {
                ReplInput::Command(ChatCommand::LanguageChanged(rest.to_string()))
            }
        }
        _ => ReplInput::Invalid(format!("Unknown command: {}", command)),
    }
}

fn parse_login(args: &str, default_department: Option<Department>) -> ReplInput {
    let words: Vec<&str> = args.split_whitespace().collect();
    let Some((last, leading)) = words.split_last() else {
        return ReplInput::Invalid("Usage: /login <name> [department]".to_string());
    };

    let named = if leading.is_empty() {
        None
    } else {
        last.parse::<Department>().ok()
    };
    let (name_words, department) = match named {
        Some(department) => (leading, department),
        None => match default_department {
            Some(department) => (words.as_slice(), department),
            None => {
                return ReplInput::Invalid(
                    "Usage: /login <name> <department> (no default department configured)"
                        .to_string(),
                );
            }
        },
    };

    ReplInput::Command(ChatCommand::ConnectHuman {
        user_name: name_words.join(" "),
        department: department.as_str().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connect(name: &str, department: &str) -> ReplInput {
        ReplInput::Command(ChatCommand::ConnectHuman {
            user_name: name.to_string(),
            department: department.to_string(),
        })
    }

    #[test]
    fn test_plain_text_and_blank_lines() {
        assert_eq!(parse_input("  hello  ", None), ReplInput::Text("hello".to_string()));
        assert_eq!(parse_input("   ", None), ReplInput::Empty);
    }

    #[test]
    fn test_channel_commands() {
        assert_eq!(
            parse_input("/human", None),
            ReplInput::Command(ChatCommand::OpenHuman)
        );
        assert_eq!(
            parse_input("/ai", None),
            ReplInput::Command(ChatCommand::OpenAssistant)
        );
        assert_eq!(
            parse_input("/close", None),
            ReplInput::Command(ChatCommand::CloseAll)
        );
        assert_eq!(parse_input("/q", None), ReplInput::Quit);
        assert_eq!(parse_input("/help", None), ReplInput::Help);
    }

    #[test]
    fn test_login_with_department() {
        assert_eq!(parse_input("/login Ana support", None), connect("Ana", "support"));
        assert_eq!(
            parse_input("/login Ana Maria Billing", None),
            connect("Ana Maria", "billing")
        );
    }

    #[test]
    fn test_login_falls_back_to_default_department() {
        assert_eq!(
            parse_input("/login Ana", Some(Department::Sales)),
            connect("Ana", "sales")
        );
        assert_eq!(
            parse_input("/login Ana Maria", Some(Department::Sales)),
            connect("Ana Maria", "sales")
        );
    }

    #[test]
    fn test_single_word_is_always_the_name() {
        assert_eq!(
            parse_input("/login support", Some(Department::Billing)),
            connect("support", "billing")
        );
    }

    #[test]
    fn test_login_without_department_or_default() {
        assert!(matches!(parse_input("/login Ana", None), ReplInput::Invalid(_)));
        assert!(matches!(parse_input("/login", None), ReplInput::Invalid(_)));
    }

    #[test]
    fn test_lang_and_unknown() {
        assert_eq!(
            parse_input("/lang pt-BR", None),
            ReplInput::Command(ChatCommand::LanguageChanged("pt-BR".to_string()))
        );
        assert!(matches!(parse_input("/lang", None), ReplInput::Invalid(_)));
        assert!(matches!(parse_input("/models", None), ReplInput::Invalid(m) if m.contains("/models")));
    }
}
