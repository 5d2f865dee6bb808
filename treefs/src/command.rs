//! Shell command parsing.
//!
//! Converts one input line into a typed [`Command`]. Nothing here touches
//! the filesystem; names are validated when the command is executed.

/// Usage summary shown by `help`.
pub const USAGE: &str = "\
Commands:
  ls                     list the current directory
  mkdir <name>           create a directory
  rmdir <name>           remove an empty directory
  touch <name> [content] create a file with the rest of the line as content
  rm <name>              remove a file
  cat <name>             show a file's content
  cd <path>              change directory ('..' goes up, '/' goes to the root)
  pwd                    print the current directory
  help                   show this summary
  exit                   save and quit";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    MakeDirectory(String),
    RemoveDirectory(String),
    MakeFile { name: String, content: String },
    RemoveFile(String),
    Show(String),
    ChangeDirectory(String),
    PrintWorkingDirectory,
    Help,
    Exit,
}

impl Command {
    /// Parse one input line.
    ///
    /// Returns `Ok(None)` for a blank line.
    ///
    /// For `touch`, everything after the single separator that follows the
    /// name is the file content, with inner and trailing spaces kept.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown command word, a missing argument, or
    /// extra arguments to a command that takes one.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim_end_matches(['\n', '\r']).trim_start();
        let Some(word) = line.split_whitespace().next() else {
            return Ok(None);
        };
        let rest = line[word.len()..].trim_start();

        let command = match word {
            "ls" => no_arguments("ls", rest, Self::List)?,
            "pwd" => no_arguments("pwd", rest, Self::PrintWorkingDirectory)?,
            "help" => no_arguments("help", rest, Self::Help)?,
            "exit" => no_arguments("exit", rest, Self::Exit)?,
            "mkdir" => Self::MakeDirectory(single_argument("mkdir", "name", rest)?),
            "rmdir" => Self::RemoveDirectory(single_argument("rmdir", "name", rest)?),
            "rm" => Self::RemoveFile(single_argument("rm", "name", rest)?),
            "cat" => Self::Show(single_argument("cat", "name", rest)?),
            "cd" => Self::ChangeDirectory(single_argument("cd", "path", rest)?),
            "touch" => parse_touch(rest)?,
            other => return Err(CommandError::Unknown(other.to_owned())),
        };

        Ok(Some(command))
    }
}

fn no_arguments(
    command: &'static str,
    rest: &str,
    parsed: Command,
) -> Result<Command, CommandError> {
    if rest.is_empty() {
        Ok(parsed)
    } else {
        Err(CommandError::TooManyArguments { command })
    }
}

fn single_argument(
    command: &'static str,
    argument: &'static str,
    rest: &str,
) -> Result<String, CommandError> {
    let mut words = rest.split_whitespace();
    let value = words
        .next()
        .ok_or(CommandError::MissingArgument { command, argument })?;
    if words.next().is_some() {
        return Err(CommandError::TooManyArguments { command });
    }
    Ok(value.to_owned())
}

fn parse_touch(rest: &str) -> Result<Command, CommandError> {
    let name = rest
        .split_whitespace()
        .next()
        .ok_or(CommandError::MissingArgument {
            command: "touch",
            argument: "name",
        })?;
    let after_name = &rest[name.len()..];
    let content = after_name
        .strip_prefix(char::is_whitespace)
        .unwrap_or(after_name);

    Ok(Command::MakeFile {
        name: name.to_owned(),
        content: content.to_owned(),
    })
}

/// Error returned for a line that is not a valid command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The first word is not a known command.
    Unknown(String),
    /// A required argument is missing.
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    /// More arguments than the command accepts.
    TooManyArguments { command: &'static str },
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown(word) => write!(f, "unknown command: {word} (try 'help')"),
            Self::MissingArgument { command, argument } => {
                write!(f, "{command}: missing <{argument}>")
            }
            Self::TooManyArguments { command } => write!(f, "{command}: too many arguments"),
        }
    }
}

impl std::error::Error for CommandError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        Command::parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_lines() {
        assert_eq!(Command::parse(""), Ok(None));
        assert_eq!(Command::parse("   \t "), Ok(None));
        assert_eq!(Command::parse("\n"), Ok(None));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("ls"), Command::List);
        assert_eq!(parse("  pwd  "), Command::PrintWorkingDirectory);
        assert_eq!(parse("help"), Command::Help);
        assert_eq!(parse("exit\r\n"), Command::Exit);
        assert_eq!(parse("mkdir docs"), Command::MakeDirectory("docs".to_owned()));
        assert_eq!(parse("rmdir docs"), Command::RemoveDirectory("docs".to_owned()));
        assert_eq!(parse("rm a.txt"), Command::RemoveFile("a.txt".to_owned()));
        assert_eq!(parse("cat a.txt"), Command::Show("a.txt".to_owned()));
        assert_eq!(parse("cd .."), Command::ChangeDirectory("..".to_owned()));
        assert_eq!(parse("cd a/b"), Command::ChangeDirectory("a/b".to_owned()));
    }

    #[test]
    fn test_touch_keeps_rest_of_line() {
        assert_eq!(
            parse("touch notes.txt hello  big   world "),
            Command::MakeFile {
                name: "notes.txt".to_owned(),
                content: "hello  big   world ".to_owned(),
            }
        );
        assert_eq!(
            parse("touch empty.txt"),
            Command::MakeFile {
                name: "empty.txt".to_owned(),
                content: String::new(),
            }
        );
        assert_eq!(
            parse("touch a.txt  two spaces"),
            Command::MakeFile {
                name: "a.txt".to_owned(),
                content: " two spaces".to_owned(),
            }
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            Command::parse("format c:"),
            Err(CommandError::Unknown("format".to_owned()))
        );
        assert_eq!(
            Command::parse("mkdir"),
            Err(CommandError::MissingArgument {
                command: "mkdir",
                argument: "name"
            })
        );
        assert_eq!(
            Command::parse("touch"),
            Err(CommandError::MissingArgument {
                command: "touch",
                argument: "name"
            })
        );
        assert_eq!(
            Command::parse("rm a b"),
            Err(CommandError::TooManyArguments { command: "rm" })
        );
        assert_eq!(
            Command::parse("ls -l"),
            Err(CommandError::TooManyArguments { command: "ls" })
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            CommandError::Unknown("x".to_owned()).to_string(),
            "unknown command: x (try 'help')"
        );
        assert_eq!(
            CommandError::MissingArgument {
                command: "cd",
                argument: "path"
            }
            .to_string(),
            "cd: missing <path>"
        );
    }
}
