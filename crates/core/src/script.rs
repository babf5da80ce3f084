//! Script declarations and normalization
//!
//! A script is declared either as a single command line or as a structured
//! `{ "command": ..., "args": [...] }` pair. Both forms normalize to a
//! [`NormalizedScript`] for direct spawning.
//!
//! String declarations are split on single spaces with no quoting support.
//! Arguments that contain whitespace need the structured form.

use crate::platform::Platform;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A user-declared script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptDeclaration {
    /// Shell-style command line, e.g. `"npm run lint"`
    Line(String),
    /// Explicit command and argument list
    Structured {
        command: String,
        #[serde(default, alias = "arguments")]
        args: Vec<String>,
    },
}

/// Canonical command plus argument list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedScript {
    pub command: String,
    pub args: Vec<String>,
}

impl ScriptDeclaration {
    /// Create a structured declaration
    pub fn structured<C, I, A>(command: C, args: I) -> Self
    where
        C: Into<String>,
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        ScriptDeclaration::Structured {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Normalize into command and arguments.
    ///
    /// Never fails: an empty line yields an empty command, which the direct
    /// execution path reports as a spawn failure.
    pub fn normalize(&self) -> NormalizedScript {
        match self {
            ScriptDeclaration::Line(line) => {
                let mut tokens = line.split(' ').map(str::to_string);
                let command = tokens.next().unwrap_or_default();
                NormalizedScript {
                    command,
                    args: tokens.collect(),
                }
            }
            ScriptDeclaration::Structured { command, args } => NormalizedScript {
                command: command.clone(),
                args: args.clone(),
            },
        }
    }

    /// The unsplit command line handed to a shell.
    ///
    /// Structured declarations are joined with POSIX quoting so that
    /// arguments containing whitespace stay intact.
    pub fn command_line(&self) -> String {
        match self {
            ScriptDeclaration::Line(line) => line.clone(),
            ScriptDeclaration::Structured { command, args } => {
                shell_words::join(std::iter::once(command).chain(args.iter()))
            }
        }
    }

    /// The command line as handed to the shell of `platform`.
    ///
    /// `cmd.exe` does not treat single quotes as quoting, so structured
    /// declarations are quoted with Windows double-quote rules there.
    pub fn shell_line(&self, platform: Platform) -> String {
        match (self, platform) {
            (ScriptDeclaration::Structured { command, args }, Platform::Windows) => {
                std::iter::once(command)
                    .chain(args.iter())
                    .map(|word| quote_windows_arg(word))
                    .collect::<Vec<_>>()
                    .join(" ")
            }
            _ => self.command_line(),
        }
    }
}

/// Quote one argument for the Windows command-line parser.
///
/// Backslashes are literal unless they precede a `"`, in which case they are
/// doubled and the quote itself is escaped.
fn quote_windows_arg(arg: &str) -> Cow<'_, str> {
    if !arg.is_empty() && !arg.contains([' ', '\t', '"']) {
        return Cow::Borrowed(arg);
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    let mut backslashes = 0;
    for c in arg.chars() {
        match c {
            '\\' => {
                backslashes += 1;
                quoted.push(c);
            }
            '"' => {
                quoted.extend(std::iter::repeat('\\').take(backslashes + 1));
                quoted.push('"');
                backslashes = 0;
            }
            _ => {
                backslashes = 0;
                quoted.push(c);
            }
        }
    }
    // a trailing run of backslashes would otherwise escape the closing quote
    quoted.extend(std::iter::repeat('\\').take(backslashes));
    quoted.push('"');
    Cow::Owned(quoted)
}

impl From<&str> for ScriptDeclaration {
    fn from(line: &str) -> Self {
        ScriptDeclaration::Line(line.to_string())
    }
}

impl From<String> for ScriptDeclaration {
    fn from(line: String) -> Self {
        ScriptDeclaration::Line(line)
    }
}

impl fmt::Display for ScriptDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Split a `&&`-chained command string into individual line declarations.
///
/// Segments are trimmed and empty segments dropped, so `"a && b"` yields
/// `"a"` and `"b"` rather than tokens with dangling spaces.
pub fn split_command_chain(chain: &str) -> Vec<ScriptDeclaration> {
    chain
        .split("&&")
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(ScriptDeclaration::from)
        .collect()
}
