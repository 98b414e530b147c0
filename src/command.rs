// src/command.rs

//! Whitelist validation of the words given on the command line, and the
//! immutable `Command` that the runner supervises.

use std::fmt;

use crate::errors::{Result, UpdaterError};

/// Privileged invocation that every accepted command starts with.
pub const PRIVILEGED_PREFIX: [&str; 2] = ["sudo", "apt"];

/// Trailing instructions accepted after [`PRIVILEGED_PREFIX`].
pub const ALLOWED_INSTRUCTIONS: [&str; 4] = ["update", "upgrade", "full-upgrade", "dist-upgrade"];

pub const INSTALL_REJECTED: &str =
    "Installing applications is not supported by this utility at this time.";

/// An external invocation, split into tokens once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    tokens: Vec<String>,
}

impl Command {
    /// Tokenise a validated command string with shell-like quoting rules.
    pub fn parse(line: &str) -> Result<Self> {
        let tokens = shlex::split(line)
            .ok_or_else(|| UpdaterError::CommandParse(format!("unbalanced quoting in {line:?}")))?;
        if tokens.is_empty() {
            return Err(UpdaterError::CommandParse("empty command".to_string()));
        }
        Ok(Self { tokens })
    }

    pub fn program(&self) -> &str {
        &self.tokens[0]
    }

    pub fn args(&self) -> &[String] {
        &self.tokens[1..]
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens.join(" "))
    }
}

/// Return the joined command line if `words` is exactly
/// `sudo apt <instruction>` with a whitelisted instruction.
pub fn validate<S: AsRef<str>>(words: &[S]) -> Option<String> {
    let words: Vec<&str> = words.iter().map(AsRef::as_ref).collect();

    match words.as_slice() {
        [sudo, apt, instruction]
            if [*sudo, *apt] == PRIVILEGED_PREFIX && ALLOWED_INSTRUCTIONS.contains(instruction) =>
        {
            Some(words.join(" "))
        }
        _ => None,
    }
}

/// Message explaining why `words` were rejected.
///
/// The privileged prefix is dropped from the listing when present so that
/// only the offending words are shown.
pub fn rejected_input<S: AsRef<str>>(words: &[S]) -> String {
    let words: Vec<&str> = words.iter().map(AsRef::as_ref).collect();

    if words.contains(&"install") {
        return INSTALL_REJECTED.to_string();
    }

    let rest = match words.as_slice() {
        [sudo, apt, rest @ ..] if [*sudo, *apt] == PRIVILEGED_PREFIX => rest,
        all => all,
    };
    format!("Unaccepted values: {}", rest.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_whitelisted_instruction() {
        for instruction in ALLOWED_INSTRUCTIONS {
            let words = ["sudo", "apt", instruction];
            assert_eq!(validate(&words), Some(format!("sudo apt {instruction}")));
        }
    }

    #[test]
    fn rejects_extra_tokens_and_wrong_prefix() {
        assert_eq!(validate(&["sudo", "apt", "update", "-y"]), None);
        assert_eq!(validate(&["apt", "update"]), None);
        assert_eq!(validate(&["sudo", "apt-get", "update"]), None);
        assert_eq!(validate(&["sudo", "apt", "remove"]), None);
        assert_eq!(validate::<&str>(&[]), None);
    }

    #[test]
    fn install_gets_its_own_message() {
        assert_eq!(rejected_input(&["sudo", "apt", "install", "vim"]), INSTALL_REJECTED);
        assert_eq!(rejected_input(&["install"]), INSTALL_REJECTED);
    }

    #[test]
    fn rejection_lists_words_after_prefix() {
        assert_eq!(
            rejected_input(&["sudo", "apt", "remove", "vim"]),
            "Unaccepted values: remove vim"
        );
        assert_eq!(
            rejected_input(&["rm", "-rf", "/tmp/x"]),
            "Unaccepted values: rm -rf /tmp/x"
        );
    }

    #[test]
    fn parse_splits_tokens() {
        let cmd = Command::parse("sudo apt full-upgrade").unwrap();
        assert_eq!(cmd.program(), "sudo");
        assert_eq!(cmd.args(), ["apt".to_string(), "full-upgrade".to_string()]);
        assert_eq!(cmd.to_string(), "sudo apt full-upgrade");
    }

    #[test]
    fn parse_rejects_empty_and_unbalanced() {
        assert!(matches!(Command::parse(""), Err(UpdaterError::CommandParse(_))));
        assert!(matches!(Command::parse("sudo \"apt"), Err(UpdaterError::CommandParse(_))));
    }
}
