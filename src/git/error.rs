//! Errors raised by the git layer

use thiserror::Error;

/// Possible errors from the `git` module.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git exited with {}: {}", exit_code_label(.code), .stderr.trim())]
    CommandFailed { code: Option<i32>, stderr: String },

    #[error(transparent)]
    Git2(#[from] git2::Error),

    #[error("{0} not found")]
    NotFound(String),
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {}", code),
        None => "a signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_message() {
        let err = Error::CommandFailed {
            code: Some(128),
            stderr: "fatal: bad revision\n".to_string(),
        };
        assert_eq!(err.to_string(), "git exited with code 128: fatal: bad revision");

        let err = Error::CommandFailed { code: None, stderr: String::new() };
        assert_eq!(err.to_string(), "git exited with a signal: ");
    }
}
