//! External command execution
//!
//! Runs a program to completion and captures its exit code and output.
//! A non-zero exit is reported in the output rather than as an error, so
//! callers can decide whether a failure means "no data" or a hard error.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use super::Error;

/// Captured result of a finished process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub exit_code: Option<i32>,
    /// Standard output (lossily decoded)
    pub stdout: String,
    /// Standard error (lossily decoded)
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the process exited with code 0
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Turn a non-zero exit into [`Error::CommandFailed`]
    pub fn into_result(self) -> Result<Self, Error> {
        if self.success() {
            Ok(self)
        } else {
            Err(Error::CommandFailed {
                code: self.exit_code,
                stderr: self.stderr,
            })
        }
    }
}

/// Run `program` with `args` in `cwd` and wait for it to exit
pub async fn run<S>(program: &str, args: &[S], cwd: &Path) -> Result<CommandOutput, Error>
where
    S: AsRef<str>,
{
    let args: Vec<&str> = args.iter().map(|arg| arg.as_ref()).collect();
    log::debug!("running {} {} in {}", program, args.join(" "), cwd.display());

    let output = Command::new(program)
        .args(&args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|source| Error::Spawn {
            program: program.to_string(),
            source,
        })?;

    let output = CommandOutput {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if !output.success() {
        log::debug!("{} exited with {:?}: {}", program, output.exit_code, output.stderr.trim());
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_result() {
        let ok = CommandOutput {
            exit_code: Some(0),
            stdout: "out".to_string(),
            stderr: String::new(),
        };
        assert_eq!(ok.clone().into_result().unwrap(), ok);

        let failed = CommandOutput {
            exit_code: Some(1),
            stdout: String::new(),
            stderr: "boom".to_string(),
        };
        match failed.into_result() {
            Err(Error::CommandFailed { code, stderr }) => {
                assert_eq!(code, Some(1));
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let dir = std::env::temp_dir();
        let result = run("commitree-no-such-program", &["--version"], &dir).await;
        assert!(matches!(result, Err(Error::Spawn { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_code_and_output_are_captured() {
        let dir = std::env::temp_dir();
        let output = run("sh", &["-c", "echo hello; echo oops >&2; exit 3"], &dir)
            .await
            .unwrap();

        assert_eq!(output.exit_code, Some(3));
        assert!(!output.success());
        assert_eq!(output.stdout, "hello\n");
        assert_eq!(output.stderr, "oops\n");
    }
}
