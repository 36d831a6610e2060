//! Shared end-to-end harness: materialize a literal source program into a
//! real file and run the compiled `interp` binary against it, adapting this
//! family's `Expected`/`check_compilation` helper pattern to a single-process
//! interpreter (there is no separate compile-then-run-the-output-binary
//! step here, since there is no ahead-of-time compilation stage).

use std::{
    error::Error,
    io::Write,
    process::{Command, Output},
    str,
};

use tempfile::NamedTempFile;

pub struct Expected<'a> {
    pub stdout: &'a str,
    pub stderr: &'a str,
}

impl<'a> Expected<'a> {
    fn assert_matches(&self, output: &Output) -> Result<(), Box<dyn Error>> {
        assert_eq!(str::from_utf8(&output.stdout)?, self.stdout);
        assert_eq!(str::from_utf8(&output.stderr)?, self.stderr);
        Ok(())
    }
}

fn run_interp(src: &str) -> Result<Output, Box<dyn Error>> {
    let mut file = NamedTempFile::new()?;
    file.write_all(src.as_bytes())?;
    let output = Command::new(env!("CARGO_BIN_EXE_interp")).arg(file.path()).output()?;
    Ok(output)
}

/// Runs `src` and asserts its stdout/stderr match `expected`, and that the
/// process exited with status 0.
pub fn check_run(src: &str, expected: Expected) -> Result<(), Box<dyn Error>> {
    let output = run_interp(src)?;
    expected.assert_matches(&output)?;
    assert!(
        output.status.success(),
        "interp exited with status {:?}",
        output.status.code()
    );
    Ok(())
}

/// Runs `src` and asserts it exits with status 1 (a fatal lex/parse/runtime
/// error), regardless of the diagnostic text.
pub fn check_fails(src: &str) -> Result<(), Box<dyn Error>> {
    let output = run_interp(src)?;
    assert_eq!(
        output.status.code(),
        Some(1),
        "expected exit code 1, got {:?}; stderr: {}",
        output.status.code(),
        str::from_utf8(&output.stderr)?
    );
    Ok(())
}
