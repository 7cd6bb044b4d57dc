//! exportfs command-line construction

use std::fmt;

use crate::error::Result;
use crate::option::{join_options, ExportOption};

/// Default exportfs executable.
pub const EXPORTFS: &str = "exportfs";

/// Ordered argv tokens, program name first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandLine(Vec<String>);

impl CommandLine {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Program name, `None` for an empty command line.
    pub fn program(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Arguments after the program name.
    pub fn args(&self) -> &[String] {
        self.0.get(1..).unwrap_or(&[])
    }

    /// Returns a new command line with `prefix` in front of these tokens.
    ///
    /// Always allocates; the receiver is left untouched.
    pub fn escalated(&self, prefix: &[String]) -> Self {
        let mut tokens = Vec::with_capacity(prefix.len() + self.0.len());
        tokens.extend_from_slice(prefix);
        tokens.extend_from_slice(&self.0);
        Self(tokens)
    }

    pub fn into_tokens(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

/// A path, the host it is exported to, and the options to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub path: String,
    pub host: String,
    pub options: Vec<ExportOption>,
}

impl ExportRequest {
    pub fn new(path: &str, host: &str, options: &[ExportOption]) -> Self {
        Self {
            path: path.to_string(),
            host: host.to_string(),
            options: options.to_vec(),
        }
    }

    /// The export target, `host:path`, as exportfs(8) expects it.
    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.path)
    }

    /// `program host:path [-o opts]`
    ///
    /// Fails if an option value would break the `-o` list.
    pub fn command_line(&self, program: &str) -> Result<CommandLine> {
        let mut tokens = vec![program.to_string(), self.target()];
        let joined = join_options(&self.options)?;
        if !joined.is_empty() {
            tokens.push("-o".to_string());
            tokens.push(joined);
        }
        Ok(CommandLine(tokens))
    }

    /// `program -u host:path`. Options are never passed when unexporting.
    pub fn unexport_command_line(&self, program: &str) -> CommandLine {
        CommandLine(vec![program.to_string(), "-u".to_string(), self.target()])
    }
}

/// Builds the exportfs command line that exports `path` to `host`.
pub fn export_command_line(
    path: &str,
    host: &str,
    options: &[ExportOption],
) -> Result<CommandLine> {
    ExportRequest::new(path, host, options).command_line(EXPORTFS)
}

/// Builds the exportfs command line that withdraws `path` from `host`.
pub fn unexport_command_line(path: &str, host: &str) -> CommandLine {
    ExportRequest::new(path, host, &[]).unexport_command_line(EXPORTFS)
}
