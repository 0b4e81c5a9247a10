//! External tool invocation.
//!
//! bigWig decoding/encoding and the coordinate liftover itself are done by
//! third-party binaries (UCSC `bigWigToBedGraph` / `bedGraphToBigWig`,
//! `CrossMap`). This module runs them and maps failures to
//! [`BedGraphError`].

use crate::bedgraph::BedGraphError;
use log::debug;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const BIGWIG_TO_BEDGRAPH: &str = "bigWigToBedGraph";
pub const BEDGRAPH_TO_BIGWIG: &str = "bedGraphToBigWig";
pub const CROSSMAP: &str = "CrossMap";

/// A third-party executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTool {
    name: String,
    program: PathBuf,
}

impl ExternalTool {
    /// Find `name` inside `tools_dir`, or rely on PATH lookup when no
    /// directory is given.
    pub fn locate(name: &str, tools_dir: Option<&Path>) -> Self {
        let program = match tools_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        };
        Self {
            name: name.to_string(),
            program,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run the tool to completion, capturing its output.
    pub fn run<I, S>(&self, args: I) -> Result<(), BedGraphError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        debug!("Running {:?}", cmd);

        let output = cmd.output().map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => BedGraphError::ToolNotFound {
                tool: self.program.display().to_string(),
            },
            _ => BedGraphError::Io(e),
        })?;

        if !output.status.success() {
            return Err(BedGraphError::ToolFailed {
                tool: self.name.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

/// The three tools the convert pipeline needs.
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub bigwig_to_bedgraph: ExternalTool,
    pub crossmap: ExternalTool,
    pub bedgraph_to_bigwig: ExternalTool,
}

impl Toolchain {
    pub fn locate(tools_dir: Option<&Path>) -> Self {
        Self {
            bigwig_to_bedgraph: ExternalTool::locate(BIGWIG_TO_BEDGRAPH, tools_dir),
            crossmap: ExternalTool::locate(CROSSMAP, tools_dir),
            bedgraph_to_bigwig: ExternalTool::locate(BEDGRAPH_TO_BIGWIG, tools_dir),
        }
    }

    /// `bigWigToBedGraph <bigwig> <bedgraph>`
    pub fn to_bedgraph(&self, bigwig: &Path, bedgraph: &Path) -> Result<(), BedGraphError> {
        self.bigwig_to_bedgraph
            .run([bigwig.as_os_str(), bedgraph.as_os_str()])
    }

    /// `CrossMap bed <chain> <input> <output>`
    pub fn lift(
        &self,
        chain: &Path,
        input: &Path,
        output: &Path,
    ) -> Result<(), BedGraphError> {
        self.crossmap.run([
            OsStr::new("bed"),
            chain.as_os_str(),
            input.as_os_str(),
            output.as_os_str(),
        ])
    }

    /// `bedGraphToBigWig <bedgraph> <chrom.sizes> <bigwig>`
    pub fn to_bigwig(
        &self,
        bedgraph: &Path,
        chrom_sizes: &Path,
        bigwig: &Path,
    ) -> Result<(), BedGraphError> {
        self.bedgraph_to_bigwig.run([
            bedgraph.as_os_str(),
            chrom_sizes.as_os_str(),
            bigwig.as_os_str(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_in_dir() {
        let tool = ExternalTool::locate(CROSSMAP, Some(Path::new("/opt/ucsc")));
        assert_eq!(tool.program(), Path::new("/opt/ucsc/CrossMap"));
        assert_eq!(tool.name(), "CrossMap");
    }

    #[test]
    fn test_locate_on_path() {
        let tool = ExternalTool::locate(BIGWIG_TO_BEDGRAPH, None);
        assert_eq!(tool.program(), Path::new("bigWigToBedGraph"));
    }

    #[test]
    fn test_missing_tool() {
        let dir = tempfile::tempdir().unwrap();
        let tool = ExternalTool::locate("definitely-not-here", Some(dir.path()));
        let err = tool.run(["x"]).unwrap_err();
        assert!(matches!(err, BedGraphError::ToolNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_tool_reports_stderr() {
        let tool = ExternalTool::locate("sh", None);
        let err = tool.run(["-c", "echo broken >&2; exit 3"]).unwrap_err();
        match err {
            BedGraphError::ToolFailed { tool, stderr, .. } => {
                assert_eq!(tool, "sh");
                assert_eq!(stderr, "broken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_tool() {
        let tool = ExternalTool::locate("true", None);
        assert!(tool.run(std::iter::empty::<&str>()).is_ok());
    }
}
