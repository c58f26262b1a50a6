//! Runs the configured extraction program on each unit.
//!
//! The program gets the unit bytes on stdin and the unit path as its last
//! argument, and prints `{ "classes": [...], "errors": [...] }` on stdout.
//! A non-zero exit status is reported as a unit error; a program that cannot
//! be started or prints something else aborts the build.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use folio_build::{BuildError, UnitOutput, UnitParser};
use folio_common::normalize_class_name;
use folio_model::ClassEntity;
use serde::Deserialize;

#[derive(Deserialize)]
struct Extracted {
    #[serde(default)]
    classes: Vec<ClassEntity>,
    #[serde(default)]
    errors: Vec<String>,
}

/// A [`UnitParser`] backed by an external program.
#[derive(Debug, Clone)]
pub struct CommandUnitParser {
    program: String,
    args: Vec<String>,
}

impl CommandUnitParser {
    /// `command` is the program followed by its fixed arguments.
    pub fn new(command: &[String]) -> Result<Self, BuildError> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| BuildError::Config("parser.command is empty".to_string()))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl UnitParser for CommandUnitParser {
    fn parse(&mut self, path: &Path, content: &[u8]) -> Result<UnitOutput, BuildError> {
        tracing::debug!(unit = %path.display(), program = %self.program, "running extractor");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| BuildError::Parser(format!("cannot run {}: {e}", self.program)))?;

        // The program may fill stdout before it has read all of stdin.
        let writer = child.stdin.take().map(|mut stdin| {
            let content = content.to_vec();
            std::thread::spawn(move || stdin.write_all(&content))
        });
        let output = child
            .wait_with_output()
            .map_err(|e| BuildError::Parser(format!("{} failed: {e}", self.program)))?;
        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                // The program may exit without reading all of its input.
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Ok(Err(source)) => {
                    return Err(BuildError::Io {
                        path: path.to_path_buf(),
                        source,
                    })
                }
                Err(_) => {
                    return Err(BuildError::Parser(format!(
                        "writing {} to {} panicked",
                        path.display(),
                        self.program
                    )))
                }
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Ok(UnitOutput {
                classes: Vec::new(),
                errors: vec![format!("{} {}: {}", self.program, output.status, stderr.trim())],
            });
        }

        let extracted: Extracted = serde_json::from_slice(&output.stdout).map_err(|e| {
            BuildError::Parser(format!(
                "{} printed invalid output for {}: {e}",
                self.program,
                path.display()
            ))
        })?;
        let classes = extracted
            .classes
            .into_iter()
            .map(|mut class| {
                class.info.name = normalize_class_name(&class.info.name).to_string();
                class
            })
            .collect();
        Ok(UnitOutput {
            classes,
            errors: extracted.errors,
        })
    }
}
