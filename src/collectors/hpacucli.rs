use crate::collectors::fields;
use crate::error::{ParseError, ReportError};
use crate::models::raid::Controller;
use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

/// Indentation hpacucli uses for each level of the hierarchy.
const CONTROLLER_DEPTH: usize = 0;
const ARRAY_DEPTH: usize = 3;
const DRIVE_DEPTH: usize = 6;

const UNASSIGNED_LINE: &str = "unassigned";

/// Read the whole report, from `path` or stdin.
pub fn read_report(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) => fs::read_to_string(p)
            .with_context(|| format!("reading report {}", p.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("reading report from stdin")?;
            Ok(text)
        }
    }
}

/// Rebuild the controller → array → drive forest from a full
/// `hpacucli ctrl all show config` report.
pub fn parse_report(text: &str) -> Result<Vec<Controller>, ReportError> {
    let mut builder = ReportBuilder::default();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim_end();
        if line.is_empty() { continue; }
        builder.feed(line).map_err(|e| e.at_line(idx + 1))?;
    }

    let controllers = builder.finish();
    debug!(
        controllers = controllers.len(),
        drives = controllers.iter().map(Controller::drive_count).sum::<usize>(),
        "parsed hpacucli report"
    );
    Ok(controllers)
}

/// Parse-time state: the forest so far plus the array new drives go into.
/// The current controller is always the last one pushed.
#[derive(Default)]
struct ReportBuilder {
    controllers:   Vec<Controller>,
    current_array: usize,
}

impl ReportBuilder {
    fn feed(&mut self, line: &str) -> Result<(), ParseError> {
        let depth = line.len() - line.trim_start_matches(' ').len();
        let body  = &line[depth..];

        match depth {
            CONTROLLER_DEPTH => {
                let ctl = fields::parse_controller(body)?;
                debug!(controller = %ctl.describe(), "controller");
                self.controllers.push(ctl);
                self.current_array = 0;
            }
            ARRAY_DEPTH => {
                let ctl = self.controller(body)?;
                if body.starts_with("SEP") {
                    ctl.sep = Some(fields::parse_sep(body)?);
                } else if body == UNASSIGNED_LINE {
                    self.current_array = 0;
                } else {
                    let arr = fields::parse_array(body)?;
                    ctl.arrays.push(arr);
                    let idx = ctl.arrays.len() - 1;
                    self.current_array = idx;
                }
            }
            DRIVE_DEPTH => {
                let drive = fields::parse_drive(body)?;
                let current = self.current_array;
                self.controller(body)?.arrays[current].drives.push(drive);
            }
            _ => {
                return Err(ParseError::UnexpectedIndentation { depth, text: line.to_string() });
            }
        }
        Ok(())
    }

    fn controller(&mut self, text: &str) -> Result<&mut Controller, ParseError> {
        self.controllers
            .last_mut()
            .ok_or_else(|| ParseError::OrphanLine { text: text.to_string() })
    }

    fn finish(self) -> Vec<Controller> {
        self.controllers
    }
}
