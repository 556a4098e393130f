//! Line grammars for `hpacucli ctrl all show config` output.
//!
//! Each parser takes one line with its indentation already removed and
//! either returns the typed record or a [`ParseError`] naming the line.

use crate::error::{LineKind, ParseError};
use crate::models::raid::{Array, Controller, Drive, DriveKind, StorageEnclosureProcessor};
use crate::util::human::parse_size;
use regex::{Captures, Regex};
use std::sync::OnceLock;

const LOGICAL_PREFIX: &str = "logicaldrive";
const PHYSICAL_PREFIX: &str = "physicaldrive";

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static line grammar"))
}

// "Smart Array P410i in Slot 0 (Embedded)    (sn: 5001438012345678)"
fn controller_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, r"^(.*?) in Slot (\d+) \(([^)]+)\)\s+\(sn: ([^)]+)\)$")
}

// "SEP (Vendor ID PMCSIERA, Model  SRC 8x6G) 250 (WWID: 500143801234567F)"
// hpacucli prints two spaces after "Model".
fn sep_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, r"^SEP\s+\(Vendor ID\s+([^,]+),\s+Model  ([^)]+)\)\s+(\d+)\s+\(WWID:\s+([^)]+)\)$")
}

// "array A (SAS, Unused Space: 0  MB)"
fn array_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, r"^array\s+([A-Z])\s+\(([^,]+),\s+Unused\s+Space:([^)]+)\)$")
}

// "1 (136.7 GB, RAID 1, OK)"
fn logical_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, r"^(\d+)\s+\(([^,]+),\s+([^,]+),\s+([^)]+)\)$")
}

// "1I:1:1 (port 1I:box 1:bay 1, SAS, 146 GB, OK)"
fn physical_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, r"^(\S+)\s+\(port\s+([^:]+):box\s+(\d+):bay\s+(\d+),\s+([^,]+),\s+([^,]+),\s+([^)]+)\)$")
}

fn captures<'t>(re: &Regex, kind: LineKind, text: &'t str) -> Result<Captures<'t>, ParseError> {
    re.captures(text).ok_or_else(|| ParseError::malformed(kind, text))
}

fn field<'t>(caps: &Captures<'t>, idx: usize, name: &'static str, text: &str) -> Result<&'t str, ParseError> {
    caps.get(idx)
        .map(|m| m.as_str())
        .ok_or_else(|| ParseError::MissingField { field: name, text: text.to_string() })
}

fn number(value: &str, kind: LineKind, text: &str) -> Result<u32, ParseError> {
    value.parse().map_err(|_| ParseError::malformed(kind, text))
}

/// Parse a controller header line.
pub fn parse_controller(line: &str) -> Result<Controller, ParseError> {
    let kind = LineKind::Controller;
    let caps = captures(controller_re(), kind, line)?;

    let name   = field(&caps, 1, "name", line)?;
    let slot   = number(field(&caps, 2, "slot", line)?, kind, line)?;
    let ty     = field(&caps, 3, "type", line)?;
    let serial = field(&caps, 4, "serial", line)?;

    Ok(Controller::new(name.to_string(), ty.to_string(), slot, serial.to_string()))
}

pub fn parse_sep(line: &str) -> Result<StorageEnclosureProcessor, ParseError> {
    let kind = LineKind::Sep;
    let caps = captures(sep_re(), kind, line)?;

    Ok(StorageEnclosureProcessor {
        vendor_id: field(&caps, 1, "vendor", line)?.to_string(),
        model:     field(&caps, 2, "model", line)?.to_string(),
        expander:  number(field(&caps, 3, "expander", line)?, kind, line)?,
        wwid:      field(&caps, 4, "wwid", line)?.to_string(),
    })
}

/// Parse an array header. The drive list starts empty.
pub fn parse_array(line: &str) -> Result<Array, ParseError> {
    let caps = captures(array_re(), LineKind::Array, line)?;

    let id = field(&caps, 1, "id", line)?
        .chars()
        .next()
        .ok_or_else(|| ParseError::malformed(LineKind::Array, line))?;
    let ty     = field(&caps, 2, "type", line)?;
    let unused = parse_size(field(&caps, 3, "unused space", line)?)?;

    Ok(Array::new(id, ty.to_string(), unused))
}

/// Parse a `logicaldrive` or `physicaldrive` line.
pub fn parse_drive(line: &str) -> Result<Drive, ParseError> {
    if let Some(rest) = line.strip_prefix(LOGICAL_PREFIX) {
        parse_logical(after_prefix(rest, LineKind::LogicalDrive, line)?, line)
    } else if let Some(rest) = line.strip_prefix(PHYSICAL_PREFIX) {
        parse_physical(after_prefix(rest, LineKind::PhysicalDrive, line)?, line)
    } else {
        Err(ParseError::malformed(LineKind::Drive, line))
    }
}

// The prefix must be its own token: "logicaldrive1 (...)" is malformed.
fn after_prefix<'t>(rest: &'t str, kind: LineKind, line: &str) -> Result<&'t str, ParseError> {
    if rest.starts_with(char::is_whitespace) {
        Ok(rest.trim_start())
    } else {
        Err(ParseError::malformed(kind, line))
    }
}

fn parse_logical(rest: &str, line: &str) -> Result<Drive, ParseError> {
    let caps = captures(logical_re(), LineKind::LogicalDrive, rest)
        .map_err(|_| ParseError::malformed(LineKind::LogicalDrive, line))?;

    Ok(Drive {
        id:     field(&caps, 1, "id", line)?.to_string(),
        size:   parse_size(field(&caps, 2, "size", line)?)?,
        status: field(&caps, 4, "status", line)?.to_string(),
        kind:   DriveKind::Logical {
            raid_mode: field(&caps, 3, "raid mode", line)?.to_string(),
        },
    })
}

fn parse_physical(rest: &str, line: &str) -> Result<Drive, ParseError> {
    let kind = LineKind::PhysicalDrive;
    let caps = captures(physical_re(), kind, rest)
        .map_err(|_| ParseError::malformed(kind, line))?;

    Ok(Drive {
        id:     field(&caps, 1, "id", line)?.to_string(),
        size:   parse_size(field(&caps, 6, "size", line)?)?,
        status: field(&caps, 7, "status", line)?.to_string(),
        kind:   DriveKind::Physical {
            disk_type: field(&caps, 5, "type", line)?.to_string(),
            port:      field(&caps, 2, "port", line)?.to_string(),
            box_no:    number(field(&caps, 3, "box", line)?, kind, line)?,
            bay:       number(field(&caps, 4, "bay", line)?, kind, line)?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controller_header() {
        let ctl = parse_controller("Smart Array P410i in Slot 0 (Embedded)    (sn: 5001438012345678)").unwrap();
        assert_eq!(ctl.name, "Smart Array P410i");
        assert_eq!(ctl.slot, 0);
        assert_eq!(ctl.kind, "Embedded");
        assert_eq!(ctl.serial, "5001438012345678");
        assert!(ctl.sep.is_none());
        assert_eq!(ctl.arrays.len(), 1);
    }

    #[test]
    fn controller_header_rejects_other_text() {
        let err = parse_controller("Error: No controllers detected.").unwrap_err();
        assert!(matches!(err, ParseError::MalformedLine { kind: LineKind::Controller, .. }));
    }

    #[test]
    fn controller_slot_overflow_is_malformed() {
        let err = parse_controller("P400 in Slot 99999999999 (RAID)  (sn: X)").unwrap_err();
        assert!(matches!(err, ParseError::MalformedLine { kind: LineKind::Controller, .. }));
    }

    #[test]
    fn sep_line_needs_two_spaces_before_model() {
        let sep = parse_sep("SEP (Vendor ID PMCSIERA, Model  SRC 8x6G) 250 (WWID: 500143801234567F)").unwrap();
        assert_eq!(sep.vendor_id, "PMCSIERA");
        assert_eq!(sep.model, "SRC 8x6G");
        assert_eq!(sep.expander, 250);
        assert_eq!(sep.wwid, "500143801234567F");

        assert!(parse_sep("SEP (Vendor ID PMCSIERA, Model SRC 8x6G) 250 (WWID: 500143801234567F)").is_err());
    }

    #[test]
    fn array_header() {
        let arr = parse_array("array B (SATA, Unused Space: 1.5  GB)").unwrap();
        assert_eq!(arr.id, 'B');
        assert_eq!(arr.kind, "SATA");
        assert_eq!(arr.unused_space, 1_500_000_000);
        assert!(arr.drives.is_empty());
        assert!(!arr.is_unassigned());
    }

    #[test]
    fn array_header_requires_uppercase_letter() {
        assert!(matches!(
            parse_array("array a (SAS, Unused Space: 0  MB)"),
            Err(ParseError::MalformedLine { kind: LineKind::Array, .. })
        ));
    }

    #[test]
    fn array_header_with_bad_size() {
        assert!(matches!(
            parse_array("array A (SAS, Unused Space: lots)"),
            Err(ParseError::InvalidSize { .. })
        ));
    }

    #[test]
    fn logical_drive() {
        let d = parse_drive("logicaldrive 1 (136.7 GB, RAID 1, OK)").unwrap();
        assert_eq!(d.id, "1");
        assert_eq!(d.size, 136_700_000_000);
        assert_eq!(d.status, "OK");
        assert_eq!(d.kind, DriveKind::Logical { raid_mode: "RAID 1".into() });
    }

    #[test]
    fn logical_drive_status_keeps_commas() {
        let d = parse_drive("logicaldrive 2 (1.1 TB, RAID 5, Recovering, 42% complete)").unwrap();
        assert_eq!(d.status, "Recovering, 42% complete");
        assert_eq!(d.mode(), "RAID 5");
    }

    #[test]
    fn physical_drive() {
        let d = parse_drive("physicaldrive 2I:1:5 (port 2I:box 1:bay 5, SAS, 300 GB, Predictive Failure)").unwrap();
        assert_eq!(d.id, "2I:1:5");
        assert_eq!(d.size, 300_000_000_000);
        assert_eq!(d.status, "Predictive Failure");
        assert_eq!(
            d.kind,
            DriveKind::Physical { disk_type: "SAS".into(), port: "2I".into(), box_no: 1, bay: 5 }
        );
    }

    #[test]
    fn physical_drive_box_must_be_numeric() {
        let err = parse_drive("physicaldrive 1I:x:1 (port 1I:box x:bay 1, SAS, 146 GB, OK)").unwrap_err();
        assert_eq!(
            err,
            ParseError::malformed(
                LineKind::PhysicalDrive,
                "physicaldrive 1I:x:1 (port 1I:box x:bay 1, SAS, 146 GB, OK)"
            )
        );
    }

    #[test]
    fn drive_prefix_must_be_separate_token() {
        assert_eq!(
            parse_drive("logicaldrive1 (1 GB, RAID 0, OK)"),
            Err(ParseError::malformed(LineKind::LogicalDrive, "logicaldrive1 (1 GB, RAID 0, OK)"))
        );
        assert!(matches!(
            parse_drive("physicaldrive1I:1:1 (port 1I:box 1:bay 1, SAS, 146 GB, OK)"),
            Err(ParseError::MalformedLine { kind: LineKind::PhysicalDrive, .. })
        ));
    }

    #[test]
    fn absent_capture_group_is_missing_field() {
        let re = Regex::new(r"^(\d+)(?: \((\w+)\))?$").unwrap();
        let caps = re.captures("42").unwrap();
        assert_eq!(field(&caps, 1, "id", "42").unwrap(), "42");
        assert_eq!(
            field(&caps, 2, "mode", "42"),
            Err(ParseError::MissingField { field: "mode", text: "42".into() })
        );
    }

    #[test]
    fn unknown_drive_prefix() {
        assert!(matches!(
            parse_drive("tapedrive 1 (LTO, OK)"),
            Err(ParseError::MalformedLine { kind: LineKind::Drive, .. })
        ));
    }
}
