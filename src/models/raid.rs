use crate::util::human::fmt_size;
use serde::Serialize;

/// Identifier of the synthetic array holding drives not assigned to any array.
pub const UNASSIGNED_ID: char = 'U';

/// One Smart Array controller from `hpacucli ctrl all show config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Controller {
    pub name:   String,
    pub kind:   String,   // "Embedded", "RAID 5", ...
    pub slot:   u32,
    pub serial: String,
    pub sep:    Option<StorageEnclosureProcessor>,
    /// Encounter order; `arrays[0]` is always the unassigned array.
    pub arrays: Vec<Array>,
}

impl Controller {
    pub fn new(name: String, kind: String, slot: u32, serial: String) -> Self {
        Self { name, kind, slot, serial, sep: None, arrays: vec![Array::unassigned()] }
    }

    pub fn describe(&self) -> String {
        format!("{} in slot {}", self.name, self.slot)
    }

    pub fn drive_count(&self) -> usize {
        self.arrays.iter().map(|a| a.drives.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageEnclosureProcessor {
    pub vendor_id: String,
    pub model:     String,
    pub expander:  u32,
    pub wwid:      String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Array {
    pub id:           char,
    pub kind:         String,   // "SAS", "SATA", "unassigned"
    pub unused_space: u64,
    pub drives:       Vec<Drive>,
}

impl Array {
    pub fn new(id: char, kind: String, unused_space: u64) -> Self {
        Self { id, kind, unused_space, drives: Vec::new() }
    }

    pub fn unassigned() -> Self {
        Self::new(UNASSIGNED_ID, "unassigned".to_string(), 0)
    }

    pub fn is_unassigned(&self) -> bool { self.id == UNASSIGNED_ID }

    pub fn describe(&self) -> String {
        format!("{} ({})", self.id, self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DriveKind {
    Logical {
        raid_mode: String,
    },
    Physical {
        disk_type: String,
        port:      String,
        #[serde(rename = "box")]
        box_no:    u32,
        bay:       u32,
    },
}

/// A logical drive (RAID volume) or a physical disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Drive {
    /// Volume index for logical drives, `port:box:bay` for physical ones.
    pub id:     String,
    pub size:   u64,
    /// Free-form controller status; only "OK" is healthy.
    pub status: String,
    #[serde(flatten)]
    pub kind:   DriveKind,
}

impl Drive {
    pub fn is_physical(&self) -> bool {
        matches!(self.kind, DriveKind::Physical { .. })
    }

    pub fn is_ok(&self) -> bool { self.status == "OK" }

    /// Disk type for physical drives, RAID level for logical ones.
    pub fn mode(&self) -> &str {
        match &self.kind {
            DriveKind::Logical { raid_mode }   => raid_mode,
            DriveKind::Physical { disk_type, .. } => disk_type,
        }
    }

    pub fn describe(&self) -> String {
        let label = if self.is_physical() { "physical" } else { "logical" };
        format!("{} {} ({}, {})", label, self.id, self.mode(), fmt_size(self.size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn physical(status: &str) -> Drive {
        Drive {
            id:     "1I:1:2".into(),
            size:   146_000_000_000,
            status: status.into(),
            kind:   DriveKind::Physical {
                disk_type: "SAS".into(),
                port:      "1I".into(),
                box_no:    1,
                bay:       2,
            },
        }
    }

    #[test]
    fn new_controller_owns_unassigned_array() {
        let ctl = Controller::new("Smart Array P410i".into(), "Embedded".into(), 0, "5001".into());
        assert_eq!(ctl.arrays.len(), 1);
        assert!(ctl.arrays[0].is_unassigned());
        assert_eq!(ctl.arrays[0].describe(), "U (unassigned)");
        assert_eq!(ctl.describe(), "Smart Array P410i in slot 0");
        assert_eq!(ctl.drive_count(), 0);
    }

    #[test]
    fn describes_physical_drive() {
        let d = physical("OK");
        assert!(d.is_physical());
        assert!(d.is_ok());
        assert_eq!(d.describe(), "physical 1I:1:2 (SAS, 146GB)");
    }

    #[test]
    fn describes_logical_drive() {
        let d = Drive {
            id:     "1".into(),
            size:   136_700_000_000,
            status: "Interim Recovery Mode".into(),
            kind:   DriveKind::Logical { raid_mode: "RAID 1".into() },
        };
        assert!(!d.is_physical());
        assert!(!d.is_ok());
        assert_eq!(d.describe(), "logical 1 (RAID 1, 137GB)");
    }

    #[test]
    fn status_match_is_exact() {
        assert!(!physical("ok").is_ok());
        assert!(!physical("OK ").is_ok());
    }

    #[test]
    fn drive_serializes_flat() {
        let v = serde_json::to_value(physical("OK")).unwrap();
        assert_eq!(v["type"], "physical");
        assert_eq!(v["box"], 1);
        assert_eq!(v["status"], "OK");
    }
}
