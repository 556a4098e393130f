use crate::alerts::{self, Alert};
use crate::models::raid::{Controller, DriveKind};
use crate::util::human::fmt_size;
use serde_json::{json, Value};
use std::fmt::Write;

/// Generate a human-readable controller / array / drive report.
pub fn generate(controllers: &[Controller], alerts: &[Alert]) -> String {
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let mut out = String::new();

    out.push_str("═══════════════════════════════════════════════\n");
    let _ = writeln!(out, "  hpraidmon Report — {}", now);
    out.push_str("═══════════════════════════════════════════════\n\n");

    // ── Alerts ─────────────────────────────────────────────────────────
    let _ = writeln!(out, "── Status: {} ({} alert(s)) ─────────────────", alerts::overall(alerts).label(), alerts.len());
    if alerts.is_empty() {
        out.push_str("  ● All drives OK\n");
    } else {
        for a in alerts {
            let _ = writeln!(out, "  [{}]  {}", a.severity.label(), a);
        }
    }
    out.push('\n');

    // ── Controllers ────────────────────────────────────────────────────
    let _ = writeln!(out, "── Controllers ({}) ───────────────────────────", controllers.len());
    for ctl in controllers {
        let _ = writeln!(out, "  {}  [{}]  sn {}", ctl.describe(), ctl.kind, ctl.serial);
        if let Some(sep) = &ctl.sep {
            let _ = writeln!(
                out,
                "    SEP {} {}  expander {}  wwid {}",
                sep.vendor_id, sep.model, sep.expander, sep.wwid
            );
        }
        for arr in &ctl.arrays {
            if arr.is_unassigned() && arr.drives.is_empty() { continue; }
            let _ = writeln!(out, "    array {}  unused {}", arr.describe(), fmt_size(arr.unused_space));
            for d in &arr.drives {
                let location = match &d.kind {
                    DriveKind::Physical { port, box_no, bay, .. } => {
                        format!("  port {} box {} bay {}", port, box_no, bay)
                    }
                    DriveKind::Logical { .. } => String::new(),
                };
                let _ = writeln!(out, "      {:<40} {}{}", d.describe(), d.status, location);
            }
        }
    }
    out.push('\n');

    out.push_str("═══════════════════════════════════════════════\n");
    out
}

/// Machine-readable snapshot of the parsed report and its verdict.
pub fn snapshot(controllers: &[Controller], alerts: &[Alert]) -> Value {
    json!({
        "hpraidmon_version": env!("CARGO_PKG_VERSION"),
        "timestamp":   chrono::Local::now().to_rfc3339(),
        "status":      alerts::overall(alerts).label(),
        "controllers": controllers,
        "alerts":      alerts,
    })
}
