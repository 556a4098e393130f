use crate::config::HealthRules;
use crate::models::raid::{Array, Controller, Drive};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Nagios plugin states. Variant order is the reduction order for
/// OK / WARNING / CRITICAL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Ok,
    Warning,
    Critical,
    Unknown,
    Dependent,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Ok        => "OK",
            Severity::Warning   => "WARNING",
            Severity::Critical  => "CRITICAL",
            Severity::Unknown   => "UNKNOWN",
            Severity::Dependent => "DEPENDENT",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Severity::Ok        => 0,
            Severity::Warning   => 1,
            Severity::Critical  => 2,
            Severity::Unknown   => 3,
            Severity::Dependent => 4,
        }
    }
}

/// One drive whose status is not "OK".
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub severity:   Severity,
    pub controller: String,
    pub array:      String,
    pub drive:      String,
    pub status:     String,
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "controller '{}', array '{}': drive '{}' status is {}",
            self.controller, self.array, self.drive, self.status
        )
    }
}

fn classify(array: &Array, drive: &Drive, rules: &HealthRules) -> Severity {
    if array.is_unassigned() {
        rules.unassigned
    } else if rules.warning_statuses.iter().any(|s| *s == drive.status) {
        Severity::Warning
    } else {
        Severity::Critical
    }
}

/// Walk every controller → array → drive in report order and return one
/// alert per unhealthy drive.
pub fn evaluate(controllers: &[Controller], rules: &HealthRules) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for ctl in controllers {
        for array in &ctl.arrays {
            for drive in array.drives.iter().filter(|d| !d.is_ok()) {
                let alert = Alert {
                    severity:   classify(array, drive, rules),
                    controller: ctl.describe(),
                    array:      array.describe(),
                    drive:      drive.describe(),
                    status:     drive.status.clone(),
                };
                debug!(severity = alert.severity.label(), "{}", alert);
                alerts.push(alert);
            }
        }
    }

    alerts
}

/// Worst severity across all alerts; OK when there are none.
pub fn overall(alerts: &[Alert]) -> Severity {
    alerts.iter().map(|a| a.severity).max().unwrap_or_default()
}
