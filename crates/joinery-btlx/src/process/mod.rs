//! Machine processes and their parameter schemas.
//!
//! Each process type keeps its schema as a typed struct. [`Process`] wraps
//! one of them together with the joint label and the reference side the
//! parameters are measured against.

mod dovetail_tenon;
mod double_cut;
mod jack_rafter_cut;
mod lap;

pub use dovetail_tenon::DovetailTenon;
pub use double_cut::DoubleCut;
pub use jack_rafter_cut::JackRafterCut;
pub use lap::Lap;

use std::fmt;
use std::str::FromStr;

use crate::params::Field;
use crate::BtlxError;

/// Which end of the blank a process works from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Near the blank start.
    Start,
    /// Near the blank end.
    End,
}

impl Orientation {
    /// `Start` when `start_x` lies in the first half of the blank.
    pub fn from_start_x(start_x: f64, blank_length: f64) -> Self {
        if start_x < blank_length / 2.0 {
            Orientation::Start
        } else {
            Orientation::End
        }
    }

    /// Schema value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Start => "start",
            Orientation::End => "end",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = BtlxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Orientation::Start),
            "end" => Ok(Orientation::End),
            other => Err(BtlxError::InvalidParameter(format!(
                "orientation must be start or end, got {other:?}"
            ))),
        }
    }
}

/// Parameters of one process, by type.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessKind {
    /// Straight end cut.
    JackRafterCut(JackRafterCut),
    /// Two-plane notch.
    DoubleCut(DoubleCut),
    /// Milled pocket.
    Lap(Lap),
    /// Dovetail tenon.
    DovetailTenon(DovetailTenon),
}

/// A fabrication process on one part.
#[derive(Debug, Clone, PartialEq)]
pub struct Process {
    /// Label of the joint that produced the process.
    pub name: String,
    /// Zero-based reference side the parameters are measured on.
    pub reference_side: usize,
    /// Typed parameters.
    pub kind: ProcessKind,
}

impl Process {
    /// Element name in the document.
    pub fn process_type(&self) -> &'static str {
        match &self.kind {
            ProcessKind::JackRafterCut(_) => JackRafterCut::PROCESS_TYPE,
            ProcessKind::DoubleCut(_) => DoubleCut::PROCESS_TYPE,
            ProcessKind::Lap(_) => Lap::PROCESS_TYPE,
            ProcessKind::DovetailTenon(_) => DovetailTenon::PROCESS_TYPE,
        }
    }

    /// Schema fields in declared order.
    pub fn fields(&self) -> Vec<Field> {
        match &self.kind {
            ProcessKind::JackRafterCut(p) => p.fields(),
            ProcessKind::DoubleCut(p) => p.fields(),
            ProcessKind::Lap(p) => p.fields(),
            ProcessKind::DovetailTenon(p) => p.fields(),
        }
    }

    /// Header attributes of the process element.
    pub fn header_attributes(&self, process_id: usize) -> Vec<(&'static str, String)> {
        vec![
            ("Name", self.name.clone()),
            ("Process", "yes".into()),
            ("Priority", "0".into()),
            ("ProcessID", process_id.to_string()),
            ("ReferencePlaneID", (self.reference_side + 1).to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_split() {
        assert_eq!(Orientation::from_start_x(0.1, 1.0), Orientation::Start);
        assert_eq!(Orientation::from_start_x(0.5, 1.0), Orientation::End);
        assert_eq!("end".parse::<Orientation>().unwrap(), Orientation::End);
        assert!("middle".parse::<Orientation>().is_err());
    }

    #[test]
    fn test_header_is_one_based() {
        let process = Process {
            name: "T-Butt Joint".into(),
            reference_side: 0,
            kind: ProcessKind::JackRafterCut(JackRafterCut {
                orientation: Orientation::Start,
                start_x: 0.0,
                start_y: 0.0,
                start_depth: 0.0,
                angle: 90.0,
                inclination: 90.0,
            }),
        };
        let header = process.header_attributes(3);
        assert_eq!(header[3], ("ProcessID", "3".to_string()));
        assert_eq!(header[4], ("ReferencePlaneID", "1".to_string()));
        assert_eq!(process.process_type(), "JackRafterCut");
    }
}
