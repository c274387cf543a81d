use crate::aircraft::Registration;
use crate::directory::{Resource, ResourceKind};
use crate::instructor::InstructorId;
use crate::time::Time;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Assigned by the store in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FlightId(pub u64);

impl fmt::Display for FlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for FlightId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim_start_matches('#').parse().map(FlightId)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightKind {
    #[default]
    Dual,
    Solo,
    Checkride,
    Spin,
    Photo,
    Meeting,
    Maintenance,
    Ground,
}

macro_rules! keyword_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| format!("unknown {} '{}'", stringify!($name), s))
            }
        }
    };
}

/// Display tag only; every non-cancelled flight occupies its resources
/// whatever its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlightCategory {
    #[default]
    Standard,
    Unavailable,
    SpinTraining,
    PhotoFlight,
    NewStudent,
    Meeting,
    Maintenance,
    InOffice,
    H6Operations,
    Groundschool,
    GroundInstruction,
    AircraftCheckout,
    DownTime,
    CheckrideCategory,
    Bfr,
}

keyword_enum!(FlightKind {
    Dual => "dual",
    Solo => "solo",
    Checkride => "checkride",
    Spin => "spin",
    Photo => "photo",
    Meeting => "meeting",
    Maintenance => "maintenance",
    Ground => "ground",
});

keyword_enum!(FlightCategory {
    Standard => "standard",
    Unavailable => "unavailable",
    SpinTraining => "spin-training",
    PhotoFlight => "photo-flight",
    NewStudent => "new-student",
    Meeting => "meeting",
    Maintenance => "maintenance",
    InOffice => "in-office",
    H6Operations => "h6-operations",
    Groundschool => "groundschool",
    GroundInstruction => "ground-instruction",
    AircraftCheckout => "aircraft-checkout",
    DownTime => "down-time",
    CheckrideCategory => "checkride-category",
    Bfr => "bfr",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CancelReason {
    ChangeOfPlans,
    Checkride,
    InstructorSick,
    InstructorUnavailable,
    Maintenance,
    StudentNoShow,
    StudentSick,
    Weather,
}

keyword_enum!(CancelReason {
    ChangeOfPlans => "change-of-plans",
    Checkride => "checkride",
    InstructorSick => "instructor-sick",
    InstructorUnavailable => "instructor-unavailable",
    Maintenance => "maintenance",
    StudentNoShow => "student-no-show",
    StudentSick => "student-sick",
    Weather => "weather",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum FlightStatus {
    Scheduled,
    Completed {
        hobbs: f64,
    },
    Cancelled {
        reason: CancelReason,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        comments: Option<String>,
    },
}

impl FlightStatus {
    /// Whether the flight still holds its aircraft and instructor.
    pub fn is_active(&self) -> bool {
        !matches!(self, FlightStatus::Cancelled { .. })
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self, FlightStatus::Scheduled)
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightStatus::Scheduled => write!(f, "scheduled"),
            FlightStatus::Completed { hobbs } => write!(f, "completed ({:.1} h)", hobbs),
            FlightStatus::Cancelled { reason, .. } => write!(f, "cancelled ({})", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub id: FlightId,
    pub date: NaiveDate,
    pub start: Time,
    pub end: Time,
    pub aircraft: Registration,
    pub instructor: InstructorId,
    pub student: String,
    pub kind: FlightKind,
    pub category: FlightCategory,
    pub status: FlightStatus,
}

impl Flight {
    pub fn span(&self) -> (Time, Time) {
        (self.start, self.end)
    }

    pub fn key_for(&self, kind: ResourceKind) -> &str {
        match kind {
            ResourceKind::Aircraft => &*self.aircraft,
            ResourceKind::Instructor => &*self.instructor,
        }
    }

    pub fn occupies(&self, resource: &Resource) -> bool {
        self.key_for(resource.kind()) == resource.key()
    }

    /// Booked length in minutes.
    pub fn duration(&self) -> u32 {
        self.end - self.start
    }
}
