use serde::Serialize;

/// Inclusive drive-time range, in minutes from the hub city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DriveBand {
    pub label: &'static str,
    pub min: u32,
    pub max: u32,
}

impl DriveBand {
    pub const fn contains(&self, minutes: u32) -> bool {
        self.min <= minutes && minutes <= self.max
    }

    /// The fixed catalog, ordered from nearest to farthest.
    pub const fn catalog() -> &'static [DriveBand] {
        &DRIVE_BANDS
    }

    /// Case-insensitive label lookup. Unknown labels resolve to no band.
    pub fn from_label(label: &str) -> Option<DriveBand> {
        let label = label.trim();
        DRIVE_BANDS
            .iter()
            .find(|band| band.label.eq_ignore_ascii_case(label))
            .copied()
    }
}

const DRIVE_BANDS: [DriveBand; 6] = [
    DriveBand {
        label: "30 minutes",
        min: 0,
        max: 30,
    },
    DriveBand {
        label: "90 minutes",
        min: 31,
        max: 90,
    },
    DriveBand {
        label: "3 hours",
        min: 91,
        max: 180,
    },
    DriveBand {
        label: "5 hours",
        min: 181,
        max: 300,
    },
    DriveBand {
        label: "8 hours",
        min: 301,
        max: 480,
    },
    DriveBand {
        label: "12 hours",
        min: 481,
        max: 720,
    },
];
