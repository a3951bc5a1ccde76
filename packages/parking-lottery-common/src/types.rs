use std::fmt;

use cosmwasm_schema::cw_serde;

use crate::inventory::SlotLabel;

/// The lifecycle status of the live draw.
#[cw_serde]
#[derive(Copy, Eq)]
pub enum DrawStatus {
    NotStarted,
    Running,
    Paused,
    Completed,
}

impl DrawStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrawStatus::NotStarted => "not_started",
            DrawStatus::Running => "running",
            DrawStatus::Paused => "paused",
            DrawStatus::Completed => "completed",
        }
    }

    /// A session is in progress once started and until it completes.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, DrawStatus::Running | DrawStatus::Paused)
    }
}

impl fmt::Display for DrawStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a two-slot applicant receives once the pair pool has run dry.
#[cw_serde]
#[derive(Copy, Eq, Default)]
pub enum DegradePolicy {
    /// Fall back to a single slot from the single pool.
    #[default]
    DegradeToSingle,
    /// Grant nothing; the applicant is marked not allotted.
    GrantNothing,
}

/// One flat taking part in the draw.
#[cw_serde]
pub struct Applicant {
    /// Normalized flat number, unique across the register.
    pub flat_number: String,
    pub display_name: String,
    /// 1 or 2.
    pub requested_slots: u8,
    /// Registration order; the draw reveals applicants in ascending order.
    pub order: u32,
}

impl Applicant {
    pub fn wants_pair(&self) -> bool {
        self.requested_slots == 2
    }
}

#[cw_serde]
#[derive(Copy, Eq)]
pub enum AllotmentStatus {
    Allotted,
    NotAllotted,
}

impl AllotmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllotmentStatus::Allotted => "allotted",
            AllotmentStatus::NotAllotted => "not_allotted",
        }
    }
}

/// The revealed outcome for a single applicant. Never mutated once recorded.
#[cw_serde]
pub struct DrawResult {
    pub flat_number: String,
    pub display_name: String,
    pub requested_slots: u8,
    pub granted_slots: Vec<SlotLabel>,
    pub status: AllotmentStatus,
}

impl DrawResult {
    pub fn is_allotted(&self) -> bool {
        self.status == AllotmentStatus::Allotted
    }

    pub fn slots_granted(&self) -> u32 {
        self.granted_slots.len() as u32
    }

    /// A two-slot request satisfied with a single slot.
    pub fn is_degraded(&self) -> bool {
        self.requested_slots == 2 && self.granted_slots.len() == 1
    }

    /// Granted labels joined for display and export, e.g. `"G-3, G-4"`.
    pub fn slot_numbers(&self) -> String {
        self.granted_slots
            .iter()
            .map(SlotLabel::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// What a single `advance` produced.
#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
    /// An applicant was revealed and more remain.
    Revealed(DrawResult),
    /// The last applicant was revealed; the draw is now completed.
    Completed(DrawResult),
}

impl StepOutcome {
    pub fn result(&self) -> &DrawResult {
        match self {
            StepOutcome::Revealed(r) | StepOutcome::Completed(r) => r,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, StepOutcome::Completed(_))
    }
}
