//! Assignment decoding.
//!
//! Turns a raw grid assignment into a [`RosterSchedule`]:
//!
//! 1. Per fellow and week, the single true rotation becomes the label.
//!    Two or more true rotations are a decoding defect.
//! 2. Per roster slot (core NCC slots, then Swing) and week, the
//!    occupants are listed in fellow order. With exactly two occupants
//!    the one with the higher cohort demotion rank (ties: higher fellow
//!    index) moves to the [`EXTRA`] column. More than two is a defect.
//!
//! Decoding is a pure function of its inputs. Slot columns follow the
//! slots of the enabled `SlotCoverage` rule when the decoder is built
//! with [`RosterDecoder::from_rules`]; a slot missing from the vocabulary
//! is an error, not an empty column.
//!
//! [`RosterDecoder::encode`] maps a schedule back onto the grid, so a
//! previous year can seed the next solve.

use tracing::debug;

use crate::cp::RawAssignment;
use crate::error::DecodeError;
use crate::models::{
    AssignmentGrid, FellowId, FellowTimeline, Roster, RosterSchedule, RotationId, RotationSet,
    SlotColumn, EXTRA, WEEKS,
};
use crate::rules::{core_slots, swing_slot, RuleBook, RuleConfig};

/// Decoder for solved assignments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterDecoder {
    /// Slots that take the demotion policy, in column order.
    pub core_slots: Vec<String>,
    /// Trailing slot column, listed after [`EXTRA`].
    pub swing: String,
}

impl Default for RosterDecoder {
    fn default() -> Self {
        Self {
            core_slots: core_slots(),
            swing: swing_slot(),
        }
    }
}

impl RosterDecoder {
    /// Creates the decoder for the standard slots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoder whose columns match the first enabled `SlotCoverage` rule;
    /// the standard slots when the book has none.
    pub fn from_rules(rules: &RuleBook) -> Self {
        rules
            .entries()
            .iter()
            .filter(|e| e.enabled)
            .find_map(|e| match &e.rule {
                RuleConfig::SlotCoverage(slots) => Some(Self {
                    core_slots: slots.core_slots.clone(),
                    swing: slots.swing.clone(),
                }),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Resolves every slot column against the vocabulary.
    pub fn require_slots(&self, rotations: &RotationSet) -> Result<Vec<RotationId>, DecodeError> {
        self.core_slots
            .iter()
            .chain(std::iter::once(&self.swing))
            .map(|slot| {
                rotations
                    .id_of(slot)
                    .ok_or_else(|| DecodeError::UnknownSlot { slot: slot.clone() })
            })
            .collect()
    }

    /// Maps a schedule onto the grid of `roster` and `rotations`.
    ///
    /// Timelines are matched by fellow name and labels by rotation name;
    /// fellows, weeks, and labels the grid does not know are skipped.
    pub fn encode(
        &self,
        roster: &Roster,
        rotations: &RotationSet,
        schedule: &RosterSchedule,
    ) -> RawAssignment {
        let grid = AssignmentGrid::new(roster.len(), rotations.len());
        let mut assignment = RawAssignment::empty(&grid);
        let mut skipped = 0usize;
        for timeline in &schedule.timelines {
            let Some(fellow) = roster.find(&timeline.name) else {
                skipped += 1;
                continue;
            };
            for (w, label) in timeline.weeks.iter().enumerate().take(WEEKS) {
                if label.is_empty() {
                    continue;
                }
                match rotations.id_of(label) {
                    Some(r) => assignment.set(grid.var(fellow.id, w, r), true),
                    None => skipped += 1,
                }
            }
        }
        debug!(assigned = assignment.count_true(), skipped, "schedule encoded");
        assignment
    }

    /// Decodes an assignment.
    pub fn decode(
        &self,
        roster: &Roster,
        rotations: &RotationSet,
        assignment: &RawAssignment,
    ) -> Result<RosterSchedule, DecodeError> {
        let slot_ids = self.require_slots(rotations)?;
        let grid = AssignmentGrid::new(roster.len(), rotations.len());
        if assignment.len() != grid.len() {
            return Err(DecodeError::AssignmentSize {
                expected: grid.len(),
                actual: assignment.len(),
            });
        }

        let timelines = roster
            .fellows()
            .iter()
            .map(|fellow| {
                let mut weeks = Vec::with_capacity(WEEKS);
                for w in 0..WEEKS {
                    let on: Vec<&str> = (0..rotations.len())
                        .filter(|&r| assignment.get(grid.var(fellow.id, w, r)))
                        .map(|r| rotations.name(r))
                        .collect();
                    match on.as_slice() {
                        [] => weeks.push(String::new()),
                        [one] => weeks.push(one.to_string()),
                        many => {
                            return Err(DecodeError::MultipleRotations {
                                fellow: fellow.name.clone(),
                                week: w,
                                rotations: many.iter().map(|s| s.to_string()).collect(),
                            })
                        }
                    }
                }
                Ok(FellowTimeline {
                    fellow: fellow.id,
                    name: fellow.name.clone(),
                    cohort: fellow.cohort,
                    weeks,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut extra = SlotColumn::new(EXTRA);
        let mut slots = Vec::with_capacity(self.core_slots.len() + 2);
        for (slot, &r) in self.core_slots.iter().zip(&slot_ids) {
            slots.push(slot_column(roster, &grid, assignment, slot, r, &mut extra)?);
        }
        let swing_id = slot_ids[self.core_slots.len()];
        let swing = slot_column(roster, &grid, assignment, &self.swing, swing_id, &mut extra)?;
        slots.push(extra);
        slots.push(swing);

        debug!(
            fellows = timelines.len(),
            demoted = slots
                .iter()
                .find(|c| c.slot == EXTRA)
                .map_or(0, |c| c.weeks.iter().map(Vec::len).sum::<usize>()),
            "assignment decoded"
        );
        Ok(RosterSchedule { timelines, slots })
    }
}

fn slot_column(
    roster: &Roster,
    grid: &AssignmentGrid,
    assignment: &RawAssignment,
    slot: &str,
    r: RotationId,
    extra: &mut SlotColumn,
) -> Result<SlotColumn, DecodeError> {
    let mut column = SlotColumn::new(slot);
    for w in 0..WEEKS {
        let mut on: Vec<FellowId> = (0..roster.len())
            .filter(|&f| assignment.get(grid.var(f, w, r)))
            .collect();
        if on.len() > 2 {
            return Err(DecodeError::Overstaffed {
                rotation: slot.to_string(),
                week: w,
                fellows: on.iter().map(|&f| name_of(roster, f)).collect(),
            });
        }
        if on.len() == 2 {
            let demoted = demotion_choice(roster, on[0], on[1]);
            on.retain(|&f| f != demoted);
            extra.weeks[w].push(name_of(roster, demoted));
        }
        column.weeks[w] = on.into_iter().map(|f| name_of(roster, f)).collect();
    }
    Ok(column)
}

/// Which of two co-assigned fellows moves to Extra.
fn demotion_choice(roster: &Roster, a: FellowId, b: FellowId) -> FellowId {
    let key = |f: FellowId| {
        let rank = roster.fellow(f).map_or(0, |x| x.cohort.demotion_rank());
        (rank, f)
    };
    if key(a) >= key(b) {
        a
    } else {
        b
    }
}

fn name_of(roster: &Roster, f: FellowId) -> String {
    roster
        .fellow(f)
        .map(|x| x.name.clone())
        .unwrap_or_default()
}
