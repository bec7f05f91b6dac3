//! The tick-driven scheduler for delayed and repeating work.
//!
//! Scheduled work is tagged data, not callbacks: each step carries a
//! [`StepKind`] the engine dispatches on when it fires. That keeps the whole
//! timeline inspectable, serializable in principle, and free of borrow
//! entanglement between the scheduler and the world it mutates.

use crate::geometry::Direction;
use crate::state::{ThingId, Tick};

/// Opaque handle to a scheduled step, for targeted cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventHandle(u64);

/// How many times a repeating step still fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Repeats {
    Forever,
    Count(u32),
}

impl Repeats {
    /// Consumes one firing; returns false when none remain after it.
    fn consume(&mut self) -> bool {
        match self {
            Self::Forever => true,
            Self::Count(n) => {
                *n = n.saturating_sub(1);
                *n > 0
            }
        }
    }
}

/// The work a step performs when it fires.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepKind {
    /// One walking segment (a block's worth of shifts) has completed.
    WalkSegmentDone { character: ThingId },

    /// Advance the walking sprite class cycle.
    ClassCycle {
        character: ThingId,
        classes: Vec<String>,
        index: usize,
    },

    /// Toggle horizontal mirroring mid-stride (vertical walk cycles).
    WalkFlipToggle { character: ThingId },

    /// A roaming NPC considers a random step.
    RoamPulse { character: ThingId },

    /// Shift the hop offset by the current delta.
    HopOffsetShift { character: ThingId },

    /// Invert the hop delta at the arc's midpoint.
    HopInvert { character: ThingId },

    /// Land the hop and restore normal collision.
    HopEnd { character: ThingId },

    /// Keep the hop shadow under its owner.
    ShadowFollow { character: ThingId },

    /// Start a walk that was deferred while a menu closed.
    DeferredWalkStart {
        character: ThingId,
        direction: Direction,
    },

    /// Re-check a window detector against the viewport.
    WindowDetectorPoll { thing: ThingId },

    /// Play the next step of a scene routine.
    SceneAdvance { routine: String, index: usize },
}

/// One scheduled unit of work.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduledStep {
    pub handle: EventHandle,

    /// Thing this step belongs to; cancelled with it.
    pub owner: Option<ThingId>,

    pub fire_at: Tick,

    /// Ticks between repeats.
    pub period: u64,

    pub remaining: Repeats,

    pub kind: StepKind,
}

/// Insertion-ordered pending steps.
///
/// Steps due on the same tick fire in the order they were scheduled, which
/// keeps multi-step choreography (hop shift before hop end) deterministic.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    steps: Vec<ScheduledStep>,
    next_handle: u64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> EventHandle {
        let handle = EventHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    /// Schedules a one-shot step `delay` ticks from `now`.
    pub fn add_event(
        &mut self,
        now: Tick,
        delay: u64,
        owner: Option<ThingId>,
        kind: StepKind,
    ) -> EventHandle {
        self.add_event_interval(now, delay, 1, Repeats::Count(1), owner, kind)
    }

    /// Schedules a repeating step: first firing after `delay`, then every
    /// `period` ticks until `repeats` runs out.
    pub fn add_event_interval(
        &mut self,
        now: Tick,
        delay: u64,
        period: u64,
        repeats: Repeats,
        owner: Option<ThingId>,
        kind: StepKind,
    ) -> EventHandle {
        let handle = self.allocate();
        self.steps.push(ScheduledStep {
            handle,
            owner,
            fire_at: now + delay.max(1),
            period: period.max(1),
            remaining: repeats,
            kind,
        });
        handle
    }

    /// Cancels one step by handle.
    pub fn cancel(&mut self, handle: EventHandle) {
        self.steps.retain(|step| step.handle != handle);
    }

    /// Cancels every step owned by a thing.
    pub fn cancel_all_for(&mut self, owner: &ThingId) {
        self.steps
            .retain(|step| step.owner.as_ref() != Some(owner));
    }

    /// Removes and returns all steps due at or before `now`, in scheduling
    /// order. The caller runs each and may [`requeue`](Self::requeue) it.
    pub fn take_due(&mut self, now: Tick) -> Vec<ScheduledStep> {
        let mut due = Vec::new();
        let mut index = 0;
        while index < self.steps.len() {
            if self.steps[index].fire_at <= now {
                due.push(self.steps.remove(index));
            } else {
                index += 1;
            }
        }
        due
    }

    /// Puts a fired step back if it has repeats left.
    ///
    /// The step's `remaining` is consumed here, so callers hand back every
    /// step they do not want dropped.
    pub fn requeue(&mut self, mut step: ScheduledStep) {
        if step.remaining.consume() {
            step.fire_at = step.fire_at + step.period;
            self.steps.push(step);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Drops everything (map switches).
    pub fn clear(&mut self) {
        self.steps.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(name: &str) -> StepKind {
        StepKind::WalkSegmentDone {
            character: ThingId::new(name),
        }
    }

    #[test]
    fn one_shot_fires_once_and_is_dropped() {
        let mut timeline = Timeline::new();
        timeline.add_event(Tick::ZERO, 3, None, kind("a"));

        assert!(timeline.take_due(Tick::new(2)).is_empty());
        let due = timeline.take_due(Tick::new(3));
        assert_eq!(due.len(), 1);

        for step in due {
            timeline.requeue(step);
        }
        assert!(timeline.is_empty());
    }

    #[test]
    fn interval_repeats_on_its_period() {
        let mut timeline = Timeline::new();
        timeline.add_event_interval(
            Tick::ZERO,
            2,
            2,
            Repeats::Count(3),
            None,
            kind("a"),
        );

        let mut fired = 0;
        for tick in 1..=10 {
            for step in timeline.take_due(Tick::new(tick)) {
                fired += 1;
                timeline.requeue(step);
            }
        }
        assert_eq!(fired, 3);
        assert!(timeline.is_empty());
    }

    #[test]
    fn cancel_all_for_removes_only_that_owner() {
        let mut timeline = Timeline::new();
        let owner = ThingId::new("npc");
        timeline.add_event(Tick::ZERO, 1, Some(owner.clone()), kind("npc"));
        timeline.add_event(Tick::ZERO, 1, Some(ThingId::new("other")), kind("other"));

        timeline.cancel_all_for(&owner);
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn same_tick_steps_fire_in_scheduling_order() {
        let mut timeline = Timeline::new();
        timeline.add_event(Tick::ZERO, 1, None, kind("first"));
        timeline.add_event(Tick::ZERO, 1, None, kind("second"));

        let due = timeline.take_due(Tick::new(1));
        assert_eq!(due[0].kind, kind("first"));
        assert_eq!(due[1].kind, kind("second"));
    }

    #[test]
    fn zero_delay_clamps_to_next_tick() {
        let mut timeline = Timeline::new();
        timeline.add_event(Tick::new(5), 0, None, kind("a"));

        assert!(timeline.take_due(Tick::new(5)).is_empty());
        assert_eq!(timeline.take_due(Tick::new(6)).len(), 1);
    }
}
