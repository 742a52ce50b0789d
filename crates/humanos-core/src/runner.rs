use crate::routine::{Routine, Step};
use crate::types::RoutineStatus;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Went past the last step having visited every step.
    Completed,
    /// Finished with skipped steps, or left after getting past the first step.
    Partial,
    /// Left without ever moving past the first step.
    Abandoned,
}

impl RunOutcome {
    /// The status to persist, if any.
    pub fn status(self) -> Option<RoutineStatus> {
        match self {
            RunOutcome::Completed => Some(RoutineStatus::Completed),
            RunOutcome::Partial => Some(RoutineStatus::InProgress),
            RunOutcome::Abandoned => None,
        }
    }
}

/// Step-by-step cursor over one routine.
///
/// `advance` marks the current step done and moves on, `skip` moves on
/// without marking it, `back` revisits an earlier step. Moving forward from
/// the last step finishes the run.
#[derive(Debug, Clone)]
pub struct RoutineRunner<'a> {
    routine: &'a Routine,
    index: usize,
    visited: Vec<bool>,
    left_first_step: bool,
    outcome: Option<RunOutcome>,
}

impl<'a> RoutineRunner<'a> {
    pub fn new(routine: &'a Routine) -> Self {
        Self {
            routine,
            index: 0,
            visited: vec![false; routine.steps.len()],
            left_first_step: false,
            outcome: None,
        }
    }

    pub fn routine(&self) -> &Routine {
        self.routine
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total_steps(&self) -> usize {
        self.routine.steps.len()
    }

    pub fn current_step(&self) -> Option<&Step> {
        if self.is_finished() {
            return None;
        }
        self.routine.steps.get(self.index)
    }

    pub fn is_last_step(&self) -> bool {
        self.index + 1 >= self.total_steps()
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<RunOutcome> {
        self.outcome
    }

    /// Mark the current step done and move to the next one.
    pub fn advance(&mut self) -> Option<RunOutcome> {
        if let Some(visited) = self.visited.get_mut(self.index) {
            *visited = true;
        }
        self.forward()
    }

    /// Move to the next step without marking the current one done.
    pub fn skip(&mut self) -> Option<RunOutcome> {
        self.forward()
    }

    /// Go back one step. No effect on the first step or after finishing.
    pub fn back(&mut self) {
        if !self.is_finished() && self.index > 0 {
            self.index -= 1;
        }
    }

    /// Leave the run early.
    pub fn exit(&mut self) -> RunOutcome {
        if let Some(outcome) = self.outcome {
            return outcome;
        }
        let outcome = if self.left_first_step {
            RunOutcome::Partial
        } else {
            RunOutcome::Abandoned
        };
        self.outcome = Some(outcome);
        outcome
    }

    fn forward(&mut self) -> Option<RunOutcome> {
        if self.is_finished() {
            return self.outcome;
        }
        if self.is_last_step() {
            let outcome = if self.visited.iter().all(|v| *v) {
                RunOutcome::Completed
            } else {
                RunOutcome::Partial
            };
            self.outcome = Some(outcome);
            return self.outcome;
        }
        self.index += 1;
        self.left_first_step = true;
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
