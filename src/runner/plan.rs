//! Turning a run request into an ordered plan.

use crate::error::{BaselineError, Result};
use crate::steps::{resolve_in, Step, StepRegistry};

/// Which steps a run covers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RunRequest {
    /// Every step in the view.
    #[default]
    All,
    /// Exactly one step.
    Only(String),
    /// The referenced step and every later one.
    From(String),
}

/// Walk order over the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Registry order; the install and verify flows.
    Forward,
    /// Reverse registry order over steps that can be removed; the uninstall flow.
    Reverse,
}

/// Selects the ordered sub-sequence of the registry a run will walk.
pub struct ExecutionPlanner<'a> {
    view: Vec<&'a Step>,
    direction: Direction,
}

impl<'a> ExecutionPlanner<'a> {
    /// Planner over the whole registry in registry order.
    pub fn forward(registry: &'a StepRegistry) -> Self {
        Self {
            view: registry.steps().iter().collect(),
            direction: Direction::Forward,
        }
    }

    /// Planner over the steps that define a `remove` unit, last step first.
    pub fn reverse(registry: &'a StepRegistry) -> Self {
        Self {
            view: registry
                .steps()
                .iter()
                .rev()
                .filter(|s| s.remove.is_some())
                .collect(),
            direction: Direction::Reverse,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The steps this planner can select from, in walk order.
    pub fn view(&self) -> &[&'a Step] {
        &self.view
    }

    /// Build the plan for `request`.
    pub fn plan(&self, request: &RunRequest) -> Result<Vec<&'a Step>> {
        match request {
            RunRequest::All => Ok(self.view.clone()),
            RunRequest::Only(reference) => {
                let step = resolve_in(self.view.iter().copied(), reference)?;
                Ok(vec![step])
            }
            RunRequest::From(reference) => {
                if self.direction == Direction::Reverse {
                    return Err(BaselineError::Usage {
                        message: "--from is only supported for install".to_string(),
                    });
                }
                let start = resolve_in(self.view.iter().copied(), reference)?;
                Ok(self
                    .view
                    .iter()
                    .copied()
                    .filter(|s| s.id >= start.id)
                    .collect())
            }
        }
    }
}
