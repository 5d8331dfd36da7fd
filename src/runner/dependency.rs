//! Dependency resolution for step execution ordering.
//!
//! Steps are referenced by their index in the registered slice; the resolver
//! never copies or mutates them.

use std::collections::HashMap;

use crate::error::{DotstepError, Result};
use crate::steps::Step;

/// A dependency name that matched no registered step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingDependency {
    /// Step that declared the dependency.
    pub step: String,
    /// The unmatched dependency name.
    pub dependency: String,
}

impl MissingDependency {
    /// Human-readable warning text.
    pub fn warning(&self) -> String {
        format!(
            "Dependency '{}' not found for step '{}'",
            self.dependency, self.step
        )
    }
}

/// Outcome of a resolution: an execution order plus any non-fatal warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Step indices, dependencies before dependents.
    pub order: Vec<usize>,
    /// Unresolvable dependency names, in discovery order.
    pub missing: Vec<MissingDependency>,
}

#[derive(Clone, Copy, PartialEq)]
enum VisitState {
    Unvisited,
    Visiting,
    Visited,
}

/// Orders steps so that each runs after its registered dependencies.
pub struct DependencyResolver<'a> {
    steps: &'a [Step],
    by_name: HashMap<&'a str, usize>,
}

impl<'a> DependencyResolver<'a> {
    /// Create a resolver over the registered steps.
    pub fn new(steps: &'a [Step]) -> Self {
        let mut by_name = HashMap::with_capacity(steps.len());
        for (idx, step) in steps.iter().enumerate() {
            by_name.entry(step.name()).or_insert(idx);
        }
        Self { steps, by_name }
    }

    /// Look up a step index by name.
    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Compute a full execution order.
    ///
    /// Independent steps keep their registration order. Fails on the first
    /// dependency cycle found.
    pub fn resolve(&self) -> Result<Resolution> {
        let mut walk = Walk::new(self.steps.len(), false);
        for idx in 0..self.steps.len() {
            self.visit(idx, &mut walk)?;
        }
        Ok(walk.finish())
    }

    /// Compute the transitive prerequisites of one step.
    ///
    /// The root itself is excluded, as are dependencies already completed.
    pub fn resolve_dependencies_of(&self, root: usize) -> Result<Resolution> {
        let mut walk = Walk::new(self.steps.len(), true);
        self.visit(root, &mut walk)?;

        let mut resolution = walk.finish();
        resolution.order.retain(|&idx| idx != root);
        Ok(resolution)
    }

    /// Direct registered dependencies of one step that are not completed,
    /// in registration order.
    pub fn direct_dependencies_of(&self, root: usize) -> Resolution {
        let step = &self.steps[root];
        let mut resolution = Resolution::default();

        for dep in step.dependencies() {
            match self.lookup(dep) {
                Some(idx) => {
                    if !self.steps[idx].is_completed() && !resolution.order.contains(&idx) {
                        resolution.order.push(idx);
                    }
                }
                None => resolution.missing.push(MissingDependency {
                    step: step.name().to_string(),
                    dependency: dep.clone(),
                }),
            }
        }

        resolution.order.sort_unstable();
        resolution
    }

    fn visit(&self, idx: usize, walk: &mut Walk) -> Result<()> {
        match walk.state[idx] {
            VisitState::Visited => return Ok(()),
            VisitState::Visiting => {
                let name = self.steps[idx].name();
                let start = walk
                    .path
                    .iter()
                    .position(|&p| p == idx)
                    .unwrap_or_default();
                let mut cycle: Vec<&str> = walk.path[start..]
                    .iter()
                    .map(|&p| self.steps[p].name())
                    .collect();
                cycle.push(name);

                return Err(DotstepError::CircularDependency {
                    step: name.to_string(),
                    cycle: cycle.join(" -> "),
                });
            }
            VisitState::Unvisited => {}
        }

        walk.state[idx] = VisitState::Visiting;
        walk.path.push(idx);

        let step = &self.steps[idx];
        for dep in step.dependencies() {
            match self.lookup(dep) {
                Some(dep_idx) => {
                    if walk.skip_completed && self.steps[dep_idx].is_completed() {
                        continue;
                    }
                    self.visit(dep_idx, walk)?;
                }
                None => walk.missing.push(MissingDependency {
                    step: step.name().to_string(),
                    dependency: dep.clone(),
                }),
            }
        }

        walk.path.pop();
        walk.state[idx] = VisitState::Visited;
        walk.order.push(idx);
        Ok(())
    }
}

struct Walk {
    state: Vec<VisitState>,
    path: Vec<usize>,
    order: Vec<usize>,
    missing: Vec<MissingDependency>,
    skip_completed: bool,
}

impl Walk {
    fn new(len: usize, skip_completed: bool) -> Self {
        Self {
            state: vec![VisitState::Unvisited; len],
            path: Vec::new(),
            order: Vec::with_capacity(len),
            missing: Vec::new(),
            skip_completed,
        }
    }

    fn finish(self) -> Resolution {
        Resolution {
            order: self.order,
            missing: self.missing,
        }
    }
}
