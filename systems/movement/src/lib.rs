#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that asks ready agents to take a step.

use std::collections::{BTreeMap, BTreeSet};

use lane_defence_core::{AgentId, AgentView, Command, Event, PathId};

/// Pure system that reacts to world events and emits movement commands.
///
/// Agents that reported waiting on a searching path are left alone until
/// that path finishes or changes, instead of being asked again every tick.
#[derive(Debug, Default)]
pub struct Movement {
    waiting: BTreeSet<AgentId>,
}

impl Movement {
    /// Consumes world events and the agent view to emit `StepAgent` commands.
    pub fn handle(&mut self, events: &[Event], agents: &AgentView, out: &mut Vec<Command>) {
        let mut time_advanced = false;
        let mut settled_paths = BTreeSet::new();

        for event in events {
            match event {
                Event::TimeAdvanced { .. } => time_advanced = true,
                Event::AgentWaiting { agent } => {
                    let _ = self.waiting.insert(*agent);
                }
                Event::AgentRerouted { agent, .. } | Event::AgentExited { agent } => {
                    let _ = self.waiting.remove(agent);
                }
                Event::PathCompleted { path }
                | Event::PathUnreachable { path }
                | Event::PathRepaired { path }
                | Event::PathReset { path } => {
                    let _ = settled_paths.insert(*path);
                }
                Event::LevelConfigured { .. } => self.waiting.clear(),
                _ => {}
            }
        }

        if !settled_paths.is_empty() {
            self.release_waiting(&settled_paths, agents);
        }

        if !time_advanced {
            return;
        }

        for agent in agents.iter() {
            if agent.ready_for_step && !self.waiting.contains(&agent.id) {
                out.push(Command::StepAgent { agent: agent.id });
            }
        }
    }

    fn release_waiting(&mut self, settled_paths: &BTreeSet<PathId>, agents: &AgentView) {
        let paths: BTreeMap<AgentId, PathId> = agents
            .iter()
            .map(|snapshot| (snapshot.id, snapshot.path))
            .collect();
        self.waiting.retain(|agent| {
            paths
                .get(agent)
                .is_some_and(|path| !settled_paths.contains(path))
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use lane_defence_core::{AgentSnapshot, Tile};

    use super::*;

    fn snapshot(id: u32, path: u32, ready: bool) -> AgentSnapshot {
        AgentSnapshot {
            id: AgentId::new(id),
            tile: Tile::new(3, 1),
            path: PathId::new(path),
            target: None,
            ready_for_step: ready,
            accumulated: Duration::ZERO,
        }
    }

    #[test]
    fn only_ready_agents_step_in_id_order() {
        let view = AgentView::from_snapshots(vec![
            snapshot(2, 0, true),
            snapshot(1, 0, false),
            snapshot(0, 0, true),
        ]);
        let mut movement = Movement::default();
        let mut out = Vec::new();

        movement.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_millis(16),
            }],
            &view,
            &mut out,
        );

        assert_eq!(
            out,
            vec![
                Command::StepAgent {
                    agent: AgentId::new(0)
                },
                Command::StepAgent {
                    agent: AgentId::new(2)
                },
            ]
        );
    }

    #[test]
    fn nothing_moves_without_time_passing() {
        let view = AgentView::from_snapshots(vec![snapshot(0, 0, true)]);
        let mut movement = Movement::default();
        let mut out = Vec::new();

        movement.handle(&[], &view, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn waiting_agents_resume_once_their_path_completes() {
        let view = AgentView::from_snapshots(vec![snapshot(0, 4, true), snapshot(1, 5, true)]);
        let tick = Event::TimeAdvanced {
            dt: Duration::from_millis(16),
        };
        let mut movement = Movement::default();
        let mut out = Vec::new();

        movement.handle(
            &[Event::AgentWaiting {
                agent: AgentId::new(0),
            }],
            &view,
            &mut out,
        );
        movement.handle(&[tick.clone()], &view, &mut out);
        assert_eq!(
            out,
            vec![Command::StepAgent {
                agent: AgentId::new(1)
            }]
        );

        out.clear();
        movement.handle(
            &[
                tick,
                Event::PathCompleted {
                    path: PathId::new(4),
                },
            ],
            &view,
            &mut out,
        );
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn waiting_agents_resume_when_their_path_turns_unreachable() {
        let view = AgentView::from_snapshots(vec![snapshot(0, 7, true)]);
        let mut movement = Movement::default();
        let mut out = Vec::new();
        movement.handle(
            &[Event::AgentWaiting {
                agent: AgentId::new(0),
            }],
            &view,
            &mut out,
        );

        movement.handle(
            &[
                Event::TimeAdvanced {
                    dt: Duration::from_millis(16),
                },
                Event::PathUnreachable {
                    path: PathId::new(7),
                },
            ],
            &view,
            &mut out,
        );

        assert_eq!(
            out,
            vec![Command::StepAgent {
                agent: AgentId::new(0)
            }]
        );
    }
}
