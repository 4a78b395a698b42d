//! Typed player commands and the FIFO they wait in

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::city::structure::StructureKind;
use crate::core::types::{Vec2, VillagerId};
use crate::entity::villager::Job;

/// A player intent, applied at the start of the next tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Spawn at home; `None` means an idle villager
    SpawnVillager { job: Option<Job> },
    AssignJob { villager: VillagerId, job: Job },
    MoveTo { villager: VillagerId, point: Vec2 },
    Build { kind: StructureKind, position: Vec2 },
}

#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    pending: VecDeque<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.pending.push_back(command);
    }

    /// Take every pending command in submission order
    pub fn drain(&mut self) -> Vec<Command> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
