//! Scripted input for driving a session without a window system.

use crate::draw::clip_window::{self, ClipPhase};
use crate::draw::input::{Command, InputEvent};
use crate::draw::render::DrawCommand;
use crate::draw::session::CanvasSession;
use crate::draw::state::Mode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayStep {
    Event(InputEvent),
    Command(Command),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    #[serde(default)]
    pub steps: Vec<ReplayStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayOutcome {
    pub mode: Mode,
    pub clip_phase: ClipPhase,
    pub primitive_count: usize,
    /// Commands that were refused, as `step index: reason`.
    pub rejected: Vec<String>,
    pub frame: Vec<DrawCommand>,
}

impl ReplayScript {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("deserialize replay script")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read replay script {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("parse replay script {}", path.display()))
    }

    pub fn run(&self, session: &mut CanvasSession) -> ReplayOutcome {
        let mut rejected = Vec::new();
        for (index, step) in self.steps.iter().enumerate() {
            match *step {
                ReplayStep::Event(event) => {
                    session.handle_event(event);
                }
                ReplayStep::Command(command) => {
                    if let Err(err) = session.execute(command) {
                        tracing::warn!(index, %err, "replay command rejected");
                        rejected.push(format!("{index}: {err}"));
                    }
                }
            }
        }

        ReplayOutcome {
            mode: session.mode(),
            clip_phase: clip_window::phase(session.scene()),
            primitive_count: session.scene().len(),
            rejected,
            frame: session.frame(),
        }
    }
}
