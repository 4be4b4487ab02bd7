//! Scripted interactions.
//!
//! A script is a RON list of steps, each mirroring one user gesture or
//! button in the selection mode:
//!
//! ```ron
//! [
//!     Layers([0]),
//!     Drag([(2, 2), (4, 4)]),
//!     Copy,
//!     Paste((10, 5)),
//!     Done,
//! ]
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use cell_selection::{
    BincodeCodec, EditEnv, LayerMask, SelectionError, SelectionOperator, SelectionSession,
    SelectionTool,
};
use level_core::{EditorError, GeoType, Position, SelectionConfig, TileOracle};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// One scripted gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    Tool(SelectionTool),
    Operator(SelectionOperator),
    /// Modifier-key override; `None` releases it.
    Override(Option<SelectionOperator>),
    /// Layers targeted by drags.
    Layers(Vec<usize>),
    /// Layer used by click tools.
    ActiveLayer(usize),
    /// Press at the first point, move through the rest, release.
    Drag(Vec<(i32, i32)>),
    Click((i32, i32)),
    Copy,
    Paste((i32, i32)),
    MoveLayer { direction: i32, geometry: bool },
    /// Overwrite the geometry of every selected cell.
    Fill(GeoType),
    Submit,
    Done,
    Cancel,
    Deactivate,
    Clear,
}

/// Parsed and validated script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    steps: Vec<Step>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let steps: Vec<Step> =
            ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse script RON: {}", e))?;

        for (index, step) in steps.iter().enumerate() {
            let layers: &[usize] = match step {
                Step::Layers(layers) => layers,
                Step::ActiveLayer(layer) => std::slice::from_ref(layer),
                Step::Drag(points) if points.is_empty() => {
                    anyhow::bail!("Step {}: drag without points", index)
                }
                _ => &[],
            };
            if let Some(layer) = layers.iter().find(|l| **l >= SelectionConfig::LAYER_COUNT) {
                anyhow::bail!("Step {}: layer {} does not exist", index, layer);
            }
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

/// Drives a [`SelectionSession`] through script steps.
pub struct ScriptRunner<'t> {
    session: SelectionSession,
    codec: BincodeCodec<'t>,
    layer_mask: LayerMask,
    active_layer: usize,
    clipboard: Option<Vec<u8>>,
    applied: usize,
    skipped: usize,
}

impl<'t> ScriptRunner<'t> {
    pub fn new(config: SelectionConfig, tiles: &'t dyn TileOracle) -> Self {
        Self {
            session: SelectionSession::new(config),
            codec: BincodeCodec::new(tiles),
            layer_mask: [true, false, false],
            active_layer: 0,
            clipboard: None,
            applied: 0,
            skipped: 0,
        }
    }

    pub fn session(&self) -> &SelectionSession {
        &self.session
    }

    pub fn clipboard(&self) -> Option<&[u8]> {
        self.clipboard.as_deref()
    }

    pub fn applied(&self) -> usize {
        self.applied
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Runs every step. Recoverable and validation failures are logged and
    /// skipped; anything else aborts the run.
    pub fn run(&mut self, script: &Script, env: &mut EditEnv<'_>) -> Result<()> {
        for (index, step) in script.steps().iter().enumerate() {
            debug!(step = index, ?step, "applying step");
            match self.apply(step, env) {
                Ok(()) => self.applied += 1,
                Err(error) if error.severity().is_user_facing() => {
                    warn!(
                        step = index,
                        code = error.error_code(),
                        severity = error.severity().as_str(),
                        %error,
                        "step skipped"
                    );
                    self.skipped += 1;
                }
                Err(error) => {
                    return Err(anyhow::anyhow!(
                        "Step {} failed [{}]: {}",
                        index,
                        error.error_code(),
                        error
                    ));
                }
            }
        }
        info!(applied = self.applied, skipped = self.skipped, "script finished");
        Ok(())
    }

    fn apply(&mut self, step: &Step, env: &mut EditEnv<'_>) -> Result<(), SelectionError> {
        let at = |(x, y): (i32, i32)| Position::new(x, y);
        match step {
            Step::Tool(tool) => self.session.set_tool(*tool, env),
            Step::Operator(operator) => self.session.set_operator(*operator),
            Step::Override(operator) => self.session.set_operator_override(*operator),
            Step::Layers(layers) => {
                self.layer_mask = [false; SelectionConfig::LAYER_COUNT];
                for layer in layers {
                    self.layer_mask[*layer] = true;
                }
            }
            Step::ActiveLayer(layer) => self.active_layer = *layer,
            Step::Drag(points) => {
                let Some((first, rest)) = points.split_first() else {
                    return Ok(());
                };
                self.session
                    .pointer_down(at(*first), &self.layer_mask, self.active_layer, env)?;
                for point in rest {
                    self.session.pointer_move(at(*point), self.active_layer, env)?;
                }
                self.session.pointer_up(&self.layer_mask, env);
            }
            Step::Click(point) => {
                self.session
                    .pointer_down(at(*point), &self.layer_mask, self.active_layer, env)?;
                self.session.pointer_up(&self.layer_mask, env);
            }
            Step::Copy => {
                self.clipboard = Some(self.session.copy(&self.codec, env)?);
            }
            Step::Paste(point) => match self.clipboard.as_deref() {
                Some(bytes) => self.session.paste(bytes, at(*point), &self.codec, env)?,
                None => warn!("paste with an empty clipboard"),
            },
            Step::MoveLayer {
                direction,
                geometry,
            } => self.session.move_selection_layer(*direction, *geometry, env),
            Step::Fill(geo) => {
                let filled = self.session.fill_selection(*geo, env);
                debug!(%geo, filled, "fill step");
            }
            Step::Submit => self.session.submit_move(env),
            Step::Done => self.session.done(env),
            Step::Cancel => self.session.cancel(env),
            Step::Deactivate => self.session.deactivate(env),
            Step::Clear => self.session.clear_selection(),
        }
        Ok(())
    }
}
