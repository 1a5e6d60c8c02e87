#![forbid(unsafe_code)]

//! Deterministic sheet driver.
//!
//! [`SheetHarness`] owns a [`BottomSheet`] wired to a [`RecordingAnimator`]
//! and an in-process [`KeyboardHub`], applies [`Step`]s on a [`FrameClock`],
//! and records one [`TraceLine`] per step.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use serde::Serialize;
use sheet_core::event::{LayoutEvent, PointerEvent};
use sheet_core::keyboard::KeyboardHub;
use sheet_widgets::{BottomSheet, SheetConfig, SheetEvent};
use tracing::info_span;

use crate::clock::FrameClock;
use crate::error::Result;
use crate::recorder::{AnimateCommand, CommandLog, RecordingAnimator};
use crate::script::{SheetScript, Step, Viewport};

/// What happened during one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceLine {
    /// Index of the step in the script.
    pub step: usize,
    /// Step operation name.
    pub op: &'static str,
    /// Frames advanced so far.
    pub frame: u64,
    /// Simulated time so far.
    pub elapsed_ms: u64,
    /// Sheet state after the step.
    pub state: &'static str,
    /// Current panel offset.
    pub offset: f64,
    /// Offset the animator is heading to.
    pub target: f64,
    /// Content height including the margin.
    pub content_height: f64,
    /// Keyboard height in effect.
    pub keyboard_height: f64,
    /// Animate commands issued during the step.
    pub commands: Vec<AnimateCommand>,
    /// Events reported during the step.
    pub events: Vec<&'static str>,
    /// Close notifications delivered so far.
    pub closes: u64,
}

impl TraceLine {
    /// Serialize as a single JSON line.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Join trace lines into JSONL.
pub fn to_jsonl(lines: &[TraceLine]) -> Result<String> {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line.to_json()?);
        out.push('\n');
    }
    Ok(out)
}

fn event_name(event: SheetEvent) -> &'static str {
    match event {
        SheetEvent::Opened => "opened",
        SheetEvent::Closed => "closed",
    }
}

/// Drives one sheet through scripted input.
pub struct SheetHarness {
    sheet: BottomSheet<RecordingAnimator>,
    hub: Arc<KeyboardHub>,
    clock: FrameClock,
    log: CommandLog,
    closes: Rc<Cell<u64>>,
    trace: Vec<TraceLine>,
}

impl std::fmt::Debug for SheetHarness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetHarness")
            .field("sheet", &self.sheet)
            .field("clock", &self.clock)
            .field("closes", &self.closes.get())
            .field("trace_len", &self.trace.len())
            .finish_non_exhaustive()
    }
}

impl SheetHarness {
    /// Create a harness for `config` laid out in `viewport`.
    pub fn new(config: SheetConfig, viewport: Viewport, clock: FrameClock) -> Result<Self> {
        let hub = KeyboardHub::shared();
        let animator = RecordingAnimator::new(config.easing);
        let log = animator.log();
        let closes = Rc::new(Cell::new(0));
        let counter = Rc::clone(&closes);
        let mut sheet = BottomSheet::with_animator(config, hub.clone(), animator)?;
        sheet.on_close(move || counter.set(counter.get() + 1));
        sheet.set_viewport(viewport.into());
        Ok(Self {
            sheet,
            hub,
            clock,
            log,
            closes,
            trace: Vec::new(),
        })
    }

    /// Create a harness with the script's configuration and viewport.
    pub fn for_script(script: &SheetScript, clock: FrameClock) -> Result<Self> {
        script.validate()?;
        Self::new(script.config.clone(), script.viewport, clock)
    }

    /// Apply every step of `script` and return the trace so far.
    pub fn run(&mut self, script: &SheetScript) -> Result<&[TraceLine]> {
        let _span = info_span!("sheet.replay", steps = script.steps.len()).entered();
        script.validate()?;
        for step in &script.steps {
            self.apply(*step);
        }
        Ok(&self.trace)
    }

    /// Apply one step and record its trace line.
    pub fn apply(&mut self, step: Step) -> &TraceLine {
        let index = self.trace.len();
        let _span = info_span!("sheet.step", index, op = step.op()).entered();
        let before = self.log.len();
        let mut events = Vec::new();

        match step {
            Step::Visible { value } => self.sheet.set_visible(value),
            Step::Layout { height } => self.sheet.on_layout(LayoutEvent::new(height)),
            Step::KeyboardShown { height } => {
                self.hub.emit_shown(height);
                self.sheet.poll_keyboard();
            }
            Step::KeyboardHidden => {
                self.hub.emit_hidden();
                self.sheet.poll_keyboard();
            }
            Step::PointerDown { x, y } => {
                self.sheet.handle_pointer(PointerEvent::down(x, y));
            }
            Step::PointerMove { x, y } => {
                self.sheet.handle_pointer(PointerEvent::moved(x, y));
            }
            Step::PointerUp { x, y } => {
                self.sheet.handle_pointer(PointerEvent::up(x, y));
            }
            Step::PointerCancel => {
                self.sheet.handle_pointer(PointerEvent::cancel(0.0, 0.0));
            }
            Step::Tap { x, y } => {
                self.sheet.handle_pointer(PointerEvent::down(x, y));
                self.sheet.handle_pointer(PointerEvent::up(x, y));
            }
            Step::Resize { width, height } => {
                self.sheet
                    .set_viewport(sheet_core::geometry::Size::new(width, height));
            }
            Step::AdvanceMs { ms } => {
                let frames = self
                    .clock
                    .frames_for(std::time::Duration::from_millis(ms));
                for _ in 0..frames {
                    let delta = self.clock.advance();
                    events.extend(self.sheet.tick(delta).into_iter().map(event_name));
                }
            }
        }

        let controller = self.sheet.controller();
        let line = TraceLine {
            step: index,
            op: step.op(),
            frame: self.clock.frame(),
            elapsed_ms: u64::try_from(self.clock.elapsed().as_millis()).unwrap_or(u64::MAX),
            state: controller.state().name(),
            offset: controller.offset(),
            target: controller.target(),
            content_height: controller.content_height(),
            keyboard_height: controller.keyboard_height(),
            commands: self.log.since(before),
            events,
            closes: self.closes.get(),
        };
        tracing::debug!(
            step = line.step,
            op = line.op,
            state = line.state,
            offset = line.offset,
            commands = line.commands.len(),
            "step applied"
        );
        self.trace.push(line);
        &self.trace[index]
    }

    /// Every trace line recorded so far.
    pub fn trace(&self) -> &[TraceLine] {
        &self.trace
    }

    /// Every animate command recorded so far.
    pub fn commands(&self) -> Vec<AnimateCommand> {
        self.log.commands()
    }

    /// Close notifications delivered so far.
    pub fn closes(&self) -> u64 {
        self.closes.get()
    }

    /// The sheet under test.
    pub fn sheet(&self) -> &BottomSheet<RecordingAnimator> {
        &self.sheet
    }

    /// Keyboard hub the sheet listens to.
    pub fn hub(&self) -> &Arc<KeyboardHub> {
        &self.hub
    }

    /// Frame clock driving the replay.
    pub fn clock(&self) -> FrameClock {
        self.clock
    }
}

/// Replay `script` from scratch with the default frame clock.
pub fn replay(script: &SheetScript) -> Result<Vec<TraceLine>> {
    let mut harness = SheetHarness::for_script(script, FrameClock::default())?;
    Ok(harness.run(script)?.to_vec())
}
