#![forbid(unsafe_code)]

//! Animator that records every command it receives.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;
use sheet_core::animation::{AnimatedOffset, AnimationTicket, Animator, Easing};

/// One animate command as issued by the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnimateCommand {
    pub ticket: u64,
    pub target: f64,
    pub duration_ms: u64,
}

/// Shared, append-only view of recorded commands.
#[derive(Debug, Clone, Default)]
pub struct CommandLog(Rc<RefCell<Vec<AnimateCommand>>>);

impl CommandLog {
    /// Snapshot of every command so far.
    pub fn commands(&self) -> Vec<AnimateCommand> {
        self.0.borrow().clone()
    }

    /// Commands issued since index `from`.
    pub fn since(&self, from: usize) -> Vec<AnimateCommand> {
        self.0.borrow().get(from..).map(<[_]>::to_vec).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn last(&self) -> Option<AnimateCommand> {
        self.0.borrow().last().copied()
    }

    fn push(&self, command: AnimateCommand) {
        self.0.borrow_mut().push(command);
    }
}

/// [`AnimatedOffset`] plus a [`CommandLog`].
#[derive(Debug, Clone, Default)]
pub struct RecordingAnimator {
    inner: AnimatedOffset,
    log: CommandLog,
}

impl RecordingAnimator {
    pub fn new(easing: Easing) -> Self {
        Self {
            inner: AnimatedOffset::new(0.0).with_easing(easing),
            log: CommandLog::default(),
        }
    }

    /// Handle to the log; stays valid after the animator moves into a sheet.
    pub fn log(&self) -> CommandLog {
        self.log.clone()
    }
}

impl Animator for RecordingAnimator {
    fn animate_to(&mut self, target: f64, duration: Duration) -> AnimationTicket {
        let ticket = self.inner.animate_to(target, duration);
        self.log.push(AnimateCommand {
            ticket: ticket.0,
            target,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        });
        ticket
    }

    fn value(&self) -> f64 {
        self.inner.value()
    }

    fn target(&self) -> f64 {
        self.inner.target()
    }

    fn is_animating(&self) -> bool {
        self.inner.is_animating()
    }

    fn tick(&mut self, delta: Duration) -> Option<AnimationTicket> {
        self.inner.tick(delta)
    }
}
