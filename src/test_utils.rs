//! Shared test doubles for the controller and its collaborators.

use std::{
    sync::{Arc, Mutex, Weak},
    time::Duration,
};

use crate::{
    services::{WakeLock, WakeLockError},
    state::{Countdown, CountdownSink, Mode, ModeDuration, ModeListener, ModeTimerController, TimerListener},
};

/// Countdown that never fires by itself. Tests drive it through the sink it
/// was last started with.
#[derive(Clone, Default)]
pub struct ManualCountdown {
    inner: Arc<Mutex<ManualCountdownInner>>,
}

#[derive(Default)]
struct ManualCountdownInner {
    started: Vec<Duration>,
    cancels: usize,
    sink: Option<CountdownSink>,
}

impl ManualCountdown {
    pub fn started(&self) -> Vec<Duration> {
        self.inner.lock().unwrap().started.clone()
    }

    pub fn cancels(&self) -> usize {
        self.inner.lock().unwrap().cancels
    }

    pub fn sink(&self) -> Option<CountdownSink> {
        self.inner.lock().unwrap().sink.clone()
    }
}

impl Countdown for ManualCountdown {
    fn start(&mut self, total: Duration, sink: CountdownSink) {
        let mut inner = self.inner.lock().unwrap();
        inner.started.push(total);
        inner.sink = Some(sink);
    }

    fn cancel(&mut self) {
        self.inner.lock().unwrap().cancels += 1;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Tick(&'static str, String, f32),
    Finish(&'static str),
    Mode(Mode),
}

/// Ordered record of every notification seen by the listeners sharing it
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<Event>>>,
}

impl EventLog {
    pub fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn ticks(&self, name: &str) -> Vec<(String, f32)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Tick(who, label, percentage) if who == name => Some((label, percentage)),
                _ => None,
            })
            .collect()
    }

    pub fn finishes(&self, name: &str) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, Event::Finish(who) if *who == name))
            .count()
    }

    pub fn modes(&self) -> Vec<Mode> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Mode(mode) => Some(mode),
                _ => None,
            })
            .collect()
    }
}

enum Reaction {
    None,
    RemoveSelf(ModeTimerController, Weak<RecordingListener>),
    ResetOnce(ModeTimerController),
}

/// Timer and mode listener that appends everything it sees to an [`EventLog`]
pub struct RecordingListener {
    name: &'static str,
    log: EventLog,
    reaction: Mutex<Reaction>,
}

impl RecordingListener {
    pub fn new(name: &'static str, log: EventLog) -> Self {
        Self {
            name,
            log,
            reaction: Mutex::new(Reaction::None),
        }
    }

    /// Unregister from `controller` inside every tick callback
    pub fn remove_self_on_tick(&self, controller: &ModeTimerController, this: &Arc<RecordingListener>) {
        *self.reaction.lock().unwrap() = Reaction::RemoveSelf(controller.clone(), Arc::downgrade(this));
    }

    /// Call `reset()` from inside the first tick callback
    pub fn reset_on_first_tick(&self, controller: &ModeTimerController) {
        *self.reaction.lock().unwrap() = Reaction::ResetOnce(controller.clone());
    }
}

impl TimerListener for RecordingListener {
    fn on_tick(&self, label: &str, percentage: f32) {
        self.log.push(Event::Tick(self.name, label.to_string(), percentage));

        let reaction = std::mem::replace(&mut *self.reaction.lock().unwrap(), Reaction::None);
        match reaction {
            Reaction::None => {}
            Reaction::RemoveSelf(controller, this) => {
                if let Some(this) = this.upgrade() {
                    controller.remove_timer_listener(&this);
                }
                *self.reaction.lock().unwrap() = Reaction::RemoveSelf(controller, this);
            }
            Reaction::ResetOnce(controller) => controller.reset(),
        }
    }

    fn on_finish(&self) {
        self.log.push(Event::Finish(self.name));
    }
}

impl ModeListener for RecordingListener {
    fn on_mode_changed(&self, mode: Mode) {
        self.log.push(Event::Mode(mode));
    }
}

/// Wake lock that records every request instead of touching the system
#[derive(Clone, Default)]
pub struct RecordingWakeLock {
    inner: Arc<Mutex<RecordingWakeLockInner>>,
}

#[derive(Default)]
struct RecordingWakeLockInner {
    acquired: Vec<ModeDuration>,
    releases: usize,
    held: bool,
    fail_acquire: bool,
}

impl RecordingWakeLock {
    pub fn failing() -> Self {
        let lock = Self::default();
        lock.inner.lock().unwrap().fail_acquire = true;
        lock
    }

    pub fn set_failing(&self, failing: bool) {
        self.inner.lock().unwrap().fail_acquire = failing;
    }

    pub fn acquired(&self) -> Vec<ModeDuration> {
        self.inner.lock().unwrap().acquired.clone()
    }

    pub fn releases(&self) -> usize {
        self.inner.lock().unwrap().releases
    }
}

impl WakeLock for RecordingWakeLock {
    fn acquire(&mut self, duration: ModeDuration) -> Result<(), WakeLockError> {
        let mut inner = self.inner.lock().unwrap();
        inner.acquired.push(duration);
        if inner.fail_acquire {
            return Err(WakeLockError::Spawn(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "systemd-inhibit not found",
            )));
        }
        inner.held = true;
        Ok(())
    }

    fn release(&mut self) -> Result<(), WakeLockError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.held {
            inner.releases += 1;
            inner.held = false;
        }
        Ok(())
    }

    fn is_held(&mut self) -> bool {
        self.inner.lock().unwrap().held
    }
}
