//! Mode timer controller
//!
//! Single owner of "which mode are we in and how much time is left". Callers
//! drive it with [`ModeTimerController::advance_mode`] and
//! [`ModeTimerController::reset`]; a [`Countdown`] implementation feeds it
//! periodic ticks and a one-shot expiry through a [`CountdownSink`].
//!
//! ```text
//!            advance                 advance              advance
//! Inactive ──────────► 15min ──► ... ───────► Infinite ──────────► Inactive (+finish)
//!    ▲                   │                       │
//!    └── reset / expiry (+finish) ───────────────┘
//! ```
//!
//! Every request becomes a command. Commands are applied one at a time by
//! whichever thread holds the dispatch lock, and a caller on another thread
//! waits for it, so `advance_mode`/`reset` have taken effect by the time they
//! return. A request issued from inside a listener callback on the
//! dispatching thread is queued and drained before the outer call returns.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    thread::{self, ThreadId},
    time::Duration,
};
use tracing::{debug, info};

use super::{Mode, ModeDuration, TimerState};

/// Receives countdown progress and completion
pub trait TimerListener: Send + Sync {
    fn on_tick(&self, label: &str, percentage: f32);
    fn on_finish(&self);
}

/// Receives mode transitions
pub trait ModeListener: Send + Sync {
    fn on_mode_changed(&self, mode: Mode);
}

/// Scheduling capability behind the countdown: repeated ticks while running
/// and a single finish once `total` has elapsed.
pub trait Countdown: Send {
    /// Start a new countdown, replacing any that is still scheduled
    fn start(&mut self, total: Duration, sink: CountdownSink);

    /// Stop the current countdown without delivering its finish
    fn cancel(&mut self);
}

/// Handle a [`Countdown`] uses to report back to the controller.
///
/// Each sink is bound to the countdown it was issued for; reports from a
/// countdown that has since been cancelled or replaced are ignored.
#[derive(Clone)]
pub struct CountdownSink {
    shared: Weak<Shared>,
    generation: u64,
}

impl CountdownSink {
    /// Report the time left until expiry
    pub fn tick(&self, remaining: Duration) {
        self.submit(Command::Tick {
            generation: self.generation,
            remaining,
        });
    }

    /// Report that the countdown reached zero
    pub fn finish(&self) {
        self.submit(Command::Expire {
            generation: self.generation,
        });
    }

    fn submit(&self, command: Command) {
        if let Some(shared) = self.shared.upgrade() {
            ModeTimerController { shared }.submit(command);
        }
    }
}

#[derive(Debug)]
enum Command {
    Advance,
    Reset,
    Tick { generation: u64, remaining: Duration },
    Expire { generation: u64 },
}

struct Core {
    mode: Mode,
    timer: Option<TimerState>,
    generation: u64,
    countdown: Box<dyn Countdown>,
}

impl Core {
    /// Drop the current countdown and invalidate its sink
    fn discard_countdown(&mut self) {
        self.countdown.cancel();
        self.timer = None;
        self.generation += 1;
    }
}

#[derive(Default)]
struct Listeners {
    timer: Vec<Weak<dyn TimerListener>>,
    mode: Option<Weak<dyn ModeListener>>,
}

struct Shared {
    core: Mutex<Core>,
    listeners: Mutex<Listeners>,
    pending: Mutex<VecDeque<Command>>,
    dispatch: Mutex<()>,
    dispatcher: Mutex<Option<ThreadId>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Held while draining the command queue; records the draining thread
struct Dispatching<'a> {
    shared: &'a Shared,
    _guard: MutexGuard<'a, ()>,
}

impl<'a> Dispatching<'a> {
    fn enter(shared: &'a Shared) -> Self {
        let guard = lock(&shared.dispatch);
        *lock(&shared.dispatcher) = Some(thread::current().id());
        Self {
            shared,
            _guard: guard,
        }
    }
}

impl Drop for Dispatching<'_> {
    fn drop(&mut self) {
        *lock(&self.shared.dispatcher) = None;
    }
}

/// Shared handle to the mode timer. Clones refer to the same controller.
#[derive(Clone)]
pub struct ModeTimerController {
    shared: Arc<Shared>,
}

impl ModeTimerController {
    /// Create an inactive controller driven by the given countdown
    pub fn new(countdown: Box<dyn Countdown>) -> Self {
        Self {
            shared: Arc::new(Shared {
                core: Mutex::new(Core {
                    mode: Mode::Inactive,
                    timer: None,
                    generation: 0,
                    countdown,
                }),
                listeners: Mutex::new(Listeners::default()),
                pending: Mutex::new(VecDeque::new()),
                dispatch: Mutex::new(()),
                dispatcher: Mutex::new(None),
            }),
        }
    }

    /// Move to the next mode, or reset with a finish broadcast when the
    /// terminal mode is active
    pub fn advance_mode(&self) {
        self.submit(Command::Advance);
    }

    /// Return to `Inactive`, cancelling any countdown without a finish
    pub fn reset(&self) {
        self.submit(Command::Reset);
    }

    pub fn current_mode(&self) -> Mode {
        lock(&self.shared.core).mode
    }

    /// Snapshot of the active countdown, `None` while inactive
    pub fn timer_state(&self) -> Option<TimerState> {
        lock(&self.shared.core).timer.clone()
    }

    /// Register a tick/finish listener. The controller keeps only a weak
    /// reference; dropping the last `Arc` unregisters it implicitly.
    pub fn add_timer_listener<L>(&self, listener: &Arc<L>)
    where
        L: TimerListener + 'static,
    {
        let weak: Weak<L> = Arc::downgrade(listener);
        let weak: Weak<dyn TimerListener> = weak;
        lock(&self.shared.listeners).timer.push(weak);
    }

    /// Unregister a tick/finish listener. Unknown listeners are ignored.
    pub fn remove_timer_listener<L>(&self, listener: &Arc<L>)
    where
        L: TimerListener + 'static,
    {
        let target = Arc::as_ptr(listener);
        lock(&self.shared.listeners)
            .timer
            .retain(|weak| !std::ptr::addr_eq(weak.as_ptr(), target));
    }

    /// Replace the mode listener slot
    pub fn set_mode_listener<L>(&self, listener: Option<&Arc<L>>)
    where
        L: ModeListener + 'static,
    {
        let weak = listener.map(|l| {
            let weak: Weak<L> = Arc::downgrade(l);
            let weak: Weak<dyn ModeListener> = weak;
            weak
        });
        lock(&self.shared.listeners).mode = weak;
    }

    /// Empty the mode listener slot
    pub fn clear_mode_listener(&self) {
        lock(&self.shared.listeners).mode = None;
    }

    fn submit(&self, command: Command) {
        lock(&self.shared.pending).push_back(command);

        // Re-entrant call from a listener: the outer drain picks it up
        let reentrant = *lock(&self.shared.dispatcher) == Some(thread::current().id());
        if reentrant {
            return;
        }

        let _dispatching = Dispatching::enter(&self.shared);
        while let Some(command) = self.pop_pending() {
            self.apply(command);
        }
    }

    fn pop_pending(&self) -> Option<Command> {
        lock(&self.shared.pending).pop_front()
    }

    fn apply(&self, command: Command) {
        debug!("Applying controller command: {:?}", command);
        match command {
            Command::Advance => self.apply_advance(),
            Command::Reset => self.apply_reset(),
            Command::Tick {
                generation,
                remaining,
            } => self.apply_tick(generation, remaining),
            Command::Expire { generation } => self.apply_expire(generation),
        }
    }

    fn apply_advance(&self) {
        let current = self.current_mode();
        if current.is_terminal() {
            info!("Advancing past {} mode, deactivating", current);
            self.apply_reset();
            self.broadcast_finish();
            return;
        }

        let next = current.next();
        let duration = next.duration().unwrap_or(ModeDuration::Unbounded);

        {
            let mut core = lock(&self.shared.core);
            core.discard_countdown();
            core.timer = Some(TimerState::new(duration));
        }

        self.broadcast_tick(next.label(), 1.0);

        {
            let mut core = lock(&self.shared.core);
            if let ModeDuration::Finite(total) = duration {
                let sink = CountdownSink {
                    shared: Arc::downgrade(&self.shared),
                    generation: core.generation,
                };
                core.countdown.start(total, sink);
            }
            core.mode = next;
        }

        info!("Mode changed: {} -> {}", current, next);
        self.notify_mode(next);
    }

    fn apply_reset(&self) {
        {
            let mut core = lock(&self.shared.core);
            if core.mode.is_running() {
                info!("Resetting from {} mode", core.mode);
            }
            core.discard_countdown();
            core.mode = Mode::Inactive;
        }
        self.notify_mode(Mode::Inactive);
    }

    fn apply_tick(&self, generation: u64, remaining: Duration) {
        let progress = {
            let mut core = lock(&self.shared.core);
            if core.generation != generation {
                debug!("Ignoring tick from a cancelled countdown");
                return;
            }
            match core.timer.as_mut() {
                Some(timer) => {
                    timer.update(remaining);
                    timer.tick_progress()
                }
                None => None,
            }
        };

        if let Some(progress) = progress {
            self.broadcast_tick(&progress.label, progress.percentage);
        }
    }

    fn apply_expire(&self, generation: u64) {
        let current = {
            let core = lock(&self.shared.core);
            if core.generation != generation {
                debug!("Ignoring expiry from a cancelled countdown");
                return;
            }
            core.mode
        };

        info!("Countdown for {} mode expired", current);
        self.apply_reset();
        self.broadcast_finish();
    }

    /// Upgrade the registered timer listeners, pruning dropped ones. The
    /// broadcast iterates this snapshot, so listeners may add or remove
    /// registrations from inside a callback.
    fn timer_listeners(&self) -> Vec<Arc<dyn TimerListener>> {
        let mut listeners = lock(&self.shared.listeners);
        listeners.timer.retain(|weak| weak.strong_count() > 0);
        listeners.timer.iter().filter_map(Weak::upgrade).collect()
    }

    fn broadcast_tick(&self, label: &str, percentage: f32) {
        for listener in self.timer_listeners() {
            listener.on_tick(label, percentage);
        }
    }

    fn broadcast_finish(&self) {
        for listener in self.timer_listeners() {
            listener.on_finish();
        }
    }

    fn notify_mode(&self, mode: Mode) {
        let listener = lock(&self.shared.listeners)
            .mode
            .as_ref()
            .and_then(Weak::upgrade);
        if let Some(listener) = listener {
            listener.on_mode_changed(mode);
        }
    }
}

impl std::fmt::Debug for ModeTimerController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModeTimerController")
            .field("mode", &self.current_mode())
            .finish_non_exhaustive()
    }
}
