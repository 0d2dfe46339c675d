//! Frame scheduler
//!
//! Replaces coroutine-style waits with plain data: one-shot tasks due after a
//! delay, and tasks that run every frame. Nothing is ever cancelled, so
//! handlers must guard their own effects.

#[derive(Debug, Clone)]
struct Delayed<T> {
    /// Scheduling order, breaks ties between equal due times
    seq: u64,
    due: f64,
    task: T,
}

#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: f64,
    next_seq: u64,
    frame_tasks: Vec<T>,
    delayed: Vec<Delayed<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_seq: 0,
            frame_tasks: Vec::new(),
            delayed: Vec::new(),
        }
    }

    /// Run `task` once, `delay` seconds from now
    pub fn after(&mut self, delay: f32, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.delayed.push(Delayed {
            seq,
            due: self.now + f64::from(delay.max(0.0)),
            task,
        });
    }

    /// Run `task` on every frame
    pub fn every_frame(&mut self, task: T) {
        self.frame_tasks.push(task);
    }
}

impl<T: Clone> Scheduler<T> {
    /// Advance time by `dt` and collect what should run this frame.
    ///
    /// Frame tasks come first (in registration order), followed by every
    /// one-shot task that has come due, ordered by due time then by the order
    /// they were scheduled.
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        self.now += f64::from(dt.max(0.0));

        let mut ready: Vec<T> = self.frame_tasks.clone();

        let now = self.now;
        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.delayed.drain(..).partition(|d| d.due <= now);
        self.delayed = waiting;

        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        ready.extend(due.into_iter().map(|d| d.task));
        ready
    }
}
