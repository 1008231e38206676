//! Time-stepped tween scheduler.
//!
//! Tweens never own what they animate. Each one holds callbacks that receive
//! the animated target by `&mut` when the engine is stepped, so the target can
//! be freely inspected between frames and a tween can notice that the thing it
//! was animating has disappeared.
use std::collections::VecDeque;
use std::time::Duration;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    Linear,
    #[default]
    EaseInOutCubic,
    EaseOutCubic,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

type UpdateFn<T> = Box<dyn FnMut(&mut T, f32) + Send>;
type CompleteFn<T> = Box<dyn FnOnce(&mut T) + Send>;

/// One timed transition. `update` receives the eased progress in `[0, 1]`
/// every step; `complete` runs once, right after the final update.
pub struct Tween<T> {
    elapsed: Duration,
    duration: Duration,
    easing: Easing,
    update: UpdateFn<T>,
    complete: Option<CompleteFn<T>>,
    done: bool,
}

impl<T> Tween<T> {
    pub fn new(
        duration: Duration,
        easing: Easing,
        update: impl FnMut(&mut T, f32) + Send + 'static,
    ) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration,
            easing,
            update: Box::new(update),
            complete: None,
            done: false,
        }
    }

    pub fn on_complete(mut self, complete: impl FnOnce(&mut T) + Send + 'static) -> Self {
        self.complete = Some(Box::new(complete));
        self
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            1.0
        } else {
            (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        }
    }

    fn advance(&mut self, dt: Duration, target: &mut T) {
        if self.done {
            return;
        }
        self.elapsed = self.elapsed.saturating_add(dt);
        let t = self.progress();
        (self.update)(target, self.easing.apply(t));
        if t >= 1.0 {
            self.done = true;
            if let Some(complete) = self.complete.take() {
                complete(target);
            }
        }
    }

    fn finish(&mut self, target: &mut T) {
        self.advance(self.duration.saturating_sub(self.elapsed), target);
    }
}

impl<T> std::fmt::Debug for Tween<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tween")
            .field("elapsed", &self.elapsed)
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

/// Bounded set of live tweens over a target of type `T`.
pub struct AnimationEngine<T> {
    tweens: VecDeque<Tween<T>>,
    capacity: usize,
}

impl<T> AnimationEngine<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            tweens: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Admits a tween. At capacity the oldest tween is finished first, so the
    /// live set never grows past the cap.
    pub fn push(&mut self, tween: Tween<T>, target: &mut T) {
        while self.tweens.len() >= self.capacity {
            match self.tweens.pop_front() {
                Some(mut oldest) => oldest.finish(target),
                None => break,
            }
        }
        self.tweens.push_back(tween);
    }

    /// Advances every tween by `dt` and drops the finished ones.
    pub fn step(&mut self, dt: Duration, target: &mut T) {
        for tween in self.tweens.iter_mut() {
            tween.advance(dt, target);
        }
        self.tweens.retain(|tween| !tween.is_done());
    }

    /// Jumps every tween to its end state, running completions.
    pub fn finish_all(&mut self, target: &mut T) {
        while let Some(mut tween) = self.tweens.pop_front() {
            tween.finish(target);
        }
    }

    /// Drops every tween without running its completion.
    pub fn clear(&mut self) {
        self.tweens.clear();
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
