use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use homestead_shared::colors::{hex_css, hsl_to_rgb, interpolate_hsl, rgb_to_hsl};

use crate::chart::BarRect;

pub const MAP_FILL_DURATION_MS: f64 = 1000.0;
pub const BAR_DURATION_MS: f64 = 500.0;
pub const BAR_STAGGER_MS: f64 = 20.0;

/// A fill color tween for one map region.
#[derive(Debug, Clone)]
pub struct FillTween {
    pub from_hsl: (f64, f64, f64),
    pub to_hsl: (f64, f64, f64),
    pub start: f64,
    pub duration: f64,
}

impl FillTween {
    pub fn new(from: (u8, u8, u8), to: (u8, u8, u8), start: f64, duration: f64) -> Self {
        Self {
            from_hsl: rgb_to_hsl(from.0, from.1, from.2),
            to_hsl: rgb_to_hsl(to.0, to.1, to.2),
            start,
            duration,
        }
    }

    /// Current interpolated color, or None once the tween has completed.
    pub fn current(&self, now: f64) -> Option<(u8, u8, u8)> {
        let elapsed = now - self.start;
        if elapsed >= self.duration {
            return None;
        }

        let t = cubic_ease_out((elapsed / self.duration).max(0.0));
        let hsl = interpolate_hsl(self.from_hsl, self.to_hsl, t);
        Some(hsl_to_rgb(hsl.0, hsl.1, hsl.2))
    }
}

/// A geometry tween for one bar. `start` already includes the bar's
/// per-rank stagger delay; before it the bar holds its old rectangle.
#[derive(Debug, Clone)]
pub struct BarTween {
    pub from: BarRect,
    pub to: BarRect,
    pub start: f64,
    pub duration: f64,
}

impl BarTween {
    pub fn current(&self, now: f64) -> Option<BarRect> {
        let elapsed = now - self.start;
        if elapsed >= self.duration {
            return None;
        }

        let t = cubic_ease_out((elapsed / self.duration).max(0.0));
        let lerp = |a: f64, b: f64| a + (b - a) * t;
        Some(BarRect {
            x: lerp(self.from.x, self.to.x),
            y: lerp(self.from.y, self.to.y),
            width: lerp(self.from.width, self.to.width),
            height: lerp(self.from.height, self.to.height),
        })
    }
}

/// All tweens started by one attribute switch.
///
/// `generation` increments on every switch and the whole set is replaced with
/// it, so views can only ever sample the newest switch's tweens. A
/// superseded transition never applies another frame, including its final
/// one: last writer wins deterministically under rapid switching.
#[derive(Debug, Clone, Default)]
pub struct TransitionSet {
    pub generation: u64,
    fills: HashMap<String, FillTween>,
    bars: HashMap<String, BarTween>,
}

impl TransitionSet {
    /// Fresh set superseding `previous`.
    pub fn next_generation(previous: &TransitionSet) -> Self {
        Self {
            generation: previous.generation + 1,
            fills: HashMap::new(),
            bars: HashMap::new(),
        }
    }

    pub fn insert_fill(&mut self, key: String, tween: FillTween) {
        self.fills.insert(key, tween);
    }

    pub fn insert_bar(&mut self, key: String, tween: BarTween) {
        self.bars.insert(key, tween);
    }

    /// In-flight fill color for a region, as CSS, if its tween is active.
    pub fn fill_css(&self, key: &str, now: f64) -> Option<String> {
        self.fills
            .get(key)?
            .current(now)
            .map(|(r, g, b)| hex_css(r, g, b))
    }

    /// In-flight fill color as RGB, used to seed the next switch's tweens
    /// from whatever is on screen right now.
    pub fn fill_rgb(&self, key: &str, now: f64) -> Option<(u8, u8, u8)> {
        self.fills.get(key)?.current(now)
    }

    /// In-flight rectangle for a bar, if its tween is active.
    pub fn bar_rect(&self, key: &str, now: f64) -> Option<BarRect> {
        self.bars.get(key)?.current(now)
    }

    /// Whether any tween still has frames left.
    pub fn active(&self, now: f64) -> bool {
        self.fills.values().any(|tw| tw.current(now).is_some())
            || self.bars.values().any(|tw| tw.current(now).is_some())
    }
}

/// Cubic ease-out: decelerating to zero velocity.
fn cubic_ease_out(t: f64) -> f64 {
    let t = t - 1.0;
    t * t * t + 1.0
}

/// Milliseconds since page load, the time base for every tween.
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

thread_local! {
    static CLOCK: RefCell<Option<TweenClock>> = const { RefCell::new(None) };
}

/// Install the application's clock. Replaces any previous instance, so a
/// re-mount cannot leave a stale callback driving dead signals.
pub fn init_clock(anim_now: RwSignal<f64>, transitions: RwSignal<TransitionSet>) {
    CLOCK.with(|slot| {
        *slot.borrow_mut() = Some(TweenClock::new(anim_now, transitions));
    });
}

/// Arm the installed clock after an attribute switch.
pub fn kick_clock() {
    CLOCK.with(|slot| {
        if let Some(clock) = slot.borrow().as_ref() {
            clock.kick();
        }
    });
}

/// Advances `anim_now` once per animation frame while any tween in
/// `transitions` is active, then goes idle. One persistent rAF callback,
/// re-armed by `kick()` after each attribute switch.
pub struct TweenClock {
    inner: Rc<Inner>,
}

struct Inner {
    window: Option<web_sys::Window>,
    scheduled: Cell<bool>,
    callback: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl TweenClock {
    pub fn new(anim_now: RwSignal<f64>, transitions: RwSignal<TransitionSet>) -> Self {
        let inner = Rc::new(Inner {
            window: web_sys::window(),
            scheduled: Cell::new(false),
            callback: RefCell::new(None),
        });

        let inner_cb = inner.clone();
        let cb = Closure::<dyn FnMut()>::new(move || {
            inner_cb.scheduled.set(false);
            let now = now_ms();
            anim_now.set(now);
            if transitions.with_untracked(|ts| ts.active(now)) {
                Self::schedule(&inner_cb);
            }
        });
        *inner.callback.borrow_mut() = Some(cb);

        Self { inner }
    }

    /// Arm the clock; no-op if a frame is already pending.
    pub fn kick(&self) {
        Self::schedule(&self.inner);
    }

    fn schedule(inner: &Rc<Inner>) {
        if inner.scheduled.get() {
            return;
        }
        let cb_ref = inner.callback.borrow();
        let (Some(window), Some(cb)) = (inner.window.as_ref(), cb_ref.as_ref()) else {
            return;
        };
        if window
            .request_animation_frame(cb.as_ref().unchecked_ref())
            .is_ok()
        {
            inner.scheduled.set(true);
        }
    }
}
