/// Repeating timer driven by the central tick.
/// Replaces a free-running `setInterval`: fires once per elapsed period.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period_ms: f64,
    elapsed_ms: f64,
    active: bool,
}

impl IntervalTimer {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms: period_ms.max(1.0),
            elapsed_ms: 0.0,
            active: true,
        }
    }

    /// Advance by `dt_ms`. Returns how many periods completed.
    pub fn tick(&mut self, dt_ms: f64) -> u32 {
        if !self.active {
            return 0;
        }
        self.elapsed_ms += dt_ms;
        let mut fired = 0;
        while self.elapsed_ms >= self.period_ms {
            self.elapsed_ms -= self.period_ms;
            fired += 1;
        }
        fired
    }

    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Stop firing. Equivalent of `clearInterval`.
    pub fn stop(&mut self) {
        self.active = false;
        self.elapsed_ms = 0.0;
    }

    pub fn restart(&mut self) {
        self.active = true;
        self.elapsed_ms = 0.0;
    }
}

/// One-shot deferred action. Equivalent of a `setTimeout` owned by a component.
#[derive(Debug, Clone, Default)]
pub struct Delay {
    remaining_ms: Option<f64>,
}

impl Delay {
    pub fn idle() -> Self {
        Self { remaining_ms: None }
    }

    pub fn after(ms: f64) -> Self {
        Self {
            remaining_ms: Some(ms.max(0.0)),
        }
    }

    /// (Re)arm the delay, replacing any pending countdown.
    pub fn arm(&mut self, ms: f64) {
        self.remaining_ms = Some(ms.max(0.0));
    }

    pub fn cancel(&mut self) {
        self.remaining_ms = None;
    }

    pub fn is_pending(&self) -> bool {
        self.remaining_ms.is_some()
    }

    /// Advance by `dt_ms`. Returns true exactly once, on the tick the delay expires.
    pub fn tick(&mut self, dt_ms: f64) -> bool {
        match self.remaining_ms.as_mut() {
            Some(remaining) => {
                *remaining -= dt_ms;
                if *remaining <= 0.0 {
                    self.remaining_ms = None;
                    true
                } else {
                    false
                }
            }
            None => false,
        }
    }
}
