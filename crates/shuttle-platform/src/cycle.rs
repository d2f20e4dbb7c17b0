//! Waypoint cycle state machine.
//!
//! Tracks which leg (previous → current waypoint) is active and how long the
//! platform has spent on it. The timer is a free-running accumulator that is
//! decremented by one period on every advance, so fractional leftovers carry
//! into the next leg instead of drifting.

use crate::settings::{CyclePolicy, MotionSettings};

/// Direction of travel through the waypoint list (ping-pong only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Towards higher indices.
    #[default]
    Forward,
    /// Towards lower indices.
    Backward,
}

/// What happened when the state machine advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A new leg from `from` to `to` began.
    Advanced {
        /// Waypoint the new leg starts at.
        from: usize,
        /// Waypoint the new leg heads to.
        to: usize,
    },
    /// PlayOnce ran past the last waypoint; the cycle is over.
    Finished,
    /// StartToEnd ran past the last waypoint and restarted at waypoint 0.
    /// The body must be placed on waypoint 0 directly, not interpolated.
    Restarted,
}

/// Active leg indices, direction, and leg timer.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleState {
    previous_index: usize,
    current_index: usize,
    direction: Direction,
    timer: f64,
    policy: CyclePolicy,
    waypoint_count: usize,
    leg_duration: f64,
    inter_leg_delay: f64,
    finished: bool,
}

impl CycleState {
    /// Creates the state for `waypoint_count` waypoints.
    ///
    /// With two or more waypoints the first leg (0 → 1) is selected
    /// immediately. The timer then starts at `offset × period` so platforms
    /// sharing a layout can be phase-staggered.
    pub fn new(waypoint_count: usize, settings: &MotionSettings) -> Self {
        let mut state = Self {
            previous_index: 0,
            current_index: 0,
            direction: Direction::Forward,
            timer: 0.0,
            policy: settings.cycle_policy,
            waypoint_count,
            leg_duration: f64::from(settings.leg_duration),
            inter_leg_delay: f64::from(settings.inter_leg_delay),
            finished: false,
        };
        state.advance();
        state.timer = state.period() * f64::from(settings.offset.clamp(0.0, 1.0));
        state
    }

    /// Accumulates `dt` seconds and advances to the next leg once the
    /// current leg and its wait have both elapsed.
    ///
    /// At most one advance happens per call. Returns the transition, if any.
    pub fn tick(&mut self, dt: f64) -> Option<Transition> {
        if self.finished {
            return None;
        }
        self.timer += dt;

        let period = self.period();
        if self.timer <= period {
            return None;
        }
        if self.waypoint_count < 2 {
            // Nothing to advance to; keep the accumulator bounded.
            self.timer -= period;
            return None;
        }

        let transition = self.advance();
        self.timer -= period;
        transition
    }

    /// Moves to the next leg according to the cycle policy.
    ///
    /// Returns `None` without changing anything when fewer than two
    /// waypoints exist or the cycle has already finished.
    pub fn advance(&mut self) -> Option<Transition> {
        let count = self.waypoint_count;
        if count < 2 || self.finished {
            return None;
        }
        let last = count - 1;
        let from = self.current_index;
        self.previous_index = from;

        let transition = match self.policy {
            CyclePolicy::PlayOnce => {
                if from >= last {
                    self.finished = true;
                    tracing::debug!(waypoint = from, "Platform reached final waypoint");
                    Transition::Finished
                } else {
                    self.current_index = from + 1;
                    Transition::Advanced {
                        from,
                        to: self.current_index,
                    }
                }
            }
            CyclePolicy::Loop => {
                self.current_index = if from >= last { 0 } else { from + 1 };
                Transition::Advanced {
                    from,
                    to: self.current_index,
                }
            }
            CyclePolicy::PingPong => {
                if from >= last {
                    self.direction = Direction::Backward;
                } else if from == 0 {
                    self.direction = Direction::Forward;
                }
                self.current_index = match self.direction {
                    Direction::Forward => from + 1,
                    Direction::Backward => from - 1,
                };
                // Keep the stored direction pointing at the next advance.
                if self.current_index == last {
                    self.direction = Direction::Backward;
                } else if self.current_index == 0 {
                    self.direction = Direction::Forward;
                }
                Transition::Advanced {
                    from,
                    to: self.current_index,
                }
            }
            CyclePolicy::StartToEnd => {
                if from >= last {
                    self.previous_index = 0;
                    self.current_index = 1;
                    tracing::debug!("Platform restarting from first waypoint");
                    Transition::Restarted
                } else {
                    self.current_index = from + 1;
                    Transition::Advanced {
                        from,
                        to: self.current_index,
                    }
                }
            }
        };

        tracing::trace!(
            previous = self.previous_index,
            current = self.current_index,
            ?transition,
            "Platform cycle advanced"
        );
        Some(transition)
    }

    /// Index of the waypoint the active leg starts at.
    pub fn previous_index(&self) -> usize {
        self.previous_index
    }

    /// Index of the waypoint the active leg heads to.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Direction of the next ping-pong advance.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Seconds elapsed within the active leg (including its wait).
    pub fn timer(&self) -> f64 {
        self.timer
    }

    /// Seconds to traverse one leg.
    pub fn leg_duration(&self) -> f64 {
        self.leg_duration
    }

    /// Seconds to wait at each waypoint.
    pub fn inter_leg_delay(&self) -> f64 {
        self.inter_leg_delay
    }

    /// Leg plus wait: the timer threshold for advancing.
    pub fn period(&self) -> f64 {
        self.leg_duration + self.inter_leg_delay
    }

    /// Active cycle policy.
    pub fn policy(&self) -> CyclePolicy {
        self.policy
    }

    /// Number of waypoints this state indexes into.
    pub fn waypoint_count(&self) -> usize {
        self.waypoint_count
    }

    /// True once a PlayOnce cycle has run past its last waypoint.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
