// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Periodic refresh of a door.

use std::sync::Weak;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::controller::DoorController;
use crate::protocol::Relay;

/// Handle to a task that refreshes a door at a fixed interval.
///
/// The task holds only a weak reference to the door and exits on its own
/// once the door is dropped. Dropping the handle stops the task.
#[derive(Debug)]
pub struct PollScheduler {
    handle: JoinHandle<()>,
    interval: Duration,
}

impl PollScheduler {
    /// Spawns the poll task on the current tokio runtime.
    ///
    /// The first refresh runs immediately.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime, or if `interval` is zero.
    #[must_use]
    pub fn spawn<R: Relay + 'static>(door: Weak<DoorController<R>>, interval: Duration) -> Self {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let handle = tokio::spawn(async move {
            loop {
                ticker.tick().await;
                let Some(door) = door.upgrade() else {
                    tracing::debug!("Door dropped, poll task exiting");
                    break;
                };
                door.refresh().await;
            }
        });

        Self { handle, interval }
    }

    /// Returns the interval between refreshes.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true once the task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stops the task. A refresh in flight is abandoned.
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::estimator::PositionEstimator;
    use crate::protocol::mock::MockRelay;
    use crate::sensor::SwitchSensor;
    use crate::types::TargetPosition;

    const INTERVAL: Duration = Duration::from_secs(2);

    fn door() -> (MockRelay, Arc<DoorController<MockRelay>>) {
        let open = MockRelay::new("5");
        let estimator = PositionEstimator::switches(
            SwitchSensor::new(open.clone()),
            SwitchSensor::new(MockRelay::new("6")),
            Duration::from_secs(5),
        );
        let door = DoorController::new(MockRelay::new("4"), estimator, TargetPosition::Open);
        (open, Arc::new(door))
    }

    #[tokio::test(start_paused = true)]
    async fn refreshes_every_interval() {
        let (open, door) = door();
        let scheduler = PollScheduler::spawn(Arc::downgrade(&door), INTERVAL);

        // Ticks at 0s, 2s and 4s.
        tokio::time::sleep(Duration::from_millis(4500)).await;

        assert_eq!(open.queries(), 3);
        assert_eq!(scheduler.interval(), INTERVAL);
        assert!(!scheduler.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_task() {
        let (open, door) = door();
        let scheduler = PollScheduler::spawn(Arc::downgrade(&door), INTERVAL);

        tokio::time::sleep(Duration::from_millis(100)).await;
        scheduler.stop();
        tokio::time::sleep(INTERVAL * 5).await;

        assert_eq!(open.queries(), 1);
        assert!(scheduler.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn exits_when_door_dropped() {
        let (open, door) = door();
        let scheduler = PollScheduler::spawn(Arc::downgrade(&door), INTERVAL);

        tokio::time::sleep(Duration::from_millis(100)).await;
        drop(door);
        tokio::time::sleep(INTERVAL * 2).await;

        assert_eq!(open.queries(), 1);
        assert!(scheduler.is_finished());
    }

    #[tokio::test]
    #[should_panic(expected = "must be non-zero")]
    async fn zero_interval_panics_on_spawn() {
        let (_open, door) = door();
        let _scheduler = PollScheduler::spawn(Arc::downgrade(&door), Duration::ZERO);
    }
}
