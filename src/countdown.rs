use crate::clock::Clock;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::{sync::Arc, time::Duration};
use tokio::{sync::watch, task::JoinHandle};
use tracing::debug;

pub const REFRESH_EVERY: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TimeLeft {
    pub days: i64,
    pub hours: i64,
}

/// Whole days and leftover hours until `target`, zero once it has passed.
pub fn time_left(now: NaiveDateTime, target: NaiveDateTime) -> TimeLeft {
    let hours = (target - now).num_hours();
    if hours <= 0 {
        return TimeLeft::default();
    }
    TimeLeft {
        days: hours / 24,
        hours: hours % 24,
    }
}

pub fn exam_start(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Background refresh of the countdown. Dropping the ticker stops the timer.
pub struct Ticker {
    handle: JoinHandle<()>,
    rx: watch::Receiver<TimeLeft>,
}

impl Ticker {
    pub fn spawn(clock: Arc<dyn Clock>, target: NaiveDateTime, every: Duration) -> Self {
        let (tx, rx) = watch::channel(time_left(clock.now(), target));
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                let left = time_left(clock.now(), target);
                debug!(days = left.days, hours = left.hours, "countdown refreshed");
                if tx.send(left).is_err() {
                    break;
                }
            }
        });
        Self { handle, rx }
    }

    pub fn current(&self) -> TimeLeft {
        *self.rx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<TimeLeft> {
        self.rx.clone()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
