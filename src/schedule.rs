// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2026 Michael Dippery <michael@monkey-robot.com>

//! Runs a job once a day at a fixed wall-clock time.
//!
//! A single daily trigger is polled once a second. There is no
//! cancellation; the process has to be terminated to stop waiting.

use crate::clock::{Clock, NaiveDateTime, NaiveTime, SystemClock, TimeDelta};
use log::{debug, info};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}:[0-9]{2}$").expect("invalid time regex"));

/// An error while scheduling a job.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// A time of day that is not in 24-hour `HH:MM` format.
    #[error("invalid time {0:?}: expected HH:MM in 24-hour format")]
    InvalidTime(String),
}

/// A time of day, to the minute.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PostTime(NaiveTime);

impl PostTime {
    /// Parses a time in strict 24-hour `HH:MM` format.
    ///
    /// Both the hour and minute must be exactly two digits.
    ///
    /// # Examples
    ///
    /// ```
    /// use redpen::schedule::PostTime;
    /// assert!(PostTime::parse("14:30").is_ok());
    /// assert!(PostTime::parse("2:30 PM").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidTime(s.to_string());
        if !TIME_RE.is_match(s) {
            return Err(invalid());
        }
        NaiveTime::parse_from_str(s, "%H:%M")
            .map(Self)
            .map_err(|_| invalid())
    }

    /// Creates a time from an hour (0-23) and minute (0-59).
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// The time of day.
    pub fn time(&self) -> NaiveTime {
        self.0
    }

    /// The first moment strictly after `now` that falls on this time of day.
    ///
    /// This is today if the time has not yet arrived, and tomorrow
    /// otherwise.
    pub fn next_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date().and_time(self.0);
        if today > now {
            today
        } else {
            today + TimeDelta::days(1)
        }
    }
}

impl FromStr for PostTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

/// A trigger armed to fire once a day at a given time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DailyTrigger {
    at: PostTime,
    next_run: NaiveDateTime,
    times_fired: u32,
}

impl DailyTrigger {
    /// Arms a trigger for the next occurrence of `at` after `now`.
    ///
    /// A time that has already passed today fires tomorrow, not
    /// immediately.
    pub fn arm(at: PostTime, now: NaiveDateTime) -> Self {
        let next_run = at.next_after(now);
        Self {
            at,
            next_run,
            times_fired: 0,
        }
    }

    /// The time of day the trigger fires.
    pub fn at(&self) -> PostTime {
        self.at
    }

    /// When the trigger fires next.
    pub fn next_run(&self) -> NaiveDateTime {
        self.next_run
    }

    /// How many times the trigger has fired.
    pub fn times_fired(&self) -> u32 {
        self.times_fired
    }

    /// True if the trigger should fire at `now`.
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        now >= self.next_run
    }

    /// Records a firing that finished at `now` and re-arms the trigger for
    /// the next day.
    pub fn fire(&mut self, now: NaiveDateTime) {
        self.times_fired += 1;
        self.next_run = self.at.next_after(now);
    }
}

/// A post whose content has already been written, waiting to be published
/// at a given time of day.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledPost {
    at: PostTime,
    topic: String,
    content: String,
}

impl ScheduledPost {
    /// Creates a new scheduled post.
    pub fn new(at: PostTime, topic: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            at,
            topic: topic.into(),
            content: content.into(),
        }
    }

    /// When the post is published.
    pub fn at(&self) -> PostTime {
        self.at
    }

    /// What the post is about.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// The body of the post.
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Waits for daily triggers, polling a [`Clock`] once a second.
#[derive(Debug, Default)]
pub struct Scheduler<C = SystemClock> {
    clock: C,
}

impl Scheduler {
    /// Creates a scheduler that tells time with the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> Scheduler<C> {
    /// How often the clock is checked.
    pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

    /// Creates a scheduler that tells time with `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Arms a trigger for the next occurrence of `at`.
    pub fn arm(&self, at: PostTime) -> DailyTrigger {
        let trigger = DailyTrigger::arm(at, self.clock.now());
        info!("armed trigger for {at}, next run at {}", trigger.next_run());
        trigger
    }

    /// Waits until `trigger` is due.
    pub async fn wait_until_due(&self, trigger: &DailyTrigger) {
        while !trigger.is_due(self.clock.now()) {
            sleep(Self::POLL_INTERVAL).await;
        }
    }

    /// Runs `job` every time `trigger` fires, forever.
    ///
    /// This never returns; the process must be terminated to stop it.
    pub async fn run_forever<F, Fut>(&self, mut trigger: DailyTrigger, mut job: F)
    where
        F: FnMut() -> Fut,
        Fut: Future,
        Fut::Output: fmt::Debug,
    {
        loop {
            self.wait_until_due(&trigger).await;
            let outcome = job().await;
            debug!("scheduled job finished: {outcome:?}");
            trigger.fire(self.clock.now());
            info!("next run at {}", trigger.next_run());
        }
    }
}

#[cfg(test)]
mod tests {
    mod post_time {
        use super::super::*;

        #[test]
        fn it_parses_24_hour_times() {
            let cases = [("14:30", 14, 30), ("00:00", 0, 0), ("23:59", 23, 59), ("09:05", 9, 5)];
            for (input, hour, minute) in cases {
                let actual = PostTime::parse(input).unwrap();
                assert_eq!(actual, PostTime::from_hm(hour, minute).unwrap(), "{input}");
            }
        }

        #[test]
        fn it_rejects_times_that_are_not_strictly_hh_mm() {
            let cases = [
                "2:30 PM", "9:30", "24:00", "12:60", "", "14:30:00", " 14:30", "14.30", "ab:cd",
                "١٤:٣٠",
            ];
            for input in cases {
                let actual = PostTime::parse(input);
                assert_eq!(actual, Err(Error::InvalidTime(input.to_string())), "{input:?}");
            }
        }

        #[test]
        fn it_parses_from_a_str() {
            let actual: PostTime = "07:45".parse().unwrap();
            assert_eq!(actual.to_string(), "07:45");
        }

        #[test]
        fn it_displays_as_hh_mm() {
            assert_eq!(PostTime::from_hm(8, 5).unwrap().to_string(), "08:05");
        }
    }

    mod daily_trigger {
        use super::super::*;
        use crate::test_utils::at;

        #[test]
        fn it_fires_later_today_if_the_time_has_not_passed() {
            let trigger = DailyTrigger::arm(PostTime::parse("14:30").unwrap(), at("2026-10-18 09:00:00"));
            assert_eq!(trigger.next_run(), at("2026-10-18 14:30:00"));
        }

        #[test]
        fn it_fires_tomorrow_if_the_time_has_passed() {
            let trigger = DailyTrigger::arm(PostTime::parse("14:30").unwrap(), at("2026-10-18 15:00:00"));
            assert_eq!(trigger.next_run(), at("2026-10-19 14:30:00"));
            assert!(!trigger.is_due(at("2026-10-18 15:00:00")));
        }

        #[test]
        fn it_fires_tomorrow_if_armed_at_exactly_that_time() {
            let trigger = DailyTrigger::arm(PostTime::parse("14:30").unwrap(), at("2026-10-18 14:30:00"));
            assert_eq!(trigger.next_run(), at("2026-10-19 14:30:00"));
        }

        #[test]
        fn it_rolls_over_at_the_end_of_the_month() {
            let trigger = DailyTrigger::arm(PostTime::parse("00:15").unwrap(), at("2026-10-31 23:50:00"));
            assert_eq!(trigger.next_run(), at("2026-11-01 00:15:00"));
        }

        #[test]
        fn it_is_due_once_the_time_arrives() {
            let trigger = DailyTrigger::arm(PostTime::parse("14:30").unwrap(), at("2026-10-18 09:00:00"));
            assert!(!trigger.is_due(at("2026-10-18 14:29:59")));
            assert!(trigger.is_due(at("2026-10-18 14:30:00")));
            assert!(trigger.is_due(at("2026-10-18 14:30:01")));
        }

        #[test]
        fn it_rearms_for_the_next_day_after_firing() {
            let mut trigger = DailyTrigger::arm(PostTime::parse("14:30").unwrap(), at("2026-10-18 09:00:00"));
            trigger.fire(at("2026-10-18 14:30:02"));
            assert_eq!(trigger.times_fired(), 1);
            assert_eq!(trigger.next_run(), at("2026-10-19 14:30:00"));
            assert!(!trigger.is_due(at("2026-10-18 14:30:03")));
        }
    }

    mod scheduler {
        use super::super::*;
        use crate::test_utils::{FrozenClock, TokioClock, at};
        use std::cell::Cell;
        use tokio::time::{Instant, timeout};

        #[test]
        fn it_arms_relative_to_its_clock() {
            let scheduler = Scheduler::with_clock(FrozenClock::new(at("2026-10-18 20:00:00")));
            let trigger = scheduler.arm(PostTime::parse("08:00").unwrap());
            assert_eq!(trigger.next_run(), at("2026-10-19 08:00:00"));
        }

        #[tokio::test(start_paused = true)]
        async fn it_polls_until_the_trigger_is_due() {
            let scheduler = Scheduler::with_clock(TokioClock::starting_at(at("2026-10-18 09:59:55")));
            let trigger = scheduler.arm(PostTime::parse("10:00").unwrap());
            let started = Instant::now();
            scheduler.wait_until_due(&trigger).await;
            let elapsed = started.elapsed();
            assert!(elapsed >= Duration::from_secs(5), "{elapsed:?}");
            assert!(elapsed < Duration::from_secs(6), "{elapsed:?}");
        }

        #[tokio::test(start_paused = true)]
        async fn it_runs_the_job_when_due() {
            let scheduler = Scheduler::with_clock(TokioClock::starting_at(at("2026-10-18 09:59:50")));
            let trigger = scheduler.arm(PostTime::parse("10:00").unwrap());
            let fired = Cell::new(0);
            let job = || {
                fired.set(fired.get() + 1);
                std::future::ready(())
            };
            let result = timeout(Duration::from_secs(60), scheduler.run_forever(trigger, job)).await;
            assert!(result.is_err(), "scheduler should never return");
            assert_eq!(fired.get(), 1);
        }

        #[tokio::test(start_paused = true)]
        async fn it_does_not_fire_immediately_for_a_time_already_passed() {
            let scheduler = Scheduler::with_clock(TokioClock::starting_at(at("2026-10-18 10:00:00")));
            let trigger = scheduler.arm(PostTime::parse("09:00").unwrap());
            let fired = Cell::new(0);
            let job = || {
                fired.set(fired.get() + 1);
                std::future::ready(())
            };
            let _ = timeout(Duration::from_secs(60 * 60), scheduler.run_forever(trigger, job)).await;
            assert_eq!(fired.get(), 0);
        }

        #[tokio::test(start_paused = true)]
        async fn it_fires_again_the_next_day() {
            let scheduler = Scheduler::with_clock(TokioClock::starting_at(at("2026-10-18 09:59:50")));
            let trigger = scheduler.arm(PostTime::parse("10:00").unwrap());
            let fired = Cell::new(0);
            let job = || {
                fired.set(fired.get() + 1);
                std::future::ready(())
            };
            let a_day_and_a_minute = Duration::from_secs(24 * 60 * 60 + 60);
            let _ = timeout(a_day_and_a_minute, scheduler.run_forever(trigger, job)).await;
            assert_eq!(fired.get(), 2);
        }
    }
}
