// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2026 Michael Dippery <michael@monkey-robot.com>

//! Reading wait times out of Reddit's rate-limit messages.
//!
//! When Reddit rate-limits a write it says how long to wait only in
//! prose, e.g., "Looks like you've been doing that a lot. Take a break for
//! 5 minutes before trying again." These functions pull a number of
//! minutes out of such a message.

use std::time::Duration;

/// Extra time to wait beyond what Reddit asked for.
pub const BUFFER: Duration = Duration::from_secs(5);

/// Number of minutes Reddit asked the client to wait.
///
/// This is every digit in the message before the first occurrence of
/// "minute", read as a single number. If there are no digits, the wait is
/// 1 minute.
///
/// # Examples
///
/// ```
/// use redpen::ratelimit::wait_minutes;
/// assert_eq!(wait_minutes("Take a break for 12 minutes before trying again."), 12);
/// assert_eq!(wait_minutes("Take a break for a minute."), 1);
/// ```
pub fn wait_minutes(message: &str) -> u64 {
    let before = message.split("minute").next().unwrap_or(message);
    let digits: String = before.chars().filter(char::is_ascii_digit).collect();
    // Digits too long to fit in a u64 wait as long as possible.
    match digits.parse::<u64>() {
        Ok(minutes) => minutes,
        Err(_) if digits.is_empty() => 1,
        Err(_) => u64::MAX,
    }
}

/// How long Reddit asked the client to wait, without the [`BUFFER`].
pub fn requested_wait(message: &str) -> Duration {
    Duration::from_secs(wait_minutes(message).saturating_mul(60))
}

/// How long to sleep before retrying: the [requested wait](requested_wait)
/// plus the [`BUFFER`].
///
/// # Examples
///
/// ```
/// use redpen::ratelimit::wait_duration;
/// use std::time::Duration;
/// let wait = wait_duration("Take a break for 12 minutes before trying again.");
/// assert_eq!(wait, Duration::from_secs(725));
/// ```
pub fn wait_duration(message: &str) -> Duration {
    requested_wait(message).saturating_add(BUFFER)
}
