use super::config::ThrottlePolicy;

/// Stored attempt history of one identity. Times are epoch seconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttemptRecord {
    /// Timestamps of recent allowed attempts, oldest first.
    pub attempts: Vec<f64>,
    /// Lockout end; `0.0` when not locked.
    pub locked_until: f64,
}

/// Outcome of one throttle check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// The request may proceed.
    Allow,
    /// The request is rejected until the wait elapses.
    Deny {
        /// Whole seconds until the lockout ends.
        wait_seconds: u64,
    },
}

/// Decision plus the record to persist, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptEvaluation {
    /// Allow or deny.
    pub decision: ThrottleDecision,
    /// Record to write back with the policy TTL; `None` leaves the store untouched.
    pub updated: Option<AttemptRecord>,
}

/// Evaluates one attempt against the stored record.
///
/// A locked identity is denied without a write, so the lockout is never
/// extended. Otherwise attempts older than the window are dropped; a full
/// window starts the lockout, anything else records the attempt.
/// The Redis script performs the same steps.
#[must_use]
pub fn evaluate_attempt(record: AttemptRecord, now: f64, policy: &ThrottlePolicy) -> AttemptEvaluation {
    if now < record.locked_until {
        return AttemptEvaluation {
            decision: ThrottleDecision::Deny {
                wait_seconds: whole_seconds(record.locked_until - now),
            },
            updated: None,
        };
    }

    let window_start = now - f64::from(policy.window_seconds);
    let mut attempts: Vec<f64> = record
        .attempts
        .into_iter()
        .filter(|timestamp| *timestamp > window_start)
        .collect();

    if attempts.len() >= policy.max_attempts as usize {
        let lockout = f64::from(policy.lockout_seconds);
        return AttemptEvaluation {
            decision: ThrottleDecision::Deny {
                wait_seconds: whole_seconds(lockout),
            },
            updated: Some(AttemptRecord {
                attempts,
                locked_until: now + lockout,
            }),
        };
    }

    attempts.push(now);
    AttemptEvaluation {
        decision: ThrottleDecision::Allow,
        updated: Some(AttemptRecord {
            attempts,
            locked_until: 0.0,
        }),
    }
}

fn whole_seconds(value: f64) -> u64 {
    if value <= 0.0 {
        return 0;
    }
    value.floor() as u64
}
