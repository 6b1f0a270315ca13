//! Incremental-load state machine for "Load More" style listings.
//!
//! Keeps clicking the load-more control until the listing stops growing,
//! the control disappears, a budget runs out, or the operator says stop.
//! All waiting is plain polling with fixed settle delays: the page is a
//! single live browser session and must be driven strictly sequentially.

use std::thread;
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::page::{ClickError, PageSource, SourceError};
use crate::prompt::{Decision, UserPrompt};

/// Budgets and settle delays for one pagination run. The delay defaults
/// mirror the timings the listing was originally tuned against; tests
/// zero them out.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// Upper bound on loop passes, counting intercepted-click retries.
    pub max_iterations: u32,
    /// Consecutive polls without growth before giving up.
    pub max_stale_attempts: u32,
    /// Wall-clock budget for the whole loop.
    pub max_runtime: Duration,
    /// How long to wait for the card count to grow after a click.
    pub growth_timeout: Duration,
    /// Poll interval while waiting for growth.
    pub growth_poll_interval: Duration,
    /// Settle delay before scrolling the control into view.
    pub pre_scroll_delay: Duration,
    /// Settle delay between scrolling and clicking.
    pub post_scroll_delay: Duration,
    /// Settle delay after confirmed growth.
    pub post_growth_delay: Duration,
    /// Pause after an intercepted click before retrying.
    pub retry_delay: Duration,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            max_stale_attempts: 5,
            max_runtime: Duration::from_secs(3600),
            growth_timeout: Duration::from_secs(10),
            growth_poll_interval: Duration::from_millis(250),
            pre_scroll_delay: Duration::from_secs(3),
            post_scroll_delay: Duration::from_millis(2500),
            post_growth_delay: Duration::from_secs(2),
            retry_delay: Duration::from_secs(2),
        }
    }
}

/// Why the load loop ended. None of these are errors; a fatal source
/// fault propagates as `Err(SourceError)` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The load-more control is gone or hidden: end of the listing.
    Complete,
    /// Too many consecutive polls without growth.
    StaleExhausted,
    /// A click was issued but the count never grew within the timeout.
    GrowthTimeout,
    /// Wall-clock budget exhausted.
    RuntimeExceeded,
    /// Loop-pass budget exhausted.
    IterationLimitReached,
    /// The operator asked to stop at a checkpoint.
    UserStopped,
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TerminationReason::Complete => "end of listing reached",
            TerminationReason::StaleExhausted => "no growth after repeated attempts",
            TerminationReason::GrowthTimeout => "timed out waiting for growth after click",
            TerminationReason::RuntimeExceeded => "runtime budget exceeded",
            TerminationReason::IterationLimitReached => "iteration limit reached",
            TerminationReason::UserStopped => "stopped by user",
        };
        f.write_str(s)
    }
}

/// Transient loop state. Owned by the controller, discarded on return.
#[derive(Debug)]
struct LoadState {
    previous_count: usize,
    stale_attempts: u32,
    clicks_issued: u32,
    started: Instant,
}

impl LoadState {
    fn new() -> Self {
        Self {
            previous_count: 0,
            stale_attempts: 0,
            clicks_issued: 0,
            started: Instant::now(),
        }
    }
}

enum GrowthWait {
    Grew(usize),
    TimedOut,
}

/// Drive the load-more loop to completion.
///
/// Per iteration: check the runtime budget, poll the card count and
/// track staleness, locate the control, settle-scroll-settle-click,
/// then wait for the count to grow. Intercepted or detached clicks
/// nudge the viewport upward and retry without touching the stale
/// counter. After each confirmed growth step the prompt gets a chance
/// to stop the run.
pub fn load_all_products<S, P>(
    source: &mut S,
    prompt: &mut P,
    config: &PaginationConfig,
) -> Result<TerminationReason, SourceError>
where
    S: PageSource,
    P: UserPrompt,
{
    info!("Clicking 'Load More' until all laptops are loaded or a budget runs out...");
    let mut state = LoadState::new();

    for iteration in 0..config.max_iterations {
        if state.started.elapsed() > config.max_runtime {
            info!(
                "Runtime exceeded {}s. Stopping.",
                config.max_runtime.as_secs()
            );
            return Ok(TerminationReason::RuntimeExceeded);
        }

        let count = source.snapshot()?.count();
        if count == state.previous_count {
            state.stale_attempts += 1;
            warn!(
                "No new laptops at pass #{}. Attempt {}/{}.",
                iteration + 1,
                state.stale_attempts,
                config.max_stale_attempts
            );
            if state.stale_attempts >= config.max_stale_attempts {
                warn!("Max no-change attempts reached. Saving snapshot before exit.");
                capture_or_warn(source, "loadmore_fail");
                return Ok(TerminationReason::StaleExhausted);
            }
        } else {
            state.stale_attempts = 0;
            state.previous_count = count;
        }

        let control = match source.find_load_more()? {
            Some(control) => control,
            None => {
                info!("'Load More' control gone. End of products.");
                return Ok(TerminationReason::Complete);
            }
        };
        if !source.is_visible(&control)? {
            info!("'Load More' button hidden. End of products.");
            return Ok(TerminationReason::Complete);
        }

        info!(
            "Clicking Load More ({}) | Total loaded: {}",
            iteration + 1,
            count
        );
        thread::sleep(config.pre_scroll_delay);
        source.scroll_into_view(&control)?;
        thread::sleep(config.post_scroll_delay);

        match source.click(&control) {
            Ok(()) => state.clicks_issued += 1,
            Err(ClickError::Intercepted) | Err(ClickError::Detached) => {
                warn!("'Load More' not clickable or missing. Scrolling up slightly...");
                source.scroll_by(0, -100)?;
                thread::sleep(config.retry_delay);
                continue;
            }
            Err(ClickError::Source(e)) => return Err(e),
        }

        match wait_for_growth(source, count, config)? {
            GrowthWait::Grew(new_count) => {
                // Staleness bookkeeping happens at the top of the next
                // pass; here we only let the page settle.
                log::debug!("Count grew to {}", new_count);
                thread::sleep(config.post_growth_delay);
            }
            GrowthWait::TimedOut => {
                warn!("Timeout waiting after click. Saving snapshot.");
                capture_or_warn(source, "loadmore_timeout");
                return Ok(TerminationReason::GrowthTimeout);
            }
        }

        if prompt.checkpoint() == Decision::Stop {
            info!(
                "Stopping after {} clicks at user request.",
                state.clicks_issued
            );
            return Ok(TerminationReason::UserStopped);
        }
    }

    info!("Iteration limit reached after {} clicks.", state.clicks_issued);
    Ok(TerminationReason::IterationLimitReached)
}

/// Poll until the card count exceeds `baseline` or the growth timeout
/// elapses. The timeout is terminal for the loop, not retried.
fn wait_for_growth<S: PageSource>(
    source: &mut S,
    baseline: usize,
    config: &PaginationConfig,
) -> Result<GrowthWait, SourceError> {
    let deadline = Instant::now() + config.growth_timeout;
    loop {
        let count = source.snapshot()?.count();
        if count > baseline {
            return Ok(GrowthWait::Grew(count));
        }
        if Instant::now() >= deadline {
            return Ok(GrowthWait::TimedOut);
        }
        thread::sleep(config.growth_poll_interval);
    }
}

fn capture_or_warn<S: PageSource>(source: &mut S, tag: &str) {
    match source.capture_diagnostic(tag) {
        Ok(path) => info!("Diagnostic snapshot saved to {}", path.display()),
        Err(e) => warn!("Could not capture diagnostic snapshot: {}", e),
    }
}
