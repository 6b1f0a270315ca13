//! Human-in-the-loop checkpoint between load-more rounds.

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Continue,
    Stop,
}

/// Asked by the pagination controller after every confirmed growth step.
pub trait UserPrompt {
    fn checkpoint(&mut self) -> Decision;
}

impl UserPrompt for Box<dyn UserPrompt> {
    fn checkpoint(&mut self) -> Decision {
        (**self).checkpoint()
    }
}

/// Deterministic non-interactive prompt: always keep loading.
pub struct NonInteractive;

impl UserPrompt for NonInteractive {
    fn checkpoint(&mut self) -> Decision {
        Decision::Continue
    }
}

/// Asks on stdin whether to keep loading. Typing "stop" ends the loop;
/// a closed stdin is treated as "stop" rather than looping blind.
pub struct StdinPrompt;

impl UserPrompt for StdinPrompt {
    fn checkpoint(&mut self) -> Decision {
        print!("Press [Enter] to load more or type 'stop' to end and start scraping: ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => Decision::Stop,
            Ok(_) => {
                if line.trim().eq_ignore_ascii_case("stop") {
                    log::info!("Manual stop requested. Proceeding to scrape loaded laptops.");
                    Decision::Stop
                } else {
                    Decision::Continue
                }
            }
        }
    }
}

/// Wraps another prompt with an interrupt flag (set from a Ctrl-C
/// handler). A raised flag stops loading without consulting the inner
/// prompt, so extraction still runs on whatever is visible.
pub struct Interruptible<P> {
    flag: Arc<AtomicBool>,
    inner: P,
}

impl<P> Interruptible<P> {
    pub fn new(flag: Arc<AtomicBool>, inner: P) -> Self {
        Self { flag, inner }
    }
}

impl<P: UserPrompt> UserPrompt for Interruptible<P> {
    fn checkpoint(&mut self) -> Decision {
        if self.flag.load(Ordering::SeqCst) {
            log::info!("Interrupt received during loading. Proceeding with what's visible.");
            return Decision::Stop;
        }
        self.inner.checkpoint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_interactive_always_continues() {
        let mut prompt = NonInteractive;
        for _ in 0..3 {
            assert_eq!(prompt.checkpoint(), Decision::Continue);
        }
    }

    #[test]
    fn test_interrupt_flag_overrides_inner_prompt() {
        let flag = Arc::new(AtomicBool::new(false));
        let mut prompt = Interruptible::new(flag.clone(), NonInteractive);

        assert_eq!(prompt.checkpoint(), Decision::Continue);
        flag.store(true, Ordering::SeqCst);
        assert_eq!(prompt.checkpoint(), Decision::Stop);
    }
}
