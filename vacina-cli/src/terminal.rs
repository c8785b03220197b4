//! Terminal implementations of the controller collaborators.

use async_trait::async_trait;
use std::io::{BufRead, Write};
use std::sync::{Arc, Mutex, PoisonError};
use vacina_core::controller::{Collaborators, Confirm, Navigator, Notice, NoticeKind, Notifier, Route};

/// Remembers the last requested route so the command can follow it.
#[derive(Default)]
pub struct TerminalNavigator {
    last: Mutex<Option<Route>>,
}

impl TerminalNavigator {
    pub fn take(&self) -> Option<Route> {
        self.last.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        log::debug!("navigate to {} screen of {}", route_kind(&route), route.entity());
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(route);
    }
}

fn route_kind(route: &Route) -> &'static str {
    match route {
        Route::List(_) => "list",
        Route::Create(_) => "create",
        Route::Edit(..) => "edit",
    }
}

/// Success goes to stdout, errors to stderr.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Success => println!("{}: {}", notice.title, notice.message),
            NoticeKind::Error => eprintln!("{}: {}", notice.title, notice.message),
        }
    }
}

/// Asks on stdin unless confirmation was given up front.
pub struct PromptConfirm {
    assume_yes: bool,
}

impl PromptConfirm {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

#[async_trait]
impl Confirm for PromptConfirm {
    async fn confirm(&self, title: &str, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        let prompt = format!("{}: {} [s/N] ", title, message);
        let answer = tokio::task::spawn_blocking(move || {
            let mut stdout = std::io::stdout();
            write!(stdout, "{}", prompt)?;
            stdout.flush()?;
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            Ok::<_, std::io::Error>(line)
        })
        .await;
        match answer {
            Ok(Ok(line)) => is_affirmative(&line),
            Ok(Err(e)) => {
                log::warn!("could not read confirmation: {}", e);
                false
            }
            Err(e) => {
                log::warn!("confirmation prompt failed: {}", e);
                false
            }
        }
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "s" | "sim" | "y" | "yes")
}

/// Collaborators wired to the terminal, plus the navigator handle.
pub fn collaborators(assume_yes: bool) -> (Collaborators, Arc<TerminalNavigator>) {
    let navigator = Arc::new(TerminalNavigator::default());
    let ui = Collaborators::new(
        navigator.clone(),
        Arc::new(TerminalNotifier),
        Arc::new(PromptConfirm::new(assume_yes)),
    );
    (ui, navigator)
}
