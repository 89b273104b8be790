//! Interactive chat loop.

use std::future::Future;
use std::io::Write;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use askfolio_core::beacon::{BestEffortSender, DetachedSender};
use askfolio_core::chat::{ChatController, ChatState, SUGGESTED_QUESTIONS};
use askfolio_core::config::{AskfolioConfig, ContactConfig};
use askfolio_core::resolver::AnswerSource;
use askfolio_core::session::{AutoFlush, SessionRemote, SessionStore};
use owo_colors::OwoColorize;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{make_resolver, make_tracker};

/// Time given to the unload beacon before the process exits on Ctrl-C.
const BEACON_GRACE: Duration = Duration::from_millis(300);

enum Step<T> {
    Done(T),
    Interrupted,
}

/// Runs `work` unless `interrupt` fires first. The same interrupt future is
/// reused for every step, so a signal arriving mid-request is not lost.
async fn until_interrupted<F, I>(work: F, interrupt: Pin<&mut I>) -> Step<F::Output>
where
    F: Future,
    I: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        out = work => Step::Done(out),
        _ = interrupt => Step::Interrupted,
    }
}

/// Fires the unload beacon and gives it a moment to leave.
async fn on_interrupt<S, R, B>(flush: &AutoFlush<S, R, B>) -> bool
where
    S: SessionStore + 'static,
    R: SessionRemote + 'static,
    B: BestEffortSender,
{
    println!();
    let sent = flush.page_unload();
    if sent {
        tokio::time::sleep(BEACON_GRACE).await;
    }
    sent
}

pub async fn run(config: &AskfolioConfig, name: Option<String>) -> Result<()> {
    let tracker = make_tracker(config);
    let resolver = Arc::new(make_resolver(config)?);
    let controller = ChatController::new(Arc::clone(&tracker), resolver, config.contact.clone());
    let flush = AutoFlush::attach(Arc::clone(&tracker), DetachedSender::new());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if controller.open() == ChatState::Greeting {
        let name = match name {
            Some(n) => n,
            None => {
                prompt("What's your name?");
                lines.next_line().await?.unwrap_or_default()
            }
        };
        if !controller.submit_name(&name) {
            bail!("a name is required to start chatting");
        }
    }

    let view = controller.snapshot();
    if let Some(last) = view.messages.last() {
        println!("{}", last.text);
    }
    if view.show_suggestions && !view.exhausted {
        println!();
        println!("{}", "Try one of these (type /1 to /6):".dimmed());
        for (i, q) in SUGGESTED_QUESTIONS.iter().enumerate() {
            println!("  {} {}", format!("/{}", i + 1).cyan(), q);
        }
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        if controller.is_exhausted() {
            print_contact(&config.contact);
            break;
        }

        println!(
            "{}",
            format!("{} question(s) left", controller.remaining_questions()).dimmed()
        );
        prompt(controller.placeholder());

        let line = match until_interrupted(lines.next_line(), ctrl_c.as_mut()).await {
            Step::Done(line) => line?,
            Step::Interrupted => {
                on_interrupt(&flush).await;
                return Ok(());
            }
        };
        let Some(line) = line else {
            break;
        };
        let line = line.trim();

        match line {
            "" => continue,
            "/quit" | "/exit" => break,
            "/help" => {
                print_help();
                continue;
            }
            _ => {}
        }

        if let Some(index) = line
            .strip_prefix('/')
            .and_then(|n| n.parse::<usize>().ok())
            .and_then(|n| n.checked_sub(1))
        {
            if !controller.choose_suggestion(index) {
                println!("{}", "No such suggestion.".yellow());
                continue;
            }
        } else {
            controller.set_input(line);
        }

        let reply = match until_interrupted(controller.send(), ctrl_c.as_mut()).await {
            Step::Done(Some(reply)) => reply,
            Step::Done(None) => continue,
            Step::Interrupted => {
                on_interrupt(&flush).await;
                return Ok(());
            }
        };

        if let Some(banner) = controller.snapshot().banner {
            println!("{}", banner.yellow());
        }
        let label = match reply.source {
            AnswerSource::Completion => "assistant".green().to_string(),
            _ => "assistant".cyan().to_string(),
        };
        println!("{} {}", label.bold(), reply.message.text);

        match reply.committed {
            Some(true) => println!("{}", "Session saved.".dimmed()),
            Some(false) => println!("{}", "Session kept locally.".dimmed()),
            None => {}
        }
    }

    flush.detach();
    if let Some(handle) = controller.close() {
        if let Ok(true) = handle.await {
            tracing::debug!("session committed on close");
        }
    }
    Ok(())
}

fn prompt(placeholder: &str) {
    print!("{} {} ", placeholder.dimmed(), ">".cyan());
    std::io::stdout().flush().ok();
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  {}   pick a suggested question", "/1../6".cyan());
    println!("  {}    leave the chat", "/quit".cyan());
}

fn print_contact(contact: &ContactConfig) {
    println!();
    println!("{}", contact.message.bold());
    for link in &contact.links {
        println!("  {} {}", link.label.cyan(), link.url);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use askfolio_core::session::{HttpSessionRemote, MemoryStore, SessionTracker};

    use super::*;

    #[derive(Default)]
    struct RecordingSender {
        urls: Mutex<Vec<String>>,
    }

    impl BestEffortSender for &RecordingSender {
        fn send(&self, url: &str, _payload: serde_json::Value) {
            self.urls.lock().unwrap().push(url.to_string());
        }
    }

    #[tokio::test]
    async fn test_interrupt_while_request_in_flight_fires_beacon() {
        let tracker = Arc::new(SessionTracker::new(
            MemoryStore::new(),
            HttpSessionRemote::new("http://127.0.0.1:9/user-sessions"),
        ));
        tracker.create_session("Ada");
        tracker.append_question("Tell me about your AI expertise");

        let sender = RecordingSender::default();
        let flush = AutoFlush::attach(Arc::clone(&tracker), &sender);

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let interrupt = async move { rx.await.map_err(std::io::Error::other) };
        tokio::pin!(interrupt);

        // reading input completes normally and leaves the interrupt armed
        let read = until_interrupted(async { "next question" }, interrupt.as_mut()).await;
        assert!(matches!(read, Step::Done("next question")));

        // the signal lands while a completion is still pending
        tx.send(()).unwrap();
        let send = until_interrupted(std::future::pending::<()>(), interrupt.as_mut()).await;
        assert!(matches!(send, Step::Interrupted));

        assert!(on_interrupt(&flush).await);
        assert_eq!(
            *sender.urls.lock().unwrap(),
            vec!["http://127.0.0.1:9/user-sessions".to_string()]
        );
    }

    #[tokio::test]
    async fn test_interrupt_without_questions_sends_nothing() {
        let tracker = Arc::new(SessionTracker::new(
            MemoryStore::new(),
            HttpSessionRemote::new("http://127.0.0.1:9/user-sessions"),
        ));
        tracker.create_session("Ada");

        let sender = RecordingSender::default();
        let flush = AutoFlush::attach(Arc::clone(&tracker), &sender);

        assert!(!on_interrupt(&flush).await);
        assert!(sender.urls.lock().unwrap().is_empty());
    }
}
