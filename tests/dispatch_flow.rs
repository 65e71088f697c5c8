//! Integration tests for dispatch: routing, authorization, failure handling
//! and processor isolation.

mod common;

use async_trait::async_trait;
use automaton::commands::{Command, CommandResult, KarmaCommand, Processor, Registry, Reply};
use automaton::{HandlerError, User};
use common::Harness;
use common::harness::{CHANNEL, OPERATOR};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts calls; optionally fails.
#[derive(Clone, Default)]
struct Spy {
    name: &'static str,
    executes: Arc<AtomicUsize>,
    checks: Arc<AtomicUsize>,
    processes: Arc<AtomicUsize>,
    fail: bool,
    min_trust: u32,
}

impl Spy {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    fn requiring(mut self, level: u32) -> Self {
        self.min_trust = level;
        self
    }
}

#[async_trait]
impl Command for Spy {
    fn name(&self) -> &'static str {
        self.name
    }

    fn authorized(&self, user: &User) -> bool {
        user.trust_level >= self.min_trust
    }

    async fn execute(&self, user: &User, args: &str) -> CommandResult {
        self.executes.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(HandlerError::Internal("boom".into()));
        }
        Ok(vec![Reply::to(user, format!("{}:{}", self.name, args))])
    }
}

#[async_trait]
impl Processor for Spy {
    fn should_process(&self, _message: &str) -> bool {
        self.checks.fetch_add(1, Ordering::SeqCst);
        true
    }

    async fn process(&self, _user: &User, _message: &str) -> CommandResult {
        self.processes.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(HandlerError::Internal("processor exploded".into()));
        }
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn command_replies_go_to_origin() {
    let spy = Spy::new("echo");
    let h = Harness::with_registry(|_| Registry::builder().command(spy.clone()).unwrap().build()).await;

    let replies = h.say("alice", ".echo  hello there ").await;
    assert_eq!(
        replies,
        vec![Reply {
            target: CHANNEL.into(),
            body: "echo:hello there".into()
        }]
    );

    let replies = h.query("alice", ".echo").await;
    assert_eq!(
        replies,
        vec![Reply {
            target: "alice".into(),
            body: "echo:".into()
        }]
    );
    assert_eq!(spy.executes.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unknown_commands_are_silent() {
    let spy = Spy::new("echo");
    let h = Harness::with_registry(|_| Registry::builder().processor(spy.clone()).unwrap().build()).await;

    assert!(h.say("alice", ".nope whatever").await.is_empty());
    assert!(h.say("alice", ".ECHO hi").await.is_empty());
    assert_eq!(spy.executes.load(Ordering::SeqCst), 0);
    // Prefixed lines never reach processors, known or not.
    assert_eq!(spy.checks.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unauthorized_commands_are_silent() {
    let spy = Spy::new("admin").requiring(5);
    let h = Harness::with_registry(|_| Registry::builder().command(spy.clone()).unwrap().build()).await;
    h.trust("Boss", 10).await;
    h.trust("intern", 1).await;

    assert!(h.say("stranger", ".admin go").await.is_empty());
    assert!(h.say("intern", ".admin go").await.is_empty());
    assert_eq!(spy.executes.load(Ordering::SeqCst), 0);

    let replies = h.say("boss", ".admin go").await;
    assert_eq!(replies.len(), 1);
    assert_eq!(spy.executes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn bot_ignores_itself() {
    let spy = Spy::new("echo");
    let h = Harness::with_registry(|_| Registry::builder().processor(spy.clone()).unwrap().build()).await;

    assert!(h.say("Automaton", ".echo hi").await.is_empty());
    assert!(h.say("automaton", "chatter").await.is_empty());
    assert_eq!(spy.executes.load(Ordering::SeqCst), 0);
    assert_eq!(spy.checks.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn chatter_only_reaches_processors() {
    let command_only = Spy::new("quote");
    let processor = Spy::new("watch");
    let h = Harness::with_registry(|_| {
        Registry::builder()
            .command(command_only.clone())
            .unwrap()
            .processor(processor.clone())
            .unwrap()
            .build()
    })
    .await;

    assert!(h.say("alice", "quote <foo> hello").await.is_empty());
    assert!(h.say("alice", "watch this").await.is_empty());

    assert_eq!(command_only.executes.load(Ordering::SeqCst), 0);
    assert_eq!(processor.executes.load(Ordering::SeqCst), 0);
    assert_eq!(processor.checks.load(Ordering::SeqCst), 2);
    assert_eq!(processor.processes.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn command_fault_apologizes_and_reports() {
    let spy = Spy::new("fragile").failing();
    let h = Harness::with_registry(|_| Registry::builder().command(spy.clone()).unwrap().build()).await;

    let replies = h.say("alice", ".fragile").await;
    assert_eq!(replies[0], Reply {
        target: CHANNEL.into(),
        body: "sorry alice, something broke.".into()
    });
    assert_eq!(replies[1], Reply {
        target: OPERATOR.into(),
        body: "alice caused internal error: boom".into()
    });
    assert_eq!(replies.len(), 2);
}

#[tokio::test]
async fn parse_failures_reach_only_the_user() {
    let h = Harness::new().await;
    let replies = h.say("alice", ".quote no nicks here").await;
    assert_eq!(
        replies,
        vec![Reply {
            target: CHANNEL.into(),
            body: "I couldn't parse the quote correctly.".into()
        }]
    );
}

#[tokio::test]
async fn failing_processor_does_not_stop_the_rest() {
    let broken = Spy::new("broken").failing();
    let after = Spy::new("after");
    let h = Harness::with_registry(|db| {
        Registry::builder()
            .processor(broken.clone())
            .unwrap()
            .processor(KarmaCommand::new(db.clone()))
            .unwrap()
            .processor(after.clone())
            .unwrap()
            .build()
    })
    .await;

    let replies = h.say("alice", "rust++").await;

    assert!(replies.iter().all(|r| r.target == OPERATOR));
    assert_eq!(replies[0].body, "alice caused internal error: processor exploded");
    assert!(!replies.iter().any(|r| r.body.starts_with("sorry")));

    assert_eq!(h.db.karma().value("rust").await.unwrap(), 1);
    assert_eq!(after.processes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn storage_outage_is_contained() {
    let h = Harness::new().await;
    h.db.close().await;

    let replies = h.say("alice", ".karma rust").await;
    assert_eq!(replies[0].body, "sorry alice, something broke.");
    assert_eq!(replies[0].target, CHANNEL);

    let diagnostic: Vec<_> = replies[1..].iter().collect();
    assert!(!diagnostic.is_empty() && diagnostic.len() <= 4);
    assert!(diagnostic.iter().all(|r| r.target == OPERATOR));
    assert!(diagnostic[0].body.starts_with("alice caused storage failure"));

    // Chatter keeps flowing; processor failures only go to the operator.
    let replies = h.say("alice", "rust++").await;
    assert!(replies.iter().all(|r| r.target == OPERATOR));
}
