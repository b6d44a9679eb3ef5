//! Scripted in-memory store for tests
//!
//! Replies are registered against a substring of the statement text or of a
//! text parameter (typically the resolved file URI). Each matching statement
//! pops the next reply for the first rule that still has one; statements that
//! match nothing yield no records.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::{GraphStore, Param, Record, RecordStream, Session, SessionBackend, Statement};
use async_trait::async_trait;
use futures::StreamExt;
use rdfload_common::{RdfLoadError, Result};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Scripted answer to one statement
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Rows(Vec<Record>),
    /// The statement itself fails (transport failure)
    Fail(String),
    /// The records are yielded, then reading the stream fails
    BrokenStream(Vec<Record>),
}

impl Reply {
    pub(crate) fn rows(records: Vec<Record>) -> Self {
        Reply::Rows(records)
    }

    pub(crate) fn fail(msg: &str) -> Self {
        Reply::Fail(msg.to_string())
    }
}

#[derive(Default)]
struct Shared {
    rules: Mutex<Vec<(String, VecDeque<Reply>)>>,
    executed: Mutex<Vec<Statement>>,
    refusals: AtomicUsize,
    opened: AtomicUsize,
    closed: AtomicUsize,
}

#[derive(Default, Clone)]
pub(crate) struct ScriptedStore {
    shared: Arc<Shared>,
}

impl ScriptedStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue `reply` for the next statement containing `pattern`
    pub(crate) fn on(self, pattern: &str, reply: Reply) -> Self {
        {
            let mut rules = self.shared.rules.lock().unwrap();
            match rules.iter_mut().find(|(p, _)| p == pattern) {
                Some((_, replies)) => replies.push_back(reply),
                None => rules.push((pattern.to_string(), VecDeque::from([reply]))),
            }
        }
        self
    }

    /// Fail the next `count` session opens with a connection error
    pub(crate) fn refuse_sessions(self, count: usize) -> Self {
        self.shared.refusals.store(count, Ordering::SeqCst);
        self
    }

    pub(crate) fn sessions_opened(&self) -> usize {
        self.shared.opened.load(Ordering::SeqCst)
    }

    pub(crate) fn sessions_closed(&self) -> usize {
        self.shared.closed.load(Ordering::SeqCst)
    }

    /// Every statement run so far, in order
    pub(crate) fn executed(&self) -> Vec<Statement> {
        self.shared.executed.lock().unwrap().clone()
    }

    /// Number of executed statements whose text contains `pattern`
    pub(crate) fn count(&self, pattern: &str) -> usize {
        self.executed()
            .iter()
            .filter(|statement| statement.text().contains(pattern))
            .count()
    }

    fn next_reply(&self, statement: &Statement) -> Reply {
        let mut rules = self.shared.rules.lock().unwrap();
        rules
            .iter_mut()
            .filter(|(pattern, replies)| !replies.is_empty() && matches(statement, pattern))
            .find_map(|(_, replies)| replies.pop_front())
            .unwrap_or(Reply::Rows(Vec::new()))
    }
}

fn matches(statement: &Statement, pattern: &str) -> bool {
    statement.text().contains(pattern)
        || statement.params().values().any(|param| match param {
            Param::Text(text) => text.contains(pattern),
            Param::Integer(_) => false,
        })
}

#[async_trait]
impl GraphStore for ScriptedStore {
    async fn open_session(&self) -> Result<Session> {
        let refused = self
            .shared
            .refusals
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if refused {
            return Err(RdfLoadError::connection("connection refused"));
        }

        self.shared.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Session::new(ScriptedSession {
            store: self.clone(),
            closed: false,
        }))
    }
}

struct ScriptedSession {
    store: ScriptedStore,
    closed: bool,
}

#[async_trait]
impl SessionBackend for ScriptedSession {
    async fn run<'s>(&'s mut self, statement: Statement) -> Result<RecordStream<'s>> {
        assert!(!self.closed, "statement run on a closed session");

        let reply = self.store.next_reply(&statement);
        self.store.shared.executed.lock().unwrap().push(statement);

        match reply {
            Reply::Rows(records) => {
                Ok(futures::stream::iter(records.into_iter().map(Ok::<Record, RdfLoadError>)).boxed())
            },
            Reply::Fail(msg) => Err(RdfLoadError::statement(msg)),
            Reply::BrokenStream(records) => {
                let items = records
                    .into_iter()
                    .map(Ok::<Record, RdfLoadError>)
                    .chain(std::iter::once(Err(RdfLoadError::protocol("stream interrupted"))));
                Ok(futures::stream::iter(items).boxed())
            },
        }
    }

    async fn close(&mut self) -> Result<()> {
        assert!(!self.closed, "session closed twice");
        self.closed = true;
        self.store.shared.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
