use std::{
    collections::HashSet,
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    app_error::{AppError, AppResult},
    application::notifier::EmailSender,
    domain::entities::waitlist_entry::{NewWaitlistEntry, WaitlistEntry},
    use_cases::signup::{WaitlistRepo, WelcomeEmailJob, WelcomeMailQueue},
};

// ============================================================================
// InMemoryWaitlistRepo
// ============================================================================

/// In-memory waitlist store with the same ordering and uniqueness rules as
/// the SQLite table.
#[derive(Default)]
pub struct InMemoryWaitlistRepo {
    entries: Mutex<Vec<WaitlistEntry>>,
    hidden: Mutex<HashSet<String>>,
    lookups: AtomicUsize,
    fail_reads: AtomicBool,
}

impl InMemoryWaitlistRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<WaitlistEntry>) -> Self {
        let repo = Self::new();
        *repo.entries.lock().unwrap() = entries;
        repo
    }

    pub fn push(&self, entry: WaitlistEntry) {
        self.entries.lock().unwrap().push(entry);
    }

    pub fn get(&self, id: i64) -> Option<WaitlistEntry> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned()
    }

    /// `find_by_email` misses this address while the insert still enforces
    /// uniqueness, like a concurrent signup that landed after the lookup.
    pub fn hide_from_lookup(&self, email: &str) {
        self.hidden.lock().unwrap().insert(email.to_string());
    }

    /// Makes every listing and count fail with a database error.
    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn check_reads(&self) -> AppResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Database("read failed".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl WaitlistRepo for InMemoryWaitlistRepo {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<WaitlistEntry>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.hidden.lock().unwrap().contains(email) {
            return Ok(None);
        }
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.email == email)
            .cloned())
    }

    async fn insert(&self, entry: &NewWaitlistEntry) -> AppResult<i64> {
        let mut entries = self.entries.lock().unwrap();
        if entries.iter().any(|e| e.email == entry.email) {
            return Err(AppError::DuplicateEmail);
        }
        let id = entries.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        entries.push(WaitlistEntry {
            id,
            email: entry.email.clone(),
            role: entry.role,
            first_name: entry.first_name.clone(),
            last_name: entry.last_name.clone(),
            phone: entry.phone.clone(),
            created_at: Utc::now(),
            notified: false,
        });
        Ok(id)
    }

    async fn count(&self) -> AppResult<i64> {
        self.check_reads()?;
        Ok(self.entries.lock().unwrap().len() as i64)
    }

    async fn list_newest_first(&self) -> AppResult<Vec<WaitlistEntry>> {
        self.check_reads()?;
        let mut entries = self.entries.lock().unwrap().clone();
        entries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(entries)
    }

    async fn list_unnotified(&self) -> AppResult<Vec<WaitlistEntry>> {
        self.check_reads()?;
        let mut pending: Vec<WaitlistEntry> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| !e.notified)
            .cloned()
            .collect();
        pending.sort_by_key(|e| e.id);
        Ok(pending)
    }

    async fn mark_notified(&self, id: i64) -> AppResult<bool> {
        let mut entries = self.entries.lock().unwrap();
        match entries.iter_mut().find(|e| e.id == id && !e.notified) {
            Some(entry) => {
                entry.notified = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_all(&self) -> AppResult<u64> {
        let mut entries = self.entries.lock().unwrap();
        let removed = entries.len() as u64;
        entries.clear();
        Ok(removed)
    }
}

// ============================================================================
// InMemoryEmailSender
// ============================================================================

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Records delivered emails. Can be told to fail for everyone or for
/// specific recipients.
#[derive(Default)]
pub struct InMemoryEmailSender {
    sent: Mutex<Vec<SentEmail>>,
    attempts: AtomicUsize,
    fail_all: AtomicBool,
    failing_recipients: Mutex<HashSet<String>>,
}

impl InMemoryEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let sender = Self::new();
        sender.fail_all.store(true, Ordering::SeqCst);
        sender
    }

    pub fn failing_for(recipients: &[&str]) -> Self {
        let sender = Self::new();
        sender
            .failing_recipients
            .lock()
            .unwrap()
            .extend(recipients.iter().map(|r| r.to_string()));
        sender
    }

    /// Stops failing from now on.
    pub fn recover(&self) {
        self.fail_all.store(false, Ordering::SeqCst);
        self.failing_recipients.lock().unwrap().clear();
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmailSender for InMemoryEmailSender {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_all.load(Ordering::SeqCst)
            || self.failing_recipients.lock().unwrap().contains(to)
        {
            return Err(AppError::Notifier(format!("delivery to {to} refused")));
        }
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        });
        Ok(())
    }
}

// ============================================================================
// RecordingWelcomeQueue
// ============================================================================

/// Keeps queued welcome jobs instead of sending them.
#[derive(Default)]
pub struct RecordingWelcomeQueue {
    jobs: Mutex<Vec<WelcomeEmailJob>>,
    closed: bool,
}

impl RecordingWelcomeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects every job, like an outbox whose worker has stopped.
    pub fn closed() -> Self {
        Self {
            closed: true,
            ..Self::default()
        }
    }

    pub fn jobs(&self) -> Vec<WelcomeEmailJob> {
        self.jobs.lock().unwrap().clone()
    }
}

impl WelcomeMailQueue for RecordingWelcomeQueue {
    fn enqueue(&self, job: WelcomeEmailJob) -> AppResult<()> {
        if self.closed {
            return Err(AppError::Internal("mail outbox is closed".into()));
        }
        self.jobs.lock().unwrap().push(job);
        Ok(())
    }
}
