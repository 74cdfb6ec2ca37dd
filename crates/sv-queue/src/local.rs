//! In-process queue with FIFO delivery, delayed redelivery and dead letters.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tokio::sync::Notify;

use crate::{DeadLetter, Delivery, Job, JobError, JobId, JobQueue, QueueError, RetryConfig};

/// Point-in-time counters for a [`LocalQueue`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub ready: usize,
    pub in_flight: usize,
    pub scheduled: usize,
    pub completed: u64,
    pub dead: usize,
}

#[derive(Default)]
struct State {
    ready: VecDeque<Delivery>,
    in_flight: usize,
    scheduled: usize,
    completed: u64,
    dead: Vec<DeadLetter>,
    closed: bool,
}

impl State {
    fn is_drained(&self) -> bool {
        self.closed && self.ready.is_empty() && self.in_flight == 0 && self.scheduled == 0
    }
}

struct Inner {
    name: String,
    retry: RetryConfig,
    next_id: AtomicU64,
    state: Mutex<State>,
    notify: Notify,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A single named queue living in this process.
///
/// Cloning yields another handle to the same queue.
#[derive(Clone)]
pub struct LocalQueue {
    inner: Arc<Inner>,
}

impl LocalQueue {
    #[must_use]
    pub fn new(name: impl Into<String>, retry: RetryConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                retry,
                next_id: AtomicU64::new(1),
                state: Mutex::new(State::default()),
                notify: Notify::new(),
            }),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Stop accepting jobs. Consumers drain what is left, then `next` yields `None`.
    pub fn close(&self) {
        self.inner.lock().closed = true;
        self.inner.notify.notify_waiters();
    }

    #[must_use]
    pub fn stats(&self) -> QueueStats {
        let st = self.inner.lock();
        QueueStats {
            ready: st.ready.len(),
            in_flight: st.in_flight,
            scheduled: st.scheduled,
            completed: st.completed,
            dead: st.dead.len(),
        }
    }

    /// Jobs that failed terminally or ran out of attempts.
    #[must_use]
    pub fn dead_letters(&self) -> Vec<DeadLetter> {
        self.inner.lock().dead.clone()
    }

    fn dead_letter(&self, delivery: Delivery, reason: String) {
        tracing::warn!(
            queue = %self.inner.name,
            job = %delivery.job.id,
            attempts = delivery.attempt,
            %reason,
            "job dead-lettered"
        );
        let mut st = self.inner.lock();
        st.in_flight -= 1;
        st.dead.push(DeadLetter {
            job: delivery.job,
            attempts: delivery.attempt,
            reason,
        });
    }

    fn schedule_redelivery(&self, delivery: Delivery, reason: &str) {
        let delay = self.inner.retry.delay_after(delivery.attempt);
        tracing::warn!(
            queue = %self.inner.name,
            job = %delivery.job.id,
            attempt = delivery.attempt,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            %reason,
            "job failed, scheduling redelivery"
        );
        {
            let mut st = self.inner.lock();
            st.in_flight -= 1;
            st.scheduled += 1;
        }

        let inner = Arc::clone(&self.inner);
        let next = Delivery {
            job: delivery.job,
            attempt: delivery.attempt + 1,
        };
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut st = inner.lock();
                st.scheduled -= 1;
                st.ready.push_back(next);
            }
            inner.notify.notify_waiters();
        });
    }
}

impl JobQueue for LocalQueue {
    async fn enqueue(&self, queue: &str, payload: serde_json::Value) -> Result<JobId, QueueError> {
        if queue != self.inner.name {
            return Err(QueueError::UnknownQueue(queue.to_string()));
        }
        let id = JobId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        {
            let mut st = self.inner.lock();
            if st.closed {
                return Err(QueueError::Closed(self.inner.name.clone()));
            }
            st.ready.push_back(Delivery {
                job: Job {
                    id,
                    queue: queue.to_string(),
                    payload,
                    enqueued_at: Utc::now(),
                },
                attempt: 1,
            });
        }
        self.inner.notify.notify_waiters();
        tracing::debug!(queue, job = %id, "job enqueued");
        Ok(id)
    }

    async fn next(&self) -> Option<Delivery> {
        loop {
            // Registered before inspecting state so a concurrent notify is not lost.
            let notified = self.inner.notify.notified();
            {
                let mut st = self.inner.lock();
                if let Some(delivery) = st.ready.pop_front() {
                    st.in_flight += 1;
                    return Some(delivery);
                }
                if st.is_drained() {
                    return None;
                }
            }
            notified.await;
        }
    }

    async fn settle(&self, delivery: Delivery, outcome: Result<(), JobError>) {
        match outcome {
            Ok(()) => {
                let mut st = self.inner.lock();
                st.in_flight -= 1;
                st.completed += 1;
            }
            Err(JobError::Terminal(reason)) => self.dead_letter(delivery, reason),
            Err(JobError::Retriable(reason)) => {
                if self.inner.retry.should_retry(delivery.attempt) {
                    self.schedule_redelivery(delivery, &reason);
                } else {
                    self.dead_letter(delivery, format!("attempts exhausted: {reason}"));
                }
            }
        }
        self.inner.notify.notify_waiters();
    }
}
