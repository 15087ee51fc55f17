//! Push-style student feed and the live schedule that follows it.
//!
//! [`StudentDirectory`] holds student documents keyed by document id and
//! notifies per-owner subscribers with a complete fresh snapshot whenever
//! something they can see changes. [`LiveSchedule`] is the consumer side: each
//! snapshot replaces its occurrence set with a full re-expansion.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::calendar;
use crate::expander::{ExpansionOptions, LessonOccurrence};
use crate::lesson::LessonDefinition;
use crate::student::{OwnerId, StudentDocument};

/// Source of the reference instant for expansions.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Handle returned by [`StudentDirectory::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type SnapshotListener = Box<dyn FnMut(&[LessonDefinition]) + Send>;

struct Subscription {
    id: SubscriptionId,
    owner: OwnerId,
    listener: SnapshotListener,
}

/// In-memory student collection with owner-scoped snapshot subscriptions.
///
/// Snapshots list an owner's documents in document-id order.
#[derive(Default)]
pub struct StudentDirectory {
    documents: BTreeMap<String, StudentDocument>,
    subscriptions: Vec<Subscription>,
    next_subscription: u64,
}

impl StudentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lesson definitions visible to `owner`.
    pub fn snapshot(&self, owner: &OwnerId) -> Vec<LessonDefinition> {
        owner_snapshot(&self.documents, owner)
    }

    pub fn get(&self, id: &str) -> Option<&StudentDocument> {
        self.documents.get(id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Register `listener` for `owner`'s snapshots.
    ///
    /// The listener is called once immediately with the current snapshot, then
    /// after every change to a document the owner can see.
    pub fn subscribe<F>(&mut self, owner: OwnerId, listener: F) -> SubscriptionId
    where
        F: FnMut(&[LessonDefinition]) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;

        let mut listener: SnapshotListener = Box::new(listener);
        listener(&self.snapshot(&owner));
        debug!(subscription = id.0, %owner, "subscribed to student snapshots");

        self.subscriptions.push(Subscription {
            id,
            owner,
            listener,
        });
        id
    }

    /// Stop notifying a subscription. Returns whether it existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        before != self.subscriptions.len()
    }

    /// Insert or replace a document.
    ///
    /// Subscribers of both the previous and the new owner are notified.
    pub fn upsert(&mut self, id: impl Into<String>, document: StudentDocument) {
        let id = id.into();
        let mut touched: Vec<OwnerId> = document.owner_id.iter().cloned().collect();
        if let Some(previous) = self.documents.insert(id, document) {
            touched.extend(previous.owner_id);
        }
        self.notify(&touched);
    }

    /// Delete a document, notifying its owner's subscribers.
    pub fn remove(&mut self, id: &str) -> Option<StudentDocument> {
        let removed = self.documents.remove(id)?;
        let touched: Vec<OwnerId> = removed.owner_id.iter().cloned().collect();
        self.notify(&touched);
        Some(removed)
    }

    /// Assign `owner` to every document that has no owner yet.
    ///
    /// Returns the number of documents claimed. Subscribers see one snapshot
    /// for the whole claim, not one per document.
    pub fn claim_unowned(&mut self, owner: &OwnerId) -> usize {
        let mut claimed = 0;
        for document in self.documents.values_mut() {
            if document.owner_id.is_none() {
                document.owner_id = Some(owner.clone());
                claimed += 1;
            }
        }
        if claimed > 0 {
            debug!(%owner, claimed, "claimed unowned student documents");
            self.notify(std::slice::from_ref(owner));
        }
        claimed
    }

    fn notify(&mut self, owners: &[OwnerId]) {
        let documents = &self.documents;
        for subscription in &mut self.subscriptions {
            if owners.contains(&subscription.owner) {
                let snapshot = owner_snapshot(documents, &subscription.owner);
                debug!(
                    subscription = subscription.id.0,
                    owner = %subscription.owner,
                    students = snapshot.len(),
                    "delivering student snapshot"
                );
                (subscription.listener)(&snapshot);
            }
        }
    }
}

fn owner_snapshot(
    documents: &BTreeMap<String, StudentDocument>,
    owner: &OwnerId,
) -> Vec<LessonDefinition> {
    documents
        .iter()
        .filter(|(_, document)| document.is_owned_by(owner))
        .map(|(id, document)| document.to_definition(id))
        .collect()
}

/// Occurrence set kept current by snapshot deliveries.
#[derive(Debug)]
pub struct LiveSchedule<C = SystemClock> {
    options: ExpansionOptions,
    clock: C,
    definitions: Vec<LessonDefinition>,
    occurrences: Vec<LessonOccurrence>,
    generation: u64,
}

impl<C: Clock> LiveSchedule<C> {
    pub fn new(options: ExpansionOptions, clock: C) -> Self {
        Self {
            options,
            clock,
            definitions: Vec::new(),
            occurrences: Vec::new(),
            generation: 0,
        }
    }

    /// Replace the occurrence set with a full expansion of `definitions`.
    pub fn on_snapshot(&mut self, definitions: &[LessonDefinition]) {
        self.definitions = definitions.to_vec();
        self.recompute();
    }

    /// Re-expand the last snapshot against the clock's current time.
    ///
    /// Call this when the horizon may have moved (a new week has started)
    /// without any change to the students.
    pub fn refresh(&mut self) {
        self.recompute();
    }

    fn recompute(&mut self) {
        let now = self.clock.now();
        self.occurrences = self.options.expand(&self.definitions, now);
        self.generation += 1;
        debug!(
            generation = self.generation,
            definitions = self.definitions.len(),
            occurrences = self.occurrences.len(),
            %now,
            "schedule recomputed"
        );
    }

    pub fn occurrences(&self) -> &[LessonOccurrence] {
        &self.occurrences
    }

    /// Occurrences ready for the calendar: valid entries ordered by start.
    pub fn displayable(&self) -> Vec<LessonOccurrence> {
        calendar::prepare_for_display(&self.occurrences)
    }

    /// Number of recomputations so far, from snapshots and refreshes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Definitions from the last snapshot.
    pub fn definitions(&self) -> &[LessonDefinition] {
        &self.definitions
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn options(&self) -> &ExpansionOptions {
        &self.options
    }
}

/// Keep a shared [`LiveSchedule`] in step with `owner`'s snapshots.
pub fn follow<C>(
    directory: &mut StudentDirectory,
    owner: OwnerId,
    schedule: Arc<Mutex<LiveSchedule<C>>>,
) -> SubscriptionId
where
    C: Clock + Send + 'static,
{
    directory.subscribe(owner, move |definitions| match schedule.lock() {
        Ok(mut schedule) => schedule.on_snapshot(definitions),
        Err(_) => warn!("live schedule lock poisoned; snapshot dropped"),
    })
}
