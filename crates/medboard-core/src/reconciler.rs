//! The notification reconciler.
//!
//! Merges three sources into one consistent, newest-first notification list
//! for a single subject:
//!
//!   point-in-time query  →  snapshot
//!   insert subscription  →  streamed records
//!   local acknowledgements (mark-read)
//!
//! The unread counter is maintained incrementally but must always equal a
//! recount over the list. Records are deduplicated by id, which is what
//! makes it safe for a streamed insert to arrive before the snapshot that
//! also contains it.

use std::collections::HashSet;
use std::sync::{mpsc, Arc};

use serde_json::Value;
use tracing::{debug, info, warn};

use medboard_contracts::{
    notification::{NotificationId, NotificationRecord, NotificationView, SubjectId},
    row::{decode_row, Direction, Patch, Row, RowQuery, CREATED_AT_COLUMN, IS_READ_COLUMN, OWNER_COLUMN},
};

use crate::traits::{InsertSink, RowStore, SubscriptionHandle};

/// Outcome of `NotificationReconciler::mark_read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkRead {
    /// No record with that id is in view.
    NotFound,
    /// The record was already read; nothing changed.
    AlreadyRead,
    /// Flipped locally and the store accepted the update.
    Marked,
    /// Flipped locally, but the store rejected the update. The local flip
    /// is kept.
    MarkedLocallyOnly,
}

impl MarkRead {
    /// True if the local record changed.
    pub fn changed(&self) -> bool {
        matches!(self, MarkRead::Marked | MarkRead::MarkedLocallyOnly)
    }
}

/// An open insert subscription and the inbox its sink feeds.
struct LiveFeed {
    handle: SubscriptionHandle,
    inbox: mpsc::Receiver<Row>,
}

/// Owns the notification list and unread counter for one subject.
///
/// Only the reconciler's own operations mutate the list/counter pair.
pub struct NotificationReconciler {
    store: Arc<dyn RowStore>,
    table: String,
    subject: Option<SubjectId>,
    records: Vec<NotificationRecord>,
    unread: usize,
    live: Option<LiveFeed>,
}

impl NotificationReconciler {
    /// Create an unbound reconciler reading from `table`.
    pub fn new(store: Arc<dyn RowStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
            subject: None,
            records: Vec::new(),
            unread: 0,
            live: None,
        }
    }

    /// Bind to `subject` and load its notifications.
    ///
    /// # Sequence
    ///
    /// 1. Close any prior subscription and discard prior state
    /// 2. Issue the snapshot query (`doctor_id == subject`, newest first)
    /// 3. Open the insert subscription
    /// 4. Apply inserts that were delivered while the query was in flight
    /// 5. Merge the snapshot
    ///
    /// A failed query yields an empty snapshot. A failed subscription leaves
    /// the reconciler usable without live updates.
    pub fn initialize(&mut self, subject: SubjectId) {
        self.teardown();
        if let Some(previous) = self.subject.as_ref().filter(|s| **s != subject) {
            info!(from = %previous, to = %subject, "notification subject switched");
        }
        self.subject = Some(subject.clone());
        self.records.clear();
        self.unread = 0;

        let query = RowQuery::table(self.table.as_str())
            .eq(OWNER_COLUMN, subject.as_str())
            .order(CREATED_AT_COLUMN, Direction::Descending);
        let snapshot = match self.store.query(&query) {
            Ok(rows) => self.decode_rows(rows),
            Err(e) => {
                warn!(subject = %subject, error = %e, "notification query failed, starting empty");
                Vec::new()
            }
        };

        let (tx, inbox) = mpsc::channel();
        let sink: InsertSink = Box::new(move |row: Row| {
            // A closed inbox means the reconciler is gone; nothing to deliver to.
            let _ = tx.send(row);
        });
        match self.store.subscribe(&self.table, sink) {
            Ok(handle) => {
                debug!(subject = %subject, handle = handle.0, "notification stream opened");
                self.live = Some(LiveFeed { handle, inbox });
            }
            Err(e) => {
                warn!(subject = %subject, error = %e, "notification stream unavailable");
            }
        }

        let early = self.pump();
        self.apply_snapshot(snapshot);

        info!(
            subject = %subject,
            records = self.records.len(),
            unread = self.unread,
            early_inserts = early,
            "notifications initialized"
        );
    }

    /// Merge a resolved snapshot into the current list.
    ///
    /// Records streamed in before the snapshot resolved are kept in front
    /// unless the snapshot also contains them. Each id appears once, and a
    /// record already read locally stays read.
    pub fn apply_snapshot(&mut self, snapshot: Vec<NotificationRecord>) {
        let Some(subject) = self.subject.clone() else {
            debug!("snapshot ignored, no subject bound");
            return;
        };

        let streamed = std::mem::take(&mut self.records);
        let in_snapshot: HashSet<NotificationId> = snapshot.iter().map(|r| r.id.clone()).collect();
        let read_locally: HashSet<NotificationId> = streamed
            .iter()
            .filter(|r| r.is_read)
            .map(|r| r.id.clone())
            .collect();

        let mut merged: Vec<NotificationRecord> = streamed
            .into_iter()
            .filter(|r| !in_snapshot.contains(&r.id))
            .collect();

        let mut seen = HashSet::new();
        for mut record in snapshot {
            if record.subject_id != subject || !seen.insert(record.id.clone()) {
                continue;
            }
            record.is_read |= read_locally.contains(&record.id);
            merged.push(record);
        }

        self.records = merged;
        self.unread = self.recount();
        self.check_invariant();
    }

    /// Apply one inserted record from the stream.
    ///
    /// Returns true if the record was added. Records for another subject,
    /// records arriving while unbound, and ids already in view are ignored.
    pub fn on_stream_insert(&mut self, record: NotificationRecord) -> bool {
        match &self.subject {
            Some(subject) if *subject == record.subject_id => {}
            _ => return false,
        }
        if self.records.iter().any(|r| r.id == record.id) {
            debug!(id = %record.id, "duplicate notification ignored");
            return false;
        }

        if !record.is_read {
            self.unread += 1;
        }
        debug!(id = %record.id, unread = self.unread, "notification received");
        self.records.insert(0, record);
        self.check_invariant();
        true
    }

    /// Drain rows the subscription has delivered and apply each one.
    ///
    /// Returns the number of records added. Rows that do not decode into a
    /// notification are logged and skipped.
    pub fn pump(&mut self) -> usize {
        let rows: Vec<Row> = match &self.live {
            Some(feed) => feed.inbox.try_iter().collect(),
            None => return 0,
        };

        let mut applied = 0;
        for row in rows {
            match decode_row::<NotificationRecord>(&self.table, row) {
                Ok(record) => {
                    if self.on_stream_insert(record) {
                        applied += 1;
                    }
                }
                Err(e) => warn!(error = %e, "streamed notification skipped"),
            }
        }
        applied
    }

    /// Mark one notification as read.
    ///
    /// The local record is flipped and the counter decremented before the
    /// store's answer is considered; a rejected update is reported as
    /// `MarkedLocallyOnly` and is not rolled back.
    pub fn mark_read(&mut self, id: &NotificationId) -> MarkRead {
        let Some(pos) = self.records.iter().position(|r| r.id == *id) else {
            return MarkRead::NotFound;
        };
        if self.records[pos].is_read {
            return MarkRead::AlreadyRead;
        }

        self.records[pos].is_read = true;
        self.unread = self.unread.saturating_sub(1);
        self.check_invariant();

        let mut patch = Patch::new();
        patch.insert(IS_READ_COLUMN.to_string(), Value::Bool(true));
        match self.store.update(&self.table, id.as_str(), &patch) {
            Ok(()) => {
                debug!(id = %id, unread = self.unread, "notification marked read");
                MarkRead::Marked
            }
            Err(e) => {
                warn!(id = %id, error = %e, "mark-read not persisted, keeping local state");
                MarkRead::MarkedLocallyOnly
            }
        }
    }

    /// Close the insert subscription. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        if let Some(feed) = self.live.take() {
            self.store.unsubscribe(feed.handle);
            debug!(handle = feed.handle.0, "notification stream closed");
        }
    }

    pub fn subject(&self) -> Option<&SubjectId> {
        self.subject.as_ref()
    }

    /// Newest first.
    pub fn records(&self) -> &[NotificationRecord] {
        &self.records
    }

    pub fn unread_count(&self) -> usize {
        self.unread
    }

    /// True while an insert subscription is open.
    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    pub fn view(&self) -> NotificationView {
        NotificationView {
            records: self.records.clone(),
            unread_count: self.unread,
        }
    }

    fn recount(&self) -> usize {
        self.records.iter().filter(|r| !r.is_read).count()
    }

    fn check_invariant(&self) {
        debug_assert_eq!(
            self.unread,
            self.recount(),
            "unread counter drifted from the notification list"
        );
    }

    fn decode_rows(&self, rows: Vec<Row>) -> Vec<NotificationRecord> {
        rows.into_iter()
            .filter_map(|row| match decode_row(&self.table, row) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(error = %e, "notification row skipped");
                    None
                }
            })
            .collect()
    }
}

impl Drop for NotificationReconciler {
    fn drop(&mut self) {
        self.teardown();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
