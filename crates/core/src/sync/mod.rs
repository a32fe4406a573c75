//! Render synchronizer.
//!
//! Keeps every open view of a document in step with its mode and with the
//! profile the document declares. Each view is either in text mode or icon
//! mode; there is no terminal state, and a view's state is dropped when it
//! closes.
//!
//! Everything runs on the caller's thread. Host notifications become
//! [`SyncEvent`]s on a queue that [`Synchronizer::process_pending`] drains;
//! the `on_*` convenience methods post and drain in one call. Events that
//! name a view which has already closed are dropped with a trace and an
//! info diagnostic.

/// Document metadata sources.
pub mod metadata;

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::dom::emit::{EmitConfig, emit_blocks};
use crate::dom::{Block, RenderMode};
use crate::notation::PatternRegistry;
use crate::render::{
    ProfileLookup, RenderReport, iconize_block, recolor_block, render_notations, set_block_mode,
};
use combo_notation_diagnostics::{Diagnostic, codes};
use combo_notation_profile::{Profile, ProfileStore};

pub use metadata::{DocumentMetadata, MetadataSource};

/// Handle to an open view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ViewId(u64);

impl ViewId {
    /// Raw handle value.
    pub fn get(self) -> u64 {
        self.0
    }

    /// Rebuild a handle from its raw value (for hosts that pass handles
    /// across a language boundary).
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// One open view of a document.
#[derive(Debug, Clone)]
pub struct View {
    document: String,
    mode: RenderMode,
    visible: bool,
    dirty: bool,
    blocks: Vec<Block>,
}

impl View {
    /// Document shown by the view.
    pub fn document(&self) -> &str {
        &self.document
    }

    /// Current mode.
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Whether the view is the visible one.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the view missed a profile change while hidden.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Blocks rendered into the view.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Re-render every block from the cached notation text against
    /// `lookup`, in the view's current mode.
    fn rerender(&mut self, lookup: ProfileLookup<'_>) -> usize {
        let mut n = 0;
        for block in &mut self.blocks {
            n += recolor_block(block, lookup);
            if self.mode == RenderMode::Icon
                && let Some(registry) = lookup.registry()
            {
                iconize_block(block, registry);
            }
            set_block_mode(block, self.mode);
        }
        self.dirty = false;
        n
    }
}

/// A host notification.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SyncEvent {
    /// The user pressed the mode toggle.
    ToggleMode(ViewId),
    /// A document's declared profile changed.
    ProfileChanged(String),
    /// A profile definition in the store changed.
    ProfileEdited(String),
    /// A view became the visible one.
    BecameVisible(ViewId),
    /// A view moved to the background.
    Hidden(ViewId),
    /// A view closed.
    Closed(ViewId),
}

impl SyncEvent {
    fn view(&self) -> Option<ViewId> {
        match self {
            SyncEvent::ToggleMode(v)
            | SyncEvent::BecameVisible(v)
            | SyncEvent::Hidden(v)
            | SyncEvent::Closed(v) => Some(*v),
            SyncEvent::ProfileChanged(_) | SyncEvent::ProfileEdited(_) => None,
        }
    }

    /// Profile events for the same target coalesce while queued.
    fn coalesces_with(&self, other: &SyncEvent) -> bool {
        match (self, other) {
            (SyncEvent::ProfileChanged(a), SyncEvent::ProfileChanged(b))
            | (SyncEvent::ProfileEdited(a), SyncEvent::ProfileEdited(b)) => a == b,
            _ => false,
        }
    }
}

/// How a document's profile resolved.
enum Resolved {
    Ready(Arc<PatternRegistry>),
    Missing,
    Unknown(String),
}

impl Resolved {
    fn lookup(&self) -> ProfileLookup<'_> {
        match self {
            Resolved::Ready(registry) => ProfileLookup::Ready(registry.as_ref()),
            Resolved::Missing => ProfileLookup::Missing,
            Resolved::Unknown(id) => ProfileLookup::Unknown(id),
        }
    }
}

struct CachedRegistry {
    snapshot: Arc<Profile>,
    registry: Arc<PatternRegistry>,
}

/// Per-view render state machine.
pub struct Synchronizer<M: MetadataSource> {
    store: ProfileStore,
    metadata: M,
    views: BTreeMap<ViewId, View>,
    queue: VecDeque<SyncEvent>,
    debounce_ms: u64,
    pending_changes: BTreeMap<String, u64>,
    registries: HashMap<String, CachedRegistry>,
    next_id: u64,
}

impl<M: MetadataSource> Synchronizer<M> {
    /// Synchronizer over `store` and `metadata`, reacting to profile
    /// changes immediately.
    pub fn new(store: ProfileStore, metadata: M) -> Self {
        Self {
            store,
            metadata,
            views: BTreeMap::new(),
            queue: VecDeque::new(),
            debounce_ms: 0,
            pending_changes: BTreeMap::new(),
            registries: HashMap::new(),
            next_id: 1,
        }
    }

    /// Wait `ms` after the last metadata change of a burst before reacting
    /// (builder pattern). Zero disables debouncing.
    pub fn with_debounce(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// The profile store.
    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    /// Mutable access to the profile store. Call
    /// [`on_profile_edited`](Self::on_profile_edited) after editing.
    pub fn store_mut(&mut self) -> &mut ProfileStore {
        &mut self.store
    }

    /// The metadata source.
    pub fn metadata(&self) -> &M {
        &self.metadata
    }

    /// Mutable access to the metadata source. Call
    /// [`on_profile_changed`](Self::on_profile_changed) after editing.
    pub fn metadata_mut(&mut self) -> &mut M {
        &mut self.metadata
    }

    /// A view, if still open.
    pub fn view(&self, id: ViewId) -> Option<&View> {
        self.views.get(&id)
    }

    /// Number of open views.
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// HTML of every block in a view.
    pub fn view_html(&self, id: ViewId, config: &EmitConfig) -> Option<String> {
        self.views
            .get(&id)
            .map(|v| emit_blocks(&v.blocks, config))
    }

    /// Open a view of `document` in text mode.
    pub fn open_view(&mut self, document: &str, visible: bool) -> ViewId {
        let id = ViewId(self.next_id);
        self.next_id += 1;
        self.views.insert(
            id,
            View {
                document: document.to_string(),
                mode: RenderMode::Text,
                visible,
                dirty: false,
                blocks: Vec::new(),
            },
        );
        tracing::debug!(%id, document, "opened view");
        id
    }

    /// The host rendered `block` into view `id`.
    ///
    /// New notation is colorized, and iconized too when the view is in
    /// icon mode. Containers the block already carried keep their state.
    pub fn attach_block(&mut self, id: ViewId, mut block: Block) -> RenderReport {
        let Some(document) = self.views.get(&id).map(|v| v.document.clone()) else {
            return stale(id);
        };
        let mut report = RenderReport::default();
        let resolved = self.resolve(&document, &mut report);
        let Some(view) = self.views.get_mut(&id) else {
            return stale(id);
        };
        report.merge(render_notations(&mut block, resolved.lookup()));
        if view.mode == RenderMode::Icon
            && let Some(registry) = resolved.lookup().registry()
        {
            iconize_block(&mut block, registry);
        }
        set_block_mode(&mut block, view.mode);
        view.blocks.push(block);
        report
    }

    /// Mutable access to a block of a view, for hosts that insert content
    /// into an already rendered block. Follow with
    /// [`refresh_block`](Self::refresh_block).
    pub fn block_mut(&mut self, id: ViewId, index: usize) -> Option<&mut Block> {
        self.views.get_mut(&id)?.blocks.get_mut(index)
    }

    /// Bring newly inserted content of one block up to the view's mode
    /// without touching containers that are already rendered.
    pub fn refresh_block(&mut self, id: ViewId, index: usize) -> RenderReport {
        let Some(document) = self.views.get(&id).map(|v| v.document.clone()) else {
            return stale(id);
        };
        let mut report = RenderReport::default();
        let resolved = self.resolve(&document, &mut report);
        let Some(view) = self.views.get_mut(&id) else {
            return stale(id);
        };
        let mode = view.mode;
        let Some(block) = view.blocks.get_mut(index) else {
            return report;
        };
        report.merge(render_notations(block, resolved.lookup()));
        if mode == RenderMode::Icon
            && let Some(registry) = resolved.lookup().registry()
        {
            iconize_block(block, registry);
        }
        set_block_mode(block, mode);
        report
    }

    /// Queue `event`. A profile event already waiting for the same target
    /// absorbs the new one.
    pub fn post(&mut self, event: SyncEvent) {
        if self.queue.iter().any(|e| e.coalesces_with(&event)) {
            tracing::trace!(?event, "coalesced");
            return;
        }
        self.queue.push_back(event);
    }

    /// Number of queued events.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drain the event queue.
    pub fn process_pending(&mut self) -> RenderReport {
        let mut report = RenderReport::default();
        while let Some(event) = self.queue.pop_front() {
            if let Some(id) = event.view()
                && !self.views.contains_key(&id)
            {
                report.merge(stale(id));
                continue;
            }
            self.apply(event, &mut report);
        }
        report
    }

    /// Flip a view between text and icon mode.
    pub fn toggle_mode(&mut self, id: ViewId) -> RenderReport {
        self.post(SyncEvent::ToggleMode(id));
        self.process_pending()
    }

    /// `document`'s declared profile changed at `now_ms`.
    ///
    /// With a debounce configured the reaction is deferred until
    /// [`tick`](Self::tick) passes the quiet period; further changes to the
    /// same document restart it.
    pub fn on_profile_changed(&mut self, document: &str, now_ms: u64) -> RenderReport {
        if self.debounce_ms > 0 {
            self.pending_changes
                .insert(document.to_string(), now_ms.saturating_add(self.debounce_ms));
            return RenderReport::default();
        }
        self.post(SyncEvent::ProfileChanged(document.to_string()));
        self.process_pending()
    }

    /// Profile `profile` was edited in the store.
    pub fn on_profile_edited(&mut self, profile: &str) -> RenderReport {
        self.post(SyncEvent::ProfileEdited(profile.to_string()));
        self.process_pending()
    }

    /// A view became the visible one.
    pub fn on_view_became_visible(&mut self, id: ViewId) -> RenderReport {
        self.post(SyncEvent::BecameVisible(id));
        self.process_pending()
    }

    /// A view moved to the background.
    pub fn on_view_hidden(&mut self, id: ViewId) -> RenderReport {
        self.post(SyncEvent::Hidden(id));
        self.process_pending()
    }

    /// A view closed. Its state is discarded.
    pub fn close_view(&mut self, id: ViewId) -> RenderReport {
        self.post(SyncEvent::Closed(id));
        self.process_pending()
    }

    /// Flush debounced profile changes whose quiet period ended by `now_ms`.
    pub fn tick(&mut self, now_ms: u64) -> RenderReport {
        let due: Vec<String> = self
            .pending_changes
            .iter()
            .filter(|(_, deadline)| **deadline <= now_ms)
            .map(|(doc, _)| doc.clone())
            .collect();
        for doc in due {
            self.pending_changes.remove(&doc);
            self.post(SyncEvent::ProfileChanged(doc));
        }
        self.process_pending()
    }

    // ── Event handling ──────────────────────────────────────────────────

    fn apply(&mut self, event: SyncEvent, report: &mut RenderReport) {
        match event {
            SyncEvent::ToggleMode(id) => self.apply_toggle(id, report),
            SyncEvent::ProfileChanged(document) => {
                tracing::debug!(document = %document, "profile changed");
                let ids: Vec<ViewId> = self
                    .views
                    .iter()
                    .filter(|(_, v)| v.document == document)
                    .map(|(id, _)| *id)
                    .collect();
                self.refresh_views(&ids, report);
            }
            SyncEvent::ProfileEdited(profile) => {
                tracing::debug!(profile = %profile, "profile edited");
                self.registries.remove(&profile);
                let ids: Vec<ViewId> = self
                    .views
                    .iter()
                    .filter(|(_, v)| {
                        self.metadata.profile_of(&v.document).as_deref() == Some(profile.as_str())
                    })
                    .map(|(id, _)| *id)
                    .collect();
                self.refresh_views(&ids, report);
            }
            SyncEvent::BecameVisible(id) => {
                let dirty = match self.views.get_mut(&id) {
                    Some(view) => {
                        view.visible = true;
                        view.dirty
                    }
                    None => return,
                };
                if dirty {
                    tracing::debug!(%id, "visible; catching up");
                    self.rerender_view(id, report);
                }
            }
            SyncEvent::Hidden(id) => {
                if let Some(view) = self.views.get_mut(&id) {
                    view.visible = false;
                }
            }
            SyncEvent::Closed(id) => {
                self.views.remove(&id);
                tracing::debug!(%id, "closed view");
            }
        }
    }

    /// Switching to icon mode needs a usable profile and at least one
    /// notation; otherwise the view keeps its mode and toggle label.
    fn apply_toggle(&mut self, id: ViewId, report: &mut RenderReport) {
        let Some(view) = self.views.get(&id) else {
            return;
        };
        let document = view.document.clone();
        let has_notation = view.blocks.iter().any(|b| !b.containers().is_empty());
        if view.mode.toggled() == RenderMode::Icon {
            let resolved = self.resolve(&document, report);
            if resolved.lookup().registry().is_none() || !has_notation {
                tracing::debug!(%id, "nothing to iconize; mode unchanged");
                return;
            }
        }
        let Some(view) = self.views.get_mut(&id) else {
            return;
        };
        view.mode = view.mode.toggled();
        tracing::debug!(%id, mode = ?view.mode, "toggled mode");
        self.rerender_view(id, report);
    }

    /// Visible views re-render now; hidden ones are marked dirty.
    fn refresh_views(&mut self, ids: &[ViewId], report: &mut RenderReport) {
        for &id in ids {
            let Some(view) = self.views.get_mut(&id) else {
                continue;
            };
            if view.visible {
                self.rerender_view(id, report);
            } else {
                view.dirty = true;
                tracing::debug!(%id, "hidden; marked dirty");
            }
        }
    }

    fn rerender_view(&mut self, id: ViewId, report: &mut RenderReport) {
        let Some(document) = self.views.get(&id).map(|v| v.document.clone()) else {
            return;
        };
        let resolved = self.resolve(&document, report);
        if let Some(view) = self.views.get_mut(&id) {
            report.notations += view.rerender(resolved.lookup());
        }
    }

    /// Resolve `document`'s profile, reusing the cached registry while the
    /// store still hands out the same snapshot.
    fn resolve(&mut self, document: &str, report: &mut RenderReport) -> Resolved {
        let Some(id) = self.metadata.profile_of(document) else {
            return Resolved::Missing;
        };
        let Some(snapshot) = self.store.snapshot(&id) else {
            return Resolved::Unknown(id);
        };
        if let Some(cached) = self.registries.get(&id)
            && Arc::ptr_eq(&cached.snapshot, &snapshot)
        {
            return Resolved::Ready(Arc::clone(&cached.registry));
        }
        let registry = Arc::new(PatternRegistry::build(&snapshot));
        report
            .diagnostics
            .extend(registry.diagnostics().iter().cloned());
        self.registries.insert(
            id,
            CachedRegistry {
                snapshot,
                registry: Arc::clone(&registry),
            },
        );
        Resolved::Ready(registry)
    }
}

fn stale(id: ViewId) -> RenderReport {
    tracing::trace!(%id, "event for closed view ignored");
    RenderReport {
        notations: 0,
        diagnostics: vec![Diagnostic::info(
            codes::STALE_VIEW,
            format!("event for closed {id} ignored"),
            None,
        )],
    }
}
