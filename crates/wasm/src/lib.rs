//! WASM bindings for combo notation.
//!
//! Exposes colorize, iconize, and explain functions plus a
//! [`NotationSession`] that keeps live note views in sync, for a JavaScript
//! note-taking plugin. Results are returned as native JS objects using
//! `serde-wasm-bindgen`.

use wasm_bindgen::prelude::*;

use combo_notation_core::dom::emit::EmitConfig;
use combo_notation_core::notation::{PatternRegistry, colorize as colorize_text, iconize_segments};
use combo_notation_core::{
    DocumentMetadata, RenderReport, Synchronizer, ViewId, parse_document,
};
use combo_notation_profile::{ProfileStore, Settings, builtin_profiles, load_settings_from_str};

// ── Stateless API ───────────────────────────────────────────────────────

/// Colorize notation text with a built-in profile.
///
/// Returns an array of `{ kind, text, label?, color? }` segments.
#[wasm_bindgen]
pub fn colorize(text: &str, profile_id: &str) -> Result<JsValue, JsError> {
    let registry = builtin_registry(profile_id)?;
    to_js(&colorize_text(text, &registry))
}

/// Convert notation text to glyph nodes with a built-in profile.
///
/// Returns an array of `{ kind, ... }` nodes (`text`, `motion`, `button`).
#[wasm_bindgen]
pub fn iconize(text: &str, profile_id: &str) -> Result<JsValue, JsError> {
    let registry = builtin_registry(profile_id)?;
    to_js(&iconize_segments(&colorize_text(text, &registry), &registry))
}

/// Explain a diagnostic code (e.g., "CN1001").
///
/// Returns the explanation string, or `null` if unknown.
#[wasm_bindgen]
pub fn explain(id: &str) -> Option<String> {
    combo_notation_diagnostics::explain(id).map(|s| s.to_string())
}

/// The built-in profiles, in display order.
#[wasm_bindgen(js_name = "builtinProfiles")]
pub fn builtin_profiles_js() -> Result<JsValue, JsError> {
    to_js(&builtin_profiles())
}

// ── Session ─────────────────────────────────────────────────────────────

/// Live views of notes, kept in step with mode toggles and profile changes.
#[wasm_bindgen]
pub struct NotationSession {
    sync: Synchronizer<DocumentMetadata>,
    emit: EmitConfig,
}

#[wasm_bindgen]
impl NotationSession {
    /// New session. `settings_json` carries custom profiles, the metadata
    /// key, the debounce window, and the icon base path.
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: Option<String>) -> Result<NotationSession, JsError> {
        let settings = match settings_json {
            Some(json) => load_settings_from_str(&json).map_err(to_js_error)?,
            None => Settings::default(),
        };
        let store = ProfileStore::from_settings(&settings).map_err(to_js_error)?;
        let metadata = DocumentMetadata::new(settings.metadata_key.clone());
        Ok(Self {
            sync: Synchronizer::new(store, metadata).with_debounce(settings.debounce_ms),
            emit: EmitConfig {
                icon_base: settings.icon_base,
            },
        })
    }

    /// Record `document`'s declared profile (or its absence) at `now_ms`.
    #[wasm_bindgen(js_name = "setDocumentProfile")]
    pub fn set_document_profile(
        &mut self,
        document: &str,
        profile: Option<String>,
        now_ms: f64,
    ) -> Result<JsValue, JsError> {
        match profile.as_deref() {
            Some(id) => self.sync.metadata_mut().set_profile(document, id),
            None => self.sync.metadata_mut().clear_profile(document),
        }
        report(self.sync.on_profile_changed(document, millis(now_ms)))
    }

    /// Open a view of `document`; returns its handle.
    #[wasm_bindgen(js_name = "openView")]
    pub fn open_view(&mut self, document: &str, visible: bool) -> u32 {
        raw(self.sync.open_view(document, visible))
    }

    /// Render Markdown `source` into a view, appending its blocks.
    #[wasm_bindgen(js_name = "renderBlock")]
    pub fn render_block(&mut self, view: u32, source: &str) -> Result<JsValue, JsError> {
        let mut out = RenderReport::default();
        for block in parse_document(source).blocks {
            out.merge(self.sync.attach_block(view_id(view), block));
        }
        report(out)
    }

    /// Flip a view between text and icon mode.
    #[wasm_bindgen(js_name = "toggleMode")]
    pub fn toggle_mode(&mut self, view: u32) -> Result<JsValue, JsError> {
        report(self.sync.toggle_mode(view_id(view)))
    }

    /// A view became the visible one.
    #[wasm_bindgen(js_name = "viewBecameVisible")]
    pub fn view_became_visible(&mut self, view: u32) -> Result<JsValue, JsError> {
        report(self.sync.on_view_became_visible(view_id(view)))
    }

    /// A view moved to the background.
    #[wasm_bindgen(js_name = "viewHidden")]
    pub fn view_hidden(&mut self, view: u32) -> Result<JsValue, JsError> {
        report(self.sync.on_view_hidden(view_id(view)))
    }

    /// A view closed.
    #[wasm_bindgen(js_name = "closeView")]
    pub fn close_view(&mut self, view: u32) -> Result<JsValue, JsError> {
        report(self.sync.close_view(view_id(view)))
    }

    /// Flush debounced profile changes due by `now_ms`.
    pub fn tick(&mut self, now_ms: f64) -> Result<JsValue, JsError> {
        report(self.sync.tick(millis(now_ms)))
    }

    /// HTML of a view, or `null` once it has closed.
    #[wasm_bindgen(js_name = "viewHtml")]
    pub fn view_html(&self, view: u32) -> Option<String> {
        self.sync.view_html(view_id(view), &self.emit)
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn builtin_registry(profile_id: &str) -> Result<PatternRegistry, JsError> {
    let store = ProfileStore::new();
    let profile = store
        .snapshot(profile_id)
        .ok_or_else(|| JsError::new(&format!("unknown profile `{profile_id}`")))?;
    Ok(PatternRegistry::build(&profile))
}

fn view_id(raw: u32) -> ViewId {
    ViewId::from_raw(u64::from(raw))
}

fn raw(id: ViewId) -> u32 {
    // Handles are allocated sequentially; a session never opens 2^32 views.
    u32::try_from(id.get()).unwrap_or(u32::MAX)
}

fn millis(ms: f64) -> u64 {
    if ms.is_finite() && ms > 0.0 {
        // Float-to-int `as` saturates at `u64::MAX`.
        ms as u64
    } else {
        0
    }
}

fn report(report: RenderReport) -> Result<JsValue, JsError> {
    to_js(&report)
}

fn to_js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsError::new(&e.to_string()))
}
