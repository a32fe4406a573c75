//! Synchronizer scenarios: several views, profile changes, and mode toggles.

use combo_notation_core::{
    Block, DocumentMetadata, EmitConfig, RenderMode, Synchronizer, codes, parse_document,
};
use combo_notation_profile::ProfileStore;

fn synchronizer_for(source: &str) -> (Synchronizer<DocumentMetadata>, Vec<Block>) {
    let doc = parse_document(source);
    let mut metadata = DocumentMetadata::default();
    metadata.load_frontmatter("combo.md", &doc);
    (Synchronizer::new(ProfileStore::new(), metadata), doc.blocks)
}

#[test]
fn toggle_twice_restores_exact_html() {
    let (mut sync, blocks) =
        synchronizer_for("---\nprofile: asw\n---\n`comboButton`\n\nBnB: =:2A 5B 236C(2) j.[D]:=\n");
    let view = sync.open_view("combo.md", true);
    for block in blocks {
        sync.attach_block(view, block);
    }
    let config = EmitConfig::default();
    let before = sync.view_html(view, &config).unwrap();
    assert!(before.contains("Icon Notation"));

    sync.toggle_mode(view);
    let icons = sync.view_html(view, &config).unwrap();
    assert!(icons.contains("image-notation"));
    assert!(icons.contains("Text Notation"));

    sync.toggle_mode(view);
    assert_eq!(sync.view_html(view, &config).unwrap(), before);
}

#[test]
fn views_of_one_document_are_independent() {
    let (mut sync, blocks) = synchronizer_for("---\nprofile: asw\n---\n=:2A:=\n");
    let left = sync.open_view("combo.md", true);
    let right = sync.open_view("combo.md", true);
    sync.attach_block(left, blocks[0].clone());
    sync.attach_block(right, blocks[0].clone());

    sync.toggle_mode(left);
    assert_eq!(sync.view(left).unwrap().mode(), RenderMode::Icon);
    assert_eq!(sync.view(right).unwrap().mode(), RenderMode::Text);
    assert!(!sync.view(right).unwrap().blocks()[0].containers()[0].is_iconized());
}

#[test]
fn profile_change_reaches_icon_mode_views() {
    let (mut sync, blocks) = synchronizer_for("---\nprofile: asw\n---\n=:A:=\n");
    let view = sync.open_view("combo.md", true);
    sync.attach_block(view, blocks[0].clone());
    sync.toggle_mode(view);

    sync.metadata_mut().set_profile("combo.md", "alt");
    sync.on_profile_changed("combo.md", 0);
    let html = sync.view_html(view, &EmitConfig::default()).unwrap();
    assert!(html.contains("image-notation"), "{html}");

    sync.toggle_mode(view);
    let html = sync.view_html(view, &EmitConfig::default()).unwrap();
    assert!(html.contains("color: #009E4E"), "{html}");
}

#[test]
fn removing_the_profile_falls_back_to_placeholder() {
    let (mut sync, blocks) = synchronizer_for("---\nprofile: asw\n---\n=:A:=\n");
    let view = sync.open_view("combo.md", true);
    sync.attach_block(view, blocks[0].clone());

    sync.metadata_mut().clear_profile("combo.md");
    let report = sync.on_profile_changed("combo.md", 0);
    assert!(report.diagnostics.is_empty());
    let html = sync.view_html(view, &EmitConfig::default()).unwrap();
    assert!(html.contains("notation warning"), "{html}");
}

#[test]
fn late_events_for_closed_views_are_harmless() {
    let (mut sync, _) = synchronizer_for("---\nprofile: asw\n---\n");
    let view = sync.open_view("combo.md", false);
    sync.close_view(view);
    for report in [
        sync.on_view_became_visible(view),
        sync.on_view_hidden(view),
        sync.attach_block(view, Block::paragraph("=:A:=")),
    ] {
        assert!(!report.has_errors());
        assert_eq!(report.diagnostics[0].id, codes::STALE_VIEW);
    }
    assert!(sync.view_html(view, &EmitConfig::default()).is_none());
}

#[test]
fn toggle_is_refused_while_the_profile_is_missing() {
    let (mut sync, blocks) = synchronizer_for("`comboButton`\n\n=:2A 5B:=\n");
    let view = sync.open_view("combo.md", true);
    for block in blocks {
        sync.attach_block(view, block);
    }
    let config = EmitConfig::default();
    let before = sync.view_html(view, &config).unwrap();

    let report = sync.toggle_mode(view);
    assert!(!report.has_errors());
    assert_eq!(sync.view(view).unwrap().mode(), RenderMode::Text);
    let after = sync.view_html(view, &config).unwrap();
    assert_eq!(after, before);
    assert!(after.contains("Icon Notation"), "{after}");
}
