//! End-to-end checks through the public API: extract an outline, feed it
//! synthetic anchor positions, follow the active heading.

use std::collections::HashMap;
use std::fs;

use tocsync::cache::OutlineCache;
use tocsync::read::{outline_file, walk::collect_documents};
use tocsync::{
    duplicate_ids, evaluate, extract, Config, FnPositions, HeadingRecord, NoCandidate, Scroller,
    TableOfContents, TrackerState, TRIGGER_OFFSET,
};

const GUIDE: &str = r#"# User Guide

Intro paragraph with `inline # code`.

## Installation

```bash
# install with cargo
cargo install tocsync
```

    # indented code, not a heading

## Usage

### Command line

### Library `API`

####### Too deep

## 常見問題

## FAQ!!!
"#;

fn positions(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
}

#[test]
fn guide_outline() {
    let outline = extract(GUIDE);
    let expected = vec![
        HeadingRecord::new("user-guide", "User Guide", 1),
        HeadingRecord::new("installation", "Installation", 2),
        HeadingRecord::new("usage", "Usage", 2),
        HeadingRecord::new("command-line", "Command line", 3),
        HeadingRecord::new("library", "Library", 3),
        HeadingRecord::new("常見問題", "常見問題", 2),
        HeadingRecord::new("faq", "FAQ!!!", 2),
    ];
    assert_eq!(outline, expected);
}

#[test]
fn no_empty_ids_or_texts() {
    let inputs = [
        GUIDE,
        "# \n## !!!\n### 🎉🎉\n#### `code`\n",
        "```\nunclosed\n# Heading after unclosed fence\n",
        "#\n##\n###",
    ];
    for input in inputs {
        for h in extract(input) {
            assert!(!h.id.is_empty(), "empty id in {input:?}");
            assert!(!h.text.is_empty(), "empty text in {input:?}");
            assert!((1..=6).contains(&h.level));
        }
    }
}

#[test]
fn unclosed_fence_does_not_hide_headings() {
    let outline = extract("```\nunclosed\n# Heading after unclosed fence\n");
    assert_eq!(outline.len(), 1);
    assert_eq!(outline[0].id, "heading-after-unclosed-fence");
}

#[test]
fn colliding_slugs_are_kept_and_flagged() {
    let outline = extract("# Hello World!\n\n# Hello, World\n");
    let ids: Vec<&str> = outline.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["hello-world", "hello-world"]);
    assert_eq!(duplicate_ids(&outline), vec!["hello-world"]);
}

#[test]
fn reading_through_the_guide() {
    let mut toc = TableOfContents::default();
    toc.set_content(GUIDE);

    // top of page: first heading is below the trigger line
    let at_top = positions(&[("user-guide", 200.0), ("installation", 600.0)]);
    assert_eq!(toc.refresh(&at_top), None);

    let steps = [
        (vec![("user-guide", 100.0), ("installation", 500.0)], "user-guide"),
        (vec![("user-guide", -200.0), ("installation", 110.0), ("usage", 700.0)], "installation"),
        // anchors for "usage" not measured yet; "command-line" is
        (vec![("installation", -400.0), ("command-line", 80.0), ("library", 400.0)], "command-line"),
        (vec![("library", -20.0), ("常見問題", 60.0), ("faq", 119.0)], "faq"),
    ];
    for (sample, expected) in steps {
        assert_eq!(toc.on_scroll(&positions(&sample)), Some(expected));
    }

    // scrolling back above everything keeps the last heading by default
    assert_eq!(toc.on_scroll(&at_top), Some("faq"));
}

#[test]
fn clear_policy_matches_reference_behavior() {
    let config = Config {
        no_candidate: NoCandidate::Clear,
        ..Config::default()
    };
    let mut toc = TableOfContents::new(&config);
    toc.set_content(GUIDE);
    assert_eq!(toc.on_scroll(&positions(&[("user-guide", 0.0)])), Some("user-guide"));
    assert_eq!(toc.on_scroll(&positions(&[("user-guide", 300.0)])), None);
}

#[test]
fn late_result_from_old_outline_is_dropped() {
    let mut toc = TableOfContents::default();
    toc.set_content(GUIDE);
    let ticket = toc.state_mut().begin();
    let stale = evaluate(toc.outline(), &positions(&[("usage", 0.0)]), TRIGGER_OFFSET)
        .map(str::to_string);

    toc.set_content("# Replaced\n");
    assert!(!toc.state_mut().commit(ticket, stale.as_deref()));
    assert_eq!(toc.active_id(), None);
}

#[test]
fn layout_callback_as_position_source() {
    let outline = extract(GUIDE);
    let mut state = TrackerState::default();
    // every anchor 100 units below the previous, page scrolled by 350
    let index: HashMap<String, usize> = outline
        .iter()
        .enumerate()
        .map(|(i, h)| (h.id.clone(), i))
        .collect();
    let layout = FnPositions(|id: &str| index.get(id).map(|&i| i as f64 * 100.0 - 350.0));
    assert_eq!(state.update(&outline, &layout), Some("library"));
}

#[derive(Default)]
struct Viewport {
    top: Option<String>,
}

impl Scroller for Viewport {
    fn scroll_to(&mut self, id: &str) {
        self.top = Some(id.to_string());
    }

    fn scroll_to_top(&mut self) {
        self.top = None;
    }
}

#[test]
fn click_navigates_through_scroller() {
    let mut toc = TableOfContents::default();
    toc.set_content(GUIDE);
    let mut viewport = Viewport::default();
    assert!(toc.navigate("usage", &mut viewport));
    assert_eq!(viewport.top.as_deref(), Some("usage"));
    toc.scroll_to_top(&mut viewport);
    assert_eq!(viewport.top, None);
}

#[test]
fn directory_outlines_with_cache() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("docs")).unwrap();
    fs::write(dir.path().join("docs/guide.md"), GUIDE).unwrap();
    fs::write(dir.path().join("docs/empty.md"), "").unwrap();

    let files = collect_documents(&[dir.path().to_path_buf()], None).unwrap();
    assert_eq!(files.len(), 2);

    let cache = OutlineCache::new();
    let config = Config::default();
    let outlines: Vec<_> = files
        .iter()
        .map(|p| outline_file(p, &config.slug, &cache).unwrap())
        .collect();
    assert!(outlines[0].is_empty());
    assert_eq!(outlines[1].len(), 7);

    let again = outline_file(&files[1], &config.slug, &cache).unwrap();
    assert!(std::sync::Arc::ptr_eq(&again, &outlines[1]));
}
