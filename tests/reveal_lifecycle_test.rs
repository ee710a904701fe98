// Mount / animate / unmount behaviour of the reveal against the in-memory DOM

use reveal_wasm::anim::{Animator, Engine};
use reveal_wasm::dom::{Dom, MemoryDom, NodeId};
use reveal_wasm::reveal::{
    mark_multi_host, start_offset, MountOutcome, RevealOrchestrator, BLOCK_CLASS, WRAPPER_CLASS,
};
use reveal_wasm::split::{WrapSplitter, LINE_CLASS};
use reveal_wasm::RevealConfig;

type Orchestrator = RevealOrchestrator<MemoryDom, WrapSplitter, Engine<NodeId>>;

const COLUMNS: usize = 16;

fn orchestrator(config: RevealConfig) -> Orchestrator {
    RevealOrchestrator::new(config, WrapSplitter::new(COLUMNS), Engine::new()).unwrap()
}

fn immediate() -> RevealConfig {
    RevealConfig::default().with_animate_on_scroll(false)
}

/// Fill `parent` with `text`, writing each `\n` as a `<br>`
fn fill_with_breaks(dom: &mut MemoryDom, parent: NodeId, text: &str) {
    for (i, part) in text.split('\n').enumerate() {
        if i > 0 {
            let br = dom.create_element("br").unwrap();
            dom.append_child(&parent, &br).unwrap();
        }
        let node = dom.create_text(part).unwrap();
        dom.append_child(&parent, &node).unwrap();
    }
}

/// `<section><p>{text}</p></section>` under body; returns (section, p)
fn paragraph(dom: &mut MemoryDom, text: &str) -> (NodeId, NodeId) {
    let body = dom.body();
    let section = dom.create_element("section").unwrap();
    dom.append_child(&body, &section).unwrap();
    let p = dom.create_element("p").unwrap();
    dom.append_child(&section, &p).unwrap();
    fill_with_breaks(dom, p, text);
    (section, p)
}

fn count_class(dom: &MemoryDom, class: &str) -> usize {
    dom.query_class(dom.body(), class).len()
}

#[test]
fn test_round_trip_restores_markup() {
    let texts = [
        "",
        "short",
        "a somewhat longer sentence that wraps",
        "first paragraph\nsecond paragraph with more words in it",
    ];
    for text in texts {
        let mut dom = MemoryDom::new();
        let (section, p) = paragraph(&mut dom, text);
        let before = dom.to_html(section);

        let mut reveal = orchestrator(RevealConfig::default());
        reveal.mount(&mut dom, Some(&p)).unwrap();
        reveal.unmount(&mut dom).unwrap();

        assert_eq!(dom.to_html(section), before, "round trip failed for {:?}", text);
        assert_eq!(reveal.animator().timeline_count(), 0);
        assert_eq!(reveal.animator().trigger_count(), 0);
    }
}

#[test]
fn test_round_trip_with_nested_markup() {
    let mut dom = MemoryDom::new();
    let (section, p) = paragraph(&mut dom, "Reveal ");
    dom.append_element_with_text(p, "em", "rich").unwrap();
    dom.append_element_with_text(p, "strong", " text, line by line").unwrap();
    let before = dom.to_html(section);

    let mut reveal = orchestrator(immediate());
    let outcome = reveal.mount(&mut dom, Some(&p)).unwrap();
    assert!(matches!(outcome, MountOutcome::Mounted { lines } if lines > 1));
    assert_ne!(dom.to_html(section), before);

    reveal.unmount(&mut dom).unwrap();
    assert_eq!(dom.to_html(section), before);
}

#[test]
fn test_wrapper_and_block_per_line() {
    let mut dom = MemoryDom::new();
    let (_, p) = paragraph(&mut dom, "one two three four five six seven eight nine ten");

    let mut reveal = orchestrator(RevealConfig::default());
    let outcome = reveal.mount(&mut dom, Some(&p)).unwrap();

    let lines = count_class(&dom, LINE_CLASS);
    assert!(lines >= 3);
    assert_eq!(outcome, MountOutcome::Mounted { lines });
    assert_eq!(count_class(&dom, WRAPPER_CLASS), lines);
    assert_eq!(count_class(&dom, BLOCK_CLASS), lines);
    assert_eq!(reveal.animator().timeline_count(), lines);

    // Each wrapper holds exactly its line followed by its block
    for wrapped in reveal.cycle().unwrap().lines() {
        assert_eq!(
            dom.child_nodes(&wrapped.wrapper),
            vec![wrapped.line, wrapped.block]
        );
        assert_eq!(dom.parent(&wrapped.wrapper), Some(p));
    }
}

#[test]
fn test_multi_host_numbers_lines_across_children() {
    let mut dom = MemoryDom::new();
    let body = dom.body();
    let host = dom.create_element("div").unwrap();
    dom.append_child(&body, &host).unwrap();
    let h = dom.append_element_with_text(host, "h2", "A heading").unwrap();
    let p = dom
        .append_element_with_text(host, "p", "and a paragraph that wraps over three lines")
        .unwrap();
    mark_multi_host(&mut dom, &host).unwrap();
    let before = dom.to_html(body);

    let mut reveal = orchestrator(immediate());
    reveal.mount(&mut dom, Some(&host)).unwrap();

    let cycle = reveal.cycle().unwrap();
    let wrapped = cycle.lines();
    assert_eq!(wrapped.len(), 4);
    assert_eq!(dom.parent(&wrapped[0].wrapper), Some(h));
    for w in &wrapped[1..] {
        assert_eq!(dom.parent(&w.wrapper), Some(p));
    }
    assert_eq!(count_class(&dom, WRAPPER_CLASS), 4);
    assert_eq!(count_class(&dom, BLOCK_CLASS), 4);

    // Ordinals run across both children: 0 in the heading, 1..=3 in the paragraph
    let offsets: Vec<f64> = cycle
        .timelines()
        .iter()
        .map(|id| reveal.animator().program(*id).unwrap().start_offset)
        .collect();
    let config = immediate();
    let expected: Vec<f64> = (0..4).map(|i| start_offset(i, &config)).collect();
    assert_eq!(offsets, expected);

    reveal.unmount(&mut dom).unwrap();
    assert_eq!(dom.to_html(body), before);
}

#[test]
fn test_initial_state_is_hidden() {
    let mut dom = MemoryDom::new();
    let (_, p) = paragraph(&mut dom, "hidden until the blocks have passed over");

    let mut reveal = orchestrator(immediate().with_block_color("rgb(230, 57, 70)"));
    reveal.mount(&mut dom, Some(&p)).unwrap();

    for wrapped in reveal.cycle().unwrap().lines() {
        assert_eq!(dom.style(&wrapped.line, "opacity").as_deref(), Some("0"));
        assert_eq!(
            dom.style(&wrapped.block, "transform").as_deref(),
            Some("scaleX(0)")
        );
        assert_eq!(
            dom.style(&wrapped.block, "transform-origin").as_deref(),
            Some("left center")
        );
        assert_eq!(
            dom.style(&wrapped.block, "background-color").as_deref(),
            Some("rgb(230, 57, 70)")
        );
    }
}

#[test]
fn test_start_offsets_step_by_one_second() {
    let mut dom = MemoryDom::new();
    let (_, p) = paragraph(&mut dom, "line one\nline two\nline three");

    let config = RevealConfig::default().with_delay(0.0).with_stagger(0.15);
    let mut reveal = orchestrator(config);
    reveal.mount(&mut dom, Some(&p)).unwrap();

    let offsets: Vec<f64> = reveal
        .cycle()
        .unwrap()
        .timelines()
        .iter()
        .map(|id| reveal.animator().program(*id).unwrap().start_offset)
        .collect();
    assert_eq!(offsets, vec![0.15, 1.15, 2.15]);
}

#[test]
fn test_immediate_mode_runs_without_triggers() {
    let mut dom = MemoryDom::new();
    let (_, p) = paragraph(&mut dom, "line one\nline two");

    let mut reveal = orchestrator(immediate());
    reveal.mount(&mut dom, Some(&p)).unwrap();

    let cycle = reveal.cycle().unwrap();
    assert!(cycle.triggers().is_empty());
    assert_eq!(reveal.animator().trigger_count(), 0);
    for id in cycle.timelines() {
        assert_eq!(Animator::<MemoryDom>::is_paused(reveal.animator(), *id), Some(false));
    }
}

#[test]
fn test_scroll_gated_mode_waits_for_root_and_fires_once() {
    let mut dom = MemoryDom::new();
    dom.set_viewport_height(1000.0);
    let (_, p) = paragraph(&mut dom, "line one\nline two\nline three");
    dom.set_bounding_top(p, 1500.0);

    let mut reveal = orchestrator(RevealConfig::default());
    reveal.mount(&mut dom, Some(&p)).unwrap();
    let timelines = reveal.cycle().unwrap().timelines().to_vec();
    assert_eq!(reveal.cycle().unwrap().triggers().len(), 3);

    // Below the fold: frames pass, nothing plays
    reveal.animator_mut().tick(&mut dom, 5.0).unwrap();
    for id in &timelines {
        assert_eq!(Animator::<MemoryDom>::is_paused(reveal.animator(), *id), Some(true));
        assert_eq!(reveal.animator().elapsed(*id), Some(0.0));
    }

    // Root top crosses 90% of the viewport: every line starts together
    dom.set_bounding_top(p, 880.0);
    reveal.animator_mut().refresh_triggers(&dom);
    assert_eq!(reveal.animator().trigger_count(), 0);
    for id in &timelines {
        assert_eq!(Animator::<MemoryDom>::is_paused(reveal.animator(), *id), Some(false));
    }

    // Scrolling away and back does not re-fire or restart anything
    reveal.animator_mut().tick(&mut dom, 1.0).unwrap();
    dom.set_bounding_top(p, 2000.0);
    reveal.animator_mut().tick(&mut dom, 0.5).unwrap();
    dom.set_bounding_top(p, 100.0);
    reveal.animator_mut().tick(&mut dom, 0.5).unwrap();
    for id in &timelines {
        assert_eq!(reveal.animator().elapsed(*id), Some(2.0));
    }
}

#[test]
fn test_full_animation_reveals_every_line() {
    let mut dom = MemoryDom::new();
    let (_, p) = paragraph(&mut dom, "line one\nline two\nline three");

    let config = immediate().with_duration(0.5);
    let mut reveal = orchestrator(config);
    reveal.mount(&mut dom, Some(&p)).unwrap();
    let wrapped = reveal.cycle().unwrap().lines().to_vec();

    // Line 0 starts at 0.15s; halfway through its first tween the block is
    // half grown and the text still hidden.
    reveal.animator_mut().tick(&mut dom, 0.4).unwrap();
    assert_eq!(dom.style(&wrapped[0].block, "transform").as_deref(), Some("scaleX(0.5)"));
    assert_eq!(dom.style(&wrapped[0].line, "opacity").as_deref(), Some("0"));
    assert_eq!(dom.style(&wrapped[1].block, "transform").as_deref(), Some("scaleX(0)"));

    // Just past the cover phase: text on, block anchored right and shrinking
    reveal.animator_mut().tick(&mut dom, 0.35).unwrap();
    assert_eq!(dom.style(&wrapped[0].line, "opacity").as_deref(), Some("1"));
    assert_eq!(
        dom.style(&wrapped[0].block, "transform-origin").as_deref(),
        Some("right center")
    );

    // Long after the last line: everything visible, every block collapsed
    for _ in 0..100 {
        reveal.animator_mut().tick(&mut dom, 1.0 / 30.0).unwrap();
    }
    assert!(reveal.animator().is_idle());
    for w in &wrapped {
        assert_eq!(dom.style(&w.line, "opacity").as_deref(), Some("1"));
        assert_eq!(dom.style(&w.block, "transform").as_deref(), Some("scaleX(0)"));
        assert_eq!(
            dom.style(&w.block, "transform-origin").as_deref(),
            Some("right center")
        );
    }
}

#[test]
fn test_unmount_mid_animation() {
    let mut dom = MemoryDom::new();
    let (section, p) = paragraph(&mut dom, "line one\nline two\nline three");
    let before = dom.to_html(section);

    let mut reveal = orchestrator(immediate());
    reveal.mount(&mut dom, Some(&p)).unwrap();
    reveal.animator_mut().tick(&mut dom, 1.3).unwrap();
    assert!(!reveal.animator().is_idle());

    reveal.unmount(&mut dom).unwrap();
    assert_eq!(reveal.animator().timeline_count(), 0);
    assert!(reveal.animator().is_idle());

    // Further frames have nothing left to write to
    reveal.animator_mut().tick(&mut dom, 10.0).unwrap();
    assert_eq!(dom.to_html(section), before);
}

#[test]
fn test_reconfigure_rebuilds_for_new_content() {
    let mut dom = MemoryDom::new();
    let (section, p) = paragraph(&mut dom, "line one\nline two\nline three");

    let mut reveal = orchestrator(RevealConfig::default());
    reveal.mount(&mut dom, Some(&p)).unwrap();
    assert_eq!(reveal.line_count(), 3);
    let old_timelines = reveal.cycle().unwrap().timelines().to_vec();

    // The host re-renders the paragraph with different text
    reveal.unmount(&mut dom).unwrap();
    for node in dom.child_nodes(&p) {
        dom.remove_child(&p, &node).unwrap();
    }
    fill_with_breaks(&mut dom, p, "only\ntwo");
    let before = dom.to_html(section);
    reveal.mount(&mut dom, Some(&p)).unwrap();

    let outcome = reveal
        .reconfigure(&mut dom, RevealConfig::default().with_block_color("#fff"))
        .unwrap();
    assert_eq!(outcome, MountOutcome::Mounted { lines: 2 });
    assert_eq!(count_class(&dom, WRAPPER_CLASS), 2);
    assert_eq!(count_class(&dom, BLOCK_CLASS), 2);
    assert_eq!(reveal.animator().timeline_count(), 2);
    assert_eq!(reveal.animator().trigger_count(), 2);
    for id in &old_timelines {
        assert_eq!(reveal.animator().program(*id), None);
    }
    for w in reveal.cycle().unwrap().lines() {
        assert_eq!(dom.style(&w.block, "background-color").as_deref(), Some("#fff"));
    }

    reveal.unmount(&mut dom).unwrap();
    assert_eq!(dom.to_html(section), before);
}

#[test]
fn test_each_config_option_triggers_rebuild() {
    let variants = [
        RevealConfig::default().with_animate_on_scroll(false),
        RevealConfig::default().with_delay(1.0),
        RevealConfig::default().with_block_color("red"),
        RevealConfig::default().with_stagger(0.3),
        RevealConfig::default().with_duration(1.2),
    ];
    for config in variants {
        let mut dom = MemoryDom::new();
        let (_, p) = paragraph(&mut dom, "line one\nline two");
        let mut reveal = orchestrator(RevealConfig::default());
        reveal.mount(&mut dom, Some(&p)).unwrap();
        let old = reveal.cycle().unwrap().timelines().to_vec();

        let outcome = reveal.reconfigure(&mut dom, config.clone()).unwrap();
        assert_eq!(outcome, MountOutcome::Mounted { lines: 2 }, "{:?}", config);
        assert_eq!(count_class(&dom, WRAPPER_CLASS), 2);
        assert_eq!(reveal.animator().timeline_count(), 2);
        assert!(reveal.cycle().unwrap().timelines().iter().all(|id| !old.contains(id)));
    }
}

#[test]
fn test_reconfigure_while_unmounted_only_stores_config() {
    let mut dom = MemoryDom::new();
    let (section, p) = paragraph(&mut dom, "line one\nline two");
    let before = dom.to_html(section);

    let mut reveal = orchestrator(RevealConfig::default());
    reveal.mount(&mut dom, Some(&p)).unwrap();
    reveal.unmount(&mut dom).unwrap();

    let outcome = reveal.reconfigure(&mut dom, immediate()).unwrap();
    assert_eq!(outcome, MountOutcome::Skipped);
    assert!(!reveal.is_mounted());
    assert_eq!(reveal.config(), &immediate());
    assert_eq!(dom.to_html(section), before);
}

#[test]
fn test_remount_tears_down_previous_cycle() {
    let mut dom = MemoryDom::new();
    let (section, p) = paragraph(&mut dom, "line one\nline two");
    let before = dom.to_html(section);

    let mut reveal = orchestrator(RevealConfig::default());
    reveal.mount(&mut dom, Some(&p)).unwrap();
    reveal.mount(&mut dom, Some(&p)).unwrap();

    assert_eq!(count_class(&dom, WRAPPER_CLASS), 2);
    assert_eq!(reveal.animator().timeline_count(), 2);
    assert_eq!(reveal.animator().trigger_count(), 2);

    reveal.unmount(&mut dom).unwrap();
    assert_eq!(dom.to_html(section), before);
}

#[test]
fn test_teardown_survives_external_removal() {
    let mut dom = MemoryDom::new();
    let (section, p) = paragraph(&mut dom, "line one\nline two\nline three");
    let before = dom.to_html(section);

    let mut reveal = orchestrator(immediate());
    reveal.mount(&mut dom, Some(&p)).unwrap();

    // Other code on the page deletes the middle wrapper
    let middle = reveal.cycle().unwrap().lines()[1].wrapper;
    dom.remove_child(&p, &middle).unwrap();

    reveal.unmount(&mut dom).unwrap();
    assert_eq!(count_class(&dom, WRAPPER_CLASS), 0);
    assert_eq!(count_class(&dom, BLOCK_CLASS), 0);
    assert_eq!(dom.to_html(section), before);
    assert_eq!(reveal.animator().timeline_count(), 0);
}

#[test]
fn test_teardown_survives_line_moved_out_of_wrapper() {
    let mut dom = MemoryDom::new();
    let (section, p) = paragraph(&mut dom, "line one\nline two\nline three");
    let before = dom.to_html(section);

    let mut reveal = orchestrator(immediate());
    reveal.mount(&mut dom, Some(&p)).unwrap();

    // Other code lifts the middle line out, leaving its wrapper with only the block
    let middle = reveal.cycle().unwrap().lines()[1].clone();
    dom.insert_before(&p, &middle.line, Some(&middle.wrapper)).unwrap();
    assert_eq!(dom.child_nodes(&middle.wrapper), vec![middle.block]);

    reveal.unmount(&mut dom).unwrap();
    assert_eq!(count_class(&dom, WRAPPER_CLASS), 0);
    assert_eq!(count_class(&dom, BLOCK_CLASS), 0);
    assert_eq!(dom.to_html(section), before);
}

#[test]
fn test_inline_markup_survives_the_animation() {
    let mut dom = MemoryDom::new();
    let (section, p) = paragraph(&mut dom, "Reveal ");
    dom.append_element_with_text(p, "em", "rich").unwrap();
    let before = dom.to_html(section);

    let mut reveal = orchestrator(immediate());
    let outcome = reveal.mount(&mut dom, Some(&p)).unwrap();
    assert_eq!(outcome, MountOutcome::Mounted { lines: 1 });

    for _ in 0..10 {
        reveal.animator_mut().tick(&mut dom, 1.0).unwrap();
    }
    assert!(reveal.animator().is_idle());
    let line = reveal.cycle().unwrap().lines()[0].line;
    assert_eq!(dom.style(&line, "opacity").as_deref(), Some("1"));
    assert!(dom.to_html(line).contains("Reveal <em>rich</em>"));

    reveal.unmount(&mut dom).unwrap();
    assert_eq!(dom.to_html(section), before);
}

#[test]
fn test_empty_content_mounts_nothing() {
    let mut dom = MemoryDom::new();
    let (section, p) = paragraph(&mut dom, "   ");
    let mut reveal = orchestrator(RevealConfig::default());

    let outcome = reveal.mount(&mut dom, Some(&p)).unwrap();
    assert_eq!(outcome, MountOutcome::Mounted { lines: 0 });
    assert_eq!(reveal.animator().timeline_count(), 0);
    assert_eq!(reveal.animator().trigger_count(), 0);

    reveal.unmount(&mut dom).unwrap();
    assert_eq!(dom.to_html(section), "<section><p>   </p></section>");
}
