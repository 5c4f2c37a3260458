//! End-to-end layout scenarios: single word, ties, impossible canvas,
//! masked canvas, and an exhausted run budget.

use wordcloud_core::{Orientation, Outline, Point, Rect, Rgba, SkipReason, WordEntry};
use wordcloud_layout::{
    BudgetConfig, Canvas, CloudLayout, LayoutConfig, OccupancyRegion, OrientationWeights, StopReason,
};
use wordcloud_text::FixedMetrics;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn layout(config: LayoutConfig) -> CloudLayout {
    CloudLayout::new(config).unwrap()
}

#[test]
fn test_single_word_lands_near_center() {
    init_logger();
    let canvas = Canvas::new(100, 100);
    let result = layout(LayoutConfig::default())
        .run(
            &mut FixedMetrics::new(),
            vec![WordEntry::new("cloud", 1.0)],
            canvas,
            None,
        )
        .unwrap();

    assert_eq!(result.placed.len(), 1);
    let word = &result.placed[0];
    assert!(!word.bounds().falls_outside(&canvas.bounds()));
    assert!(
        word.center.distance(&Point::new(50.0, 50.0)) <= 5.0,
        "placed at {:?}",
        word.center
    );
}

#[test]
fn test_equal_weights_keep_input_order() {
    init_logger();
    let result = layout(LayoutConfig::default())
        .run(
            &mut FixedMetrics::new(),
            vec![WordEntry::new("first", 2.0), WordEntry::new("second", 2.0)],
            Canvas::new(600, 400),
            None,
        )
        .unwrap();

    let order: Vec<&str> = result.placed.iter().map(|p| p.text.as_str()).collect();
    assert_eq!(order, vec!["first", "second"]);
    assert!(result.skipped.is_empty());
    for a in result.placed[0].outline.contours() {
        let a = Outline::new(vec![a.clone()]).bounds();
        for b in result.placed[1].outline.contours() {
            assert!(!a.intersects(&Outline::new(vec![b.clone()]).bounds()));
        }
    }
}

#[test]
fn test_canvas_smaller_than_minimum_size() {
    init_logger();
    let config = LayoutConfig {
        min_font_size: 24.0,
        max_font_size: 30.0,
        ..LayoutConfig::default()
    };
    let result = layout(config)
        .run(
            &mut FixedMetrics::new(),
            vec![WordEntry::new("giant", 1.0)],
            Canvas::new(20, 10),
            None,
        )
        .unwrap();

    assert!(result.placed.is_empty());
    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].reason, SkipReason::WordUnplaceable);
    assert_eq!(result.stopped, None);
}

#[test]
fn test_mask_confines_words_to_open_corner() {
    init_logger();
    let canvas = Canvas::new(400, 300);
    let corner = Rect::from_size(120.0, 60.0);
    let mask = OccupancyRegion::from_rect(&corner).complement_within(canvas.pixel_rect());

    let config = LayoutConfig {
        min_font_size: 8.0,
        max_font_size: 16.0,
        max_attempts_per_word: 60_000,
        orientation_weights: OrientationWeights::only(Orientation::Horizontal),
        ..LayoutConfig::default()
    };
    let names = [
        "ant", "bee", "cat", "dog", "eel", "fox", "gnu", "hen", "ibis", "jay", "koi", "lynx",
    ];
    let words: Vec<WordEntry> = names
        .iter()
        .enumerate()
        .map(|(i, t)| WordEntry::new(*t, 12.0 - i as f32))
        .collect();
    let total = words.len();

    let result = layout(config)
        .run(&mut FixedMetrics::new(), words, canvas, Some(mask.clone()))
        .unwrap();

    assert!(!result.placed.is_empty());
    assert_eq!(result.placed.len() + result.skipped.len(), total);
    for word in &result.placed {
        assert!(corner.contains_rect(&word.bounds()), "{:?} at {:?}", word.text, word.bounds());
        assert!(!mask.intersects_outline(&word.outline));
    }
    assert!(result
        .skipped
        .iter()
        .all(|s| s.reason == SkipReason::WordUnplaceable));
}

#[test]
fn test_attempt_budget_of_one() {
    init_logger();
    let config = LayoutConfig {
        budget: BudgetConfig {
            max_total_attempts: Some(1),
            timeout_ms: None,
        },
        ..LayoutConfig::default()
    };
    let words: Vec<WordEntry> = ["one", "two", "three", "four", "five"]
        .iter()
        .map(|t| WordEntry::new(*t, 1.0))
        .collect();

    let result = layout(config)
        .run(&mut FixedMetrics::new(), words, Canvas::new(400, 300), None)
        .unwrap();

    assert!(result.placed.len() <= 1);
    assert_eq!(result.placed.len() + result.skipped.len(), 5);
    assert!(result
        .skipped
        .iter()
        .all(|s| s.reason == SkipReason::RunBudgetExceeded));
    assert_eq!(result.stopped, Some(StopReason::AttemptBudget));
    assert_eq!(result.stats.candidates_evaluated, 1);
}

#[test]
fn test_config_from_json_drives_run() {
    init_logger();
    let config = LayoutConfig::from_json_str(
        r#"{
            "min_font_size": 10,
            "max_font_size": 30,
            "palette": ["black"],
            "orientation_weights": { "horizontal": 1, "vertical": 0 },
            "seed": 99
        }"#,
    )
    .unwrap();
    let result = layout(config)
        .run(
            &mut FixedMetrics::new(),
            vec![WordEntry::new("json", 2.0), WordEntry::new("driven", 1.0)],
            Canvas::new(300, 200),
            None,
        )
        .unwrap();
    assert_eq!(result.placed.len(), 2);
    assert_eq!(result.placed[0].font_size, 30.0);
    assert_eq!(result.placed[1].font_size, 10.0);
    assert!(result
        .placed
        .iter()
        .all(|p| p.orientation == Orientation::Horizontal && p.color == Rgba::BLACK));
}
