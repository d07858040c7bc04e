// Cleanup, fix and render passes over a whole score

use std::sync::Arc;

use num_rational::Rational32;
use omr_core::classify::ReferenceRow;
use omr_core::config::{LayoutConstants, Scale};
use omr_core::geometry::{Point, Rectangle};
use omr_core::glyph::{Doubt, Glyph, GlyphId, Shape};
use omr_core::renderers::{DisplayItem, DisplayList, Zoom};
use omr_core::score::{
    accept, Barline, CacheState, Chord, Measure, MeasureItem, NodeKind, Part, Score, ScoreFixer, ScoreVisitor, Staff,
    System, TextItem, TimeSignature,
};
use omr_core::EngineError;

fn layout(inter_system: i32) -> LayoutConstants {
    LayoutConstants {
        score_init_x: 0,
        score_init_y: 0,
        inter_system,
    }
}

fn thin_barline(system: usize, x: i32) -> Barline {
    let mut barline = Barline::new(system, Some(ReferenceRow::new(0, 80)));
    barline
        .add_stick(Arc::new(Glyph::stick(system, Rectangle::new(x, 0, 3, 80), Shape::ThinBarline)))
        .unwrap();
    barline
}

fn system(id: usize, width: i32, measures: usize) -> System {
    let mut system = System::new(id, Point::new(0, id as i32 * 200), width, 80);
    let mut part = Part::new(1);
    let mut staff = Staff::new(1, Point::new(0, id as i32 * 200), 80).with_lines(width);
    for i in 0..measures {
        let mut measure = Measure::new();
        measure.add_item(MeasureItem::Barline(thin_barline(id, (i as i32 + 1) * 10)));
        staff.add_measure(measure);
    }
    part.add_staff(staff);
    system.add_part(part);
    system
}

fn score(systems: Vec<System>) -> Score {
    let mut score = Score::new(Scale::default(), "eng");
    for system in systems {
        score.add_system(system);
    }
    score
}

#[test]
fn test_system_origins_follow_widths() {
    let mut score = score(vec![system(0, 10, 1), system(1, 20, 1), system(2, 30, 1)]);
    score.fix(&layout(5)).unwrap();

    let origins: Vec<_> = score.systems.iter().map(|s| s.origin).collect();
    assert_eq!(
        origins,
        vec![Some(Point::new(0, 0)), Some(Point::new(15, 0)), Some(Point::new(40, 0))]
    );
}

#[test]
fn test_staff_display_origin_is_relative_to_system() {
    let mut system = system(0, 100, 1);
    system.parts[0].add_staff(Staff::new(2, Point::new(0, 120), 80));
    let mut score = score(vec![system]);
    score.fix(&layout(100)).unwrap();

    let staves: Vec<_> = score.systems[0].staves().map(|s| s.display_origin).collect();
    assert_eq!(staves, vec![Some(Point::new(0, 0)), Some(Point::new(0, 120))]);
}

#[test]
fn test_measure_ids_increase_across_systems() {
    let mut score = score(vec![system(0, 100, 2), system(1, 100, 3), system(2, 100, 1)]);
    score.fix(&layout(100)).unwrap();

    let ids: Vec<usize> = score
        .systems
        .iter()
        .flat_map(|s| s.staves())
        .flat_map(|staff| staff.measures.iter())
        .map(|m| m.id.unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    assert!(ids.windows(2).all(|w| w[0] < w[1]));

    assert_eq!(score.systems[1].first_measure_id, Some(2));
    assert_eq!(score.systems[2].first_measure_id, Some(5));
    assert_eq!(score.systems[2].last_measure_id(), Some(6));
}

#[test]
fn test_empty_system_keeps_measure_count() {
    let mut score = score(vec![system(0, 100, 2), system(1, 100, 0), system(2, 100, 1)]);
    score.fix(&layout(100)).unwrap();

    assert_eq!(score.systems[1].last_measure_id(), Some(2));
    assert_eq!(score.systems[2].staves().next().unwrap().measures[0].id, Some(3));
}

#[test]
fn test_fix_is_repeatable() {
    let mut score = score(vec![system(0, 10, 2), system(1, 20, 1)]);
    score.fix(&layout(5)).unwrap();
    let once = score.clone();
    score.fix(&layout(5)).unwrap();
    assert_eq!(score, once);
}

#[test]
fn test_fix_warms_entity_caches() {
    let mut score = score(vec![system(0, 100, 1)]);
    let measure = &score.systems[0].parts[0].staves[0].measures[0];
    assert_eq!(measure.barline().unwrap().cache_state(), CacheState::Unset);

    score.fix(&layout(100)).unwrap();
    let measure = &score.systems[0].parts[0].staves[0].measures[0];
    assert_eq!(measure.barline().unwrap().cache_state(), CacheState::Computed);
    assert_eq!(measure.barline().unwrap().cached_shape(), Some(Shape::ThinBarline));
}

#[test]
fn test_missing_previous_origin_is_reported() {
    struct Idle;

    impl ScoreVisitor for Idle {}

    let mut score = score(vec![system(0, 10, 1), system(1, 20, 1)]);
    // A pass that computes nothing leaves origins unset
    accept(&mut Idle, &mut score).unwrap();
    assert_eq!(score.systems[0].origin, None);

    // Fixing only the second system cannot work without the first origin
    let mut fixer = ScoreFixer::new(layout(5));
    let (first, rest) = score.systems.split_at_mut(1);
    let result = fixer.visit_system(&mut rest[0], Some(&first[0]));
    match result {
        Err(EngineError::MissingOrigin { system, previous }) => {
            assert_eq!(system, 1);
            assert_eq!(previous, 0);
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn test_cleanup_keeps_only_barlines() {
    let mut system = system(0, 100, 1);
    let glyph = system.register_glyph(
        Glyph::new(0, Rectangle::new(10, 10, 40, 10)).with_shape(Shape::Text, Doubt::Algorithm),
    );
    system.add_translation(glyph.id, NodeKind::Text);
    system.parts[0].add_duration(Rational32::new(3, 4));
    {
        let measure = &mut system.parts[0].staves[0].measures[0];
        measure.add_item(MeasureItem::Chord(Chord::default()));
        measure.add_item(MeasureItem::Text(TextItem {
            value: "dolce".to_string(),
            glyph,
        }));
    }

    let mut score = score(vec![system]);
    score.cleanup().unwrap();

    let system = &score.systems[0];
    assert!(system.translations.is_empty());
    assert!(system.parts[0].durations.is_empty());
    let kinds: Vec<_> = system.parts[0].staves[0].measures[0]
        .items
        .iter()
        .map(MeasureItem::kind)
        .collect();
    assert_eq!(kinds, vec![NodeKind::Barline]);

    let once = score.clone();
    score.cleanup().unwrap();
    assert_eq!(score, once);
}

#[test]
fn test_render_after_fix() {
    let mut system = system(0, 100, 1);
    let mut ts = TimeSignature::new(0, system.parts[0].staves[0].geometry());
    ts.add_glyph(Arc::new(
        Glyph::new(0, Rectangle::new(40, 20, 20, 40))
            .with_id(90)
            .with_shape(Shape::TimeSixEight, Doubt::Classifier),
    ))
    .unwrap();
    system.parts[0].staves[0].measures[0].add_item(MeasureItem::TimeSignature(ts));
    let mut score = score(vec![system]);

    // Not fixed yet: the time signature is skipped
    let mut early = DisplayList::new();
    score.render(&mut early, Zoom::default());
    assert_eq!(early.count_symbols(Shape::TimeSixEight), 0);

    score.fix(&layout(100)).unwrap();
    let mut list = DisplayList::new();
    score.render(&mut list, Zoom::new(2.0));

    assert_eq!(list.count_symbols(Shape::TimeSixEight), 1);
    // Five staff lines and one bar stick
    let lines = list.items.iter().filter(|i| matches!(i, DisplayItem::Line { .. })).count();
    assert_eq!(lines, 6);
    assert!(list.items.contains(&DisplayItem::Symbol {
        shape: Shape::TimeSixEight,
        x: 100.0,
        y: 80.0,
        pitch: None,
    }));
}

#[test]
fn test_translation_ids_are_kept_per_glyph() {
    let mut system = system(0, 100, 0);
    system.add_translation(GlyphId(7), NodeKind::Clef);
    system.add_translation(GlyphId(7), NodeKind::Chord);
    assert_eq!(system.translations[&GlyphId(7)], vec![NodeKind::Clef, NodeKind::Chord]);
}

#[test]
fn test_render_leaves_caches_untouched() {
    let mut system = system(0, 100, 1);
    let mut ts = TimeSignature::new(0, system.parts[0].staves[0].geometry());
    ts.add_glyph(Arc::new(
        Glyph::new(0, Rectangle::new(40, 20, 20, 40))
            .with_id(90)
            .with_shape(Shape::CommonTime, Doubt::Classifier),
    ))
    .unwrap();
    // Decomposition known, center not yet
    assert_eq!(ts.numerator(), Some(4));
    assert_eq!(ts.center_state(), CacheState::Unset);
    system.parts[0].staves[0].measures[0].add_item(MeasureItem::TimeSignature(ts));
    let score = score(vec![system]);

    let mut list = DisplayList::new();
    score.render(&mut list, Zoom::default());

    assert_eq!(list.count_symbols(Shape::CommonTime), 0);
    let measure = &score.systems[0].parts[0].staves[0].measures[0];
    let barline = measure.barline().unwrap();
    assert_eq!(barline.cache_state(), CacheState::Unset);
    match &measure.items[1] {
        MeasureItem::TimeSignature(ts) => {
            assert_eq!(ts.center_state(), CacheState::Unset);
            assert_eq!(ts.cached_center(), None);
        }
        other => panic!("unexpected item {:?}", other),
    }
}
