// Border text detection around a system

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use omr_core::config::{Scale, TextConstants};
use omr_core::diagnostics::{kind, Diagnostics};
use omr_core::geometry::{BrokenLine, Line, Point, Rectangle};
use omr_core::glyph::{Doubt, Glyph, HorizontalSide, Shape};
use omr_core::score::{NodeKind, System, SystemBoundary};
use omr_core::text::{
    build_regions, CancellationToken, PixelRegion, RecognizerError, TextBorderPattern, TextLine, TextRecognizer,
    ZoneSide,
};

/// Reads every region as one line of five chars
#[derive(Default)]
struct Reader {
    calls: AtomicUsize,
}

impl TextRecognizer for Reader {
    fn recognize(&self, region: &PixelRegion, _language: &str) -> Result<Vec<TextLine>, RecognizerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![TextLine::new("Lento", region.bounds, 18.0)])
    }
}

struct Sleeper;

impl TextRecognizer for Sleeper {
    fn recognize(&self, region: &PixelRegion, _language: &str) -> Result<Vec<TextLine>, RecognizerError> {
        thread::sleep(Duration::from_millis(300));
        Ok(vec![TextLine::new("Lento", region.bounds, 18.0)])
    }
}

struct Missing;

impl TextRecognizer for Missing {
    fn is_available(&self) -> bool {
        false
    }

    fn recognize(&self, _region: &PixelRegion, _language: &str) -> Result<Vec<TextLine>, RecognizerError> {
        Err(RecognizerError::Unavailable)
    }
}

// Staves from y=200 to y=400, x=100 to x=900, on a 1000 wide sheet
fn boundary() -> SystemBoundary {
    SystemBoundary {
        left: 100,
        right: 900,
        sheet_width: 1000,
        top_limit: BrokenLine::new(vec![Point::new(0, 0), Point::new(1000, 0)]),
        bottom_limit: BrokenLine::new(vec![Point::new(0, 700), Point::new(1000, 700)]),
        first_line: Line::new(Point::new(100, 200), Point::new(900, 200)),
        last_line: Line::new(Point::new(100, 400), Point::new(900, 400)),
    }
}

fn letter(x: i32, y: i32) -> Glyph {
    Glyph::new(0, Rectangle::new(x, y, 10, 20))
}

/// Three letters above the staves, plus glyphs that must not be taken as text
fn system() -> System {
    let mut system = System::new(0, Point::new(0, 0), 1000, 700).with_boundary(boundary());
    for x in [300, 315, 330] {
        system.register_glyph(letter(x, 100));
    }
    // Within the staves
    system.register_glyph(letter(500, 300));
    // A stem and a glyph stuck to a stem, both above the staves
    let stem = system.register_glyph(
        Glyph::stick(0, Rectangle::new(600, 60, 3, 100), Shape::Stem),
    );
    system.register_glyph(letter(700, 100).with_stem(HorizontalSide::Left, stem.id));
    system
}

fn scale() -> Scale {
    Scale::new(20.0).unwrap()
}

fn pattern(recognizer: Arc<dyn TextRecognizer>, constants: TextConstants) -> TextBorderPattern {
    TextBorderPattern::new(scale(), constants, recognizer, "eng")
}

#[test]
fn test_letters_above_staves_become_text() {
    let reader = Arc::new(Reader::default());
    let mut system = system();
    let before = system.glyphs.len();
    let mut diagnostics = Diagnostics::new();

    let texts = pattern(reader.clone(), TextConstants::default()).run(&mut system, &mut diagnostics);

    assert_eq!(texts.len(), 1);
    let text = &texts[0];
    assert_eq!(text.side, ZoneSide::North);
    assert_eq!(text.line.value, "Lento");
    assert_eq!(text.glyph.bounds, Rectangle::new(300, 100, 40, 20));
    assert_eq!(text.glyph.shape, Some(Shape::Text));
    assert_eq!(text.glyph.doubt, Some(Doubt::Algorithm));
    assert!(text.glyph.features.is_some());

    // Registered permanently, and translated
    assert_eq!(system.glyphs.len(), before + 1);
    assert!(system.glyphs.get(text.glyph.id).is_some());
    assert_eq!(system.translations[&text.glyph.id], vec![NodeKind::Text]);
    assert_eq!(reader.calls.load(Ordering::SeqCst), 1);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_candidates_lie_within_their_region() {
    let pattern = pattern(Arc::new(Reader::default()), TextConstants::default());
    let system = system();
    let regions = build_regions(&boundary(), &scale(), &TextConstants::default());

    for region in &regions {
        for blob in pattern.blobs(region, &system.glyphs) {
            for glyph in &blob.glyphs {
                assert!(region.polygon.contains_rect(&glyph.bounds));
                assert!(!glyph.is_stem());
            }
        }
    }

    let north: usize = pattern.blobs(&regions[0], &system.glyphs).iter().map(|b| b.glyphs.len()).sum();
    assert_eq!(north, 3);
}

#[test]
fn test_second_run_finds_nothing_new() {
    let reader = Arc::new(Reader::default());
    let mut system = system();
    let pattern = pattern(reader.clone(), TextConstants::default());
    let mut diagnostics = Diagnostics::new();

    let first = pattern.run(&mut system, &mut diagnostics);
    assert_eq!(first.len(), 1);
    let second = pattern.run(&mut system, &mut diagnostics);
    assert!(second.is_empty());

    let texts = system.glyphs.iter().filter(|g| g.shape == Some(Shape::Text)).count();
    assert_eq!(texts, 1);
    assert_eq!(reader.calls.load(Ordering::SeqCst), 1);
    assert_eq!(system.translations.len(), 1);

    // The letters now belong to the text glyph, which is not a candidate either
    let compound = first[0].glyph.id;
    let letters: Vec<_> = system
        .glyphs
        .iter()
        .filter(|g| g.bounds.y == 100 && g.bounds.x < 400 && g.id != compound)
        .map(|g| g.id)
        .collect();
    assert_eq!(letters.len(), 3);
    assert!(letters.iter().all(|id| system.glyphs.part_of(*id) == Some(compound)));

    let regions = build_regions(&boundary(), &scale(), &TextConstants::default());
    assert!(pattern.blobs(&regions[0], &system.glyphs).is_empty());
}

#[test]
fn test_stricter_limits_reject_more() {
    // "Lento" on a 40x20 box has a char aspect of 2.5
    let strict = TextConstants {
        max_aspect: 2.0,
        ..TextConstants::default()
    };
    let mut system = system();
    let before = system.glyphs.len();
    let mut diagnostics = Diagnostics::new();

    let texts = pattern(Arc::new(Reader::default()), strict).run(&mut system, &mut diagnostics);

    assert!(texts.is_empty());
    assert_eq!(system.glyphs.len(), before);
    assert!(system.translations.is_empty());
    assert!(diagnostics.has_kind(kind::TEXT_REJECTED));
}

#[test]
fn test_timeout_is_a_rejection() {
    let constants = TextConstants {
        recognizer_timeout_ms: 20,
        ..TextConstants::default()
    };
    let mut system = system();
    let before = system.glyphs.len();
    let mut diagnostics = Diagnostics::new();

    let texts = pattern(Arc::new(Sleeper), constants).run(&mut system, &mut diagnostics);

    assert!(texts.is_empty());
    assert_eq!(system.glyphs.len(), before);
    assert!(diagnostics.has_kind(kind::TEXT_REJECTED));
}

#[test]
fn test_cancelled_detection_promotes_nothing() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let mut system = system();
    let before = system.glyphs.len();
    let mut diagnostics = Diagnostics::new();

    let texts = pattern(Arc::new(Reader::default()), TextConstants::default())
        .with_cancellation(cancel)
        .run(&mut system, &mut diagnostics);

    assert!(texts.is_empty());
    assert_eq!(system.glyphs.len(), before);
}

#[test]
fn test_unavailable_recognizer_leaves_blobs_unvalidated() {
    let mut system = system();
    let before = system.glyphs.len();
    let mut diagnostics = Diagnostics::new();

    let texts = pattern(Arc::new(Missing), TextConstants::default()).run(&mut system, &mut diagnostics);

    assert!(texts.is_empty());
    assert_eq!(system.glyphs.len(), before);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_system_without_boundary_is_skipped() {
    let reader = Arc::new(Reader::default());
    let mut system = System::new(0, Point::new(0, 0), 1000, 700);
    system.register_glyph(letter(300, 100));
    let mut diagnostics = Diagnostics::new();

    let texts = pattern(reader.clone(), TextConstants::default()).run(&mut system, &mut diagnostics);

    assert!(texts.is_empty());
    assert_eq!(reader.calls.load(Ordering::SeqCst), 0);
}
