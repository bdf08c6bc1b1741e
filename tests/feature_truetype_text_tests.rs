#![cfg(feature = "truetype-text")]

use textrude::{
    TextMesher,
    float_types::Real,
    glyph_source::GlyphSource,
    truetype::{FontError, TrueTypeGlyphSource},
};

#[test]
fn garbage_font_data_is_rejected() {
    let data = [0u8; 16];
    assert!(matches!(
        TrueTypeGlyphSource::new(&data, 12.0),
        Err(FontError::Parse(_))
    ));
}

#[test]
fn non_positive_size_is_rejected() {
    assert!(matches!(
        TrueTypeGlyphSource::new(&[], 0.0),
        Err(FontError::InvalidSize(_))
    ));
    assert!(matches!(
        TrueTypeGlyphSource::new(&[], -3.0),
        Err(FontError::InvalidSize(_))
    ));
}

// DejaVu Sans Mono, Bitstream Vera license (see fonts/DejaVuSansMono-LICENSE.txt)
const FONT: &[u8] = include_bytes!("fonts/DejaVuSansMono.ttf");

/// Horizontal advance of one monospaced cell.
fn advance(source: &TrueTypeGlyphSource) -> Real {
    let one = source.layout("A").unwrap().bounds.unwrap();
    let two = source.layout("AA").unwrap().bounds.unwrap();
    two.width() - one.width()
}

#[test]
fn abc_is_laid_out_centred_and_meshed() {
    let source = TrueTypeGlyphSource::new(FONT, 10.0).unwrap();

    let run = source.layout("ABC").unwrap();
    assert_eq!(run.len(), 3);
    let bounds = run.bounds.unwrap();
    assert!((bounds.min().x + bounds.max().x).abs() < 1e-3, "{bounds:?}");
    // ink spans two full advances plus part of a third
    let advance = advance(&source);
    assert!(bounds.width() > 2.0 * advance && bounds.width() < 3.0 * advance, "{bounds:?}");
    assert!(bounds.min().y > -0.5 && bounds.max().y > 6.0);

    let (mesh, report) = TextMesher::default().mesh_text(&source, "ABC").unwrap();
    assert_eq!(report.glyph_count, 3);
    assert_eq!(report.skipped_count(), 0);
    assert!(!mesh.is_empty());
    mesh.validate().unwrap();

    let xs = mesh.vertices.iter().map(|v| v.position[0]);
    let (min_x, max_x) = xs.fold((f32::MAX, f32::MIN), |(lo, hi), x| (lo.min(x), hi.max(x)));
    assert!((min_x + max_x).abs() < 0.2, "mesh spans {min_x}..{max_x}");
}

#[test]
fn space_gives_empty_mesh() {
    let source = TrueTypeGlyphSource::new(FONT, 10.0).unwrap();
    assert!(source.layout(" ").unwrap().is_empty());

    let (mesh, report) = TextMesher::default().mesh_text(&source, " ").unwrap();
    assert_eq!(mesh.vertex_count(), 0);
    assert_eq!(mesh.index_count(), 0);
    assert_eq!(report.glyph_count, 0);
}

#[test]
fn spaces_advance_the_pen() {
    let source = TrueTypeGlyphSource::new(FONT, 10.0).unwrap();
    let tight = source.layout("AB").unwrap().bounds.unwrap();
    let spaced = source.layout("A  B").unwrap().bounds.unwrap();
    assert!((spaced.width() - tight.width() - 2.0 * advance(&source)).abs() < 1e-3);
}
