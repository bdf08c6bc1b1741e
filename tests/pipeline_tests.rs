mod support;

use geo::{Coord, Rect};
use support::*;
use textrude::{
    GlyphError, MeshConfig, TextMesher,
    config::{FlattenMode, GlyphErrorPolicy},
    glyph_source::GlyphRun,
    mesh::{IndexFormat, PrimitiveTopology, VertexLayout},
    outline::Outline,
    tessellate::FanTessellator,
};

fn three_squares() -> GlyphRun {
    GlyphRun::from_outlines(vec![
        square_outline(0.0, 0.0, 10.0),
        square_outline(20.0, 0.0, 10.0),
        square_outline(40.0, 0.0, 10.0),
    ])
}

#[test]
fn failing_glyph_is_skipped_and_reported() {
    let mesher =
        TextMesher::with_tessellator(FailingTessellator { fail_at_x: 20.0 }, MeshConfig::default());
    let (mesh, report) = mesher.mesh_run(&three_squares()).unwrap();

    assert_eq!(report.glyph_count, 3);
    assert_eq!(report.skipped_count(), 1);
    assert_eq!(report.meshed_count(), 2);
    assert_eq!(report.skipped[0].glyph, 1);
    assert_eq!(
        report.skipped[0].error,
        GlyphError::TessellationFailed { glyph: 1 }
    );

    // two glyphs: 8 cap + 8 wall vertices, 12 cap + 24 wall indices each
    assert_eq!(mesh.vertex_count(), 32);
    assert_eq!(mesh.index_count(), 72);
    mesh.validate().unwrap();
    assert!(mesh.vertices.iter().all(|v| v.position[0] < 15.0 || v.position[0] > 35.0));
}

#[test]
fn abort_policy_returns_first_error() {
    let config = MeshConfig::default().with_glyph_error_policy(GlyphErrorPolicy::Abort);
    let mesher = TextMesher::with_tessellator(FailingTessellator { fail_at_x: 20.0 }, config);
    assert_eq!(
        mesher.mesh_run(&three_squares()),
        Err(GlyphError::TessellationFailed { glyph: 1 })
    );
}

#[test]
fn cubic_glyph_is_skipped_by_default() {
    let mut cubic = Outline::new();
    cubic
        .move_to(20.0, 0.0)
        .cubic_to(20.0, 5.0, 25.0, 5.0, 25.0, 0.0)
        .close();
    let run = GlyphRun::from_outlines(vec![square_outline(0.0, 0.0, 10.0), cubic]);

    let (mesh, report) = TextMesher::default().mesh_run(&run).unwrap();
    assert_eq!(report.skipped_count(), 1);
    assert!(matches!(
        report.skipped[0].error,
        GlyphError::UnsupportedGeometry { .. }
    ));
    assert!(!mesh.is_empty());
}

#[test]
fn empty_input_gives_empty_mesh() {
    let (mesh, report) = TextMesher::default().mesh_run(&GlyphRun::default()).unwrap();
    assert_eq!(mesh.vertex_count(), 0);
    assert_eq!(mesh.index_count(), 0);
    assert_eq!(report.glyph_count, 0);

    // a space: a glyph without outline commands
    let run = GlyphRun::from_outlines(vec![Outline::new()]);
    let (mesh, report) = TextMesher::default().mesh_run(&run).unwrap();
    assert!(mesh.is_empty());
    assert_eq!(report.glyph_count, 0);
    assert_eq!(report.skipped_count(), 0);
}

#[test]
fn run_without_bounds_is_still_meshed() {
    let run = GlyphRun {
        outlines: vec![square_outline(0.0, 0.0, 4.0)],
        bounds: None,
    };
    let (mesh, report) = TextMesher::default().mesh_run(&run).unwrap();
    assert_eq!(report.glyph_count, 1);
    assert_eq!(report.meshed_count(), 1);
    assert!(!mesh.is_empty());
    for v in &mesh.vertices {
        let [x, y, _] = v.position;
        assert_eq!(v.uv, [x / 4.0, 1.0 - y / 4.0]);
    }
}

#[test]
fn curved_glyph_texture_reaches_its_edges() {
    let mut arch = Outline::new();
    arch.move_to(0.0, 0.0).quad_to(1.0, 2.0, 2.0, 0.0).close();
    let run = GlyphRun::from_outlines(vec![arch]);
    // the curve peaks at y = 1, below its control point
    assert_eq!(
        run.bounds,
        Some(Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 2.0, y: 1.0 }))
    );

    let mesher = TextMesher::new(MeshConfig::default().with_flatten(FlattenMode::fixed(2)));
    let (mesh, report) = mesher.mesh_run(&run).unwrap();
    assert_eq!(report.meshed_count(), 1);
    let (u, v): (Vec<_>, Vec<_>) = mesh.vertices.iter().map(|m| (m.uv[0], m.uv[1])).unzip();
    assert_eq!(u.iter().copied().fold(f32::MAX, f32::min), 0.0);
    assert_eq!(u.iter().copied().fold(f32::MIN, f32::max), 1.0);
    assert_eq!(v.iter().copied().fold(f32::MAX, f32::min), 0.0);
    assert_eq!(v.iter().copied().fold(f32::MIN, f32::max), 1.0);
}

#[test]
fn indices_stay_in_range() {
    let run = GlyphRun::from_outlines(vec![
        square_with_hole(0.0),
        bowl_outline(15.0),
        square_outline(30.0, 0.0, 10.0),
    ]);
    let (mesh, report) = TextMesher::new(MeshConfig::new(3.0)).mesh_run(&run).unwrap();
    assert_eq!(report.skipped_count(), 0);
    assert_eq!(mesh.index_count() % 3, 0);
    assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));

    for v in &mesh.vertices {
        assert!(v.position[2] == 0.0 || v.position[2] == -3.0);
        assert!((0.0..=1.0).contains(&v.uv[0]));
        assert!((0.0..=1.0).contains(&v.uv[1]));
    }
}

#[test]
fn cap_normals_point_along_z() {
    let mesher = TextMesher::with_tessellator(FanTessellator, MeshConfig::default());
    let (mesh, _) = mesher
        .mesh_run(&GlyphRun::from_outlines(vec![square_outline(0.0, 0.0, 1.0)]))
        .unwrap();

    let (caps, walls) = mesh.vertices.split_at(8);
    for v in &caps[..4] {
        assert_eq!(v.normal, [0.0, 0.0, 1.0]);
    }
    for v in &caps[4..] {
        assert_eq!(v.normal, [0.0, 0.0, -1.0]);
    }
    for v in walls {
        assert!(v.normal[2].abs() < 1e-6);
        assert!((v.normal().norm() - 1.0).abs() < 1e-5);
    }
}

#[test]
fn normals_stay_zero_without_crease_pass() {
    let config = MeshConfig::default().with_crease_threshold(None);
    let (mesh, _) = TextMesher::new(config)
        .mesh_run(&GlyphRun::from_outlines(vec![square_outline(0.0, 0.0, 1.0)]))
        .unwrap();
    assert!(mesh.vertices.iter().all(|v| v.normal == [0.0; 3]));
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let mesher = TextMesher::new(MeshConfig::new(0.0));
    assert!(matches!(
        mesher.mesh_run(&three_squares()),
        Err(GlyphError::InvalidParameter(_))
    ));

    let mesher = TextMesher::new(MeshConfig::default().with_flatten(FlattenMode::adaptive(-1.0)));
    assert!(matches!(
        mesher.mesh_run(&three_squares()),
        Err(GlyphError::InvalidParameter(_))
    ));
}

#[test]
fn fixed_and_adaptive_flattening_both_mesh() {
    for mode in [FlattenMode::fixed_default(), FlattenMode::adaptive(0.01)] {
        let mesher = TextMesher::new(MeshConfig::default().with_flatten(mode));
        let (mesh, report) = mesher
            .mesh_run(&GlyphRun::from_outlines(vec![bowl_outline(0.0)]))
            .unwrap();
        assert_eq!(report.meshed_count(), 1);
        mesh.validate().unwrap();
    }
}

#[test]
fn mesh_descriptor() {
    let (mesh, _) = TextMesher::default().mesh_run(&three_squares()).unwrap();
    assert_eq!(mesh.topology(), PrimitiveTopology::TriangleList);
    assert_eq!(mesh.index_format(), IndexFormat::Uint32);

    let layout = mesh.vertex_layout();
    assert_eq!(layout, VertexLayout::MESH_VERTEX);
    assert_eq!(layout.stride, 32);
    assert_eq!(
        layout.attributes.map(|a| a.offset),
        [0, 12, 24]
    );
    assert_eq!(mesh.vertex_bytes().len(), 32 * mesh.vertex_count());
    assert_eq!(mesh.index_bytes().len(), 4 * mesh.index_count());
}

#[cfg(feature = "hashmap")]
#[test]
fn extruded_glyphs_are_watertight() {
    let run = GlyphRun::from_outlines(vec![square_with_hole(0.0), square_outline(20.0, 0.0, 5.0)]);
    let (mesh, _) = TextMesher::default().mesh_run(&run).unwrap();
    assert_eq!(mesh.open_edge_count(), 0);
}

/// One square per non-space character; `!` fails layout.
struct BlockFont;

impl textrude::glyph_source::GlyphSource for BlockFont {
    type Error = std::fmt::Error;

    fn layout(&self, text: &str) -> Result<GlyphRun, std::fmt::Error> {
        if text.contains('!') {
            return Err(std::fmt::Error);
        }
        let outlines = text
            .chars()
            .enumerate()
            .map(|(i, ch)| {
                if ch == ' ' {
                    Outline::new()
                } else {
                    square_outline(12.0 * i as textrude::float_types::Real, 0.0, 10.0)
                }
            })
            .collect();
        Ok(GlyphRun::from_outlines(outlines))
    }
}

#[test]
fn mesh_text_through_glyph_source() {
    let (mesh, report) = TextMesher::default().mesh_text(&BlockFont, "a b").unwrap();
    assert_eq!(report.glyph_count, 2);
    assert!(!mesh.is_empty());

    assert!(matches!(
        TextMesher::default().mesh_text(&BlockFont, "hi!"),
        Err(textrude::pipeline::MeshTextError::Layout(_))
    ));
}
