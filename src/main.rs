// main.rs
//
// Minimal example: extrude a line of text and write it out as STL.
//
//   textrude [FONT.ttf] [TEXT]
//
// Without a font a hand-drawn "O" (outer ring plus counter) stands in for real glyphs.

use std::fs;
use textrude::{MeshConfig, Outline, TextMesher, float_types::Real, glyph_source::GlyphRun};

fn ring_glyph(cx: Real, cy: Real, r: Real, clockwise: bool) -> Outline {
    // four quadratic arcs through the compass points
    let k = if clockwise { -1.0 } else { 1.0 };
    let mut o = Outline::new();
    o.move_to(cx + r, cy)
        .quad_to(cx + r, cy + k * r, cx, cy + k * r)
        .quad_to(cx - r, cy + k * r, cx - r, cy)
        .quad_to(cx - r, cy - k * r, cx, cy - k * r)
        .quad_to(cx + r, cy - k * r, cx + r, cy)
        .close();
    o
}

fn demo_run() -> GlyphRun {
    let mut o = ring_glyph(0.0, 0.0, 10.0, true);
    o.commands.extend(ring_glyph(0.0, 0.0, 6.0, false).commands);
    GlyphRun::from_outlines(vec![o])
}

fn main() {
    // Ensure the /stl folder exists
    let _ = fs::create_dir_all("stl");

    let args: Vec<String> = std::env::args().collect();
    let mesher = TextMesher::new(MeshConfig::new(4.0));

    #[cfg(feature = "truetype-text")]
    let result = match args.get(1) {
        Some(font_path) => {
            let text = args.get(2).map(String::as_str).unwrap_or("Hello, world!");
            let font_data = match fs::read(font_path) {
                Ok(data) => data,
                Err(e) => {
                    eprintln!("could not read {font_path}: {e}");
                    return;
                },
            };
            let source = match textrude::truetype::TrueTypeGlyphSource::new(&font_data, 72.0) {
                Ok(source) => source,
                Err(e) => {
                    eprintln!("{e}");
                    return;
                },
            };
            mesher.mesh_text(&source, text).map_err(|e| e.to_string())
        },
        None => mesher.mesh_run(&demo_run()).map_err(|e| e.to_string()),
    };

    #[cfg(not(feature = "truetype-text"))]
    let result = {
        let _ = &args;
        mesher.mesh_run(&demo_run()).map_err(|e| e.to_string())
    };

    let (mesh, report) = match result {
        Ok(out) => out,
        Err(e) => {
            eprintln!("{e}");
            return;
        },
    };
    println!(
        "{} vertices, {} triangles, {} of {} glyphs skipped",
        mesh.vertex_count(),
        mesh.triangle_count(),
        report.skipped_count(),
        report.glyph_count
    );

    #[cfg(feature = "stl-io")]
    match mesh.to_stl_binary("text") {
        Ok(bytes) => {
            let _ = fs::write("stl/text.stl", bytes);
        },
        Err(e) => eprintln!("{e}"),
    }
}
