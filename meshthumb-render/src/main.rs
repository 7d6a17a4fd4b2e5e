//! meshthumb - render an STL file into a PNG thumbnail
//!
//! The mesh is centered on the origin and fitted to the bi-unit cube.
//!
//! Usage: meshthumb input.stl output.png

use meshthumb_core::Normalization;

fn main() {
    meshthumb_render::cli::main_with("meshthumb", Normalization::CenterAndFit);
}
