//! meshthumb-inplace - like `meshthumb`, but the mesh is only scaled
//!
//! Scaling is about the origin, so the model keeps its position relative to
//! the axis indicators.
//!
//! Usage: meshthumb-inplace input.stl output.png

use meshthumb_core::Normalization;

fn main() {
    meshthumb_render::cli::main_with("meshthumb-inplace", Normalization::ScaleOnly);
}
