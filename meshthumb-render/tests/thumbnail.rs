use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use meshthumb_core::{stl, Mesh, Triangle};
use meshthumb_render::crop::content_bounds;
use nalgebra::Point3;

fn meshthumb(args: &[&PathBuf]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_meshthumb"))
        .args(args)
        .output()
        .expect("spawn meshthumb")
}

fn write_stl(path: &Path, mesh: &Mesh) {
    fs::write(path, stl::to_binary_stl(mesh)).expect("write stl");
}

#[test]
fn cube_thumbnail_is_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("cube.stl");
    write_stl(&input, &Mesh::cube(2.0));

    let first = dir.path().join("first.png");
    let second = dir.path().join("second.png");
    for output in [&first, &second] {
        let result = meshthumb(&[&input, output]);
        assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));
        let stdout = String::from_utf8_lossy(&result.stdout);
        assert!(stdout.contains("6 / 12"), "{stdout}");
    }

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());

    let image = image::open(&first).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (1024, 1024));
    assert_eq!(image.get_pixel(512, 512)[3], 255);
    assert_eq!(image.get_pixel(0, 0)[3], 0);
    assert_eq!(image.get_pixel(1023, 1023)[3], 0);

    let bounds = content_bounds(&image).unwrap();
    assert!(bounds.width() > 512 && bounds.width() < 1024, "{bounds:?}");
    assert!(bounds.height() > 512 && bounds.height() < 1024, "{bounds:?}");
}

#[test]
fn flat_2d_shape_is_cropped_without_axes() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("2d_square.stl");
    let p = |x: f32, y: f32| Point3::new(x, y, 0.0);
    let square = Mesh::from_triangles(vec![
        Triangle::from_points(p(0.5, 0.5), p(1.5, 0.5), p(1.5, 1.5)),
        Triangle::from_points(p(0.5, 0.5), p(1.5, 1.5), p(0.5, 1.5)),
    ]);
    write_stl(&input, &square);
    let output = dir.path().join("square.png");

    let result = Command::new(env!("CARGO_BIN_EXE_meshthumb-inplace"))
        .args([&input, &output])
        .output()
        .unwrap();
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));

    let image = image::open(&output).unwrap().to_rgba8();
    // scaled to [1/3, 1] without moving: a third of the 4-unit view wide
    let (width, height) = image.dimensions();
    assert!((170..=180).contains(&width), "{width}x{height}");
    assert_eq!(width, height);

    // only the model color is present; the axes were not drawn
    let opaque = image.pixels().filter(|p| p[3] == 255);
    assert!(opaque.clone().count() > 0);
    assert!(opaque.clone().all(|p| p[2] > p[0] && p[2] > p[1]));
}

#[test]
fn wrong_argument_count_prints_usage() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("cube.stl");
    write_stl(&input, &Mesh::cube(2.0));
    let output = dir.path().join("out.png");
    let extra = dir.path().join("extra");

    let cases: [&[&PathBuf]; 3] = [&[], &[&input], &[&input, &output, &extra]];
    for args in cases {
        let result = meshthumb(args);
        assert!(!result.status.success());
        assert!(String::from_utf8_lossy(&result.stderr).contains("Usage"));
        assert!(!output.exists());
    }
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("missing.stl");
    let output = dir.path().join("out.png");

    let result = meshthumb(&[&input, &output]);
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("missing.stl"));
    assert!(!output.exists());
}
