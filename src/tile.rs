//! Splits an image into a grid of tiles and renders each tile independently:
//! camera projection into film space, jittered multisampling, sRGB encode,
//! and a write into the shared `Image`.

use itertools::iproduct;

use crate::image::{pack_bgra, srgb_encode, Image, Pixel, Rect};
use crate::random::{derive_seed, Prng};
use crate::scene::{Camera, World};
use crate::shading::cast_ray;
use crate::vecmath::{Mat4, Vec3};

/// Partitions `width x height` into a `tiles_x` by `tiles_y` grid of
/// equal-sized rects, row-major (tile index `tiles_x * row + column`).
/// Requires `width % tiles_x == 0` and `height % tiles_y == 0`.
pub fn partition_tiles(width: u32, height: u32, tiles_x: u32, tiles_y: u32) -> Vec<Rect> {
    assert_eq!(width % tiles_x, 0, "image width must divide evenly into tiles_x columns");
    assert_eq!(height % tiles_y, 0, "image height must divide evenly into tiles_y rows");

    let tile_width = width / tiles_x;
    let tile_height = height / tiles_y;

    let mut tiles = Vec::with_capacity((tiles_x * tiles_y) as usize);
    for row in 0..tiles_y {
        for column in 0..tiles_x {
            tiles.push(Rect {
                x0: column * tile_width,
                y0: row * tile_height,
                x1: (column + 1) * tile_width,
                y1: (row + 1) * tile_height,
            });
        }
    }
    tiles
}

/// Renders one tile's pixels into `image`, seeding its PRNG deterministically
/// from `(seed, tile_index)` so that two renders with the same seed produce
/// identical output regardless of which worker happens to pick up which tile.
pub fn render_tile(
    world: &World,
    camera: &Camera,
    image: &Image,
    rect: Rect,
    seed: u64,
    tile_index: u64,
    samples_per_pixel: u32,
) {
    let mut rng = Prng::new(derive_seed(seed, tile_index));

    let view = Mat4::look_at(camera.position, camera.target, Vec3::UNIT_Z);
    let inverse_view = view.inverse_view();

    let width = image.width() as f32;
    let height = image.height() as f32;
    let aspect_ratio = width / height;
    let scale_y = (0.5 * camera.field_of_view).tan();
    let scale_x = aspect_ratio * scale_y;

    let half_pixel_width = scale_x * 0.5 / width;
    let half_pixel_height = scale_y * 0.5 / height;

    let contribution = 1.0 / samples_per_pixel as f32;

    for (y, x) in iproduct!(rect.y0..rect.y1, rect.x0..rect.x1) {
        let film_y = (2.0 * ((y as f32 + 0.5) / height) - 1.0) * scale_y;
        let film_x = (2.0 * ((x as f32 + 0.5) / width) - 1.0) * scale_x;
        let film_point = Vec3::new(film_x, film_y, -1.0);
        let mut color = Vec3::ZERO;

        for _ in 0..samples_per_pixel {
            let jitter = Vec3::new(
                rng.ranged_f32(-half_pixel_width, half_pixel_width),
                rng.ranged_f32(-half_pixel_height, half_pixel_height),
                0.0,
            );
            let jittered_point = film_point + jitter;
            let ray_point = inverse_view.transform_point(jittered_point);

            let origin = camera.position;
            let direction = (ray_point - origin).normalize();

            let sample = cast_ray(world, origin, direction, &mut rng);
            color = color + sample * contribution;
        }

        let (r, g, b) = srgb_encode(Pixel { r: color.x, g: color.y, b: color.z });
        image.write_pixel(x, y, pack_bgra(r, g, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{single_sphere_scene, sky_only_scene};

    #[test]
    fn partition_tiles_covers_the_image_without_overlap() {
        let tiles = partition_tiles(16, 16, 4, 4);
        assert_eq!(tiles.len(), 16);

        let mut covered = vec![false; 16 * 16];
        for tile in &tiles {
            for y in tile.y0..tile.y1 {
                for x in tile.x0..tile.x1 {
                    let index = (y * 16 + x) as usize;
                    assert!(!covered[index], "pixel ({x},{y}) covered by more than one tile");
                    covered[index] = true;
                }
            }
        }
        assert!(covered.iter().all(|&hit| hit), "some pixel was not covered by any tile");
    }

    #[test]
    fn render_tile_with_sky_only_scene_fills_every_pixel_with_the_sky_colour() {
        let (camera, world) = sky_only_scene(Vec3::new(0.3, 0.4, 0.5));
        let image = Image::new(16, 16).unwrap();
        let rect = Rect { x0: 0, y0: 0, x1: 16, y1: 16 };

        render_tile(&world, &camera, &image, rect, 42, 0, 4);

        let (expected_r, expected_g, expected_b) =
            srgb_encode(Pixel { r: 0.3, g: 0.4, b: 0.5 });
        let expected = pack_bgra(expected_r, expected_g, expected_b);

        for &pixel in image.as_slice() {
            assert_eq!(pixel, expected);
        }
    }

    #[test]
    fn direct_hit_on_reflective_sphere_matches_expected_value() {
        // Camera at (0,-5,1) looking at the origin, fov = pi/4, one unit
        // sphere at (0,0,1) with purely reflective material (0.5,0.5,0.5)
        // over a sky of (0.3,0.4,0.5). A single-pixel image puts the centre
        // pixel's ray straight down the camera's look direction, through the
        // sphere. Expected value: srgb(0.5 * sky) within 1/255 per channel.
        let (camera, world) = single_sphere_scene();
        let image = Image::new(1, 1).unwrap();
        let rect = Rect { x0: 0, y0: 0, x1: 1, y1: 1 };

        render_tile(&world, &camera, &image, rect, 1, 0, 4);

        let expected_linear = Pixel { r: 0.5 * 0.3, g: 0.5 * 0.4, b: 0.5 * 0.5 };
        let (expected_r, expected_g, expected_b) = srgb_encode(expected_linear);

        let packed = image.as_slice()[0];
        let bytes = packed.to_le_bytes();
        let (actual_b, actual_g, actual_r) = (bytes[0], bytes[1], bytes[2]);

        let within_tolerance = |a: u8, b: u8| (a as i16 - b as i16).abs() <= 1;
        assert!(within_tolerance(actual_r, expected_r), "red {actual_r} vs {expected_r}");
        assert!(within_tolerance(actual_g, expected_g), "green {actual_g} vs {expected_g}");
        assert!(within_tolerance(actual_b, expected_b), "blue {actual_b} vs {expected_b}");
    }

    #[test]
    fn same_seed_and_tile_index_produce_identical_renders() {
        let (camera, world) = sky_only_scene(Vec3::new(0.3, 0.4, 0.5));

        let image_a = Image::new(8, 8).unwrap();
        render_tile(&world, &camera, &image_a, Rect { x0: 0, y0: 0, x1: 8, y1: 8 }, 7, 3, 4);

        let image_b = Image::new(8, 8).unwrap();
        render_tile(&world, &camera, &image_b, Rect { x0: 0, y0: 0, x1: 8, y1: 8 }, 7, 3, 4);

        assert_eq!(image_a.as_slice(), image_b.as_slice());
    }
}
