use std::sync::Arc;

use log::{error, info};

use pathtracer::config::RenderSettings;
use pathtracer::image::Image;
use pathtracer::pool::ThreadPool;
use pathtracer::scene::{reference_scene, Camera, World};
use pathtracer::tile::{partition_tiles, render_tile};
use pathtracer::{bmp, error::RenderError};

fn run(settings: RenderSettings) -> Result<(), RenderError> {
    let pool = match ThreadPool::new(settings.worker_threads) {
        Ok(pool) => pool,
        Err(err) => {
            error!("Pool not created!");
            return Err(RenderError::Pool(err));
        }
    };
    info!("thread pool created with {} threads", settings.worker_threads);

    let (camera, world): (Camera, World) = reference_scene();
    let camera = Arc::new(camera);
    let world = Arc::new(world);
    let image = Arc::new(Image::new(settings.width, settings.height)?);

    let tiles = partition_tiles(settings.width, settings.height, settings.tiles_x, settings.tiles_y);
    let last_index = tiles.len() - 1;

    for (tile_index, &rect) in tiles.iter().enumerate() {
        // The last tile is rendered on the calling thread below instead of
        // submitted, so the driver itself contributes one tile's worth of
        // work rather than sitting idle while it waits on the pool.
        if tile_index == last_index {
            continue;
        }

        let world = Arc::clone(&world);
        let camera = Arc::clone(&camera);
        let image = Arc::clone(&image);
        let samples_per_pixel = settings.samples_per_pixel;
        let seed = settings.seed;

        pool.add_task(move || {
            render_tile(&world, &camera, &image, rect, seed, tile_index as u64, samples_per_pixel);
        });
    }

    render_tile(
        &world,
        &camera,
        &image,
        tiles[last_index],
        settings.seed,
        last_index as u64,
        settings.samples_per_pixel,
    );

    pool.wait_all();
    drop(pool);

    bmp::write_file(&settings.output_path, &image)?;
    info!("wrote {}", settings.output_path.display());

    Ok(())
}

fn main() {
    env_logger::init();

    let settings = RenderSettings::from_env();
    if let Err(err) = run(settings) {
        error!("{err}");
        std::process::exit(1);
    }
}
