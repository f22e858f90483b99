//! Fleet batch demo
//!
//! Builds a fleet of ships, each with an engine flame and a shield drawn behind
//! it, keeps them in one sprite batch and simulates a few hundred frames of
//! movement, reordering, losses and reinforcements. Every frame is submitted to
//! a recording renderer and checked against the tree.
//!
//! Usage: `fleet_batch [config.toml|config.ron]`

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sprite_batch::config::Config;
use sprite_batch::prelude::*;

const FRAME_TIME: f32 = 1.0 / 60.0;
const FRAMES: usize = 300;
const INITIAL_SHIPS: usize = 24;

/// Ship plus the sprites riding on it
#[derive(Debug, Clone, Copy)]
struct Ship {
    hull: SpriteId,
    flame: SpriteId,
    velocity: Vec2,
}

struct FleetDemo {
    tree: SpriteTree,
    batch: BatchNode,
    renderer: RecordingRenderer,
    ships: Vec<Ship>,
    rng: StdRng,
    quads_drawn: usize,
}

impl FleetDemo {
    fn new(config: BatchConfig) -> Result<Self, BatchError> {
        log::info!("Creating fleet batch demo...");
        let mut tree = SpriteTree::new();
        let texture = Texture::new(TextureId(1), 512, 512);
        let batch = BatchNode::with_config(&mut tree, texture, config)?;

        Ok(Self {
            tree,
            batch,
            renderer: RecordingRenderer::new(),
            ships: Vec::new(),
            rng: StdRng::seed_from_u64(0x5eed),
            quads_drawn: 0,
        })
    }

    fn initialize(&mut self) -> Result<(), BatchError> {
        log::info!("Spawning {} ships...", INITIAL_SHIPS);
        for _ in 0..INITIAL_SHIPS {
            self.spawn_ship()?;
        }
        log::info!(
            "Fleet ready: {} quads, atlas capacity {}",
            self.batch.count(),
            self.batch.capacity()
        );
        Ok(())
    }

    fn spawn_ship(&mut self) -> Result<(), BatchError> {
        let position = Vec2::new(self.rng.gen_range(0.0..800.0), self.rng.gen_range(0.0..600.0));
        let velocity = Vec2::new(self.rng.gen_range(-60.0..60.0), self.rng.gen_range(-60.0..60.0));

        let hull = self.tree.create(
            self.batch
                .create_sprite(Rect::new(0.0, 0.0, 32.0, 32.0))
                .with_position(position),
        );
        let flame_frames = FrameAnimation::from_grid(Vec2::new(16.0, 16.0), 4, 8, 4, 0.08);
        let flame = self.tree.create(
            self.batch
                .create_sprite(Rect::new(0.0, 32.0, 16.0, 16.0))
                .with_position(position - Vec2::new(0.0, 20.0))
                .with_animation(flame_frames),
        );
        let shield = self.tree.create(
            self.batch
                .create_sprite(Rect::new(32.0, 0.0, 48.0, 48.0))
                .with_position(position)
                .with_color([120, 180, 255, 128]),
        );

        let z = self.rng.gen_range(0..8);
        self.batch.add_child(&mut self.tree, hull, z)?;
        self.batch.add_child_to(&mut self.tree, hull, flame, 1)?;
        self.batch.add_child_to(&mut self.tree, hull, shield, -1)?;

        self.ships.push(Ship { hull, flame, velocity });
        Ok(())
    }

    fn update(&mut self, frame: usize) -> Result<(), BatchError> {
        for ship in &self.ships {
            let delta = ship.velocity * FRAME_TIME;
            for id in self.tree.subtree(ship.hull) {
                if let Some(sprite) = self.tree.content_as_mut::<Sprite>(id) {
                    sprite.move_by(delta);
                }
            }
            if let Some(flame) = self.tree.content_as_mut::<Sprite>(ship.flame) {
                flame.update(FRAME_TIME);
            }
        }

        // Every so often a ship is lost, another changes formation depth,
        // and reinforcements arrive
        if frame % 40 == 39 && !self.ships.is_empty() {
            let index = self.rng.gen_range(0..self.ships.len());
            let lost = self.ships.swap_remove(index);
            self.batch.remove_child(&mut self.tree, lost.hull, true)?;
            self.tree.destroy(lost.hull)?;
            log::debug!("Ship {:?} lost at frame {}", lost.hull, frame);
        }
        if frame % 25 == 0 && !self.ships.is_empty() {
            let index = self.rng.gen_range(0..self.ships.len());
            let z = self.rng.gen_range(0..8);
            self.batch.reorder_child(&mut self.tree, self.ships[index].hull, z)?;
        }
        if frame % 60 == 30 {
            self.spawn_ship()?;
            self.spawn_ship()?;
        }
        Ok(())
    }

    fn render(&mut self) -> Result<(), BatchError> {
        self.quads_drawn += self.batch.draw(&mut self.tree, &mut self.renderer)?;
        Ok(())
    }

    fn run(&mut self) -> Result<(), BatchError> {
        log::info!("Running {} frames...", FRAMES);
        for frame in 0..FRAMES {
            self.update(frame)?;
            self.render()?;
            self.batch.verify(&self.tree)?;
        }

        log::info!(
            "Finished: {} ships, {} quads in atlas (capacity {}), {} draw calls, {} quads drawn",
            self.ships.len(),
            self.batch.count(),
            self.batch.capacity(),
            self.renderer.calls().len(),
            self.quads_drawn
        );
        if let Some(call) = self.renderer.last_call() {
            log::info!(
                "Last draw call: texture {:?}, blend {:?}, {} bytes of vertex data",
                call.texture,
                call.blend,
                call.quads.len() * Quad::BYTES
            );
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting sprite batch fleet demo");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading batch config from {}", path);
            BatchConfig::load_from_file(&path)?
        }
        None => BatchConfig::default(),
    };

    let mut demo = FleetDemo::new(config)?;
    demo.initialize()?;
    demo.run()?;

    log::info!("Demo completed successfully");
    Ok(())
}
