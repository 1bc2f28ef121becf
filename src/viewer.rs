use image::{Rgb, RgbImage};
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use crate::error::Result;
use crate::options::WorldOptions;
use crate::render;
use crate::seeds::WorldSeeds;
use crate::world::World;

/// Largest initial window edge in pixels
const TARGET_SIZE: f64 = 900.0;

/// Run the interactive world viewer.
/// Press R to regenerate, Escape to exit. The window can be resized freely.
pub fn run_viewer(mut world: World, options: &WorldOptions) -> Result<()> {
    let fit = TARGET_SIZE / world.width.max(world.height);
    let mut window_width = ((world.width * fit).round() as usize).max(1);
    let mut window_height = ((world.height * fit).round() as usize).max(1);

    let mut window = Window::new(
        "Landmass Generator - R: Regenerate, Esc: Exit",
        window_width,
        window_height,
        WindowOptions {
            resize: true,
            scale: minifb::Scale::X1,
            ..WindowOptions::default()
        },
    )?;

    // Limit to ~60fps
    window.set_target_fps(60);

    let mut buffer = render_view(&world, window_width, window_height);

    println!("Viewer started. Controls:");
    println!("  R: Regenerate");
    println!("  Esc: Exit");

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let mut needs_redraw = false;

        if window.is_key_pressed(Key::R, KeyRepeat::No) {
            let seeds = WorldSeeds::random();
            println!("Regenerating with seed: {}", seeds.master);
            world.populate_with_seeds(options, seeds)?;
            print_summary(&world);
            needs_redraw = true;
        }

        // Refit the world frame whenever the window changes shape
        let (w, h) = window.get_size();
        if (w, h) != (window_width, window_height) && w > 0 && h > 0 {
            window_width = w;
            window_height = h;
            needs_redraw = true;
        }

        if needs_redraw {
            buffer = render_view(&world, window_width, window_height);
        }

        window.update_with_buffer(&buffer, window_width, window_height)?;
    }

    Ok(())
}

fn print_summary(world: &World) {
    let stats = world.stats();
    println!(
        "  {} rivers, {} mountain ranges ({} peaks), {} forests ({} trees)",
        stats.rivers, stats.ranges, stats.peaks, stats.forests, stats.trees
    );
}

/// Render the world into a packed `0RGB` buffer with a seed overlay
fn render_view(world: &World, width: usize, height: usize) -> Vec<u32> {
    let mut img = render::render_world(world, width as u32, height as u32);
    draw_overlay(&mut img, world);
    pack_buffer(&img)
}

fn draw_overlay(img: &mut RgbImage, world: &World) {
    let text = format!("Seed: {}", world.seeds().master);
    render::draw_label(img, &text, 8, 8, Rgb([240, 240, 240]));
}

fn pack_buffer(img: &RgbImage) -> Vec<u32> {
    img.pixels()
        .map(|pixel| {
            let r = pixel[0] as u32;
            let g = pixel[1] as u32;
            let b = pixel[2] as u32;
            (r << 16) | (g << 8) | b
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_buffer_layout() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([0x12, 0x34, 0x56]));
        img.put_pixel(1, 0, Rgb([0xFF, 0x00, 0x01]));
        assert_eq!(pack_buffer(&img), vec![0x123456, 0xFF0001]);
    }

    #[test]
    fn test_render_view_matches_window_size() {
        let mut world = World::new(1000.0, 1000.0);
        world
            .populate_with_seeds(&WorldOptions::with_counts(1, 1, 1), WorldSeeds::from_master(3))
            .unwrap();
        let buffer = render_view(&world, 300, 200);
        assert_eq!(buffer.len(), 300 * 200);
    }
}
