//! Demo scene: a handful of spinning primitives with runtime draw-mode and
//! overlay toggles.
//!
//! Controls:
//! - `1`..`4` switch every object between wireframe, mesh, solid and render
//! - `N` toggles face-normal overlays, `O` the origin axes, `D` the depth map
//! - `Escape` or closing the window quits

use log::info;
use sdl2::keyboard::Keycode;
use softscene::prelude::*;

const WINDOW_WIDTH: u32 = 800;
const WINDOW_HEIGHT: u32 = 600;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let surface = SdlSurface::new("softscene", WINDOW_WIDTH, WINDOW_HEIGHT)?;
    let mut scene = Scene::new(surface);
    scene.set_background(colors::DKGRAY);

    let cube = scene
        .add_object(
            Shape::Cube {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
            Vec3::new(-1.5, 0.0, 5.0),
        )?;
    let sphere = scene
        .add_object(
            Shape::Sphere {
                radius: 0.7,
                divisions: 12,
            },
            Vec3::new(1.5, 0.0, 5.0),
        )?;
    let cone = scene
        .add_object(
            Shape::Cone {
                radius: 0.4,
                depth: 0.8,
                sides: 16,
            },
            Vec3::ZERO,
        )?;

    // The cone orbits the cube as a child node
    scene
        .add_child(cube, cone, Vec3::new(0.0, 1.2, 0.0))?;

    scene.add_light(
        Light::point(Vec3::new(0.0, 3.0, 2.0))
            .with_color(colors::ORANGE)
            .with_intensity(4.0),
    );

    for id in [cube, sphere] {
        scene.node_mut(id).set_mode(DrawMode::Render);
    }
    scene.node_mut(cone).set_mode(DrawMode::Render);

    let mut spin = WrappedAngle::new(0.0);
    let mut draw_normals = false;
    let mut draw_origin = false;
    let mut draw_depth_map = false;

    info!("entering main loop");
    while scene.update() {
        let dt = scene.sync();

        spin += 0.8 * dt;
        scene.node_mut(cube).set_rotation(spin.get() * 0.5, spin.get(), 0.0);
        scene.node_mut(sphere).set_rotation(0.0, spin.get(), 0.0);

        let pressed: Vec<Keycode> = scene.surface().keys().pressed().to_vec();
        for key in pressed {
            match key {
                Keycode::Num1 => set_all_modes(&mut scene, &[cube, sphere, cone], DrawMode::Wireframe),
                Keycode::Num2 => set_all_modes(&mut scene, &[cube, sphere, cone], DrawMode::Mesh),
                Keycode::Num3 => set_all_modes(&mut scene, &[cube, sphere, cone], DrawMode::Solid),
                Keycode::Num4 => set_all_modes(&mut scene, &[cube, sphere, cone], DrawMode::Render),
                Keycode::N => {
                    draw_normals = !draw_normals;
                    scene.set_draw_normals(draw_normals);
                }
                Keycode::O => {
                    draw_origin = !draw_origin;
                    scene.set_draw_origin(draw_origin);
                }
                Keycode::D => {
                    draw_depth_map = !draw_depth_map;
                    scene.set_draw_depth_map(draw_depth_map);
                }
                _ => {}
            }
        }
    }

    info!("exited at {:.1} Hz", scene.framerate());
    Ok(())
}

fn set_all_modes(scene: &mut Scene<SdlSurface>, ids: &[NodeId], mode: DrawMode) {
    for &id in ids {
        scene.node_mut(id).set_mode(mode);
    }
}
