//! Window lifecycle: interactive display or one-shot file export.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use kd_tree::KdTree;
use log::{error, info};
use macroquad::miniquad::window::order_quit;
use macroquad::prelude::*;
use macroquad::texture::{render_target_ex, RenderTargetParams};
use macroquad::window::Conf;
use macroquad::Window;

use crate::export::{prepare_output, write_figure};
use crate::{Figure, KdTreeVisualization, OrbitCamera, Output, RenderOptions, Result, VizError};

/// Outcome of the export step, filled in by the window future.
type ExportStatus = Rc<RefCell<Option<Result<()>>>>;

/// Largest window edge used for interactive display.
const MAX_WINDOW_PIXELS: u32 = 1200;

/// Size of the (unused) window that hosts the GL context during export.
const EXPORT_WINDOW_PIXELS: i32 = 320;

/// Background of the interactive window.
const DISPLAY_BACKGROUND: Color = Color::new(0.97, 0.97, 0.97, 1.0);

/// Renders `tree` with `style` according to `options`.
///
/// Everything that can fail (tree validation, option ranges, the output
/// directory) is checked before a window is opened. With a filename the
/// figure is drawn once offscreen, cropped and written as PNG, and the window
/// closes without waiting for input; a failed write is returned as an error. Without one, an interactive window is
/// shown until it is closed or Escape is pressed.
pub fn visualize(tree: &KdTree, style: &KdTreeVisualization, options: &RenderOptions) -> Result<()> {
    let (width, height) = options.figure_pixels()?;
    let figure = Figure::build(tree, style, options)?;
    let camera = OrbitCamera::framing(
        figure.bounds(),
        options.camera_elevation,
        options.camera_rotation,
    );

    match options.output() {
        Output::File(path) => {
            let path = prepare_output(path)?;
            info!(
                "exporting {} nodes to {} ({}x{})",
                tree.node_count(),
                path.display(),
                width,
                height
            );
            let status = ExportStatus::default();
            Window::from_config(
                export_conf(),
                export_figure(figure, camera, width, height, path, Rc::clone(&status)),
            );
            let outcome = status.borrow_mut().take();
            return outcome.unwrap_or(Err(VizError::ExportInterrupted));
        }
        Output::Display => {
            info!("displaying {} nodes", tree.node_count());
            Window::from_config(
                display_conf(width, height),
                show_figure(figure, camera),
            );
        }
    }

    Ok(())
}

impl KdTreeVisualization {
    /// Renders `tree` with this style. See [`visualize`].
    pub fn visualize(&self, tree: &KdTree, options: &RenderOptions) -> Result<()> {
        visualize(tree, self, options)
    }
}

fn display_conf(width: u32, height: u32) -> Conf {
    // Keep the aspect ratio while fitting on a screen
    let scale = (MAX_WINDOW_PIXELS as f32 / width.max(height) as f32).min(1.0);
    Conf {
        window_title: "KD-tree".to_owned(),
        window_width: (width as f32 * scale).round() as i32,
        window_height: (height as f32 * scale).round() as i32,
        sample_count: 4,
        ..Default::default()
    }
}

fn export_conf() -> Conf {
    Conf {
        window_title: "KD-tree export".to_owned(),
        window_width: EXPORT_WINDOW_PIXELS,
        window_height: EXPORT_WINDOW_PIXELS,
        ..Default::default()
    }
}

async fn show_figure(figure: Figure, mut camera: OrbitCamera) {
    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        camera.update();

        clear_background(DISPLAY_BACKGROUND);
        set_camera(&camera.to_camera3d());

        figure.draw();

        set_default_camera();

        draw_text(
            &format!("KD-tree: {} planes", figure.nodes().len()),
            10.0,
            25.0,
            20.0,
            DARKGRAY,
        );
        draw_text(
            "Drag mouse to rotate, scroll to zoom, Esc to close",
            10.0,
            45.0,
            16.0,
            GRAY,
        );

        next_frame().await
    }
}

async fn export_figure(
    figure: Figure,
    camera: OrbitCamera,
    width: u32,
    height: u32,
    path: PathBuf,
    status: ExportStatus,
) {
    let target = render_target_ex(
        width,
        height,
        RenderTargetParams {
            sample_count: 1,
            depth: true,
        },
    );

    let camera = Camera3D {
        render_target: Some(target.clone()),
        aspect: Some(width as f32 / height as f32),
        ..camera.to_camera3d()
    };

    set_camera(&camera);
    clear_background(Color::new(0.0, 0.0, 0.0, 0.0));
    figure.draw();
    set_default_camera();

    // Flush the offscreen pass before reading it back
    next_frame().await;

    let outcome = write_figure(&target.texture.get_texture_data(), &path);
    match &outcome {
        Ok((w, h)) => info!("wrote {} ({}x{})", path.display(), w, h),
        Err(e) => error!("export to {} failed: {}", path.display(), e),
    }
    *status.borrow_mut() = Some(outcome.map(|_| ()));

    order_quit();
}
