//! Renders a KD-tree into an image file.
//!
//! Usage: `export <output.png> [tree-file] [elevation] [rotation]`
//!
//! The tree file uses the heap layout read by `kd_tree::parse_heap_layout`.
//! Without one, the built-in demo tree is drawn.

use std::path::PathBuf;

use kd_tree::KdTree;
use kd_viz::{demo_tree, KdTreeVisualization, RenderOptions};
use log::{error, info};

const USAGE: &str = "usage: export <output.png> [tree-file] [elevation] [rotation]";

fn parse_angle(arg: Option<&String>, default: f32, name: &str) -> Result<f32, String> {
    match arg {
        Some(s) => s
            .parse()
            .map_err(|e| format!("invalid {} '{}': {}", name, s, e)),
        None => Ok(default),
    }
}

fn load_tree(path: Option<&String>) -> Result<KdTree, String> {
    let Some(path) = path.filter(|p| p.as_str() != "-") else {
        return Ok(demo_tree());
    };
    let text = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
    text.parse::<KdTree>().map_err(|e| format!("{}: {}", path, e))
}

fn run(args: &[String]) -> Result<(), String> {
    let output = args.first().ok_or_else(|| USAGE.to_owned())?;
    let tree = load_tree(args.get(1))?;

    let defaults = RenderOptions::default();
    let elevation = parse_angle(args.get(2), defaults.camera_elevation, "elevation")?;
    let rotation = parse_angle(args.get(3), defaults.camera_rotation, "rotation")?;

    info!("Loaded tree: {} nodes, depth {}", tree.node_count(), tree.depth());
    info!("\n{}", tree);

    let options = defaults
        .with_filename(PathBuf::from(output))
        .with_camera(elevation, rotation);

    KdTreeVisualization::new()
        .visualize(&tree, &options)
        .map_err(|e| e.to_string())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        error!("{}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
