use kd_viz::{demo_tree, KdTreeVisualization, RenderOptions};
use log::{error, info};

fn main() {
    env_logger::init();

    let tree = demo_tree();
    info!("Showing demo tree: {} nodes, depth {}", tree.node_count(), tree.depth());
    info!("\n{}", tree);

    if let Err(e) = KdTreeVisualization::new().visualize(&tree, &RenderOptions::default()) {
        error!("{}", e);
        std::process::exit(1);
    }
}
