use nav_grid::{Circle, NavGrid, NavGridConfig, Polygon, Shape, Vec2};

// Rasterizes a few obstacles at half-unit resolution and plans around them, then clears the grid
// and plans again.
fn main() {
    env_logger::init();
    let config = NavGridConfig::default().with_resolution(0.5);
    let mut grid = NavGrid::with_config(20.0, 12.0, config).unwrap();
    let obstacles: Vec<Box<dyn Shape>> = vec![
        Box::new(Circle::new(Vec2::new(-3.0, 1.0), 2.5)),
        Box::new(Polygon::new(vec![
            Vec2::new(2.0, -6.0),
            Vec2::new(5.0, 4.0),
            Vec2::new(7.0, -6.0),
        ])),
    ];
    let blocked = grid.mark_obstacles(obstacles);
    println!("{} cells blocked", blocked);

    let start = Vec2::new(-9.0, 0.0);
    let end = Vec2::new(9.25, -1.75);
    let route = grid.search(start, end).unwrap();
    for p in &route.waypoints {
        println!("{} -> cell {}", p, grid.closest_cell(*p));
    }
    println!(
        "reached: {}, length: {:.2}, expanded: {}",
        route.reached,
        route.length(),
        route.expanded
    );

    grid.clear();
    let open = grid.search(start, end).unwrap();
    println!("after clearing, length: {:.2}", open.length());
}
