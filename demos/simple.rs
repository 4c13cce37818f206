use nav_grid::{NavGrid, Rect, Vec2};

// In this example a path is found on a 10x10 world with a wall that has one opening:
// ..........
// ..........
// .....#....
// .....#....
// .....#....
// .....#....
// .S...#..E.
// .....#....
// ..........
// ..........
fn main() {
    env_logger::init();
    let mut grid = NavGrid::new(10.0, 10.0).unwrap();
    grid.mark_obstacle(&Rect::new(-0.5, 0.5, 3.5, -2.5));
    let start = Vec2::new(-4.0, -1.0);
    let end = Vec2::new(3.0, -1.0);
    print!("{}", grid);
    let route = grid.search(start, end).unwrap();
    if route.reached {
        println!("A path has been found:");
        for p in route.waypoints {
            println!("{}", p);
        }
    } else {
        println!("{} cannot be reached from {}", end, start);
    }
}
