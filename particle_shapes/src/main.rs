//! Interactive menu for exploring the built-in particle shapes.
//! Prints bounds, centroid and a sample of points for any shape.

use particle_shapes::{Point3, ShapeLibrary};
use rand::{rngs::StdRng, SeedableRng};
use std::io::{self, Write};

fn main() {
    println!();
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║            Particle Shape Explorer                   ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let library = ShapeLibrary::with_builtins();
    let names = library.names();

    loop {
        print_menu(&names);
        let choice = read_line(&format!("Select a shape (1-{}, name, or q to quit): ", names.len()));
        let choice = choice.trim();

        if choice.eq_ignore_ascii_case("q") {
            println!("\nGoodbye!\n");
            break;
        }

        let name = match choice.parse::<usize>() {
            Ok(i) if i >= 1 && i <= names.len() => names[i - 1],
            _ if library.contains(choice) => choice,
            _ => { println!("  ⚠  Please enter 1-{}, a shape name, or q.\n", names.len()); continue; }
        };

        let count: usize = read_line("  How many points? (default 5000): ")
            .trim().parse().unwrap_or(5000);
        let count = count.max(1).min(200_000);

        let seed: u64 = read_line("  Seed (default 0): ")
            .trim().parse().unwrap_or(0);

        let mut rng = StdRng::seed_from_u64(seed);
        let points = match library.generate(name, count, &mut rng) {
            Ok(p) => p,
            Err(e) => { println!("  ⚠  {}\n", e); continue; }
        };

        let (lo, hi) = bounds(&points);
        let centroid = points.iter().fold(Point3::ZERO, |acc, &p| acc + p) * (1.0 / count as f32);
        let max_radius = points.iter().map(|p| p.length()).fold(0.0_f32, f32::max);

        println!();
        println!("  ┌─ {} ({} points, seed {}) ─", name, count, seed);
        println!("  │  Bounds   : x [{:+.3}, {:+.3}]  y [{:+.3}, {:+.3}]  z [{:+.3}, {:+.3}]",
            lo.x, hi.x, lo.y, hi.y, lo.z, hi.z);
        println!("  │  Centroid : ({:+.3}, {:+.3}, {:+.3})", centroid.x, centroid.y, centroid.z);
        println!("  │  Radius   : {:.3}", max_radius);
        println!("  │");
        println!("  │  First points:");
        for p in points.iter().take(8) {
            println!("  │    ({:+.4}, {:+.4}, {:+.4})", p.x, p.y, p.z);
        }
        println!("  └─");
        println!();
    }
}

fn bounds(points: &[Point3]) -> (Point3, Point3) {
    points.iter().fold(
        (Point3::new(f32::MAX, f32::MAX, f32::MAX), Point3::new(f32::MIN, f32::MIN, f32::MIN)),
        |(lo, hi), p| (
            Point3::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
            Point3::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
        ),
    )
}

fn print_menu(names: &[&str]) {
    println!("  ┌──────────────────────────────────────────────────────┐");
    for (i, name) in names.iter().enumerate() {
        println!("  │  {:2}. {:47} │", i + 1, name);
    }
    println!("  └──────────────────────────────────────────────────────┘");
    println!();
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
