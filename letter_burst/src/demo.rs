//! Headless walk-through of the mouth → letter pipeline.
//!
//! Scripts a few mouth gestures against a seeded generator and prints what
//! the tracker and the letter system do on each frame.  No window needed.

use glam::Vec2;
use rand::{rngs::StdRng, SeedableRng};

use letter_burst::{LetterSystem, RecordingCanvas};
use mouth_tracker::{Face, MouthTracker, MOUTH_OPEN_THRESHOLD};

const FRAME_MS: f64 = 1000.0 / 60.0;
const MOUTH:    Vec2 = Vec2::new(320.0, 300.0);

fn face(gap: f32) -> Face {
    let half = Vec2::new(0.0, gap / 2.0);
    Face::with_lips(MOUTH - half, MOUTH + half)
}

fn main() {
    println!("\n=== Letter Burst Demo ===\n");
    println!("   open threshold: {} px\n", MOUTH_OPEN_THRESHOLD);

    let mut rng = StdRng::seed_from_u64(2024);

    // ── 1. Edge detection on a short gap sequence ─────────────────────────
    println!("1. Gap sequence [5, 5, 20, 20, 20, 5]");
    let mut tracker = MouthTracker::new();
    let mut letters = LetterSystem::default();
    for (i, gap) in [5.0, 5.0, 20.0, 20.0, 20.0, 5.0].into_iter().enumerate() {
        let now = i as f64 * FRAME_MS;
        let m = tracker.update(Some(&face(gap)), now);
        let rep = letters.update(m.as_ref(), now, &mut rng);
        let m = m.expect("scripted face always has lips");
        println!(
            "   frame {}  gap={:>4.1}  open={:<5}  opened={:<5}  closed={:<5}  live={}",
            i, gap, m.is_open, m.opened, m.closed, letters.len()
        );
        if let Some(id) = rep.spawned {
            let l = letters.get(id).expect("just spawned");
            println!("            spawned '{}' vel=({:.2}, {:.2})", l.glyph, l.velocity.x, l.velocity.y);
        }
        if let Some(id) = rep.released {
            let l = letters.get(id).expect("just released");
            println!("            released '{}' vel=({:.2}, {:.2})", l.glyph, l.velocity.x, l.velocity.y);
        }
    }
    println!();

    // ── 2. Growth while held open ─────────────────────────────────────────
    println!("2. Hold the mouth open for one second");
    let mut tracker = MouthTracker::new();
    let mut letters = LetterSystem::default();
    for &t in &[0.0, 250.0, 500.0, 750.0, 1000.0] {
        let m = tracker.update(Some(&face(30.0)), t);
        letters.update(m.as_ref(), t, &mut rng);
        if let Some(l) = letters.current() {
            println!("   t={:>5.0} ms  '{}' size={:.1}", t, l.glyph, l.size);
        }
    }
    println!();

    // ── 3. Tracking dropout ───────────────────────────────────────────────
    println!("3. Face lost for three frames while open");
    let before = tracker.status();
    for i in 0..3 {
        let m = tracker.update(None, 1000.0 + i as f64 * FRAME_MS);
        letters.update(m.as_ref(), 1000.0, &mut rng);
    }
    println!("   status unchanged: {}", tracker.status() == before);
    println!("   still growing:    {}", letters.current().is_some());
    println!();

    // ── 4. Release and fade ───────────────────────────────────────────────
    println!("4. Close and watch it fall");
    let m = tracker.update(Some(&face(2.0)), 1100.0);
    letters.update(m.as_ref(), 1100.0, &mut rng);
    let mut canvas = RecordingCanvas::default();
    let mut frame = 0;
    while !letters.is_empty() {
        frame += 1;
        letters.update(None, 1100.0 + frame as f64 * FRAME_MS, &mut rng);
        if frame % 10 == 0 {
            canvas.clear();
            letters.draw(&mut canvas);
            if let Some(d) = canvas.draws.first() {
                println!(
                    "   frame {:>3}  '{}' at ({:>6.1}, {:>6.1})  alpha={}",
                    frame, d.glyph, d.center.x, d.center.y, d.style.fill.a
                );
            }
        }
    }
    println!("   gone after {} frames\n", frame);
}
