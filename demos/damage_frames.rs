use cellstage::{Canvas, Rect};

// Draws a few frames and prints only the area each frame damaged.
// Run with `RUST_LOG=trace` to see every merge.

fn main() -> cellstage::Result<()> {
    env_logger::init();

    let mut canvas = Canvas::new(32, 8)?;
    canvas.clear_canvas();
    present(&mut canvas, 0);

    canvas.fill_box(Rect::new(-2, -1, 8, 4), '#');
    present(&mut canvas, 1);

    for (frame, x) in (2..).zip([10, 14, 18]) {
        canvas.put_str(x, 5, "<o>");
        present(&mut canvas, frame);
    }

    canvas.disable_dirty_tracking();
    canvas.put_str(0, 7, "drawn without tracking");
    canvas.enable_dirty_tracking()?;
    canvas.add_dirty_rect(Rect::new(0, 7, 22, 1))?;
    present(&mut canvas, 5);

    canvas.set_size(24, 6)?;
    present(&mut canvas, 6);
    Ok(())
}

fn present(canvas: &mut Canvas, frame: u32) {
    let Some(region) = canvas.take_damage() else {
        println!("frame {frame}: nothing to redraw");
        return;
    };

    println!(
        "frame {frame}: redraw {}x{} at ({}, {})",
        region.width, region.height, region.x, region.y
    );
    for y in region.y..region.y + region.height {
        let Some(row) = canvas.row(y) else {
            continue;
        };
        let start = region.x as usize;
        let end = start + region.width as usize;
        let line: String = row[start..end].iter().map(|cell| cell.ch).collect();
        println!("  {y:>3} |{line}|");
    }
}
