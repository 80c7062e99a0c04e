/// Example: Print every part's model transform for one frame
///
/// Usage: cargo run --example pose_dump -- [elapsed-seconds] [command...]
///
/// With an elapsed time the walk cycle is sampled at that time; any further
/// arguments are joined and run as a console command first.

use critter_core::{parse_command, Creature};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut creature = Creature::new()?;

    let elapsed = match args.first() {
        Some(arg) => {
            creature.set_animating(true);
            arg.parse::<f64>()?
        }
        None => 0.0,
    };
    if args.len() > 1 {
        creature.apply(parse_command(&args[1..].join(" "))?);
    }

    let frame = creature.advance_frame(elapsed)?;
    println!("state {:?}, {} parts", frame.state, frame.parts.len());
    for (joint, degrees) in frame.angles.iter() {
        println!("  {:<8} {:>8.3}°", joint, degrees);
    }
    for part in &frame.parts {
        let t = part.transform.translation();
        println!(
            "{:<16} at ({:>7.3}, {:>7.3}, {:>7.3})  {:?}",
            part.name, t.x, t.y, t.z, part.shape
        );
    }
    Ok(())
}
