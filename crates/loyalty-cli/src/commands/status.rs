use crate::common::{self, CliResult};

pub fn run(json: bool) -> CliResult {
    let engine = common::open_engine()?;
    let snap = engine.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&snap)?);
    } else {
        println!(
            "{} · {} points · loyalty level {}",
            snap.display_name, snap.points, snap.level
        );
        println!(
            "{}/{} toward level {} ({:.0}%)",
            snap.points_into_level,
            engine.config().xp_per_level,
            snap.level.saturating_add(1),
            snap.progress_pct
        );
    }
    Ok(())
}
