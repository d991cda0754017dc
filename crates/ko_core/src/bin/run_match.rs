//! Runs one full match at speed and prints the ticker plus the closing
//! odds board. Usage: run_match [seed] [speed]

use ko_core::tuning::clock;
use ko_core::{MatchPhase, MatchSession};

fn main() {
    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(42);
    let speed: f32 = args.next().and_then(|a| a.parse().ok()).unwrap_or(20.0);

    let mut session = MatchSession::new(seed);
    session.set_speed(speed);
    session.start();

    let mut now_ms = 0u64;
    let mut printed = 0usize;
    loop {
        now_ms += clock::MS_PER_TICK;
        session.tick(now_ms);
        let snapshot = session.snapshot();
        for event in &snapshot.state.events[printed..] {
            println!("{:>2}' {}", event.minute, event.narrative);
        }
        printed = snapshot.state.events.len();
        if snapshot.phase == MatchPhase::FullTime {
            break;
        }
        if now_ms > 24 * 60 * 60 * 1000 {
            eprintln!("bailing out: match never finished");
            std::process::exit(1);
        }
    }

    let snapshot = session.snapshot();
    let state = &snapshot.state;
    println!();
    println!(
        "FT  {} {} - {} {}",
        snapshot.teams.home, state.score.home, state.score.away, snapshot.teams.away
    );
    println!(
        "shots {}/{}  on target {}/{}  corners {}/{}  fouls {}/{}  possession {}%/{}%",
        state.stats.home.shots,
        state.stats.away.shots,
        state.stats.home.shots_on_target,
        state.stats.away.shots_on_target,
        state.stats.home.corners,
        state.stats.away.corners,
        state.stats.home.fouls,
        state.stats.away.fouls,
        state.possession.home,
        state.possession.away,
    );

    let odds = &snapshot.odds;
    println!(
        "closing odds  1: {:.2}  X: {:.2}  2: {:.2}   O/U {:.1}: {:.2}/{:.2}   BTTS: {:.2}/{:.2}",
        odds.three_way.home,
        odds.three_way.draw,
        odds.three_way.away,
        odds.over_under.line,
        odds.over_under.over,
        odds.over_under.under,
        odds.btts.yes,
        odds.btts.no,
    );
    if odds.value_bets.is_empty() {
        println!("no value flagged at the close");
    }
    for bet in &odds.value_bets {
        println!(
            "value: {} @ {:.2} (model {:.0}% vs implied {:.0}%, {:?})",
            bet.market,
            bet.odds,
            bet.actual * 100.0,
            bet.implied * 100.0,
            bet.confidence,
        );
    }
}
