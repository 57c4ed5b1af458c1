#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use std::{cell::Cell, path::PathBuf};

#[cfg(feature = "std")]
use battleship_core::{
    init_logging, AiPlayer, Battlefield, BattleSession, Board, CellState, Clock, Difficulty,
    ErrorKind, FileResultStore, Fleet, InMemoryResultStore, MatchConfig, MatchError, MatchResult,
    MatchService, ResultStore, ShotResult, StoreFormat, SystemClock, BOARD_SIZE,
};
#[cfg(feature = "std")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "std")]
use log::info;
#[cfg(feature = "std")]
use tokio::io::{AsyncBufReadExt, BufReader};
#[cfg(feature = "std")]
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    /// File holding the results of finished matches.
    #[arg(long, default_value = "data/match_results.json")]
    results: PathBuf,
    #[arg(long, value_enum, default_value_t = FormatArg::Json)]
    format: FormatArg,
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
#[cfg(feature = "std")]
enum FormatArg {
    Json,
    Bincode,
}

#[cfg(feature = "std")]
impl From<FormatArg> for StoreFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Json => StoreFormat::Json,
            FormatArg::Bincode => StoreFormat::Bincode,
        }
    }
}

#[derive(Parser)]
#[cfg(feature = "std")]
enum Commands {
    /// Play against the computer on this terminal.
    Play {
        #[arg(long, default_value = "hard")]
        difficulty: Difficulty,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        /// Milliseconds the computer waits before each shot.
        #[arg(long, default_value_t = 500)]
        delay_ms: u64,
    },
    /// Let an autopilot play against the computer and print a JSON summary.
    Sim {
        #[arg(long, default_value = "hard")]
        difficulty: Difficulty,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value_t = 1)]
        games: u32,
        /// Append the results to the results file.
        #[arg(long)]
        save: bool,
    },
    /// List stored match results.
    History,
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let store = FileResultStore::new(cli.results.clone(), cli.format.into());

    match cli.command {
        Commands::Play {
            difficulty,
            seed,
            delay_ms,
        } => {
            let config = MatchConfig {
                ai_delay: Duration::from_millis(delay_ms),
                difficulty,
                seed,
                results_path: cli.results,
                store_format: cli.format.into(),
            };
            play(config, store).await
        }
        Commands::Sim {
            difficulty,
            seed,
            games,
            save,
        } => {
            let seed = seed.unwrap_or_else(rand::random);
            if save {
                simulate(store, difficulty, seed, games)
            } else {
                simulate(InMemoryResultStore::new(), difficulty, seed, games)
            }
        }
        Commands::History => history(&store),
    }
}

#[cfg(feature = "std")]
async fn play(config: MatchConfig, store: FileResultStore) -> anyhow::Result<()> {
    let seed = config.seed.unwrap_or_else(rand::random);
    info!("play: seed {}, results in {}", seed, config.results_path.display());
    let service = MatchService::from_config(store, &config);
    let mut session = BattleSession::new(service, SystemClock::new());
    session.start_random(config.difficulty, seed)?;

    println!(
        "Battle against the {} AI. Enter a cell like B7, or q to quit.",
        config.difficulty.name()
    );
    render(&session);

    let mut frames = tokio::time::interval(Duration::from_millis(50));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = frames.tick() => {
                let Some(before) = session.stats() else { break };
                if before.player_turn {
                    continue;
                }
                let outcome = session.enemy_attack_step();
                let fired = session.stats().map_or(false, |s| s.enemy_shots > before.enemy_shots);
                if fired {
                    report(&session);
                }
                if let Some(result) = finished(outcome)? {
                    announce(&session, &result);
                    break;
                }
                if fired && session.stats().is_some_and(|s| s.player_turn) {
                    render(&session);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line.eq_ignore_ascii_case("q") {
                    break;
                }
                let Some((row, col)) = parse_coord(line) else {
                    println!("Enter a column A-J followed by a row 1-10, e.g. B7");
                    continue;
                };
                match session.player_attack(row, col) {
                    Err(e) if e.kind() == ErrorKind::IllegalAction => println!("{}", e),
                    outcome => {
                        report(&session);
                        if let Some(result) = finished(outcome)? {
                            announce(&session, &result);
                            break;
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

/// A finished match, also when only the store write failed.
#[cfg(feature = "std")]
fn finished(outcome: Result<Option<MatchResult>, MatchError>) -> anyhow::Result<Option<MatchResult>> {
    match outcome {
        Ok(result) => Ok(result),
        Err(MatchError::ResultNotSaved { result, reason }) => {
            eprintln!("Result could not be saved: {}", reason);
            Ok(Some(result))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(feature = "std")]
fn parse_coord(input: &str) -> Option<(usize, usize)> {
    if input.len() < 2 {
        return None;
    }
    let mut chars = input.chars();
    let col_ch = chars.next()?.to_ascii_uppercase();
    if !col_ch.is_ascii_alphabetic() {
        return None;
    }
    let col = (col_ch as u8 - b'A') as usize;
    let row: usize = chars.as_str().parse().ok()?;
    if row == 0 || row > BOARD_SIZE as usize || col >= BOARD_SIZE as usize {
        return None;
    }
    Some((row - 1, col))
}

#[cfg(feature = "std")]
fn cell_name(row: usize, col: usize) -> String {
    format!("{}{}", (b'A' + col as u8) as char, row + 1)
}

#[cfg(feature = "std")]
fn report<S: ResultStore, C: Clock>(session: &BattleSession<S, C>) {
    let Some(ev) = session.last_event() else {
        return;
    };
    let who = match ev.attacker {
        battleship_core::Side::Player => "You",
        battleship_core::Side::Enemy => "Enemy",
    };
    let what = match (ev.hit, ev.sunk) {
        (_, Some(name)) => format!("hit and sank a {}", name),
        (true, None) => "hit".to_string(),
        (false, None) => "missed".to_string(),
    };
    println!("{} fired at {}: {}", who, cell_name(ev.row, ev.col), what);
}

#[cfg(feature = "std")]
fn announce<S: ResultStore, C: Clock>(session: &BattleSession<S, C>, result: &MatchResult) {
    render(session);
    println!(
        "{} wins. {} shots, {} hits ({:.0}%), best streak {}, time {}",
        session.winner_name().unwrap_or("Nobody"),
        result.shots,
        result.hits,
        result.accuracy() * 100.0,
        result.best_hit_streak,
        result.formatted_duration()
    );
}

#[cfg(feature = "std")]
fn render<S: ResultStore, C: Clock>(session: &BattleSession<S, C>) {
    let Some(m) = session.current() else {
        return;
    };
    if let (Some(enemy), Some(own)) = (m.enemy_board(), m.player_board()) {
        println!("      Enemy waters                Your waters");
        print_header();
        print!("     ");
        print_header();
        println!();
        for r in 0..BOARD_SIZE as usize {
            print_row(enemy, r, false);
            print!("  ");
            print_row(own, r, true);
            println!();
        }
    }
    if let Some(s) = session.stats() {
        println!(
            "You: {}/{} hits   Enemy: {}/{} hits   {}",
            s.player_hits,
            s.player_shots,
            s.enemy_hits,
            s.enemy_shots,
            if s.player_turn { "your turn" } else { "enemy's turn" }
        );
    }
}

#[cfg(feature = "std")]
fn print_header() {
    print!("   ");
    for c in 0..BOARD_SIZE as usize {
        print!(" {}", (b'A' + c as u8) as char);
    }
}

#[cfg(feature = "std")]
fn print_row(board: &Board, row: usize, reveal: bool) {
    print!("{:2} ", row + 1);
    for col in 0..BOARD_SIZE as usize {
        let ch = match board.cell(row, col) {
            Some(CellState::Hit) => 'X',
            Some(CellState::Miss) => 'o',
            Some(CellState::ShipPresent) if reveal => '#',
            _ => '.',
        };
        print!(" {}", ch);
    }
}

/// Manually advanced clock so simulated matches skip the AI delay.
#[cfg(feature = "std")]
#[derive(Default)]
struct SimClock(Cell<std::time::Duration>);

#[cfg(feature = "std")]
impl Clock for SimClock {
    fn now(&self) -> std::time::Duration {
        self.0.get()
    }
}

/// The enemy board as seen by the autopilot, attacked through the session.
#[cfg(feature = "std")]
struct SessionTarget<'a, S: ResultStore, C: Clock> {
    session: &'a mut BattleSession<S, C>,
    result: Option<MatchResult>,
}

#[cfg(feature = "std")]
impl<S: ResultStore, C: Clock> Battlefield for SessionTarget<'_, S, C> {
    type Error = anyhow::Error;

    fn fire(&mut self, row: usize, col: usize) -> anyhow::Result<ShotResult> {
        self.result = finished(self.session.player_attack(row, col))?;
        let ev = self
            .session
            .last_event()
            .ok_or_else(|| anyhow::anyhow!("no event after attack"))?;
        Ok(match (ev.hit, ev.sunk) {
            (_, Some(name)) => {
                let size = Fleet::standard()
                    .ships()
                    .iter()
                    .find(|s| s.name() == name)
                    .map_or(0, |s| s.size());
                ShotResult::Sunk { name, size }
            }
            (true, None) => ShotResult::Hit,
            (false, None) => ShotResult::Miss,
        })
    }
}

#[cfg(feature = "std")]
fn simulate<S: ResultStore>(
    store: S,
    difficulty: Difficulty,
    seed: u64,
    games: u32,
) -> anyhow::Result<()> {
    let clock = SimClock::default();
    let service = MatchService::new(store, battleship_core::DEFAULT_AI_DELAY);
    let delay = service.ai_delay();
    let mut session = BattleSession::new(service, &clock);

    for game in 0..games as u64 {
        let game_seed = seed.wrapping_add(game);
        session.start_random(difficulty, game_seed)?;
        let mut autopilot = AiPlayer::with_difficulty(
            Difficulty::Hard,
            Fleet::standard(),
            game_seed.rotate_left(32),
        );

        let result = loop {
            let Some(stats) = session.stats() else {
                anyhow::bail!("session lost its match");
            };
            if stats.player_turn {
                let mut target = SessionTarget {
                    session: &mut session,
                    result: None,
                };
                if autopilot.attack(&mut target)?.is_none() {
                    anyhow::bail!("autopilot ran out of cells");
                }
                if let Some(result) = target.result {
                    break result;
                }
            } else {
                clock.0.set(clock.0.get() + delay);
                if let Some(result) = finished(session.enemy_attack_step())? {
                    break result;
                }
            }
        };

        let Some(stats) = session.stats() else {
            anyhow::bail!("session lost its match");
        };
        let summary = serde_json::json!({
            "game": game + 1,
            "seed": game_seed,
            "difficulty": difficulty,
            "winner": session.winner_name(),
            "player": result,
            "enemy": { "shots": stats.enemy_shots, "hits": stats.enemy_hits },
        });
        println!("{}", serde_json::to_string(&summary)?);
    }
    Ok(())
}

#[cfg(feature = "std")]
fn history(store: &FileResultStore) -> anyhow::Result<()> {
    let results = store.list_all()?;
    if results.is_empty() {
        println!("No matches recorded in {}", store.path().display());
        return Ok(());
    }
    println!(" #  outcome  shots  hits  acc   streak  sunk  lost  time");
    for (i, r) in results.iter().enumerate() {
        println!(
            "{:2}  {:7}  {:5}  {:4}  {:3.0}%  {:6}  {:4}  {:4}  {}",
            i + 1,
            if r.win { "win" } else { "loss" },
            r.shots,
            r.hits,
            r.accuracy() * 100.0,
            r.best_hit_streak,
            r.ships_sunk,
            r.ships_lost,
            r.formatted_duration()
        );
    }
    Ok(())
}
