use anyhow::{bail, Context, Result};
use chic_rules::chess_boards::chess_board::fen::INITIAL_POSITION;
use chic_rules::chess_boards::perft::divide;
use chic_rules::engines::{Player, RandomPlayer};
use chic_rules::game::{ClickOutcome, Game, PlayedMove};
use chic_rules::{ChessBoard, ChessField, Color, Square};
use std::cmp::min;
use std::io::{stderr, stdin, stdout, BufRead, Write};
use std::time::Instant;

use clap::arg;
use clap::command;
use clap::ArgMatches;
use clap::Command;

use tabled::settings::Style;
use tabled::Table;
use tabled::Tabled;

use tracing::{info, Level};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::prelude::*;

fn fen_arg() -> clap::Arg {
    arg!(
    -f --fen <FEN> "Board position"
            )
    .default_value(INITIAL_POSITION)
}

fn seed_arg() -> clap::Arg {
    arg!(
    -s --seed <SEED> "Seed of the random player"
            )
    .default_value("42")
    .value_parser(clap::value_parser!(u64))
}

fn main() -> Result<()> {
    let matches = command!()
        .version("v0.0.1")
        .propagate_version(true)
        .arg(
            arg!(
            -v --verbosity <LEVEL> "Log level written to stderr"
                    )
            .global(true)
            .default_value("warn")
            .value_parser(clap::value_parser!(Level)),
        )
        .subcommand(
            Command::new("play")
                .about("Play a game in the terminal by naming squares")
                .arg(fen_arg())
                .arg(arg!(
                    -r --"random-black" "Let the random player answer with black"
                ))
                .arg(seed_arg()),
        )
        .subcommand(
            Command::new("moves")
                .about("List the destinations of the piece on a square")
                .arg(fen_arg())
                .arg(arg!(<SQUARE> "Square such as e2")),
        )
        .subcommand(
            Command::new("perft")
                .about("Count pseudo-legal move paths")
                .arg(fen_arg())
                .arg(
                    arg!(
                    -x --depth <d> "depth"
                            )
                    .default_value("3")
                    .value_parser(clap::value_parser!(u8)),
                ),
        )
        .subcommand(
            Command::new("selfplay")
                .about("Let two random players play each other")
                .arg(fen_arg())
                .arg(seed_arg())
                .arg(
                    arg!(
                    -p --plies <PLIES> "Number of half moves"
                            )
                    .default_value("40")
                    .value_parser(clap::value_parser!(usize)),
                ),
        )
        .get_matches();

    let verbosity = matches.get_one::<Level>("verbosity").copied().unwrap_or(Level::WARN);
    init_logging(verbosity);

    match matches.subcommand() {
        Some(("play", arg_matches)) => play(arg_matches),
        Some(("moves", arg_matches)) => moves(arg_matches),
        Some(("perft", arg_matches)) => perft(arg_matches),
        Some(("selfplay", arg_matches)) => selfplay(arg_matches),
        None => play(&ArgMatches::default()),
        _ => unreachable!("Exhausted list of subcommands"),
    }
}

fn init_logging(verbosity: Level) {
    let filter = Targets::new()
        .with_target("chic_rules", verbosity)
        .with_default(min(Level::WARN, verbosity));

    let writer = layer().with_target(false).with_writer(stderr);

    tracing_subscriber::registry().with(filter).with(writer).init();
}

fn board_from_args(args: &ArgMatches) -> Result<ChessBoard> {
    let fen = args
        .try_get_one::<String>("fen")
        .ok()
        .flatten()
        .map(String::as_str)
        .unwrap_or(INITIAL_POSITION);
    ChessBoard::from_fen(fen).with_context(|| format!("cannot load position {:?}", fen))
}

#[derive(Tabled)]
struct HistoryRow {
    ply: usize,
    side: String,
    piece: String,
    #[tabled(rename = "move")]
    mv: String,
    captured: String,
    check: String,
}

impl HistoryRow {
    fn new(ply: usize, played: &PlayedMove) -> Self {
        HistoryRow {
            ply,
            side: played.piece.color.to_string(),
            piece: played.piece.code(),
            mv: played.mv.as_algebraic(),
            captured: played.captured.map(|p| p.code()).unwrap_or_default(),
            check: played.check.map(|side| side.to_string()).unwrap_or_default(),
        }
    }
}

fn announce_check(played: &PlayedMove) {
    if let Some(side) = played.check {
        println!("{} is in Check!", side);
    }
}

fn play(args: &ArgMatches) -> Result<()> {
    let random_black = args.try_get_one::<bool>("random-black").ok().flatten().copied().unwrap_or(false);
    let seed = args.try_get_one::<u64>("seed").ok().flatten().copied().unwrap_or(42);
    let mut opponent = random_black.then(|| RandomPlayer::new(seed));

    let mut game = Game::with_board(board_from_args(args)?);
    info!(random_black, seed, "starting game");
    println!("{}", game.board().render_to_string());
    print_turn(&game);

    for line in stdin().lock().lines() {
        let line = line.context("cannot read from stdin")?;
        let command = line.trim();

        match command {
            "" => continue,
            "quit" | "exit" => break,
            "board" => println!("{}", game.board().render_to_string()),
            "history" => {
                let rows: Vec<_> = game.history().enumerate().map(|(i, m)| HistoryRow::new(i + 1, m)).collect();
                println!("{}", Table::new(rows).with(Style::modern()));
            }
            "reset" => {
                game.reset();
                println!("{}", game.board().render_to_string());
            }
            "help" => {
                println!("Name a square (e.g. e2) to select a piece, then a highlighted square to move it.");
                println!("Other commands: board, history, reset, quit");
            }
            square => match square.parse::<ChessField>() {
                Ok(field) => {
                    handle_click(&mut game, field);
                    if let Some(player) = opponent.as_mut() {
                        if game.board().current_turn() == Color::Black {
                            if let Some(mv) = player.choose_move(game.board()) {
                                println!("{} plays {}", player.name(), mv);
                                if let ClickOutcome::Moved(played) = game.play(mv) {
                                    println!("{}", game.board().render_to_string());
                                    announce_check(&played);
                                }
                            }
                        }
                    }
                }
                Err(e) => println!("{}", e),
            },
        }
        print_turn(&game);
    }

    Ok(())
}

fn handle_click(game: &mut Game, field: ChessField) {
    match game.click(field) {
        ClickOutcome::Selected { from, candidates } => {
            let targets: Vec<_> = candidates.iter().map(|f| f.as_algebraic()).collect();
            println!("{} selected, moves: {}", from, targets.join(" "));
        }
        ClickOutcome::Moved(played) => {
            println!("{}", game.board().render_to_string());
            announce_check(&played);
        }
        ClickOutcome::Deselected => println!("selection cleared"),
        ClickOutcome::Ignored => {}
    }
}

fn print_turn(game: &Game) {
    print!("{}'s turn> ", game.board().current_turn());
    let _ = stdout().flush();
}

#[derive(Tabled)]
struct MoveRow {
    target: String,
    occupant: String,
    capture: bool,
}

fn moves(args: &ArgMatches) -> Result<()> {
    let board = board_from_args(args)?;
    let Some(square) = args.get_one::<String>("SQUARE") else {
        bail!("a square is required");
    };
    let field: ChessField = square.parse()?;

    let rows: Vec<MoveRow> = board
        .moves_from(field)
        .into_iter()
        .map(|to| {
            let occupant = board.square(to);
            MoveRow {
                target: to.as_algebraic(),
                occupant: occupant.code(),
                capture: !matches!(occupant, Square::Empty),
            }
        })
        .collect();

    println!("{}", board.render_to_string());
    println!("{} on {}: {} moves", board.square(field).code(), field, rows.len());
    println!("{}", Table::new(rows).with(Style::modern()));
    for side in [Color::White, Color::Black] {
        if board.side_in_check(side) {
            println!("{} is in Check!", side);
        }
    }
    Ok(())
}

#[derive(Tabled)]
struct DivideRow {
    #[tabled(rename = "move")]
    mv: String,
    nodes: u64,
}

fn perft(args: &ArgMatches) -> Result<()> {
    let board = board_from_args(args)?;
    let depth = args.get_one::<u8>("depth").copied().unwrap_or(3);
    if depth == 0 {
        bail!("depth must be at least 1");
    }

    println!("Perft test for {} with depth {}", board.to_fen(), depth);
    let start_time = Instant::now();
    let divided = divide(&board, depth);
    let elapsed = start_time.elapsed();

    let num_nodes: u64 = divided.iter().map(|(_, n)| n).sum();
    let rows: Vec<DivideRow> = divided
        .into_iter()
        .map(|(mv, nodes)| DivideRow {
            mv: mv.as_algebraic(),
            nodes,
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::modern()));
    println!("\nNodes searched: {} in {:.3}s", num_nodes, elapsed.as_secs_f32());
    Ok(())
}

fn selfplay(args: &ArgMatches) -> Result<()> {
    let seed = args.get_one::<u64>("seed").copied().unwrap_or(42);
    let plies = args.get_one::<usize>("plies").copied().unwrap_or(40);

    let mut game = Game::with_board(board_from_args(args)?);
    let mut white = RandomPlayer::new(seed);
    let mut black = RandomPlayer::new(seed.wrapping_add(1));

    let mut rows = Vec::with_capacity(plies);
    for ply in 1..=plies {
        let board = game.board();
        let choice = match board.current_turn() {
            Color::White => white.choose_move(board),
            Color::Black => black.choose_move(board),
        };
        let Some(mv) = choice else {
            info!(ply, "no pieces left to move");
            break;
        };
        if let ClickOutcome::Moved(played) = game.play(mv) {
            rows.push(HistoryRow::new(ply, &played));
        }
    }

    println!("{}", Table::new(rows).with(Style::modern()));
    println!("{}", game.board().render_to_string());
    println!("{}", game.board().to_fen());
    Ok(())
}
