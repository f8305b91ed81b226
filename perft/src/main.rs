use std::process;
use std::time::Instant;

use clap::{crate_version, value_t, App, Arg};
use log::{debug, error};
use magicmove::board::positions;
use magicmove::{perft, AttackTables, Board, CheckValidation};

fn main() {
    env_logger::init();

    let matches = App::new(env!("CARGO_PKG_NAME"))
        .version(crate_version!())
        .about("Perft calculator for chess positions")
        .arg(
            Arg::with_name("FEN")
                .help("FEN of the position to calculate, the initial position if omitted")
                .index(1),
        )
        .arg(
            Arg::with_name("depth")
                .help("Depth of move tree to search")
                .value_name("DEPTH")
                .short("d")
                .long("depth")
                .takes_value(true)
                .default_value("4"),
        )
        .arg(
            Arg::with_name("divide")
                .help("Print node counts for each root move")
                .long("divide"),
        )
        .get_matches();

    let fen = matches.value_of("FEN").unwrap_or(positions::START);
    let depth = value_t!(matches, "depth", u32).unwrap_or_else(|e| e.exit());

    let start = Instant::now();
    let tables = AttackTables::new();
    debug!("attack tables ready in {} ms", start.elapsed().as_millis());

    let mut board =
        match Board::from_fen_with(fen, &tables, CheckValidation::RejectOpponentInCheck) {
            Ok(board) => board,
            Err(e) => {
                error!("bad position {:?}: {}", fen, e);
                eprintln!("invalid FEN: {}", e);
                process::exit(1);
            }
        };

    println!("{}", board.pretty(magicmove::fen::PrettyStyle::Framed));
    println!("fen:   {}", fen);
    println!("depth: {}", depth);
    if depth > 6 {
        println!("warning, this is probably going to take a while...");
    }

    if matches.is_present("divide") {
        println!("{}", perft::divide(&tables, &board, depth));
        return;
    }

    for i in 1..=depth {
        let start = Instant::now();
        let nodes = perft::perft(&tables, &mut board, i);
        println!(
            "perft({}) = {} ({} ms)",
            i,
            nodes,
            start.elapsed().as_millis()
        );
    }
}
