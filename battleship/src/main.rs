// Copyright 2020 Zachary Stewart
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use std::{
    fmt,
    io::{self, BufRead, Write},
};

use clap::{value_t, App, Arg, ArgMatches};
use once_cell::sync::Lazy;
use rand::{rngs::StdRng, Rng, SeedableRng};
use regex::Regex;
use tracing::{info, warn};
use tracing_subscriber::{
    filter::{LevelFilter, Targets},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use fleetgrid::{
    BoardSetup, CannotPlaceReason, Coordinate, GenerateError, GridSize, Orientation, Placement,
    Ship,
};

/// Ships are identified by their index in the fleet.
type ShipIdx = usize;

/// Settings taken from the command line.
struct Config {
    size: GridSize,
    fleet: Vec<(ShipIdx, Ship)>,
    require_gaps: bool,
    seed: Option<u64>,
    random_only: bool,
}

fn main() -> io::Result<()> {
    let matches = App::new("Battleship")
        .version("1.0")
        .author("Zachary Stewart <zachary@zstewart.com>")
        .about("Place a battleship fleet by hand or at random.")
        .arg(
            Arg::with_name("rows")
                .long("rows")
                .value_name("ROWS")
                .help("number of rows on the board")
                .default_value("10"),
        )
        .arg(
            Arg::with_name("cols")
                .long("cols")
                .value_name("COLS")
                .help("number of columns on the board")
                .default_value("10"),
        )
        .arg(
            Arg::with_name("ships")
                .short("s")
                .long("ships")
                .value_name("LENGTHS")
                .help("comma separated ship lengths")
                .default_value("5,4,3,3,2"),
        )
        .arg(
            Arg::with_name("allow_touching")
                .long("allow-touching")
                .help("let ships touch each other, including diagonally"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .value_name("SEED")
                .help("seed for random placement")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("random")
                .short("r")
                .long("random")
                .help("print a random board and exit"),
        )
        .arg(
            Arg::with_name("log_level")
                .short("l")
                .long("log-level")
                .value_name("LEVEL")
                .help("one of off, error, warn, info, debug, trace")
                .default_value("warn"),
        )
        .get_matches();

    let level = value_t!(matches, "log_level", LevelFilter).unwrap_or_else(|e| e.exit());
    initialize_logging(level);

    let config = read_config(&matches);
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(
        rows = config.size.rows(),
        cols = config.size.cols(),
        ships = config.fleet.len(),
        require_gaps = config.require_gaps,
        seed = ?config.seed,
        "starting setup"
    );

    let mut setup = BoardSetup::new(config.size);
    if config.random_only {
        match setup.randomize_all(&config.fleet, config.require_gaps, &mut rng) {
            Ok(()) => show_board(&setup),
            Err(err) => report_generate_error(&err),
        }
        return Ok(());
    }

    let stdin = std::io::stdin();
    let mut input = InputReader::new(stdin.lock());
    choose_placements(&mut rng, &mut setup, &config, &mut input)?;
    println!("Final placements:");
    let mut placed: Vec<_> = setup.placements().iter().collect();
    placed.sort_by_key(|(idx, _)| **idx);
    for (idx, placement) in placed {
        println!(
            "  {} (len {}): {},{} {}",
            ShipLabel(*idx),
            placement.ship.len(),
            placement.head.row,
            placement.head.col,
            OrientationName(placement.orientation()),
        );
    }
    Ok(())
}

/// Install a compact fmt subscriber filtered at `level`.
fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().event_format(format))
        .with(filter)
        .init();
}

/// Build the [`Config`] from parsed args, exiting with a usage error on bad values.
fn read_config(matches: &ArgMatches) -> Config {
    let rows = value_t!(matches, "rows", usize).unwrap_or_else(|e| e.exit());
    let cols = value_t!(matches, "cols", usize).unwrap_or_else(|e| e.exit());
    let size = GridSize::try_new(rows, cols).unwrap_or_else(|| {
        clap::Error::value_validation_auto(format!("invalid board size {}x{}", rows, cols)).exit()
    });

    let mut fleet = Vec::new();
    for (idx, token) in matches
        .value_of("ships")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .enumerate()
    {
        let ship = token
            .parse()
            .ok()
            .and_then(Ship::try_new)
            .unwrap_or_else(|| {
                clap::Error::value_validation_auto(format!(
                    "invalid ship length \"{}\", must be a positive number",
                    token
                ))
                .exit()
            });
        fleet.push((idx, ship));
    }

    let seed = if matches.is_present("seed") {
        Some(value_t!(matches, "seed", u64).unwrap_or_else(|e| e.exit()))
    } else {
        None
    };

    Config {
        size,
        fleet,
        require_gaps: !matches.is_present("allow_touching"),
        seed,
        random_only: matches.is_present("random"),
    }
}

/// Choose placements for all ships using input from the player.
fn choose_placements(
    rng: &mut StdRng,
    setup: &mut BoardSetup<ShipIdx>,
    config: &Config,
    input: &mut InputReader<impl BufRead>,
) -> io::Result<()> {
    enum Command {
        Done,
        Place(ShipIdx, Coordinate, Option<Orientation>),
        Remove(ShipIdx),
        Clear,
        RandomizeRest,
        Regenerate,
        Show,
        Help,
    }
    println!();
    println!("Place ships. Type help or ? for commands.");
    loop {
        println!();
        /// Matcher for commands with args.
        static PLACE: Lazy<Regex> = Lazy::new(|| {
            Regex::new(
                r"^(?x)(?:place|put)\s+
        (?P<ship>\w+)\s+
        (?:(?:at|on|to|->|=>)\s+)?
        (?P<row>[0-9]+)(?:\s*,\s*|\s+)(?P<col>[0-9]+)
        (?:\s+(?P<dir>\w+))?$",
            )
            .unwrap()
        });
        static REMOVE: Lazy<Regex> = Lazy::new(|| {
            Regex::new(
                r"^(?x)(?:un-?place|remove)\s+
        (?P<ship>\w+)$",
            )
            .unwrap()
        });

        let pending = pending_ships(setup, &config.fleet);
        if pending.is_empty() {
            println!("All ships placed, type done to finish");
        } else {
            let names: Vec<String> = pending
                .iter()
                .map(|(idx, ship)| format!("{} (len {})", ShipLabel(*idx), ship.len()))
                .collect();
            println!("Remaining ships to place: {}", names.join(", "));
        }
        println!("Your current board setup:");
        show_board(setup);
        println!();

        let fleet_len = config.fleet.len();
        let size = config.size;
        let cmd = input.read_input_lower("> ", |input| match input {
            "?" | "help" | "h" => Some(Command::Help),
            "randomize" | "rand" | "random" => Some(Command::RandomizeRest),
            "regenerate" | "reroll" => Some(Command::Regenerate),
            "done" | "finish" => Some(Command::Done),
            "clear" => Some(Command::Clear),
            "show" | "board" => Some(Command::Show),
            other => {
                if let Some(captures) = PLACE.captures(other) {
                    let ship = parse_ship(&captures["ship"], fleet_len)?;
                    let row = match captures["row"].parse() {
                        Ok(row) if row < size.rows() => row,
                        _ => {
                            println!("row must be in range [0,{}]", size.rows() - 1);
                            return None;
                        }
                    };
                    let col = match captures["col"].parse() {
                        Ok(col) if col < size.cols() => col,
                        _ => {
                            println!("col must be in range [0,{}]", size.cols() - 1);
                            return None;
                        }
                    };
                    let dir = match captures.name("dir").map(|dir| dir.as_str()) {
                        None => None,
                        Some("h") | Some("horizontal") | Some("right") | Some("r") | Some("e") => {
                            Some(Orientation::Horizontal)
                        }
                        Some("v") | Some("vertical") | Some("down") | Some("d") | Some("s") => {
                            Some(Orientation::Vertical)
                        }
                        Some(other) => {
                            println!(
                                "invalid direction {}, choose \"horizontal\" or \"vertical\"",
                                other
                            );
                            return None;
                        }
                    };
                    Some(Command::Place(ship, Coordinate::new(row, col), dir))
                } else if let Some(captures) = REMOVE.captures(other) {
                    if &captures["ship"] == "all" {
                        return Some(Command::Clear);
                    }
                    parse_ship(&captures["ship"], fleet_len).map(Command::Remove)
                } else {
                    println!(
                        "Invalid ship-placement command \"{}\". Use '?' for help",
                        other
                    );
                    None
                }
            }
        })?;

        match cmd {
            Command::Done if pending_ships(setup, &config.fleet).is_empty() => break,
            Command::Done => println!("You must place all your ships first!"),
            Command::Place(idx, head, dir) => {
                let dir = dir.unwrap_or_else(|| rng.gen());
                let ship = config.fleet[idx].1.with_orientation(dir);
                match setup.place(idx, Placement::new(ship, head), config.require_gaps) {
                    Ok(()) => {}
                    Err(err) => match err.reason() {
                        CannotPlaceReason::OutOfBounds => {
                            println!("Invalid placement: not enough space on the board.")
                        }
                        CannotPlaceReason::AlreadyOccupied => {
                            println!("Invalid placement: overlaps existing ship.")
                        }
                        CannotPlaceReason::TooClose => {
                            println!("Invalid placement: touches another ship.")
                        }
                    },
                }
            }
            Command::Remove(idx) => {
                if setup.remove(&idx).is_err() {
                    println!("Ship {} is not on the board.", ShipLabel(idx));
                }
            }
            Command::Clear => setup.clear(),
            Command::RandomizeRest => {
                if let Err(err) = setup.randomize_rest(&pending, config.require_gaps, rng) {
                    report_generate_error(&err);
                }
            }
            Command::Regenerate => {
                if let Err(err) = setup.randomize_all(&config.fleet, config.require_gaps, rng) {
                    report_generate_error(&err);
                }
            }
            Command::Show => {}
            Command::Help => {
                println!(
                    "Available Commands:
    done                          if all ships are placed, finish setup.
    place <ship> <row>,<col> [dir] place the ship with its head at the given cell.
        Possible directions are \"horizontal\" (\"h\") and \"vertical\" (\"v\").
        If no direction is given, one is picked at random.
        Placing a ship that is already on the board moves it.
    remove <ship>                 take the ship off the board.
        Additionally \"all\" may be specified to clear all placements.
    clear                         clears all ship placements.
    randomize                     randomly place the remaining ships.
    regenerate                    randomly place every ship from scratch.
    show                          print the board again.

Ships are named by letter, starting from \"a\", in the order given by --ships."
                );
            }
        }
    }
    Ok(())
}

/// Ships from the fleet that are not on the board yet.
fn pending_ships(setup: &BoardSetup<ShipIdx>, fleet: &[(ShipIdx, Ship)]) -> Vec<(ShipIdx, Ship)> {
    fleet
        .iter()
        .filter(|(idx, _)| setup.get(idx).is_none())
        .copied()
        .collect()
}

/// Parse a ship label, either a letter or a fleet index.
fn parse_ship(token: &str, fleet_len: usize) -> Option<ShipIdx> {
    let idx = match token.parse::<usize>() {
        Ok(idx) => Some(idx),
        Err(_) => {
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(c @ 'a'..='z'), None) => Some(c as usize - 'a' as usize),
                _ => None,
            }
        }
    };
    match idx {
        Some(idx) if idx < fleet_len => Some(idx),
        _ => {
            println!("invalid ship: {}, fleet has {} ships", token, fleet_len);
            None
        }
    }
}

/// Tell the player why random placement did not happen.
fn report_generate_error(err: &GenerateError<ShipIdx>) {
    warn!(%err, "random placement failed");
    match err {
        GenerateError::Infeasible => println!(
            "Could not place ships: try fewer or shorter ships, a larger board, or --allow-touching."
        ),
        other => println!("Could not place ships: {}", other),
    }
}

/// Print out the board.
fn show_board(setup: &BoardSetup<ShipIdx>) {
    enum SetupCell {
        Empty,
        Ship(ShipLabel),
    }
    impl fmt::Display for SetupCell {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            match self {
                SetupCell::Empty => f.pad("~~"),
                SetupCell::Ship(label) => fmt::Display::fmt(label, f),
            }
        }
    }
    print!("   ");
    for i in 0..setup.size().cols() {
        print!("{:^4}", i);
    }
    println!();
    for (i, row) in setup.iter_rows().enumerate() {
        print!("{:>2} ", i);
        for cell in row {
            let cell = match cell {
                Some(idx) => SetupCell::Ship(ShipLabel(*idx)),
                None => SetupCell::Empty,
            };
            print!("{:^4}", cell);
        }
        println!();
    }
}

/// Display helper that prints a ship's letter.
struct ShipLabel(ShipIdx);

impl fmt::Display for ShipLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0 < 26 {
            let letter = (b'A' + self.0 as u8) as char;
            f.pad(letter.encode_utf8(&mut [0; 4]))
        } else {
            f.pad(&self.0.to_string())
        }
    }
}

/// Display helper that prints an orientation's name.
struct OrientationName(Orientation);

impl fmt::Display for OrientationName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(match self.0 {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        })
    }
}

/// Helper to read input from the player.
struct InputReader<B> {
    read: B,
    buf: String,
}

impl<B> InputReader<B> {
    fn new(read: B) -> Self {
        Self {
            read,
            buf: String::new(),
        }
    }
}

impl<B: BufRead> InputReader<B> {
    /// Repeatedly tries to read input until the input checker returns `Some`. Converts
    /// to ascii lower before running the checker.
    fn read_input_lower<F, T>(&mut self, prompt: &str, mut checker: F) -> io::Result<T>
    where
        F: FnMut(&str) -> Option<T>,
    {
        loop {
            self.read_input_inner(prompt)?;
            self.buf.make_ascii_lowercase();
            if let Some(val) = checker(self.buf.trim()) {
                return Ok(val);
            }
        }
    }

    /// Helper to print the prompt, clear the string buffer and read a line.
    fn read_input_inner(&mut self, prompt: &str) -> io::Result<()> {
        print!("{} ", prompt);
        io::stdout().flush()?;
        self.buf.clear();
        if self.read.read_line(&mut self.buf)? == 0 {
            println!();
            std::process::exit(0);
        }
        Ok(())
    }
}
