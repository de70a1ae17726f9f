use dot;
use failure::{format_err, Error};
use log::{info, warn};
use std::borrow::Cow;
use std::fs::File;
use std::io::prelude::*;
use std::path::PathBuf;
use structopt::StructOpt;

use solstice::palette::Palette;
use solstice::render::{RenderConfig, RoomRenderer};
use solstice::{Code, Direction, GameData, Room, WallSide};

#[derive(Debug, StructOpt)]
#[structopt(name = "roomview", about = "Inspect the rooms of a Solstice cartridge image.")]
struct Opt {
    /// Cartridge image, with or without an iNES header.
    #[structopt(short, long, parse(from_os_str), default_value = "Solstice (U).nes")]
    rom: PathBuf,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Print one room.
    Room {
        #[structopt(parse(try_from_str = parse_room))]
        room: usize,

        /// Print the room as JSON.
        #[structopt(long)]
        json: bool,
    },

    /// Decode every room and report the ones that fail.
    Check,

    /// Write the room connection graph in dot format.
    Graph {
        #[structopt(short, long, parse(from_os_str), default_value = "rooms.dot")]
        output: PathBuf,
    },

    /// Render a top-down map of one room to a PNG.
    Render {
        #[structopt(parse(try_from_str = parse_room))]
        room: usize,

        #[structopt(short, long, parse(from_os_str), default_value = "room.png")]
        output: PathBuf,

        /// Pixels per tile, clamped to 8..=256.
        #[structopt(long, default_value = "16")]
        cell_size: u32,

        /// 192 byte RGB palette. Defaults to the .pal file next to the ROM.
        #[structopt(long, parse(from_os_str))]
        palette: Option<PathBuf>,
    },
}

// Accepts decimal or 0x prefixed hex.
fn parse_room(s: &str) -> Result<usize, std::num::ParseIntError> {
    parse_int::parse::<usize>(s)
}

type Nd = usize;
type Ed = (usize, usize);
struct Edges(Vec<Ed>);

impl<'a> dot::Labeller<'a, Nd, Ed> for Edges {
    fn graph_id(&'a self) -> dot::Id<'a> {
        dot::Id::new("Solstice").unwrap()
    }

    fn node_id(&'a self, n: &Nd) -> dot::Id<'a> {
        dot::Id::new(format!("room_{}", *n)).unwrap()
    }

    fn node_label(&'a self, n: &Nd) -> dot::LabelText<'a> {
        dot::LabelText::LabelStr(format!("{}", *n).into())
    }
}

impl<'a> dot::GraphWalk<'a, Nd, Ed> for Edges {
    // Every room that appears on either end of an exit, in room order.
    fn nodes(&self) -> dot::Nodes<'a, Nd> {
        let mut rooms: Vec<Nd> = self.0.iter().flat_map(|&(from, to)| vec![from, to]).collect();
        rooms.sort();
        rooms.dedup();
        Cow::Owned(rooms)
    }

    fn edges(&'a self) -> dot::Edges<'a, Ed> {
        Cow::Borrowed(&self.0[..])
    }

    fn source(&self, e: &Ed) -> Nd {
        e.0
    }

    fn target(&self, e: &Ed) -> Nd {
        e.1
    }
}

fn code_name<T: std::fmt::Debug>(code: &Code<T>) -> String {
    match code {
        Code::Known(v) => format!("{:?}", v),
        Code::Unknown(b) => format!("unknown({:#04x})", b),
    }
}

fn print_room(room: &Room) {
    println!("room {}: {}x{}", room.number, room.width, room.height);
    println!("  palette: {:?}", room.palette);
    println!(
        "  walls: nw {} ne {}",
        code_name(&room.wall_nw),
        code_name(&room.wall_ne)
    );
    let windows = |side, len| -> Vec<usize> {
        (0..len).filter(|&i| room.has_window(side, i)).collect()
    };
    println!(
        "  windows: nw {:?} ne {:?}",
        windows(WallSide::NW, room.height),
        windows(WallSide::NE, room.width)
    );
    println!(
        "  floor 1: {} behavior {}",
        code_name(&room.floor1.cosmetic),
        room.floor1.behavior
    );
    println!(
        "  floor 2: {} behavior {}",
        code_name(&room.floor2.cosmetic),
        room.floor2.behavior
    );

    println!("  floor (1 = layer 1, 2 = layer 2, # = covered, . = none):");
    for row in 0..room.height {
        let line: String = (0..room.width)
            .map(|col| {
                if !room.render_floor.get(row, col) {
                    '#'
                } else if room.floor_visible.get(row, col) {
                    '1'
                } else if room.floor2.behavior != 0 {
                    '2'
                } else {
                    '.'
                }
            })
            .collect();
        println!("    {}", line);
    }

    for (dir, exit) in room.exits.iter() {
        match dir {
            Direction::Floor | Direction::Ceiling => {
                println!("  exit {:?} -> room {}", dir, exit.room)
            }
            _ => println!(
                "  exit {:?} -> room {} (w {}, z {})",
                dir, exit.room, exit.w, exit.z
            ),
        }
    }

    for e in room.entities.iter() {
        println!(
            "  entity {} at ({}, {}, {}) colors {} {}",
            code_name(&e.entity_type()),
            e.x(),
            e.y(),
            e.z(),
            e.color1(),
            e.color2()
        );
    }
    for b in room.static_blocks.iter() {
        println!(
            "  static block {} at ({}, {}, {})",
            code_name(&b.cosmetic()),
            b.x(),
            b.y(),
            b.z()
        );
    }
    for b in room.dynamic_blocks.iter() {
        println!(
            "  dynamic block {} {} at ({}, {}, {})",
            code_name(&b.cosmetic()),
            code_name(&b.functional()),
            b.x(),
            b.y(),
            b.z()
        );
    }
}

fn check(game: &GameData) -> Result<(), Error> {
    let mut failed = 0;
    let mut total = 0;
    for (number, room) in game.rooms() {
        total += 1;
        if let Err(e) = room {
            warn!("room {}: {}", number, e);
            failed += 1;
        }
    }
    info!("decoded {} of {} rooms", total - failed, total);
    if failed > 0 {
        return Err(format_err!("{} rooms failed to decode", failed));
    }
    Ok(())
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opt = Opt::from_args();

    info!("loading {}", opt.rom.display());
    let game = solstice::load_file(&opt.rom)?;

    match opt.cmd {
        Command::Room { room, json } => {
            let room = game.room(room)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&room)?);
            } else {
                print_room(&room);
            }
        }
        Command::Check => check(&game)?,
        Command::Graph { output } => {
            // Build up edges graph for dot.
            let graph = game.exit_graph();
            for (number, e) in graph.failures.iter() {
                warn!("room {}: {}, left out of graph", number, e);
            }
            let edges = Edges(graph.edges);
            let mut f = File::create(&output)?;
            dot::render(&edges, &mut f)?;
            f.flush()?;
            info!("wrote {} exits to {}", edges.0.len(), output.display());
        }
        Command::Render {
            room,
            output,
            cell_size,
            palette,
        } => {
            let palette = match palette {
                Some(path) => Palette::load(path)?,
                None => Palette::for_rom(&opt.rom)?,
            };
            let renderer = RoomRenderer::new(RenderConfig {
                palette: palette,
                cell_size: cell_size,
            });
            let room = game.room(room)?;
            renderer.render(&room).save(&output)?;
            info!("wrote room {} to {}", room.number, output.display());
        }
    }

    Ok(())
}
