//! colony-access - scanner and accessible menus over world snapshots

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use colony_access::clipboard::AnnouncementClipboard;
use colony_access::config::Config;
use colony_access::core::{Cue, Feedback, InputRouter};
use colony_access::domains::{CursorControl, InspectionMenu, ScanMenu};
use colony_access::nav::{Hints, Navigator};
use colony_access::scan::{ScanResult, Scanner};
use colony_access::sound::{self, CuePlayer};
use colony_access::tts::Speaker;
use colony_access::world::{GridPos, WorldSnapshot, WorldSource};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::cell::Cell;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(ClapParser)]
#[command(name = "colony-access")]
#[command(about = "Screen-reader scanner and menus for colony world snapshots", long_about = None)]
struct Cli {
    /// Configuration file path (default: ~/.colony-access/config.toml)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan around a point and print every category
    Scan {
        /// World snapshot (JSON)
        #[arg(short, long, value_name = "FILE")]
        world: PathBuf,

        /// Reference cell
        #[arg(long, value_name = "X,Y")]
        at: GridPos,

        /// Only scan this many tiles around the reference cell
        #[arg(short, long)]
        radius: Option<u32>,
    },
    /// Browse scan results with the keyboard
    Browse {
        /// World snapshot (JSON)
        #[arg(short, long, value_name = "FILE")]
        world: PathBuf,

        /// Starting cursor cell
        #[arg(long, value_name = "X,Y")]
        at: GridPos,

        /// Only scan this many tiles around the cursor
        #[arg(short, long)]
        radius: Option<u32>,
    },
    /// Load a world snapshot and report what it contains
    CheckWorld {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    // Log to a file (RUST_LOG controls the level); browse mode owns the terminal
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("colony-access.log")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false) // No color codes in log file
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Scan { world, at, radius } => {
            if radius.is_some() {
                config.scan.radius = radius;
            }
            run_scan(&config, &world, at)
        }
        Commands::Browse { world, at, radius } => {
            if radius.is_some() {
                config.scan.radius = radius;
            }
            run_browse(&config, cli.config.as_deref(), &world, at)
        }
        Commands::CheckWorld { file } => check_world(&file),
    }
}

fn scan_world(config: &Config, world: &WorldSnapshot, at: GridPos) -> Result<ScanResult> {
    let scanner = Scanner::new(&config.scan).context("Invalid [scan] settings")?;
    Ok(scanner.scan(at, world)?)
}

fn run_scan(config: &Config, path: &Path, at: GridPos) -> Result<()> {
    let world = WorldSnapshot::load(path)?;
    let result = scan_world(config, &world, at)?;

    if result.is_empty() {
        println!("Nothing found around {}.", at);
        return Ok(());
    }
    for node in &result.categories {
        println!("{}", colony_access::format::category(node));
        for sub in &node.subcategories {
            println!("  {}", colony_access::format::subcategory(sub));
            for item in &sub.items {
                println!("    {}", colony_access::format::scan_item(item));
            }
        }
    }
    Ok(())
}

fn check_world(path: &Path) -> Result<()> {
    let world = WorldSnapshot::load(path)?;
    let (width, height) = world.bounds();
    println!("{}: {}x{} map", path.display(), width, height);
    println!("  {} entities", world.entities.len());
    println!("  {} terrain cells", world.cells.len());

    let stray = world
        .entities
        .iter()
        .filter(|e| !world.contains(e.pos))
        .count();
    if stray > 0 {
        eprintln!("  {} entities lie outside the map", stray);
    }
    let fogged = world.entities.iter().filter(|e| e.fogged).count();
    println!("  {} entities under fog", fogged);
    Ok(())
}

/// Cursor shared between the browse loop and the scanner menu
#[derive(Clone)]
struct SharedCursor(Rc<Cell<GridPos>>);

impl CursorControl for SharedCursor {
    fn jump_to(&mut self, pos: GridPos) -> Result<()> {
        self.0.set(pos);
        Ok(())
    }
}

/// Speech, clipboard, stdout and sound cues
struct Outputs {
    speaker: Speaker,
    clipboard: Option<AnnouncementClipboard>,
    echo: bool,
    cues: CuePlayer,
}

impl Feedback for Outputs {
    fn announce(&mut self, text: &str) {
        if let Err(e) = self.speaker.speak(text) {
            tracing::warn!("Speech failed: {:#}", e);
        }
        if let Some(clipboard) = self.clipboard.as_mut() {
            if let Err(e) = clipboard.copy(text) {
                tracing::warn!("Clipboard copy failed: {:#}", e);
            }
        }
        if self.echo {
            // Raw mode: carriage return needed
            print!("{}\r\n", text);
            let _ = std::io::stdout().flush();
        }
    }

    fn cue(&mut self, cue: Cue) {
        if let Err(e) = self.cues.play(cue) {
            tracing::warn!("Cue '{}' failed: {:#}", cue.name(), e);
        }
    }
}

/// Restores the terminal however the browse loop ends
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

const BROWSE_HELP: &str = "s to scan, i to inspect, r to repeat, m to mute speech, c for sound cues, \
     plus and minus for speech rate, brackets for volume, q to quit. Arrow keys move the cursor.";

const RATE_STEP: f32 = 0.1;
const VOLUME_STEP: f32 = 0.1;

fn run_browse(
    config: &Config,
    config_path: Option<&Path>,
    path: &Path,
    at: GridPos,
) -> Result<()> {
    let world = Rc::new(WorldSnapshot::load(path)?);
    let cursor = SharedCursor(Rc::new(Cell::new(at)));

    let sounds_dir = sound::ensure_sounds_directory(&Config::sounds_dir()?)?;
    let outputs = Outputs {
        speaker: Speaker::new(&config.tts),
        clipboard: config.output.clipboard.then(AnnouncementClipboard::new),
        echo: config.output.echo,
        cues: CuePlayer::new(&config.sound, &sounds_dir),
    };
    let mut router = InputRouter::new(config.keybinds.clone(), outputs);
    let hints = router.hints();

    let _raw = RawModeGuard::enable()?;
    router.feedback_mut().announce(BROWSE_HELP);
    open_scanner(&mut router, config, &world, &cursor, &hints);

    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            break;
        }
        if router.route_key(key) {
            continue;
        }
        if !handle_map_key(key, &mut router, config, &world, &cursor, &hints) {
            break;
        }
    }

    router.close_all();
    tracing::info!("Browse ended at {}", cursor.0.get());
    save_speech_settings(config, config_path, &router.feedback().speaker)
}

/// Keep rate and volume changes made while browsing
fn save_speech_settings(config: &Config, path: Option<&Path>, speaker: &Speaker) -> Result<()> {
    if speaker.rate() == config.tts.rate && speaker.volume() == config.tts.volume {
        return Ok(());
    }
    let mut updated = config.clone();
    updated.tts.rate = speaker.rate();
    updated.tts.volume = speaker.volume();
    updated.save(path).context("Failed to save speech settings")?;
    tracing::info!("Saved speech rate {} and volume {}", speaker.rate(), speaker.volume());
    Ok(())
}

/// Keys while no menu is open. Returns false to quit.
fn handle_map_key(
    key: KeyEvent,
    router: &mut InputRouter<Outputs>,
    config: &Config,
    world: &Rc<WorldSnapshot>,
    cursor: &SharedCursor,
    hints: &Hints,
) -> bool {
    let pos = cursor.0.get();
    let step = |dx: i32, dy: i32| GridPos::new(pos.x + dx, pos.y + dy);
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return false,
        KeyCode::Char('s') => open_scanner(router, config, world, cursor, hints),
        KeyCode::Char('i') => {
            let menu = InspectionMenu::new(pos, world.clone()).with_hints(hints.clone());
            router.open(Box::new(Navigator::new(menu).with_hints(hints.clone())));
        }
        KeyCode::Char('r') => {
            if let Err(e) = router.feedback_mut().speaker.repeat_last() {
                tracing::warn!("Repeat failed: {:#}", e);
            }
        }
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char('-') => {
            let delta = if key.code == KeyCode::Char('-') { -RATE_STEP } else { RATE_STEP };
            let speaker = &mut router.feedback_mut().speaker;
            let text = match speaker.adjust_rate(delta) {
                Ok(()) => format!("Rate {:.1}.", speaker.rate()),
                Err(e) => format!("{:#}", e),
            };
            router.feedback_mut().announce(&text);
        }
        KeyCode::Char(']') | KeyCode::Char('[') => {
            let delta = if key.code == KeyCode::Char('[') { -VOLUME_STEP } else { VOLUME_STEP };
            let speaker = &mut router.feedback_mut().speaker;
            let text = match speaker.adjust_volume(delta) {
                Ok(()) => format!("Volume {:.0} percent.", speaker.volume() * 100.0),
                Err(e) => format!("{:#}", e),
            };
            router.feedback_mut().announce(&text);
        }
        KeyCode::Char('c') => {
            let on = router.feedback_mut().cues.toggle();
            let text = format!("Sound cues {}.", colony_access::format::on_off(on));
            router.feedback_mut().announce(&text);
        }
        KeyCode::Char('m') => {
            let muted = router.feedback_mut().speaker.toggle_mute();
            let text = format!("Speech {}.", colony_access::format::on_off(!muted));
            router.feedback_mut().announce(&text);
        }
        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
            let next = match key.code {
                KeyCode::Up => step(0, 1),
                KeyCode::Down => step(0, -1),
                KeyCode::Left => step(-1, 0),
                _ => step(1, 0),
            };
            if world.contains(next) {
                cursor.0.set(next);
                router.feedback_mut().cue(Cue::Move);
                router.feedback_mut().announce(&next.to_string());
            } else {
                router.feedback_mut().cue(Cue::Reject);
            }
        }
        _ => {}
    }
    true
}

fn open_scanner(
    router: &mut InputRouter<Outputs>,
    config: &Config,
    world: &WorldSnapshot,
    cursor: &SharedCursor,
    hints: &Hints,
) {
    match scan_world(config, world, cursor.0.get()) {
        Ok(result) => {
            let menu = ScanMenu::new(result, Box::new(cursor.clone()));
            router.open(Box::new(Navigator::new(menu).with_hints(hints.clone())));
        }
        Err(e) => {
            tracing::warn!("Scan failed: {:#}", e);
            router.feedback_mut().cue(Cue::Reject);
            router.feedback_mut().announce(&format!("{:#}", e));
        }
    }
}
