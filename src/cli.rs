use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::context::Overrides;

#[derive(Debug, Parser)]
#[command(
    name = "cybersaver",
    version,
    about = "Switch Cyberpunk 2077 save profiles through a directory junction"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Port for the local web UI")]
    pub port: Option<u16>,
    #[arg(long, global = true, help = "Game save folder to manage")]
    pub game_path: Option<PathBuf>,
    #[arg(long, global = true, help = "Folder holding the profiles")]
    pub profiles_dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Emit JSON output")]
    pub json: bool,
    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Verbose logging")]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            port: self.port,
            game_path: self.game_path.clone(),
            profiles_dir: self.profiles_dir.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the local web UI (default)
    Serve(ServeArgs),
    /// Show the active profile and paths
    Status,
    /// List profiles
    Profiles,
    /// List the saves of a profile
    Saves(ProfileArgs),
    /// Point the game save folder at a profile
    Load(ProfileArgs),
    /// Copy the current game saves into a profile
    Import(ProfileArgs),
}

#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    #[arg(long, help = "Do not open the browser on start")]
    pub no_browser: bool,
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[arg(help = "Profile name")]
    pub name: String,
}
