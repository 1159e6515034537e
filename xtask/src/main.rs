// Copyright 2025 eraflo
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

// Build-time tasks for the sprite pipeline.
// Run with: cargo xtask <command>

mod commands;
mod helpers;

use clap::{Parser, Subcommand};
use commands::sprites::{PackArgs, SplitArgs};
use helpers::print_error;

#[derive(Parser)]
#[command(name = "xtask", version, about = "Sprite build automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Sprite chunk pipeline.
    #[command(subcommand)]
    Sprites(SpriteCommand),
}

#[derive(Subcommand)]
enum SpriteCommand {
    /// Split master sprites into chunk files and update `Sprites.toml`.
    Split(SplitArgs),
    /// Pack every chunk listed in `Sprites.toml` into `data.pack` + `index.bin`.
    Pack(PackArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Command::Sprites(SpriteCommand::Split(args))) => commands::sprites::split(&args),
        Some(Command::Sprites(SpriteCommand::Pack(args))) => commands::sprites::pack(&args),
        None => {
            helpers::print_custom_help();
            Ok(())
        }
    };

    if let Err(e) = result {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
