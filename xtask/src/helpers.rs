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

// ANSI color codes
pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const GREEN: &str = "\x1b[32m";
pub const RED: &str = "\x1b[31m";
pub const BLUE: &str = "\x1b[34m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

// Visual symbols
pub const CHECK: &str = "✓";
pub const CROSS: &str = "✗";
pub const GEAR: &str = "⚙";
pub const PACKAGE: &str = "📦";
pub const SCISSORS: &str = "✂";

pub const BANNER: &str = concat!(
    "\x1b[1m",
    "\x1b[36m", // BOLD, CYAN
    "╔═══════════════════════════════════════════════════════════╗\n",
    "║                    ",
    "⚙",
    " SIGIL SPRITES ",
    "⚙",
    "                      ║\n",
    "║                   Build Automation Tool                   ║\n",
    "╚═══════════════════════════════════════════════════════════╝",
    "\x1b[0m" // RESET
);

pub fn print_custom_help() {
    println!("{}", BANNER);
    println!(
        "\n{}{}Usage:{} cargo xtask sprites <command>\n",
        BOLD, YELLOW, RESET
    );
    println!("{}Available commands:{}", BOLD, RESET);
    println!(
        "  {} {} {}split{}  - Split master sprites into chunks and update Sprites.toml.",
        SCISSORS, BLUE, BOLD, RESET
    );
    println!(
        "  {} {} {}pack{}   - Pack the chunks of Sprites.toml into data.pack and index.bin.",
        PACKAGE, MAGENTA, BOLD, RESET
    );
    println!(
        "\n  {} Run {}cargo xtask sprites <command> --help{} for options.",
        GEAR, CYAN, RESET
    );
}

pub fn print_task_start(task_name: &str, emoji: &str, color: &str) {
    println!(
        "\n{}{}━━━ {} {} {}━━━{}",
        BOLD, color, emoji, task_name, emoji, RESET
    );
}

pub fn print_info(message: &str) {
    println!("{}💡 Info:{} {}", BOLD, RESET, message);
}

pub fn print_success(message: &str) {
    println!("{}{} {} {}{}", BOLD, GREEN, CHECK, message, RESET);
}

pub fn print_error(message: &str) {
    println!("{}{} {} {}{}", BOLD, RED, CROSS, message, RESET);
}
