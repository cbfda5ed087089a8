// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
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


use clap::Parser;
use log::{error, info};
use psx_gpu::core::config::Config;
use psx_gpu::core::error::Result;
use psx_gpu::core::stream;
use psx_gpu::core::system::{RunReport, System};
use std::path::PathBuf;

/// Address the command stream is laid out at for --dma
const DMA_STREAM_ADDRESS: u32 = 0x0001_0000;

/// Replay a GP0 command stream through the PSX GPU pipeline
#[derive(Parser)]
#[command(name = "psx-gpu")]
#[command(about = "PlayStation GPU command stream player", long_about = None)]
struct Args {
    /// Text file of hexadecimal GP0 words
    stream: PathBuf,

    /// TOML configuration file (defaults to $PSX_GPU_CONFIG)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Send the stream over DMA channel 2 instead of writing GP0 directly
    #[arg(long)]
    dma: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Write VRAM to this file as raw little-endian 16-bit pixels
    #[arg(short = 'd', long)]
    dump: Option<PathBuf>,
}

fn main() {
    // A missing .env is fine
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        error!("{}", e);
        eprintln!("psx-gpu: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config_path = args
        .config
        .clone()
        .or_else(|| std::env::var_os("PSX_GPU_CONFIG").map(PathBuf::from));
    let config = match &config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    env_logger::Builder::new()
        .filter_level(config.log_filter()?)
        .parse_default_env()
        .init();

    info!("psx-gpu v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &config_path {
        info!("Using config {}", path.display());
    }

    let words = stream::load_words(&args.stream)?;
    let mut system = System::new(&config)?;

    if args.dma {
        info!("Sending {} words over DMA", words.len());
        system.send_via_dma(&words, DMA_STREAM_ADDRESS)?;
    } else {
        info!("Writing {} words to GP0", words.len());
        system.submit_gp0(&words)?;
    }

    if !system.gpu().borrow().is_idle() {
        log::warn!("Stream ended in the middle of a command");
    }

    let report = system.report();
    if args.json {
        let text = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
        println!("{}", text);
    } else {
        print_summary(&report);
    }

    if let Some(path) = &args.dump {
        let bytes = system.gpu().borrow().vram().to_le_bytes();
        std::fs::write(path, &bytes)?;
        info!("VRAM dumped to {} ({} bytes)", path.display(), bytes.len());
    }

    Ok(())
}

fn print_summary(report: &RunReport) {
    let gpu = &report.gpu;
    println!("Words:       {}", gpu.words);
    println!("Commands:    {}", gpu.commands);
    println!("Dispatches:  {}", gpu.dispatches);
    println!("Discarded:   {}", gpu.discarded);
    println!(
        "Pixels:      {} written, {} suppressed",
        gpu.pixels.written, gpu.pixels.suppressed
    );
    println!("GPUSTAT:     0x{:08X}", report.gpustat);
    println!("VRAM:        0x{:016X}", report.vram_checksum);
    println!("DMA done:    {:?}", report.dma_completions);
    println!("DMA IRQs:    {}", report.irq_count);
}
