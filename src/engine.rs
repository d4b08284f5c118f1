// src/engine.rs
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};

use crate::bencode::{bvalue_to_json, json_to_bvalue, Decoder, Encoder};
use crate::config::{Config, DEFAULT_CONFIG_PATH};

#[derive(Debug, Parser)]
#[command(name = "cbencode", version, about = "Encode and decode bencode data")]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Decode a bencoded file and print it as JSON
    Decode {
        /// Input file, or `-` for stdin
        input: String,
    },
    /// Encode a JSON document as bencode
    Encode {
        /// JSON input file, or `-` for stdin
        input: String,
        /// Output file for the bencoded bytes
        #[arg(short, long)]
        output: PathBuf,
        /// Emit dictionary keys in sorted order
        #[arg(long)]
        sort_keys: bool,
    },
    /// Check that a file holds exactly one well-formed bencoded value
    Check {
        /// Input file, or `-` for stdin
        input: String,
    },
}

pub fn use_command(cli: Cli) -> Result<()> {
    let mut config = Config::load(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    match cli.command {
        Command::Decode { input } => {
            let buf = read_input(&input)?;
            let value = Decoder::new(config.decoder_config())
                .decode(&buf)
                .with_context(|| format!("decoding {}", input))?;
            println!("{}", serde_json::to_string(&bvalue_to_json(&value))?);
        }
        Command::Encode {
            input,
            output,
            sort_keys,
        } => {
            if sort_keys {
                config.sort_keys = true;
            }
            let buf = read_input(&input)?;
            let json: serde_json::Value =
                serde_json::from_slice(&buf).with_context(|| format!("parsing JSON from {}", input))?;
            let value = json_to_bvalue(&json)?;

            let file = File::create(&output)
                .with_context(|| format!("creating {}", output.display()))?;
            let bytes = Encoder::new(config.encoder_config()?)
                .encode(&value, file)
                .with_context(|| format!("writing {}", output.display()))?;
            info!("wrote {} bytes to {}", bytes.len(), output.display());
        }
        Command::Check { input } => {
            let buf = read_input(&input)?;
            let decoder = Decoder::new(config.decoder_config());
            let (consumed, value) = decoder
                .decode_prefix(&buf)
                .with_context(|| format!("checking {}", input))?;
            if consumed != buf.len() {
                warn!("{} holds {} bytes after its value", input, buf.len() - consumed);
                bail!(
                    "{}: valid {} in the first {} bytes, followed by {} trailing bytes",
                    input,
                    value.kind(),
                    consumed,
                    buf.len() - consumed
                );
            }
            println!("{}: valid {} ({} bytes)", input, value.kind(), consumed);
        }
    }
    Ok(())
}

fn read_input(input: &str) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    if input == "-" {
        io::stdin().read_to_end(&mut buf).context("reading stdin")?;
    } else {
        buf = fs::read(Path::new(input)).with_context(|| format!("reading {}", input))?;
    }
    Ok(buf)
}
