use crate::formats::OutputFormat;
use crate::settings::{CompressionSettings, Engine, QualityTier, ResizeSetting};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "hikari",
    about = "Batch image compressor with quality tiers, format conversion and resizing",
    long_about = "hikari compresses a queue of images into JPEG, WebP or PNG copies. \
                  Each copy is named after its source plus the chosen quality tier and resize scale, \
                  so runs with different settings never overwrite each other.",
    version,
    after_help = "EXAMPLES:\n  \
    hikari compress photo.png scans/*.tiff -q medium -f webp\n  \
    hikari compress ./album -r -o ./compressed --resize 50\n  \
    hikari estimate ./album -q low -f webp\n  \
    hikari info photo.png -f png"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Only print errors")]
    pub quiet: bool,

    #[arg(short = 'v', long, global = true, help = "Print per-image details")]
    pub verbose: bool,
}

/// Settings flags shared by every subcommand
#[derive(ClapArgs, Debug, Clone)]
pub struct SettingsArgs {
    #[arg(
        short = 'q',
        long,
        default_value = "high",
        help = "Quality tier (low, medium, high, maximum)",
        long_help = "Quality tier mapped to the encoder quality: \
                     low=30, medium=60, high=80, maximum=95. PNG output is lossless and ignores it."
    )]
    pub quality: QualityTier,

    #[arg(
        short = 'f',
        long,
        default_value = "jpeg",
        help = "Output format (jpeg, webp, png)",
        long_help = "Output format. Transparent images written as JPEG are flattened onto white."
    )]
    pub format: OutputFormat,

    #[arg(
        short = 'e',
        long,
        default_value = "image",
        help = "Processing engine (image, oxipng)",
        long_help = "image uses the image crate codecs; oxipng additionally optimizes PNG output."
    )]
    pub engine: Engine,

    #[arg(
        long,
        value_name = "PERCENT",
        help = "Scale both dimensions to PERCENT of the original",
        long_help = "Resize by a percentage of the original size, truncated to whole pixels. \
                     A value that is not a positive number leaves the size unchanged."
    )]
    pub resize: Option<String>,
}

impl SettingsArgs {
    pub fn to_settings(&self) -> CompressionSettings {
        let resize = match &self.resize {
            Some(scale) => ResizeSetting::scaled(scale.clone()),
            None => ResizeSetting::disabled(),
        };
        CompressionSettings::new(self.quality, self.format, self.engine, resize)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Compress images into an output folder",
        long_about = "Compress every input in order. Inputs may be files, directories or glob patterns. \
                      Images that fail to decode or encode are reported and skipped."
    )]
    Compress {
        #[arg(required = true, help = "Image files, directories or glob patterns")]
        inputs: Vec<String>,

        #[arg(
            short = 'o',
            long,
            help = "Output folder (default: folder of the first image)"
        )]
        output: Option<PathBuf>,

        #[arg(short = 'r', long, help = "Walk directories recursively")]
        recursive: bool,

        #[command(flatten)]
        settings: SettingsArgs,
    },

    #[command(
        about = "Show estimated output sizes without compressing",
        long_about = "Print an advisory size estimate per image. Estimates use fixed per-tier and \
                      per-format factors; actual output sizes will differ."
    )]
    Estimate {
        #[arg(required = true, help = "Image files, directories or glob patterns")]
        inputs: Vec<String>,

        #[arg(short = 'r', long, help = "Walk directories recursively")]
        recursive: bool,

        #[command(flatten)]
        settings: SettingsArgs,
    },

    #[command(
        about = "Display image information",
        long_about = "Show size, dimensions, color type and what the given settings would produce."
    )]
    Info {
        #[arg(help = "Image file path to analyze")]
        input: PathBuf,

        #[command(flatten)]
        settings: SettingsArgs,
    },
}
