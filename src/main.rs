use anyhow::{Context, Result};
use clap::Parser;
use hikari_compressor::cli::{Args, Commands, SettingsArgs};
use hikari_compressor::logger::{is_quiet, set_verbosity, Verbosity};
use hikari_compressor::utils::{create_progress_bar, create_progress_spinner, format_file_size};
use hikari_compressor::{
    collect_image_files, error, info, print_image_info, success, verbose, warn, BatchEvent,
    BatchReport, CompressionSettings, Session,
};
use indicatif::ProgressBar;
use std::path::PathBuf;

fn main() -> Result<()> {
    let args = Args::parse();
    set_verbosity(Verbosity::from_flags(args.quiet, args.verbose));

    match args.command {
        Commands::Compress {
            inputs,
            output,
            recursive,
            settings,
        } => run_compress(&inputs, output, recursive, &settings),
        Commands::Estimate {
            inputs,
            recursive,
            settings,
        } => run_estimate(&inputs, recursive, &settings),
        Commands::Info { input, settings } => {
            print_image_info(&input, &settings.to_settings())
                .with_context(|| format!("Failed to read {:?}", input))
        }
    }
}

fn print_settings(settings: &CompressionSettings) {
    info!(
        "⚙️  Quality: {} | Format: {} | Engine: {}",
        settings.quality, settings.format, settings.engine
    );
    if settings.resize.enabled {
        info!("📐 Resize: {}%", settings.resize.scale);
    }
}

fn run_compress(
    inputs: &[String],
    output: Option<PathBuf>,
    recursive: bool,
    settings_args: &SettingsArgs,
) -> Result<()> {
    let settings = settings_args.to_settings();
    let files = collect_image_files(inputs, recursive).context("Failed to collect input files")?;

    let mut session = Session::with_settings(settings);
    if let Some(dir) = output {
        session.set_output_dir(dir)?;
    }
    session.load(files)?;

    if session.catalog().is_empty() {
        warn!("No images to compress. Add image files, folders or patterns first");
    }

    info!("🚀 Compressing {} images", session.catalog().len());
    print_settings(session.settings());
    if let Some(dir) = session.resolved_output_dir() {
        info!("📁 Output: {:?}", dir);
    }

    let job = session
        .start_compression()
        .context("Could not start compression")?;

    let progress = if is_quiet() {
        ProgressBar::hidden()
    } else {
        create_progress_bar(session.catalog().len() as u64)
    };

    for event in job.events() {
        match event {
            BatchEvent::Started { .. } => {}
            BatchEvent::ItemDone { item, .. } => {
                if let Some(name) = item.destination.file_name() {
                    progress.set_message(name.to_string_lossy().into_owned());
                }
            }
            BatchEvent::ItemFailed(failed) => {
                if let Some(name) = failed.source.file_name() {
                    progress.set_message(format!("failed: {}", name.to_string_lossy()));
                }
            }
            BatchEvent::Progress { completed, .. } => progress.set_position(completed as u64),
            BatchEvent::Completed(_) => progress.finish_with_message("done"),
        }
    }

    let report = job.wait()?;
    print_summary(&report);
    Ok(())
}

fn print_summary(report: &BatchReport) {
    info!("\n📊 Batch Compression Summary:");
    info!("  📁 Compressed: {} of {}", report.succeeded.len(), report.total);
    info!(
        "  📊 Total original size: {}",
        format_file_size(report.total_original_size())
    );
    info!(
        "  📊 Total compressed size: {}",
        format_file_size(report.total_compressed_size())
    );
    info!("  🎯 Overall compression ratio: {:.1}%", report.compression_ratio());
    info!("  ⏱️  Total time: {:.2?}", report.elapsed);

    for item in &report.succeeded {
        verbose!(
            "{:?} -> {:?} ({} -> {})",
            item.source,
            item.destination,
            format_file_size(item.original_size),
            format_file_size(item.compressed_size)
        );
    }

    if report.cancelled {
        warn!("Batch was cancelled before all images were processed");
    }

    if report.failed.is_empty() {
        if !report.cancelled {
            success!("Image compression completed successfully!");
        }
    } else {
        warn!("Failed files: {}", report.failed.len());
        for failed in &report.failed {
            warn!("  {:?}: {}", failed.source, failed.error);
        }
    }
}

fn run_estimate(inputs: &[String], recursive: bool, settings_args: &SettingsArgs) -> Result<()> {
    let files = collect_image_files(inputs, recursive).context("Failed to collect input files")?;

    let mut session = Session::with_settings(settings_args.to_settings());
    session.load(files)?;
    print_settings(session.settings());

    let spinner = if is_quiet() {
        ProgressBar::hidden()
    } else {
        create_progress_spinner("Reading image headers...")
    };
    let estimates = session.estimates();
    spinner.finish_and_clear();

    let mut total_original = 0;
    let mut total_estimated = 0;
    for (path, estimate) in estimates {
        match estimate {
            Ok(estimate) => {
                total_original += estimate.original_size;
                total_estimated += estimate.estimated_size;
                println!(
                    "📄 {}: {} -> {}",
                    path.display(),
                    format_file_size(estimate.original_size),
                    estimate
                );
            }
            Err(e) => error!("{}: {}", path.display(), e),
        }
    }

    info!(
        "\n🎯 Total: {} -> {} (advisory estimate)",
        format_file_size(total_original),
        format_file_size(total_estimated)
    );
    Ok(())
}
