//! spcp - Sparse-aware Parallel Copy
//!
//! A fast recursive copy command powered by sparcp. Zero-filled regions
//! of source files are reproduced as holes in the destination.

use clap::Parser;
use indicatif::ProgressBar;
use sparcp::{CopyOptions, CopyStats, Error, create_progress_bar, utils::path::destination_root};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// spcp - Fast sparse-aware parallel copy
///
/// Copies SOURCE (a file or directory tree) into DESTINATION, creating
/// DESTINATION/<basename of SOURCE>. Zero-filled regions become holes.
#[derive(Parser, Debug)]
#[command(name = "spcp", version, about, long_about = None)]
struct Args {
    /// Source file or directory
    source: PathBuf,

    /// Destination directory (the copy is created inside it)
    destination: PathBuf,

    /// Sparse detection block size in bytes (0 disables sparse copying)
    #[arg(value_name = "SPARSE_BLOCK_SIZE")]
    sparse_block_size: Option<usize>,

    /// Number of copy worker threads (default: 2x available parallelism)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Suppress the progress bar and the summary
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Do not replicate file permissions
    #[arg(long)]
    no_perms: bool,

    /// Call fsync after each file (safer but slower)
    #[arg(long)]
    fsync: bool,
}

fn main() {
    let args = Args::parse();
    if let Err(error) = run(&args) {
        if let Error::Cancelled {
            files_copied,
            bytes_copied,
            ..
        } = error
        {
            eprintln!(
                "Cancelled after copying {} files ({}).",
                files_copied,
                format_bytes(bytes_copied)
            );
            std::process::exit(130);
        }
        eprintln!("[ERROR] {error}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> sparcp::Result<()> {
    let dest_root = destination_root(&args.source, &args.destination);

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel_clone = cancel.clone();
        ctrlc::set_handler(move || {
            if cancel_clone.load(Ordering::Relaxed) {
                eprintln!("\nForce quit.");
                std::process::exit(130);
            }
            cancel_clone.store(true, Ordering::Relaxed);
            eprintln!("\nCancelling... finishing in-flight files.");
        })
        .ok();
    }

    let mut options = CopyOptions::default().with_cancel_token(cancel);
    if let Some(size) = args.sparse_block_size {
        options = options.with_sparse_block_size(size);
    }
    if let Some(jobs) = args.jobs {
        options = options.with_workers(jobs);
    }
    if args.no_perms {
        options = options.without_permissions();
    }
    if args.fsync {
        options = options.with_fsync();
    }

    let mut bar: Option<ProgressBar> = None;
    if !args.quiet {
        println!("Copy from: {}", args.source.display());
        println!("Copy to:   {}", dest_root.display());
        if options.sparse_block_size > 0 {
            println!("Sparse block size: {} bytes", options.sparse_block_size);
        } else {
            println!("Sparse copying disabled");
        }
        options = options.with_warn_handler(|msg| eprintln!("warning: {msg}"));

        let pb = create_progress_bar();
        let pb_handle = pb.clone();
        options = options.with_progress_handler(Arc::new(move |pct| {
            pb_handle.set_position(u64::from(pct));
        }));
        bar = Some(pb);
    }

    let result = sparcp::copy(&args.source, &dest_root, &options);
    if let Some(pb) = bar {
        pb.finish_and_clear();
    }

    let stats = result?;
    if !args.quiet {
        print_stats(&stats);
    }
    Ok(())
}

fn print_stats(stats: &CopyStats) {
    let mut parts = vec![];
    if stats.files_copied > 0 {
        parts.push(format!("{} files", stats.files_copied));
    }
    if stats.dirs_created > 0 {
        parts.push(format!("{} dirs", stats.dirs_created));
    }
    if parts.is_empty() {
        println!("Nothing to copy");
    } else {
        println!(
            "Copied {} ({}) in {:.2?}",
            parts.join(", "),
            format_bytes(stats.bytes_copied),
            stats.duration
        );
    }
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
