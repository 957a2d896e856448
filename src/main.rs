use clap::Parser;
use mmp_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => result,
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    eprintln!("Failed to listen for CTRL+C: {}", e);
                }
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(mmp_processor::Error::processing_interrupted(
                    "Processing interrupted by user",
                ))
            }
        }
    });

    match result {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("MMP Processor - McLane Moored Profiler mask reconciliation and QC");
    println!("=================================================================");
    println!();
    println!("Flag backtrack episodes, synchronize CTD and engineering masks and void");
    println!("short or shallow profiles in imported moored profiler deployments.");
    println!();
    println!("USAGE:");
    println!("    mmp-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    process      Run the processing pipeline on a deployment JSON file");
    println!("    summarize    Show per-profile mask coverage and status");
    println!("    help         Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Process a deployment with the default configuration:");
    println!("    mmp-processor process --input deployment.json --output processed.json");
    println!();
    println!("    # Flag whole profiles on backtrack and write a report:");
    println!("    mmp-processor process -i deployment.json -o processed.json \\");
    println!("                          --backtrack-code 1 --report report.json");
    println!();
    println!("    # Inspect the result:");
    println!("    mmp-processor summarize --input processed.json");
    println!();
    println!("For detailed help on any command, use:");
    println!("    mmp-processor <COMMAND> --help");
}
