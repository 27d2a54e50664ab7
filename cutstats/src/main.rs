//! Enumerates the priority cuts of a random and-inverter graph and reports statistics.
use std::fmt::Write;

use clap::Parser;
use cutkit_aig::{
    random::{random_aig, RandomAigOptions},
    GraphView,
};
use cutkit_cuts::{AigCuts, CutOptions};
use rand::{rngs::SmallRng, SeedableRng};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of primary inputs of the generated graph.
    #[clap(long, default_value = "64")]
    inputs: usize,
    /// Number of AND nodes of the generated graph.
    #[clap(long, default_value = "10000")]
    ands: usize,
    /// Seed for the graph generator.
    #[clap(long, default_value = "0")]
    seed: u64,

    /// Maximal number of leaves per cut.
    #[clap(short = 'k', long, default_value = "4")]
    cut_size: usize,
    /// Maximal number of cuts kept per node.
    #[clap(long, default_value = "8")]
    priority: usize,
    /// Enumerate cuts on a pool of worker threads.
    #[clap(long)]
    parallel: bool,
    /// Number of worker threads, 0 uses all available cores.
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Print the cuts of every node.
    #[clap(short = 'v', long)]
    verbose: bool,
    /// Print the truth table of each cut when verbose.
    #[clap(short = 't', long)]
    truth_table: bool,
    /// Print the number of nodes in each cut's cone when verbose.
    #[clap(short = 'c', long)]
    cone_size: bool,
    /// Print the depth of each cut when verbose.
    #[clap(short = 'd', long)]
    depth: bool,
}

fn main() -> color_eyre::Result<()> {
    let args = Args::parse();

    color_eyre::install()?;
    cutkit_logger::setup();

    if args.inputs == 0 {
        color_eyre::eyre::bail!("the generated graph needs at least one input");
    }

    let mut rng = SmallRng::seed_from_u64(args.seed);
    let aig = random_aig(
        &mut rng,
        RandomAigOptions {
            inputs: args.inputs,
            ands: args.ands,
            ..RandomAigOptions::default()
        },
    );

    let cuts = AigCuts::new(
        &aig,
        CutOptions {
            cut_size: args.cut_size,
            priority: args.priority,
            parallel: args.parallel,
            threads: args.threads,
        },
    );

    log::info!(
        "found {} cuts in {:.2} secs ({} KB)",
        cuts.total_cut_count(),
        cuts.enumeration_time().as_secs_f64(),
        cuts.memory() >> 10
    );

    if !args.verbose {
        return Ok(());
    }

    for node in aig.nodes() {
        log::info!("node {} has {} cuts", node.index(), cuts.count(node));
        for cut in cuts.cuts(node) {
            let mut line = String::from("- {");
            for (i, leaf) in cut.leaves().iter().enumerate() {
                let sep = if i == 0 { "" } else { ", " };
                write!(line, "{sep}{}", leaf.index())?;
            }
            line.push('}');

            if args.cone_size {
                write!(line, " (size: {})", cuts.try_cone_size(node, cut.leaves())?)?;
            }
            if args.depth {
                write!(line, " (depth: {})", cuts.try_depth(node, cut.leaves())?)?;
            }
            if args.truth_table {
                write!(line, " {}", cuts.try_simulate(node, cut.leaves())?)?;
            }

            log::info!("{line}");
        }
    }

    Ok(())
}
