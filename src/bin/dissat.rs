//! Command-line front end (§6.5): reads either a DIMACS CNF file or a
//! parenthesized propositional formula (dispatched by file extension, the
//! way `original_source/cdcl.py`'s `__main__` does), runs the solver with
//! the user's chosen policies, and prints the verdict plus the read-only
//! counters.
use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use dissat::{DecisionHeuristic, DeletionPolicy, RestartPolicy, Solver};

/// A CDCL Boolean satisfiability solver.
#[derive(Debug, Parser)]
#[command(name = "dissat", version)]
struct Cli {
    /// Input file (`.cnf` for DIMACS, `.sat` for the propositional/Tseitin
    /// front end). Reads stdin as DIMACS if omitted.
    input: Option<PathBuf>,

    /// Restart policy.
    #[arg(long, default_value = "none")]
    restart: RestartPolicy,

    /// Learned-clause deletion policy.
    #[arg(long, default_value = "none")]
    deletion: DeletionPolicy,

    /// Decision heuristic.
    #[arg(long, default_value = "vsids")]
    decision: DecisionHeuristic,

    /// When reading a propositional formula, keep only the left-to-right
    /// half of each Tseitin biconditional.
    #[arg(long)]
    implications_only: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let is_sat_formula = cli
        .input
        .as_deref()
        .and_then(|p| p.extension())
        .is_some_and(|ext| ext == "sat");

    let text = match &cli.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
            buf
        }
    };

    let (clauses, names): (Vec<Vec<i32>>, Vec<(String, dissat::Var)>) = if is_sat_formula {
        let (clauses, vars) = dissat::tseitin::encode(&text, cli.implications_only)
            .context("failed to parse propositional formula")?;
        (clauses, vars.named_variables().to_vec())
    } else {
        let clauses = dissat::dimacs::parse(&text).context("failed to parse DIMACS input")?;
        (clauses, Vec::new())
    };

    let mut solver = Solver::new(clauses, cli.restart, cli.deletion, cli.decision, Vec::<i32>::new());

    match solver.solve() {
        dissat::Result::Unsat(_) => {
            println!("UNSAT");
        }
        dissat::Result::Sat(model) => {
            println!("SAT");
            if names.is_empty() {
                let mut assignment = model.as_vec();
                assignment.sort_by_key(|l| l.abs());
                println!("{assignment:?}");
            } else {
                print_named_assignment(&model, &names);
            }
        }
    }

    let stats = solver.stats();
    println!();
    println!("decisions: {}", stats.decisions);
    println!("propagations: {}", stats.propagations);
    println!("checked clauses: {}", stats.checked_clauses);
    println!("conflicts: {}", stats.conflicts);
    println!("restarts: {}", stats.restarts);

    Ok(())
}

fn print_named_assignment(model: &dissat::Model, names: &[(String, dissat::Var)]) {
    let positive: Vec<&str> = names
        .iter()
        .filter(|(_, v)| model.lit(v.get() as i32))
        .map(|(name, _)| name.as_str())
        .collect();
    let negative: Vec<String> = names
        .iter()
        .filter(|(_, v)| !model.lit(v.get() as i32))
        .map(|(name, _)| format!("-{name}"))
        .collect();
    println!("{positive:?} {negative:?}");
}
