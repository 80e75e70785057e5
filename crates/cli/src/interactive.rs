//! Interactive shell.
//!
//! A line-oriented menu for building caches and simulating traces:
//!
//! ```text
//! help    prints the help message
//! q       quits the interactive shell
//! n       creates a new cache
//! l       lists the caches created so far
//! s       simulates a cache on a trace
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use tracing::info;

use cachesim_core::config::CacheConfig;
use cachesim_core::sim::Simulator;

use crate::{CliError, build_sinks, deliver, load_trace};

const HELP: &str = "
    help    prints the help message
    q       quits the interactive shell
    n       creates a new cache
    l       lists the caches created so far
    s       simulate a cache
";

/// Runs the shell on stdin/stdout until `q` or end of input.
pub(crate) fn run(traces: Vec<PathBuf>, log: Option<PathBuf>) -> Result<(), CliError> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(stdin.lock(), stdout.lock(), traces, log);
    shell.run()
}

/// Shell state: the caches built so far and the traces on offer.
pub(crate) struct Shell<R, W> {
    input: R,
    out: W,
    traces: Vec<PathBuf>,
    log: Option<PathBuf>,
    caches: Vec<Simulator>,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub(crate) fn new(input: R, out: W, traces: Vec<PathBuf>, log: Option<PathBuf>) -> Self {
        Self {
            input,
            out,
            traces,
            log,
            caches: Vec::new(),
        }
    }

    /// Prints `prompt` and reads one trimmed line. `None` at end of input.
    fn prompt(&mut self, prompt: &str) -> Result<Option<String>, CliError> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    /// Prompts until a number is entered. `None` at end of input.
    fn prompt_number(&mut self, prompt: &str) -> Result<Option<usize>, CliError> {
        loop {
            let Some(answer) = self.prompt(prompt)? else {
                return Ok(None);
            };
            match answer.parse() {
                Ok(n) => return Ok(Some(n)),
                Err(_) => writeln!(self.out, "please enter a number")?,
            }
        }
    }

    pub(crate) fn run(&mut self) -> Result<(), CliError> {
        writeln!(
            self.out,
            "Welcome to the interactive shell. type \"help\" for a list of commands"
        )?;
        while let Some(command) = self.prompt(">")? {
            match command.to_lowercase().as_str() {
                "q" => break,
                "" => {}
                "help" => write!(self.out, "{HELP}")?,
                "n" => self.new_cache()?,
                "l" => self.list_caches()?,
                "s" => self.simulate()?,
                other => writeln!(self.out, "unknown command {other:?}; type \"help\"")?,
            }
        }
        Ok(())
    }

    fn new_cache(&mut self) -> Result<(), CliError> {
        writeln!(self.out, "Ok, let's create a cache.")?;
        let Some(sets) = self.prompt_number("number of sets?: ")? else {
            return Ok(());
        };
        let Some(ways) = self.prompt_number("number of ways?: ")? else {
            return Ok(());
        };

        let config = CacheConfig {
            ways,
            sets,
            ..CacheConfig::default()
        };
        match config.geometry() {
            Ok(geometry) => {
                info!(%geometry, "cache created");
                writeln!(self.out, "created cache {}: {geometry}", self.caches.len())?;
                self.caches.push(Simulator::new(geometry));
            }
            Err(e) => writeln!(
                self.out,
                "sorry, something went wrong with those parameters ({e}). try again"
            )?,
        }
        Ok(())
    }

    fn list_caches(&mut self) -> Result<(), CliError> {
        if self.caches.is_empty() {
            writeln!(self.out, "no caches yet; use \"n\" to create one")?;
        }
        for (i, sim) in self.caches.iter().enumerate() {
            let g = sim.geometry();
            writeln!(self.out, "{i}\tcache: sets({}) ways({})", g.sets(), g.ways())?;
        }
        Ok(())
    }

    fn simulate(&mut self) -> Result<(), CliError> {
        if self.caches.is_empty() {
            writeln!(self.out, "no caches yet; use \"n\" to create one")?;
            return Ok(());
        }
        if self.traces.is_empty() {
            writeln!(self.out, "no traces given; restart with --trace <file>")?;
            return Ok(());
        }

        writeln!(self.out, "Which cache would you like to simulate?: ")?;
        self.list_caches()?;
        let Some(choice) = self.prompt_number(">")? else {
            return Ok(());
        };
        if choice >= self.caches.len() {
            writeln!(self.out, "no cache {choice}")?;
            return Ok(());
        }

        writeln!(self.out, "{}", "-".repeat(50))?;
        for (i, t) in self.traces.iter().enumerate() {
            writeln!(self.out, "{i}\t{}", t.display())?;
        }
        let Some(pick) = self.prompt_number("which memory trace would you like to simulate?: ")?
        else {
            return Ok(());
        };
        let Some(trace_path) = self.traces.get(pick).cloned() else {
            writeln!(self.out, "no trace {pick}")?;
            return Ok(());
        };

        writeln!(self.out, "simulating...")?;
        let outcome = load_trace(&trace_path).and_then(|(records, trace_id)| {
            self.caches[choice]
                .run(records, &trace_id)
                .map_err(CliError::from)
        });
        match outcome {
            Ok(summary) => {
                write!(self.out, "{summary}")?;
                let mut sinks = build_sinks(false, self.log.as_deref());
                deliver(&mut sinks, &summary)?;
            }
            // A bad trace should not end the session.
            Err(e) => writeln!(self.out, "simulation failed: {e}")?,
        }
        Ok(())
    }
}

impl<R, W> std::fmt::Debug for Shell<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("traces", &self.traces)
            .field("log", &self.log)
            .field("caches", &self.caches.len())
            .finish_non_exhaustive()
    }
}
