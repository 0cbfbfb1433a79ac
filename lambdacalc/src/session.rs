use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::Path,
};

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, warn};

use crate::{
    command::Command,
    config::Config,
    env::Env,
    error::{Error, Result},
    hygiene::{self, Suffixes},
    reduce,
    term::Term,
};

/// Calls `f` until it reports no change, at most `bound` times. Returns the
/// number of calls that changed something.
fn repeat(what: &str, bound: usize, mut f: impl FnMut() -> bool) -> usize {
    let steps = (0..bound).take_while(|_| f()).count();
    if bound > 0 && steps == bound {
        warn!("{what}: stopped after {bound} steps");
    } else {
        debug!("{what}: {steps} steps");
    }
    steps
}

/// Definitions and settings shared by every command of one interactive run.
pub struct Session<W = io::Stdout> {
    env: Env,
    suffixes: Suffixes<StdRng>,
    config: Config,
    out: W,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self::with_output(config, io::stdout())
    }
}

impl<W: Write> Session<W> {
    /// `show` writes its listing to `out`.
    pub fn with_output(config: Config, out: W) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            env: Env::new(),
            suffixes: Suffixes::new(rng, config.suffix_len),
            config,
            out,
        }
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Parses and runs one line. `load` yields no term.
    pub fn execute(&mut self, line: &str) -> Result<Option<Term>> {
        let command = Command::parse(line)?;
        self.run(command)
    }

    pub fn run(&mut self, command: Command) -> Result<Option<Term>> {
        debug!("run: {command}");
        let term = match command {
            Command::Reduce(bound, inner) => {
                let bound = bound.unwrap_or(self.config.reduce_bound);
                let Some(mut term) = self.run(*inner)? else {
                    return Ok(None);
                };
                repeat("br", bound, || reduce::step(&mut term));
                term
            }
            Command::Expand(bound, inner) => {
                let bound = bound.unwrap_or(self.config.expand_bound);
                let Some(mut term) = self.run(*inner)? else {
                    return Ok(None);
                };
                let (env, suffixes) = (&self.env, &mut self.suffixes);
                repeat("ex", bound, || hygiene::expand(&mut term, env, &mut *suffixes));
                term
            }
            Command::Contract(bound, inner) => {
                let bound = bound.unwrap_or(self.config.contract_bound);
                let Some(mut term) = self.run(*inner)? else {
                    return Ok(None);
                };
                let env = &self.env;
                repeat("con", bound, || hygiene::contract(&mut term, env));
                term
            }
            Command::Define(name, inner) => {
                let Some(term) = self.run(*inner)? else {
                    return Ok(None);
                };
                debug!("def {name} = {term}");
                self.env.insert(name, term);
                Term::var("Created Variable")
            }
            Command::Show => {
                self.out.write_all(self.env.listing().as_bytes())?;
                self.out.flush()?;
                Term::var("Variable Table")
            }
            Command::Load(path) => {
                self.load(&path)?;
                return Ok(None);
            }
            Command::Term(term) => term,
        };
        Ok(Some(term))
    }

    /// Runs every non-blank line of `path` in order, discarding the results.
    /// Stops at the first line that fails.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let load_error = |source| Error::Load {
            path: path.to_owned(),
            source,
        };
        let file = File::open(path).map_err(load_error)?;
        debug!("load: {}", path.display());
        for (i, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(load_error)?;
            if line.trim().is_empty() {
                continue;
            }
            self.execute(&line).map_err(|source| Error::Script {
                path: path.to_owned(),
                line: i + 1,
                text: line.clone(),
                source: source.into(),
            })?;
        }
        Ok(())
    }
}
