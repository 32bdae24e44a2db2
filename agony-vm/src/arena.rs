//! # Agony Arena
//!
//! Several programs ("warriors") share one core and take turns, one
//! instruction each, until at most one is left running or the round's cycle
//! limit is reached. Survivors split the round's reward; scores accumulate
//! over a fixed number of rounds.
//!
//! ## Rounds
//!
//! 1. The core is zeroed.
//! 2. The first agent starts at the anchor offset; every other agent starts
//!    at a random free offset. Each start reserves a window of
//!    `max_length + separation` cells on both sides, so no two programs can
//!    be loaded on top of each other.
//! 3. Agents are stepped round-robin. The starting agent rotates by one
//!    every round so no agent always moves first.
//! 4. An agent that halts (by `$` or an unmatched bracket) is dead for the
//!    rest of the round.
//!
//! The arena has no I/O: `.`, `,` and `*` do nothing here.

use crate::engine::{self, Registers, Status};
use crate::error::{self, Error, Result};
use crate::host::ArenaHost;
use crate::loader;
use crate::memory::Core;
use crate::opcode::Program;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Start offset of the first agent
pub const ANCHOR_OFFSET: usize = 0;

/// Arena configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Number of cells in the shared core
    pub core_size: usize,
    /// Minimum gap kept free between two agents' programs
    pub separation: usize,
    /// Longest accepted program, in source characters
    pub max_length: usize,
    /// Turn limit per round
    pub max_cycles: u64,
    /// Number of rounds in a battle
    pub rounds: u32,
    /// Seed for placement; `None` seeds from system entropy
    pub seed: Option<u64>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            core_size: 8000,
            separation: 100,
            max_length: 100,
            max_cycles: 10_000,
            rounds: 10_000,
            seed: None,
        }
    }
}

impl ArenaConfig {
    /// Parse a JSON configuration; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            error::parse_error(format!("invalid arena config: {}", e))
                .with_operation("arena::config")
                .set_source(e)
        })
    }

    /// Cells reserved on each side of an agent's start offset
    /// Saturates instead of overflowing; `validate` rejects such configs.
    pub fn reach(&self) -> usize {
        self.max_length.saturating_add(self.separation)
    }

    /// Check the configuration
    pub fn validate(&self) -> Result<()> {
        if self.core_size == 0 {
            return Err(error::config_invalid("core_size", "core size must be nonzero")
                .with_operation("arena::validate"));
        }
        if self.max_length == 0 {
            return Err(error::config_invalid("max_length", "max length must be nonzero")
                .with_operation("arena::validate"));
        }
        if self.rounds == 0 {
            return Err(error::config_invalid("rounds", "a battle needs at least one round")
                .with_operation("arena::validate"));
        }
        let span = self
            .max_length
            .checked_add(self.separation)
            .and_then(|reach| reach.checked_mul(2));
        if span.map_or(true, |span| self.core_size <= span) {
            return Err(error::config_invalid(
                "core_size",
                format!(
                    "core of {} cells cannot hold two agents with reach {}",
                    self.core_size,
                    self.reach()
                ),
            )
            .with_operation("arena::validate"));
        }
        Ok(())
    }
}

/// One competing program and its per-round state
#[derive(Debug, Clone)]
pub struct Agent {
    program: Program,
    origin: usize,
    registers: Registers,
    alive: bool,
    score: u64,
}

impl Agent {
    fn new(program: Program) -> Self {
        Self {
            program,
            origin: ANCHOR_OFFSET,
            registers: Registers::default(),
            alive: false,
            score: 0,
        }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Where the program was loaded this round
    pub fn origin(&self) -> usize {
        self.origin
    }

    pub fn registers(&self) -> Registers {
        self.registers
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Cumulative score over all rounds played
    pub fn score(&self) -> u64 {
        self.score
    }
}

/// Summary of one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundReport {
    /// 1-based round number
    pub round: u32,
    /// Turns played
    pub cycles: u64,
    /// Indices of the agents still alive at the end
    pub survivors: Vec<usize>,
    /// Points each survivor received
    pub reward: u64,
}

/// Result of a full battle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BattleReport {
    pub rounds: u32,
    /// Cumulative score per agent, in program order
    pub scores: Vec<u64>,
}

/// A shared core and the agents fighting in it
pub struct Arena {
    config: ArenaConfig,
    core: Core,
    agents: Vec<Agent>,
    round_offset: usize,
    rounds_played: u32,
    rng: StdRng,
}

impl Arena {
    /// Create an arena for two or more programs.
    ///
    /// Fails if the configuration is invalid or any program is longer than
    /// `max_length`; nothing has run at that point.
    pub fn new<I, S>(config: ArenaConfig, programs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        config.validate()?;

        let agents: Vec<Agent> = programs
            .into_iter()
            .map(|source| Agent::new(Program::parse(source)))
            .collect();

        if agents.len() < 2 {
            return Err(error::too_few_agents(agents.len()).with_operation("arena::new"));
        }

        for (i, agent) in agents.iter().enumerate() {
            let length = agent.program.source_len();
            if length > config.max_length {
                return Err(error::program_too_long(i, length, config.max_length)
                    .with_operation("arena::new"));
            }
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            core: Core::new(config.core_size),
            config,
            agents,
            round_offset: 0,
            rounds_played: 0,
            rng,
        })
    }

    /// Play every configured round and return the cumulative scores
    pub fn battle(&mut self) -> Result<BattleReport> {
        for _ in 0..self.config.rounds {
            self.run_round()?;
        }

        let report = BattleReport {
            rounds: self.rounds_played,
            scores: self.scores(),
        };
        tracing::info!(rounds = report.rounds, scores = ?report.scores, "battle finished");
        Ok(report)
    }

    /// Play a single round: reset, place, load, then take turns
    pub fn run_round(&mut self) -> Result<RoundReport> {
        self.reset();
        self.rounds_played += 1;

        let count = self.agents.len();
        self.round_offset = (self.round_offset + 1) % count;

        let starts = place_agents(
            &mut self.rng,
            self.config.core_size,
            count,
            self.config.separation,
            self.config.max_length,
        )?;

        for x in 0..count {
            let i = (x + self.round_offset) % count;
            let agent = &mut self.agents[i];
            agent.origin = starts[i];
            agent.registers = loader::load(&mut self.core, starts[i], &agent.program);
            agent.alive = true;
        }
        tracing::debug!(round = self.rounds_played, ?starts, "agents placed");

        let mut cycles = 0;
        while cycles < self.config.max_cycles {
            let mut still_alive = 0;
            for x in 0..count {
                let i = (x + self.round_offset) % count;
                let agent = &mut self.agents[i];
                if !agent.alive {
                    continue;
                }
                match engine::step(&mut self.core, &mut agent.registers, &mut ArenaHost)? {
                    Status::Running => still_alive += 1,
                    Status::Halted(reason) => {
                        agent.alive = false;
                        tracing::debug!(agent = i + 1, cycle = cycles, ?reason, "agent died");
                    }
                }
            }
            cycles += 1;
            if still_alive <= 1 {
                break;
            }
        }

        let survivors: Vec<usize> = (0..count).filter(|&i| self.agents[i].alive).collect();
        let reward = if survivors.is_empty() {
            0
        } else {
            (count * count - 1) as u64 / survivors.len() as u64
        };
        for &i in &survivors {
            self.agents[i].score += reward;
        }

        tracing::debug!(
            round = self.rounds_played,
            cycles,
            survivors = ?survivors,
            reward,
            "round finished"
        );

        Ok(RoundReport {
            round: self.rounds_played,
            cycles,
            survivors,
            reward,
        })
    }

    fn reset(&mut self) {
        self.core.clear();
        for agent in &mut self.agents {
            agent.alive = false;
            agent.registers = Registers::default();
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Cumulative score per agent, in program order
    pub fn scores(&self) -> Vec<u64> {
        self.agents.iter().map(|a| a.score).collect()
    }
}

/// Choose a start offset for each of `count` agents.
///
/// The first agent always starts at [`ANCHOR_OFFSET`]. Every later agent
/// starts at an offset drawn uniformly from those not yet reserved.
/// Reserving a start marks the half-open window
/// `start - separation - max_length .. start + max_length + separation`.
pub fn place_agents<R: rand::Rng + ?Sized>(
    rng: &mut R,
    core_size: usize,
    count: usize,
    separation: usize,
    max_length: usize,
) -> Result<Vec<usize>> {
    if core_size == 0 {
        return Err(Error::invalid_argument("cannot place agents in an empty core")
            .with_operation("arena::place"));
    }

    let reach = separation.saturating_add(max_length);
    let mut in_use = vec![false; core_size];
    let mut starts = Vec::with_capacity(count);

    if count == 0 {
        return Ok(starts);
    }

    let anchor = ANCHOR_OFFSET % core_size;
    reserve(&mut in_use, anchor, reach);
    starts.push(anchor);

    for agent in 1..count {
        let free: Vec<usize> = (0..core_size).filter(|&i| !in_use[i]).collect();
        let start = *free
            .choose(rng)
            .ok_or_else(|| error::placement_failed(agent, core_size).with_operation("arena::place"))?;
        reserve(&mut in_use, start, reach);
        starts.push(start);
    }

    Ok(starts)
}

/// Mark `start - reach .. start + reach` as in use, wrapping around the core
fn reserve(in_use: &mut [bool], start: usize, reach: usize) {
    let size = in_use.len();
    if reach.saturating_mul(2) >= size {
        in_use.fill(true);
        return;
    }
    let first = (start + size - reach % size) % size;
    for k in 0..2 * reach {
        in_use[(first + k) % size] = true;
    }
}
