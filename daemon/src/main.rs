//! rbpool keeper CLI: seed secrets, commitments and offline simulation.

use anyhow::{bail, Context};
use clap::Parser;
use rbpool_asset::{BaseAsset, SignedApproval};
use rbpool_controller::{seed_commitment, ControllerConfig, RebaseCoordinator};
use rbpool_crypto::{derive_address, keypair_from_seed, random_bytes_32};
use rbpool_ledger::RebasingLedger;
use rbpool_nullables::{NullBaseAsset, NullClock};
use rbpool_types::{Address, PoolSelector, SeedCommitment, SeedKey};
use rbpool_utils::{format_units, init_logging, LogFormat};
use std::path::PathBuf;

const ONE: u128 = 1_000_000_000;

#[derive(Parser)]
#[command(name = "rbpool", about = "Red/Black rebasing pool keeper tools")]
struct Cli {
    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Overrides the config file's value.
    #[arg(long, global = true, env = "RBPOOL_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json". Overrides the config file's value.
    #[arg(long, global = true, env = "RBPOOL_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Seed secrets and their commitments.
    Seed {
        #[command(subcommand)]
        action: SeedAction,
    },

    /// Run a deterministic deposit / inflow / rebase simulation against an
    /// in-memory base asset.
    Simulate {
        /// Controller configuration (TOML).
        #[arg(long)]
        config: PathBuf,

        /// Controller address the config's seed commitment is bound to.
        #[arg(long)]
        controller: Address,

        /// Secret behind `initial_seed_commitment`. Each later secret is
        /// drawn fresh and printed as `next_seed` at the end.
        #[arg(long)]
        seed: String,

        /// Number of rebase rounds.
        #[arg(long, default_value_t = 10)]
        rounds: u32,

        /// Number of simulated holders; even ones deposit to red, odd to black.
        #[arg(long, default_value_t = 4)]
        holders: u8,

        /// Whole units each holder deposits.
        #[arg(long, default_value_t = 1_000)]
        deposit: u128,

        /// Whole units of external inflow before each rebase.
        #[arg(long, default_value_t = 10)]
        inflow: u128,
    },
}

#[derive(clap::Subcommand)]
enum SeedAction {
    /// Generate a fresh secret seed and its commitment.
    New {
        /// Controller address the commitment is bound to.
        #[arg(long)]
        domain: Address,
    },

    /// Compute the commitment for an existing secret seed.
    Commit {
        /// Controller address the commitment is bound to.
        #[arg(long)]
        domain: Address,

        /// The secret seed (hex, 32 bytes).
        #[arg(long)]
        seed: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Seed { action } => {
            init_logging(
                cli.log_format.unwrap_or_default(),
                cli.log_level.as_deref().unwrap_or("warn"),
            );
            run_seed(action)
        }
        Command::Simulate {
            config,
            controller,
            seed,
            rounds,
            holders,
            deposit,
            inflow,
        } => {
            let cfg = ControllerConfig::from_toml_file(&config)
                .with_context(|| format!("loading {}", config.display()))?;
            let format = match cli.log_format {
                Some(f) => f,
                None => cfg
                    .log_format
                    .parse()
                    .context("config log_format")?,
            };
            init_logging(format, cli.log_level.as_deref().unwrap_or(&cfg.log_level));
            let seed = SeedKey::from_hex(&seed).context("--seed")?;
            let sim = Simulation {
                controller,
                rounds,
                holders,
                deposit: deposit.checked_mul(ONE).context("--deposit too large")?,
                inflow: inflow.checked_mul(ONE).context("--inflow too large")?,
            };
            sim.run(&cfg, seed)
        }
    }
}

fn run_seed(action: SeedAction) -> anyhow::Result<()> {
    let (domain, seed) = match action {
        SeedAction::New { domain } => (domain, SeedKey::new(random_bytes_32())),
        SeedAction::Commit { domain, seed } => {
            (domain, SeedKey::from_hex(&seed).context("--seed")?)
        }
    };
    let commitment = seed_commitment(&domain, &seed);
    let out = serde_json::json!({
        "domain": domain.to_hex(),
        "seed": seed.to_hex(),
        "commitment": commitment.to_hex(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

struct Simulation {
    controller: Address,
    rounds: u32,
    holders: u8,
    deposit: u128,
    inflow: u128,
}

impl Simulation {
    fn run(&self, cfg: &ControllerConfig, seed: SeedKey) -> anyhow::Result<()> {
        self.run_with(cfg, seed, |_| {}).map(|_| ())
    }

    /// Runs every round, handing each rebase's (revealed, committed-to)
    /// pair to `on_round`. Returns the last unrevealed secret.
    fn run_with(
        &self,
        cfg: &ControllerConfig,
        seed: SeedKey,
        mut on_round: impl FnMut(&RoundSeeds),
    ) -> anyhow::Result<SeedKey> {
        if seed_commitment(&self.controller, &seed) != cfg.initial_seed_commitment {
            bail!(
                "--seed does not open initial_seed_commitment {} for controller {}",
                cfg.initial_seed_commitment,
                self.controller
            );
        }

        // The simulation deploys its own ledgers, administered by the
        // controller address itself.
        let admin = self.controller;
        let mut red = RebasingLedger::red(admin);
        let mut black = RebasingLedger::black(admin);
        red.set_controller(&admin, self.controller)?;
        black.set_controller(&admin, self.controller)?;

        let keys: Vec<_> = (0..self.holders)
            .map(|n| keypair_from_seed(&[n.wrapping_add(1); 32]))
            .collect();
        let asset = NullBaseAsset::with_balances(
            keys.iter().map(|kp| (derive_address(&kp.public), self.deposit)),
        );
        let mut coordinator = RebaseCoordinator::new(self.controller, red, black, asset, cfg)?;
        let clock = NullClock::new(1_000);

        for (n, kp) in keys.iter().enumerate() {
            let owner = derive_address(&kp.public);
            let nonce = coordinator.asset().nonce_of(&owner);
            let approval = SignedApproval::sign(
                kp,
                self.controller,
                self.deposit,
                nonce,
                clock.now().plus_secs(60),
            );
            let selector = (n % 2) as i64;
            coordinator
                .deposit(&owner, self.deposit, selector, &approval, clock.now())
                .with_context(|| format!("deposit for holder {n}"))?;
        }

        let mut seed = seed;
        for round in 1..=self.rounds {
            clock.advance(3_600);
            coordinator.asset_mut().mint_to(&self.controller, self.inflow);
            // Independent of the secret being revealed this round.
            let next = SeedKey::new(random_bytes_32());
            let commitment = seed_commitment(&self.controller, &next);
            let report = coordinator
                .rebase(&seed, commitment)
                .with_context(|| format!("rebase round {round}"))?;
            on_round(&RoundSeeds {
                revealed: seed,
                commitment,
            });
            seed = next;

            let red = coordinator.pool(PoolSelector::Red);
            let black = coordinator.pool(PoolSelector::Black);
            tracing::info!(
                round,
                fee = %format_units(report.fee),
                to_red = %format_units(report.red),
                to_black = %format_units(report.black),
                red_supply = %format_units(red.total_supply()),
                black_supply = %format_units(black.total_supply()),
                red_scalar = red.per_share_scalar(),
                black_scalar = black.per_share_scalar(),
                "round complete"
            );
        }

        let summary = serde_json::json!({
            "rounds": self.rounds,
            "red_supply": format_units(coordinator.pool(PoolSelector::Red).total_supply()),
            "black_supply": format_units(coordinator.pool(PoolSelector::Black).total_supply()),
            "fees_collected": format_units(coordinator.asset().balance_of(coordinator.fee_collector())),
            "custody": format_units(coordinator.custody_balance()),
            "next_seed": seed.to_hex(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(seed)
    }
}

struct RoundSeeds {
    revealed: SeedKey,
    commitment: SeedCommitment,
}
