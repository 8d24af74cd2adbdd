//! Gate configuration: TOML documents, environment variables and a builder.

use crate::error::{GateError, Result};
use crate::gate::Gate;
use crate::probability::Probability;
use rand::rngs::{StdRng, ThreadRng};
use rand::{RngCore, SeedableRng};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::env::VarError;
use std::fmt::Display;
use std::str::FromStr;
use std::{fs, path::Path};

/// Generator behind a gate built from a [`GateConfig`].
///
/// Seeded gates hand every wrapper a copy of the same `StdRng`, so wrappers
/// repeat each other's decisions. Unseeded gates share the thread-local
/// generator, so their wrappers decide independently.
#[derive(Debug, Clone)]
pub enum GateRng {
	/// Deterministic stream from `seed`.
	Seeded(StdRng),
	/// Thread-local generator, reseeded from OS entropy.
	Thread(ThreadRng),
}

impl RngCore for GateRng {
	fn next_u32(&mut self) -> u32 {
		match self {
			Self::Seeded(rng) => rng.next_u32(),
			Self::Thread(rng) => rng.next_u32(),
		}
	}

	fn next_u64(&mut self) -> u64 {
		match self {
			Self::Seeded(rng) => rng.next_u64(),
			Self::Thread(rng) => rng.next_u64(),
		}
	}

	fn fill_bytes(&mut self, dest: &mut [u8]) {
		match self {
			Self::Seeded(rng) => rng.fill_bytes(dest),
			Self::Thread(rng) => rng.fill_bytes(dest),
		}
	}

	fn try_fill_bytes(&mut self, dest: &mut [u8]) -> core::result::Result<(), rand::Error> {
		match self {
			Self::Seeded(rng) => rng.try_fill_bytes(dest),
			Self::Thread(rng) => rng.try_fill_bytes(dest),
		}
	}
}

/// Serializable description of a gate.
///
/// ```toml
/// probability = 30
/// default_value = "skipped"
/// seed = 42          # optional
/// name = "sampler"   # optional
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GateConfig<T> {
	/// Pass threshold in `[1, 99]`.
	pub probability: Probability,
	/// Returned when a call's draw fails.
	pub default_value: T,
	/// Fixes the decision sequence when set.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub seed: Option<u64>,
	/// Label for trace events.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
}

impl<T> GateConfig<T> {
	/// Unseeded, unnamed config.
	pub fn new(probability: Probability, default_value: T) -> Self {
		Self { probability, default_value, seed: None, name: None }
	}

	/// Start a [`GateConfigBuilder`].
	pub fn builder() -> GateConfigBuilder<T> { GateConfigBuilder::default() }

	/// Build the gate. Seeded configs reproduce the same decisions on every run.
	pub fn into_gate(self) -> Gate<T, GateRng> {
		let rng = match self.seed {
			Some(seed) => GateRng::Seeded(StdRng::seed_from_u64(seed)),
			None => GateRng::Thread(rand::thread_rng()),
		};
		let gate = Gate::new(self.probability, self.default_value).with_rng(rng);
		match self.name {
			Some(name) => gate.named(name),
			None => gate,
		}
	}
}

impl<T: DeserializeOwned> GateConfig<T> {
	/// Parse a TOML document. Threshold problems are [`GateError::InvalidArgument`],
	/// anything else malformed is [`GateError::Config`].
	pub fn from_toml_str(data: &str) -> Result<Self> {
		let table: toml::Table = toml::from_str(data).map_err(|e| GateError::config(format!("toml parse error: {e}")))?;
		// Surface threshold problems as argument errors rather than generic parse failures.
		match table.get("probability") {
			Some(toml::Value::Integer(p)) => { Probability::new(*p)?; }
			Some(other) => {
				return Err(GateError::invalid_argument(format!("probability must be an integer, got {other}")));
			}
			None => return Err(GateError::config("missing field `probability`")),
		}
		Self::deserialize(toml::Value::Table(table)).map_err(|e| GateError::config(format!("toml parse error: {e}")))
	}

	/// Read and parse a TOML file.
	pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
		let data = fs::read_to_string(path)?;
		Self::from_toml_str(&data)
	}
}

impl<T: Serialize> GateConfig<T> {
	/// Render as a TOML document.
	pub fn to_toml_string(&self) -> Result<String> {
		toml::to_string_pretty(self).map_err(|e| GateError::config(format!("toml serialize error: {e}")))
	}

	/// Write the TOML rendering to `path`.
	pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
		fs::write(path, self.to_toml_string()?)?;
		Ok(())
	}
}

impl<T> GateConfig<T>
where
	T: FromStr,
	T::Err: Display,
{
	/// Read `CHANCE_PROBABILITY` and `CHANCE_DEFAULT` (both required) plus the
	/// optional `CHANCE_SEED` and `CHANCE_NAME`.
	pub fn from_env() -> Result<Self> {
		let probability: Probability = required_env("CHANCE_PROBABILITY")?.parse()?;
		let default_value = required_env("CHANCE_DEFAULT")?
			.parse::<T>()
			.map_err(|e| GateError::config(format!("invalid CHANCE_DEFAULT: {e}")))?;
		let mut cfg = Self::new(probability, default_value);
		if let Some(v) = optional_env("CHANCE_SEED")? {
			cfg.seed = Some(v.trim().parse().map_err(|_| GateError::config(format!("invalid CHANCE_SEED: {v}")))?);
		}
		cfg.name = optional_env("CHANCE_NAME")?;
		Ok(cfg)
	}
}

fn optional_env(key: &str) -> Result<Option<String>> {
	match std::env::var(key) {
		Ok(v) => Ok(Some(v)),
		Err(VarError::NotPresent) => Ok(None),
		Err(VarError::NotUnicode(raw)) => Err(GateError::config(format!("{key} is not valid unicode: {raw:?}"))),
	}
}

fn required_env(key: &str) -> Result<String> {
	optional_env(key)?.ok_or_else(|| GateError::config(format!("{key} is not set")))
}

/// Builder for [`GateConfig`]; the threshold is validated in [`GateConfigBuilder::build`].
#[derive(Debug, Clone)]
pub struct GateConfigBuilder<T> {
	probability: Option<i64>,
	default_value: Option<T>,
	seed: Option<u64>,
	name: Option<String>,
}

impl<T> Default for GateConfigBuilder<T> {
	fn default() -> Self {
		Self { probability: None, default_value: None, seed: None, name: None }
	}
}

impl<T> GateConfigBuilder<T> {
	/// Raw threshold; checked by [`GateConfigBuilder::build`].
	pub fn probability(mut self, p: i64) -> Self { self.probability = Some(p); self }
	/// Value returned when a draw fails.
	pub fn default_value(mut self, v: T) -> Self { self.default_value = Some(v); self }
	/// Fix the decision sequence.
	pub fn seed(mut self, seed: u64) -> Self { self.seed = Some(seed); self }
	/// Label for trace events.
	pub fn name(mut self, name: impl Into<String>) -> Self { self.name = Some(name.into()); self }

	/// Validate and produce the config.
	pub fn build(self) -> Result<GateConfig<T>> {
		let p = self.probability.ok_or_else(|| GateError::invalid_argument("probability is required"))?;
		let default_value = self.default_value.ok_or_else(|| GateError::invalid_argument("default value is required"))?;
		Ok(GateConfig { probability: Probability::new(p)?, default_value, seed: self.seed, name: self.name })
	}
}
