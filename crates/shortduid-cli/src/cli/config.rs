use anyhow::bail;
use clap::{Parser, Subcommand};
use shortduid::{
    DEFAULT_ALPHABET, DEFAULT_API_KEY_LENGTH, DEFAULT_PASSWORD_LENGTH, HashCodec, ShortDuid,
    SnowflakeIdGenerator, UNIX_EPOCH_MILLIS, UniqueId,
};

/// Largest batch a single `ids` or `codes` invocation may request.
pub const MAX_BATCH: usize = 8192;
pub const MAX_API_KEY_LENGTH: usize = 4096;
pub const MAX_PASSWORD_LENGTH: usize = 1024;
pub const MAX_MIN_LENGTH: usize = 256;

/// Command-line configuration for the `shortduid` binary.
///
/// Generator and codec settings may also come from environment variables or a
/// `.env` file, so that every process in a deployment shares the same salt
/// while each one is given its own shard ID.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "shortduid",
    version,
    about = "Mint shard-aware unique IDs and reversible short codes"
)]
pub struct CliArgs {
    /// Shard identifier embedded in every generated ID (0..=1023).
    ///
    /// Every process minting IDs concurrently must use a distinct value.
    ///
    /// Environment variable: `SHARD_ID`
    #[arg(long, env = "SHARD_ID", default_value_t = 0)]
    pub shard_id: u64,

    /// Salt for the short-code codec. Codes are only decodable with the salt
    /// that produced them.
    ///
    /// Environment variable: `SALT`
    #[arg(long, env = "SALT", default_value_t = String::new())]
    pub salt: String,

    /// Custom epoch in Unix milliseconds. A smaller gap to the present gives
    /// smaller IDs and shorter codes. An epoch in the future is ignored.
    ///
    /// Environment variable: `EPOCH_START`
    #[arg(long, env = "EPOCH_START", default_value_t = UNIX_EPOCH_MILLIS)]
    pub epoch_start: u64,

    /// Minimum length of generated codes (at most 256).
    ///
    /// Environment variable: `MIN_LENGTH`
    #[arg(long, env = "MIN_LENGTH", default_value_t = 0)]
    pub min_length: usize,

    /// Code alphabet. Needs at least 16 distinct characters, otherwise the
    /// default alphabet is used.
    ///
    /// Environment variable: `ALPHABET`
    #[arg(long, env = "ALPHABET", default_value_t = String::from(DEFAULT_ALPHABET))]
    pub alphabet: String,

    /// Print results as JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate unique IDs, printed as decimal integers.
    Ids {
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
    /// Generate unique IDs, printed as short codes.
    Codes {
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
    /// Encode one or more integers into a single code.
    Encode {
        #[arg(required = true)]
        numbers: Vec<u64>,
    },
    /// Decode a code back into its integers.
    Decode {
        code: String,
        /// Fail unless the code is exactly what this configuration produces.
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// Split an ID into its timestamp, shard and sequence fields.
    Inspect { id: UniqueId },
    /// Generate a random alphanumeric API key.
    ApiKey {
        #[arg(short, long, default_value_t = DEFAULT_API_KEY_LENGTH)]
        length: usize,
    },
    /// Generate a random password.
    Password {
        #[arg(short, long, default_value_t = DEFAULT_PASSWORD_LENGTH)]
        length: usize,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub shard_id: u64,
    pub salt: String,
    pub epoch_start: u64,
    pub min_length: usize,
    pub alphabet: String,
    pub json: bool,
    pub command: Command,
}

impl Config {
    /// Builds the generator and codec described by this configuration.
    pub fn short_duid(&self) -> ShortDuid {
        ShortDuid::from_parts(
            SnowflakeIdGenerator::new(self.shard_id, &self.salt, self.epoch_start),
            HashCodec::new(&self.salt, self.min_length, &self.alphabet),
        )
    }
}

impl TryFrom<CliArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let max_shard_id = UniqueId::max_shard_id();
        if args.shard_id > max_shard_id {
            bail!(
                "SHARD_ID ({}) exceeds the shard ID space (max = {})",
                args.shard_id,
                max_shard_id
            );
        }

        if args.min_length > MAX_MIN_LENGTH {
            bail!(
                "MIN_LENGTH ({}) exceeds the limit (max = {})",
                args.min_length,
                MAX_MIN_LENGTH
            );
        }

        match args.command {
            Command::Ids { count } | Command::Codes { count } => {
                if count == 0 {
                    bail!("count must be greater than 0");
                }
                if count > MAX_BATCH {
                    bail!("count ({count}) exceeds the batch limit (max = {MAX_BATCH})");
                }
            }
            Command::ApiKey { length } if length > MAX_API_KEY_LENGTH => {
                bail!("API key length ({length}) exceeds the limit (max = {MAX_API_KEY_LENGTH})");
            }
            Command::Password { length } if length > MAX_PASSWORD_LENGTH => {
                bail!("password length ({length}) exceeds the limit (max = {MAX_PASSWORD_LENGTH})");
            }
            _ => {}
        }

        Ok(Self {
            shard_id: args.shard_id,
            salt: args.salt,
            epoch_start: args.epoch_start,
            min_length: args.min_length,
            alphabet: args.alphabet,
            json: args.json,
            command: args.command,
        })
    }
}
