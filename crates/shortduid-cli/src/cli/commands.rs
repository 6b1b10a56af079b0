use super::config::{Command, Config};
use anyhow::Context;
use serde::Serialize;
use shortduid::{ShortDuid, TimeSource, UniqueId, random_api_key, random_password};
use std::io::Write;

/// Fields of a single ID, as printed by `inspect`.
#[derive(Debug, Serialize)]
struct Inspection {
    /// Decimal string, so JSON consumers limited to 53-bit integers keep
    /// every digit.
    id: String,
    timestamp: u64,
    shard_id: u64,
    sequence: u64,
    unix_millis: u64,
    code: String,
}

impl Inspection {
    fn new<T: TimeSource<u64>>(duid: &ShortDuid<T>, id: UniqueId) -> Self {
        Self {
            id: id.to_string(),
            timestamp: id.timestamp(),
            shard_id: id.shard_id(),
            sequence: id.sequence(),
            unix_millis: id.unix_millis(duid.epoch_start()),
            code: duid.encode(&[id.to_raw()]),
        }
    }
}

/// Executes the configured command against a freshly built [`ShortDuid`],
/// writing results to `out`.
pub fn run(config: &Config, out: &mut impl Write) -> anyhow::Result<()> {
    run_with(config, &config.short_duid(), out)
}

pub fn run_with<T>(config: &Config, duid: &ShortDuid<T>, out: &mut impl Write) -> anyhow::Result<()>
where
    T: TimeSource<u64>,
{
    match &config.command {
        Command::Ids { count } => {
            let ids: Vec<String> = duid.next_ids(*count).iter().map(ToString::to_string).collect();
            tracing::debug!(count, shard_id = duid.shard_id(), "generated ids");
            write_lines(config.json, &ids, out)
        }
        Command::Codes { count } => {
            let codes = duid.next_codes(*count);
            tracing::debug!(count, shard_id = duid.shard_id(), "generated codes");
            write_lines(config.json, &codes, out)
        }
        Command::Encode { numbers } => {
            let code = duid.encode(numbers);
            if config.json {
                serde_json::to_writer(&mut *out, &serde_json::json!({ "code": code }))?;
                writeln!(out)?;
            } else {
                writeln!(out, "{code}")?;
            }
            Ok(())
        }
        Command::Decode { code, strict } => {
            let numbers = if *strict {
                duid.try_decode(code)
                    .with_context(|| format!("cannot decode {code:?}"))?
            } else {
                duid.decode(code)
            };
            let numbers: Vec<String> = numbers.iter().map(ToString::to_string).collect();
            write_lines(config.json, &numbers, out)
        }
        Command::Inspect { id } => {
            let inspection = Inspection::new(duid, *id);
            if config.json {
                serde_json::to_writer(&mut *out, &inspection)?;
                writeln!(out)?;
            } else {
                writeln!(out, "id:          {}", inspection.id)?;
                writeln!(out, "timestamp:   {}", inspection.timestamp)?;
                writeln!(out, "shard_id:    {}", inspection.shard_id)?;
                writeln!(out, "sequence:    {}", inspection.sequence)?;
                writeln!(out, "unix_millis: {}", inspection.unix_millis)?;
                writeln!(out, "code:        {}", inspection.code)?;
            }
            Ok(())
        }
        Command::ApiKey { length } => write_lines(config.json, &[random_api_key(*length)], out),
        Command::Password { length } => write_lines(config.json, &[random_password(*length)], out),
    }
}

/// Writes one value per line, or a single JSON array.
fn write_lines(json: bool, values: &[String], out: &mut impl Write) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer(&mut *out, values)?;
        writeln!(out)?;
    } else {
        for value in values {
            writeln!(out, "{value}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shortduid::{HashCodec, SnowflakeIdGenerator};

    struct MockTime {
        millis: u64,
    }

    impl TimeSource<u64> for MockTime {
        fn current_millis(&self) -> u64 {
            self.millis
        }
    }

    fn config(json: bool, command: Command) -> Config {
        Config {
            shard_id: 5,
            salt: "this is my salt".into(),
            epoch_start: 0,
            min_length: 0,
            alphabet: shortduid::DEFAULT_ALPHABET.into(),
            json,
            command,
        }
    }

    fn duid() -> ShortDuid<MockTime> {
        ShortDuid::from_parts(
            SnowflakeIdGenerator::with_time(5, "this is my salt", 0, MockTime { millis: 42 }),
            HashCodec::with_salt("this is my salt"),
        )
    }

    fn output(config: &Config) -> anyhow::Result<String> {
        let mut out = Vec::new();
        run_with(config, &duid(), &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn ids_print_one_decimal_per_line() {
        let out = output(&config(false, Command::Ids { count: 2 })).unwrap();

        let base = (42_u64 << 22) | (5 << 12);
        assert_eq!(out, format!("{}\n{}\n", base, base + 1));
    }

    #[test]
    fn ids_as_json_are_strings() {
        let out = output(&config(true, Command::Ids { count: 1 })).unwrap();

        let parsed: Vec<String> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, [((42_u64 << 22) | (5 << 12)).to_string()]);
    }

    #[test]
    fn codes_decode_back_to_generated_ids() {
        let out = output(&config(false, Command::Codes { count: 3 })).unwrap();

        let codec = HashCodec::with_salt("this is my salt");
        let base = (42_u64 << 22) | (5 << 12);
        let decoded: Vec<Vec<u64>> = out.lines().map(|code| codec.decode(code)).collect();
        assert_eq!(decoded, [vec![base], vec![base + 1], vec![base + 2]]);
    }

    #[test]
    fn encode_and_decode() {
        let encoded = output(&config(false, Command::Encode { numbers: vec![1, 2, 3] })).unwrap();
        assert_eq!(encoded, "laHquq\n");

        let json = output(&config(true, Command::Encode { numbers: vec![1, 2, 3] })).unwrap();
        assert_eq!(json, "{\"code\":\"laHquq\"}\n");

        let decoded = output(&config(
            false,
            Command::Decode {
                code: "laHquq".into(),
                strict: true,
            },
        ))
        .unwrap();
        assert_eq!(decoded, "1\n2\n3\n");
    }

    #[test]
    fn strict_decode_reports_foreign_codes() {
        let lenient = output(&config(
            false,
            Command::Decode {
                code: "laHqur".into(),
                strict: false,
            },
        ))
        .unwrap();
        assert_eq!(lenient, "1\n2\n33\n");

        let err = output(&config(
            false,
            Command::Decode {
                code: "laHqur".into(),
                strict: true,
            },
        ))
        .unwrap_err();
        assert!(err.to_string().contains("laHqur"));
    }

    #[test]
    fn inspect_splits_fields() {
        let id = UniqueId::from_components(42, 5, 7);
        let out = output(&config(true, Command::Inspect { id })).unwrap();

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["id"], id.to_raw().to_string());
        assert_eq!(value["timestamp"], 42);
        assert_eq!(value["shard_id"], 5);
        assert_eq!(value["sequence"], 7);
        assert_eq!(value["unix_millis"], 42);
        assert_eq!(
            value["code"],
            HashCodec::with_salt("this is my salt").encode(&[id.to_raw()])
        );
    }

    #[test]
    fn random_commands_honor_length() {
        let key = output(&config(false, Command::ApiKey { length: 40 })).unwrap();
        assert_eq!(key.trim_end().len(), 40);

        let password = output(&config(false, Command::Password { length: 12 })).unwrap();
        assert_eq!(password.trim_end().len(), 12);
    }
}
