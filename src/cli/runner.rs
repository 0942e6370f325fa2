use crate::{
    cli::args::{Base64Action, Cli, Commands, DateArgs, DateOutput, FindArgs, PrefsAction, PrefsArgs},
    defaults::Preferences,
    error::{Error, Result},
    ext::{
        date::{date_with_string, DateExt, DateStyle, UnitsStyle},
        path::{PathExt, PathSearch},
        string::StrExt,
    },
    value::{value_description, Value},
};
use chrono::Local;
use log::debug;
use std::io::Read;

/// Reads `text`, or all of stdin when it is `-`.
fn read_text(text: &str) -> Result<String> {
    if text != "-" {
        return Ok(text.to_string());
    }
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf.trim_end_matches(['\r', '\n']).to_string())
}

/// Dispatches one subcommand and produces its output.
pub struct Runner {
    command: Commands,
}

impl Runner {
    pub fn new(command: Commands) -> Self {
        Self { command }
    }

    /// Runs the command and returns what it would print.
    pub fn output(&self) -> Result<String> {
        match &self.command {
            Commands::Rot13 { text } => Ok(read_text(text)?.rotate13()),
            Commands::Mask { text } => Ok(read_text(text)?.mask()),
            Commands::Unmask { text } => read_text(text)?.unmask(),
            Commands::Base64 { action } => match action {
                Base64Action::Encode { text } => Ok(read_text(text)?.encode_base64()),
                Base64Action::Decode { text } => read_text(text)?.decode_base64(),
            },
            Commands::Find(args) => Ok(self.find(args)),
            Commands::Backup { path } => {
                if path.backup() {
                    Ok(path.backup_file_path().display().to_string())
                } else {
                    Err(Error::Other(anyhow::anyhow!("Could not back up '{}'", path.display())))
                }
            }
            Commands::Date(args) => self.date(args),
            Commands::Prefs(args) => self.prefs(args),
        }
    }

    /// Runs the command and prints its output.
    pub fn run(self) -> Result<()> {
        let output = self.output()?;
        if !output.is_empty() {
            println!("{output}");
        }
        Ok(())
    }

    fn find(&self, args: &FindArgs) -> String {
        let base = args.dir.expanded();
        let mut search = PathSearch::new(&base).deep(args.deep).first_only(args.first);
        if !args.extensions.is_empty() {
            let extensions: Vec<&str> = args.extensions.iter().map(String::as_str).collect();
            search = search.extensions(&extensions);
        } else if !args.names.is_empty() {
            let names: Vec<&str> = args.names.iter().map(String::as_str).collect();
            search = search.filenames(&names);
        }
        let found = search.run();
        debug!("Found {} paths below '{}'", found.len(), base.display());
        found
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn date(&self, args: &DateArgs) -> Result<String> {
        let out_of_range = || Error::Other(anyhow::anyhow!("Date out of range"));
        let mut date = if args.text.eq_ignore_ascii_case("now") {
            Local::now().fixed_offset()
        } else {
            date_with_string(&args.text)
                .ok_or_else(|| Error::Other(anyhow::anyhow!("Unrecognized date '{}'", args.text)))?
        };
        if let Some(days) = args.add_days {
            date = date.adding_days(days).ok_or_else(out_of_range)?;
        }
        if let Some(months) = args.add_months {
            date = date.adding_months(months).ok_or_else(out_of_range)?;
        }
        if let Some(format) = &args.format {
            return Ok(date.string_with_format(format));
        }

        let styled = |style: DateStyle| {
            let time_style = if date.includes_time() { style } else { DateStyle::None };
            date.formatted(style, time_style, false)
        };
        Ok(match args.output {
            DateOutput::Json => date.json_string(),
            DateOutput::Legacy => date.old_style_json_string(),
            DateOutput::Internet => date.internet_string(),
            DateOutput::Short => styled(DateStyle::Short),
            DateOutput::Medium => styled(DateStyle::Medium),
            DateOutput::Long => styled(DateStyle::Long),
            DateOutput::Full => styled(DateStyle::Full),
            DateOutput::Relative => date.relative_string(UnitsStyle::Full, 2, false, "now"),
        })
    }

    fn prefs(&self, args: &PrefsArgs) -> Result<String> {
        let mut prefs = match &args.dir {
            Some(dir) => Preferences::open_in(dir.expanded(), &args.domain)?,
            None => Preferences::open(&args.domain)?,
        };
        if let Some(path) = &args.defaults {
            let content = std::fs::read_to_string(path)?;
            let value: Value = serde_json::from_str(&content)?;
            match value {
                Value::Object(defaults) => prefs.register_defaults(defaults),
                _ => {
                    return Err(Error::PreferencesError(format!(
                        "defaults file '{}' is not a JSON object",
                        path.display()
                    )))
                }
            }
        }

        match &args.action {
            PrefsAction::Get { key: None } => Ok(serde_json::to_string_pretty(&prefs.dictionary_representation())?),
            PrefsAction::Get { key: Some(key) } => prefs
                .object(key)
                .map(value_description)
                .ok_or_else(|| Error::PreferencesError(format!("no value for '{key}' in '{}'", args.domain))),
            PrefsAction::Set { key, value } => {
                let parsed = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.clone()));
                prefs.set_object(key, parsed);
                prefs.synchronize()?;
                Ok(String::new())
            }
            PrefsAction::Restore { keys } => {
                let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
                prefs.restore_factory_settings_for_keys(&keys);
                prefs.synchronize()?;
                Ok(String::new())
            }
        }
    }
}

/// Entry point used by the binary.
pub fn run(cli: Cli) -> Result<()> {
    Runner::new(cli.command).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn output(argv: &[&str]) -> Result<String> {
        let mut full = vec!["valuekit"];
        full.extend_from_slice(argv);
        Runner::new(Cli::parse_from(full).command).output()
    }

    #[test]
    fn text_commands() {
        assert_eq!(output(&["rot13", "Hello"]).unwrap(), "Uryyb");
        let masked = output(&["mask", "secret"]).unwrap();
        assert_eq!(output(&["unmask", masked.as_str()]).unwrap(), "secret");
        assert_eq!(output(&["base64", "encode", "hi"]).unwrap(), "aGk=");
        assert_eq!(output(&["base64", "decode", "aGk="]).unwrap(), "hi");
        assert!(output(&["base64", "decode", "***"]).is_err());
    }

    #[test]
    fn date_command() {
        assert_eq!(
            output(&["date", "2015-03-01T10:30:00Z", "--add-days", "-1"]).unwrap(),
            "2015-02-28T10:30:00.000Z"
        );
        assert_eq!(
            output(&["date", "2015-03-01T10:30:00Z", "--add-months", "1", "-f", "%Y/%m/%d"]).unwrap(),
            "2015/04/01"
        );
        assert_eq!(output(&["date", "2015-01-01T00:00:00Z", "-o", "legacy"]).unwrap(), "/Date(1420070400000+0000)/");
        assert_eq!(output(&["date", "2015-03-01T00:00:00Z", "-o", "long"]).unwrap(), "March 1, 2015");
        assert!(output(&["date", "whenever"]).is_err());
    }

    #[test]
    fn find_and_backup_commands() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        std::fs::write(dir.path().join("b.md"), "b").unwrap();
        let base = dir.path().to_str().unwrap();

        let found = output(&["find", base, "--ext", "TXT"]).unwrap();
        assert_eq!(found, dir.path().join("a.txt").display().to_string());

        let file = dir.path().join("b.md");
        let backup = output(&["backup", file.to_str().unwrap()]).unwrap();
        assert!(backup.ends_with("b backup.md"));
        assert!(output(&["backup", dir.path().join("none").to_str().unwrap()]).is_err());
    }

    #[test]
    fn prefs_commands() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().to_str().unwrap();
        let defaults = dir.path().join("defaults.json");
        std::fs::write(&defaults, r#"{"volume": 5}"#).unwrap();
        let defaults = defaults.to_str().unwrap();

        let prefs = |extra: &[&str]| {
            let mut argv = vec!["prefs", "-D", "com.example.app", "--dir", store, "--defaults", defaults];
            argv.extend_from_slice(extra);
            output(&argv)
        };
        assert_eq!(prefs(&["get", "volume"]).unwrap(), "5");
        prefs(&["set", "volume", "9"]).unwrap();
        prefs(&["set", "name", "Ada Lovelace"]).unwrap();
        assert_eq!(prefs(&["get", "volume"]).unwrap(), "9");
        assert_eq!(prefs(&["get", "name"]).unwrap(), "Ada Lovelace");
        prefs(&["restore", "volume"]).unwrap();
        assert_eq!(prefs(&["get", "volume"]).unwrap(), "5");
        assert!(prefs(&["get", "missing"]).is_err());
        assert!(prefs(&["get"]).unwrap().contains("\"name\""));
    }
}
