use clap::Parser;

/// Omni: a frameless desktop shell around embedded web surfaces.
#[derive(Parser, Debug)]
#[command(name = "omni", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log filter override (e.g. `omni=debug`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Page the first surface opens instead of `surfaces.default_url`.
    #[arg(long)]
    pub url: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_is_all_defaults() {
        let args = Args::try_parse_from(["omni"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.log_level.is_none());
        assert!(args.url.is_none());
    }

    #[test]
    fn overrides_are_parsed() {
        let args = Args::try_parse_from([
            "omni",
            "--config",
            "/tmp/omni.toml",
            "--log-level",
            "omni=debug",
            "--url",
            "https://example.com",
        ])
        .unwrap();
        assert_eq!(args.config.as_deref(), Some("/tmp/omni.toml"));
        assert_eq!(args.log_level.as_deref(), Some("omni=debug"));
        assert_eq!(args.url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Args::try_parse_from(["omni", "--execute", "ls"]).is_err());
    }
}
