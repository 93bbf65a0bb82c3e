#[cfg(test)]
mod tests {
    use crate::Cli;
    use clap::Parser;
    use std::time::Duration;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["pet-dance"]);
        assert!(cli.games.is_none());
        assert!(cli.resolution.is_none());
        assert_eq!(cli.turn_duration(), Duration::from_secs(4));
    }

    #[test]
    fn test_cli_resolution_values() {
        let cli = Cli::parse_from(["pet-dance", "--resolution", "1280x800", "--games", "3"]);
        assert_eq!(cli.resolution, Some(crate::settings::Resolution::R1280x800));
        assert_eq!(cli.games, Some(3));
        assert!(Cli::try_parse_from(["pet-dance", "--resolution", "1024x768"]).is_err());
    }

    #[test]
    fn test_turn_duration_out_of_range_falls_back() {
        for secs in ["inf", "1e20", "-1", "NaN"] {
            let cli = Cli::parse_from(["pet-dance".to_string(), format!("--turn-secs={secs}")]);
            assert_eq!(cli.turn_duration(), Duration::from_secs(4), "--turn-secs {secs}");
        }
        let cli = Cli::parse_from(["pet-dance", "--turn-secs", "0.5"]);
        assert_eq!(cli.turn_duration(), Duration::from_millis(500));
    }
}
