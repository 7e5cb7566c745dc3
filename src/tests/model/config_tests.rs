    use super::*;

    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let cfg = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg, ClientConfig::default());
        assert_eq!(cfg.endpoint(), "localhost:3141");
        assert_eq!(cfg.editor, "vi");
    }

    #[test]
    fn environment_overrides_defaults() {
        let cfg = ClientConfig::from_lookup(lookup(&[
            (ENV_HOST, "flow01"),
            (ENV_PORT, "4000"),
            (ENV_EDITOR, "nano"),
        ]));
        assert_eq!(cfg.host, "flow01");
        assert_eq!(cfg.port, 4000);
        assert_eq!(cfg.editor, "nano");
        assert_eq!(cfg.base_url(), "http://flow01:4000");
    }

    #[test]
    fn invalid_port_is_ignored() {
        let cfg = ClientConfig::from_lookup(lookup(&[(ENV_PORT, "not-a-port")]));
        assert_eq!(cfg.port, DEFAULT_PORT);
    }

    #[test]
    fn blank_values_are_ignored() {
        let cfg = ClientConfig::from_lookup(lookup(&[(ENV_HOST, "  "), (ENV_EDITOR, "")]));
        assert_eq!(cfg.host, DEFAULT_HOST);
        assert_eq!(cfg.editor, DEFAULT_EDITOR);
    }

    #[test]
    fn flags_beat_environment() {
        let cfg = ClientConfig::from_lookup(lookup(&[(ENV_HOST, "flow01")])).with_overrides(
            Some("flow02".to_string()),
            Some(9),
            Some(0),
        );
        assert_eq!(cfg.endpoint(), "flow02:9");
        // Zero would spin the ticker.
        assert_eq!(cfg.live_interval, Duration::from_secs(1));
    }
