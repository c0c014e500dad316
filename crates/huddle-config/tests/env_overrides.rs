use figment::Jail;
use huddle_config::HuddleConfig;
use huddle_core::enums::ActivityKind;

#[test]
fn env_overrides_queue_capacity() {
    Jail::expect_with(|jail| {
        jail.set_env("HUDDLE_NOTIFY__QUEUE_CAPACITY", "256");

        let config: HuddleConfig = HuddleConfig::figment().extract()?;
        assert_eq!(config.notify.queue_capacity, 256);
        Ok(())
    });
}

#[test]
fn env_overrides_activity_kinds() {
    Jail::expect_with(|jail| {
        jail.set_env("HUDDLE_NOTIFY__ACTIVITY_KINDS", r#"["deletion"]"#);

        let config: HuddleConfig = HuddleConfig::figment().extract()?;
        assert_eq!(config.notify.activity_kinds, vec![ActivityKind::Deletion]);
        assert!(!config.notify.watches_activity(ActivityKind::Upload));
        Ok(())
    });
}

#[test]
fn local_toml_layers_under_env() {
    Jail::expect_with(|jail| {
        jail.create_dir(".huddle")?;
        jail.create_file(
            ".huddle/config.toml",
            r#"
            [notify]
            queue_capacity = 16
            activity_kinds = ["upload"]
            "#,
        )?;
        jail.set_env("HUDDLE_NOTIFY__QUEUE_CAPACITY", "128");

        let config: HuddleConfig = HuddleConfig::figment().extract()?;
        // Env wins for the overridden key; TOML holds for the rest.
        assert_eq!(config.notify.queue_capacity, 128);
        assert_eq!(config.notify.activity_kinds, vec![ActivityKind::Upload]);
        Ok(())
    });
}
