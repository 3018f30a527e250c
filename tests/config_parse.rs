use docx_mill::config::Config;

#[test]
fn parse_example_config() {
    let raw = include_str!("../docx-mill.example.toml");
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert!(cfg.convert.timeout_seconds > 0);
    assert!(!cfg.runtime.candidates.is_empty());
    assert!(!cfg.paths.worker_script.is_empty());
}

#[test]
fn defaults_carry_worker_contract_timeouts() {
    let cfg = Config::default();
    assert_eq!(cfg.convert.timeout_seconds, 60);
    assert_eq!(cfg.runtime.probe_timeout_seconds, 5);
    assert_eq!(cfg.runtime.probe_arg, "--version");
    assert_eq!(cfg.convert.output_extension, "docx");
}

#[test]
fn bare_names_come_before_pinned_paths() {
    let cfg = Config::default();
    let first_pinned = cfg
        .runtime
        .candidates
        .iter()
        .position(|c| c.starts_with('/'))
        .expect("defaults include pinned paths");
    assert!(first_pinned > 0);
    assert!(cfg.runtime.candidates[..first_pinned]
        .iter()
        .all(|c| !c.starts_with('/')));
}
