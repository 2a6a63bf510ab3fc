use dnsgate_domain::{CliOverrides, Config, EnvOverrides};

pub fn load_config(path: Option<&str>, cli_overrides: CliOverrides) -> anyhow::Result<Config> {
    let env_overrides = EnvOverrides::from_env()?;
    let config = Config::load(path, env_overrides, cli_overrides)?;
    config.validate()?;
    Ok(config)
}
