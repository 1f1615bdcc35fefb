use super::*;

pub(crate) async fn exec(
    sarco_root: std::path::PathBuf,
    opt: OptInit,
) -> SarcoResult<()> {
    let config =
        SarcoClientConfigInner::new(opt.network, opt.provider_url.into());
    config.network.validate()?;

    let config_n = write_config(&sarco_root, &config).await?;
    let config_n = dunce::canonicalize(&config_n)?;

    println!("# sarco init config:\n{config_n:?}");
    println!(
        "# sarco init network:\n{} ({})",
        config.network.network_name, config.network.chain_id,
    );

    Ok(())
}
