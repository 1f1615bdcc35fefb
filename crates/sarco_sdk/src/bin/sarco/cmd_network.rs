use super::*;

pub(crate) async fn exec(config: SarcoClientConfig) -> SarcoResult<()> {
    let json = serde_json::to_string_pretty(&config.network)
        .map_err(one_err::OneErr::new)?;
    println!("{json}");
    Ok(())
}
